use std::collections::BTreeMap;

use crate::effects::{SelectionEffect, selection_effect};
use crate::question::{Question, QuestionBank};
use crate::result::percentage;

/// Outcome of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Nothing changed: back at the first question, forward without an answer,
    /// or the result is already showing.
    Unchanged,
    /// The pointer moved to the contained question index.
    Moved(usize),
    /// The result view became visible.
    Finished,
}

/// Quiz view state: question pointer, recorded answers and the result flag.
///
/// All operations are total. Indices cannot leave the bank because navigation
/// is clamped, and options only come from the rendered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    bank: QuestionBank,
    current_index: usize,
    answers: BTreeMap<u32, String>,
    result_visible: bool,
}

impl Quiz {
    pub fn new(bank: QuestionBank) -> Self {
        Self {
            bank,
            current_index: 0,
            answers: BTreeMap::new(),
            result_visible: false,
        }
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> &Question {
        // The bank is never empty and the index is clamped to it.
        &self.bank.questions()[self.current_index]
    }

    pub fn result_visible(&self) -> bool {
        self.result_visible
    }

    pub fn answers(&self) -> &BTreeMap<u32, String> {
        &self.answers
    }

    pub fn answer_for(&self, question_id: u32) -> Option<&str> {
        self.answers.get(&question_id).map(String::as_str)
    }

    /// Records `option` as the answer to `question_id`, replacing any earlier choice.
    ///
    /// Returns the cosmetic effect the selection triggers, if any. Effects are
    /// presentation only and never feed back into quiz state.
    pub fn select_option(&mut self, question_id: u32, option: &str) -> Option<SelectionEffect> {
        self.answers.insert(question_id, option.to_string());
        selection_effect(question_id, option)
    }

    pub fn can_go_back(&self) -> bool {
        !self.result_visible && self.current_index > 0
    }

    pub fn can_advance(&self) -> bool {
        !self.result_visible && self.answer_for(self.current_question().id).is_some()
    }

    pub fn go_back(&mut self) -> Navigation {
        if !self.can_go_back() {
            return Navigation::Unchanged;
        }

        self.current_index -= 1;
        Navigation::Moved(self.current_index)
    }

    /// Moves to the next question, or reveals the result from the last one.
    /// Does nothing while the current question is unanswered.
    pub fn advance(&mut self) -> Navigation {
        if !self.can_advance() {
            return Navigation::Unchanged;
        }

        if self.current_index + 1 < self.bank.len() {
            self.current_index += 1;
            Navigation::Moved(self.current_index)
        } else {
            self.result_visible = true;
            Navigation::Finished
        }
    }

    /// Reveals the result regardless of the answer gate. Only the starfield
    /// overlay of the last question uses this.
    pub fn finish(&mut self) -> Navigation {
        if self.result_visible {
            return Navigation::Unchanged;
        }

        self.result_visible = true;
        Navigation::Finished
    }

    pub fn restart(&mut self) {
        self.answers.clear();
        self.current_index = 0;
        self.result_visible = false;
    }

    /// Number of questions whose recorded answer matches the correct option.
    pub fn score(&self) -> usize {
        self.bank
            .questions()
            .iter()
            .filter(|question| {
                self.answer_for(question.id)
                    .is_some_and(|answer| question.is_correct(answer))
            })
            .count()
    }

    pub fn total(&self) -> usize {
        self.bank.len()
    }

    pub fn percentage(&self) -> u32 {
        percentage(self.score(), self.total())
    }

    /// One flag per question, set for every question up to and including the current one.
    pub fn progress(&self) -> Vec<bool> {
        (0..self.bank.len())
            .map(|index| index <= self.current_index)
            .collect()
    }
}
