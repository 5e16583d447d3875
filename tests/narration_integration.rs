use std::cell::RefCell;
use std::collections::VecDeque;
use std::future::Future;
use std::pin::pin;
use std::rc::Rc;
use std::task::Context;
use std::time::Duration;

use futures::channel::oneshot;
use futures::executor::LocalPool;
use futures::future::AbortHandle;
use futures::task::LocalSpawnExt;
use kidquiz::{
    NarrationFrame, NarrationOutput, NarrationPhase, NarrationPlan, Narrator, PlaybackError,
    PopupImage, QuestionBank, Quiz, QuizConfig, SoundCue, run_plan,
};

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Show(NarrationFrame),
    Spoke(String),
    Played(SoundCue),
    Waited(Duration),
    Silenced,
}

/// Output whose speech requests and timed waits can be held open until the
/// test releases them.
#[derive(Default)]
struct GatedOutput {
    events: RefCell<Vec<Event>>,
    speech_gates: RefCell<VecDeque<oneshot::Receiver<()>>>,
    wait_gates: RefCell<VecDeque<oneshot::Receiver<()>>>,
}

impl GatedOutput {
    fn hold_next_speech(&self) -> oneshot::Sender<()> {
        let (sender, receiver) = oneshot::channel();
        self.speech_gates.borrow_mut().push_back(receiver);
        sender
    }

    fn hold_next_wait(&self) -> oneshot::Sender<()> {
        let (sender, receiver) = oneshot::channel();
        self.wait_gates.borrow_mut().push_back(receiver);
        sender
    }

    fn frames(&self) -> Vec<NarrationFrame> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                Event::Show(frame) => Some(*frame),
                _ => None,
            })
            .collect()
    }
}

impl NarrationOutput for GatedOutput {
    async fn speak(&self, text: &str) -> Result<(), PlaybackError> {
        self.events.borrow_mut().push(Event::Spoke(text.to_string()));
        let gate = self.speech_gates.borrow_mut().pop_front();
        if let Some(gate) = gate {
            gate.await
                .map_err(|_| PlaybackError::Speech("interrupted".to_string()))?;
        }
        Ok(())
    }

    async fn play(&self, sound: SoundCue) -> Result<(), PlaybackError> {
        self.events.borrow_mut().push(Event::Played(sound));
        Ok(())
    }

    async fn wait(&self, duration: Duration) {
        self.events.borrow_mut().push(Event::Waited(duration));
        let gate = self.wait_gates.borrow_mut().pop_front();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
    }

    fn silence(&self) {
        self.events.borrow_mut().push(Event::Silenced);
    }

    fn show(&self, frame: NarrationFrame) {
        self.events.borrow_mut().push(Event::Show(frame));
    }
}

fn plan(quiz: &Quiz) -> NarrationPlan {
    NarrationPlan::for_question(quiz.current_question(), &QuizConfig::default())
}

#[test]
fn new_session_silences_the_one_in_flight() {
    let quiz_bank = QuestionBank::builtin().expect("fixture should load");
    let mut quiz = Quiz::new(quiz_bank);
    let output = Rc::new(GatedOutput::default());
    let mut narrator = Narrator::new(Rc::clone(&output));
    let mut pool = LocalPool::new();
    let spawner = pool.spawner();

    let first_gate = output.hold_next_speech();
    let first = narrator.begin(plan(&quiz));
    spawner.spawn_local(first.task).expect("spawn first session");
    pool.run_until_stalled();
    assert_eq!(
        output.frames().last().map(|frame| frame.phase),
        Some(NarrationPhase::Speaking)
    );

    quiz.select_option(1, "Meow-Meow");
    quiz.advance();
    let second = narrator.begin(plan(&quiz));
    assert!(first.handle.is_cancelled());
    let cancel_point = output.events.borrow().len();
    spawner.spawn_local(second.task).expect("spawn second session");
    pool.run_until_stalled();

    // The first session's speech finishing late must not revive its sequence.
    assert!(first_gate.send(()).is_err());
    pool.run_until_stalled();

    let events = output.events.borrow();
    assert_eq!(
        &events[cancel_point - 2..cancel_point],
        &[Event::Silenced, Event::Show(NarrationFrame::idle())]
    );
    assert!(
        events
            .iter()
            .all(|event| !matches!(event, Event::Played(_))),
        "audio cues of the first question must never start"
    );
    assert!(events[cancel_point..].iter().all(|event| match event {
        Event::Show(frame) => frame.phase != NarrationPhase::AudioSequence,
        _ => true,
    }));
    assert_eq!(events.last(), Some(&Event::Show(NarrationFrame::idle())));
}

#[test]
fn cancelling_during_popup_dwell_hides_the_popup() {
    let bank = QuestionBank::builtin().expect("fixture should load");
    let mut quiz = Quiz::new(bank);
    quiz.select_option(1, "Meow-Meow");
    quiz.advance();
    let output = Rc::new(GatedOutput::default());
    let mut narrator = Narrator::new(Rc::clone(&output));
    let mut pool = LocalPool::new();
    let spawner = pool.spawner();

    let dwell_gate = output.hold_next_wait();
    let fridge = narrator.begin(plan(&quiz));
    spawner.spawn_local(fridge.task).expect("spawn fridge session");
    pool.run_until_stalled();
    assert_eq!(
        output.frames().last(),
        Some(&NarrationFrame {
            phase: NarrationPhase::VisualSequence,
            highlight: Some(0),
            popup: Some(PopupImage::Shoes),
        })
    );
    assert_eq!(
        output.events.borrow().last(),
        Some(&Event::Waited(QuizConfig::default().popup_dwell()))
    );

    quiz.select_option(2, "Ice Cream");
    quiz.advance();
    let cancel_point = output.frames().len();
    let bananas = narrator.begin(plan(&quiz));
    spawner.spawn_local(bananas.task).expect("spawn bananas session");
    pool.run_until_stalled();

    // The dwell timer elapsing after the switch must not bring the popup back.
    assert!(dwell_gate.send(()).is_err());
    pool.run_until_stalled();

    let frames = output.frames();
    assert!(frames[cancel_point..].iter().all(|frame| {
        frame.popup.is_none() && frame.phase != NarrationPhase::VisualSequence
    }));
    assert_eq!(frames[cancel_point], NarrationFrame::idle());
    assert_eq!(frames.last(), Some(&NarrationFrame::idle()));
    let waits = output
        .events
        .borrow()
        .iter()
        .filter(|event| matches!(event, Event::Waited(_)))
        .count();
    assert_eq!(waits, 1, "the gap after the first popup must never start");
}

#[test]
fn stale_completion_is_ignored_once_token_is_aborted() {
    let bank = QuestionBank::builtin().expect("fixture should load");
    let output = GatedOutput::default();
    let gate = output.hold_next_speech();
    let (token, _registration) = AbortHandle::new_pair();
    let plan = NarrationPlan::for_question(&bank.questions()[0], &QuizConfig::default());

    let waker = futures::task::noop_waker();
    let mut cx = Context::from_waker(&waker);
    let mut driver = pin!(run_plan(&plan, &output, &token));
    assert!(driver.as_mut().poll(&mut cx).is_pending());

    token.abort();
    gate.send(()).expect("driver still waits on speech");
    assert!(driver.as_mut().poll(&mut cx).is_ready());

    let speaking = NarrationFrame {
        phase: NarrationPhase::Speaking,
        highlight: None,
        popup: None,
    };
    assert_eq!(output.frames(), vec![speaking]);
}

#[test]
fn finishing_the_quiz_leaves_narration_idle() {
    let bank = QuestionBank::builtin().expect("fixture should load");
    let mut quiz = Quiz::new(bank);
    let output = Rc::new(GatedOutput::default());
    let mut narrator = Narrator::new(Rc::clone(&output));
    let mut pool = LocalPool::new();
    let spawner = pool.spawner();

    for index in 0..quiz.total() {
        let _gate = output.hold_next_speech();
        let session = narrator.begin(plan(&quiz));
        spawner.spawn_local(session.task).expect("spawn session");
        pool.run_until_stalled();

        let question = quiz.current_question().clone();
        quiz.select_option(question.id, &question.correct_option);
        quiz.advance();
        assert_eq!(quiz.result_visible(), index + 1 == quiz.total());
    }

    narrator.cancel();
    pool.run_until_stalled();

    assert!(narrator.active().is_none());
    assert_eq!(output.frames().last(), Some(&NarrationFrame::idle()));
    assert_eq!(quiz.percentage(), 100);
}
