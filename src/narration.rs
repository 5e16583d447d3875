//! Per-question narration: speech, then an optional sequence of highlighted
//! sound or popup cues.
//!
//! A plan is an explicit list of steps driven by [`run_plan`], which awaits
//! each step before moving on. Sessions are started through [`Narrator`],
//! which cancels the previous session before handing out the next one. A
//! cancelled session stops mutating shared state: every frame update checks
//! the session's abort flag first, and the session future itself is
//! abortable so pending timers and audio waits are dropped.

use std::rc::Rc;
use std::time::Duration;

use futures::future::{AbortHandle, Abortable, FutureExt, LocalBoxFuture};

use crate::config::QuizConfig;
use crate::media::{PopupImage, SoundCue};
use crate::playback::PlaybackError;
use crate::question::Question;

const AUDIO_QUESTION_ID: u32 = 1;
const VISUAL_QUESTION_ID: u32 = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NarrationPhase {
    #[default]
    Idle,
    Speaking,
    AudioSequence,
    VisualSequence,
}

/// What the view shows for the narration at a given moment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NarrationFrame {
    pub phase: NarrationPhase,
    /// Option index drawing attention, if any.
    pub highlight: Option<usize>,
    pub popup: Option<PopupImage>,
}

impl NarrationFrame {
    pub fn idle() -> Self {
        Self::default()
    }

    fn speaking() -> Self {
        Self {
            phase: NarrationPhase::Speaking,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepCue {
    /// Play the sound to its natural end.
    Sound(SoundCue),
    /// Show the image for `dwell`, hide it, then pause for `gap`.
    Popup {
        image: PopupImage,
        dwell: Duration,
        gap: Duration,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NarrationStep {
    pub highlight: usize,
    pub cue: StepCue,
}

/// Everything one narration session does, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrationPlan {
    pub question_id: u32,
    /// Prompt text without its ordinal marker.
    pub speech: String,
    /// Phase reported while `steps` run.
    pub sequence: NarrationPhase,
    pub steps: Vec<NarrationStep>,
}

impl NarrationPlan {
    /// Builds the plan for `question`. The cue sequence is chosen by question
    /// id: the first question plays the option sounds, the second shows the
    /// option pictures, the others only speak.
    pub fn for_question(question: &Question, config: &QuizConfig) -> Self {
        let (sequence, steps) = match question.id {
            AUDIO_QUESTION_ID => (
                NarrationPhase::AudioSequence,
                question
                    .options
                    .iter()
                    .enumerate()
                    .filter_map(|(index, option)| {
                        SoundCue::for_option(option).map(|sound| NarrationStep {
                            highlight: index,
                            cue: StepCue::Sound(sound),
                        })
                    })
                    .collect(),
            ),
            VISUAL_QUESTION_ID => (
                NarrationPhase::VisualSequence,
                question
                    .options
                    .iter()
                    .enumerate()
                    .filter_map(|(index, option)| {
                        PopupImage::for_option(option).map(|image| NarrationStep {
                            highlight: index,
                            cue: StepCue::Popup {
                                image,
                                dwell: config.popup_dwell(),
                                gap: config.popup_gap(),
                            },
                        })
                    })
                    .collect(),
            ),
            _ => (NarrationPhase::Idle, Vec::new()),
        };

        Self {
            question_id: question.id,
            speech: question.spoken_prompt().to_string(),
            sequence,
            steps,
        }
    }
}

/// Platform side of narration.
///
/// The async methods resolve when the request has finished, failed, or been
/// interrupted by [`NarrationOutput::silence`].
#[allow(async_fn_in_trait)]
pub trait NarrationOutput {
    async fn speak(&self, text: &str) -> Result<(), PlaybackError>;
    async fn play(&self, sound: SoundCue) -> Result<(), PlaybackError>;
    async fn wait(&self, duration: Duration);
    /// Stops speech and rewinds any playing audio.
    fn silence(&self);
    fn show(&self, frame: NarrationFrame);
}

fn show_unless_cancelled<O: NarrationOutput>(
    output: &O,
    token: &AbortHandle,
    frame: NarrationFrame,
) -> bool {
    if token.is_aborted() {
        return false;
    }

    output.show(frame);
    true
}

/// Drives `plan` to completion, or until `token` is aborted.
///
/// Playback failures are logged and the sequence carries on with the next step.
pub async fn run_plan<O: NarrationOutput>(plan: &NarrationPlan, output: &O, token: &AbortHandle) {
    if !show_unless_cancelled(output, token, NarrationFrame::speaking()) {
        return;
    }

    if let Err(error) = output.speak(&plan.speech).await {
        log::warn!("question {}: {error}", plan.question_id);
    }

    for step in &plan.steps {
        let frame = NarrationFrame {
            phase: plan.sequence,
            highlight: Some(step.highlight),
            popup: None,
        };

        match step.cue {
            StepCue::Sound(sound) => {
                if !show_unless_cancelled(output, token, frame) {
                    return;
                }
                if let Err(error) = output.play(sound).await {
                    log::warn!("question {}: {error}", plan.question_id);
                }
            }
            StepCue::Popup { image, dwell, gap } => {
                let with_popup = NarrationFrame {
                    popup: Some(image),
                    ..frame
                };
                if !show_unless_cancelled(output, token, with_popup) {
                    return;
                }
                output.wait(dwell).await;

                if !show_unless_cancelled(output, token, frame) {
                    return;
                }
                output.wait(gap).await;
            }
        }
    }

    show_unless_cancelled(output, token, NarrationFrame::idle());
}

/// Cancel handle for one narration session.
pub struct SessionHandle<O> {
    question_id: u32,
    abort: AbortHandle,
    output: Rc<O>,
}

impl<O> Clone for SessionHandle<O> {
    fn clone(&self) -> Self {
        Self {
            question_id: self.question_id,
            abort: self.abort.clone(),
            output: Rc::clone(&self.output),
        }
    }
}

impl<O: NarrationOutput> SessionHandle<O> {
    pub fn question_id(&self) -> u32 {
        self.question_id
    }

    pub fn is_cancelled(&self) -> bool {
        self.abort.is_aborted()
    }

    /// Stops the session and clears its highlight and popup. Calling it again
    /// does nothing.
    pub fn cancel(&self) {
        if self.abort.is_aborted() {
            return;
        }

        self.abort.abort();
        self.output.silence();
        self.output.show(NarrationFrame::idle());
        log::debug!("narration cancelled for question {}", self.question_id);
    }
}

/// A started session: its cancel handle and the future that runs it.
/// The caller spawns `task` on the local executor.
pub struct NarrationSession<O> {
    pub handle: SessionHandle<O>,
    pub task: LocalBoxFuture<'static, ()>,
}

/// Owns the narration output and at most one active session.
pub struct Narrator<O> {
    output: Rc<O>,
    active: Option<SessionHandle<O>>,
}

impl<O: NarrationOutput + 'static> Narrator<O> {
    pub fn new(output: Rc<O>) -> Self {
        Self {
            output,
            active: None,
        }
    }

    pub fn output(&self) -> &Rc<O> {
        &self.output
    }

    pub fn active(&self) -> Option<&SessionHandle<O>> {
        self.active.as_ref()
    }

    /// Cancels the active session, then prepares a session for `plan`.
    pub fn begin(&mut self, plan: NarrationPlan) -> NarrationSession<O> {
        self.cancel();

        let (abort, registration) = AbortHandle::new_pair();
        let handle = SessionHandle {
            question_id: plan.question_id,
            abort: abort.clone(),
            output: Rc::clone(&self.output),
        };
        let output = Rc::clone(&self.output);

        let task = Abortable::new(
            async move {
                run_plan(&plan, output.as_ref(), &abort).await;
            },
            registration,
        )
        .map(|_| ())
        .boxed_local();

        log::debug!("narration started for question {}", handle.question_id);
        self.active = Some(handle.clone());

        NarrationSession { handle, task }
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.active.take() {
            handle.cancel();
        }
    }
}
