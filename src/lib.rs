pub mod config;
pub mod effects;
pub mod media;
pub mod narration;
pub mod playback;
pub mod question;
pub mod quiz;
pub mod result;
#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use config::QuizConfig;
pub use effects::{
    FloodColor, SelectionEffect, Star, generate_starfield, selection_effect, starfield_style,
};
pub use media::{CAT_PAW_GIF, PopupImage, SoundCue};
pub use narration::{
    NarrationFrame, NarrationOutput, NarrationPhase, NarrationPlan, NarrationSession,
    NarrationStep, Narrator, SessionHandle, StepCue, run_plan,
};
pub use playback::{PlaybackError, VoiceInfo, bounded, pick_voice};
pub use question::{OPTION_COUNT, Question, QuestionBank, QuestionBankError, strip_ordinal};
pub use quiz::{Navigation, Quiz};
pub use result::{ConfettiBurst, CountUp, celebration_plan, percentage};
