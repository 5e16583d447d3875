use std::future::Future;
use std::pin::pin;

use futures::future::{Either, select};

/// Best-effort media and speech failures. These are logged and never shown
/// to the user or allowed to block the quiz.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("speech synthesis is not available")]
    SpeechUnavailable,
    #[error("speech output failed: {0}")]
    Speech(String),
    #[error("failed to play {path}: {message}")]
    Media { path: String, message: String },
    #[error("confetti library is not loaded")]
    ConfettiUnavailable,
    #[error("confetti burst failed: {0}")]
    Confetti(String),
}

/// Platform-independent description of a speech synthesis voice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceInfo {
    pub name: String,
    /// BCP 47 language tag such as "en-US".
    pub lang: String,
}

/// Index of the voice to speak with: the first whose language starts with
/// `preferred_lang`, otherwise the first voice. `None` when no voices exist.
pub fn pick_voice(voices: &[VoiceInfo], preferred_lang: &str) -> Option<usize> {
    let preferred = preferred_lang.to_ascii_lowercase();

    voices
        .iter()
        .position(|voice| voice.lang.to_ascii_lowercase().starts_with(&preferred))
        .or_else(|| (!voices.is_empty()).then_some(0))
}

/// Runs `work` until `deadline` fires. `None` means the deadline won.
///
/// When both are ready on the same poll the finished work is kept.
pub async fn bounded<T>(
    work: impl Future<Output = T>,
    deadline: impl Future<Output = ()>,
) -> Option<T> {
    match select(pin!(work), pin!(deadline)).await {
        Either::Left((value, _)) => Some(value),
        Either::Right(_) => None,
    }
}
