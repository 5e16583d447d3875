use std::time::Duration;

/// Timing and speech settings shared by narration, overlays and the result view.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    /// Speech synthesis rate, where 1.0 is the platform default.
    pub speech_rate: f32,
    /// Voices whose language tag starts with this prefix are preferred.
    pub preferred_voice_lang: String,
    /// How long a popup image stays up during the visual-cue sequence.
    pub popup_dwell_ms: u64,
    /// Pause between hiding one popup and highlighting the next option.
    pub popup_gap_ms: u64,
    /// Lifetime of the color-flood and starfield overlays.
    pub overlay_ms: u64,
    /// Length of the result count-up animation.
    pub count_up_ms: u64,
    pub star_count: usize,
    /// Longest wait for the browser to announce its voices before speaking
    /// with the default voice.
    pub voices_timeout_ms: u64,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            speech_rate: 0.9,
            preferred_voice_lang: "en".to_string(),
            popup_dwell_ms: 2000,
            popup_gap_ms: 300,
            overlay_ms: 4000,
            count_up_ms: 2000,
            star_count: 80,
            voices_timeout_ms: 1500,
        }
    }
}

impl QuizConfig {
    pub fn popup_dwell(&self) -> Duration {
        Duration::from_millis(self.popup_dwell_ms)
    }

    pub fn popup_gap(&self) -> Duration {
        Duration::from_millis(self.popup_gap_ms)
    }

    pub fn overlay_duration(&self) -> Duration {
        Duration::from_millis(self.overlay_ms)
    }

    pub fn count_up_duration(&self) -> Duration {
        Duration::from_millis(self.count_up_ms)
    }

    pub fn voices_timeout(&self) -> Duration {
        Duration::from_millis(self.voices_timeout_ms)
    }
}
