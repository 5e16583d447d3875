use rand::Rng;

use crate::media::SoundCue;

const SOUND_QUESTION_ID: u32 = 1;
const COLOR_QUESTION_ID: u32 = 3;
const STARS_QUESTION_ID: u32 = 4;

/// Inline layout for the full-screen overlays, so they cover the viewport
/// even before the stylesheet loads.
const OVERLAY_LAYOUT: &str = "position:fixed;inset:0;z-index:60;pointer-events:auto;";

/// Inline style for the starfield backdrop.
pub fn starfield_style() -> String {
    format!("{}overflow:hidden;background-color:#020617;", OVERLAY_LAYOUT)
}

/// Presentation trigger fired when an option is selected.
///
/// These are keyed to specific questions of the built-in bank and are not a
/// general rule for other questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEffect {
    /// Play a one-shot sound immediately.
    Sound(SoundCue),
    /// Flood the screen with a color for the overlay duration, then dismiss.
    ColorFlood(FloodColor),
    /// Show the starfield for the overlay duration, then dismiss and reveal the result.
    Starfield,
}

impl SelectionEffect {
    /// Whether the effect ends by revealing the result without the usual answer gate.
    pub fn finishes_quiz(self) -> bool {
        matches!(self, SelectionEffect::Starfield)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloodColor {
    Blue,
    Yellow,
    Red,
}

impl FloodColor {
    pub fn for_option(option: &str) -> Option<Self> {
        match option {
            "Blue" => Some(FloodColor::Blue),
            "Yellow" => Some(FloodColor::Yellow),
            "Red" => Some(FloodColor::Red),
            _ => None,
        }
    }

    /// Inline style for the full-screen flood in this color.
    pub fn overlay_style(self) -> String {
        format!("{}background-color:{};", OVERLAY_LAYOUT, self.css())
    }

    pub fn css(self) -> &'static str {
        match self {
            FloodColor::Blue => "#3b82f6",
            FloodColor::Yellow => "#facc15",
            FloodColor::Red => "#ef4444",
        }
    }
}

/// Maps a selection to its cosmetic effect by literal question id.
pub fn selection_effect(question_id: u32, option: &str) -> Option<SelectionEffect> {
    match question_id {
        SOUND_QUESTION_ID => SoundCue::for_option(option).map(SelectionEffect::Sound),
        COLOR_QUESTION_ID => FloodColor::for_option(option).map(SelectionEffect::ColorFlood),
        STARS_QUESTION_ID => Some(SelectionEffect::Starfield),
        _ => None,
    }
}

/// One star of the starfield overlay. Positions are percentages of the viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub left: f32,
    pub top: f32,
    /// Diameter in pixels.
    pub size: f32,
    /// Peak opacity of the twinkle animation.
    pub opacity: f32,
    /// Peak scale of the twinkle animation.
    pub scale: f32,
    /// Twinkle period in milliseconds.
    pub period_ms: u32,
    /// Animation start offset in milliseconds.
    pub delay_ms: u32,
}

impl Star {
    pub fn style(&self) -> String {
        format!(
            "position:absolute;left:{:.2}%;top:{:.2}%;width:{:.1}px;height:{:.1}px;--star-opacity:{:.2};--star-scale:{:.2};animation:twinkle {}ms ease-in-out {}ms infinite;",
            self.left,
            self.top,
            self.size,
            self.size,
            self.opacity,
            self.scale,
            self.period_ms,
            self.delay_ms
        )
    }
}

/// Generates `count` randomly placed stars.
///
/// Deterministic for a seeded generator, which keeps the layout testable.
pub fn generate_starfield<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<Star> {
    (0..count)
        .map(|_| Star {
            left: rng.gen_range(0.0..100.0),
            top: rng.gen_range(0.0..100.0),
            size: rng.gen_range(1.0..4.0),
            opacity: rng.gen_range(0.4..1.0),
            scale: rng.gen_range(1.0..1.8),
            period_ms: rng.gen_range(1200..3200),
            delay_ms: rng.gen_range(0..1500),
        })
        .collect()
}
