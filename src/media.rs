//! Logical names for the audio and image assets the quiz refers to.
//!
//! Assets are served next to the wasm bundle; swapping a file behind a path
//! does not change behavior.

/// Short sound clips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Dog,
    Cat,
    Pig,
    Cheer,
}

impl SoundCue {
    pub fn path(self) -> &'static str {
        match self {
            SoundCue::Dog => "sounds/dog.mp3",
            SoundCue::Cat => "sounds/cat.mp3",
            SoundCue::Pig => "sounds/pig.mp3",
            SoundCue::Cheer => "sounds/cheer.mp3",
        }
    }

    /// The animal sound an option of the first question stands for.
    pub fn for_option(option: &str) -> Option<Self> {
        match option {
            "Bhau-Bhau" => Some(SoundCue::Dog),
            "Meow-Meow" => Some(SoundCue::Cat),
            "Oink-Oink" => Some(SoundCue::Pig),
            _ => None,
        }
    }
}

/// Illustrations shown as popups during the visual-cue sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PopupImage {
    Shoes,
    IceCream,
    Books,
}

impl PopupImage {
    pub fn path(self) -> &'static str {
        match self {
            PopupImage::Shoes => "images/shoes.png",
            PopupImage::IceCream => "images/ice-cream.png",
            PopupImage::Books => "images/books.png",
        }
    }

    pub fn alt_text(self) -> &'static str {
        match self {
            PopupImage::Shoes => "A pair of shoes",
            PopupImage::IceCream => "A bowl of ice cream",
            PopupImage::Books => "A stack of books",
        }
    }

    pub fn for_option(option: &str) -> Option<Self> {
        match option {
            "Shoes" => Some(PopupImage::Shoes),
            "Ice Cream" => Some(PopupImage::IceCream),
            "Books" => Some(PopupImage::Books),
            _ => None,
        }
    }
}

/// Decorative paw animation shown beside the quiz card.
pub const CAT_PAW_GIF: &str = "images/cat-paw.gif";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QuestionBank;

    #[test]
    fn every_first_question_option_has_a_sound() {
        let bank = QuestionBank::builtin().expect("fixture should load");
        let cues: Vec<Option<SoundCue>> = bank.questions()[0]
            .options
            .iter()
            .map(|option| SoundCue::for_option(option))
            .collect();

        assert_eq!(
            cues,
            vec![Some(SoundCue::Dog), Some(SoundCue::Cat), Some(SoundCue::Pig)]
        );
    }

    #[test]
    fn every_second_question_option_has_an_image() {
        let bank = QuestionBank::builtin().expect("fixture should load");

        assert!(
            bank.questions()[1]
                .options
                .iter()
                .all(|option| PopupImage::for_option(option).is_some())
        );
        assert_eq!(PopupImage::for_option("Yellow"), None);
    }
}
