//! Visitor-facing display preferences

use serde::{Deserialize, Serialize};

use crate::{display::TextSize, i18n::Language};

/// Language and text size currently applied on the kiosk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub language: Language,
    pub text_size: TextSize,
}

impl Preferences {
    pub fn new(language: Language, text_size: TextSize) -> Self {
        Self { language, text_size }
    }
}
