//! Kiosk languages and the warning overlay text

use std::{fmt, str::FromStr};
use serde::{Deserialize, Serialize};

/// Languages offered on the kiosk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Fr,
    Eus,
}

/// Language entry as listed by the language picker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageInfo {
    pub code: String,
    pub name: String,
    pub native_name: String,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Fr, Language::Eus];

    pub fn code(&self) -> &'static str {
        match self {
            Language::Fr => "fr",
            Language::Eus => "eus",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::Fr => "Français",
            Language::Eus => "Basque",
        }
    }

    pub fn native_name(&self) -> &'static str {
        match self {
            Language::Fr => "Français",
            Language::Eus => "Euskara",
        }
    }

    pub fn info(&self) -> LanguageInfo {
        LanguageInfo {
            code: self.code().to_string(),
            name: self.name().to_string(),
            native_name: self.native_name().to_string(),
        }
    }

    /// Exact kiosk code lookup (`fr` or `eus`)
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.code() == code)
    }

    /// Pick a language from a browser or system locale tag such as `eu-ES`
    /// or `eu_ES.UTF-8`. Anything that is not Basque falls back to French.
    pub fn detect(tag: &str) -> Self {
        let primary = tag
            .split(|c: char| c == '-' || c == '_' || c == '.')
            .next()
            .unwrap_or_default()
            .to_lowercase();

        match primary.as_str() {
            "eu" | "eus" => Language::Eus,
            _ => Language::Fr,
        }
    }

    /// Text of the "return to idle screen" warning overlay
    pub fn warning_message(&self) -> &'static str {
        match self {
            Language::Fr => "Cliquez si vous ne voulez pas revenir à l'écran de veille",
            Language::Eus => "Egin klik ez baduzu pantaila atsedeneko itzuli nahi",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| format!("Unsupported language: {}", s))
    }
}

/// Warning text for a raw language code, French when unrecognised
pub fn warning_message(code: &str) -> &'static str {
    Language::from_code(code).unwrap_or_default().warning_message()
}

/// All languages offered on the kiosk
pub fn available_languages() -> Vec<LanguageInfo> {
    Language::ALL.iter().map(Language::info).collect()
}
