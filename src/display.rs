//! Adjustable text sizing

use std::{fmt, str::FromStr};
use serde::{Deserialize, Serialize};

/// Text size selected on the kiosk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextSize {
    Small,
    #[default]
    Medium,
    Large,
}

/// Values of the CSS custom properties driven by the text size
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextSizeVars {
    #[serde(rename = "--text-size-base")]
    pub base: &'static str,
    #[serde(rename = "--text-size-large")]
    pub large: &'static str,
    #[serde(rename = "--text-size-xlarge")]
    pub xlarge: &'static str,
}

impl TextSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextSize::Small => "small",
            TextSize::Medium => "medium",
            TextSize::Large => "large",
        }
    }

    pub fn css_vars(&self) -> TextSizeVars {
        let (base, large, xlarge) = match self {
            TextSize::Small => ("1.25rem", "1.75rem", "2.5rem"),
            TextSize::Medium => ("1.5rem", "2.5rem", "4rem"),
            TextSize::Large => ("2rem", "3rem", "5rem"),
        };
        TextSizeVars { base, large, xlarge }
    }
}

impl fmt::Display for TextSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TextSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "small" => Ok(TextSize::Small),
            "medium" => Ok(TextSize::Medium),
            "large" => Ok(TextSize::Large),
            other => Err(format!("Unsupported text size: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn medium_is_default() {
        assert_eq!(TextSize::default(), TextSize::Medium);
        assert_eq!(TextSize::default().css_vars().xlarge, "4rem");
    }

    #[test]
    fn css_vars_serialize_as_custom_properties() {
        let json = serde_json::to_value(TextSize::Large.css_vars()).unwrap();
        assert_eq!(json["--text-size-base"], "2rem");
        assert_eq!(json["--text-size-large"], "3rem");
        assert_eq!(json["--text-size-xlarge"], "5rem");
    }

    #[test]
    fn parses_known_sizes_only() {
        assert_eq!("small".parse::<TextSize>(), Ok(TextSize::Small));
        assert!("huge".parse::<TextSize>().is_err());
    }
}
