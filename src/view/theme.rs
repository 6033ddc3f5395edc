use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tabled::settings::Style;
use tabled::Table;

/// Presentation variant. Themes change borders and colours, never content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Plain,
    Light,
    Dark,
}

/// What a piece of text means, so each theme can colour it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Heading,
    Muted,
    Positive,
    Negative,
    Accent,
}

impl Theme {
    pub fn style_table(self, table: &mut Table) {
        match self {
            Theme::Plain => table.with(Style::rounded()),
            Theme::Light => table.with(Style::modern()),
            Theme::Dark => table.with(Style::sharp()),
        };
    }

    fn ansi_code(self, role: Role) -> Option<&'static str> {
        match (self, role) {
            (Theme::Plain, _) => None,
            (Theme::Light, Role::Heading) => Some("1;30"),
            (Theme::Light, Role::Muted) => Some("90"),
            (Theme::Light, Role::Positive) => Some("1;32"),
            (Theme::Light, Role::Negative) => Some("31"),
            (Theme::Light, Role::Accent) => Some("34"),
            (Theme::Dark, Role::Heading) => Some("1;97"),
            (Theme::Dark, Role::Muted) => Some("37"),
            (Theme::Dark, Role::Positive) => Some("1;92"),
            (Theme::Dark, Role::Negative) => Some("91"),
            (Theme::Dark, Role::Accent) => Some("96"),
        }
    }

    pub fn paint(self, role: Role, text: &str) -> String {
        match self.ansi_code(role) {
            Some(code) => format!("\x1b[{code}m{text}\x1b[0m"),
            None => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_theme_leaves_text_untouched() {
        assert_eq!(Theme::Plain.paint(Role::Negative, "x"), "x");
    }

    #[test]
    fn test_coloured_themes_wrap_text() {
        let light = Theme::Light.paint(Role::Positive, "ok");
        let dark = Theme::Dark.paint(Role::Positive, "ok");
        assert!(light.contains("ok") && light.starts_with("\x1b["));
        assert_ne!(light, dark);
    }
}
