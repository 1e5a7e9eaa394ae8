//! Colour palette and preset styles.
//!
//! Tier colours follow the web client's green / amber / red so a report
//! reads the same on screen and on paper.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::Tier;

/// Theme for the report client.
pub struct ReportTheme;

impl ReportTheme {
    /// Deep teal accent
    pub const PRIMARY: Color = Color::Rgb(13, 148, 136); // #0D9488

    pub const PRIMARY_LIGHT: Color = Color::Rgb(45, 212, 191); // #2DD4BF

    pub const PRIMARY_DARK: Color = Color::Rgb(15, 118, 110); // #0F766E

    /// Borders and separators
    pub const BORDER: Color = Color::Rgb(148, 163, 184); // #94A3B8

    // Tier colours

    pub const HEALTHY: Color = Color::Rgb(76, 175, 80); // #4CAF50

    pub const CAUTION: Color = Color::Rgb(255, 152, 0); // #FF9800

    pub const ALERT: Color = Color::Rgb(244, 67, 54); // #F44336

    pub const BG_DARK: Color = Color::Rgb(15, 23, 42); // #0F172A

    pub const TEXT_PRIMARY: Color = Color::Rgb(248, 250, 252); // #F8FAFC

    pub const TEXT_SECONDARY: Color = Color::Rgb(148, 163, 184); // #94A3B8

    pub const TEXT_MUTED: Color = Color::Rgb(100, 116, 139); // #64748B

    #[must_use]
    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn subtitle() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    #[must_use]
    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    #[must_use]
    pub fn text_muted() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    #[must_use]
    pub fn danger() -> Style {
        Style::default().fg(Self::ALERT)
    }

    /// Active choice in a toggle (language, gender)
    #[must_use]
    pub fn selected() -> Style {
        Style::default()
            .fg(Self::BG_DARK)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn focused() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn cursor() -> Style {
        Style::default().fg(Self::PRIMARY_LIGHT)
    }

    #[must_use]
    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    #[must_use]
    pub fn border_focused() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    #[must_use]
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Foreground colour of a score or BMI tier.
    #[must_use]
    pub fn tier_color(tier: Tier) -> Color {
        match tier {
            Tier::Healthy => Self::HEALTHY,
            Tier::Caution => Self::CAUTION,
            Tier::Alert => Self::ALERT,
        }
    }

    #[must_use]
    pub fn tier(tier: Tier) -> Style {
        Style::default()
            .fg(Self::tier_color(tier))
            .add_modifier(Modifier::BOLD)
    }

    /// Banner across the form while an error is up.
    #[must_use]
    pub fn error_banner() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .bg(Self::ALERT)
            .add_modifier(Modifier::BOLD)
    }
}
