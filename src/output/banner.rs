//! Section banners.

use terminal_size::{terminal_size, Width};

use super::colors::*;

const DEFAULT_TERMINAL_WIDTH: u16 = 80;
const MIN_BANNER_WIDTH: usize = 20;
const MAX_BANNER_WIDTH: usize = 80;

/// Color options for banners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BannerColor {
    /// Cyan - informational reports
    Cyan,
    /// Green - healthy server
    Green,
    /// Red - unreachable server
    Red,
    /// Yellow - server reachable but not healthy
    Yellow,
}

impl BannerColor {
    /// Get the ANSI color code for this banner color.
    pub fn ansi_code(&self) -> &'static str {
        match self {
            BannerColor::Cyan => CYAN,
            BannerColor::Green => GREEN,
            BannerColor::Red => RED,
            BannerColor::Yellow => YELLOW,
        }
    }
}

fn get_terminal_width_for_banner() -> usize {
    terminal_size()
        .map(|(Width(w), _)| w as usize)
        .unwrap_or(DEFAULT_TERMINAL_WIDTH as usize)
}

/// Build a banner of the form `━━━ TITLE ━━━`, `width` columns wide
/// (clamped between MIN and MAX), without color codes.
pub fn format_banner(title: &str, width: usize) -> String {
    let banner_width = width.clamp(MIN_BANNER_WIDTH, MAX_BANNER_WIDTH);

    let title_with_spaces = format!(" {} ", title);
    let title_len = title_with_spaces.chars().count();

    let remaining = banner_width.saturating_sub(title_len);
    let left_padding = remaining / 2;
    let right_padding = remaining - left_padding;

    format!(
        "{}{}{}",
        "━".repeat(left_padding),
        title_with_spaces,
        "━".repeat(right_padding)
    )
}

/// Print a color-coded banner sized to the terminal.
pub fn print_banner(title: &str, color: BannerColor) {
    let banner = format_banner(title, get_terminal_width_for_banner());
    println!("{}{BOLD}{}{RESET}", color.ansi_code(), banner);
}
