use ratatui::style::{Color, Modifier, Style};

/// Whether the terminal paints on a dark or a light background.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
}

/// Guess the background from the last field of `COLORFGBG` (`"fg;bg"`).
///
/// Colour indices 7 and up count as light. Anything missing or unparsable
/// is treated as dark.
pub fn detect_background() -> BackgroundType {
    if let Ok(val) = std::env::var("COLORFGBG") {
        if let Some(bg) = val.split(';').next_back() {
            if let Ok(bg_num) = bg.parse::<u8>() {
                return if bg_num <= 6 {
                    BackgroundType::Dark
                } else {
                    BackgroundType::Light
                };
            }
        }
    }
    BackgroundType::Dark
}

/// Every style the dashboard widgets draw with.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub separator: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub bold: Style,
    pub label: Style,
    pub value: Style,

    // ── Status ───────────────────────────────────────────────────────────────
    pub warning: Style,
    pub error: Style,

    // ── Sidebar controls ─────────────────────────────────────────────────────
    /// Border of the control that has keyboard focus.
    pub focus_border: Style,
    /// Border of every other control.
    pub border: Style,
    /// Multi-select item under the cursor.
    pub cursor: Style,
    /// Checked multi-select item.
    pub selected: Style,

    // ── Charts ───────────────────────────────────────────────────────────────
    pub chart_line: Style,
    pub chart_bar: Style,
    pub chart_axis: Style,
    /// One colour per category, reused cyclically.
    pub category_palette: Vec<Color>,
    /// Heatmap cell backgrounds from lowest to highest usage.
    pub heatmap_scale: Vec<Color>,

    // ── Table ────────────────────────────────────────────────────────────────
    pub table_header: Style,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Palette for dark terminals; the default.
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            bold: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            focus_border: Style::default().fg(Color::Cyan),
            border: Style::default().fg(Color::DarkGray),
            cursor: Style::default().add_modifier(Modifier::REVERSED),
            selected: Style::default().fg(Color::Green),

            chart_line: Style::default().fg(Color::Cyan),
            chart_bar: Style::default().fg(Color::Blue),
            chart_axis: Style::default().fg(Color::Gray),
            category_palette: vec![
                Color::Rgb(99, 110, 250),
                Color::Rgb(239, 85, 59),
                Color::Rgb(0, 204, 150),
                Color::Rgb(171, 99, 250),
                Color::Rgb(255, 161, 90),
                Color::Rgb(25, 211, 243),
                Color::Rgb(255, 102, 146),
                Color::Rgb(182, 232, 128),
            ],
            heatmap_scale: vec![
                Color::Rgb(13, 8, 135),
                Color::Rgb(106, 0, 168),
                Color::Rgb(177, 42, 144),
                Color::Rgb(225, 100, 98),
                Color::Rgb(252, 166, 54),
                Color::Rgb(240, 249, 33),
            ],

            table_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Palette for light terminals.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            separator: Style::default().fg(Color::Gray),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            bold: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            focus_border: Style::default().fg(Color::Blue),
            border: Style::default().fg(Color::Gray),
            cursor: Style::default().add_modifier(Modifier::REVERSED),
            selected: Style::default().fg(Color::Green),

            chart_line: Style::default().fg(Color::Blue),
            chart_bar: Style::default().fg(Color::Blue),
            chart_axis: Style::default().fg(Color::DarkGray),
            category_palette: vec![
                Color::Rgb(31, 119, 180),
                Color::Rgb(255, 127, 14),
                Color::Rgb(44, 160, 44),
                Color::Rgb(214, 39, 40),
                Color::Rgb(148, 103, 189),
                Color::Rgb(140, 86, 75),
                Color::Rgb(227, 119, 194),
                Color::Rgb(23, 190, 207),
            ],
            heatmap_scale: vec![
                Color::Rgb(255, 255, 204),
                Color::Rgb(255, 237, 160),
                Color::Rgb(254, 178, 76),
                Color::Rgb(253, 141, 60),
                Color::Rgb(240, 59, 32),
                Color::Rgb(189, 0, 38),
            ],

            table_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Classic theme restricted to the basic ANSI palette, without bold.
    pub fn classic() -> Self {
        Self {
            header: Style::default().fg(Color::Cyan),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            bold: Style::default().fg(Color::White),
            label: Style::default().fg(Color::Gray),
            value: Style::default().fg(Color::White),

            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            focus_border: Style::default().fg(Color::Yellow),
            border: Style::default().fg(Color::DarkGray),
            cursor: Style::default().add_modifier(Modifier::REVERSED),
            selected: Style::default().fg(Color::Green),

            chart_line: Style::default().fg(Color::Green),
            chart_bar: Style::default().fg(Color::Cyan),
            chart_axis: Style::default().fg(Color::White),
            category_palette: vec![
                Color::Blue,
                Color::Red,
                Color::Green,
                Color::Magenta,
                Color::Yellow,
                Color::Cyan,
            ],
            heatmap_scale: vec![
                Color::Black,
                Color::Blue,
                Color::Magenta,
                Color::Red,
                Color::Yellow,
            ],

            table_header: Style::default().fg(Color::Cyan),
        }
    }

    /// Dark or light, following [`detect_background`].
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            BackgroundType::Dark => Self::dark(),
        }
    }

    /// `--theme` value to palette; `auto` and unrecognised names detect.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    /// Colour of the `index`-th category, wrapping around the palette.
    pub fn category_color(&self, index: usize) -> Color {
        if self.category_palette.is_empty() {
            return Color::Reset;
        }
        self.category_palette[index % self.category_palette.len()]
    }

    /// Cell style for a heatmap value at `ratio` of the matrix maximum.
    ///
    /// `ratio` is clamped to `0.0..=1.0`; the text colour flips on the upper
    /// half of the scale so labels stay legible.
    pub fn heatmap_style(&self, ratio: f64) -> Style {
        let steps = self.heatmap_scale.len();
        if steps == 0 {
            return self.text;
        }
        let ratio = if ratio.is_finite() {
            ratio.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let idx = ((ratio * (steps - 1) as f64).round() as usize).min(steps - 1);
        let fg = if idx * 2 >= steps {
            Color::Black
        } else {
            Color::White
        };
        Style::default().bg(self.heatmap_scale[idx]).fg(fg)
    }

    /// Border style of a sidebar control.
    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            self.focus_border
        } else {
            self.border
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Theme construction ───────────────────────────────────────────────────

    #[test]
    fn test_dark_theme_creation() {
        let t = Theme::dark();
        assert_eq!(t.header.fg, Some(Color::Cyan));
        assert_eq!(t.warning.fg, Some(Color::Yellow));
        assert_eq!(t.error.fg, Some(Color::Red));
        assert!(!t.category_palette.is_empty());
        assert!(t.heatmap_scale.len() >= 2);
    }

    #[test]
    fn test_light_theme_creation() {
        let t = Theme::light();
        assert_eq!(t.header.fg, Some(Color::Blue));
        assert_eq!(t.text.fg, Some(Color::Black));
        assert_eq!(t.focus_border.fg, Some(Color::Blue));
    }

    #[test]
    fn test_classic_theme_creation() {
        let t = Theme::classic();
        assert!(!t.bold.add_modifier.contains(Modifier::BOLD));
        assert!(!t.table_header.add_modifier.contains(Modifier::BOLD));
        assert!(t
            .category_palette
            .iter()
            .all(|c| !matches!(c, Color::Rgb(..))));
    }

    #[test]
    fn test_from_name_known() {
        assert_eq!(Theme::from_name("dark").header.fg, Some(Color::Cyan));
        assert_eq!(Theme::from_name("light").header.fg, Some(Color::Blue));
        let classic = Theme::from_name("classic");
        assert!(!classic.header.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_from_name_unknown_falls_back() {
        let t = Theme::from_name("does-not-exist");
        assert!(t.header.fg.is_some());
    }

    // ── category_color ───────────────────────────────────────────────────────

    #[test]
    fn test_category_color_wraps() {
        let t = Theme::classic();
        let n = t.category_palette.len();
        assert_eq!(t.category_color(0), t.category_color(n));
        assert_ne!(t.category_color(0), t.category_color(1));
    }

    // ── heatmap_style ────────────────────────────────────────────────────────

    #[test]
    fn test_heatmap_style_endpoints() {
        let t = Theme::dark();
        let first = t.heatmap_scale[0];
        let last = *t.heatmap_scale.last().unwrap();
        assert_eq!(t.heatmap_style(0.0).bg, Some(first));
        assert_eq!(t.heatmap_style(1.0).bg, Some(last));
    }

    #[test]
    fn test_heatmap_style_clamps_out_of_range() {
        let t = Theme::dark();
        assert_eq!(t.heatmap_style(-3.0).bg, t.heatmap_style(0.0).bg);
        assert_eq!(t.heatmap_style(7.5).bg, t.heatmap_style(1.0).bg);
        assert_eq!(t.heatmap_style(f64::NAN).bg, t.heatmap_style(0.0).bg);
    }

    #[test]
    fn test_heatmap_style_monotonic_index() {
        let t = Theme::light();
        let position = |ratio: f64| {
            let bg = t.heatmap_style(ratio).bg.unwrap();
            t.heatmap_scale.iter().position(|c| *c == bg).unwrap()
        };
        assert!(position(0.2) <= position(0.5));
        assert!(position(0.5) <= position(0.9));
    }

    #[test]
    fn test_border_style() {
        let t = Theme::dark();
        assert_eq!(t.border_style(true), t.focus_border);
        assert_eq!(t.border_style(false), t.border);
    }
}
