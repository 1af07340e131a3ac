use crate::themes::Theme;
use ratatui::text::{Line, Span};

/// Dashboard title shown on the first header line.
pub const TITLE: &str = "HUMAN SURVEILLANCE";

/// Dashboard header rendering three lines:
///
/// 1. The title.
/// 2. A 60-column `=` separator.
/// 3. `[ timezone | shown of total events ]`.
pub struct Header<'a> {
    /// IANA name of the dataset timezone.
    pub timezone: &'a str,
    /// Events left after filtering.
    pub shown: usize,
    /// Events loaded from the usage log.
    pub total: usize,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(timezone: &'a str, shown: usize, total: usize, theme: &'a Theme) -> Self {
        Self {
            timezone,
            shown,
            total,
            theme,
        }
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let separator = "=".repeat(60);

        vec![
            Line::from(Span::styled(TITLE, self.theme.header)),
            Line::from(Span::styled(separator, self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(self.timezone, self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(
                    format!("{} of {} events", self.shown, self.total),
                    self.theme.value,
                ),
                Span::styled(" ]", self.theme.label),
            ]),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
