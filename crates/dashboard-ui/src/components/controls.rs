//! Input controls drawn as bordered blocks: a `◀ value ▶` selector and a
//! checkbox list.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::state::MultiSelect;
use crate::themes::Theme;

fn control_block<'a>(title: String, focused: bool, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style(focused))
        .title(Span::styled(format!(" {} ", title), theme.label))
}

/// The text of a selector, e.g. `"◀ 1 Day ▶"`.
pub fn selector_text(value: &str) -> String {
    format!("◀ {} ▶", value)
}

/// Render a single-value selector changed with Left / Right.
pub fn render_selector(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    value: &str,
    focused: bool,
    theme: &Theme,
) {
    let style = if focused { theme.bold } else { theme.text };
    let paragraph = Paragraph::new(Line::from(Span::styled(selector_text(value), style)))
        .block(control_block(title.to_string(), focused, theme));
    frame.render_widget(paragraph, area);
}

/// Render a checkbox list.  The cursor is highlighted only while focused.
pub fn render_multiselect(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    select: &MultiSelect,
    focused: bool,
    theme: &Theme,
) {
    let heading = format!(
        "{} ({}/{})",
        title,
        select.selected().len(),
        select.options().len()
    );
    let block = control_block(heading, focused, theme);

    if select.options().is_empty() {
        let empty = Paragraph::new(Span::styled("No options", theme.dim)).block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = select
        .options()
        .iter()
        .map(|option| {
            let checked = select.is_selected(option);
            let (mark, style) = if checked {
                ("[x] ", theme.selected)
            } else {
                ("[ ] ", theme.dim)
            };
            ListItem::new(Line::from(vec![
                Span::styled(mark, style),
                Span::styled(option.clone(), theme.text),
            ]))
        })
        .collect();

    let mut list = List::new(items).block(block);
    if focused {
        list = list.highlight_style(theme.cursor);
    }
    let mut list_state = ListState::default().with_selected(Some(select.cursor()));
    frame.render_stateful_widget(list, area, &mut list_state);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
