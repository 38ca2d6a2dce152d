use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Clear, List, ListItem, Widget},
};

use crate::app::App;
use crate::ui::style::Palette;

/// Popup for toggling per-module enablement. Lists every installable
/// directory, enabled or not; changes take effect when the dialog closes
/// and the registry reloads.
pub fn render_manager_dialog(app: &App, area: Rect, buf: &mut Buffer) {
    let palette = Palette::for_theme(app.themes.current);

    Clear.render(area, buf);

    let items: Vec<ListItem> = app
        .manager
        .rows
        .iter()
        .enumerate()
        .map(|(i, (identifier, enabled))| {
            let checkbox = if *enabled { "[x]" } else { "[ ]" };
            let mut style = Style::default().fg(palette.text);
            if i == app.manager.selected {
                style = style
                    .bg(palette.highlight_bg)
                    .fg(palette.highlight_fg)
                    .add_modifier(Modifier::BOLD);
            }
            let line = Line::from(vec![
                Span::styled(format!("{} ", checkbox), style),
                Span::styled(identifier.clone(), style),
            ]);
            ListItem::new(line).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::bordered()
            .title("Manage modules (Space toggles, Esc applies & closes)")
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(palette.accent)),
    );

    list.render(area, buf);
}
