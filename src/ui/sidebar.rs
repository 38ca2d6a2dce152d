use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, List, ListItem, Paragraph, Widget, Wrap},
};

use crate::app::{App, Focus};
use crate::ui::style::{dim_unless_focused, Palette};

pub fn render_sidebar(app: &App, area: Rect, buf: &mut Buffer) {
    let palette = Palette::for_theme(app.themes.current);
    let descriptors = app.registry.descriptors();

    if descriptors.is_empty() {
        let empty_msg = Paragraph::new(
            "No modules active.\n\nPlace module directories in ./modules/ (each with a module.yml) or press 'm' to manage enablement.",
        )
        .block(
            Block::bordered()
                .title("Modules")
                .border_type(BorderType::Rounded),
        )
        .fg(palette.dim)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        empty_msg.render(area, buf);
        return;
    }

    let items: Vec<ListItem> = descriptors
        .iter()
        .enumerate()
        .map(|(i, descriptor)| {
            let style = if i == app.sidebar_index {
                Style::default()
                    .bg(palette.highlight_bg)
                    .fg(palette.highlight_fg)
            } else {
                Style::default()
            };

            let marker = if app.host.current() == Some(descriptor.identifier.as_str()) {
                "> "
            } else {
                "  "
            };

            let line = Line::from(vec![
                Span::raw(marker),
                Span::styled(
                    descriptor.display_name.clone(),
                    style.add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(" ({})", descriptor.category),
                    Style::default().fg(palette.dim),
                ),
            ]);

            ListItem::new(line).style(style)
        })
        .collect();

    let focused = app.focus == Focus::Sidebar;
    let list = List::new(items).block(
        Block::bordered()
            .title(format!("Modules ({})", descriptors.len()))
            .border_type(BorderType::Rounded)
            .border_style(dim_unless_focused(
                focused,
                Style::default().fg(palette.accent),
            )),
    );

    list.render(area, buf);
}
