use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::app::App;
use crate::ui::style::Palette;

/// One-line bar: transient notices take priority, otherwise the current
/// module's menu actions plus the global key hints.
pub fn render_status_bar(app: &App, area: Rect, buf: &mut Buffer) {
    let palette = Palette::for_theme(app.themes.current);

    if let Some(notice) = &app.status {
        Paragraph::new(Line::from(Span::styled(
            format!(" {}", notice),
            Style::default().fg(palette.note_marker),
        )))
        .render(area, buf);
        return;
    }

    let mut spans: Vec<Span> = Vec::new();

    if let Some(current) = app.host.current() {
        if let Some(module) = app.registry.get(current) {
            for (i, action) in module.panel.menu_actions().iter().enumerate() {
                spans.push(Span::styled(
                    format!(" F{}:{}", i + 1, action.label),
                    Style::default().fg(palette.accent),
                ));
            }
        }
    }

    spans.push(Span::styled(
        "  Tab:focus  Enter:open  t:theme  m:manage  r:reload  q:quit",
        Style::default().fg(palette.dim),
    ));
    spans.push(Span::styled(
        format!("  [{}]", app.themes.current.as_str()),
        Style::default().fg(palette.dim),
    ));

    Paragraph::new(Line::from(spans)).render(area, buf);
}
