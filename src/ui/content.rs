use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Style, Stylize},
    widgets::{Block, BorderType, Paragraph, Widget, Wrap},
};

use crate::app::{App, Focus};
use crate::ui::style::{dim_unless_focused, Palette};

/// Draws the visible module's widget, or a placeholder when nothing is
/// selected yet.
pub fn render_content(app: &mut App, area: Rect, buf: &mut Buffer) {
    let palette = Palette::for_theme(app.themes.current);

    let Some(widget) = app.host.current_widget_mut() else {
        let placeholder = Paragraph::new("Select a module from the sidebar (Enter).")
            .block(
                Block::bordered()
                    .title("All in One")
                    .border_type(BorderType::Rounded),
            )
            .fg(palette.dim)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        placeholder.render(area, buf);
        return;
    };

    widget.render(area, buf);

    // A small focus cue in the bottom-right corner of the content area.
    let focused = app.focus == Focus::Content;
    if focused && area.height > 0 && area.width > 12 {
        let style = dim_unless_focused(focused, Style::default().fg(palette.accent));
        let cue_area = Rect::new(area.x + area.width - 12, area.y + area.height - 1, 11, 1);
        Paragraph::new("[content]")
            .style(style)
            .alignment(Alignment::Right)
            .render(cue_area, buf);
    }
}
