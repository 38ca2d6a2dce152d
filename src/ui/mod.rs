pub mod content;
pub mod manager_dialog;
pub mod sidebar;
pub mod status_bar;
pub mod style;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    widgets::Widget,
};

use crate::app::{App, AppMode};

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [main_area, status_area] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);
        let [sidebar_area, content_area] =
            Layout::horizontal([Constraint::Length(24), Constraint::Min(10)]).areas(main_area);

        sidebar::render_sidebar(self, sidebar_area, buf);
        content::render_content(self, content_area, buf);
        status_bar::render_status_bar(self, status_area, buf);

        if self.mode == AppMode::ManagerDialog {
            let popup_area = centered_rect(50, 60, area);
            manager_dialog::render_manager_dialog(self, popup_area, buf);
        }
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
