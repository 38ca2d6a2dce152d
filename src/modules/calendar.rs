//! Calendar panel: a month grid with a free-text note per date, persisted
//! as a date-keyed JSON object.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use chrono::{Datelike, Days, Local, Months, NaiveDate};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph, Widget, Wrap},
};
use ratatui::crossterm::event::{KeyCode, KeyEvent};

use crate::error::Result;
use crate::event::AppEvent;
use crate::module::{
    Cleanable, ContentWidget, MenuAction, ModulePanel, Showable, Themeable,
};
use crate::theme::Theme;
use crate::ui::style::Palette;
use crate::{log_info, log_warn};

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Date-keyed note storage (`calendar_notes.json`).
#[derive(Debug)]
pub struct CalendarNotes {
    path: PathBuf,
    notes: BTreeMap<String, String>,
}

impl CalendarNotes {
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let notes = if path.exists() {
            match fs::read_to_string(&path) {
                Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                    log_warn!("Malformed calendar notes file {:?}: {}", path, e);
                    BTreeMap::new()
                }),
                Err(e) => {
                    log_warn!("Failed to read calendar notes {:?}: {}", path, e);
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };
        Self { path, notes }
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&self.notes)?;
        fs::write(&self.path, contents)?;
        Ok(())
    }

    fn key(date: NaiveDate) -> String {
        date.format(DATE_KEY_FORMAT).to_string()
    }

    pub fn note_for(&self, date: NaiveDate) -> Option<&str> {
        self.notes.get(&Self::key(date)).map(String::as_str)
    }

    pub fn has_note(&self, date: NaiveDate) -> bool {
        self.notes.contains_key(&Self::key(date))
    }

    /// Stores the note, removing the entry when the text is empty.
    pub fn set_note(&mut self, date: NaiveDate, text: &str) {
        if text.trim().is_empty() {
            self.notes.remove(&Self::key(date));
        } else {
            self.notes.insert(Self::key(date), text.to_string());
        }
    }

    pub fn clear(&mut self) {
        self.notes.clear();
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

#[derive(Debug)]
struct CalendarShared {
    notes: CalendarNotes,
    theme: Theme,
}

/// The module instance. Shares its note store with the widget; the
/// lifecycle hooks flush and refresh it.
pub struct CalendarModule {
    shared: Rc<RefCell<CalendarShared>>,
}

impl CalendarModule {
    pub fn new<P: AsRef<Path>>(notes_path: P) -> Self {
        Self {
            shared: Rc::new(RefCell::new(CalendarShared {
                notes: CalendarNotes::load(notes_path),
                theme: Theme::Light,
            })),
        }
    }
}

impl ModulePanel for CalendarModule {
    fn create_content_widget(&mut self) -> Result<Box<dyn ContentWidget>> {
        Ok(Box::new(CalendarWidget {
            shared: self.shared.clone(),
            selected: Local::now().date_naive(),
            editing: false,
            draft: String::new(),
        }))
    }

    fn menu_actions(&self) -> Vec<MenuAction> {
        vec![MenuAction::new("clear_notes", "Clear all notes")]
    }

    fn invoke_menu_action(&mut self, action_id: &str) -> Result<Option<String>> {
        match action_id {
            "clear_notes" => {
                let mut shared = self.shared.borrow_mut();
                let count = shared.notes.len();
                shared.notes.clear();
                shared.notes.save()?;
                Ok(Some(format!("Cleared {} calendar note(s)", count)))
            }
            _ => Ok(None),
        }
    }

    fn as_themeable(&mut self) -> Option<&mut dyn Themeable> {
        Some(self)
    }

    fn as_showable(&mut self) -> Option<&mut dyn Showable> {
        Some(self)
    }

    fn as_cleanable(&mut self) -> Option<&mut dyn Cleanable> {
        Some(self)
    }
}

impl Themeable for CalendarModule {
    fn on_theme_changed(&mut self, theme: Theme) {
        self.shared.borrow_mut().theme = theme;
    }
}

impl Showable for CalendarModule {
    fn on_shown(&mut self) {
        // Pick up notes written outside this session.
        let mut shared = self.shared.borrow_mut();
        let path = shared.notes.path.clone();
        shared.notes = CalendarNotes::load(path);
    }
}

impl Cleanable for CalendarModule {
    fn cleanup(&mut self) {
        if let Err(e) = self.shared.borrow().notes.save() {
            log_warn!("Failed to save calendar notes during cleanup: {}", e);
        }
        log_info!("Calendar module cleaned up");
    }
}

struct CalendarWidget {
    shared: Rc<RefCell<CalendarShared>>,
    selected: NaiveDate,
    editing: bool,
    draft: String,
}

impl CalendarWidget {
    fn move_selection(&mut self, days: i64) {
        let delta = Days::new(days.unsigned_abs());
        self.selected = if days >= 0 {
            self.selected.checked_add_days(delta).unwrap_or(self.selected)
        } else {
            self.selected.checked_sub_days(delta).unwrap_or(self.selected)
        };
    }

    fn move_month(&mut self, forward: bool) {
        let month = Months::new(1);
        self.selected = if forward {
            self.selected.checked_add_months(month).unwrap_or(self.selected)
        } else {
            self.selected.checked_sub_months(month).unwrap_or(self.selected)
        };
    }

    fn begin_edit(&mut self) {
        self.draft = self
            .shared
            .borrow()
            .notes
            .note_for(self.selected)
            .unwrap_or_default()
            .to_string();
        self.editing = true;
    }

    fn commit_edit(&mut self) -> AppEvent {
        self.editing = false;
        let mut shared = self.shared.borrow_mut();
        shared.notes.set_note(self.selected, &self.draft);
        match shared.notes.save() {
            Ok(()) => AppEvent::Notice(format!("Note saved for {}", self.selected)),
            Err(e) => AppEvent::Notice(format!("Failed to save note: {}", e)),
        }
    }

    fn render_month_grid(&self, area: Rect, buf: &mut Buffer, palette: &Palette) {
        let today = Local::now().date_naive();
        let first = self.selected.with_day(1).unwrap_or(self.selected);
        let offset = first.weekday().num_days_from_monday() as usize;
        let days_in_month = days_in_month(first);
        let shared = self.shared.borrow();

        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(
            Span::styled("Mo Tu We Th Fr Sa Su", Style::default().fg(palette.dim)),
        ));

        let mut spans: Vec<Span> = vec![Span::raw("   ".repeat(offset))];
        for day in 1..=days_in_month {
            let date = first.with_day(day).unwrap_or(first);
            let mut style = Style::default().fg(palette.text);
            if shared.notes.has_note(date) {
                style = style.fg(palette.note_marker);
            }
            if date == today {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            if date == self.selected {
                style = style.bg(palette.highlight_bg).fg(palette.highlight_fg);
            }
            spans.push(Span::styled(format!("{:>2}", day), style));
            spans.push(Span::raw(" "));

            if (day as usize + offset) % 7 == 0 {
                lines.push(Line::from(std::mem::take(&mut spans)));
            }
        }
        if !spans.is_empty() {
            lines.push(Line::from(spans));
        }

        let title = self.selected.format("%B %Y").to_string();
        Paragraph::new(lines)
            .block(
                Block::bordered()
                    .title(title)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(palette.accent)),
            )
            .alignment(Alignment::Center)
            .render(area, buf);
    }

    fn render_note_pane(&self, area: Rect, buf: &mut Buffer, palette: &Palette) {
        let shared = self.shared.borrow();
        let (title, body, style) = if self.editing {
            (
                format!("Editing note for {} (Enter saves, Esc cancels)", self.selected),
                format!("{}_", self.draft),
                Style::default().fg(palette.accent),
            )
        } else {
            match shared.notes.note_for(self.selected) {
                Some(note) => (
                    format!("Note for {} (e edits)", self.selected),
                    note.to_string(),
                    Style::default().fg(palette.text),
                ),
                None => (
                    format!("No note for {} (e adds one)", self.selected),
                    String::new(),
                    Style::default().fg(palette.dim),
                ),
            }
        };

        Paragraph::new(body)
            .style(style)
            .block(Block::bordered().title(title).border_type(BorderType::Rounded))
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}

impl ContentWidget for CalendarWidget {
    fn render(&mut self, area: Rect, buf: &mut Buffer) {
        let palette = Palette::for_theme(self.shared.borrow().theme);
        let [grid_area, note_area] =
            Layout::vertical([Constraint::Length(10), Constraint::Min(3)]).areas(area);
        self.render_month_grid(grid_area, buf, &palette);
        self.render_note_pane(note_area, buf, &palette);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<AppEvent> {
        if self.editing {
            return match key.code {
                KeyCode::Enter => Some(self.commit_edit()),
                KeyCode::Esc => {
                    self.editing = false;
                    self.draft.clear();
                    None
                }
                KeyCode::Backspace => {
                    self.draft.pop();
                    None
                }
                KeyCode::Char(ch) => {
                    self.draft.push(ch);
                    None
                }
                _ => None,
            };
        }

        match key.code {
            KeyCode::Left => self.move_selection(-1),
            KeyCode::Right => self.move_selection(1),
            KeyCode::Up => self.move_selection(-7),
            KeyCode::Down => self.move_selection(7),
            KeyCode::PageUp => self.move_month(false),
            KeyCode::PageDown => self.move_month(true),
            KeyCode::Char('t') => self.selected = Local::now().date_naive(),
            KeyCode::Char('e') | KeyCode::Enter => self.begin_edit(),
            _ => {}
        }
        None
    }
}

fn days_in_month(first: NaiveDate) -> u32 {
    let next_month = first
        .checked_add_months(Months::new(1))
        .unwrap_or(first);
    next_month
        .checked_sub_days(Days::new(1))
        .map(|d| d.day())
        .unwrap_or(28)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notes_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calendar_notes.json");
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();

        let mut notes = CalendarNotes::load(&path);
        notes.set_note(date, "dentist");
        notes.save().unwrap();

        let reloaded = CalendarNotes::load(&path);
        assert_eq!(reloaded.note_for(date), Some("dentist"));
        assert!(reloaded.has_note(date));
    }

    #[test]
    fn test_empty_note_removes_entry() {
        let dir = tempfile::tempdir().unwrap();
        let mut notes = CalendarNotes::load(dir.path().join("notes.json"));
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();

        notes.set_note(date, "something");
        notes.set_note(date, "   ");
        assert!(!notes.has_note(date));
    }

    #[test]
    fn test_malformed_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.json");
        fs::write(&path, "[1, 2,").unwrap();

        let notes = CalendarNotes::load(&path);
        assert!(notes.is_empty());
    }

    #[test]
    fn test_clear_notes_action() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calendar_notes.json");
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let mut module = CalendarModule::new(&path);
        {
            let mut shared = module.shared.borrow_mut();
            shared.notes.set_note(date, "new year");
            shared.notes.save().unwrap();
        }

        let notice = module.invoke_menu_action("clear_notes").unwrap();
        assert_eq!(notice.as_deref(), Some("Cleared 1 calendar note(s)"));
        assert!(CalendarNotes::load(&path).is_empty());
    }

    #[test]
    fn test_days_in_month_handles_leap_years() {
        let feb_2024 = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let feb_2023 = NaiveDate::from_ymd_opt(2023, 2, 1).unwrap();
        assert_eq!(days_in_month(feb_2024), 29);
        assert_eq!(days_in_month(feb_2023), 28);
    }

    #[test]
    fn test_theme_hook_updates_shared_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut module = CalendarModule::new(dir.path().join("notes.json"));
        module.on_theme_changed(Theme::Dark);
        assert_eq!(module.shared.borrow().theme, Theme::Dark);
    }
}
