//! Notes panel: a plain multi-line editor persisting a single markup blob
//! (`notes_data.html`, one `<p>` per line). Autosaves when hidden and on
//! cleanup; exports a plain-text copy on demand.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph, Widget},
};
use ratatui::crossterm::event::{KeyCode, KeyEvent};

use crate::error::Result;
use crate::event::AppEvent;
use crate::module::{Cleanable, ContentWidget, Hideable, MenuAction, ModulePanel, Themeable};
use crate::theme::Theme;
use crate::ui::style::Palette;
use crate::{log_info, log_warn};

/// The persisted document. Stored as minimal HTML with no format
/// guarantees beyond being parseable back by this module.
#[derive(Debug)]
pub struct NotesDocument {
    path: PathBuf,
    pub lines: Vec<String>,
    dirty: bool,
}

impl NotesDocument {
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let lines = if path.exists() {
            match fs::read_to_string(&path) {
                Ok(contents) => parse_markup(&contents),
                Err(e) => {
                    log_warn!("Failed to read notes file {:?}: {}", path, e);
                    vec![String::new()]
                }
            }
        } else {
            vec![String::new()]
        };
        Self { path, lines, dirty: false }
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn save(&mut self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, render_markup(&self.lines))?;
        self.dirty = false;
        Ok(())
    }

    /// Writes a plain-text copy next to the document and returns its path.
    pub fn export(&self) -> Result<PathBuf> {
        let export_path = self.path.with_file_name("notes_export.txt");
        fs::write(&export_path, self.lines.join("\n"))?;
        Ok(export_path)
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<").replace("&gt;", ">").replace("&amp;", "&")
}

fn render_markup(lines: &[String]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str("<p>");
        out.push_str(&escape(line));
        out.push_str("</p>\n");
    }
    out
}

fn parse_markup(contents: &str) -> Vec<String> {
    let lines: Vec<String> = contents
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            let body = line.strip_prefix("<p>")?.strip_suffix("</p>")?;
            Some(unescape(body))
        })
        .collect();
    if lines.is_empty() {
        vec![String::new()]
    } else {
        lines
    }
}

/// The module instance; shares the document with its widget.
pub struct NotesModule {
    doc: Rc<RefCell<NotesDocument>>,
    theme: Rc<RefCell<Theme>>,
}

impl NotesModule {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            doc: Rc::new(RefCell::new(NotesDocument::load(path))),
            theme: Rc::new(RefCell::new(Theme::Light)),
        }
    }

    fn save_if_dirty(&self) {
        let mut doc = self.doc.borrow_mut();
        if doc.is_dirty() {
            if let Err(e) = doc.save() {
                log_warn!("Notes autosave failed: {}", e);
            } else {
                log_info!("Notes autosaved");
            }
        }
    }
}

impl ModulePanel for NotesModule {
    fn create_content_widget(&mut self) -> Result<Box<dyn ContentWidget>> {
        Ok(Box::new(NotesWidget {
            doc: self.doc.clone(),
            theme: self.theme.clone(),
            row: 0,
            col: 0,
        }))
    }

    fn menu_actions(&self) -> Vec<MenuAction> {
        vec![
            MenuAction::new("save", "Save notes"),
            MenuAction::new("export", "Export as text"),
        ]
    }

    fn invoke_menu_action(&mut self, action_id: &str) -> Result<Option<String>> {
        match action_id {
            "save" => {
                self.doc.borrow_mut().save()?;
                Ok(Some("Notes saved".to_string()))
            }
            "export" => {
                let path = self.doc.borrow().export()?;
                Ok(Some(format!("Exported to {}", path.display())))
            }
            _ => Ok(None),
        }
    }

    fn as_themeable(&mut self) -> Option<&mut dyn Themeable> {
        Some(self)
    }

    fn as_hideable(&mut self) -> Option<&mut dyn Hideable> {
        Some(self)
    }

    fn as_cleanable(&mut self) -> Option<&mut dyn Cleanable> {
        Some(self)
    }
}

impl Themeable for NotesModule {
    fn on_theme_changed(&mut self, theme: Theme) {
        *self.theme.borrow_mut() = theme;
    }
}

impl Hideable for NotesModule {
    fn on_hidden(&mut self) {
        self.save_if_dirty();
    }
}

impl Cleanable for NotesModule {
    fn cleanup(&mut self) {
        self.save_if_dirty();
        log_info!("Notes module cleaned up");
    }
}

struct NotesWidget {
    doc: Rc<RefCell<NotesDocument>>,
    theme: Rc<RefCell<Theme>>,
    row: usize,
    col: usize,
}

impl NotesWidget {
    fn clamp_cursor(&mut self) {
        let doc = self.doc.borrow();
        self.row = self.row.min(doc.lines.len().saturating_sub(1));
        let line_len = doc.lines[self.row].chars().count();
        self.col = self.col.min(line_len);
    }

    fn byte_index(line: &str, col: usize) -> usize {
        line.char_indices()
            .nth(col)
            .map(|(i, _)| i)
            .unwrap_or(line.len())
    }

    fn insert_char(&mut self, ch: char) {
        self.clamp_cursor();
        let mut doc = self.doc.borrow_mut();
        let idx = Self::byte_index(&doc.lines[self.row], self.col);
        doc.lines[self.row].insert(idx, ch);
        doc.mark_dirty();
        self.col += 1;
    }

    fn insert_newline(&mut self) {
        self.clamp_cursor();
        let mut doc = self.doc.borrow_mut();
        let idx = Self::byte_index(&doc.lines[self.row], self.col);
        let rest = doc.lines[self.row].split_off(idx);
        doc.lines.insert(self.row + 1, rest);
        doc.mark_dirty();
        self.row += 1;
        self.col = 0;
    }

    fn backspace(&mut self) {
        self.clamp_cursor();
        let mut doc = self.doc.borrow_mut();
        if self.col > 0 {
            self.col -= 1;
            let idx = Self::byte_index(&doc.lines[self.row], self.col);
            doc.lines[self.row].remove(idx);
            doc.mark_dirty();
        } else if self.row > 0 {
            let removed = doc.lines.remove(self.row);
            self.row -= 1;
            self.col = doc.lines[self.row].chars().count();
            doc.lines[self.row].push_str(&removed);
            doc.mark_dirty();
        }
    }
}

impl ContentWidget for NotesWidget {
    fn render(&mut self, area: Rect, buf: &mut Buffer) {
        let doc = self.doc.borrow();
        let palette = Palette::for_theme(*self.theme.borrow());

        let visible_rows = area.height.saturating_sub(2) as usize;
        let top = self.row.saturating_sub(visible_rows.saturating_sub(1));

        let lines: Vec<Line> = doc
            .lines
            .iter()
            .enumerate()
            .skip(top)
            .take(visible_rows.max(1))
            .map(|(row, line)| {
                if row == self.row {
                    // Show the cursor as a reversed cell.
                    let col = self.col.min(line.chars().count());
                    let idx = Self::byte_index(line, col);
                    let (before, rest) = line.split_at(idx);
                    let mut chars = rest.chars();
                    let under = chars.next().unwrap_or(' ');
                    let after: String = chars.collect();
                    Line::from(vec![
                        Span::styled(before.to_string(), Style::default().fg(palette.text)),
                        Span::styled(
                            under.to_string(),
                            Style::default().bg(palette.highlight_bg).fg(palette.highlight_fg),
                        ),
                        Span::styled(after, Style::default().fg(palette.text)),
                    ])
                } else {
                    Line::from(Span::styled(
                        line.clone(),
                        Style::default().fg(palette.text),
                    ))
                }
            })
            .collect();

        let title = if doc.is_dirty() {
            "Notes [modified]".to_string()
        } else {
            "Notes".to_string()
        };

        Paragraph::new(lines)
            .block(
                Block::bordered()
                    .title(title)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(palette.accent)),
            )
            .render(area, buf);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<AppEvent> {
        match key.code {
            KeyCode::Char(ch) => self.insert_char(ch),
            KeyCode::Enter => self.insert_newline(),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Left => self.col = self.col.saturating_sub(1),
            KeyCode::Right => {
                let doc = self.doc.borrow();
                let len = doc.lines[self.row.min(doc.lines.len() - 1)].chars().count();
                self.col = (self.col + 1).min(len);
            }
            KeyCode::Up => {
                self.row = self.row.saturating_sub(1);
                self.clamp_cursor();
            }
            KeyCode::Down => {
                self.row += 1;
                self.clamp_cursor();
            }
            KeyCode::Home => self.col = 0,
            KeyCode::End => {
                let doc = self.doc.borrow();
                self.col = doc.lines[self.row.min(doc.lines.len() - 1)].chars().count();
            }
            _ => {}
        }
        None
    }
}
