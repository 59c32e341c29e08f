// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dotlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dotlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! A file sidebar (flat or grouped by log metadata, with a fuzzy filter), the rendered graph,
//! and a metadata panel. Every selection goes through [`Viewer::select`], so the file is read
//! and rendered again each time.

use std::{error::Error, io, time::Duration};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use tracing::debug;

use crate::model::FileName;
use crate::store::{group_log_files, DotFolder, LogFileInfo, PATTERN_MISMATCH_MESSAGE};
use crate::viewer::{ViewState, Viewer};

const FOCUS_COLOR: Color = Color::LightGreen;
const ERROR_COLOR: Color = Color::Red;
const HEADER_COLOR: Color = Color::Yellow;
const FOOTER_LABEL_COLOR: Color = Color::Gray;
const FOOTER_KEY_COLOR: Color = Color::Cyan;
const EMPTY_DIRECTORY_TEXT: &str = "No dot files found.";
const IDLE_TEXT: &str = "Select a file to render.";
const OTHER_FILES_HEADER: &str = "Other files";
const METADATA_PANEL_HEIGHT: u16 = 9;
const PAGE_SCROLL_LINES: u16 = 10;

/// Runs the interactive terminal UI on `folder` until the user quits.
pub fn run(folder: DotFolder) -> Result<(), Box<dyn Error>> {
    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(Viewer::new(folder));

    while !app.should_quit {
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                _ => {}
            }
        }
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SidebarMode {
    Flat,
    Grouped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterMode {
    Inactive,
    Editing,
}

/// One row of the sidebar: a group header (`file == None`) or a selectable file.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SidebarEntry {
    label: String,
    depth: usize,
    file: Option<FileName>,
}

impl SidebarEntry {
    fn header(label: impl Into<String>, depth: usize) -> Self {
        Self { label: label.into(), depth, file: None }
    }

    fn file(label: impl Into<String>, depth: usize, file: FileName) -> Self {
        Self { label: label.into(), depth, file: Some(file) }
    }
}

struct App {
    viewer: Viewer,
    list_error: Option<String>,
    sidebar_mode: SidebarMode,
    entries: Vec<SidebarEntry>,
    list_state: ListState,
    focus: Focus,
    filter_mode: FilterMode,
    filter_query: String,
    scroll_x: u16,
    scroll_y: u16,
    seen_rev: u64,
    show_help: bool,
    should_quit: bool,
    toast: Option<String>,
}

impl App {
    fn new(viewer: Viewer) -> Self {
        let mut app = Self {
            viewer,
            list_error: None,
            sidebar_mode: SidebarMode::Flat,
            entries: Vec::new(),
            list_state: ListState::default(),
            focus: Focus::Files,
            filter_mode: FilterMode::Inactive,
            filter_query: String::new(),
            scroll_x: 0,
            scroll_y: 0,
            seen_rev: 0,
            show_help: false,
            should_quit: false,
            toast: None,
        };
        app.reload_files();
        app
    }

    /// Re-lists the directory, keeping the current file selected when it still exists.
    fn reload_files(&mut self) {
        let previous = self.viewer.state().file_name().cloned();
        match self.viewer.refresh().map(<[FileName]>::len) {
            Ok(count) => {
                debug!(count, "sidebar reloaded");
                self.list_error = None;
            }
            Err(err) => {
                self.list_error = Some(err.to_string());
                self.viewer.clear();
            }
        }
        self.rebuild_entries();

        let still_listed = previous
            .as_ref()
            .and_then(|name| self.entry_index_of(name));
        match still_listed {
            Some(idx) => self.select_entry(idx),
            None => match self.first_file_entry() {
                Some(idx) => self.select_entry(idx),
                None => {
                    self.list_state.select(None);
                    self.viewer.clear();
                }
            },
        }
    }

    fn rebuild_entries(&mut self) {
        self.entries = sidebar_entries(self.viewer.files(), self.sidebar_mode, &self.filter_query);
    }

    fn entry_index_of(&self, name: &FileName) -> Option<usize> {
        self.entries.iter().position(|entry| entry.file.as_ref() == Some(name))
    }

    fn first_file_entry(&self) -> Option<usize> {
        self.entries.iter().position(|entry| entry.file.is_some())
    }

    fn selected_file(&self) -> Option<&FileName> {
        self.list_state
            .selected()
            .and_then(|idx| self.entries.get(idx))
            .and_then(|entry| entry.file.as_ref())
    }

    fn select_entry(&mut self, idx: usize) {
        let Some(file) = self.entries.get(idx).and_then(|entry| entry.file.clone()) else {
            return;
        };
        self.list_state.select(Some(idx));
        self.viewer.select(&file);
        self.sync_scroll_with_state();
    }

    /// Moves the cursor to the next selectable file in `delta`'s direction and renders it.
    fn move_cursor(&mut self, delta: isize) {
        if self.entries.is_empty() {
            return;
        }
        let steps = delta.unsigned_abs();
        let mut idx = self.list_state.selected();
        for _ in 0..steps {
            let next = match idx {
                None => self.first_file_entry(),
                Some(current) if delta > 0 => self.entries[current + 1..]
                    .iter()
                    .position(|entry| entry.file.is_some())
                    .map(|offset| current + 1 + offset),
                Some(current) => self.entries[..current]
                    .iter()
                    .rposition(|entry| entry.file.is_some()),
            };
            match next {
                Some(next) => idx = Some(next),
                None => break,
            }
        }

        if let Some(idx) = idx {
            if Some(idx) != self.list_state.selected() {
                self.select_entry(idx);
            }
        }
    }

    fn sync_scroll_with_state(&mut self) {
        if self.viewer.rev() != self.seen_rev {
            self.seen_rev = self.viewer.rev();
            self.scroll_x = 0;
            self.scroll_y = 0;
        }
    }

    fn toggle_grouping(&mut self) {
        self.sidebar_mode = match self.sidebar_mode {
            SidebarMode::Flat => SidebarMode::Grouped,
            SidebarMode::Grouped => SidebarMode::Flat,
        };
        self.refresh_entries_keep_selection();
        self.set_toast(match self.sidebar_mode {
            SidebarMode::Flat => "Flat list",
            SidebarMode::Grouped => "Grouped by code and thread",
        });
    }

    fn refresh_entries_keep_selection(&mut self) {
        let current = self.selected_file().cloned();
        self.rebuild_entries();
        let idx = current.and_then(|name| self.entry_index_of(&name));
        self.list_state.select(idx.or_else(|| self.first_file_entry()));
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(message.into());
    }

    fn scroll_by(&mut self, dx: i32, dy: i32) {
        let (max_x, max_y) = self.scroll_limits();
        self.scroll_x = clamp_scroll(self.scroll_x, dx, max_x);
        self.scroll_y = clamp_scroll(self.scroll_y, dy, max_y);
    }

    fn scroll_limits(&self) -> (u16, u16) {
        let text = match self.viewer.state() {
            ViewState::Rendered { rendered, .. } => rendered.text.as_str(),
            ViewState::Error { message, .. } => message.as_str(),
            ViewState::Idle => "",
        };
        scroll_limits_for(text)
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        if self.handle_key_code(key.code) {
            self.should_quit = true;
        }
    }

    /// Returns `true` when the key asks to quit.
    fn handle_key_code(&mut self, code: KeyCode) -> bool {
        self.toast = None;

        if self.show_help {
            match code {
                KeyCode::Esc | KeyCode::Char('?') => self.show_help = false,
                KeyCode::Char('q') => return true,
                _ => {}
            }
            return false;
        }

        if self.filter_mode == FilterMode::Editing {
            self.handle_filter_key(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('r') => {
                self.reload_files();
                self.set_toast("Reloaded");
            }
            KeyCode::Char('g') => self.toggle_grouping(),
            KeyCode::Char('/') => {
                self.filter_mode = FilterMode::Editing;
                self.focus = Focus::Files;
            }
            KeyCode::Esc if !self.filter_query.is_empty() => self.clear_filter(),
            KeyCode::Tab | KeyCode::BackTab => self.focus = self.focus.toggle(),
            _ => match self.focus {
                Focus::Files => self.handle_files_key(code),
                Focus::Graph => self.handle_graph_key(code),
            },
        }
        false
    }

    fn handle_files_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::PageDown => self.move_cursor(PAGE_SCROLL_LINES as isize),
            KeyCode::PageUp => self.move_cursor(-(PAGE_SCROLL_LINES as isize)),
            KeyCode::Home => {
                if let Some(idx) = self.first_file_entry() {
                    self.select_entry(idx);
                }
            }
            KeyCode::Enter => {
                if let Some(idx) = self.list_state.selected() {
                    self.select_entry(idx);
                }
                self.focus = Focus::Graph;
            }
            _ => {}
        }
    }

    fn handle_graph_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Down | KeyCode::Char('j') => self.scroll_by(0, 1),
            KeyCode::Up | KeyCode::Char('k') => self.scroll_by(0, -1),
            KeyCode::Right | KeyCode::Char('l') => self.scroll_by(4, 0),
            KeyCode::Left | KeyCode::Char('h') => self.scroll_by(-4, 0),
            KeyCode::PageDown => self.scroll_by(0, i32::from(PAGE_SCROLL_LINES)),
            KeyCode::PageUp => self.scroll_by(0, -i32::from(PAGE_SCROLL_LINES)),
            KeyCode::Home => {
                self.scroll_x = 0;
                self.scroll_y = 0;
            }
            KeyCode::Esc => self.focus = Focus::Files,
            _ => {}
        }
    }

    fn handle_filter_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.filter_mode = FilterMode::Inactive;
                self.clear_filter();
            }
            KeyCode::Enter => {
                self.filter_mode = FilterMode::Inactive;
                if let Some(idx) = self.list_state.selected() {
                    self.select_entry(idx);
                }
            }
            KeyCode::Backspace => {
                self.filter_query.pop();
                self.refresh_entries_keep_selection();
            }
            KeyCode::Down => self.move_cursor(1),
            KeyCode::Up => self.move_cursor(-1),
            KeyCode::Char(ch) => {
                self.filter_query.push(ch);
                self.refresh_entries_keep_selection();
            }
            _ => {}
        }
    }

    fn clear_filter(&mut self) {
        self.filter_query.clear();
        self.refresh_entries_keep_selection();
    }

    fn file_position(&self) -> Option<usize> {
        let current = self.viewer.state().file_name()?;
        self.viewer.files().iter().position(|file| file == current).map(|idx| idx + 1)
    }
}

/// Largest `(x, y)` scroll offsets for `text`.
///
/// ratatui scroll offsets are `u16`, so rows and columns past 65535 stay out of reach.
fn scroll_limits_for(text: &str) -> (u16, u16) {
    let height = text.lines().count().saturating_sub(1);
    let width = text.lines().map(|line| line.chars().count()).max().unwrap_or(0);
    (
        u16::try_from(width.saturating_sub(1)).unwrap_or(u16::MAX),
        u16::try_from(height).unwrap_or(u16::MAX),
    )
}

fn clamp_scroll(current: u16, delta: i32, max: u16) -> u16 {
    let next = i32::from(current).saturating_add(delta);
    clamp_positive_i32_to_u16(next).min(max)
}

fn sidebar_entries(files: &[FileName], mode: SidebarMode, query: &str) -> Vec<SidebarEntry> {
    if !query.trim().is_empty() {
        return ranked_file_matches(files, query)
            .into_iter()
            .map(|file| SidebarEntry::file(file.to_string(), 0, file))
            .collect();
    }

    match mode {
        SidebarMode::Flat => files
            .iter()
            .map(|file| SidebarEntry::file(file.to_string(), 0, file.clone()))
            .collect(),
        SidebarMode::Grouped => {
            let groups = group_log_files(files);
            let mut entries = Vec::new();
            for (code, threads) in &groups {
                entries.push(SidebarEntry::header(format!("{code}.dot"), 0));
                for (thread, infos) in threads {
                    entries.push(SidebarEntry::header(thread.clone(), 1));
                    for info in infos {
                        entries.push(SidebarEntry::file(
                            info.display_timestamp(),
                            2,
                            info.file_name.clone(),
                        ));
                    }
                }
            }

            let others = files
                .iter()
                .filter(|file| LogFileInfo::parse(file).is_none())
                .collect::<Vec<_>>();
            if !others.is_empty() {
                entries.push(SidebarEntry::header(OTHER_FILES_HEADER, 0));
                for file in others {
                    entries.push(SidebarEntry::file(file.as_str(), 1, file.clone()));
                }
            }
            entries
        }
    }
}

fn ranked_file_matches(files: &[FileName], query: &str) -> Vec<FileName> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return files.to_vec();
    }

    let mut scored = files
        .iter()
        .filter_map(|file| {
            let haystack = file.as_str().to_lowercase();
            fuzzy_score(&needle, &haystack).map(|score| (score, file))
        })
        .collect::<Vec<_>>();
    scored.sort_by(|(score_a, file_a), (score_b, file_b)| {
        score_b.cmp(score_a).then_with(|| file_a.as_str().cmp(file_b.as_str()))
    });
    scored.into_iter().map(|(_, file)| file.clone()).collect()
}

struct SubsequenceStats {
    first: usize,
    span: usize,
    consecutive: usize,
    start_boundary: bool,
}

/// Scores `needle` against `haystack`; `None` unless every needle char appears in order.
fn fuzzy_score(needle: &str, haystack: &str) -> Option<i64> {
    let needle = needle.trim();
    if needle.is_empty() {
        return None;
    }

    let subseq = subsequence_stats(needle, haystack)?;
    let ratio = rapidfuzz::fuzz::ratio(needle.chars(), haystack.chars());
    let ratio_score = (ratio * 1000.0).round() as i64;

    let mut score = ratio_score;
    score -= subseq.span as i64;
    score -= (subseq.first as i64) / 4;
    score += (subseq.consecutive as i64) * 40;
    if subseq.start_boundary {
        score += 150;
    }
    if haystack.contains(needle) {
        score += 2000;
    } else {
        score += 500;
    }

    Some(score)
}

fn subsequence_stats(needle: &str, haystack: &str) -> Option<SubsequenceStats> {
    let mut needle_iter = needle.chars().peekable();
    let mut first: Option<usize> = None;
    let mut last: usize = 0;
    let mut prev_match: Option<usize> = None;
    let mut consecutive: usize = 0;
    let mut start_boundary = false;
    let mut prev_hay: Option<char> = None;

    for (idx, ch) in haystack.chars().enumerate() {
        let Some(&want) = needle_iter.peek() else {
            break;
        };

        if ch == want {
            needle_iter.next();

            if first.is_none() {
                first = Some(idx);
                start_boundary = prev_hay.map_or(true, is_boundary_char);
            }
            if prev_match.is_some_and(|prev| idx == prev + 1) {
                consecutive += 1;
            }
            prev_match = Some(idx);
            last = idx;
        }

        prev_hay = Some(ch);
    }

    if needle_iter.peek().is_some() {
        return None;
    }

    let first = first?;
    Some(SubsequenceStats {
        first,
        span: last.saturating_sub(first).saturating_add(1),
        consecutive,
        start_boundary,
    })
}

fn is_boundary_char(ch: char) -> bool {
    matches!(ch, '.' | '-' | '_' | ' ')
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.area();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let main_area = rows[0];
    let footer_area = rows[1];

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(main_area);
    let sidebar_area = columns[0];
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(METADATA_PANEL_HEIGHT)])
        .split(columns[1]);
    let graph_area = right[0];
    let metadata_area = right[1];

    draw_sidebar(frame, app, sidebar_area);
    draw_graph(frame, app, graph_area);
    draw_metadata(frame, app, metadata_area);

    let footer = if app.filter_mode == FilterMode::Editing {
        filter_footer_line(app)
    } else {
        footer_help_line(app)
    };
    frame.render_widget(Paragraph::new(footer), footer_area);

    if app.show_help {
        render_help(frame, main_area);
    }
}

fn draw_sidebar(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let tail = match (app.sidebar_mode, app.filter_query.trim().is_empty()) {
        (_, false) => Some(format!("/{}", app.filter_query)),
        (SidebarMode::Grouped, true) => Some("grouped".to_owned()),
        (SidebarMode::Flat, true) => None,
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(view_title("Files", tail.as_deref()))
        .border_style(panel_border_style(app.focus, Focus::Files));

    if app.entries.is_empty() {
        let text = if app.list_error.is_some() {
            Text::from(Span::styled("Directory unavailable.", Style::default().fg(ERROR_COLOR)))
        } else if app.filter_query.trim().is_empty() {
            Text::from(EMPTY_DIRECTORY_TEXT)
        } else {
            Text::from("No matches.")
        };
        frame.render_widget(Paragraph::new(text).block(block), area);
        return;
    }

    let items = app
        .entries
        .iter()
        .map(|entry| {
            let indent = "  ".repeat(entry.depth);
            let line = match entry.file {
                Some(_) => Line::from(format!("{indent}{}", entry.label)),
                None => Line::from(Span::styled(
                    format!("{indent}{}", entry.label),
                    Style::default().fg(HEADER_COLOR).add_modifier(Modifier::BOLD),
                )),
            };
            ListItem::new(line)
        })
        .collect::<Vec<_>>();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));
    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn draw_graph(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let file_label = app
        .viewer
        .state()
        .file_name()
        .map(ToString::to_string)
        .unwrap_or_else(|| "(none)".to_owned());
    let title = graph_view_title(
        &file_label,
        app.focus == Focus::Graph,
        app.file_position(),
        app.viewer.files().len(),
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(panel_border_style(app.focus, Focus::Graph));

    let paragraph = if let Some(err) = &app.list_error {
        Paragraph::new(Text::from(Span::styled(err.clone(), Style::default().fg(ERROR_COLOR))))
            .wrap(Wrap { trim: false })
    } else {
        match app.viewer.state() {
            ViewState::Idle => Paragraph::new(IDLE_TEXT),
            ViewState::Rendered { rendered, .. } => Paragraph::new(rendered.text.as_str())
                .scroll((app.scroll_y, app.scroll_x)),
            ViewState::Error { message, .. } => Paragraph::new(Text::from(Span::styled(
                message.clone(),
                Style::default().fg(ERROR_COLOR),
            )))
            .wrap(Wrap { trim: false }),
        }
    };
    frame.render_widget(paragraph.block(block), area);
}

fn draw_metadata(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(view_title("Metadata", None));
    frame.render_widget(Paragraph::new(metadata_lines(app)).block(block), area);
}

fn metadata_lines(app: &App) -> Vec<Line<'static>> {
    let Some(file) = app.viewer.state().file_name() else {
        return Vec::new();
    };

    let mut lines = match LogFileInfo::parse(file) {
        Some(info) => {
            let width = info
                .metadata_rows()
                .iter()
                .map(|(label, _)| label.len())
                .max()
                .unwrap_or(0);
            info.metadata_rows()
                .into_iter()
                .map(|(label, value)| metadata_row(label, &value, width))
                .collect::<Vec<_>>()
        }
        None => vec![Line::from(Span::styled(
            PATTERN_MISMATCH_MESSAGE,
            Style::default().fg(Color::DarkGray),
        ))],
    };

    if let Some(rendered) = app.viewer.state().rendered() {
        lines.push(metadata_row("Graph", &rendered.summary.to_string(), "Graph".len()));
    }
    lines
}

include!("chrome.rs");

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen);
}

#[cfg(test)]
mod tests;
