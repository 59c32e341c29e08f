// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dotlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dotlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::{
    draw, file_counter_label, footer_help_line, fuzzy_score, panel_border_style,
    ranked_file_matches, scroll_limits_for, App, FilterMode, Focus, SidebarEntry, SidebarMode,
    FOCUS_COLOR,
};
use crate::model::FileName;
use crate::store::DotFolder;
use crate::viewer::{ViewState, Viewer, ViewerErrorKind};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{backend::TestBackend, style::Style, Terminal};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const VALID_GRAPH: &str = "digraph G { A -> B; }";
const BOT_OLDER: &str = "20250301_101500_t1_User_Utterance_Flow_Log_aa_bot.dot";
const BOT_NEWER: &str = "20250302_090000_t1_User_Utterance_Flow_Log_bb_bot.dot";

fn name(value: &str) -> FileName {
    FileName::new(value).expect("file name")
}

fn line_to_string(line: &ratatui::text::Line<'_>) -> String {
    line.spans.iter().map(|span| span.content.as_ref()).collect::<String>()
}

fn app_with_files(files: &[(&str, &str)]) -> (TempDir, App) {
    let tmp = TempDir::new().expect("temp dir");
    for (file, contents) in files {
        fs::write(tmp.path().join(file), contents).expect("write dot file");
    }
    let app = App::new(Viewer::new(DotFolder::new(tmp.path())));
    (tmp, app)
}

fn app_for_path(path: &Path) -> App {
    App::new(Viewer::new(DotFolder::new(path)))
}

fn screen(app: &mut App) -> String {
    let backend = TestBackend::new(100, 30);
    let mut terminal = Terminal::new(backend).expect("terminal");
    terminal.draw(|frame| draw(frame, app)).expect("draw");
    let buffer = terminal.backend().buffer();
    buffer
        .content()
        .chunks(usize::from(buffer.area.width))
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn selected_name(app: &App) -> Option<String> {
    app.viewer.state().file_name().map(|file| file.as_str().to_owned())
}

#[test]
fn startup_renders_first_file() {
    let (_tmp, app) = app_with_files(&[("a.dot", VALID_GRAPH), ("b.dot", "not a graph")]);

    assert_eq!(selected_name(&app).as_deref(), Some("a.dot"));
    assert!(matches!(app.viewer.state(), ViewState::Rendered { .. }));
    assert_eq!(app.list_state.selected(), Some(0));
}

#[test]
fn moving_down_renders_next_file_and_surfaces_errors() {
    let (_tmp, mut app) = app_with_files(&[("a.dot", VALID_GRAPH), ("b.dot", "not a graph")]);

    assert!(!app.handle_key_code(KeyCode::Down));

    assert_eq!(selected_name(&app).as_deref(), Some("b.dot"));
    assert!(matches!(
        app.viewer.state(),
        ViewState::Error { kind: ViewerErrorKind::Render, .. }
    ));

    app.handle_key_code(KeyCode::Down);
    assert_eq!(selected_name(&app).as_deref(), Some("b.dot"));

    app.handle_key_code(KeyCode::Char('k'));
    assert_eq!(selected_name(&app).as_deref(), Some("a.dot"));
    assert!(app.viewer.state().rendered().is_some());
}

#[test]
fn error_text_is_drawn_in_graph_panel() {
    let (_tmp, mut app) = app_with_files(&[("a.dot", VALID_GRAPH), ("b.dot", "not a graph")]);
    app.handle_key_code(KeyCode::Down);

    let screen = screen(&mut app);
    assert!(screen.contains("syntax error"));
    assert!(screen.contains("b.dot"));
}

#[test]
fn quit_keys() {
    let (_tmp, mut app) = app_with_files(&[("a.dot", VALID_GRAPH)]);

    assert!(app.handle_key_code(KeyCode::Char('q')));

    app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(app.should_quit);
}

#[test]
fn help_overlay_toggles_and_swallows_keys() {
    let (_tmp, mut app) = app_with_files(&[("a.dot", VALID_GRAPH), ("b.dot", VALID_GRAPH)]);

    app.handle_key_code(KeyCode::Char('?'));
    assert!(app.show_help);
    assert!(screen(&mut app).contains("Toggle grouping"));

    app.handle_key_code(KeyCode::Down);
    assert_eq!(selected_name(&app).as_deref(), Some("a.dot"));

    app.handle_key_code(KeyCode::Esc);
    assert!(!app.show_help);
}

#[test]
fn tab_toggles_focus_and_graph_keys_scroll() {
    let (_tmp, mut app) = app_with_files(&[("a.dot", VALID_GRAPH), ("b.dot", VALID_GRAPH)]);

    app.handle_key_code(KeyCode::Tab);
    assert_eq!(app.focus, Focus::Graph);

    app.handle_key_code(KeyCode::Char('l'));
    assert_eq!(app.scroll_x, 4);
    app.handle_key_code(KeyCode::Char('h'));
    app.handle_key_code(KeyCode::Char('h'));
    assert_eq!(app.scroll_x, 0);

    app.handle_key_code(KeyCode::Char('k'));
    assert_eq!(app.scroll_y, 0);

    app.handle_key_code(KeyCode::Right);
    app.handle_key_code(KeyCode::Home);
    assert_eq!((app.scroll_x, app.scroll_y), (0, 0));

    app.handle_key_code(KeyCode::Esc);
    assert_eq!(app.focus, Focus::Files);
}

#[test]
fn new_selection_resets_scroll() {
    let (_tmp, mut app) = app_with_files(&[("a.dot", VALID_GRAPH), ("b.dot", VALID_GRAPH)]);

    app.handle_key_code(KeyCode::Tab);
    app.handle_key_code(KeyCode::Char('l'));
    assert_eq!(app.scroll_x, 4);

    app.handle_key_code(KeyCode::Tab);
    app.handle_key_code(KeyCode::Down);
    assert_eq!(selected_name(&app).as_deref(), Some("b.dot"));
    assert_eq!(app.scroll_x, 0);
}

#[test]
fn enter_rerenders_from_disk() {
    let (tmp, mut app) = app_with_files(&[("a.dot", VALID_GRAPH)]);
    fs::write(tmp.path().join("a.dot"), "digraph G { Start -> Stop; }").expect("rewrite");

    app.handle_key_code(KeyCode::Enter);

    let rendered = app.viewer.state().rendered().expect("rendered");
    assert!(rendered.text.contains("Start"));
    assert_eq!(app.focus, Focus::Graph);
}

#[test]
fn reload_drops_deleted_files() {
    let (tmp, mut app) = app_with_files(&[("a.dot", VALID_GRAPH), ("b.dot", VALID_GRAPH)]);
    fs::remove_file(tmp.path().join("a.dot")).expect("remove");

    app.handle_key_code(KeyCode::Char('r'));

    assert_eq!(app.viewer.files(), &[name("b.dot")]);
    assert_eq!(selected_name(&app).as_deref(), Some("b.dot"));
    assert_eq!(app.toast.as_deref(), Some("Reloaded"));
}

#[test]
fn selecting_deleted_file_reports_not_found() {
    let (tmp, mut app) = app_with_files(&[("a.dot", VALID_GRAPH), ("b.dot", VALID_GRAPH)]);
    fs::remove_file(tmp.path().join("b.dot")).expect("remove");

    app.handle_key_code(KeyCode::Down);

    assert!(matches!(
        app.viewer.state(),
        ViewState::Error { kind: ViewerErrorKind::FileNotFound, .. }
    ));
}

#[test]
fn empty_directory_shows_placeholder() {
    let (_tmp, mut app) = app_with_files(&[("notes.txt", "digraph {}")]);

    assert!(app.entries.is_empty());
    assert_eq!(app.viewer.state(), &ViewState::Idle);
    assert!(!app.handle_key_code(KeyCode::Down));

    let screen = screen(&mut app);
    assert!(screen.contains("No dot files found."));
    assert!(screen.contains("Select a file to render."));
}

#[test]
fn missing_directory_is_reported() {
    let tmp = TempDir::new().expect("temp dir");
    let mut app = app_for_path(&tmp.path().join("gone"));

    assert!(app.list_error.is_some());
    assert!(screen(&mut app).contains("directory not found"));
}

#[test]
fn filter_narrows_list_and_typed_keys_do_not_trigger_commands() {
    let (_tmp, mut app) = app_with_files(&[
        ("alpha.dot", VALID_GRAPH),
        ("beta.dot", VALID_GRAPH),
        ("quick.dot", VALID_GRAPH),
    ]);

    app.handle_key_code(KeyCode::Char('/'));
    assert_eq!(app.filter_mode, FilterMode::Editing);

    assert!(!app.handle_key_code(KeyCode::Char('q')));
    let listed = app
        .entries
        .iter()
        .map(|entry| entry.label.as_str())
        .collect::<Vec<_>>();
    assert_eq!(listed, vec!["quick.dot"]);

    app.handle_key_code(KeyCode::Enter);
    assert_eq!(app.filter_mode, FilterMode::Inactive);
    assert_eq!(selected_name(&app).as_deref(), Some("quick.dot"));

    app.handle_key_code(KeyCode::Esc);
    assert!(app.filter_query.is_empty());
    assert_eq!(app.entries.len(), 3);
    assert_eq!(selected_name(&app).as_deref(), Some("quick.dot"));
}

#[test]
fn filter_backspace_and_escape() {
    let (_tmp, mut app) = app_with_files(&[("a.dot", VALID_GRAPH), ("b.dot", VALID_GRAPH)]);

    app.handle_key_code(KeyCode::Char('/'));
    app.handle_key_code(KeyCode::Char('x'));
    assert!(app.entries.is_empty());

    app.handle_key_code(KeyCode::Backspace);
    assert_eq!(app.entries.len(), 2);

    app.handle_key_code(KeyCode::Char('b'));
    app.handle_key_code(KeyCode::Esc);
    assert_eq!(app.filter_mode, FilterMode::Inactive);
    assert!(app.filter_query.is_empty());
    assert_eq!(app.entries.len(), 2);
}

#[test]
fn grouping_nests_log_files_and_skips_headers() {
    let (_tmp, mut app) = app_with_files(&[
        (BOT_OLDER, VALID_GRAPH),
        (BOT_NEWER, VALID_GRAPH),
        ("a.dot", VALID_GRAPH),
    ]);
    assert_eq!(selected_name(&app).as_deref(), Some(BOT_OLDER));

    app.handle_key_code(KeyCode::Char('g'));
    assert_eq!(app.sidebar_mode, SidebarMode::Grouped);

    let expected = vec![
        SidebarEntry::header("bot.dot", 0),
        SidebarEntry::header("t1", 1),
        SidebarEntry::file("2025-03-02 09:00:00", 2, name(BOT_NEWER)),
        SidebarEntry::file("2025-03-01 10:15:00", 2, name(BOT_OLDER)),
        SidebarEntry::header("Other files", 0),
        SidebarEntry::file("a.dot", 1, name("a.dot")),
    ];
    assert_eq!(app.entries, expected);
    assert_eq!(app.list_state.selected(), Some(3));

    app.handle_key_code(KeyCode::Down);
    assert_eq!(app.list_state.selected(), Some(5));
    assert_eq!(selected_name(&app).as_deref(), Some("a.dot"));

    app.handle_key_code(KeyCode::Up);
    app.handle_key_code(KeyCode::Up);
    app.handle_key_code(KeyCode::Up);
    assert_eq!(app.list_state.selected(), Some(2));
    assert_eq!(selected_name(&app).as_deref(), Some(BOT_NEWER));

    app.handle_key_code(KeyCode::Char('g'));
    assert_eq!(app.sidebar_mode, SidebarMode::Flat);
    assert_eq!(app.list_state.selected(), Some(1));
}

#[test]
fn metadata_panel_shows_log_fields_or_mismatch() {
    let (_tmp, mut app) = app_with_files(&[(BOT_OLDER, VALID_GRAPH), ("a.dot", VALID_GRAPH)]);

    let screen_log = screen(&mut app);
    assert!(screen_log.contains("bot.dot"));
    assert!(screen_log.contains("Utterance_Flow_Log"));
    assert!(screen_log.contains("2 nodes, 1 edges"));

    app.handle_key_code(KeyCode::Down);
    let screen_plain = screen(&mut app);
    assert!(screen_plain.contains("Filename pattern does not match expected format."));
}

#[test]
fn fuzzy_ranking_prefers_contiguous_matches() {
    let files = [name("flow_a.dot"), name("f_l_o_w.dot"), name("other.dot")];

    let ranked = ranked_file_matches(&files, "flow");

    assert_eq!(ranked, vec![name("flow_a.dot"), name("f_l_o_w.dot")]);
    assert_eq!(fuzzy_score("xyz", "flow_a.dot"), None);
    assert_eq!(ranked_file_matches(&files, "  ").len(), 3);
}

#[test]
fn counter_label_pads_to_total_width() {
    assert_eq!(file_counter_label(Some(3), 12), "[03/12]");
    assert_eq!(file_counter_label(None, 4), "[0/4]");
    assert_eq!(file_counter_label(None, 0), "[0/0]");
}

#[test]
fn focused_panel_border_is_highlighted() {
    assert_eq!(
        panel_border_style(Focus::Files, Focus::Files),
        Style::default().fg(FOCUS_COLOR)
    );
    assert_eq!(panel_border_style(Focus::Files, Focus::Graph), Style::default());
}

#[test]
fn footer_reflects_focus_and_grouping() {
    let (_tmp, mut app) = app_with_files(&[("a.dot", VALID_GRAPH)]);

    let files_footer = line_to_string(&footer_help_line(&app));
    assert!(files_footer.contains("File:j/k"));
    assert!(files_footer.contains("Group:g◻"));

    app.handle_key_code(KeyCode::Tab);
    app.handle_key_code(KeyCode::Char('g'));
    let graph_footer = line_to_string(&footer_help_line(&app));
    assert!(graph_footer.contains("Scroll:hjkl"));
    assert!(graph_footer.contains("Group:g◼"));
}

#[test]
fn scroll_limits_clamp_to_u16_offsets() {
    assert_eq!(scroll_limits_for(""), (0, 0));
    assert_eq!(scroll_limits_for("abc\nde\nf"), (2, 2));

    let wide = "─".repeat(70_000);
    assert_eq!(scroll_limits_for(&wide), (u16::MAX, 0));

    let tall = "x\n".repeat(70_000);
    assert_eq!(scroll_limits_for(&tall), (0, u16::MAX));
}
