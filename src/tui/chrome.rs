// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dotlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dotlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Title, footer, help, and style helpers used by TUI rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Files,
    Graph,
}

impl Focus {
    fn toggle(self) -> Self {
        match self {
            Self::Files => Self::Graph,
            Self::Graph => Self::Files,
        }
    }
}

fn panel_border_style(active: Focus, panel: Focus) -> Style {
    if active != panel {
        return Style::default();
    }

    Style::default().fg(FOCUS_COLOR)
}

fn view_title(label: &str, tail: Option<&str>) -> String {
    let mut title = format!("─ {label}");
    if let Some(tail) = tail {
        let tail = tail.trim();
        if !tail.is_empty() {
            title.push(' ');
            title.push_str(tail);
        }
    }
    title.push(' ');
    title
}

fn graph_view_title(
    file_label: &str,
    is_focused: bool,
    file_index: Option<usize>,
    file_total: usize,
) -> Line<'static> {
    let name_color = if is_focused {
        Color::White
    } else {
        Color::Gray
    };
    let counter = file_counter_label(file_index, file_total);
    Line::from(vec![
        Span::raw("─ Graph ".to_owned()),
        Span::styled(counter, Style::default().fg(Color::LightGreen)),
        Span::raw(" ".to_owned()),
        Span::styled(file_label.to_owned(), Style::default().fg(name_color)),
        Span::raw(" ".to_owned()),
    ])
}

fn file_counter_label(file_index: Option<usize>, file_total: usize) -> String {
    if file_total == 0 {
        return "[0/0]".to_owned();
    }

    let width = file_total.to_string().len();
    let index = file_index.unwrap_or(0).min(file_total);
    format!("[{index:0width$}/{file_total}]")
}

fn clamp_positive_i32_to_u16(value: i32) -> u16 {
    value.max(0).min(u16::MAX as i32) as u16
}

fn metadata_row(label: &str, value: &str, label_width: usize) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{label:<label_width$}"),
            Style::default().fg(FOOTER_LABEL_COLOR),
        ),
        Span::raw("  "),
        Span::raw(value.to_owned()),
    ])
}

fn footer_help_line(app: &App) -> Line<'static> {
    let mut spans = Vec::<Span<'static>>::new();

    match app.focus {
        Focus::Files => {
            push_footer_entry(&mut spans, "FILE", "j/k");
            push_footer_entry(&mut spans, "OPEN", "Enter");
        }
        Focus::Graph => {
            push_footer_entry(&mut spans, "SCROLL", "hjkl");
            push_footer_entry(&mut spans, "RESET", "Home");
        }
    }
    let group_value = match app.sidebar_mode {
        SidebarMode::Flat => "g◻ ",
        SidebarMode::Grouped => "g◼ ",
    };
    push_footer_entry(&mut spans, "GROUP", group_value);
    push_footer_entry(&mut spans, "FILTER", "/");
    push_footer_entry(&mut spans, "RELOAD", "r");
    push_footer_entry(&mut spans, "FOCUS", "Tab");
    push_footer_entry(&mut spans, "HELP", "?");
    push_footer_entry(&mut spans, "QUIT", "q");
    push_toast(&mut spans, app.toast.as_deref());

    Line::from(spans)
}

fn filter_footer_line(app: &App) -> Line<'static> {
    let matches = app.entries.iter().filter(|entry| entry.file.is_some()).count();
    let mut spans = vec![
        Span::styled(
            "/".to_owned(),
            Style::default()
                .fg(FOOTER_KEY_COLOR)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(app.filter_query.clone()),
        Span::raw("   "),
    ];
    if !app.filter_query.is_empty() {
        spans.push(Span::styled(
            format!("{matches}/{}", app.viewer.files().len()),
            Style::default().fg(Color::LightGreen),
        ));
    }

    push_footer_entry_with_separator(&mut spans, "Accept", "Enter", " | ");
    push_footer_entry_with_separator(&mut spans, "Clear", "Esc", " | ");
    push_toast(&mut spans, app.toast.as_deref());

    Line::from(spans)
}

fn push_toast(spans: &mut Vec<Span<'static>>, toast: Option<&str>) {
    let Some(message) = toast.map(str::trim).filter(|message| !message.is_empty()) else {
        return;
    };
    spans.push(Span::styled(" | ", Style::default().fg(FOOTER_LABEL_COLOR)));
    spans.push(Span::styled(
        "Toast:".to_owned(),
        Style::default().fg(FOOTER_LABEL_COLOR),
    ));
    spans.push(Span::raw(message.to_owned()));
}

fn help_key_style() -> Style {
    Style::default()
        .fg(FOOTER_KEY_COLOR)
        .add_modifier(Modifier::BOLD)
}

fn help_header_style() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

fn centered_rect(width_percent: u16, height_percent: u16, area: Rect) -> Rect {
    let vertical_margin = (100u16.saturating_sub(height_percent)) / 2;
    let horizontal_margin = (100u16.saturating_sub(width_percent)) / 2;

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(vertical_margin),
            Constraint::Percentage(height_percent),
            Constraint::Percentage(vertical_margin),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(horizontal_margin),
            Constraint::Percentage(width_percent),
            Constraint::Percentage(horizontal_margin),
        ])
        .split(vertical[1])[1]
}

fn help_kv(key: &str, desc: &str, key_width: usize, key_style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{key:>width$}", width = key_width), key_style),
        Span::raw("  "),
        Span::raw(desc.to_owned()),
    ])
}

fn render_help(frame: &mut Frame<'_>, main_area: Rect) {
    let area = centered_rect(70, 80, main_area);
    frame.render_widget(Clear, area);

    let key_style = help_key_style();
    let header_style = help_header_style();

    let key_col_width = ["j/k, ↑/↓, PgUp/PgDn", "h/l, ←/→"]
        .iter()
        .map(|s| s.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines = Vec::<Line<'static>>::new();

    lines.push(Line::from(Span::styled("--- Global ---", header_style)));
    lines.push(help_kv("?", "Help (toggle)", key_col_width, key_style));
    lines.push(help_kv("q, Ctrl-C", "Quit", key_col_width, key_style));
    lines.push(help_kv("Tab", "Switch focus Files/Graph", key_col_width, key_style));
    lines.push(help_kv("r", "Reload directory listing", key_col_width, key_style));
    lines.push(help_kv("g", "Toggle grouping by code and thread", key_col_width, key_style));
    lines.push(help_kv("/", "Filter files (fuzzy)", key_col_width, key_style));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled("--- Files ---", header_style)));
    lines.push(help_kv(
        "j/k, ↑/↓, PgUp/PgDn",
        "Select and render file",
        key_col_width,
        key_style,
    ));
    lines.push(help_kv("Home", "First file", key_col_width, key_style));
    lines.push(help_kv("Enter", "Re-render and focus graph", key_col_width, key_style));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled("--- Graph ---", header_style)));
    lines.push(help_kv("j/k, ↑/↓, PgUp/PgDn", "Scroll vertically", key_col_width, key_style));
    lines.push(help_kv("h/l, ←/→", "Scroll horizontally", key_col_width, key_style));
    lines.push(help_kv("Home", "Reset scroll", key_col_width, key_style));
    lines.push(help_kv("Esc", "Back to files", key_col_width, key_style));

    let block = Block::default()
        .borders(Borders::ALL)
        .title(view_title("Help", Some("Esc/? to close")));
    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn push_footer_entry(spans: &mut Vec<Span<'static>>, label: &str, value: &str) {
    push_footer_entry_with_separator(spans, label, value, " | ");
}

fn push_footer_entry_with_separator(
    spans: &mut Vec<Span<'static>>,
    label: &str,
    value: &str,
    separator: &'static str,
) {
    if !spans.is_empty() {
        spans.push(Span::styled(
            separator.to_owned(),
            Style::default().fg(FOOTER_LABEL_COLOR),
        ));
    }
    spans.push(Span::styled(
        format!("{}:", footer_label_ucfirst(label)),
        Style::default().fg(FOOTER_LABEL_COLOR),
    ));
    spans.push(footer_value_span(value));
}

fn footer_label_ucfirst(label: &str) -> String {
    let lower = label.to_lowercase();
    let mut chars = lower.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut out = first.to_uppercase().collect::<String>();
    out.push_str(chars.as_str());
    out
}

fn footer_value_span(value: &str) -> Span<'static> {
    Span::styled(
        value.to_owned(),
        Style::default()
            .fg(FOOTER_KEY_COLOR)
            .add_modifier(Modifier::BOLD),
    )
}
