// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dotlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dotlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::Canvas;

pub(crate) fn truncate_with_ellipsis(text: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }

    let len = text_len(text);
    if len <= max_len {
        return text.to_owned();
    }

    if max_len == 1 {
        return "…".to_owned();
    }

    let mut out: String = text.chars().take(max_len - 1).collect();
    out.push('…');
    out
}

pub(crate) fn text_len(text: &str) -> usize {
    text.chars().count()
}

/// Canvas text without trailing spaces per line and without trailing blank lines.
pub(crate) fn canvas_to_string_trimmed(canvas: &Canvas) -> String {
    let rendered = canvas.to_string();
    let mut lines = rendered
        .split('\n')
        .map(|line| line.trim_end_matches(' '))
        .collect::<Vec<_>>();

    while matches!(lines.last(), Some(line) if line.is_empty()) {
        lines.pop();
    }

    lines.join("\n")
}

/// Splits a dot label into display lines.
///
/// `\n`, `\l` and `\r` end a line, `\\` is a literal backslash and any other escaped character
/// stands for itself. Always returns at least one line.
pub(crate) fn label_lines(label: &str) -> Vec<String> {
    let mut lines = Vec::<String>::new();
    let mut current = String::new();
    let mut chars = label.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some('n' | 'l' | 'r') => lines.push(std::mem::take(&mut current)),
                Some(escaped) => current.push(escaped),
                None => current.push('\\'),
            },
            '\n' => lines.push(std::mem::take(&mut current)),
            '\r' | '\t' => current.push(' '),
            ch => current.push(ch),
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }

    lines
}

/// Flattens a `record`/`Mrecord` label into one display line per field.
///
/// Braces (field nesting) are dropped and `<port>` names are removed.
pub(crate) fn record_field_lines(label: &str) -> Vec<String> {
    let mut fields = Vec::<String>::new();
    let mut current = String::new();
    let mut chars = label.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                current.push('\\');
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            '{' | '}' => {}
            '|' => fields.push(std::mem::take(&mut current)),
            '<' => {
                for port_ch in chars.by_ref() {
                    if port_ch == '>' {
                        break;
                    }
                }
            }
            ch => current.push(ch),
        }
    }
    fields.push(current);

    let lines = fields
        .iter()
        .map(|field| field.trim())
        .filter(|field| !field.is_empty())
        .flat_map(label_lines)
        .collect::<Vec<_>>();

    if lines.is_empty() {
        vec![String::new()]
    } else {
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::{
        canvas_to_string_trimmed, label_lines, record_field_lines, text_len, truncate_with_ellipsis,
    };
    use crate::render::Canvas;

    #[test]
    fn truncate_with_ellipsis_handles_small_widths() {
        assert_eq!(truncate_with_ellipsis("hello", 0), "");
        assert_eq!(truncate_with_ellipsis("hello", 1), "…");
        assert_eq!(truncate_with_ellipsis("h", 1), "h");
        assert_eq!(truncate_with_ellipsis("hello", 2), "h…");
    }

    #[test]
    fn truncate_with_ellipsis_counts_chars_not_bytes() {
        assert_eq!(text_len("αβγ"), 3);
        assert_eq!(truncate_with_ellipsis("αβγ", 2), "α…");
    }

    #[test]
    fn canvas_to_string_trimmed_removes_trailing_spaces_and_empty_lines() {
        let mut canvas = Canvas::new(3, 3).expect("canvas");
        canvas.set(0, 0, 'A').expect("set");
        canvas.set(1, 1, 'B').expect("set");
        assert_eq!(canvas_to_string_trimmed(&canvas), "A\n B");
    }

    #[test]
    fn label_lines_split_on_dot_escapes() {
        assert_eq!(label_lines("one\\ntwo\\lthree\\r"), vec!["one", "two", "three"]);
        assert_eq!(label_lines("a\\\\b"), vec!["a\\b"]);
        assert_eq!(label_lines(""), vec![""]);
    }

    #[test]
    fn record_labels_become_one_line_per_field() {
        assert_eq!(
            record_field_lines("{<in> name | <out> value\\nmore}"),
            vec!["name", "value", "more"]
        );
        assert_eq!(record_field_lines("{|}"), vec![""]);
    }
}
