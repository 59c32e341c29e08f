// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dotlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dotlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Flattens an HTML-like label into plain label text.
///
/// Tags are dropped, `<br/>` becomes the `\n` label escape, common entities are decoded and
/// whitespace runs collapse to one space.
pub(crate) fn html_to_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(ch) = rest.chars().next() {
        match ch {
            '<' => {
                let end = rest.find('>').map_or(rest.len(), |idx| idx + 1);
                let tag = rest[1..end].trim_end_matches('>').trim().to_ascii_lowercase();
                if tag.starts_with("br") {
                    trim_trailing_space(&mut out);
                    out.push_str("\\n");
                } else if !out.ends_with(' ') && !out.ends_with("\\n") && !out.is_empty() {
                    // Block-level tags like </td> separate words.
                    if tag.starts_with("/td") || tag.starts_with("/tr") {
                        out.push(' ');
                    }
                }
                rest = &rest[end..];
            }
            '&' => {
                let (decoded, len) = decode_entity(rest);
                out.push(decoded);
                rest = &rest[len..];
            }
            ch if ch.is_whitespace() => {
                if !out.is_empty() && !out.ends_with(' ') && !out.ends_with("\\n") {
                    out.push(' ');
                }
                rest = &rest[ch.len_utf8()..];
            }
            ch => {
                out.push(ch);
                rest = &rest[ch.len_utf8()..];
            }
        }
    }

    trim_trailing_space(&mut out);
    out
}

fn trim_trailing_space(out: &mut String) {
    while out.ends_with(' ') {
        out.pop();
    }
}

fn decode_entity(rest: &str) -> (char, usize) {
    const ENTITIES: [(&str, char); 6] = [
        ("&amp;", '&'),
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&quot;", '"'),
        ("&apos;", '\''),
        ("&nbsp;", ' '),
    ];

    for (entity, decoded) in ENTITIES {
        if rest.starts_with(entity) {
            return (decoded, entity.len());
        }
    }
    ('&', 1)
}
