// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dotlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dotlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Graphviz dot parsing.
//!
//! Covers the dot grammar (graphs, subgraphs, attribute statements, edge chains, the four id
//! forms and all comment styles). Layout-only attributes are kept verbatim on the parsed graph.

use std::fmt;

use crate::model::GraphKind;

mod html;
mod lexer;
mod parser;

pub use parser::parse_dot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DotParseError {
    UnexpectedChar {
        line: usize,
        column: usize,
        ch: char,
    },
    UnterminatedString {
        line: usize,
        column: usize,
    },
    UnterminatedComment {
        line: usize,
        column: usize,
    },
    UnterminatedHtml {
        line: usize,
        column: usize,
    },
    MissingHeader {
        line: usize,
        column: usize,
        found: String,
    },
    UnexpectedToken {
        line: usize,
        column: usize,
        expected: &'static str,
        found: String,
    },
    EdgeOpMismatch {
        line: usize,
        column: usize,
        op: &'static str,
        kind: GraphKind,
    },
    TrailingContent {
        line: usize,
        column: usize,
        found: String,
    },
    NestingTooDeep {
        line: usize,
        column: usize,
        limit: usize,
    },
}

impl DotParseError {
    /// One-based `(line, column)` of the offending input.
    pub fn position(&self) -> (usize, usize) {
        match self {
            Self::UnexpectedChar { line, column, .. }
            | Self::UnterminatedString { line, column }
            | Self::UnterminatedComment { line, column }
            | Self::UnterminatedHtml { line, column }
            | Self::MissingHeader { line, column, .. }
            | Self::UnexpectedToken { line, column, .. }
            | Self::EdgeOpMismatch { line, column, .. }
            | Self::TrailingContent { line, column, .. }
            | Self::NestingTooDeep { line, column, .. } => (*line, *column),
        }
    }
}

impl fmt::Display for DotParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedChar { line, column, ch } => {
                write!(f, "unexpected character {ch:?} at line {line}, column {column}")
            }
            Self::UnterminatedString { line, column } => {
                write!(f, "unterminated string starting at line {line}, column {column}")
            }
            Self::UnterminatedComment { line, column } => {
                write!(f, "unterminated comment starting at line {line}, column {column}")
            }
            Self::UnterminatedHtml { line, column } => {
                write!(f, "unterminated HTML string starting at line {line}, column {column}")
            }
            Self::MissingHeader { line, column, found } => write!(
                f,
                "expected 'graph' or 'digraph' at line {line}, column {column}, found {found}"
            ),
            Self::UnexpectedToken {
                line,
                column,
                expected,
                found,
            } => write!(f, "expected {expected} at line {line}, column {column}, found {found}"),
            Self::EdgeOpMismatch { line, column, op, kind } => write!(
                f,
                "edge operator '{op}' at line {line}, column {column} is not allowed in a {kind} (use '{}')",
                kind.edge_op()
            ),
            Self::TrailingContent { line, column, found } => write!(
                f,
                "unexpected {found} after the closing brace at line {line}, column {column}"
            ),
            Self::NestingTooDeep { line, column, limit } => write!(
                f,
                "blocks nested deeper than {limit} levels at line {line}, column {column}"
            ),
        }
    }
}

impl std::error::Error for DotParseError {}
