// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dotlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dotlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use std::fmt::Write as _;

use dotlens::model::GraphSource;
use tempfile::TempDir;

#[derive(Debug, Clone, Copy)]
pub enum Case {
    Small,
    MediumDense,
    LongChain,
    BackEdges,
    LongLabels,
}

impl Case {
    pub fn id(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::MediumDense => "medium_dense",
            Self::LongChain => "long_chain",
            Self::BackEdges => "back_edges",
            Self::LongLabels => "long_labels",
        }
    }
}

pub fn source(case: Case) -> GraphSource {
    let mut out = String::from("digraph bench {\n");
    match case {
        Case::Small => {
            out.push_str("  start -> parse -> render -> done;\n  parse -> error [label=\"bad\"];\n");
        }
        Case::MediumDense => {
            // 4 layers of 6 nodes, each node wired to three nodes of the next layer.
            for layer in 0..3 {
                for idx in 0..6 {
                    for step in 0..3 {
                        let target = (idx + step * 2) % 6;
                        let _ = writeln!(out, "  n{layer}_{idx} -> n{}_{target};", layer + 1);
                    }
                }
            }
        }
        Case::LongChain => {
            for idx in 0..40 {
                let _ = writeln!(out, "  c{idx} -> c{};", idx + 1);
            }
            // Skip edges force dummy chains across many layers.
            for idx in (0..40).step_by(8) {
                let _ = writeln!(out, "  c{idx} -> c{};", idx + 7);
            }
        }
        Case::BackEdges => {
            for idx in 0..20 {
                let _ = writeln!(out, "  s{idx} -> s{};", idx + 1);
                if idx % 3 == 0 {
                    let _ = writeln!(out, "  s{} -> s{idx} [label=\"retry\"];", idx + 2);
                }
            }
        }
        Case::LongLabels => {
            for idx in 0..12 {
                let _ = writeln!(
                    out,
                    "  l{idx} [label=\"step {idx}: validate the incoming utterance and route it\"];"
                );
                let _ = writeln!(
                    out,
                    "  l{idx} -> l{} [label=\"on success after normalization\"];",
                    idx + 1
                );
            }
        }
    }
    out.push_str("}\n");
    GraphSource::new(out)
}

/// A directory with `count` dot files named `graph_000.dot`, ... each holding `case`.
pub fn folder(case: Case, count: usize) -> TempDir {
    let tmp = TempDir::new().expect("create temp dir");
    let text = source(case);
    for idx in 0..count {
        std::fs::write(tmp.path().join(format!("graph_{idx:03}.dot")), text.as_str())
            .expect("write fixture");
    }
    tmp
}
