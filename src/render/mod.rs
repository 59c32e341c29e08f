// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dotlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dotlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Text rendering for dot graphs.
//!
//! [`render_graph_source`] is the single entry point used by the viewer: it parses the source,
//! lays the graph out and paints it onto a [`Canvas`]. Rendering is pure; the same source always
//! produces the same text.

use std::fmt;

use serde::Serialize;

use crate::format::dot::{parse_dot, DotParseError};
use crate::layout::{layout_graph, LayoutError};
use crate::model::{DotGraph, GraphKind, GraphSource};

mod canvas;
mod graph;
mod text;

pub use canvas::{Canvas, CanvasError, MAX_CANVAS_CELLS};

const EMPTY_GRAPH_TEXT: &str = "(empty graph)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub max_node_label_width: usize,
    pub max_edge_label_width: usize,
    pub max_title_width: usize,
    /// Drawings needing more cells fail with [`CanvasError::AreaTooLarge`]; capped at
    /// [`MAX_CANVAS_CELLS`].
    pub max_canvas_cells: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_node_label_width: 40,
            max_edge_label_width: 24,
            max_title_width: 80,
            max_canvas_cells: MAX_CANVAS_CELLS,
        }
    }
}

/// Counts describing a rendered graph, shown next to the drawing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphSummary {
    pub name: Option<String>,
    pub kind: GraphKind,
    pub strict: bool,
    pub node_count: usize,
    pub edge_count: usize,
    pub cluster_count: usize,
}

impl GraphSummary {
    fn of(graph: &DotGraph) -> Self {
        Self {
            name: graph.name().map(str::to_owned),
            kind: graph.kind(),
            strict: graph.is_strict(),
            node_count: graph.nodes().len(),
            edge_count: graph.edges().len(),
            cluster_count: graph.clusters().len(),
        }
    }
}

impl fmt::Display for GraphSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.strict {
            f.write_str("strict ")?;
        }
        write!(f, "{}", self.kind)?;
        if let Some(name) = &self.name {
            write!(f, " {name}")?;
        }
        write!(
            f,
            ": {} nodes, {} edges, {} clusters",
            self.node_count, self.edge_count, self.cluster_count
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedGraph {
    pub text: String,
    pub summary: GraphSummary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    Syntax(DotParseError),
    Layout(LayoutError),
    Canvas(CanvasError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax(err) => write!(f, "syntax error: {err}"),
            Self::Layout(err) => write!(f, "layout error: {err}"),
            Self::Canvas(err) => write!(f, "render error: {err}"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Syntax(err) => Some(err),
            Self::Layout(err) => Some(err),
            Self::Canvas(err) => Some(err),
        }
    }
}

impl From<DotParseError> for RenderError {
    fn from(err: DotParseError) -> Self {
        Self::Syntax(err)
    }
}

impl From<LayoutError> for RenderError {
    fn from(err: LayoutError) -> Self {
        Self::Layout(err)
    }
}

impl From<CanvasError> for RenderError {
    fn from(err: CanvasError) -> Self {
        Self::Canvas(err)
    }
}

pub fn render_graph_source(source: &GraphSource) -> Result<RenderedGraph, RenderError> {
    render_graph_source_with_options(source, RenderOptions::default())
}

pub fn render_graph_source_with_options(
    source: &GraphSource,
    options: RenderOptions,
) -> Result<RenderedGraph, RenderError> {
    let graph = parse_dot(source.as_str())?;
    render_graph(&graph, options)
}

/// Renders an already parsed graph.
pub fn render_graph(graph: &DotGraph, options: RenderOptions) -> Result<RenderedGraph, RenderError> {
    let summary = GraphSummary::of(graph);
    if graph.nodes().is_empty() {
        return Ok(RenderedGraph {
            text: EMPTY_GRAPH_TEXT.to_owned(),
            summary,
        });
    }

    let layout = layout_graph(graph)?;
    let text = graph::paint_graph(graph, &layout, options)?;
    Ok(RenderedGraph { text, summary })
}

#[cfg(test)]
mod tests {
    use super::{
        render_graph_source, render_graph_source_with_options, CanvasError, RenderError,
        RenderOptions,
    };
    use crate::model::{GraphKind, GraphSource};

    #[test]
    fn renders_valid_source_with_summary() {
        let rendered = render_graph_source(&GraphSource::from("digraph G { A -> B; }")).unwrap();

        assert!(rendered.text.contains("│ A "));
        assert!(rendered.text.contains("│ B "));
        assert_eq!(rendered.text.matches('▶').count(), 1);
        assert_eq!(rendered.summary.name.as_deref(), Some("G"));
        assert_eq!(rendered.summary.kind, GraphKind::Digraph);
        assert_eq!(rendered.summary.node_count, 2);
        assert_eq!(rendered.summary.edge_count, 1);
        assert_eq!(rendered.summary.to_string(), "digraph G: 2 nodes, 1 edges, 0 clusters");
    }

    #[test]
    fn invalid_source_is_a_syntax_error() {
        let err = render_graph_source(&GraphSource::from("not a graph")).unwrap_err();

        assert!(matches!(err, RenderError::Syntax(_)));
        assert!(err.to_string().starts_with("syntax error: "));
    }

    #[test]
    fn rendering_is_idempotent() {
        let source = GraphSource::from(
            "digraph { rankdir=LR; a -> {b c} -> d; d -> a [label=back]; c -> c; subgraph cluster_x { b c } }",
        );
        assert_eq!(render_graph_source(&source), render_graph_source(&source));
    }

    #[test]
    fn oversized_drawings_are_render_errors() {
        let options = RenderOptions {
            max_canvas_cells: 20,
            ..RenderOptions::default()
        };
        let source = GraphSource::from("digraph { a -> b }");
        let err = render_graph_source_with_options(&source, options).unwrap_err();

        assert!(matches!(err, RenderError::Canvas(CanvasError::AreaTooLarge { .. })));
        assert!(err.to_string().starts_with("render error: graph too large to draw"));
    }

    #[test]
    fn empty_quoted_node_id_renders_an_empty_box() {
        let rendered = render_graph_source(&GraphSource::from(r#"digraph { "" -> a }"#))
            .expect("render");

        assert_eq!(rendered.summary.node_count, 2);
        assert!(rendered.text.contains("│   ├───▶│ a │"));
    }

    #[test]
    fn empty_graph_renders_placeholder() {
        let rendered = render_graph_source(&GraphSource::from("graph {}")).unwrap();
        assert_eq!(rendered.text, "(empty graph)");
        assert_eq!(rendered.summary.kind, GraphKind::Graph);
    }
}
