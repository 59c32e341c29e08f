// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dotlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dotlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, BTreeSet};

use smallvec::SmallVec;

use super::canvas::{Canvas, CanvasError};
use super::text::{
    canvas_to_string_trimmed, label_lines, record_field_lines, text_len, truncate_with_ellipsis,
};
use super::RenderOptions;
use crate::layout::{GraphLayout, LayoutSlot};
use crate::model::{DotGraph, GraphEdge};

const ARROW_RIGHT: char = '▶';
const ARROW_LEFT: char = '◀';
const SELF_LOOP_MARK: &str = "↺";
const SLOT_GAP_ROWS: usize = 1;
// Border + padding on both sides of a node label.
const BOX_CHROME_WIDTH: usize = 4;
// Arrow cell + connector cell on each side of a gap.
const GAP_MIN_WIDTH: usize = 4;

/// One hop of an edge between two adjacent layers.
#[derive(Debug, Clone, Copy)]
struct Segment {
    edge: usize,
    left: LayoutSlot,
    right: LayoutSlot,
    gap: usize,
    first: bool,
    last: bool,
}

#[derive(Debug, Clone, Copy, Default)]
struct ArrowEnds {
    left: bool,
    right: bool,
}

#[derive(Debug, Default)]
struct SlotGeometry {
    y: usize,
    height: usize,
}

/// Paints a laid-out graph as Unicode text.
pub(crate) fn paint_graph(
    graph: &DotGraph,
    layout: &GraphLayout,
    options: RenderOptions,
) -> Result<String, CanvasError> {
    let node_lines = node_display_lines(graph, layout, options);
    let title_lines = graph
        .attributes()
        .get("label")
        .map(|label| {
            label_lines(label)
                .into_iter()
                .map(|line| truncate_with_ellipsis(&line, options.max_title_width))
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    let title_rows = if title_lines.is_empty() { 0 } else { title_lines.len() + 1 };

    let segments = collect_segments(layout);
    let mut out_degree = BTreeMap::<LayoutSlot, usize>::new();
    let mut in_degree = BTreeMap::<LayoutSlot, usize>::new();
    for segment in &segments {
        *out_degree.entry(segment.left).or_default() += 1;
        *in_degree.entry(segment.right).or_default() += 1;
    }

    // Vertical geometry: every layer is a stack of slots, centred on the tallest layer.
    let mut geometry = BTreeMap::<LayoutSlot, SlotGeometry>::new();
    let mut layer_heights = Vec::<usize>::with_capacity(layout.layers().len());
    for layer in layout.layers() {
        let mut height = 0usize;
        for (idx, slot) in layer.iter().enumerate() {
            let slot_height = match slot {
                LayoutSlot::Node(node) => {
                    let interior = node_lines[*node]
                        .len()
                        .max(out_degree.get(slot).copied().unwrap_or(0))
                        .max(in_degree.get(slot).copied().unwrap_or(0))
                        .max(1);
                    interior + 2
                }
                LayoutSlot::Dummy { .. } => 1,
            };
            if idx > 0 {
                height += SLOT_GAP_ROWS;
            }
            geometry.insert(*slot, SlotGeometry { y: height, height: slot_height });
            height += slot_height;
        }
        layer_heights.push(height);
    }
    let body_height = layer_heights.iter().copied().max().unwrap_or(0);
    for (layer, layer_height) in layout.layers().iter().zip(&layer_heights) {
        let offset = title_rows + (body_height - layer_height) / 2;
        for slot in layer {
            if let Some(geo) = geometry.get_mut(slot) {
                geo.y += offset;
            }
        }
    }

    // Port rows: connectors leave and enter in the order of the opposite end's position.
    let top_of = |slot: LayoutSlot| geometry.get(&slot).map_or(0, |geo| geo.y);
    let mut source_rows = vec![0usize; segments.len()];
    let mut target_rows = vec![0usize; segments.len()];
    let mut outgoing = BTreeMap::<LayoutSlot, SmallVec<[usize; 4]>>::new();
    let mut incoming = BTreeMap::<LayoutSlot, SmallVec<[usize; 4]>>::new();
    for (idx, segment) in segments.iter().enumerate() {
        outgoing.entry(segment.left).or_default().push(idx);
        incoming.entry(segment.right).or_default().push(idx);
    }
    for (slot, ports) in &mut outgoing {
        ports.sort_by_key(|idx| (top_of(segments[*idx].right), segments[*idx].edge));
        for (rank, idx) in ports.iter().enumerate() {
            source_rows[*idx] = port_row(*slot, top_of(*slot), rank);
        }
    }
    for (slot, ports) in &mut incoming {
        ports.sort_by_key(|idx| (top_of(segments[*idx].left), segments[*idx].edge));
        for (rank, idx) in ports.iter().enumerate() {
            target_rows[*idx] = port_row(*slot, top_of(*slot), rank);
        }
    }

    // Horizontal geometry: uniform box width per layer, gaps sized for labels and lanes.
    let layer_widths = layout
        .layers()
        .iter()
        .map(|layer| {
            layer
                .iter()
                .map(|slot| match slot {
                    LayoutSlot::Node(node) => {
                        let text_width =
                            node_lines[*node].iter().map(|line| text_len(line)).max().unwrap_or(0);
                        text_width.max(1) + BOX_CHROME_WIDTH
                    }
                    LayoutSlot::Dummy { .. } => 1,
                })
                .max()
                .unwrap_or(1)
        })
        .collect::<Vec<_>>();

    let edge_labels = graph
        .edges()
        .iter()
        .map(|edge| edge.label().map(|label| edge_label_text(label, options)))
        .collect::<Vec<_>>();

    let gap_count = layout.layers().len().saturating_sub(1);
    let mut label_blocks = vec![0usize; gap_count];
    let mut lane_counts = vec![0usize; gap_count];
    for (idx, segment) in segments.iter().enumerate() {
        if segment.first {
            if let Some(label) = &edge_labels[segment.edge] {
                // " label " plus one connector cell before the lanes.
                label_blocks[segment.gap] = label_blocks[segment.gap].max(text_len(label) + 3);
            }
        }
        if source_rows[idx] != target_rows[idx] {
            lane_counts[segment.gap] += 1;
        }
    }

    let mut layer_x = Vec::<usize>::with_capacity(layout.layers().len());
    let mut x = 0usize;
    for (layer_idx, width) in layer_widths.iter().enumerate() {
        layer_x.push(x);
        x += width;
        if layer_idx < gap_count {
            x += GAP_MIN_WIDTH + label_blocks[layer_idx] + lane_counts[layer_idx];
        }
    }
    let title_width = title_lines.iter().map(|line| text_len(line)).max().unwrap_or(0);
    let width = x.max(title_width).max(1);
    let height = title_rows + body_height.max(1);

    if width.saturating_mul(height) > options.max_canvas_cells {
        return Err(CanvasError::AreaTooLarge { width, height });
    }
    let mut canvas = Canvas::new(width, height)?;

    for (row, line) in title_lines.iter().enumerate() {
        canvas.write_str(0, row, line)?;
    }

    for (layer_idx, layer) in layout.layers().iter().enumerate() {
        let x0 = layer_x[layer_idx];
        let x1 = x0 + layer_widths[layer_idx] - 1;
        for slot in layer {
            let Some(geo) = geometry.get(slot) else {
                continue;
            };
            match slot {
                LayoutSlot::Node(node) => {
                    canvas.draw_box(x0, geo.y, x1, geo.y + geo.height - 1)?;
                    for (row, line) in node_lines[*node].iter().enumerate() {
                        canvas.write_str(x0 + 2, geo.y + 1 + row, line)?;
                    }
                }
                LayoutSlot::Dummy { .. } => canvas.draw_hline(x0, x1, geo.y)?,
            }
        }
    }

    let lanes = assign_lanes(&segments, &source_rows, &target_rows, gap_count);
    let arrows = graph
        .edges()
        .iter()
        .zip(layout.edge_paths())
        .map(|(edge, path)| arrow_ends(graph, edge, path.is_reversed()))
        .collect::<Vec<_>>();

    for (idx, segment) in segments.iter().enumerate() {
        let xl = layer_x[segment.gap] + layer_widths[segment.gap] - 1;
        let xr = layer_x[segment.gap + 1];
        let lane_base = xl + 3 + label_blocks[segment.gap];
        let lane_x = lane_base + lanes.get(&idx).copied().unwrap_or(0);
        canvas.draw_elbow(xl, source_rows[idx], lane_x, xr, target_rows[idx])?;
    }

    for (idx, segment) in segments.iter().enumerate() {
        let xl = layer_x[segment.gap] + layer_widths[segment.gap] - 1;
        let xr = layer_x[segment.gap + 1];
        let ends = arrows[segment.edge];
        if segment.first {
            if let Some(label) = &edge_labels[segment.edge] {
                canvas.write_str(xl + 3, source_rows[idx], &format!(" {label} "))?;
            }
            if ends.left {
                canvas.set(xl + 1, source_rows[idx], ARROW_LEFT)?;
            }
        }
        if segment.last && ends.right {
            canvas.set(xr - 1, target_rows[idx], ARROW_RIGHT)?;
        }
    }

    Ok(canvas_to_string_trimmed(&canvas))
}

fn node_display_lines(
    graph: &DotGraph,
    layout: &GraphLayout,
    options: RenderOptions,
) -> Vec<Vec<String>> {
    let graph_name = graph.name().unwrap_or_default();
    let mut lines = graph
        .nodes()
        .iter()
        .map(|node| {
            let label = node.label().replace("\\G", graph_name);
            let raw = match node.shape() {
                "record" | "Mrecord" => record_field_lines(&label),
                _ => label_lines(&label),
            };
            raw.iter()
                .map(|line| truncate_with_ellipsis(line, options.max_node_label_width))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    for (edge, path) in graph.edges().iter().zip(layout.edge_paths()) {
        if !path.is_self_loop() {
            continue;
        }
        let Some(node) = graph.node_position(edge.from_node_id()) else {
            continue;
        };
        let mark = match edge.label() {
            Some(label) => format!("{SELF_LOOP_MARK} {}", edge_label_text(label, options)),
            None => SELF_LOOP_MARK.to_owned(),
        };
        lines[node].push(truncate_with_ellipsis(&mark, options.max_node_label_width));
    }

    lines
}

fn edge_label_text(label: &str, options: RenderOptions) -> String {
    let joined = label_lines(label).join(" ");
    truncate_with_ellipsis(joined.trim(), options.max_edge_label_width)
}

fn collect_segments(layout: &GraphLayout) -> Vec<Segment> {
    let mut segments = Vec::new();
    for (edge, path) in layout.edge_paths().iter().enumerate() {
        let hops = path.slots().len().saturating_sub(1);
        for (hop, pair) in path.slots().windows(2).enumerate() {
            let Some((gap, _)) = layout.position(pair[0]) else {
                continue;
            };
            segments.push(Segment {
                edge,
                left: pair[0],
                right: pair[1],
                gap,
                first: hop == 0,
                last: hop + 1 == hops,
            });
        }
    }
    segments
}

fn port_row(slot: LayoutSlot, top: usize, rank: usize) -> usize {
    match slot {
        LayoutSlot::Node(_) => top + 1 + rank,
        LayoutSlot::Dummy { .. } => top,
    }
}

fn arrow_ends(graph: &DotGraph, edge: &GraphEdge, reversed: bool) -> ArrowEnds {
    let default_dir = if graph.kind().is_directed() { "forward" } else { "none" };
    let (head, tail) = match edge.attribute("dir").unwrap_or(default_dir) {
        "both" => (true, true),
        "back" => (false, true),
        "none" => (false, false),
        _ => (true, false),
    };

    if reversed {
        ArrowEnds { left: head, right: tail }
    } else {
        ArrowEnds { left: tail, right: head }
    }
}

/// Assigns a lane (column offset within its gap) to every bending segment.
///
/// Downward connectors are nested so the one starting highest takes the outermost lane, upward
/// ones mirror that. A connector whose source row is another connector's target row must take
/// the lower lane, otherwise the two horizontals would overlap.
fn assign_lanes(
    segments: &[Segment],
    source_rows: &[usize],
    target_rows: &[usize],
    gap_count: usize,
) -> BTreeMap<usize, usize> {
    let mut by_gap = vec![Vec::<usize>::new(); gap_count];
    for (idx, segment) in segments.iter().enumerate() {
        if source_rows[idx] != target_rows[idx] {
            by_gap[segment.gap].push(idx);
        }
    }

    let mut lanes = BTreeMap::new();
    for mut items in by_gap {
        items.sort_by_key(|idx| {
            let (src, tgt) = (source_rows[*idx], target_rows[*idx]);
            if src < tgt {
                (0, usize::MAX - src, *idx)
            } else {
                (1, src, *idx)
            }
        });

        let mut predecessors = BTreeMap::<usize, BTreeSet<usize>>::new();
        for &before in &items {
            for &after in &items {
                if before != after && source_rows[before] == target_rows[after] {
                    predecessors.entry(after).or_default().insert(before);
                }
            }
        }

        let mut placed = BTreeSet::<usize>::new();
        let mut lane = 0usize;
        while !items.is_empty() {
            let pick = items
                .iter()
                .position(|idx| {
                    predecessors
                        .get(idx)
                        .map_or(true, |before| before.iter().all(|b| placed.contains(b)))
                })
                // A constraint cycle cannot be satisfied; fall back to the preferred order.
                .unwrap_or(0);
            let idx = items.remove(pick);
            placed.insert(idx);
            lanes.insert(idx, lane);
            lane += 1;
        }
    }
    lanes
}
