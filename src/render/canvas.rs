// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dotlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dotlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

pub const BOX_HORIZONTAL: char = '─';
pub const BOX_VERTICAL: char = '│';
pub const BOX_TOP_LEFT: char = '┌';
pub const BOX_TOP_RIGHT: char = '┐';
pub const BOX_BOTTOM_LEFT: char = '└';
pub const BOX_BOTTOM_RIGHT: char = '┘';
pub const BOX_TEE_RIGHT: char = '├';
pub const BOX_TEE_LEFT: char = '┤';
pub const BOX_TEE_DOWN: char = '┬';
pub const BOX_TEE_UP: char = '┴';
pub const BOX_CROSS: char = '┼';

/// Largest canvas ever allocated (cells, not bytes).
pub const MAX_CANVAS_CELLS: usize = 1 << 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BoxEdges(u8);

impl BoxEdges {
    const NONE: Self = Self(0);
    const LEFT: Self = Self(1 << 0);
    const RIGHT: Self = Self(1 << 1);
    const UP: Self = Self(1 << 2);
    const DOWN: Self = Self(1 << 3);
    const HORIZONTAL: Self = Self(Self::LEFT.0 | Self::RIGHT.0);
    const VERTICAL: Self = Self(Self::UP.0 | Self::DOWN.0);

    fn is_empty(self) -> bool {
        self.0 == 0
    }

    fn contains(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

fn box_edges_from_char(ch: char) -> Option<BoxEdges> {
    let edges = match ch {
        BOX_HORIZONTAL => BoxEdges::HORIZONTAL,
        BOX_VERTICAL => BoxEdges::VERTICAL,
        BOX_TOP_LEFT => BoxEdges::RIGHT.union(BoxEdges::DOWN),
        BOX_TOP_RIGHT => BoxEdges::LEFT.union(BoxEdges::DOWN),
        BOX_BOTTOM_LEFT => BoxEdges::RIGHT.union(BoxEdges::UP),
        BOX_BOTTOM_RIGHT => BoxEdges::LEFT.union(BoxEdges::UP),
        BOX_TEE_RIGHT => BoxEdges::VERTICAL.union(BoxEdges::RIGHT),
        BOX_TEE_LEFT => BoxEdges::VERTICAL.union(BoxEdges::LEFT),
        BOX_TEE_DOWN => BoxEdges::HORIZONTAL.union(BoxEdges::DOWN),
        BOX_TEE_UP => BoxEdges::HORIZONTAL.union(BoxEdges::UP),
        BOX_CROSS => BoxEdges::HORIZONTAL.union(BoxEdges::VERTICAL),
        _ => return None,
    };
    Some(edges)
}

fn box_char_from_edges(edges: BoxEdges) -> char {
    match edges.0 {
        0 => ' ',
        // Line ends render as plain segments.
        1..=3 => BOX_HORIZONTAL,
        4 | 8 | 12 => BOX_VERTICAL,
        10 => BOX_TOP_LEFT,
        9 => BOX_TOP_RIGHT,
        6 => BOX_BOTTOM_LEFT,
        5 => BOX_BOTTOM_RIGHT,
        14 => BOX_TEE_RIGHT,
        13 => BOX_TEE_LEFT,
        11 => BOX_TEE_DOWN,
        7 => BOX_TEE_UP,
        _ => BOX_CROSS,
    }
}

/// Bounds-checked character grid used to paint graphs.
///
/// Plain characters overwrite whatever is below them. Box-drawing characters accumulate their
/// line directions per cell and render as the junction that matches their connected
/// neighbours, so a connector that ends on a box border turns it into `├`/`┤`, and a lane that
/// bends becomes `┐`/`└`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<char>,
    box_edges: Vec<BoxEdges>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Result<Self, CanvasError> {
        Self::new_filled(width, height, ' ')
    }

    pub fn new_filled(width: usize, height: usize, fill: char) -> Result<Self, CanvasError> {
        let len = width
            .checked_mul(height)
            .ok_or(CanvasError::AreaOverflow { width, height })?;
        if len > MAX_CANVAS_CELLS {
            return Err(CanvasError::AreaTooLarge { width, height });
        }

        Ok(Self {
            width,
            height,
            cells: vec![fill; len],
            box_edges: vec![BoxEdges::NONE; len],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    /// Returns the character rendered at `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> Result<char, CanvasError> {
        let idx = self.index_of(x, y)?;
        Ok(self.render_at(x, y, idx))
    }

    pub fn set(&mut self, x: usize, y: usize, ch: char) -> Result<(), CanvasError> {
        let idx = self.index_of(x, y)?;
        if let Some(edges) = box_edges_from_char(ch) {
            self.box_edges[idx] = self.box_edges[idx].union(edges);
        } else {
            self.cells[idx] = ch;
            self.box_edges[idx] = BoxEdges::NONE;
        }
        Ok(())
    }

    /// Writes `text` left-to-right from `(x, y)`, clipping at the right edge.
    pub fn write_str(&mut self, x: usize, y: usize, text: &str) -> Result<(), CanvasError> {
        if y >= self.height {
            return Err(self.out_of_bounds(x, y));
        }

        for (offset, ch) in text.chars().enumerate() {
            let Some(cx) = x.checked_add(offset).filter(|cx| *cx < self.width) else {
                break;
            };
            self.set(cx, y, ch)?;
        }

        Ok(())
    }

    /// Draws `x0..=x1` at row `y`. Nothing is drawn when any cell is out of bounds.
    pub fn draw_hline(&mut self, x0: usize, x1: usize, y: usize) -> Result<(), CanvasError> {
        let (min_x, max_x) = (x0.min(x1), x0.max(x1));
        if y >= self.height || max_x >= self.width {
            return Err(self.out_of_bounds(max_x, y));
        }

        for x in min_x..=max_x {
            self.set(x, y, BOX_HORIZONTAL)?;
        }
        Ok(())
    }

    /// Draws `y0..=y1` at column `x`. Nothing is drawn when any cell is out of bounds.
    pub fn draw_vline(&mut self, x: usize, y0: usize, y1: usize) -> Result<(), CanvasError> {
        let (min_y, max_y) = (y0.min(y1), y0.max(y1));
        if x >= self.width || max_y >= self.height {
            return Err(self.out_of_bounds(x, max_y));
        }

        for y in min_y..=max_y {
            self.set(x, y, BOX_VERTICAL)?;
        }
        Ok(())
    }

    /// Draws a single-line box with corners at `(x0, y0)` and `(x1, y1)`.
    pub fn draw_box(
        &mut self,
        x0: usize,
        y0: usize,
        x1: usize,
        y1: usize,
    ) -> Result<(), CanvasError> {
        let (min_x, max_x) = (x0.min(x1), x0.max(x1));
        let (min_y, max_y) = (y0.min(y1), y0.max(y1));
        if max_x >= self.width || max_y >= self.height {
            return Err(self.out_of_bounds(max_x, max_y));
        }

        if min_x == max_x && min_y == max_y {
            return self.set(min_x, min_y, BOX_CROSS);
        }
        if min_y == max_y {
            return self.draw_hline(min_x, max_x, min_y);
        }
        if min_x == max_x {
            return self.draw_vline(min_x, min_y, max_y);
        }

        self.draw_hline(min_x, max_x, min_y)?;
        self.draw_hline(min_x, max_x, max_y)?;
        self.draw_vline(min_x, min_y, max_y)?;
        self.draw_vline(max_x, min_y, max_y)?;
        Ok(())
    }

    /// Draws a three-segment connector: along `from_y` to `lane_x`, down or up the lane to
    /// `to_y`, then along `to_y` to `to_x`.
    pub fn draw_elbow(
        &mut self,
        from_x: usize,
        from_y: usize,
        lane_x: usize,
        to_x: usize,
        to_y: usize,
    ) -> Result<(), CanvasError> {
        if from_y == to_y {
            return self.draw_hline(from_x, to_x, from_y);
        }
        self.draw_hline(from_x, lane_x, from_y)?;
        self.draw_vline(lane_x, from_y, to_y)?;
        self.draw_hline(lane_x, to_x, to_y)
    }

    fn out_of_bounds(&self, x: usize, y: usize) -> CanvasError {
        CanvasError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }

    fn index_of(&self, x: usize, y: usize) -> Result<usize, CanvasError> {
        if !self.in_bounds(x, y) {
            return Err(self.out_of_bounds(x, y));
        }
        Ok((y * self.width) + x)
    }

    fn render_at(&self, x: usize, y: usize, idx: usize) -> char {
        let edges = self.box_edges[idx];
        if edges.is_empty() {
            return self.cells[idx];
        }

        let connected = self.connected_box_edges(x, y, edges);
        box_char_from_edges(if connected.is_empty() { edges } else { connected })
    }

    fn connected_box_edges(&self, x: usize, y: usize, edges: BoxEdges) -> BoxEdges {
        let neighbours = [
            (BoxEdges::LEFT, BoxEdges::RIGHT, x.checked_sub(1).map(|nx| (nx, y))),
            (BoxEdges::RIGHT, BoxEdges::LEFT, Some((x + 1, y))),
            (BoxEdges::UP, BoxEdges::DOWN, y.checked_sub(1).map(|ny| (x, ny))),
            (BoxEdges::DOWN, BoxEdges::UP, Some((x, y + 1))),
        ];

        let mut connected = BoxEdges::NONE;
        for (direction, opposite, neighbour) in neighbours {
            if !edges.contains(direction) {
                continue;
            }
            let Some((nx, ny)) = neighbour.filter(|(nx, ny)| self.in_bounds(*nx, *ny)) else {
                continue;
            };
            if self.box_edges[(ny * self.width) + nx].contains(opposite) {
                connected = connected.union(direction);
            }
        }
        connected
    }
}

impl fmt::Display for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use std::fmt::Write as _;

        for y in 0..self.height {
            for x in 0..self.width {
                f.write_char(self.render_at(x, y, (y * self.width) + x))?;
            }
            if y + 1 < self.height {
                f.write_char('\n')?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanvasError {
    AreaOverflow {
        width: usize,
        height: usize,
    },
    AreaTooLarge {
        width: usize,
        height: usize,
    },
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}

impl fmt::Display for CanvasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AreaOverflow { width, height } => {
                write!(f, "canvas area overflow: {width}*{height}")
            }
            Self::AreaTooLarge { width, height } => {
                write!(f, "graph too large to draw: {width}x{height} cells")
            }
            Self::OutOfBounds {
                x,
                y,
                width,
                height,
            } => write!(f, "out of bounds: ({x},{y}) for {width}x{height} canvas"),
        }
    }
}

impl std::error::Error for CanvasError {}

#[cfg(test)]
mod tests {
    use super::{Canvas, CanvasError, MAX_CANVAS_CELLS};

    #[test]
    fn set_and_get_in_bounds() {
        let mut c = Canvas::new_filled(3, 2, '.').expect("canvas");
        c.set(1, 0, 'X').unwrap();
        assert_eq!(c.get(1, 0).unwrap(), 'X');
        assert_eq!(c.to_string(), ".X.\n...");
    }

    #[test]
    fn out_of_bounds_access_errors() {
        let mut c = Canvas::new(2, 2).expect("canvas");
        assert_eq!(
            c.set(2, 0, 'X').unwrap_err(),
            CanvasError::OutOfBounds {
                x: 2,
                y: 0,
                width: 2,
                height: 2
            }
        );
        assert!(c.get(0, 2).is_err());
    }

    #[test]
    fn rejects_area_overflow() {
        let err = Canvas::new_filled(usize::MAX, 2, '.').unwrap_err();
        assert_eq!(
            err,
            CanvasError::AreaOverflow {
                width: usize::MAX,
                height: 2
            }
        );
    }

    #[test]
    fn rejects_areas_above_the_cell_limit() {
        let err = Canvas::new(MAX_CANVAS_CELLS / 2 + 1, 2).unwrap_err();
        assert_eq!(
            err,
            CanvasError::AreaTooLarge {
                width: MAX_CANVAS_CELLS / 2 + 1,
                height: 2
            }
        );
        assert!(Canvas::new(MAX_CANVAS_CELLS / 2, 2).is_ok());
    }

    #[test]
    fn write_str_clips_at_right_edge() {
        let mut c = Canvas::new_filled(4, 1, '.').expect("canvas");
        c.write_str(2, 0, "abcdef").unwrap();
        assert_eq!(c.to_string(), "..ab");
    }

    #[test]
    fn draw_box_draws_corners_and_edges() {
        let mut c = Canvas::new_filled(6, 5, '.').expect("canvas");
        c.draw_box(1, 1, 4, 3).unwrap();
        assert_eq!(c.to_string(), "......\n.┌──┐.\n.│..│.\n.└──┘.\n......");
    }

    #[test]
    fn draw_box_out_of_bounds_is_not_partial() {
        let mut c = Canvas::new_filled(4, 3, '.').expect("canvas");
        assert!(c.draw_box(0, 0, 4, 2).is_err());
        assert_eq!(c.to_string(), "....\n....\n....");
    }

    #[test]
    fn crossing_lines_merge_into_a_cross() {
        let mut c = Canvas::new_filled(5, 5, '.').expect("canvas");
        c.draw_hline(0, 4, 2).unwrap();
        c.draw_vline(2, 0, 4).unwrap();
        assert_eq!(c.to_string(), "..│..\n..│..\n──┼──\n..│..\n..│..");
    }

    #[test]
    fn connector_ending_on_a_border_becomes_a_tee() {
        let mut c = Canvas::new_filled(5, 3, '.').expect("canvas");
        c.draw_vline(0, 0, 2).unwrap();
        c.draw_hline(0, 4, 1).unwrap();
        assert_eq!(c.to_string(), "│....\n├────\n│....");
    }

    #[test]
    fn elbow_bends_through_its_lane() {
        let mut c = Canvas::new_filled(5, 3, '.').expect("canvas");
        c.draw_elbow(0, 0, 2, 4, 2).unwrap();
        assert_eq!(c.to_string(), "──┐..\n..│..\n..└──");
    }

    #[test]
    fn elbow_on_one_row_is_straight() {
        let mut c = Canvas::new_filled(4, 1, '.').expect("canvas");
        c.draw_elbow(0, 0, 2, 3, 0).unwrap();
        assert_eq!(c.to_string(), "────");
    }
}
