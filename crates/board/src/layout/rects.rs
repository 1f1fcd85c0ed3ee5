use glam::Vec2;

use crate::space::{Direction, SPACE_COUNT, is_endpoint, translate_space};

use super::metrics::BoardMetrics;

const MAX_STACK_UNITS: f32 = 3.5;
const BOTTOM_ROW_EXTRA_UNITS: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x <= self.x + self.w && y >= self.y && y <= self.y + self.h
    }

    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }
}

/// Whether a space sits in the bottom half of the table for the given
/// direction. Both the rect table and the stacking math key off this, so
/// it must stay the single source of truth.
pub fn bottom_row(space: usize, direction: Direction) -> bool {
    let (start, end, bar) = match direction {
        Direction::Forward => (13, 24, 0),
        Direction::Reverse => (1, 12, 25),
    };
    space == bar || (space >= start && space <= end)
}

/// Cached per-space rectangles, in coordinates relative to the inner board
/// face. Recomputed only when the metrics or the direction change.
#[derive(Debug, Clone)]
pub struct SpaceRects {
    rects: [Rect; SPACE_COUNT],
    metrics: BoardMetrics,
    direction: Direction,
}

impl SpaceRects {
    pub fn compute(metrics: BoardMetrics, direction: Direction) -> Self {
        let mut rects = [Rect::default(); SPACE_COUNT];
        for (space, rect) in rects.iter_mut().enumerate() {
            *rect = space_rect(&metrics, space, direction);
        }
        Self {
            rects,
            metrics,
            direction,
        }
    }

    pub fn get(&self, space: usize) -> Rect {
        self.rects[space]
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn metrics(&self) -> &BoardMetrics {
        &self.metrics
    }

    /// Render position for the checker at `stack` within a space's pile:
    /// the stacking rectangle with the square checker centered in it.
    pub fn checker_position(&self, space: usize, stack: usize) -> Vec2 {
        let rect = self.stack_rect(space, stack);
        let x = rect.x + (rect.w - self.metrics.checker_size()) / 2;
        Vec2::new(x as f32, rect.y as f32)
    }

    /// First space whose rectangle contains the point, in face-relative
    /// coordinates. Space rects do not overlap, so first-match is total.
    pub fn space_at(&self, x: i32, y: i32) -> Option<usize> {
        (0..SPACE_COUNT).find(|&space| self.rects[space].contains(x, y))
    }

    /// Sub-rectangle for the checker at `stack` (0-based) within a space's
    /// pile. The offset grows linearly and caps at 3.5 overlap units so
    /// tall piles stay bounded; bottom-row piles grow upward from the
    /// row's outer edge.
    pub fn stack_rect(&self, space: usize, stack: usize) -> Rect {
        let base = self.rects[space];
        let m = &self.metrics;

        let mut units = (stack as f32).min(MAX_STACK_UNITS);
        if bottom_row(space, self.direction) {
            units += BOTTOM_ROW_EXTRA_UNITS;
        }
        let offset = (units * m.overlap as f32) as i32;

        let y = if bottom_row(space, self.direction) {
            base.y + (base.h - offset)
        } else {
            base.y + offset
        };

        let w = if is_endpoint(space) {
            m.bar_width
        } else {
            m.space_width
        };

        Rect::new(base.x, y, w, m.space_width)
    }
}

fn space_rect(m: &BoardMetrics, space: usize, direction: Direction) -> Rect {
    let slot = translate_space(space, direction);

    let y = if bottom_row(space, direction) {
        m.height / 2 - m.vertical_border
    } else {
        0
    };

    let mut w = m.space_width;
    let (hslot, add) = if is_endpoint(slot) {
        w = m.bar_width;
        (6, 0)
    } else if slot <= 6 {
        (slot as i32 - 1, 0)
    } else if slot <= 12 {
        (slot as i32 - 1, m.bar_width)
    } else if slot <= 18 {
        (24 - slot as i32, m.bar_width)
    } else {
        (24 - slot as i32, 0)
    };

    Rect::new(m.space_width * hslot + add, y, w, m.row_height())
}
