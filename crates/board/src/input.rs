use std::sync::atomic::{AtomicU64, Ordering};

use glam::Vec2;

use crate::layout::Rect;

const RESET_BUTTON_W: i32 = 200;
const RESET_BUTTON_H: i32 = 75;

/// Which device owns a pointer interaction. Touch identifiers are tracked
/// explicitly so multi-touch devices cannot steal an active drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerSource {
    Mouse,
    Touch(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Pressed,
    Moved,
    Released,
}

/// A pointer or touch sample in window coordinates.
#[derive(Debug, Clone, Copy)]
pub struct PointerEvent {
    pub source: PointerSource,
    pub phase: PointerPhase,
    pub pos: Vec2,
}

impl PointerEvent {
    pub fn new(source: PointerSource, phase: PointerPhase, pos: Vec2) -> Self {
        Self { source, phase, pos }
    }
}

/// The single active drag. At most one exists system-wide; input from any
/// other source is ignored until the owner releases.
#[derive(Debug, Clone, Copy)]
pub struct DragSession {
    pub source: PointerSource,
    pub origin: usize,
    pub checker: u32,
    pub last: Vec2,
}

/// What a pointer event did to the board. The client shell uses this to
/// mirror drag ownership without holding the board lock on every sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerResponse {
    Ignored,
    ResetPressed,
    DragStarted { space: usize },
    DragMoved,
    DragDropped { from: usize, to: usize },
    DragAbandoned,
}

/// Advisory render position of the actively dragged checker.
///
/// Single writer (the input path), read only by rendering, so it lives
/// outside the board lock: both halves of the coordinate are packed into
/// one atomic word.
#[derive(Debug, Default)]
pub struct DragPosition(AtomicU64);

impl DragPosition {
    pub fn store(&self, pos: Vec2) {
        let bits = (u64::from(pos.x.to_bits()) << 32) | u64::from(pos.y.to_bits());
        self.0.store(bits, Ordering::Relaxed);
    }

    pub fn load(&self) -> Vec2 {
        let bits = self.0.load(Ordering::Relaxed);
        Vec2::new(
            f32::from_bits((bits >> 32) as u32),
            f32::from_bits(bits as u32),
        )
    }
}

/// Hot-zone for the premove reset button, centered on the board.
pub fn reset_button_rect(board_w: i32, board_h: i32) -> Rect {
    Rect::new(
        (board_w - RESET_BUTTON_W) / 2,
        (board_h - RESET_BUTTON_H) / 2,
        RESET_BUTTON_W,
        RESET_BUTTON_H,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_position_round_trips() {
        let slot = DragPosition::default();
        slot.store(Vec2::new(123.5, -42.25));
        assert_eq!(slot.load(), Vec2::new(123.5, -42.25));
    }

    #[test]
    fn drag_position_defaults_to_origin() {
        assert_eq!(DragPosition::default().load(), Vec2::ZERO);
    }

    #[test]
    fn reset_button_is_centered() {
        let rect = reset_button_rect(1280, 720);
        assert_eq!(rect.x, (1280 - rect.w) / 2);
        assert_eq!(rect.y, (720 - rect.h) / 2);
        assert!(rect.contains(640, 360));
        assert!(!rect.contains(0, 0));
    }
}
