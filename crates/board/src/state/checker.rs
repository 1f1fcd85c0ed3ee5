use glam::Vec2;

use crate::anim::MoveAnimation;
use crate::space::PlayerColor;

/// One checker on the board. Owned exclusively by the board's space piles;
/// moved between piles only by a registry rebuild or by the move queue
/// committing a finished animation.
#[derive(Debug, Clone)]
pub struct Checker {
    pub id: u32,
    pub color: PlayerColor,
    /// Render position in face-relative pixels.
    pub pos: Vec2,
    /// In-flight movement, if any.
    pub animation: Option<MoveAnimation>,
    /// Speculative checker materialized from the premove overlay; not yet
    /// confirmed by the server.
    pub premove: bool,
}

impl Checker {
    pub fn new(id: u32, color: PlayerColor) -> Self {
        Self {
            id,
            color,
            pos: Vec2::ZERO,
            animation: None,
            premove: false,
        }
    }

    pub fn is_moving(&self) -> bool {
        self.animation.is_some()
    }
}
