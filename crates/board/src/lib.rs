pub mod anim;
pub mod board;
pub mod error;
pub mod input;
pub mod layout;
pub mod sched;
pub mod session;
pub mod space;
pub mod state;

pub use anim::{HIT_PAUSE, MOVE_DURATION, MoveAnimation, MoveContext, MoveQueue, MoveTask};
pub use board::Board;
pub use error::MoveError;
pub use input::{
    DragPosition, DragSession, PointerEvent, PointerPhase, PointerResponse, PointerSource,
    reset_button_rect,
};
pub use layout::{BoardMetrics, Rect, SpaceRects, bottom_row};
pub use sched::{FrameScheduler, MIN_FRAME_INTERVAL};
pub use session::{Command, SessionEvent};
pub use space::{
    Direction, PlayerColor, SPACE_COUNT, bar_space, home_space, translate_space,
};
pub use state::{Checker, GameState, PremoveOverlay, rebuild_spaces};
