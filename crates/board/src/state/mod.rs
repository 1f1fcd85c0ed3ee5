mod checker;
mod game;
mod premove;
mod registry;

pub use checker::Checker;
pub use game::GameState;
pub use premove::PremoveOverlay;
pub use registry::rebuild_spaces;
