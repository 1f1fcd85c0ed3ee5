use serde::{Deserialize, Serialize};

use crate::state::GameState;

/// Typed events consumed from the external session collaborator. Protocol
/// encoding and transport live outside this crate; the board only reacts
/// to the decoded stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    Welcome {
        player_name: String,
        clients: u32,
        matches: u32,
    },
    Joined {
        player: String,
    },
    Left {
        player: String,
    },
    /// Full authoritative snapshot; replaces local state wholesale.
    Board(GameState),
    Rolled {
        player: String,
        roll: [u8; 2],
    },
    /// Ordered move pairs to animate, one at a time.
    Moved {
        player: String,
        moves: Vec<(usize, usize)>,
    },
    FailedMove {
        from: usize,
        to: usize,
        reason: String,
    },
    FailedRoll {
        reason: String,
    },
    FailedOk {
        reason: String,
    },
    Win {
        player: String,
    },
    Notice(String),
    Help(String),
}

/// Commands emitted toward the session collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Request a fresh board snapshot (self-healing resync).
    Board,
    Move {
        from: usize,
        to: usize,
    },
    /// Submit the moves sent so far.
    Ok,
    Roll,
}
