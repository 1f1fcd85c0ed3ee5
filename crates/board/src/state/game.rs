use serde::{Deserialize, Serialize};

use crate::space::{Direction, PlayerColor, SPACE_COUNT};

/// Authoritative snapshot pushed by the session collaborator. Replaced
/// wholesale on every update, never mutated in place; the checker registry
/// is rebuilt from it each time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub player_name: String,
    pub opponent_name: String,
    /// Signed checker count per space; the sign is the owning color.
    pub points: [i8; SPACE_COUNT],
    pub player_color: PlayerColor,
    pub direction: Direction,
    pub turn: Option<PlayerColor>,
    pub player_dice: [u8; 2],
    pub opponent_dice: [u8; 2],
    /// Premove set the server currently knows about.
    pub premoves: Vec<(usize, usize)>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            player_name: String::new(),
            opponent_name: String::new(),
            points: [0; SPACE_COUNT],
            player_color: PlayerColor::White,
            direction: Direction::Forward,
            turn: None,
            player_dice: [0; 2],
            opponent_dice: [0; 2],
            premoves: Vec::new(),
        }
    }
}

impl GameState {
    /// Standard opening position. White runs 1 -> 24.
    pub fn opening() -> Self {
        let mut points = [0i8; SPACE_COUNT];
        points[1] = 2;
        points[12] = 5;
        points[17] = 3;
        points[19] = 5;
        points[24] = -2;
        points[13] = -5;
        points[8] = -3;
        points[6] = -5;
        Self {
            points,
            ..Self::default()
        }
    }

    pub fn is_local_turn(&self) -> bool {
        self.turn == Some(self.player_color)
    }

    pub fn checker_count(&self, space: usize) -> i32 {
        i32::from(self.points[space]).abs()
    }

    pub fn color_at(&self, space: usize) -> PlayerColor {
        let signed = self.points[space];
        if signed == 0 {
            self.player_color
        } else {
            PlayerColor::from_sign(signed.signum())
        }
    }
}
