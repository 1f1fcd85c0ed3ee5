use serde::{Deserialize, Serialize};

/// 24 points plus the two bar/off endpoints (spaces 0 and 25).
pub const SPACE_COUNT: usize = 26;

pub const FIRST_POINT: usize = 1;
pub const LAST_POINT: usize = 24;

pub fn is_endpoint(space: usize) -> bool {
    space == 0 || space == LAST_POINT + 1
}

/// Which way the local player's points run across the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

impl Direction {
    pub fn from_sign(sign: i8) -> Self {
        if sign < 0 {
            Direction::Reverse
        } else {
            Direction::Forward
        }
    }

    pub fn sign(self) -> i8 {
        match self {
            Direction::Forward => 1,
            Direction::Reverse => -1,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerColor {
    #[default]
    White,
    Black,
}

impl PlayerColor {
    pub fn from_sign(sign: i8) -> Self {
        if sign < 0 {
            PlayerColor::Black
        } else {
            PlayerColor::White
        }
    }

    pub fn sign(self) -> i8 {
        match self {
            PlayerColor::White => 1,
            PlayerColor::Black => -1,
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            PlayerColor::White => PlayerColor::Black,
            PlayerColor::Black => PlayerColor::White,
        }
    }
}

/// Maps a logical space index to its physical layout slot.
///
/// The canonical direction is the identity. Reversing the direction swaps
/// the endpoints and reflects the interior points around the table middle,
/// so the mapping is its own inverse.
pub fn translate_space(space: usize, direction: Direction) -> usize {
    debug_assert!(space < SPACE_COUNT);
    match direction {
        Direction::Forward => space,
        Direction::Reverse => {
            if is_endpoint(space) {
                25 - space
            } else if space <= 12 {
                12 + space
            } else {
                space - 12
            }
        }
    }
}

/// The endpoint the local player bears off to.
pub fn home_space(direction: Direction) -> usize {
    match direction {
        Direction::Forward => 25,
        Direction::Reverse => 0,
    }
}

/// The endpoint a hit checker is sent to.
pub fn bar_space(direction: Direction) -> usize {
    match direction {
        Direction::Forward => 0,
        Direction::Reverse => 25,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_is_involution() {
        for direction in [Direction::Forward, Direction::Reverse] {
            for space in 0..SPACE_COUNT {
                let twice = translate_space(translate_space(space, direction), direction);
                assert_eq!(twice, space, "space {space} direction {direction:?}");
            }
        }
    }

    #[test]
    fn reverse_swaps_endpoints() {
        assert_eq!(translate_space(0, Direction::Reverse), 25);
        assert_eq!(translate_space(25, Direction::Reverse), 0);
    }

    #[test]
    fn reverse_reflects_interior() {
        assert_eq!(translate_space(1, Direction::Reverse), 13);
        assert_eq!(translate_space(12, Direction::Reverse), 24);
        assert_eq!(translate_space(13, Direction::Reverse), 1);
        assert_eq!(translate_space(24, Direction::Reverse), 12);
    }

    #[test]
    fn forward_is_identity() {
        for space in 0..SPACE_COUNT {
            assert_eq!(translate_space(space, Direction::Forward), space);
        }
    }

    #[test]
    fn bar_is_opposite_home() {
        for direction in [Direction::Forward, Direction::Reverse] {
            assert_eq!(bar_space(direction), 25 - home_space(direction));
        }
    }
}
