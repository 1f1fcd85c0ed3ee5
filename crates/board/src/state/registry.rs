use crate::space::SPACE_COUNT;

use super::checker::Checker;
use super::game::GameState;
use super::premove::PremoveOverlay;

/// Rebuilds the space piles from scratch.
///
/// Every space materializes the authoritative count plus the overlay's net
/// premove adjustment. Synthetic checkers beyond the authoritative count
/// are flagged premove and take the local player's color regardless of the
/// space's sign. Prior checker identities are discarded; correctness must
/// not depend on matching old entities to new ones.
pub fn rebuild_spaces(
    state: &GameState,
    overlay: &PremoveOverlay,
    next_id: &mut u32,
) -> [Vec<Checker>; SPACE_COUNT] {
    let mut spaces: [Vec<Checker>; SPACE_COUNT] = std::array::from_fn(|_| Vec::new());

    for (space, pile) in spaces.iter_mut().enumerate() {
        let authoritative = state.checker_count(space);
        let total = authoritative + overlay.net(space);
        let base_color = state.color_at(space);

        for i in 0..total.max(0) {
            let id = *next_id;
            *next_id += 1;

            let mut checker = Checker::new(id, base_color);
            if i >= authoritative {
                checker.color = state.player_color;
                checker.premove = true;
            }
            pile.push(checker);
        }
    }

    spaces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::PlayerColor;

    #[test]
    fn rebuild_matches_authoritative_counts() {
        let state = GameState::opening();
        let mut next_id = 0;
        let spaces = rebuild_spaces(&state, &PremoveOverlay::default(), &mut next_id);

        assert_eq!(spaces[1].len(), 2);
        assert_eq!(spaces[12].len(), 5);
        assert_eq!(spaces[6].len(), 5);
        assert_eq!(spaces[0].len(), 0);
        assert!(spaces[1].iter().all(|c| c.color == PlayerColor::White));
        assert!(spaces[6].iter().all(|c| c.color == PlayerColor::Black));
    }

    #[test]
    fn premove_materializes_synthetic_checkers() {
        let state = GameState::opening();
        let mut overlay = PremoveOverlay::default();
        overlay.add(1, 2);

        let mut next_id = 0;
        let spaces = rebuild_spaces(&state, &overlay, &mut next_id);

        assert_eq!(spaces[1].len(), 1);
        assert_eq!(spaces[2].len(), 1);
        assert!(spaces[2][0].premove);
        assert_eq!(spaces[2][0].color, state.player_color);
    }

    #[test]
    fn premove_onto_opponent_point_keeps_local_color() {
        let state = GameState::opening();
        let mut overlay = PremoveOverlay::default();
        overlay.add(1, 13); // 13 holds five black checkers

        let mut next_id = 0;
        let spaces = rebuild_spaces(&state, &overlay, &mut next_id);

        assert_eq!(spaces[13].len(), 6);
        let synthetic = &spaces[13][5];
        assert!(synthetic.premove);
        assert_eq!(synthetic.color, PlayerColor::White);
        assert!(spaces[13][..5].iter().all(|c| c.color == PlayerColor::Black));
    }

    #[test]
    fn overlay_never_underflows_a_space() {
        let mut state = GameState::default();
        state.points[4] = 1;
        let mut overlay = PremoveOverlay::default();
        overlay.add(4, 5);
        overlay.add(4, 6); // second leave from a one-checker space

        let mut next_id = 0;
        let spaces = rebuild_spaces(&state, &overlay, &mut next_id);
        assert!(spaces[4].is_empty());
    }

    #[test]
    fn rebuild_assigns_fresh_ids() {
        let state = GameState::opening();
        let mut next_id = 0;
        let first = rebuild_spaces(&state, &PremoveOverlay::default(), &mut next_id);
        let second = rebuild_spaces(&state, &PremoveOverlay::default(), &mut next_id);

        let first_ids: Vec<u32> = first.iter().flatten().map(|c| c.id).collect();
        let second_ids: Vec<u32> = second.iter().flatten().map(|c| c.id).collect();
        assert!(first_ids.iter().all(|id| !second_ids.contains(id)));
    }
}
