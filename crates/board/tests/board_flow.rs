use std::time::{Duration, Instant};

use glam::Vec2;

use tavla::{
    Board, Command, FrameScheduler, GameState, PlayerColor, PointerEvent, PointerPhase,
    PointerResponse, PointerSource, SessionEvent,
};

fn new_board() -> Board {
    let mut board = Board::new(FrameScheduler::noop());
    board.set_rect(0, 0, 1280, 720);
    board
}

fn space_center(board: &Board, space: usize) -> Vec2 {
    let rect = board.rects().get(space);
    board.face_origin() + Vec2::new((rect.x + rect.w / 2) as f32, (rect.y + rect.h / 2) as f32)
}

fn opening_with_names() -> GameState {
    let mut state = GameState::opening();
    state.player_name = "alice".into();
    state.opponent_name = "bob".into();
    state
}

#[test]
fn full_round_trip_against_a_session() {
    let mut board = new_board();

    // Welcome and join establish the players.
    board.handle_event(SessionEvent::Welcome {
        player_name: "alice".into(),
        clients: 2,
        matches: 1,
    });
    board.handle_event(SessionEvent::Joined {
        player: "bob".into(),
    });
    assert_eq!(board.state().player_name, "alice");
    assert_eq!(board.state().opponent_name, "bob");

    // Authoritative snapshot populates the registry.
    board.handle_event(SessionEvent::Board(opening_with_names()));
    assert_eq!(board.spaces()[1].len(), 2);
    assert_eq!(board.spaces()[24].len(), 2);

    // The opponent rolls and moves; moves animate strictly in order.
    board.handle_event(SessionEvent::Rolled {
        player: "bob".into(),
        roll: [6, 5],
    });
    assert_eq!(board.state().opponent_dice, [6, 5]);

    board.handle_event(SessionEvent::Moved {
        player: "bob".into(),
        moves: vec![(24, 18), (18, 13)],
    });
    let start = Instant::now();
    assert!(board.advance_animations(start));
    assert!(board.advance_animations(start + Duration::from_millis(1100)));
    assert!(!board.advance_animations(start + Duration::from_secs(3)));
    assert_eq!(board.spaces()[24].len(), 1);
    assert_eq!(board.spaces()[13].len(), 6);

    // Drag a premove, then submit it.
    let from = space_center(&board, 1);
    let to = space_center(&board, 7);
    board.handle_pointer(PointerEvent::new(
        PointerSource::Mouse,
        PointerPhase::Pressed,
        from,
    ));
    let dropped = board.handle_pointer(PointerEvent::new(
        PointerSource::Mouse,
        PointerPhase::Released,
        to,
    ));
    assert_eq!(dropped, PointerResponse::DragDropped { from: 1, to: 7 });
    assert_eq!(board.spaces()[7].len(), 1);
    assert!(board.spaces()[7][0].premove);

    let commands = board.submit_premoves();
    assert_eq!(
        commands,
        vec![Command::Move { from: 1, to: 7 }, Command::Ok]
    );

    // A rejected submit asks for a resync, and the fresh snapshot heals
    // the speculative view.
    let resync = board.handle_event(SessionEvent::FailedOk {
        reason: "dice not rolled".into(),
    });
    assert_eq!(resync, vec![Command::Board]);

    board.handle_event(SessionEvent::Board(opening_with_names()));
    assert_eq!(board.spaces()[7].len(), 0);
    assert_eq!(board.spaces()[1].len(), 2);
    assert!(board.premoves().is_empty());
}

#[test]
fn hit_sequence_is_sequential_with_a_pause() {
    let mut board = new_board();

    let mut state = opening_with_names();
    state.turn = Some(PlayerColor::Black);
    state.points[18] = 1; // lone white checker for bob to hit
    board.handle_event(SessionEvent::Board(state));

    board.handle_event(SessionEvent::Moved {
        player: "bob".into(),
        moves: vec![(24, 18)],
    });

    let start = Instant::now();
    assert!(board.advance_animations(start));

    // First animation lands: the mover holds 18 together with the victim
    // until the bar trip finishes.
    let landed = start + Duration::from_millis(1100);
    assert!(board.advance_animations(landed));
    assert_eq!(board.spaces()[18].len(), 2);
    assert!(board.moving_checker().is_none(), "paused between the two moves");

    // After the pause the hit checker animates to the bar. The opponent is
    // the mover, so the bar endpoint mirrors the local player's.
    let after_pause = landed + Duration::from_millis(800);
    assert!(board.advance_animations(after_pause));
    assert!(board.moving_checker().is_some());

    assert!(!board.advance_animations(after_pause + Duration::from_secs(2)));
    assert_eq!(board.spaces()[18].len(), 1);
    assert_eq!(
        board.spaces()[18][0].color,
        PlayerColor::Black,
        "the mover occupies the point alone"
    );
    assert_eq!(board.spaces()[25].len(), 1);
    assert_eq!(board.spaces()[25][0].color, PlayerColor::White);
}

#[test]
fn resync_mid_animation_replaces_everything() {
    let mut board = new_board();
    board.handle_event(SessionEvent::Board(opening_with_names()));

    board.handle_event(SessionEvent::Moved {
        player: "bob".into(),
        moves: vec![(24, 18), (13, 7)],
    });
    let start = Instant::now();
    board.advance_animations(start);
    assert!(board.animations_active());

    // Full snapshot arrives mid-flight: in-flight positions are abandoned
    // and the registry is rebuilt wholesale.
    board.handle_event(SessionEvent::Board(opening_with_names()));
    assert!(!board.animations_active());
    assert_eq!(board.spaces()[24].len(), 2);
    assert_eq!(board.spaces()[18].len(), 0);

    let rects = board.rects();
    for (space, pile) in board.spaces().iter().enumerate() {
        for (stack, checker) in pile.iter().enumerate() {
            assert_eq!(checker.pos, rects.checker_position(space, stack));
            assert!(checker.animation.is_none());
        }
    }
}
