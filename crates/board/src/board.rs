use std::sync::Arc;
use std::time::Instant;

use glam::Vec2;

use crate::anim::{MoveContext, MoveQueue};
use crate::input::{
    DragPosition, DragSession, PointerEvent, PointerPhase, PointerResponse, reset_button_rect,
};
use crate::layout::{BoardMetrics, Rect, SpaceRects};
use crate::sched::FrameScheduler;
use crate::session::{Command, SessionEvent};
use crate::space::{Direction, SPACE_COUNT};
use crate::state::{Checker, GameState, PremoveOverlay, rebuild_spaces};

/// The interactive board: authoritative state, derived layout, the checker
/// piles, the premove overlay, the animation queue, and the drag session.
///
/// Layout constants are recomputed atomically whenever the dimensions
/// change, so they are always consistent with the last-set rectangle.
/// Shared behind a single exclusive lock; the session-event worker and the
/// input path both hold it across read-modify-write sequences.
pub struct Board {
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    metrics: BoardMetrics,
    rects: SpaceRects,
    spaces: [Vec<Checker>; SPACE_COUNT],
    state: GameState,
    premoves: PremoveOverlay,
    anim: MoveQueue,
    drag: Option<DragSession>,
    drag_pos: Arc<DragPosition>,
    next_checker_id: u32,
    last_direction: Direction,
    scheduler: FrameScheduler,
}

impl Board {
    pub fn new(scheduler: FrameScheduler) -> Self {
        let metrics = BoardMetrics::default();
        let rects = SpaceRects::compute(metrics, Direction::Forward);
        Self {
            x: 0,
            y: 0,
            w: 0,
            h: 0,
            metrics,
            rects,
            spaces: std::array::from_fn(|_| Vec::new()),
            state: GameState::default(),
            premoves: PremoveOverlay::default(),
            anim: MoveQueue::new(),
            drag: None,
            drag_pos: Arc::new(DragPosition::default()),
            next_checker_id: 0,
            last_direction: Direction::Forward,
            scheduler,
        }
    }

    /// The layout container reports the available pixel area here.
    pub fn set_rect(&mut self, x: i32, y: i32, w: i32, h: i32) {
        if self.x == x && self.y == y && self.w == w && self.h == h {
            return;
        }
        self.x = x;
        self.y = y;
        self.w = w;
        self.h = h;
        self.metrics = BoardMetrics::compute(w, h);
        self.rects = SpaceRects::compute(self.metrics, self.state.direction);
        self.position_checkers();
    }

    /// Bulk authoritative update: replaces the snapshot wholesale, adopts
    /// the premove set it reports, and rebuilds the registry.
    pub fn set_state(&mut self, state: GameState) {
        self.state = state;
        self.premoves = PremoveOverlay::from_pairs(&self.state.premoves);
        self.process_state();
    }

    /// Rebuilds the checker registry from the current fields. Abandons any
    /// in-flight animation; a resync may replace the registry at any time.
    pub fn process_state(&mut self) {
        if self.last_direction != self.state.direction {
            self.rects = SpaceRects::compute(self.metrics, self.state.direction);
        }
        self.last_direction = self.state.direction;

        self.anim.clear();
        self.spaces = rebuild_spaces(&self.state, &self.premoves, &mut self.next_checker_id);
        self.position_checkers();
    }

    fn position_checkers(&mut self) {
        let drag_id = self.drag.map(|d| d.checker);
        for (space, pile) in self.spaces.iter_mut().enumerate() {
            for (stack, checker) in pile.iter_mut().enumerate() {
                if Some(checker.id) == drag_id || checker.is_moving() {
                    continue;
                }
                checker.pos = self.rects.checker_position(space, stack);
            }
        }
        self.scheduler.request_frame();
    }

    pub fn add_premove(&mut self, from: usize, to: usize) {
        self.premoves.add(from, to);
        self.process_state();
    }

    pub fn reset_premoves(&mut self) {
        self.premoves.reset();
        self.process_state();
    }

    /// Sends the accumulated premoves as discrete move commands followed
    /// by a submit, then clears the overlay.
    pub fn submit_premoves(&mut self) -> Vec<Command> {
        if self.premoves.is_empty() {
            return Vec::new();
        }
        let mut commands: Vec<Command> = self
            .premoves
            .pairs()
            .iter()
            .map(|&(from, to)| Command::Move { from, to })
            .collect();
        commands.push(Command::Ok);

        self.premoves.reset();
        self.process_state();
        commands
    }

    /// Reacts to one session event; returns the commands to send back.
    pub fn handle_event(&mut self, event: SessionEvent) -> Vec<Command> {
        match event {
            SessionEvent::Welcome {
                player_name,
                clients,
                matches,
            } => {
                log::info!("welcome {player_name}: {clients} clients, {matches} matches");
                self.state.player_name = player_name;
                Vec::new()
            }
            SessionEvent::Joined { player } => {
                if player != self.state.player_name {
                    self.state.opponent_name = player;
                }
                self.process_state();
                Vec::new()
            }
            SessionEvent::Left { player } => {
                if self.state.opponent_name == player {
                    self.state.opponent_name.clear();
                }
                self.process_state();
                Vec::new()
            }
            SessionEvent::Board(state) => {
                self.set_state(state);
                Vec::new()
            }
            SessionEvent::Rolled { player, roll } => {
                log::info!("{player} rolled {}-{}", roll[0], roll[1]);
                if player == self.state.player_name {
                    self.state.player_dice = roll;
                } else {
                    self.state.opponent_dice = roll;
                }
                self.scheduler.request_frame();
                Vec::new()
            }
            SessionEvent::Moved { player, moves } => {
                // Our own moves were already previewed by the overlay.
                if player == self.state.player_name {
                    return Vec::new();
                }
                for (from, to) in moves {
                    self.anim.push(from, to);
                }
                self.scheduler.request_frame();
                Vec::new()
            }
            SessionEvent::FailedMove { from, to, reason } => {
                log::warn!("move {from}-{to} rejected: {reason}");
                vec![Command::Board]
            }
            SessionEvent::FailedRoll { reason } => {
                log::warn!("roll rejected: {reason}");
                Vec::new()
            }
            SessionEvent::FailedOk { reason } => {
                log::warn!("submit rejected: {reason}");
                vec![Command::Board]
            }
            SessionEvent::Win { player } => {
                log::info!("{player} wins");
                Vec::new()
            }
            SessionEvent::Notice(message) => {
                log::info!("{message}");
                Vec::new()
            }
            SessionEvent::Help(message) => {
                log::info!("help: {message}");
                Vec::new()
            }
        }
    }

    /// Drives the move queue. Returns true while animations remain so the
    /// caller keeps requesting frames.
    pub fn advance_animations(&mut self, now: Instant) -> bool {
        let ctx = MoveContext {
            direction: self.state.direction,
            player_color: self.state.player_color,
            turn: self.state.turn,
        };
        self.anim.advance(now, &mut self.spaces, &self.rects, ctx)
    }

    pub fn set_animation_speed(&mut self, speed: u32) {
        self.anim.set_speed(speed);
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) -> PointerResponse {
        match event.phase {
            PointerPhase::Pressed => self.handle_press(event),
            PointerPhase::Moved => self.handle_drag_move(event),
            PointerPhase::Released => self.handle_release(event),
        }
    }

    fn handle_press(&mut self, event: PointerEvent) -> PointerResponse {
        // One input source owns the drag; others wait for the release.
        if self.drag.is_some() {
            return PointerResponse::Ignored;
        }

        if !self.premoves.is_empty() {
            let button = reset_button_rect(self.w, self.h);
            let local_x = event.pos.x as i32 - self.x;
            let local_y = event.pos.y as i32 - self.y;
            if button.contains(local_x, local_y) {
                self.reset_premoves();
                return PointerResponse::ResetPressed;
            }
        }

        let Some(space) = self.space_at(event.pos) else {
            return PointerResponse::Ignored;
        };
        let Some(checker) = self.spaces[space].last() else {
            return PointerResponse::Ignored;
        };

        self.drag = Some(DragSession {
            source: event.source,
            origin: space,
            checker: checker.id,
            last: event.pos,
        });
        self.drag_pos.store(event.pos);
        self.scheduler.request_frame();
        PointerResponse::DragStarted { space }
    }

    fn handle_drag_move(&mut self, event: PointerEvent) -> PointerResponse {
        match &mut self.drag {
            Some(drag) if drag.source == event.source => {
                drag.last = event.pos;
                self.drag_pos.store(event.pos);
                self.scheduler.request_frame();
                PointerResponse::DragMoved
            }
            _ => PointerResponse::Ignored,
        }
    }

    fn handle_release(&mut self, event: PointerEvent) -> PointerResponse {
        let Some(drag) = self.drag else {
            return PointerResponse::Ignored;
        };
        if drag.source != event.source {
            return PointerResponse::Ignored;
        }
        self.drag = None;

        // A rebuild may have discarded the grabbed checker; the drop then
        // has no effect.
        let grabbed_alive = self.spaces[drag.origin]
            .iter()
            .any(|c| c.id == drag.checker);

        match self.space_at(event.pos) {
            Some(to) if to != drag.origin && grabbed_alive => {
                self.add_premove(drag.origin, to);
                PointerResponse::DragDropped {
                    from: drag.origin,
                    to,
                }
            }
            _ => {
                self.position_checkers();
                PointerResponse::DragAbandoned
            }
        }
    }

    /// Space under a point in window coordinates, if any.
    pub fn space_at(&self, pos: Vec2) -> Option<usize> {
        let local_x = pos.x as i32 - (self.x + self.metrics.horizontal_border);
        let local_y = pos.y as i32 - (self.y + self.metrics.vertical_border);
        self.rects.space_at(local_x, local_y)
    }

    /// Offset from face-relative coordinates to window coordinates.
    pub fn face_origin(&self) -> Vec2 {
        Vec2::new(
            (self.x + self.metrics.horizontal_border) as f32,
            (self.y + self.metrics.vertical_border) as f32,
        )
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    pub fn metrics(&self) -> &BoardMetrics {
        &self.metrics
    }

    pub fn rects(&self) -> &SpaceRects {
        &self.rects
    }

    pub fn spaces(&self) -> &[Vec<Checker>; SPACE_COUNT] {
        &self.spaces
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn premoves(&self) -> &PremoveOverlay {
        &self.premoves
    }

    pub fn drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    pub fn drag_position(&self) -> Arc<DragPosition> {
        Arc::clone(&self.drag_pos)
    }

    pub fn moving_checker(&self) -> Option<u32> {
        self.anim.moving_checker()
    }

    pub fn animations_active(&self) -> bool {
        self.anim.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::PointerSource;
    use crate::space::PlayerColor;

    fn test_board() -> Board {
        let mut board = Board::new(FrameScheduler::noop());
        board.set_rect(0, 0, 1280, 720);
        board
    }

    fn press_pos(board: &Board, space: usize) -> Vec2 {
        let rect = board.rects().get(space);
        board.face_origin()
            + Vec2::new(
                (rect.x + rect.w / 2) as f32,
                (rect.y + rect.h / 2) as f32,
            )
    }

    fn pile_shape(board: &Board) -> Vec<(usize, Vec<(PlayerColor, bool)>)> {
        board
            .spaces()
            .iter()
            .enumerate()
            .map(|(space, pile)| {
                (
                    space,
                    pile.iter().map(|c| (c.color, c.premove)).collect(),
                )
            })
            .collect()
    }

    fn event(source: PointerSource, phase: PointerPhase, pos: Vec2) -> PointerEvent {
        PointerEvent::new(source, phase, pos)
    }

    #[test]
    fn premove_add_then_reset_round_trips() {
        let mut board = test_board();
        board.set_state(GameState::opening());
        let before = pile_shape(&board);

        board.add_premove(1, 7);
        assert_ne!(pile_shape(&board), before);

        board.reset_premoves();
        assert_eq!(pile_shape(&board), before);
    }

    #[test]
    fn drag_from_space_to_space_adds_premove() {
        let mut board = test_board();
        let mut state = GameState::opening();
        state.points[3] = 2;
        board.set_state(state);

        let from = press_pos(&board, 3);
        let to = press_pos(&board, 7);

        let started = board.handle_pointer(event(PointerSource::Mouse, PointerPhase::Pressed, from));
        assert_eq!(started, PointerResponse::DragStarted { space: 3 });

        board.handle_pointer(event(PointerSource::Mouse, PointerPhase::Moved, to));
        let dropped =
            board.handle_pointer(event(PointerSource::Mouse, PointerPhase::Released, to));
        assert_eq!(dropped, PointerResponse::DragDropped { from: 3, to: 7 });

        assert_eq!(board.premoves().pairs(), &[(3, 7)]);
        assert_eq!(board.spaces()[7].len(), 1);
        assert!(board.spaces()[7][0].premove);
        assert_eq!(board.spaces()[3].len(), 1);
    }

    #[test]
    fn drop_on_origin_abandons_the_drag() {
        let mut board = test_board();
        board.set_state(GameState::opening());

        let pos = press_pos(&board, 1);
        board.handle_pointer(event(PointerSource::Mouse, PointerPhase::Pressed, pos));
        let response =
            board.handle_pointer(event(PointerSource::Mouse, PointerPhase::Released, pos));

        assert_eq!(response, PointerResponse::DragAbandoned);
        assert!(board.premoves().is_empty());
        assert_eq!(board.spaces()[1].len(), 2);
    }

    #[test]
    fn press_on_empty_space_is_ignored() {
        let mut board = test_board();
        board.set_state(GameState::opening());

        let pos = press_pos(&board, 3);
        let response =
            board.handle_pointer(event(PointerSource::Mouse, PointerPhase::Pressed, pos));
        assert_eq!(response, PointerResponse::Ignored);
        assert!(board.drag().is_none());
    }

    #[test]
    fn second_source_cannot_steal_an_active_drag() {
        let mut board = test_board();
        board.set_state(GameState::opening());

        let first = press_pos(&board, 1);
        let second = press_pos(&board, 12);

        board.handle_pointer(event(PointerSource::Mouse, PointerPhase::Pressed, first));
        let stolen =
            board.handle_pointer(event(PointerSource::Touch(4), PointerPhase::Pressed, second));
        assert_eq!(stolen, PointerResponse::Ignored);

        // Releasing the wrong source changes nothing either.
        let wrong =
            board.handle_pointer(event(PointerSource::Touch(4), PointerPhase::Released, second));
        assert_eq!(wrong, PointerResponse::Ignored);
        assert!(board.drag().is_some());
    }

    #[test]
    fn reset_button_takes_priority_over_drag() {
        let mut board = test_board();
        board.set_state(GameState::opening());
        board.add_premove(1, 7);

        let center = Vec2::new(640.0, 360.0);
        let response =
            board.handle_pointer(event(PointerSource::Mouse, PointerPhase::Pressed, center));

        assert_eq!(response, PointerResponse::ResetPressed);
        assert!(board.premoves().is_empty());
        assert!(board.drag().is_none());
    }

    #[test]
    fn reset_button_inactive_without_premoves() {
        let mut board = test_board();
        board.set_state(GameState::opening());

        let center = Vec2::new(640.0, 360.0);
        let response =
            board.handle_pointer(event(PointerSource::Mouse, PointerPhase::Pressed, center));
        assert_ne!(response, PointerResponse::ResetPressed);
    }

    #[test]
    fn submit_premoves_emits_moves_then_ok() {
        let mut board = test_board();
        board.set_state(GameState::opening());
        board.add_premove(1, 7);
        board.add_premove(12, 17);

        let commands = board.submit_premoves();
        assert_eq!(
            commands,
            vec![
                Command::Move { from: 1, to: 7 },
                Command::Move { from: 12, to: 17 },
                Command::Ok,
            ]
        );
        assert!(board.premoves().is_empty());
        assert!(board.submit_premoves().is_empty());
    }

    #[test]
    fn rejected_actions_request_a_resync() {
        let mut board = test_board();
        let failed_move = board.handle_event(SessionEvent::FailedMove {
            from: 1,
            to: 7,
            reason: "blocked".into(),
        });
        assert_eq!(failed_move, vec![Command::Board]);

        let failed_ok = board.handle_event(SessionEvent::FailedOk {
            reason: "no moves".into(),
        });
        assert_eq!(failed_ok, vec![Command::Board]);
    }

    #[test]
    fn own_moves_are_not_reanimated() {
        let mut board = test_board();
        let mut state = GameState::opening();
        state.player_name = "alice".into();
        board.set_state(state);

        let commands = board.handle_event(SessionEvent::Moved {
            player: "alice".into(),
            moves: vec![(1, 7)],
        });
        assert!(commands.is_empty());
        assert!(!board.animations_active());
    }

    #[test]
    fn opponent_moves_queue_animations() {
        let mut board = test_board();
        let mut state = GameState::opening();
        state.player_name = "alice".into();
        board.set_state(state);

        board.handle_event(SessionEvent::Moved {
            player: "bob".into(),
            moves: vec![(24, 18), (18, 13)],
        });
        assert!(board.animations_active());
    }

    #[test]
    fn board_event_replaces_state_and_abandons_animations() {
        let mut board = test_board();
        let mut state = GameState::opening();
        state.player_name = "alice".into();
        board.set_state(state.clone());

        board.handle_event(SessionEvent::Moved {
            player: "bob".into(),
            moves: vec![(24, 18)],
        });
        board.advance_animations(Instant::now());
        assert!(board.animations_active());

        state.points[5] = 1;
        board.handle_event(SessionEvent::Board(state.clone()));
        assert!(!board.animations_active());
        assert_eq!(board.spaces()[5].len(), 1);
        assert_eq!(board.state(), &state);
    }

    #[test]
    fn direction_change_flips_the_rect_table() {
        let mut board = test_board();
        let mut state = GameState::opening();
        state.direction = Direction::Forward;
        board.set_state(state.clone());
        let forward_rect = board.rects().get(1);

        state.direction = Direction::Reverse;
        board.set_state(state);
        let reverse_rect = board.rects().get(1);
        assert_ne!(forward_rect.y, reverse_rect.y);
    }

    #[test]
    fn set_rect_recomputes_layout_atomically() {
        let mut board = test_board();
        board.set_state(GameState::opening());
        board.set_rect(0, 0, 800, 600);

        let m = board.metrics();
        assert_eq!(m.width, 800);
        assert_eq!(
            m.space_width * 12 + m.bar_width + m.horizontal_border * 2,
            800
        );
        // Checkers were repositioned into the new geometry.
        let expected = board.rects().checker_position(1, 0);
        assert_eq!(board.spaces()[1][0].pos, expected);
    }
}
