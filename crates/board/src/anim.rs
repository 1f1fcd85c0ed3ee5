use std::collections::VecDeque;
use std::time::{Duration, Instant};

use glam::Vec2;

use crate::error::MoveError;
use crate::layout::SpaceRects;
use crate::space::{Direction, PlayerColor, SPACE_COUNT, bar_space, home_space};
use crate::state::Checker;

/// One move takes exactly a second at the default speed.
pub const MOVE_DURATION: Duration = Duration::from_secs(1);

/// Pause between a landing checker and the hit checker's trip to the bar.
pub const HIT_PAUSE: Duration = Duration::from_millis(750);

/// An in-flight movement toward a fixed target position.
#[derive(Debug, Clone, Copy)]
pub struct MoveAnimation {
    pub target: Vec2,
    pub start: Instant,
    pub duration: Duration,
}

impl MoveAnimation {
    pub fn new(target: Vec2, start: Instant, duration: Duration) -> Self {
        Self {
            target,
            start,
            duration,
        }
    }

    /// Steps `pos` toward the target by the elapsed fraction of the
    /// duration, independently per axis and never overshooting. Returns
    /// true once both axes equal the target exactly.
    pub fn advance(&self, pos: &mut Vec2, now: Instant) -> bool {
        let elapsed = now.saturating_duration_since(self.start);
        let progress = if self.duration.is_zero() {
            1.0
        } else {
            elapsed.as_secs_f32() / self.duration.as_secs_f32()
        };
        pos.x = step_axis(pos.x, self.target.x, progress);
        pos.y = step_axis(pos.y, self.target.y, progress);
        *pos == self.target
    }
}

fn step_axis(current: f32, target: f32, progress: f32) -> f32 {
    if current < target {
        (current + (target - current) * progress).min(target)
    } else if current > target {
        (current - (current - target) * progress).max(target)
    } else {
        current
    }
}

/// A queued movement. `checker` pins a specific entity (used for the hit
/// checker's bar trip); otherwise the topmost checker at `from` is taken
/// when the task starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveTask {
    pub from: usize,
    pub to: usize,
    pub pause_before: Duration,
    pub checker: Option<u32>,
}

impl MoveTask {
    pub fn new(from: usize, to: usize) -> Self {
        Self {
            from,
            to,
            pause_before: Duration::ZERO,
            checker: None,
        }
    }
}

/// Everything a task needs from the board to start and commit.
#[derive(Debug, Clone, Copy)]
pub struct MoveContext {
    pub direction: Direction,
    pub player_color: PlayerColor,
    pub turn: Option<PlayerColor>,
}

impl MoveContext {
    /// Bar endpoint for a checker hit by the current mover. Kept in one
    /// place so the rules collaborator can correct the policy if needed.
    fn bar_space_for(&self) -> usize {
        let mut bar = bar_space(self.direction);
        if self.turn != Some(self.player_color) {
            bar = 25 - bar;
        }
        bar
    }

    /// Home endpoint for the current mover; landing there bears the
    /// checker off instead of stacking it.
    fn home_space_for(&self) -> usize {
        let mut home = home_space(self.direction);
        if self.turn != Some(self.player_color) {
            home = 25 - home;
        }
        home
    }
}

#[derive(Debug, Clone, Copy)]
enum QueueState {
    Idle,
    Pausing { task: MoveTask, until: Instant },
    Moving { task: MoveTask, checker: u32, hit: Option<u32> },
}

/// Strictly ordered execution of checker movements.
///
/// Tasks run one at a time; the registry mutation for each move is
/// deferred until its animation finishes, and a detected hit enqueues the
/// bar trip ahead of any remaining tasks with a fixed pause before it.
/// Drained by time from the render tick rather than by blocking waits.
#[derive(Debug)]
pub struct MoveQueue {
    tasks: VecDeque<MoveTask>,
    state: QueueState,
    speed: u32,
}

impl Default for MoveQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveQueue {
    pub fn new() -> Self {
        Self {
            tasks: VecDeque::new(),
            state: QueueState::Idle,
            speed: 1,
        }
    }

    /// Moves per second. Values above one produce faster catch-up
    /// animation after a resync.
    pub fn set_speed(&mut self, speed: u32) {
        self.speed = speed.max(1);
    }

    pub fn push(&mut self, from: usize, to: usize) {
        self.tasks.push_back(MoveTask::new(from, to));
    }

    /// Abandons everything in flight. Used when a full resync replaces the
    /// registry outright.
    pub fn clear(&mut self) {
        self.tasks.clear();
        self.state = QueueState::Idle;
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, QueueState::Idle) || !self.tasks.is_empty()
    }

    /// Id of the checker currently animating, if any. The render pass
    /// draws it on top of the piles.
    pub fn moving_checker(&self) -> Option<u32> {
        match self.state {
            QueueState::Moving { checker, .. } => Some(checker),
            _ => None,
        }
    }

    fn move_duration(&self) -> Duration {
        MOVE_DURATION / self.speed
    }

    /// Drives the queue. Returns true while work remains so the caller
    /// keeps frames coming.
    pub fn advance(
        &mut self,
        now: Instant,
        spaces: &mut [Vec<Checker>; SPACE_COUNT],
        rects: &SpaceRects,
        ctx: MoveContext,
    ) -> bool {
        loop {
            match self.state {
                QueueState::Idle => {
                    let Some(task) = self.tasks.pop_front() else {
                        return false;
                    };
                    if !task.pause_before.is_zero() {
                        self.state = QueueState::Pausing {
                            task,
                            until: now + task.pause_before,
                        };
                        return true;
                    }
                    match self.begin(task, now, spaces, rects) {
                        Ok(state) => self.state = state,
                        Err(err) => {
                            log::warn!("skipping move {}-{}: {}", task.from, task.to, err);
                            continue;
                        }
                    }
                    return true;
                }
                QueueState::Pausing { task, until } => {
                    if now < until {
                        return true;
                    }
                    match self.begin(task, now, spaces, rects) {
                        Ok(state) => self.state = state,
                        Err(err) => {
                            log::warn!("skipping move {}-{}: {}", task.from, task.to, err);
                            self.state = QueueState::Idle;
                            continue;
                        }
                    }
                    return true;
                }
                QueueState::Moving { task, checker, hit } => {
                    let Some(entity) = pile_checker_mut(&mut spaces[task.from], checker) else {
                        // The registry was rebuilt under us; drop the task.
                        self.state = QueueState::Idle;
                        continue;
                    };
                    let Some(animation) = entity.animation else {
                        self.state = QueueState::Idle;
                        continue;
                    };
                    if !animation.advance(&mut entity.pos, now) {
                        return true;
                    }
                    entity.animation = None;
                    self.commit(task, checker, hit, spaces, ctx);
                    self.state = QueueState::Idle;
                }
            }
        }
    }

    fn begin(
        &mut self,
        task: MoveTask,
        now: Instant,
        spaces: &mut [Vec<Checker>; SPACE_COUNT],
        rects: &SpaceRects,
    ) -> Result<QueueState, MoveError> {
        if task.from >= SPACE_COUNT || task.to >= SPACE_COUNT {
            return Err(MoveError::OutOfRange(task.from.max(task.to)));
        }

        let source = match task.checker {
            Some(id) => spaces[task.from].iter().find(|c| c.id == id),
            None => spaces[task.from].last(),
        };
        let (checker_id, color) = source
            .map(|c| (c.id, c.color))
            .ok_or(MoveError::EmptySpace(task.from))?;

        // Landing on a lone opposing checker is a hit: the mover takes the
        // bottom slot and the hit checker is bounced to the bar afterward.
        let destination = &spaces[task.to];
        let hit = match destination.as_slice() {
            [lone] if lone.color != color => Some(lone.id),
            _ => None,
        };
        let stack = if hit.is_some() {
            0
        } else {
            destination.len()
        };

        let target = rects.checker_position(task.to, stack);
        let duration = self.move_duration();
        if let Some(entity) = pile_checker_mut(&mut spaces[task.from], checker_id) {
            entity.animation = Some(MoveAnimation::new(target, now, duration));
        }

        Ok(QueueState::Moving {
            task,
            checker: checker_id,
            hit,
        })
    }

    fn commit(
        &mut self,
        task: MoveTask,
        checker_id: u32,
        hit: Option<u32>,
        spaces: &mut [Vec<Checker>; SPACE_COUNT],
        ctx: MoveContext,
    ) {
        let Some(index) = spaces[task.from].iter().position(|c| c.id == checker_id) else {
            return;
        };
        let checker = spaces[task.from].remove(index);

        if task.to != ctx.home_space_for() {
            spaces[task.to].push(checker);
        }

        if let Some(hit_id) = hit {
            let mut bar_trip = MoveTask::new(task.to, ctx.bar_space_for());
            bar_trip.pause_before = HIT_PAUSE;
            bar_trip.checker = Some(hit_id);
            self.tasks.push_front(bar_trip);
        }
    }
}

fn pile_checker_mut(pile: &mut [Checker], id: u32) -> Option<&mut Checker> {
    pile.iter_mut().find(|c| c.id == id)
}
