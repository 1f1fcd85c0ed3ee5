use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use tokio::sync::mpsc as tokio_mpsc;

use tavla::{Command, GameState, PlayerColor, SessionEvent};

/// Channel ends the board side talks to. The real network collaborator is
/// out of scope; the demo driver below stands in for it with the same
/// typed interface.
pub struct SessionHandle {
    pub events: mpsc::Receiver<SessionEvent>,
    pub commands: tokio_mpsc::UnboundedSender<Command>,
}

pub fn spawn_demo() -> SessionHandle {
    let (event_tx, event_rx) = mpsc::channel();
    let (command_tx, command_rx) = tokio_mpsc::unbounded_channel();

    thread::Builder::new()
        .name("session".into())
        .spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .expect("session runtime");
            rt.block_on(run_demo(event_tx, command_rx));
        })
        .expect("spawn session thread");

    SessionHandle {
        events: event_rx,
        commands: command_tx,
    }
}

const PLAYER: &str = "you";
const BOT: &str = "tavla-bot";

/// Deterministic dice so demo sessions replay identically.
const DICE: [[u8; 2]; 6] = [[6, 5], [3, 1], [6, 4], [2, 2], [5, 3], [4, 1]];

async fn run_demo(
    events: mpsc::Sender<SessionEvent>,
    mut commands: tokio_mpsc::UnboundedReceiver<Command>,
) {
    let mut server = DemoServer::new();
    let send = |event: SessionEvent| events.send(event).is_ok();

    let script = [
        (400, SessionEvent::Welcome {
            player_name: PLAYER.into(),
            clients: 2,
            matches: 1,
        }),
        (400, SessionEvent::Joined { player: BOT.into() }),
        (400, SessionEvent::Board(server.state.clone())),
        (300, SessionEvent::Notice(
            "Drag checkers to queue premoves, press Enter to submit, R to roll.".into(),
        )),
    ];
    for (delay_ms, event) in script {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        if !send(event) {
            return;
        }
    }

    // Bot opens, then the player takes over.
    tokio::time::sleep(Duration::from_millis(800)).await;
    for event in server.bot_turn() {
        if !send(event) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(700)).await;
    }
    if !send(server.player_roll()) {
        return;
    }

    let mut staged: Vec<(usize, usize)> = Vec::new();
    while let Some(command) = commands.recv().await {
        match command {
            Command::Board => {
                if !send(SessionEvent::Board(server.state.clone())) {
                    return;
                }
            }
            Command::Move { from, to } => staged.push((from, to)),
            Command::Roll => {
                if !send(server.player_roll()) {
                    return;
                }
            }
            Command::Ok => {
                let submitted = std::mem::take(&mut staged);
                match server.apply_all(&submitted) {
                    Ok(()) => {
                        if !send(SessionEvent::Moved {
                            player: PLAYER.into(),
                            moves: submitted,
                        }) {
                            return;
                        }
                        tokio::time::sleep(Duration::from_millis(900)).await;
                        for event in server.bot_turn() {
                            if !send(event) {
                                return;
                            }
                            tokio::time::sleep(Duration::from_millis(700)).await;
                        }
                        if !send(server.player_roll()) {
                            return;
                        }
                    }
                    Err((from, to, reason)) => {
                        if !send(SessionEvent::FailedMove { from, to, reason }) {
                            return;
                        }
                    }
                }
            }
        }
    }
}

/// Minimal authoritative-state keeper behind the demo session. It applies
/// submitted moves to its snapshot and plays a naive bot; it is not a
/// rules engine, legality checking belongs to the real collaborator.
struct DemoServer {
    state: GameState,
    dice_cursor: usize,
}

impl DemoServer {
    fn new() -> Self {
        let mut state = GameState::opening();
        state.player_name = PLAYER.into();
        state.opponent_name = BOT.into();
        state.player_color = PlayerColor::White;
        Self {
            state,
            dice_cursor: 0,
        }
    }

    fn next_roll(&mut self) -> [u8; 2] {
        let roll = DICE[self.dice_cursor % DICE.len()];
        self.dice_cursor += 1;
        roll
    }

    fn player_roll(&mut self) -> SessionEvent {
        let roll = self.next_roll();
        self.state.player_dice = roll;
        self.state.turn = Some(self.state.player_color);
        SessionEvent::Rolled {
            player: PLAYER.into(),
            roll,
        }
    }

    fn bot_turn(&mut self) -> Vec<SessionEvent> {
        let roll = self.next_roll();
        self.state.opponent_dice = roll;
        self.state.turn = Some(self.state.player_color.opponent());

        let moves = self.bot_moves(roll);
        for &(from, to) in &moves {
            let _ = self.apply_move(from, to);
        }

        vec![
            SessionEvent::Rolled {
                player: BOT.into(),
                roll,
            },
            SessionEvent::Moved {
                player: BOT.into(),
                moves,
            },
        ]
    }

    /// Greedy bot: for each die, run the highest of its checkers that can
    /// land on a space it does not block itself out of.
    fn bot_moves(&self, roll: [u8; 2]) -> Vec<(usize, usize)> {
        let mut points = self.state.points;
        let mut moves = Vec::new();
        for die in roll {
            let die = die as usize;
            let candidate = (1..=24).rev().find(|&from| {
                points[from] < 0
                    && from > die
                    && points[from - die] <= 1
            });
            if let Some(from) = candidate {
                let to = from - die;
                points[from] += 1;
                if points[to] == 1 {
                    points[to] = 0; // hit in the working copy
                }
                points[to] -= 1;
                moves.push((from, to));
            }
        }
        moves
    }

    fn apply_all(&mut self, moves: &[(usize, usize)]) -> Result<(), (usize, usize, String)> {
        for &(from, to) in moves {
            self.apply_move(from, to)
                .map_err(|reason| (from, to, reason))?;
        }
        self.state.turn = Some(self.state.player_color.opponent());
        Ok(())
    }

    fn apply_move(&mut self, from: usize, to: usize) -> Result<(), String> {
        if from >= self.state.points.len() || to >= self.state.points.len() {
            return Err(format!("space {} out of range", from.max(to)));
        }
        let signed = self.state.points[from];
        if signed == 0 {
            return Err(format!("no checkers at space {from}"));
        }
        let sign = signed.signum();
        self.state.points[from] -= sign;

        if to == 0 || to == 25 {
            return Ok(()); // borne off, as far as the demo cares
        }

        let dest = self.state.points[to];
        if dest.signum() == -sign && dest.abs() == 1 {
            // Hit: the lone checker returns to its owner's entry point.
            let bar = if dest > 0 { 25 } else { 0 };
            self.state.points[bar] += dest;
            self.state.points[to] = 0;
        }
        self.state.points[to] += sign;
        Ok(())
    }
}
