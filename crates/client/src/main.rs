mod app;
mod render;
mod session;

use std::sync::{Arc, Mutex};

use clap::Parser;
use winit::event_loop::EventLoop;

use tavla::{Board, FrameScheduler};

#[derive(Parser)]
#[command(name = "tavla")]
#[command(about = "Tavla board client")]
struct Args {
    #[arg(long, default_value_t = 1280, help = "Initial window width in pixels")]
    width: u32,

    #[arg(long, default_value_t = 720, help = "Initial window height in pixels")]
    height: u32,

    #[arg(long, default_value_t = 1, help = "Checker moves per second")]
    speed: u32,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    let session = session::spawn_demo();

    let event_loop = EventLoop::new()?;
    let proxy = event_loop.create_proxy();
    let scheduler = FrameScheduler::with_defaults(move || {
        let _ = proxy.send_event(());
    });

    let mut board = Board::new(scheduler.clone());
    board.set_animation_speed(args.speed);
    let board = Arc::new(Mutex::new(board));

    let mut app = app::App::new(board, scheduler, session, (args.width, args.height));
    event_loop.run_app(&mut app)?;
    Ok(())
}
