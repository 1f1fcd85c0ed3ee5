use std::sync::{Arc, Mutex};
use std::time::Instant;

use glam::Vec2;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, MouseButton, Touch, TouchPhase, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use tavla::{
    Board, Command, DragPosition, FrameScheduler, PointerEvent, PointerPhase, PointerResponse,
    PointerSource,
};

use crate::render::{Renderer, build_scene};
use crate::session::SessionHandle;

pub struct App {
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    board: Arc<Mutex<Board>>,
    scheduler: FrameScheduler,
    session: Option<SessionHandle>,
    commands: tokio::sync::mpsc::UnboundedSender<Command>,
    drag_pos: Arc<DragPosition>,
    /// Mirror of the drag owner so pointer-move samples can update the
    /// advisory position without taking the board lock.
    active_drag: Option<PointerSource>,
    cursor: Vec2,
    initial_size: (u32, u32),
}

impl App {
    pub fn new(
        board: Arc<Mutex<Board>>,
        scheduler: FrameScheduler,
        session: SessionHandle,
        initial_size: (u32, u32),
    ) -> Self {
        let commands = session.commands.clone();
        let drag_pos = board.lock().unwrap().drag_position();
        Self {
            window: None,
            renderer: None,
            board,
            scheduler,
            session: Some(session),
            commands,
            drag_pos,
            active_drag: None,
            cursor: Vec2::ZERO,
            initial_size,
        }
    }

    fn spawn_event_worker(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        let board = Arc::clone(&self.board);
        let scheduler = self.scheduler.clone();
        let commands = session.commands.clone();
        let events = session.events;

        std::thread::Builder::new()
            .name("session-events".into())
            .spawn(move || {
                for event in events.iter() {
                    let replies = board.lock().unwrap().handle_event(event);
                    for command in replies {
                        if commands.send(command).is_err() {
                            return;
                        }
                    }
                    scheduler.request_frame();
                }
            })
            .expect("spawn session event worker");
    }

    fn forward_pointer(&mut self, source: PointerSource, phase: PointerPhase, pos: Vec2) {
        let response = self.board.lock().unwrap().handle_pointer(PointerEvent::new(
            source, phase, pos,
        ));
        match response {
            PointerResponse::DragStarted { .. } => self.active_drag = Some(source),
            PointerResponse::DragDropped { .. } | PointerResponse::DragAbandoned => {
                if self.active_drag == Some(source) {
                    self.active_drag = None;
                }
            }
            _ => {}
        }
        self.scheduler.request_frame();
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter | KeyCode::NumpadEnter => {
                let commands = self.board.lock().unwrap().submit_premoves();
                for command in commands {
                    let _ = self.commands.send(command);
                }
            }
            KeyCode::KeyR => {
                let _ = self.commands.send(Command::Roll);
            }
            _ => {}
        }
    }

    fn handle_touch(&mut self, touch: Touch) {
        let pos = Vec2::new(touch.location.x as f32, touch.location.y as f32);
        let source = PointerSource::Touch(touch.id);
        match touch.phase {
            TouchPhase::Started => self.forward_pointer(source, PointerPhase::Pressed, pos),
            TouchPhase::Moved => {
                if self.active_drag == Some(source) {
                    self.drag_pos.store(pos);
                    self.scheduler.request_frame();
                }
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                self.forward_pointer(source, PointerPhase::Released, pos);
            }
        }
    }

    fn handle_redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(renderer) = &mut self.renderer else {
            return;
        };

        let vertices = {
            let mut board = self.board.lock().unwrap();
            if board.advance_animations(Instant::now()) {
                self.scheduler.request_frame();
            }
            build_scene(&board, &self.drag_pos, renderer.size)
        };

        match renderer.render(&vertices) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost) => renderer.resize(renderer.size),
            Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
            Err(e) => log::error!("Render error: {:?}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let (width, height) = self.initial_size;
        let attrs = Window::default_attributes()
            .with_title("Tavla")
            .with_inner_size(winit::dpi::LogicalSize::new(width, height));

        let window = Arc::new(event_loop.create_window(attrs).unwrap());
        self.window = Some(window.clone());

        let rt = tokio::runtime::Runtime::new().unwrap();
        let renderer = rt.block_on(Renderer::new(window)).unwrap();

        let size = renderer.size;
        self.board
            .lock()
            .unwrap()
            .set_rect(0, 0, size.width as i32, size.height as i32);
        self.renderer = Some(renderer);

        self.spawn_event_worker();
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, _event: ()) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size);
                }
                self.board
                    .lock()
                    .unwrap()
                    .set_rect(0, 0, size.width as i32, size.height as i32);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => self.handle_key(key),
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Vec2::new(position.x as f32, position.y as f32);
                if self.active_drag == Some(PointerSource::Mouse) {
                    // Advisory-only update; rendering reads it without the lock.
                    self.drag_pos.store(self.cursor);
                    self.scheduler.request_frame();
                }
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let phase = match state {
                    ElementState::Pressed => PointerPhase::Pressed,
                    ElementState::Released => PointerPhase::Released,
                };
                self.forward_pointer(PointerSource::Mouse, phase, self.cursor);
            }
            WindowEvent::Touch(touch) => self.handle_touch(touch),
            WindowEvent::RedrawRequested => self.handle_redraw(event_loop),
            _ => {}
        }
    }
}
