use glam::Vec2;
use winit::dpi::PhysicalSize;

use tavla::{Board, Checker, DragPosition, PlayerColor, reset_button_rect};

use super::vertex::Vertex;

// Classic board palette.
const FRAME: [u8; 3] = [65, 40, 14];
const FACE: [u8; 3] = [120, 63, 25];
const TRIANGLE_A: [u8; 3] = [225, 188, 125];
const TRIANGLE_B: [u8; 3] = [120, 17, 0];
const CHECKER_LIGHT: [u8; 3] = [232, 211, 162];
const CHECKER_DARK: [u8; 3] = [20, 16, 12];
const MARK_ON_LIGHT: [u8; 3] = [90, 60, 30];
const MARK_ON_DARK: [u8; 3] = [225, 188, 125];
const HOVER: [u8; 3] = [168, 112, 58];
const BUTTON_BORDER: [u8; 3] = [0, 0, 0];

const DISC_SEGMENTS: usize = 24;

/// Builds the whole frame as one flat-colored triangle list: background,
/// piles, hover highlight, overlays, then the moving and dragged checkers
/// on top.
pub fn build_scene(
    board: &Board,
    drag_pos: &DragPosition,
    screen: PhysicalSize<u32>,
) -> Vec<Vertex> {
    let mut scene = SceneBuilder::new(screen);
    let m = *board.metrics();
    if m.width <= 0 || m.height <= 0 {
        return scene.vertices;
    }

    let board_rect = board.rect();
    let board_origin = Vec2::new(board_rect.x as f32, board_rect.y as f32);
    let face = board.face_origin();

    // Frame and face.
    scene.push_rect(
        board_origin,
        Vec2::new(m.width as f32, m.height as f32),
        FRAME,
    );
    scene.push_rect(
        face,
        Vec2::new(m.inner_width as f32, m.inner_height as f32),
        FACE,
    );

    // The 24 triangles, apexes pulled toward the table middle.
    let face_h = m.inner_height as f32;
    for row in 0..2 {
        let tip_y = if row == 0 {
            face_h / 2.0 - m.triangle_offset as f32
        } else {
            face_h / 2.0 + m.triangle_offset as f32
        };
        for slot in 0..12 {
            let mut color_a = slot % 2 == 0;
            if row == 1 {
                color_a = !color_a;
            }
            let color = if color_a { TRIANGLE_A } else { TRIANGLE_B };

            let mut tx = (m.space_width * slot) as f32;
            if slot >= 6 {
                tx += m.bar_width as f32;
            }
            let base_y = if row == 0 { 0.0 } else { face_h };
            let a = face + Vec2::new(tx, base_y);
            let b = face + Vec2::new(tx + m.space_width as f32 / 2.0, tip_y);
            let c = face + Vec2::new(tx + m.space_width as f32, base_y);
            scene.push_triangle(a, b, c, color);
        }
    }

    // Bar, full board height.
    scene.push_rect(
        Vec2::new(face.x + (m.space_width * 6) as f32, board_origin.y),
        Vec2::new(m.bar_width as f32, m.height as f32),
        FRAME,
    );

    // Piles. The moving and dragged checkers are layered on top later.
    let moving_id = board.moving_checker();
    let drag = board.drag();
    let drag_id = drag.map(|d| d.checker);
    let radius = m.checker_size() as f32 / 2.0;

    // Hover highlight for the space under the dragged checker.
    if drag.is_some() {
        let cursor = drag_pos.load();
        if let Some(space) = board.space_at(cursor) {
            let rect = board.rects().get(space);
            scene.push_rect(
                face + rect.origin(),
                Vec2::new(rect.w as f32, rect.h as f32),
                HOVER,
            );
        }
    }

    let mut deferred: Vec<&Checker> = Vec::new();
    for pile in board.spaces() {
        for checker in pile {
            if Some(checker.id) == drag_id {
                continue;
            }
            if Some(checker.id) == moving_id {
                deferred.push(checker);
                continue;
            }
            scene.push_checker(face + checker.pos + Vec2::splat(radius), radius, checker);
        }
    }

    // Reset button appears while premoves are queued: a bordered plate.
    if !board.premoves().is_empty() {
        let button = reset_button_rect(board_rect.w, board_rect.h);
        scene.push_rect(
            board_origin + button.origin(),
            Vec2::new(button.w as f32, button.h as f32),
            BUTTON_BORDER,
        );
        let inset = Vec2::new((button.x + 5) as f32, (button.y + 5) as f32);
        scene.push_rect(
            board_origin + inset,
            Vec2::new((button.w - 10) as f32, (button.h - 10) as f32),
            TRIANGLE_A,
        );
    }

    for checker in deferred {
        scene.push_checker(face + checker.pos + Vec2::splat(radius), radius, checker);
    }

    if let Some(drag) = drag {
        if let Some(checker) = find_checker(board, drag.checker) {
            scene.push_checker(drag_pos.load(), radius, checker);
        }
    }

    scene.vertices
}

fn find_checker(board: &Board, id: u32) -> Option<&Checker> {
    board
        .spaces()
        .iter()
        .flatten()
        .find(|checker| checker.id == id)
}

struct SceneBuilder {
    vertices: Vec<Vertex>,
    screen: Vec2,
}

impl SceneBuilder {
    fn new(screen: PhysicalSize<u32>) -> Self {
        Self {
            vertices: Vec::with_capacity(1024),
            screen: Vec2::new(screen.width.max(1) as f32, screen.height.max(1) as f32),
        }
    }

    fn to_clip(&self, p: Vec2) -> [f32; 2] {
        [
            p.x / self.screen.x * 2.0 - 1.0,
            1.0 - p.y / self.screen.y * 2.0,
        ]
    }

    fn push_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: [u8; 3]) {
        let color = srgb_to_linear(color);
        for p in [a, b, c] {
            self.vertices.push(Vertex {
                position: self.to_clip(p),
                color,
            });
        }
    }

    fn push_rect(&mut self, origin: Vec2, size: Vec2, color: [u8; 3]) {
        let (a, b) = (origin, origin + Vec2::new(size.x, 0.0));
        let (c, d) = (origin + size, origin + Vec2::new(0.0, size.y));
        self.push_triangle(a, b, c, color);
        self.push_triangle(a, c, d, color);
    }

    fn push_disc(&mut self, center: Vec2, radius: f32, color: [u8; 3]) {
        for i in 0..DISC_SEGMENTS {
            let t0 = (i as f32 / DISC_SEGMENTS as f32) * std::f32::consts::TAU;
            let t1 = ((i + 1) as f32 / DISC_SEGMENTS as f32) * std::f32::consts::TAU;
            let a = center + radius * Vec2::new(t0.cos(), t0.sin());
            let b = center + radius * Vec2::new(t1.cos(), t1.sin());
            self.push_triangle(center, a, b, color);
        }
    }

    fn push_checker(&mut self, center: Vec2, radius: f32, checker: &Checker) {
        let (body, mark) = match checker.color {
            PlayerColor::White => (CHECKER_LIGHT, MARK_ON_LIGHT),
            PlayerColor::Black => (CHECKER_DARK, MARK_ON_DARK),
        };
        self.push_disc(center, radius, body);
        // Speculative checkers carry a center mark until confirmed.
        if checker.premove {
            self.push_disc(center, radius * 0.4, mark);
        }
    }
}

fn srgb_to_linear(color: [u8; 3]) -> [f32; 3] {
    let convert = |c: u8| (f32::from(c) / 255.0).powf(2.2);
    [convert(color[0]), convert(color[1]), convert(color[2])]
}
