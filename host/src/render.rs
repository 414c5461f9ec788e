use pong_core::{Ball, CourtBounds, Paddle, Score};

use crate::session::Mode;

/// Drawable size of the surface a session renders into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Everything a renderer needs for one frame.
#[derive(Debug)]
pub struct FrameView<'a> {
    pub bounds: &'a CourtBounds,
    pub ball: &'a Ball,
    pub paddles: &'a [Paddle; 2],
    pub score: Score,
    pub mode: Mode,
    pub frame: u64,
}

pub trait Renderer {
    /// `None` when the drawing context cannot be acquired.
    fn viewport(&self) -> Option<Viewport>;

    fn draw(&mut self, view: &FrameView<'_>);
}

/// Renderer with a fixed viewport that draws nothing.
#[derive(Debug, Clone, Copy)]
pub struct HeadlessRenderer {
    viewport: Viewport,
    frames: u64,
}

impl HeadlessRenderer {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            viewport: Viewport { width, height },
            frames: 0,
        }
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames
    }
}

impl Renderer for HeadlessRenderer {
    fn viewport(&self) -> Option<Viewport> {
        Some(self.viewport)
    }

    fn draw(&mut self, _view: &FrameView<'_>) {
        self.frames += 1;
    }
}
