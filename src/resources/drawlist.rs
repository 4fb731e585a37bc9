//! Recording surface.
//!
//! [`DrawList`] implements [`Surface`] by appending commands to a list that
//! is wiped at the start of every frame. The headless host only inspects it;
//! the windowed host replays it through raylib after the frame is dispatched.

use log::warn;

use crate::components::sprite::Rect;
use crate::resources::surface::{Rgba, Surface};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Rect),
    Save,
    Restore,
    Alpha(f32),
    Translate(f32, f32),
    Rotate(f32),
    Scale(f32, f32),
    Image { key: String, src: Rect, dst: Rect },
    FillRect { rect: Rect, color: Rgba },
    StrokeRect { rect: Rect, color: Rgba },
    Circle { cx: f32, cy: f32, radius: f32, color: Rgba },
}

/// One frame's worth of drawing commands.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    width: f32,
    height: f32,
    commands: Vec<DrawCommand>,
    depth: usize,
}

impl DrawList {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::with_capacity(1024),
            depth: 0,
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Image keys in draw order.
    pub fn images(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Image { key, .. } => Some(key.as_str()),
            _ => None,
        })
    }

    /// Open `save` calls not yet matched by `restore`.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl Surface for DrawList {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn clear(&mut self, region: Rect) {
        self.commands.clear();
        self.depth = 0;
        self.commands.push(DrawCommand::Clear(region));
    }

    fn save(&mut self) {
        self.depth += 1;
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        if self.depth == 0 {
            warn!("restore without matching save");
            return;
        }
        self.depth -= 1;
        self.commands.push(DrawCommand::Restore);
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.commands.push(DrawCommand::Alpha(alpha));
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::Translate(x, y));
    }

    fn rotate(&mut self, degrees: f32) {
        self.commands.push(DrawCommand::Rotate(degrees));
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.commands.push(DrawCommand::Scale(sx, sy));
    }

    fn draw_image(&mut self, key: &str, src: Rect, dst: Rect) {
        self.commands.push(DrawCommand::Image {
            key: key.to_string(),
            src,
            dst,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgba) {
        self.commands.push(DrawCommand::StrokeRect { rect, color });
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::Circle {
            cx,
            cy,
            radius,
            color,
        });
    }
}
