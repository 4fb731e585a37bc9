//! Windowed host on raylib.
//!
//! The stage records each frame into its [`DrawList`]; this host replays the
//! list into a render texture at play-field resolution, then scales that
//! texture into the window with letterboxing. Textures are uploaded lazily
//! once the [`TextureStore`](crate::resources::texturestore::TextureStore)
//! reports a key ready.

use std::path::PathBuf;

use log::{info, warn};
use raylib::ffi;
use raylib::prelude::*;
use rustc_hash::FxHashMap;

use crate::components::sprite::Rect;
use crate::error::{EngineError, EngineResult};
use crate::game;
use crate::resources::drawlist::{DrawCommand, DrawList};
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::{InputEvent, RawInput};
use crate::resources::presentation::LogPresentation;
use crate::resources::surface::Rgba;
use crate::resources::texturestore::{DirectoryLoader, ImageStatus};
use crate::stage::Stage;

use super::{build_stage, launch, open_scoreboard};

const SKY: Color = Color::new(0x8e, 0xd1, 0xf0, 255);

/// GPU textures keyed like the stage's sprite keys.
struct TextureCache {
    root: PathBuf,
    loaded: FxHashMap<String, Texture2D>,
    failed: Vec<String>,
}

impl TextureCache {
    fn new(root: PathBuf) -> Self {
        Self {
            root,
            loaded: FxHashMap::default(),
            failed: Vec::new(),
        }
    }

    /// Upload every image the stage reports ready and that is not on the GPU yet.
    fn sync(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread, stage: &Stage, list: &DrawList) {
        for key in list.images() {
            if self.loaded.contains_key(key) || self.failed.iter().any(|k| k == key) {
                continue;
            }
            if stage.textures.peek(key) != Some(ImageStatus::Ready) {
                continue;
            }
            let path = self.root.join(key);
            match rl.load_texture(thread, &path.to_string_lossy()) {
                Ok(texture) => {
                    info!("uploaded texture '{}'", key);
                    self.loaded.insert(key.to_string(), texture);
                }
                Err(err) => {
                    warn!("could not upload '{}': {}", key, err);
                    self.failed.push(key.to_string());
                }
            }
        }
    }
}

fn color(c: Rgba, alpha: f32) -> Color {
    Color::new(c.r, c.g, c.b, (c.a * alpha * 255.0).round().clamp(0.0, 255.0) as u8)
}

fn rectangle(r: Rect) -> Rectangle {
    Rectangle::new(r.x, r.y, r.width, r.height)
}

/// Replay `list` into the current drawing scope.
fn replay<D: RaylibDraw>(d: &mut D, list: &DrawList, textures: &TextureCache) {
    let mut alpha = vec![1.0f32];
    let current = |alpha: &[f32]| alpha.last().copied().unwrap_or(1.0);

    for command in list.commands() {
        match command {
            DrawCommand::Clear(_) => d.clear_background(SKY),
            DrawCommand::Save => {
                alpha.push(current(&alpha));
                unsafe { ffi::rlPushMatrix() };
            }
            DrawCommand::Restore => {
                if alpha.len() > 1 {
                    alpha.pop();
                }
                unsafe { ffi::rlPopMatrix() };
            }
            DrawCommand::Alpha(a) => {
                if let Some(top) = alpha.last_mut() {
                    *top = *a;
                }
            }
            DrawCommand::Translate(x, y) => unsafe { ffi::rlTranslatef(*x, *y, 0.0) },
            DrawCommand::Rotate(deg) => unsafe { ffi::rlRotatef(*deg, 0.0, 0.0, 1.0) },
            DrawCommand::Scale(sx, sy) => unsafe { ffi::rlScalef(*sx, *sy, 1.0) },
            DrawCommand::Image { key, src, dst } => {
                if let Some(texture) = textures.loaded.get(key) {
                    let tint = color(Rgba::WHITE, current(&alpha));
                    d.draw_texture_pro(texture, rectangle(*src), rectangle(*dst), Vector2::zero(), 0.0, tint);
                }
            }
            DrawCommand::FillRect { rect, color: c } => {
                d.draw_rectangle_rec(rectangle(*rect), color(*c, current(&alpha)));
            }
            DrawCommand::StrokeRect { rect, color: c } => {
                d.draw_rectangle_lines_ex(rectangle(*rect), 2.0, color(*c, current(&alpha)));
            }
            DrawCommand::Circle { cx, cy, radius, color: c } => {
                d.draw_circle_v(Vector2::new(*cx, *cy), *radius, color(*c, current(&alpha)));
            }
        }
    }
    // unbalanced save calls must not leak into the next frame
    for _ in 1..alpha.len() {
        unsafe { ffi::rlPopMatrix() };
    }
}

fn poll_input(rl: &mut RaylibHandle, focused: &mut bool) -> Vec<InputEvent> {
    let mut events = Vec::new();
    while let Some(key) = rl.get_key_pressed() {
        events.push(
            RawInput::KeyDown {
                escape: key == KeyboardKey::KEY_ESCAPE,
            }
            .into(),
        );
    }
    if rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT) {
        events.push(RawInput::PointerDown.into());
    }
    let now_focused = rl.is_window_focused();
    if *focused && !now_focused {
        events.push(RawInput::Blur.into());
    }
    *focused = now_focused;
    events
}

/// Open the window and run until it is closed.
pub fn run_window(config: &GameConfig) -> EngineResult<()> {
    let (width, height) = config.window_size();
    let mut builder = raylib::init();
    builder.size(width as i32, height as i32).resizable().title("zapbird");
    if config.vsync {
        builder.vsync();
    }
    if config.fullscreen {
        builder.fullscreen();
    }
    let (mut rl, thread) = builder.build();
    rl.set_exit_key(None);

    let mut target = rl
        .load_render_texture(&thread, config.render_width, config.render_height)
        .map_err(|e| EngineError::Host(format!("render texture: {}", e)))?;

    let mut stage = build_stage(config, Box::new(DirectoryLoader::new(&config.assets_dir)));
    let scores = open_scoreboard(config);
    launch(&mut stage, config, scores, Box::new(LogPresentation));

    let mut textures = TextureCache::new(config.assets_dir.clone());
    let mut focused = true;
    let (field_w, field_h) = config.field_size();

    while !rl.window_should_close() {
        for event in poll_input(&mut rl, &mut focused) {
            game::handle_input(&mut stage, event);
        }
        // vsync paces the refresh scheduler; the interval scheduler is
        // paced here. A stopped bus keeps showing its last frame.
        if let Some(wait) = stage.bus.time_until_frame() {
            if !wait.is_zero() {
                std::thread::sleep(wait);
            }
            let dt_ms = f64::from(rl.get_frame_time()) * 1000.0;
            stage.run_frame(dt_ms);
            textures.sync(&mut rl, &thread, &stage, &stage.surface);
        }

        let (win_w, win_h) = (rl.get_screen_width() as f32, rl.get_screen_height() as f32);
        let scale = (win_w / field_w).min(win_h / field_h);
        let dest = Rectangle::new(
            0.5 * (win_w - field_w * scale),
            0.5 * (win_h - field_h * scale),
            field_w * scale,
            field_h * scale,
        );

        let mut d = rl.begin_drawing(&thread);
        {
            let mut t = d.begin_texture_mode(&thread, &mut target);
            replay(&mut t, &stage.surface, &textures);
        }
        d.clear_background(Color::BLACK);
        d.draw_texture_pro(
            target.texture(),
            Rectangle::new(0.0, 0.0, field_w, -field_h),
            dest,
            Vector2::zero(),
            0.0,
            Color::WHITE,
        );
    }

    game::teardown(&mut stage);
    info!("window closed");
    Ok(())
}
