//! Sprite-sheet frame playback.
//!
//! Playback time is counted in ticks (60 per second) rather than frames, so
//! frame rate and speed can change without losing the current position:
//!
//! ```text
//! current_frame = floor(frames_elapsed * fps / 60)
//! max_elapsed   = 60 * (total_frames - 1) / fps
//! ```
//!
//! The sheet lays frames out along one axis; the frame index offsets the
//! sprite rectangle from its base by whole rectangle sizes.

use bevy_ecs::prelude::Component;
use smallvec::SmallVec;

use super::sprite::Rect;

/// Ticks per second of playback time.
pub const TICKS_PER_SECOND: f64 = 60.0;

/// Axis along which a sheet stacks its frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SheetLayout {
    #[default]
    Vertical,
    Horizontal,
}

#[derive(Component, Debug, Clone, PartialEq)]
pub struct FramePlayback {
    pub fps: f64,
    pub total_frames: u32,
    /// Playback position in ticks.
    pub frames_elapsed: f64,
    /// Ticks advanced per update.
    pub speed: f64,
    pub reversed: bool,
    pub looped: bool,
    pub paused: bool,
    /// Frames that pause playback when reached.
    pub breakpoints: SmallVec<[u32; 4]>,
    pub layout: SheetLayout,
}

impl Default for FramePlayback {
    fn default() -> Self {
        Self {
            fps: 10.0,
            total_frames: 1,
            frames_elapsed: 0.0,
            speed: 1.0,
            reversed: false,
            looped: false,
            paused: false,
            breakpoints: SmallVec::new(),
            layout: SheetLayout::Vertical,
        }
    }
}

impl FramePlayback {
    pub fn new(total_frames: u32, fps: f64) -> Self {
        Self {
            total_frames: total_frames.max(1),
            fps,
            ..Self::default()
        }
    }

    pub fn looped(mut self) -> Self {
        self.looped = true;
        self
    }

    pub fn paused(mut self) -> Self {
        self.paused = true;
        self
    }

    pub fn with_breakpoints(mut self, frames: &[u32]) -> Self {
        self.breakpoints = frames.iter().copied().collect();
        self
    }

    pub fn with_layout(mut self, layout: SheetLayout) -> Self {
        self.layout = layout;
        self
    }

    fn last_frame(&self) -> u32 {
        self.total_frames.saturating_sub(1)
    }

    /// Largest valid playback position.
    pub fn max_elapsed(&self) -> f64 {
        self.position_of(self.last_frame())
    }

    /// Set the position, clamped into `0..=max_elapsed`.
    pub fn set_frames_elapsed(&mut self, value: f64) {
        self.frames_elapsed = value.clamp(0.0, self.max_elapsed());
    }

    pub fn current_frame(&self) -> u32 {
        Self::frame_at(self.frames_elapsed, self.fps).min(self.last_frame())
    }

    fn frame_at(elapsed: f64, fps: f64) -> u32 {
        (elapsed * fps / TICKS_PER_SECOND).floor().max(0.0) as u32
    }

    /// Smallest position that shows `frame`. `60 * frame / fps` can round a
    /// hair low, so step up to the next representable value until it lands.
    fn position_of(&self, frame: u32) -> f64 {
        if !(self.fps.is_finite() && self.fps > 0.0) {
            return 0.0;
        }
        let mut position = TICKS_PER_SECOND * f64::from(frame) / self.fps;
        while Self::frame_at(position, self.fps) < frame {
            position = f64::from_bits(position.to_bits() + 1);
        }
        position
    }

    /// Advance one tick. The position clamps at either end; a looped
    /// playback that was already sitting on the end frame wraps around, so
    /// the last frame is always shown. Arriving on a breakpoint frame pauses
    /// playback. Resuming from a breakpoint does not pause again until
    /// another breakpoint frame is reached.
    pub fn advance(&mut self) {
        if self.paused {
            return;
        }
        let before = self.current_frame();
        let max = self.max_elapsed();
        if self.looped && !self.reversed && self.frames_elapsed >= max {
            self.frames_elapsed = 0.0;
        } else if self.looped && self.reversed && self.frames_elapsed <= 0.0 {
            self.frames_elapsed = max;
        } else {
            let step = if self.reversed { -self.speed } else { self.speed };
            self.set_frames_elapsed(self.frames_elapsed + step);
        }
        let now = self.current_frame();
        if now != before && self.breakpoints.contains(&now) {
            self.paused = true;
        }
    }

    pub fn play(&mut self) {
        self.paused = false;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn reverse(&mut self) {
        self.reversed = true;
    }

    pub fn forward(&mut self) {
        self.reversed = false;
    }

    /// Jump to `frame`. Out-of-range frames clamp to the first/last frame.
    pub fn goto(&mut self, frame: i64) {
        let frame = frame.clamp(0, i64::from(self.last_frame())) as u32;
        self.frames_elapsed = self.position_of(frame);
    }

    pub fn goto_and_play(&mut self, frame: i64) {
        self.goto(frame);
        self.play();
    }

    pub fn goto_and_stop(&mut self, frame: i64) {
        self.goto(frame);
        self.pause();
    }

    pub fn next_frame(&mut self) {
        self.goto(i64::from(self.current_frame()) + 1);
    }

    pub fn prev_frame(&mut self) {
        self.goto(i64::from(self.current_frame()) - 1);
    }

    /// Pause on the last frame.
    pub fn stop(&mut self) {
        self.pause();
        self.goto(i64::from(self.last_frame()));
    }

    /// Source rectangle for the current frame.
    pub fn frame_rect(&self, base: Rect) -> Rect {
        let frame = self.current_frame() as f32;
        match self.layout {
            SheetLayout::Vertical => Rect {
                y: base.y + frame * base.height,
                ..base
            },
            SheetLayout::Horizontal => Rect {
                x: base.x + frame * base.width,
                ..base
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    // ==================== POSITION ====================

    #[test]
    fn test_defaults() {
        let p = FramePlayback::default();
        assert!(approx_eq(p.fps, 10.0));
        assert_eq!(p.total_frames, 1);
        assert!(approx_eq(p.max_elapsed(), 0.0));
        assert_eq!(p.current_frame(), 0);
    }

    #[test]
    fn test_goto_roundtrips_every_frame() {
        for fps in [7.0, 10.0, 24.0, 49.0, 60.0] {
            let mut p = FramePlayback::new(12, fps);
            for frame in 0..12 {
                p.goto(frame);
                assert_eq!(p.current_frame() as i64, frame, "fps {fps} frame {frame}");
            }
        }
    }

    #[test]
    fn test_goto_clamps_out_of_range() {
        let mut p = FramePlayback::new(6, 24.0);
        p.goto(99);
        assert_eq!(p.current_frame(), 5);
        p.goto(-3);
        assert_eq!(p.current_frame(), 0);
    }

    #[test]
    fn test_advance_clamps_without_loop() {
        let mut p = FramePlayback::new(2, 60.0);
        for _ in 0..10 {
            p.advance();
        }
        assert!(approx_eq(p.frames_elapsed, p.max_elapsed()));
        assert_eq!(p.current_frame(), 1);
    }

    #[test]
    fn test_advance_wraps_when_looped() {
        let mut p = FramePlayback::new(3, 60.0).looped();
        p.advance();
        p.advance();
        assert_eq!(p.current_frame(), 2);
        p.advance();
        assert_eq!(p.current_frame(), 0);

        p.reverse();
        p.advance();
        assert_eq!(p.current_frame(), 2);
    }

    #[test]
    fn test_looped_shows_last_frame_before_wrapping() {
        // 24 fps over 6 frames: the last frame starts at tick 12.5
        let mut p = FramePlayback::new(6, 24.0).looped();
        let mut frames = Vec::new();
        for _ in 0..16 {
            p.advance();
            frames.push(p.current_frame());
        }
        let last = frames.iter().position(|f| *f == 5).unwrap();
        assert_eq!(frames[last + 1], 0);
        assert!(frames[..last].iter().all(|f| *f < 5));
    }

    #[test]
    fn test_looped_reverse_shows_first_frame_before_wrapping() {
        let mut p = FramePlayback::new(6, 24.0).looped();
        p.reverse();
        p.goto(1);
        let mut frames = Vec::new();
        for _ in 0..6 {
            p.advance();
            frames.push(p.current_frame());
        }
        let wrap = frames.iter().position(|f| *f == 5).unwrap();
        assert_eq!(frames[wrap - 1], 0);
    }

    #[test]
    fn test_non_finite_fps_stays_on_first_frame() {
        let mut p = FramePlayback::new(4, f64::NAN);
        p.goto(3);
        assert_eq!(p.frames_elapsed, 0.0);
        p.advance();
        assert_eq!(p.current_frame(), 0);
    }

    #[test]
    fn test_paused_does_not_advance() {
        let mut p = FramePlayback::new(4, 60.0).paused();
        p.advance();
        assert_eq!(p.current_frame(), 0);
        p.play();
        p.advance();
        assert_eq!(p.current_frame(), 1);
    }

    // ==================== TRANSPORT ====================

    #[test]
    fn test_next_prev_and_stop() {
        let mut p = FramePlayback::new(5, 10.0);
        p.next_frame();
        p.next_frame();
        assert_eq!(p.current_frame(), 2);
        p.prev_frame();
        assert_eq!(p.current_frame(), 1);
        p.goto(0);
        p.prev_frame();
        assert_eq!(p.current_frame(), 0);
        p.stop();
        assert!(p.paused);
        assert_eq!(p.current_frame(), 4);
    }

    #[test]
    fn test_goto_and_play_stop() {
        let mut p = FramePlayback::new(5, 10.0).paused();
        p.goto_and_play(3);
        assert!(!p.paused);
        assert_eq!(p.current_frame(), 3);
        p.goto_and_stop(1);
        assert!(p.paused);
        assert_eq!(p.current_frame(), 1);
    }

    #[test]
    fn test_breakpoint_pauses_on_arrival() {
        let mut p = FramePlayback::new(6, 60.0).with_breakpoints(&[2]);
        p.advance();
        assert!(!p.paused);
        p.advance();
        assert!(p.paused);
        assert_eq!(p.current_frame(), 2);
        p.play();
        p.advance();
        assert_eq!(p.current_frame(), 3);
        assert!(!p.paused);
    }

    #[test]
    fn test_resuming_from_breakpoint_leaves_it_at_low_fps() {
        // at 10 fps each frame spans six ticks
        let mut p = FramePlayback::new(4, 10.0).with_breakpoints(&[1]);
        for _ in 0..6 {
            p.advance();
        }
        assert!(p.paused);
        assert_eq!(p.current_frame(), 1);
        p.play();
        for _ in 0..6 {
            p.advance();
        }
        assert!(!p.paused);
        assert_eq!(p.current_frame(), 2);
    }

    #[test]
    fn test_frame_rect_offsets_along_layout() {
        let base = Rect::new(200.0, 0.0, 70.0, 50.0);
        let mut p = FramePlayback::new(2, 10.0);
        p.goto(1);
        assert_eq!(p.frame_rect(base), Rect::new(200.0, 50.0, 70.0, 50.0));
        let p = p.with_layout(SheetLayout::Horizontal);
        assert_eq!(p.frame_rect(base), Rect::new(270.0, 0.0, 70.0, 50.0));
    }
}
