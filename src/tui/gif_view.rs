//! The animated GIF widget.
//!
//! [`GifView`] is a cheap, cloneable handle to one shared [`AnimationClip`].
//! Loaders replace the clip under a write lock while the render path only
//! reads it, so an image can be reloaded from a setup task while the host UI
//! keeps drawing. Drawing never fails; an unloaded view renders nothing.

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};
use std::time::Instant;

use image::RgbaImage;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;
use tracing::{debug, info};

use super::markup::parse_line;
use crate::clip::AnimationClip;
use crate::config::GifViewConfig;
use crate::decode::{read_gif_file, DecodedGif};
use crate::Result;

/// A box that shows the right GIF frame for the current wall-clock time.
#[derive(Debug, Clone)]
pub struct GifView {
    clip: Arc<RwLock<AnimationClip>>,
    foreground: Color,
}

impl GifView {
    /// Create an empty view. Its playback origin is the moment of creation.
    pub fn new() -> Self {
        Self {
            clip: Arc::new(RwLock::new(AnimationClip::empty())),
            foreground: Color::White,
        }
    }

    /// Create an empty view using the colours from `config`.
    pub fn with_config(config: &GifViewConfig) -> Self {
        Self::new().with_foreground(config.foreground)
    }

    pub fn with_foreground(mut self, color: Color) -> Self {
        self.foreground = color;
        self
    }

    /// Create a view from an already decoded GIF.
    pub fn from_gif(gif: &DecodedGif) -> Result<Self> {
        let view = Self::new();
        view.set_image(gif)?;
        Ok(view)
    }

    /// Create a view from a GIF file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let view = Self::new();
        view.set_image_path(path)?;
        Ok(view)
    }

    /// Replace the animation with the GIF at `path`.
    pub fn set_image_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        debug!("Loading GIF from {:?}", path);
        let gif = read_gif_file(path)?;
        self.set_image(&gif)
    }

    /// Replace the animation with a decoded GIF.
    pub fn set_image(&self, gif: &DecodedGif) -> Result<()> {
        self.load(&gif.frames, &gif.delays_cs)
    }

    /// Render `frames` and install them with their centisecond delays.
    ///
    /// Either every frame converts and the new clip is swapped in, or the
    /// previous clip is left exactly as it was. Playback restarts at frame 0
    /// on success.
    pub fn load(&self, frames: &[RgbaImage], delays_cs: &[u16]) -> Result<()> {
        let clip = AnimationClip::render(frames, delays_cs)?;
        self.install(clip);
        Ok(())
    }

    /// Swap in an already built clip, restarting playback from now.
    pub fn install(&self, clip: AnimationClip) {
        let mut current = self.clip.write().unwrap_or_else(PoisonError::into_inner);
        *current = clip.restarted_at(Instant::now());
        info!(
            frames = current.len(),
            total_ms = current.total_duration().as_millis() as u64,
            "Installed animation"
        );
    }

    /// Index of the frame that is showing at `now`.
    pub fn current_frame_index(&self, now: Instant) -> usize {
        self.read().current_frame_index(now)
    }

    /// Text of the frame that is showing at `now`.
    pub fn current_frame_text(&self, now: Instant) -> String {
        self.read().current_frame_text(now).to_owned()
    }

    pub fn frame_count(&self) -> usize {
        self.read().len()
    }

    /// Size of the loaded image in terminal cells (columns, rows).
    pub fn cell_size(&self) -> (u16, u16) {
        self.read().cell_size()
    }

    /// Snapshot of the loaded clip.
    pub fn clip(&self) -> AnimationClip {
        self.read().clone()
    }

    /// Write the frame for `now` into `buf`, one text line per row.
    ///
    /// Lines start at the left edge of `area` and are clipped to its width
    /// and height.
    pub fn draw(&self, buf: &mut Buffer, area: Rect, now: Instant) {
        let frame = self.current_frame_text(now);
        let area = area.intersection(buf.area);
        if area.is_empty() {
            return;
        }

        let base = Style::default().fg(self.foreground);
        for (row, text) in frame.split('\n').take(area.height as usize).enumerate() {
            let line = parse_line(text, base);
            buf.set_line(area.x, area.y + row as u16, &line, area.width);
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, AnimationClip> {
        self.clip.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for GifView {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for &GifView {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.draw(buf, area, Instant::now());
    }
}
