//! Time-driven frame selection for a decoded animation.
//!
//! A clip never advances on its own. [`AnimationClip::current_frame_index`]
//! maps a wall-clock instant to a frame using the per-frame delays, so every
//! reader asking about the same instant gets the same answer and the
//! animation loops forever without a frame-advance timer.

use std::time::{Duration, Instant};

use image::RgbaImage;
use tracing::debug;

use crate::pixel::frame_to_text;
use crate::{GifViewError, Result};

/// GIF frame delays are stored in hundredths of a second.
pub const CENTISECOND: Duration = Duration::from_millis(10);

/// Convert a raw GIF delay into a [`Duration`].
pub fn centiseconds(cs: u16) -> Duration {
    CENTISECOND * u32::from(cs)
}

/// A loaded animation: rendered frames, their delays and the playback origin.
///
/// Clips are immutable once built. Loading a new image builds a new clip and
/// replaces the old one wholesale.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    frames: Vec<String>,
    delays: Vec<Duration>,
    total_duration: Duration,
    start: Instant,
    /// Footprint in terminal cells (columns, rows).
    cell_size: (u16, u16),
}

impl AnimationClip {
    /// An empty clip starting now. Frame lookup always yields index 0.
    pub fn empty() -> Self {
        Self::empty_at(Instant::now())
    }

    /// An empty clip with an explicit start instant.
    pub fn empty_at(start: Instant) -> Self {
        Self {
            frames: Vec::new(),
            delays: Vec::new(),
            total_duration: Duration::ZERO,
            start,
            cell_size: (0, 0),
        }
    }

    /// Build a clip from already rendered frames, starting now.
    pub fn new(frames: Vec<String>, delays: Vec<Duration>) -> Result<Self> {
        Self::with_start(frames, delays, Instant::now())
    }

    /// Build a clip from already rendered frames with an explicit start instant.
    pub fn with_start(frames: Vec<String>, delays: Vec<Duration>, start: Instant) -> Result<Self> {
        if frames.len() != delays.len() {
            return Err(GifViewError::FrameCountMismatch {
                frames: frames.len(),
                delays: delays.len(),
            });
        }
        let total_duration = delays.iter().sum();
        Ok(Self {
            frames,
            delays,
            total_duration,
            start,
            cell_size: (0, 0),
        })
    }

    /// Render decoded frames to text and convert their GIF delays.
    ///
    /// All-or-nothing: the first frame that fails to render aborts the build
    /// and the error carries that frame's index.
    pub fn render(source_frames: &[RgbaImage], delays_cs: &[u16]) -> Result<Self> {
        if source_frames.len() != delays_cs.len() {
            return Err(GifViewError::FrameCountMismatch {
                frames: source_frames.len(),
                delays: delays_cs.len(),
            });
        }

        let delays: Vec<Duration> = delays_cs.iter().copied().map(centiseconds).collect();

        let mut frames = Vec::with_capacity(source_frames.len());
        for (index, image) in source_frames.iter().enumerate() {
            let text = frame_to_text(image)
                .map_err(|source| GifViewError::ConvertFrame { index, source })?;
            frames.push(text);
        }

        let cell_size = source_frames
            .first()
            .map(|img| {
                let cols = u16::try_from(img.width()).unwrap_or(u16::MAX);
                let rows = u16::try_from(img.height() / 2).unwrap_or(u16::MAX);
                (cols, rows)
            })
            .unwrap_or((0, 0));

        let clip = Self::new(frames, delays)?.with_cell_size(cell_size);
        debug!(
            frames = clip.len(),
            total_ms = clip.total_duration.as_millis() as u64,
            "Rendered animation clip"
        );
        Ok(clip)
    }

    pub fn with_cell_size(mut self, cell_size: (u16, u16)) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Move the playback origin so frame 0 starts at `start`.
    pub fn restarted_at(mut self, start: Instant) -> Self {
        self.start = start;
        self
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    pub fn delays(&self) -> &[Duration] {
        &self.delays
    }

    pub fn total_duration(&self) -> Duration {
        self.total_duration
    }

    pub fn start(&self) -> Instant {
        self.start
    }

    pub fn cell_size(&self) -> (u16, u16) {
        self.cell_size
    }

    /// Frame index for a given time since the start of playback.
    ///
    /// Elapsed time is reduced modulo the loop length, then the frame is the
    /// first one whose cumulative end lies strictly after it. A clip with no
    /// playable duration always answers 0.
    pub fn frame_index_at(&self, elapsed: Duration) -> usize {
        if self.total_duration.is_zero() {
            return 0;
        }
        let mut remaining = elapsed.as_nanos() % self.total_duration.as_nanos();
        for (i, delay) in self.delays.iter().enumerate() {
            let delay = delay.as_nanos();
            if remaining < delay {
                return i;
            }
            remaining -= delay;
        }
        0
    }

    /// Frame index active at `now`.
    pub fn current_frame_index(&self, now: Instant) -> usize {
        self.frame_index_at(now.saturating_duration_since(self.start))
    }

    /// Frame text active at `now`; empty for an empty clip.
    pub fn current_frame_text(&self, now: Instant) -> &str {
        self.frames
            .get(self.current_frame_index(now))
            .map(String::as_str)
            .unwrap_or("")
    }
}

impl Default for AnimationClip {
    fn default() -> Self {
        Self::empty()
    }
}
