//! gifview - animated GIFs inside a ratatui terminal UI
//!
//! The widget picks the frame to show from elapsed wall-clock time, so a
//! host only has to repaint periodically:
//! - [`clip`] holds the decoded frames and answers "which frame is active now"
//! - [`tui::GifView`] shares a clip between loaders and the render path
//! - [`tui::redraw::RedrawDriver`] asks the host UI to repaint at a fixed cadence

pub mod clip;
pub mod config;
pub mod decode;
pub mod pixel;
pub mod tui;

pub use clip::AnimationClip;
pub use config::GifViewConfig;
pub use decode::{decode_gif, DecodedGif};
pub use pixel::{frame_to_text, PixelError};
pub use tui::redraw::{RedrawDriver, RepaintRequester};
pub use tui::GifView;

/// Result type for gifview operations
pub type Result<T> = std::result::Result<T, GifViewError>;

/// Errors that can occur while loading or animating a GIF
#[derive(Debug, thiserror::Error)]
pub enum GifViewError {
    #[error("Unable to open file: {0}")]
    Open(#[source] std::io::Error),

    #[error("Unable to decode GIF: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Unable to convert frame {index}: {source}")]
    ConvertFrame {
        index: usize,
        #[source]
        source: PixelError,
    },

    #[error("Frame count {frames} does not match delay count {delays}")]
    FrameCountMismatch { frames: usize, delays: usize },

    #[error("A redraw driver is already running")]
    RedrawAlreadyRunning,

    #[error("Config error: {0}")]
    Config(String),

    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}
