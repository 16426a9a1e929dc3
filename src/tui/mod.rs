//! Terminal User Interface module
//!
//! The [`GifView`] widget, the redraw driver that keeps it moving, and a
//! small demo host application.

mod app;
mod gif_view;
pub mod markup;
pub mod redraw;
mod theme;

pub use app::{App, AppEvent};
pub use gif_view::GifView;
pub use theme::Theme;
