//! Widget and redraw configuration.
//!
//! Values come from defaults, an optional TOML file and finally CLI flags:
//!
//! ```toml
//! tick_ms = 50
//! foreground = "white"
//! ```

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use ratatui::style::Color;
use serde::Deserialize;

use crate::{GifViewError, Result};

/// Default cadence of the redraw driver.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Configuration for the gif view and its redraw driver
#[derive(Debug, Clone, PartialEq)]
pub struct GifViewConfig {
    /// How often the redraw driver asks the host to repaint
    pub tick_interval: Duration,

    /// Colour for frame text that carries no colour tag
    pub foreground: Color,
}

impl Default for GifViewConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            foreground: Color::White,
        }
    }
}

/// On-disk shape of the config file; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    tick_ms: Option<u64>,
    foreground: Option<String>,
}

impl GifViewConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a TOML config file on top of the defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| GifViewError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&raw)
    }

    /// Parse TOML config text on top of the defaults.
    pub fn from_toml(raw: &str) -> Result<Self> {
        let file: FileConfig =
            toml::from_str(raw).map_err(|e| GifViewError::Config(e.to_string()))?;

        let mut config = Self::default();
        if let Some(ms) = file.tick_ms {
            config = config.with_tick_interval(Duration::from_millis(ms))?;
        }
        if let Some(name) = file.foreground {
            config = config.with_foreground_name(&name)?;
        }
        Ok(config)
    }

    /// Set the redraw cadence. A zero interval is rejected.
    pub fn with_tick_interval(mut self, interval: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(GifViewError::Config(
                "tick interval must be greater than zero".to_string(),
            ));
        }
        self.tick_interval = interval;
        Ok(self)
    }

    pub fn with_foreground(mut self, color: Color) -> Self {
        self.foreground = color;
        self
    }

    /// Set the foreground from a colour name or `#rrggbb`.
    pub fn with_foreground_name(self, name: &str) -> Result<Self> {
        let color = Color::from_str(name)
            .map_err(|_| GifViewError::Config(format!("unknown colour: {name}")))?;
        Ok(self.with_foreground(color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GifViewConfig::new();
        assert_eq!(config.tick_interval, Duration::from_millis(50));
        assert_eq!(config.foreground, Color::White);
    }

    #[test]
    fn test_from_toml() {
        let config = GifViewConfig::from_toml("tick_ms = 20\nforeground = \"#00ff00\"\n").unwrap();
        assert_eq!(config.tick_interval, Duration::from_millis(20));
        assert_eq!(config.foreground, Color::Rgb(0, 255, 0));
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(GifViewConfig::from_toml("").unwrap(), GifViewConfig::default());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(GifViewConfig::from_toml("tick_ms = 0").is_err());
        assert!(GifViewConfig::from_toml("foreground = \"not-a-colour\"").is_err());
        assert!(GifViewConfig::from_toml("fps = 30").is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gifview.toml");
        std::fs::write(&path, "foreground = \"cyan\"").unwrap();
        let config = GifViewConfig::from_file(&path).unwrap();
        assert_eq!(config.foreground, Color::Cyan);

        let missing = GifViewConfig::from_file(dir.path().join("nope.toml"));
        assert!(matches!(missing, Err(GifViewError::Config(_))));
    }
}
