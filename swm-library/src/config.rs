//! User configuration for SWM
//!
//! A read-only `key=value` file with `#` comments. Unknown keys and values
//! that do not parse are ignored so a bad line never stops the timer.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Default ambient track, relative to the working directory
pub const DEFAULT_TRACK: &str = "assets/rain.mp3";

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Duration field value at startup
    pub study_minutes: i64,
    /// Initial volume (0-100)
    pub volume: u8,
    /// Start with the ambient track muted
    pub start_muted: bool,
    /// Ambient track path
    pub track: PathBuf,
    /// Theme name
    pub theme: Option<String>,
    /// Also ask the terminal window to maximize on fullscreen
    pub fullscreen_escape: bool,
    /// Let the player wrap the track by itself
    pub native_loop: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            study_minutes: 30,
            volume: 50,
            start_muted: true,
            track: PathBuf::from(DEFAULT_TRACK),
            theme: None,
            fullscreen_escape: false,
            native_loop: true,
        }
    }
}

impl Config {
    /// Load config from the default location
    ///
    /// Returns default config if file doesn't exist or can't be read.
    pub fn load() -> Self {
        let path = Self::config_path();
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                warn!("could not read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load config from a specific path
    pub fn load_from(path: &Path) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Get the default config file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("swm")
            .join("config.txt")
    }

    /// Parse config from simple key=value format
    pub fn parse(content: &str) -> Self {
        let mut config = Self::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            match key {
                "study_minutes" => {
                    if let Ok(minutes) = value.parse() {
                        config.study_minutes = minutes;
                    }
                }
                "volume" => {
                    if let Ok(volume) = value.parse::<u8>() {
                        config.volume = volume.min(100);
                    }
                }
                "start_muted" => {
                    if let Some(flag) = parse_bool(value) {
                        config.start_muted = flag;
                    }
                }
                "track" => {
                    if !value.is_empty() {
                        config.track = PathBuf::from(value);
                    }
                }
                "theme" => {
                    if !value.is_empty() {
                        config.theme = Some(value.to_string());
                    }
                }
                "fullscreen_escape" => {
                    if let Some(flag) = parse_bool(value) {
                        config.fullscreen_escape = flag;
                    }
                }
                "native_loop" => {
                    if let Some(flag) = parse_bool(value) {
                        config.native_loop = flag;
                    }
                }
                _ => {} // Ignore unknown keys
            }
        }

        config
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        let config = Config::parse("");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_all_keys() {
        let content = "\
study_minutes=45
volume=80
start_muted=no
track=/music/rain.ogg
theme=amber
fullscreen_escape=on
native_loop=false";
        let config = Config::parse(content);
        assert_eq!(config.study_minutes, 45);
        assert_eq!(config.volume, 80);
        assert!(!config.start_muted);
        assert_eq!(config.track, PathBuf::from("/music/rain.ogg"));
        assert_eq!(config.theme.as_deref(), Some("amber"));
        assert!(config.fullscreen_escape);
        assert!(!config.native_loop);
    }

    #[test]
    fn test_parse_with_comments() {
        let content = "# Comment\nvolume = 20\n# Another comment";
        let config = Config::parse(content);
        assert_eq!(config.volume, 20);
    }

    #[test]
    fn test_bad_values_keep_defaults() {
        let content = "study_minutes=soon\nvolume=loud\nstart_muted=maybe\nnot a line\nfoo=bar";
        let config = Config::parse(content);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_volume_clamped() {
        let config = Config::parse("volume=250");
        assert_eq!(config.volume, 100);
    }

    #[test]
    fn test_load_from_missing_file() {
        let result = Config::load_from(Path::new("/definitely/not/here/config.txt"));
        assert!(result.is_err());
    }
}
