//! Gameplay tuning and user settings.
//!
//! Every length and per-frame velocity is defined once against a 400px tall
//! reference playfield and scaled linearly to the real surface height, so the
//! game plays the same in a 20-row terminal as in a 60-row one.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the data directory.
pub const HOME_ENV: &str = "FLAPPY_RECT_HOME";

/// Height of the playfield the reference constants were tuned on.
pub const REFERENCE_HEIGHT: f64 = 400.0;

/// Size of the drawing surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub width: f64,
    pub height: f64,
}

impl Surface {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center_x(&self) -> f64 {
        self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.height / 2.0
    }
}

/// Gameplay constants for one surface size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    /// Surface height / reference height.
    pub scale: f64,

    // Body
    pub body_x: f64,
    pub body_width: f64,
    pub body_height: f64,
    pub gravity: f64,
    /// Negative: upward.
    pub lift: f64,
    pub max_fall: f64,

    // Obstacles
    pub pipe_width: f64,
    pub gap: f64,
    pub min_height: f64,
    pub spawn_period: Duration,

    // Playfield
    pub ground_height: f64,

    // Difficulty
    pub base_speed: f64,
    pub speed_step: f64,
    pub speed_up_every: u32,

    // Restart control, relative to the surface center
    pub button_width: f64,
    pub button_height: f64,
    pub button_offset_y: f64,
}

impl Tuning {
    /// Constants for the 400px reference playfield.
    pub fn reference() -> Self {
        Self {
            scale: 1.0,
            body_x: 50.0,
            body_width: 20.0,
            body_height: 20.0,
            gravity: 0.5,
            lift: -10.0,
            max_fall: 10.0,
            pipe_width: 40.0,
            gap: 150.0,
            min_height: 20.0,
            spawn_period: Duration::from_millis(1500),
            ground_height: 50.0,
            base_speed: 2.0,
            speed_step: 0.5,
            speed_up_every: 5,
            button_width: 160.0,
            button_height: 50.0,
            button_offset_y: 100.0,
        }
    }

    pub fn for_surface(surface: Surface) -> Self {
        Self::reference().scaled(surface.height / REFERENCE_HEIGHT)
    }

    fn scaled(self, s: f64) -> Self {
        Self {
            scale: self.scale * s,
            body_x: self.body_x * s,
            body_width: self.body_width * s,
            body_height: self.body_height * s,
            gravity: self.gravity * s,
            lift: self.lift * s,
            max_fall: self.max_fall * s,
            pipe_width: self.pipe_width * s,
            gap: self.gap * s,
            min_height: self.min_height * s,
            ground_height: self.ground_height * s,
            base_speed: self.base_speed * s,
            speed_step: self.speed_step * s,
            button_width: self.button_width * s,
            button_height: self.button_height * s,
            button_offset_y: self.button_offset_y * s,
            ..self
        }
    }

    /// Y coordinate of the top of the ground band.
    pub fn ground_line(&self, surface: Surface) -> f64 {
        surface.height - self.ground_height
    }

    /// Inclusive range `gapTop` is drawn from.
    pub fn gap_top_range(&self, surface: Surface) -> (f64, f64) {
        let lo = self.min_height;
        let hi = (surface.height - self.gap - self.min_height).max(lo);
        (lo, hi)
    }
}

/// User preferences, read from `settings.json` in the data directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Play sound cues.
    pub sound: bool,
    /// Target frame period in milliseconds.
    pub frame_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound: true,
            frame_ms: 16,
        }
    }
}

impl Settings {
    pub const FILE_NAME: &'static str = "settings.json";

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.frame_ms = settings.frame_ms.clamp(8, 100);
        Ok(settings)
    }

    /// Load from `dir`, falling back to defaults when the file is missing or
    /// unreadable.
    pub fn load(dir: &Path) -> Self {
        let path = dir.join(Self::FILE_NAME);
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(_) => return Self::default(),
        };
        match Self::from_json(&json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring malformed {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn frame_period(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }
}

/// Directory holding the best score, settings and log file.
pub fn data_dir() -> Option<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV) {
        return Some(PathBuf::from(home));
    }
    dirs::data_dir().map(|d| d.join("flappy-rect"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_surface_is_unscaled() {
        let t = Tuning::for_surface(Surface::new(800.0, REFERENCE_HEIGHT));
        assert_eq!(t, Tuning::reference());
    }

    #[test]
    fn test_scaling_halves_lengths_not_times() {
        let t = Tuning::for_surface(Surface::new(80.0, 200.0));
        assert!((t.scale - 0.5).abs() < f64::EPSILON);
        assert!((t.gap - 75.0).abs() < f64::EPSILON);
        assert!((t.lift - (-5.0)).abs() < f64::EPSILON);
        assert!((t.speed_step - 0.25).abs() < f64::EPSILON);
        assert_eq!(t.spawn_period, Duration::from_millis(1500));
        assert_eq!(t.speed_up_every, 5);
    }

    #[test]
    fn test_gap_top_range() {
        let surface = Surface::new(800.0, 400.0);
        let (lo, hi) = Tuning::reference().gap_top_range(surface);
        assert!((lo - 20.0).abs() < f64::EPSILON);
        assert!((hi - 230.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ground_line() {
        let surface = Surface::new(800.0, 400.0);
        assert!((Tuning::reference().ground_line(surface) - 350.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_settings_defaults_fill_missing_fields() {
        let s = Settings::from_json(r#"{"sound": false}"#).unwrap();
        assert!(!s.sound);
        assert_eq!(s.frame_ms, 16);
    }

    #[test]
    fn test_settings_frame_ms_clamped() {
        let s = Settings::from_json(r#"{"frame_ms": 1}"#).unwrap();
        assert_eq!(s.frame_ms, 8);
        let s = Settings::from_json(r#"{"frame_ms": 5000}"#).unwrap();
        assert_eq!(s.frame_ms, 100);
    }

    #[test]
    fn test_settings_load_missing_dir_defaults() {
        let dir = std::env::temp_dir().join("flappy-rect-no-such-dir-for-settings");
        assert_eq!(Settings::load(&dir), Settings::default());
    }
}
