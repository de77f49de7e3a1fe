use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Errors from loading or validating a launch configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("unknown demo '{0}' (expected physics, camera or hello)")]
    UnknownDemo(String),
}

/// Which demo the launcher runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemoKind {
    /// Falling circles on a static ground; left mouse spawns more.
    #[default]
    Physics,
    /// Pan/zoom/rotate an orthographic camera over a map sprite.
    Camera,
    /// Text rendering through the sprite batch.
    Hello,
}

impl DemoKind {
    pub const ALL: [DemoKind; 3] = [DemoKind::Physics, DemoKind::Camera, DemoKind::Hello];

    pub fn as_str(&self) -> &'static str {
        match self {
            DemoKind::Physics => "physics",
            DemoKind::Camera => "camera",
            DemoKind::Hello => "hello",
        }
    }
}

impl std::fmt::Display for DemoKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DemoKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DemoKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownDemo(s.to_string()))
    }
}

/// Launcher configuration. Every field has a default, so an empty file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub demo: DemoKind,
    /// Seed for the demos' random radius and grid offsets.
    pub seed: u64,
    /// Upper bound on physics bodies. `None` means unbounded.
    pub max_bodies: Option<usize>,
    /// Keep the physics event log for replay. Off for interactive runs.
    pub record_events: bool,
    /// PNG used as the camera demo's map. `None` generates a checkerboard.
    pub map_image: Option<PathBuf>,
    /// Frames between camera status reports.
    pub status_interval: u32,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            title: "Framelab Demos".into(),
            width: 1280,
            height: 720,
            demo: DemoKind::default(),
            seed: 0,
            max_bodies: None,
            record_events: false,
            map_image: None,
            status_interval: 240,
        }
    }
}

impl LaunchConfig {
    /// Read a YAML config file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.status_interval == 0 {
            return Err(ConfigError::Invalid(
                "status_interval must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn window_size(&self) -> crate::WindowSize {
        crate::WindowSize::new(self.width, self.height)
    }
}
