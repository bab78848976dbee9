use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::app_dirs;
use crate::chance::DelayRange;
use crate::engine::EngineTimings;
use crate::geometry::{Canvas, Circle};
use crate::session::SessionConfig;

/// Game tunables. Every field has a default so partial files load fine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub time_budget_secs: u32,
    pub arm_duration_ms: u64,
    pub feedback_ms: u64,
    pub first_arm_delay: DelayRange,
    pub rearm_delay: DelayRange,
    pub hit_reward: i64,
    pub miss_penalty: i64,
    pub frame_interval_ms: u64,
    pub canvas: Canvas,
    pub targets: Vec<Circle>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            time_budget_secs: 30,
            arm_duration_ms: 1_200,
            feedback_ms: 500,
            first_arm_delay: DelayRange::new(1_000, 4_000),
            rearm_delay: DelayRange::new(1_000, 3_000),
            hit_reward: 100,
            miss_penalty: 50,
            frame_interval_ms: 33,
            canvas: Canvas::default(),
            targets: default_targets(),
        }
    }
}

pub fn default_targets() -> Vec<Circle> {
    vec![
        Circle::new(100.0, 150.0, 40.0),
        Circle::new(250.0, 120.0, 40.0),
        Circle::new(400.0, 150.0, 40.0),
        Circle::new(550.0, 120.0, 40.0),
        Circle::new(700.0, 150.0, 40.0),
    ]
}

impl Config {
    /// Pull values the game loop cannot run with back into range
    pub fn sanitized(mut self) -> Self {
        if self.frame_interval_ms == 0 {
            warn!("frame_interval_ms of 0 would spin the event loop, using 1");
            self.frame_interval_ms = 1;
        }
        self
    }

    pub fn timings(&self) -> EngineTimings {
        EngineTimings {
            arm_duration_ms: self.arm_duration_ms,
            feedback_ms: self.feedback_ms,
            first_arm_delay: self.first_arm_delay,
            rearm_delay: self.rearm_delay,
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            time_budget_secs: self.time_budget_secs,
            hit_reward: self.hit_reward,
            miss_penalty: self.miss_penalty,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = app_dirs::config_path().unwrap_or_else(|| PathBuf::from("handhit_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            debug!(path = %self.path.display(), "no config file, using defaults");
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg.sanitized(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unreadable config");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).map_err(std::io::Error::other)?;
        fs::write(&self.path, data)
    }
}
