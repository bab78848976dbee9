//! Per-user locations of the files handhit writes.

use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "handhit";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APP_NAME)
}

/// The state dir where the platform has one (Linux), the local data dir otherwise
pub fn log_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| {
        dirs.state_dir()
            .unwrap_or(dirs.data_local_dir())
            .join("handhit.log")
    })
}

pub fn config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_live_under_the_app_directory() {
        // no home directory at all in some sandboxes
        let (Some(log), Some(config)) = (log_path(), config_path()) else {
            return;
        };
        assert_eq!(log.file_name().unwrap(), "handhit.log");
        assert_eq!(config.file_name().unwrap(), "config.json");
        for path in [log, config] {
            assert!(path.components().any(|c| c.as_os_str() == APP_NAME));
        }
    }
}
