//! Standard paths used by studytrack

use std::path::PathBuf;

const APP_DIR: &str = "studytrack";

/// Standard studytrack paths
pub struct Paths {
    /// Data directory (~/.local/share/studytrack)
    pub data: PathBuf,
    /// Config directory (~/.config/studytrack)
    pub config: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}

impl Paths {
    pub fn new() -> Self {
        let data = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join(APP_DIR);

        let config = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join(APP_DIR);

        Self { data, config }
    }

    /// Location of the JSON config file
    pub fn config_file(&self) -> PathBuf {
        self.config.join("config.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_location() {
        let paths = Paths::new();
        assert_eq!(paths.config_file(), paths.config.join("config.json"));
    }

    #[test]
    fn test_default_paths_end_in_app_dir() {
        let paths = Paths::new();
        assert!(paths.config.ends_with(APP_DIR));
        assert!(paths.data.ends_with(APP_DIR));
    }
}
