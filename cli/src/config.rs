use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

const FOODS_FILE: &str = "Food.csv";
const USERS_FILE: &str = "users.csv";

pub struct Config {
    pub foods_path: PathBuf,
    pub users_path: PathBuf,
}

impl Config {
    /// Resolves the data directory, creating it if needed. `data_dir`
    /// overrides the platform location.
    pub fn load(data_dir: Option<&Path>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir.to_path_buf(),
            None => ProjectDirs::from("", "", "macrobook")
                .context("Could not determine home directory")?
                .data_dir()
                .to_path_buf(),
        };
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        Ok(Self::in_dir(&data_dir))
    }

    fn in_dir(data_dir: &Path) -> Self {
        Config {
            foods_path: data_dir.join(FOODS_FILE),
            users_path: data_dir.join(USERS_FILE),
        }
    }
}
