use crate::config::Format;
use crate::frame::Frame;
use chrono::{DateTime, Utc};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

/// Persists accepted frames into the target directory, named by their
/// capture timestamp. Rejected frames never reach this type.
pub struct Store {
    target_dir: PathBuf,
    format: Format,
}

impl Store {
    pub fn new(target_dir: &Path, format: Format) -> Result<Self, Box<dyn Error>> {
        fs::create_dir_all(target_dir)?;

        Ok(Self {
            target_dir: target_dir.to_path_buf(),
            format,
        })
    }

    pub fn save(&self, frame: &Frame, taken_at: DateTime<Utc>) -> Result<PathBuf, Box<dyn Error>> {
        let name = format!(
            "{}.{}",
            taken_at.format("%Y-%m-%d_%H-%M-%S_UTC"),
            self.format.extension()
        );
        let path = self.target_dir.join(name);

        frame.save(&path)?;
        Ok(path)
    }
}
