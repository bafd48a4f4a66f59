//! `.env` file loading

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Load variables from `path`, or from a `.env` in the working directory
/// (or a parent) when no path is given
///
/// An explicit file that cannot be read is an error; a missing default
/// `.env` is not. Variables already set in the environment win.
pub fn load(path: Option<&Path>) -> Result<Option<PathBuf>> {
    match path {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("Failed to load env file {}", path.display()))?;
            Ok(Some(path.to_path_buf()))
        }
        None => Ok(dotenvy::dotenv().ok()),
    }
}
