pub mod check;
pub mod map;

mod run;

use anyhow::{Context, Result};
use std::path::Path;

use crate::passport::PassportOptions;

#[derive(Debug)]
pub enum Action {
    Check(check::Args),
    Map(map::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> Result<()> {
        run::execute(self).await
    }
}

/// Read caller options from a JSON file, or start from empty options.
pub(crate) fn load_options(path: Option<&Path>) -> Result<PassportOptions> {
    let Some(path) = path else {
        return Ok(PassportOptions::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read options file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse options file {}", path.display()))
}
