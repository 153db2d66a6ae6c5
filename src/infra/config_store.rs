// ============================================================
// Layer 6 — Profile Store
// ============================================================
// Saves and loads RestrictionProfile documents.
//
// File naming convention:
//   output/
//     tafeng_restrictions_config.json
//     instacart_restrictions_config.json
//
// serde_json::to_string_pretty keeps the files readable and
// hand-editable; a hand-edited profile is validated again
// against its own original_stats when loaded.

use anyhow::{Context, Result};
use std::{fs, path::{Path, PathBuf}};

use crate::application::profile_use_case::RestrictionProfile;

pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, dataset: &str) -> PathBuf {
        self.dir.join(format!("{dataset}_restrictions_config.json"))
    }

    /// Write the profile and return where it went.
    pub fn save(&self, profile: &RestrictionProfile) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create output directory '{}'", self.dir.display()))?;

        let path = self.path_for(&profile.dataset);
        let json = serde_json::to_string_pretty(profile)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write profile to '{}'", path.display()))?;

        tracing::info!("Saved restriction profile to '{}'", path.display());
        Ok(path)
    }

    /// Read a profile from an explicit path.
    pub fn load(path: &Path) -> Result<RestrictionProfile> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Cannot read profile '{}'", path.display()))?;
        let profile: RestrictionProfile = serde_json::from_str(&json)
            .with_context(|| format!("Malformed profile '{}'", path.display()))?;

        profile
            .restrictions
            .validate(&profile.original_stats)
            .with_context(|| format!("Profile '{}' has invalid restrictions", path.display()))?;

        tracing::debug!("Loaded profile for '{}' from '{}'", profile.dataset, path.display());
        Ok(profile)
    }
}
