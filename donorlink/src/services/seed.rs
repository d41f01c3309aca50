use std::path::Path;

use crate::error::{MatchError, Result};
use crate::models::Profile;

use super::MatchingService;

/// Read a JSON array of profiles.
pub fn load_seed_file(path: &Path) -> Result<Vec<Profile>> {
    let raw = std::fs::read_to_string(path)?;
    let profiles: Vec<Profile> = serde_json::from_str(&raw).map_err(|e| {
        MatchError::InvalidRequest(format!("Invalid seed file {}: {e}", path.display()))
    })?;
    Ok(profiles)
}

/// Store every profile in the seed file through the batch path.
pub async fn seed_from_file(service: &MatchingService, path: &Path) -> Result<usize> {
    let profiles = load_seed_file(path)?;
    let stored = service.store_profiles(profiles).await?;
    tracing::info!(count = stored.len(), path = %path.display(), "Seeded profiles");
    Ok(stored.len())
}
