use std::fs::{rename, File};
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::models::MatchData;

/// File name of the persisted match configuration.
pub const MATCH_CONFIG_FILE: &str = "match_data_v1.json";

/// Loads the match configuration, falling back to the built-in fixture when
/// nothing has been saved yet or the saved value is unreadable. The capture
/// flow only ever reads this data; edits come from the roster editor.
pub fn load_match_config(path: &Path) -> MatchData {
    if !path.exists() {
        log::info!("no saved match configuration at {:?}; using default fixture", path);
        return MatchData::default_fixture();
    }

    match std::fs::read_to_string(path).map_err(crate::error::CoreError::from).and_then(|data| {
        serde_json::from_str::<MatchData>(&data).map_err(crate::error::CoreError::from)
    }) {
        Ok(data) => data,
        Err(err) => {
            log::warn!(
                "failed to load match configuration from {:?}: {}; using default fixture",
                path,
                err
            );
            MatchData::default_fixture()
        }
    }
}

/// Persists the configuration atomically, for the roster editor.
pub fn save_match_config(path: &Path, data: &MatchData) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_vec_pretty(data)?;

    let temp_path = path.with_extension("tmp");
    {
        let mut file = File::create(&temp_path)?;
        file.write_all(&json)?;
        file.flush()?;
        file.sync_all()?;
    }
    rename(&temp_path, path)?;

    log::debug!("saved match configuration to {:?}", path);
    Ok(())
}
