use std::path::Path;

use serde::Deserialize;

/// Ledger path taken by batch active-state toggles.
///
/// The surveyed tooling deliberately kept active toggles off the undo
/// stack (history log only) while transform and capability batches got the
/// full undo-tracked path. That asymmetry is a policy choice here, not an
/// accident: pick the variant the session should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActiveTogglePolicy {
    /// Active toggles appear in the history log but are not undoable
    /// through the ledger.
    #[default]
    HistoryOnly,
    /// Active toggles are recorded like any other batch operation.
    Recorded,
}

/// Per-session configuration, loaded from `workbench.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionConfig {
    /// How batch active-state toggles interact with the undo ledger.
    #[serde(default)]
    pub active_toggle_policy: ActiveTogglePolicy,
}

/// Loads a session config from a TOML file.
///
/// Returns `Err` with a human-readable message if the file cannot be read
/// or parsed.
pub fn load_config(path: &Path) -> Result<SessionConfig, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    toml::from_str(&content).map_err(|e| format!("failed to parse {}: {e}", path.display()))
}

/// Loads a session config, falling back to defaults if the file is missing
/// or invalid.
pub fn load_or_default(path: &Path) -> SessionConfig {
    match load_config(path) {
        Ok(config) => {
            log::info!("Loaded session config from {}", path.display());
            config
        }
        Err(e) => {
            log::warn!("No session config ({e}), using defaults");
            SessionConfig::default()
        }
    }
}
