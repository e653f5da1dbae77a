use std::path::{Path, PathBuf};

use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::{Preferences, Theme},
};

/// UI preferences persisted as a single JSON document.
///
/// Loaded once at startup and written back whole on every change.
pub struct PreferencesStore {
    path: PathBuf,
    current: RwLock<Preferences>,
}

impl PreferencesStore {
    /// Loads preferences from `path`.
    ///
    /// A missing file yields defaults silently; an unreadable or malformed one
    /// yields defaults with a warning, and is overwritten on the next save.
    pub async fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();

        let current = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => match serde_json::from_str::<Preferences>(&contents) {
                Ok(prefs) => {
                    tracing::info!(
                        path = %path.display(),
                        theme = ?prefs.theme,
                        "Loaded preferences"
                    );
                    prefs
                }
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Malformed preferences file, using defaults"
                    );
                    Preferences::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "No preferences file, using defaults");
                Preferences::default()
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Unreadable preferences file, using defaults"
                );
                Preferences::default()
            }
        };

        Self {
            path,
            current: RwLock::new(current),
        }
    }

    pub async fn get(&self) -> Preferences {
        self.current.read().await.clone()
    }

    /// Changes the theme and saves before returning.
    ///
    /// The in-memory value is only replaced once the write succeeded.
    pub async fn set_theme(&self, theme: Theme) -> AppResult<Preferences> {
        let mut current = self.current.write().await;
        let updated = current.with_theme(theme);

        self.save(&updated).await?;
        *current = updated.clone();

        tracing::info!(theme = ?theme, "Preferences saved");
        Ok(updated)
    }

    async fn save(&self, prefs: &Preferences) -> AppResult<()> {
        let json = serde_json::to_string_pretty(prefs)
            .map_err(|e| AppError::Internal(format!("Preferences serialization error: {}", e)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}
