use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::{LocationPreference, Participant, SessionHistoryEntry};

/// Errors that can occur with store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Participant not found: {0}")]
    NotFound(String),

    #[error("Invalid import: {0}")]
    InvalidImport(String),
}

/// Stored settings section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSettings {
    #[serde(rename = "locationPreference", default)]
    pub location_preference: LocationPreference,
    #[serde(rename = "lastSaved", default = "chrono::Utc::now")]
    pub last_saved: DateTime<Utc>,
}

impl Default for StoredSettings {
    fn default() -> Self {
        Self {
            location_preference: LocationPreference::default(),
            last_saved: Utc::now(),
        }
    }
}

/// The whole persisted document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreDocument {
    #[serde(default)]
    pub participants: Vec<Participant>,
    /// Newest first
    #[serde(rename = "pairingsHistory", default)]
    pub pairings_history: Vec<SessionHistoryEntry>,
    #[serde(default)]
    pub settings: StoredSettings,
}

impl StoreDocument {
    fn with_preference(location_preference: LocationPreference) -> Self {
        Self {
            settings: StoredSettings {
                location_preference,
                ..StoredSettings::default()
            },
            ..Self::default()
        }
    }
}

/// JSON document store for roster, history and settings
///
/// Every mutation rewrites the whole document. Without a path the store
/// lives in memory only.
pub struct DocumentStore {
    path: Option<PathBuf>,
    pretty: bool,
    /// Location preference given to a fresh or cleared document
    default_preference: LocationPreference,
    data: RwLock<StoreDocument>,
}

impl DocumentStore {
    /// Open a file-backed store, creating the file if it does not exist
    pub async fn open(path: impl AsRef<Path>, pretty: bool) -> Result<Self, StoreError> {
        Self::open_with_preference(path, pretty, LocationPreference::default()).await
    }

    /// Open a file-backed store whose new documents start with `default_preference`
    ///
    /// An existing document keeps the preference it has stored.
    pub async fn open_with_preference(
        path: impl AsRef<Path>,
        pretty: bool,
        default_preference: LocationPreference,
    ) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let fresh = || StoreDocument::with_preference(default_preference);

        let (data, needs_write) = match tokio::fs::read_to_string(&path).await {
            Ok(text) => match serde_json::from_str::<StoreDocument>(&text) {
                Ok(doc) => (doc, false),
                Err(e) => {
                    tracing::warn!(
                        "Stored data at {} is unreadable ({}), starting empty",
                        path.display(),
                        e
                    );
                    (fresh(), true)
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => (fresh(), true),
            Err(e) => return Err(e.into()),
        };

        let store = Self {
            path: Some(path),
            pretty,
            default_preference,
            data: RwLock::new(data),
        };

        if needs_write {
            let doc = store.data.read().await.clone();
            store.persist(&doc).await?;
        }

        Ok(store)
    }

    pub fn in_memory() -> Self {
        Self {
            path: None,
            pretty: false,
            default_preference: LocationPreference::default(),
            data: RwLock::new(StoreDocument::default()),
        }
    }

    pub async fn participants(&self) -> Vec<Participant> {
        self.data.read().await.participants.clone()
    }

    pub async fn participant(&self, id: &str) -> Option<Participant> {
        self.data
            .read()
            .await
            .participants
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    /// Insert a new participant (empty id) or replace an existing one
    pub async fn save_participant(&self, mut participant: Participant) -> Result<Participant, StoreError> {
        let mut doc = self.data.write().await;
        let now = Utc::now();

        let is_new = participant.id.is_empty();
        if is_new {
            participant.id = uuid::Uuid::new_v4().to_string();
        }
        let own_id = participant.id.clone();
        // nobody excludes themselves
        participant.exclusions.retain(|id| id != &own_id);
        participant.updated_at = Some(now);

        match doc.participants.iter_mut().find(|p| p.id == own_id) {
            Some(existing) => {
                participant.created_at = existing.created_at.or(Some(now));
                *existing = participant.clone();
            }
            None if is_new => {
                participant.created_at = Some(now);
                doc.participants.push(participant.clone());
            }
            None => return Err(StoreError::NotFound(own_id)),
        }

        tracing::debug!("Saved participant {} ({})", participant.name, participant.id);
        self.commit(&mut doc).await?;
        Ok(participant)
    }

    /// Remove a participant and drop them from everyone's exclusions
    pub async fn delete_participant(&self, id: &str) -> Result<(), StoreError> {
        let mut doc = self.data.write().await;

        let before = doc.participants.len();
        doc.participants.retain(|p| p.id != id);
        if doc.participants.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }

        for p in doc.participants.iter_mut() {
            p.exclusions.retain(|excluded| excluded != id);
        }

        tracing::debug!("Deleted participant {}", id);
        self.commit(&mut doc).await
    }

    /// Saved sessions, newest first
    pub async fn history(&self) -> Vec<SessionHistoryEntry> {
        self.data.read().await.pairings_history.clone()
    }

    /// Store a session at the front of the history
    pub async fn save_session(&self, mut entry: SessionHistoryEntry) -> Result<SessionHistoryEntry, StoreError> {
        let mut doc = self.data.write().await;

        entry.id = uuid::Uuid::new_v4().to_string();
        entry.created_at = Utc::now();
        doc.pairings_history.insert(0, entry.clone());

        tracing::debug!(
            "Saved session '{}' with {} pairings",
            entry.name,
            entry.pairings.len()
        );
        self.commit(&mut doc).await?;
        Ok(entry)
    }

    pub async fn clear_history(&self) -> Result<(), StoreError> {
        let mut doc = self.data.write().await;
        doc.pairings_history.clear();
        self.commit(&mut doc).await
    }

    pub async fn settings(&self) -> StoredSettings {
        self.data.read().await.settings.clone()
    }

    pub async fn update_settings(&self, location_preference: LocationPreference) -> Result<StoredSettings, StoreError> {
        let mut doc = self.data.write().await;
        doc.settings.location_preference = location_preference;
        self.commit(&mut doc).await?;
        Ok(doc.settings.clone())
    }

    /// Full document as pretty JSON
    pub async fn export_document(&self) -> Result<String, StoreError> {
        let doc = self.data.read().await;
        Ok(serde_json::to_string_pretty(&*doc)?)
    }

    /// Replace the whole document; sections missing from `json` take defaults
    pub async fn import_document(&self, json: &str) -> Result<(), StoreError> {
        let imported: StoreDocument =
            serde_json::from_str(json).map_err(|e| StoreError::InvalidImport(e.to_string()))?;

        let mut doc = self.data.write().await;
        *doc = imported;
        tracing::info!(
            "Imported {} participants and {} sessions",
            doc.participants.len(),
            doc.pairings_history.len()
        );
        self.commit(&mut doc).await
    }

    pub async fn clear_all(&self) -> Result<(), StoreError> {
        let mut doc = self.data.write().await;
        *doc = StoreDocument::with_preference(self.default_preference);
        self.commit(&mut doc).await
    }

    async fn commit(&self, doc: &mut StoreDocument) -> Result<(), StoreError> {
        doc.settings.last_saved = Utc::now();
        self.persist(doc).await
    }

    async fn persist(&self, doc: &StoreDocument) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let json = if self.pretty {
            serde_json::to_string_pretty(doc)?
        } else {
            serde_json::to_string(doc)?
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        // write then rename so a crash never leaves half a document
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await.map_err(|e| {
            tracing::error!("Failed to write {}: {}", tmp.display(), e);
            e
        })?;
        tokio::fs::rename(&tmp, path).await?;

        tracing::trace!("Persisted store to {}", path.display());
        Ok(())
    }
}
