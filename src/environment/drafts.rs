//! Unfinished posts kept in local storage so the user can resume them.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::storage::KeyValueStore;
use crate::error::StoreError;

#[derive(Copy, Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum DraftKind {
    Giveaway,
    Request,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DraftFields {
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub prize_amount: Option<f64>,
    pub currency: Option<String>,
    pub max_winners: Option<u32>,
    pub selection_method: Option<String>,
    pub target_amount: Option<f64>,
    #[serde(default)]
    pub entry_requirements: Vec<String>,
    #[serde(default)]
    pub proof_required: bool,
    pub duration: Option<u32>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: DraftKind,
    #[serde(flatten)]
    pub fields: DraftFields,
    pub saved_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct Drafts {
    storage: Arc<dyn KeyValueStore>,
    key: String,
}

impl std::fmt::Debug for Drafts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Drafts").field("key", &self.key).finish()
    }
}

impl Drafts {
    pub fn new(storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// All drafts. Unreadable storage counts as no drafts.
    pub fn drafts(&self) -> Vec<Draft> {
        let raw = match self.storage.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                log::error!("Failed to load drafts: {e}");
                return Vec::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            log::error!("Failed to parse drafts: {e:?}");
            Vec::new()
        })
    }

    pub fn draft(&self, id: &str) -> Option<Draft> {
        self.drafts().into_iter().find(|d| d.id == id)
    }

    pub fn draft_count(&self) -> usize {
        self.drafts().len()
    }

    /// Insert, or replace the draft with the same id
    pub fn save_draft(&self, draft: Draft) -> Result<(), StoreError> {
        let mut drafts = self.drafts();
        match drafts.iter_mut().find(|d| d.id == draft.id) {
            Some(existing) => *existing = draft,
            None => drafts.push(draft),
        }
        self.write(&drafts)
    }

    pub fn create_draft(&self, kind: DraftKind, fields: DraftFields) -> Result<Draft, StoreError> {
        let now = Utc::now();
        let draft = Draft {
            id: crate::helper::mint_id("draft"),
            kind,
            fields,
            saved_at: now,
            updated_at: now,
        };
        self.save_draft(draft.clone())?;
        Ok(draft)
    }

    /// Replace the fields of an existing draft. `Ok(None)` if there's no such draft.
    pub fn update_draft(&self, id: &str, fields: DraftFields) -> Result<Option<Draft>, StoreError> {
        let Some(mut draft) = self.draft(id) else {
            return Ok(None);
        };
        draft.fields = fields;
        draft.updated_at = Utc::now();
        self.save_draft(draft.clone())?;
        Ok(Some(draft))
    }

    pub fn delete_draft(&self, id: &str) -> Result<(), StoreError> {
        let mut drafts = self.drafts();
        drafts.retain(|d| d.id != id);
        self.write(&drafts)
    }

    fn write(&self, drafts: &[Draft]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(drafts)?;
        self.storage.set_item(&self.key, &raw)?;
        Ok(())
    }
}
