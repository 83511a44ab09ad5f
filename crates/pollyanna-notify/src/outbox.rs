//! Filesystem outbox: one JSON message file per participant.
//!
//! Useful when messages are sent by hand or by another tool. Layout:
//! `<dir>/<year>-<participant slug>.json`. Names whose slugs coincide get a
//! numeric suffix (`-2`, `-3`, ...) in delivery order, so no message
//! replaces another within one run.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use pollyanna_core::Year;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::NotifyError;
use crate::message::Message;
use crate::notifier::{DeliveryReceipt, Notifier};
use crate::Result;

pub struct OutboxNotifier {
    dir: PathBuf,
    year: Year,
    /// File stem -> participant it was handed to
    claimed: Mutex<BTreeMap<String, String>>,
}

impl OutboxNotifier {
    /// Create the outbox directory if needed.
    pub fn new(dir: impl AsRef<Path>, year: Year) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|source| NotifyError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self {
            dir,
            year,
            claimed: Mutex::new(BTreeMap::new()),
        })
    }

    /// File the participant's message was written to, once delivered.
    pub fn message_path(&self, participant: &str) -> Option<PathBuf> {
        let claimed = self.claimed.lock().ok()?;
        claimed
            .iter()
            .find(|(_, owner)| owner.as_str() == participant)
            .map(|(stem, _)| self.dir.join(format!("{stem}.json")))
    }

    /// Reserve a file for `participant`, reusing the one it already holds.
    fn claim_path(&self, participant: &str) -> Result<PathBuf> {
        let mut claimed = self
            .claimed
            .lock()
            .map_err(|_| NotifyError::Outbox("file name registry poisoned".to_string()))?;

        let base = format!("{}-{}", self.year, slug(participant));
        let mut stem = base.clone();
        let mut suffix = 1;
        loop {
            match claimed.get(&stem) {
                None => {
                    claimed.insert(stem.clone(), participant.to_string());
                    break;
                }
                Some(owner) if owner == participant => break,
                Some(_) => {
                    suffix += 1;
                    stem = format!("{base}-{suffix}");
                }
            }
        }
        Ok(self.dir.join(format!("{stem}.json")))
    }
}

#[async_trait]
impl Notifier for OutboxNotifier {
    fn channel(&self) -> &'static str {
        "outbox"
    }

    async fn deliver(&self, message: &Message) -> Result<DeliveryReceipt> {
        let path = self.claim_path(&message.participant)?;
        let bytes = serde_json::to_vec_pretty(message)?;
        let io_err = |source| NotifyError::Io {
            path: path.clone(),
            source,
        };

        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(io_err)?;
        tmp.write_all(&bytes).map_err(io_err)?;
        tmp.persist(&path).map_err(|e| io_err(e.error))?;

        debug!(path = %path.display(), "Message written to outbox");
        Ok(DeliveryReceipt {
            id: path.display().to_string(),
        })
    }
}

/// Lowercase alphanumerics (any script), everything else collapsed to `-`.
fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    let trimmed = out.trim_matches('-');
    if trimmed.is_empty() {
        "participant".to_string()
    } else {
        trimmed.to_string()
    }
}
