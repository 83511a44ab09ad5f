//! Participant source: name -> contact address.
//!
//! Any problem here is fatal. A run never starts matching on a partial or
//! unreadable participant list.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::error::StoreError;
use crate::Result;

/// Participants of this year's draw with their contact addresses.
///
/// The draw only ever sees the names; contacts are for notification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Participants {
    contacts: BTreeMap<String, String>,
}

impl Participants {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, contact: impl Into<String>) {
        self.contacts.insert(name.into(), contact.into());
    }

    /// Names in a stable order.
    pub fn names(&self) -> Vec<String> {
        self.contacts.keys().cloned().collect()
    }

    pub fn contact(&self, name: &str) -> Option<&str> {
        self.contacts.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.contacts.iter().map(|(n, c)| (n.as_str(), c.as_str()))
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}

impl<N: Into<String>, C: Into<String>> FromIterator<(N, C)> for Participants {
    fn from_iter<I: IntoIterator<Item = (N, C)>>(iter: I) -> Self {
        Self {
            contacts: iter
                .into_iter()
                .map(|(n, c)| (n.into(), c.into()))
                .collect(),
        }
    }
}

/// Parse a participants JSON document.
pub fn parse_participants(raw: &str) -> Result<Participants> {
    if raw.trim().is_empty() {
        return Err(StoreError::InvalidParticipants(
            "file is empty; expected an object of name: contact pairs".to_string(),
        ));
    }

    let value: Value = serde_json::from_str(raw)?;
    let Value::Object(map) = value else {
        return Err(StoreError::InvalidParticipants(
            "expected an object of name: contact pairs".to_string(),
        ));
    };

    let mut participants = Participants::new();
    for (name, contact) in map {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(StoreError::InvalidParticipants(
                "participant names must not be blank".to_string(),
            ));
        }
        let Value::String(contact) = contact else {
            return Err(StoreError::InvalidParticipants(format!(
                "contact for {name} must be a string"
            )));
        };
        if participants.contact(&name).is_some() {
            return Err(StoreError::InvalidParticipants(format!(
                "duplicate participant after trimming: {name}"
            )));
        }
        participants.insert(name, contact);
    }

    if participants.len() < 2 {
        return Err(StoreError::InvalidParticipants(format!(
            "at least 2 participants are required, got {}",
            participants.len()
        )));
    }

    Ok(participants)
}

/// Load and validate the participants file at `path`.
pub fn load_participants(path: &Path) -> Result<Participants> {
    let raw = std::fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    let participants = parse_participants(&raw)?;
    info!(
        path = %path.display(),
        count = participants.len(),
        "Participants loaded"
    );
    Ok(participants)
}
