//! Notifier abstraction and the fan-out over all participants.
//!
//! Delivery failures stay local: each one is logged and recorded in the
//! [`DeliveryReport`], and the remaining participants are still notified.

use async_trait::async_trait;
use pollyanna_core::{obs, PairingResult, Year};
use pollyanna_store::Participants;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::NotifyError;
use crate::message::{compose, Message};
use crate::Result;

/// Identifier returned by a successful delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    pub id: String,
}

/// Delivers one rendered message.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Short channel name used in logs.
    fn channel(&self) -> &'static str;

    async fn deliver(&self, message: &Message) -> Result<DeliveryReceipt>;
}

/// Settings shared by every message of one run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NotifyRequest {
    pub year: Year,
    /// Decorative image embedded in the HTML body
    pub gif_url: Option<String>,
}

impl NotifyRequest {
    pub fn new(year: Year) -> Self {
        Self {
            year,
            gif_url: None,
        }
    }

    pub fn with_gif_url(mut self, url: impl Into<String>) -> Self {
        self.gif_url = Some(url.into());
        self
    }
}

/// Outcome of notifying every participant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReport {
    pub delivered: Vec<String>,
    /// Participant and error message for each failed delivery
    pub failed: Vec<(String, String)>,
}

impl DeliveryReport {
    pub fn all_delivered(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.delivered.len() + self.failed.len()
    }
}

/// Send every participant their pairing. Never fails as a whole.
pub async fn notify_all<N>(
    notifier: &N,
    pairing: &PairingResult,
    participants: &Participants,
    request: &NotifyRequest,
) -> DeliveryReport
where
    N: Notifier + ?Sized,
{
    let mut report = DeliveryReport::default();

    for (name, pair) in pairing.iter() {
        let outcome = match participants.contact(name) {
            Some(contact) => {
                let gif_url = request.gif_url.as_deref();
                let message = compose(name, contact, pair, request.year, gif_url);
                notifier.deliver(&message).await
            }
            None => Err(NotifyError::MissingContact(name.to_string())),
        };

        match outcome {
            Ok(_) => {
                obs::emit_notification_delivered(name, notifier.channel());
                report.delivered.push(name.to_string());
            }
            Err(e) => {
                obs::emit_notification_failed(name, notifier.channel(), &e.to_string());
                report.failed.push((name.to_string(), e.to_string()));
            }
        }
    }

    info!(
        channel = notifier.channel(),
        delivered = report.delivered.len(),
        failed = report.failed.len(),
        "Notifications finished"
    );
    report
}

/// Dry-run notifier: logs who would be contacted, never the recipients.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn channel(&self) -> &'static str {
        "log"
    }

    async fn deliver(&self, message: &Message) -> Result<DeliveryReceipt> {
        info!(
            participant = %message.participant,
            to = %message.to,
            subject = %message.subject,
            "Would send notification"
        );
        Ok(DeliveryReceipt {
            id: format!("log:{}", message.participant),
        })
    }
}
