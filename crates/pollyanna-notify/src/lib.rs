//! Pollyanna Notify: tell each participant who they drew
//!
//! Composition is separate from delivery. [`compose`] renders the text and
//! HTML bodies; a [`Notifier`] delivers them. [`notify_all`] fans out over
//! the draw and never lets a single failed delivery fail the run.
//!
//! ## Notifiers
//!
//! - `LogNotifier`: dry run, logs addressees only
//! - `OutboxNotifier`: one JSON file per message in a directory
//! - `WebhookNotifier`: one HTTP POST per message

mod error;
pub mod message;
pub mod notifier;
pub mod outbox;
pub mod webhook;

pub use error::NotifyError;
pub use message::{compose, subject, Message};
pub use notifier::{
    notify_all, DeliveryReceipt, DeliveryReport, LogNotifier, Notifier, NotifyRequest,
};
pub use outbox::OutboxNotifier;
pub use webhook::{WebhookConfig, WebhookNotifier};

/// Result type for notification operations
pub type Result<T> = std::result::Result<T, NotifyError>;
