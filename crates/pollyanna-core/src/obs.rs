//! Structured lifecycle events for a draw.
//!
//! Every emitter logs an `event` field so draws can be followed in JSON
//! output (`--json`). Recipients are never logged: the draw is secret.

use tracing::{debug, info, warn};

use crate::model::{Category, Year};

/// RAII guard that tags every log line of one draw with its year.
pub struct DrawSpan {
    _span: tracing::span::EnteredSpan,
}

impl DrawSpan {
    pub fn enter(year: Year) -> Self {
        let span = tracing::info_span!("pollyanna.draw", year = year);
        Self {
            _span: span.entered(),
        }
    }
}

pub fn emit_draw_started(year: Year, participants: usize, memory_length: usize) {
    info!(
        event = "draw.started",
        year = year,
        participants = participants,
        memory_length = memory_length,
    );
}

/// One category pass stranded a participant.
pub fn emit_match_failed(attempt: usize, category: Category, participant: &str) {
    debug!(
        event = "draw.attempt_rejected",
        attempt = attempt,
        category = %category,
        reason = "stranded",
        participant = %participant,
    );
}

/// Both passes succeeded but someone drew the same person twice.
pub fn emit_same_recipient_conflict(attempt: usize, participant: &str) {
    debug!(
        event = "draw.attempt_rejected",
        attempt = attempt,
        reason = "same_recipient",
        participant = %participant,
    );
}

pub fn emit_draw_finished(year: Year, attempts: usize) {
    info!(event = "draw.finished", year = year, attempts = attempts);
}

pub fn emit_draw_exhausted(year: Year, attempts: usize) {
    warn!(event = "draw.exhausted", year = year, attempts = attempts);
}

pub fn emit_notification_delivered(participant: &str, channel: &str) {
    info!(event = "notify.delivered", participant = %participant, channel = %channel);
}

pub fn emit_notification_failed(participant: &str, channel: &str, error: &str) {
    warn!(
        event = "notify.failed",
        participant = %participant,
        channel = %channel,
        error = %error,
    );
}
