//! Booking notification sinks.
//!
//! A sink receives the freshly created reservation and its owner. Delivery
//! is best-effort: the booking service runs it on a spawned task and only
//! logs failures.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use handlebars::Handlebars;
use serde::{Deserialize, Serialize};
use serde_json::json;
use vb_core::entities::{Account, Reservation};

use crate::error::NotifyError;

const SUBJECT_TEMPLATE: &str = include_str!("../templates/booking_subject.hbs");
const OWNER_TEMPLATE: &str = include_str!("../templates/booking_owner.hbs");
const ADMIN_TEMPLATE: &str = include_str!("../templates/booking_admin.hbs");

#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver the booking notice for `reservation` to its owner and the
    /// configured administrators.
    async fn deliver(&self, reservation: &Reservation, owner: &Account) -> Result<(), NotifyError>;
}

/// Sink that accepts every notice and does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

#[async_trait]
impl NotificationSink for NoopSink {
    async fn deliver(&self, _reservation: &Reservation, _owner: &Account) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// One queued message in the outbox file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboxMessage {
    pub reservation_id: i64,
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub queued_at: DateTime<Utc>,
}

/// Renders notices with handlebars and appends them to a JSON-lines outbox
/// that a mail relay drains.
pub struct OutboxSink {
    outbox: PathBuf,
    sender: String,
    admin_addresses: Vec<String>,
    templates: Handlebars<'static>,
}

impl OutboxSink {
    /// # Errors
    ///
    /// Returns `NotifyError::Template` if a bundled template fails to compile.
    pub fn new(
        outbox: impl Into<PathBuf>,
        sender: impl Into<String>,
        admin_addresses: Vec<String>,
    ) -> Result<Self, NotifyError> {
        let mut templates = Handlebars::new();
        templates.set_strict_mode(true);
        templates.register_escape_fn(handlebars::no_escape);
        for (name, source) in [
            ("subject", SUBJECT_TEMPLATE),
            ("owner", OWNER_TEMPLATE),
            ("admin", ADMIN_TEMPLATE),
        ] {
            templates
                .register_template_string(name, source)
                .map_err(|e| NotifyError::Template(format!("{name}: {e}")))?;
        }

        Ok(Self {
            outbox: outbox.into(),
            sender: sender.into(),
            admin_addresses,
            templates,
        })
    }

    fn render(&self, name: &str, ctx: &serde_json::Value) -> Result<String, NotifyError> {
        self.templates
            .render(name, ctx)
            .map(|s| s.trim().to_string())
            .map_err(|e| NotifyError::Template(format!("{name}: {e}")))
    }

    /// Render the owner and administrator messages for one booking.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError::NoRecipient` if nobody has an address, or
    /// `NotifyError::Template` if rendering fails.
    pub fn compose(
        &self,
        reservation: &Reservation,
        owner: &Account,
    ) -> Result<Vec<OutboxMessage>, NotifyError> {
        let ctx = json!({
            "reservation": reservation,
            "owner_name": owner.presentable_name(),
            "venue": reservation
                .venue_title
                .clone()
                .unwrap_or_else(|| format!("Venue #{}", reservation.venue_id)),
            "slot": reservation
                .slot_window
                .clone()
                .unwrap_or_else(|| format!("Slot #{}", reservation.slot_id)),
            "sender": self.sender,
        });
        let subject = self.render("subject", &ctx)?;
        let queued_at = Utc::now();
        let message = |to: &str, body: String| OutboxMessage {
            reservation_id: reservation.id,
            from: self.sender.clone(),
            to: to.to_string(),
            subject: subject.clone(),
            body,
            queued_at,
        };

        let mut messages = Vec::new();
        if let Some(email) = owner.email.as_deref().filter(|e| !e.trim().is_empty()) {
            messages.push(message(email, self.render("owner", &ctx)?));
        }
        if !self.admin_addresses.is_empty() {
            let body = self.render("admin", &ctx)?;
            for address in &self.admin_addresses {
                messages.push(message(address, body.clone()));
            }
        }

        if messages.is_empty() {
            return Err(NotifyError::NoRecipient {
                reservation_id: reservation.id,
            });
        }
        Ok(messages)
    }
}

#[async_trait]
impl NotificationSink for OutboxSink {
    async fn deliver(&self, reservation: &Reservation, owner: &Account) -> Result<(), NotifyError> {
        let messages = self.compose(reservation, owner)?;
        let outbox = self.outbox.clone();
        let count = messages.len();

        tokio::task::spawn_blocking(move || {
            if let Some(parent) = outbox.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            serde_jsonlines::append_json_lines(&outbox, &messages)
        })
        .await
        .map_err(|e| NotifyError::Task(e.to_string()))??;

        tracing::debug!(reservation_id = reservation.id, messages = count, "booking notice queued");
        Ok(())
    }
}

/// Merge configured administrator addresses with the emails of administrator
/// accounts, keeping first occurrences.
#[must_use]
pub fn admin_recipients(configured: &[String], admins: &[Account]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let candidates = configured
        .iter()
        .map(String::as_str)
        .chain(admins.iter().filter_map(|a| a.email.as_deref()));
    for address in candidates {
        let address = address.trim();
        if !address.is_empty() && !out.iter().any(|seen| seen.eq_ignore_ascii_case(address)) {
            out.push(address.to_string());
        }
    }
    out
}
