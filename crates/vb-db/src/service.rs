//! Reservation lifecycle orchestration.
//!
//! `BookingService` validates payloads before any write, delegates to the
//! store, and schedules the booking notice without waiting for it. Audit
//! capture is left to the call site (see [`crate::desk`]), which receives the
//! before/after states it needs from the return values here.

use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinHandle;
use vb_core::entities::{BundleLine, Reservation};
use vb_core::identity::Actor;
use vb_core::listing::Paged;
use vb_core::requests::{BookingRequest, BundleLineInput, validate_bundle};

use crate::VenueDb;
use crate::error::{BookingError, DatabaseError};
use crate::notify::NotificationSink;
use crate::repos::reservation::{ListQuery, ReservationFilter};
use crate::updates::reservation::ReservationPatch;

pub use crate::repos::reservation::{Amended, ReservationState};

/// Result of the background notice task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
    Delivered,
    Skipped { reason: String },
    Failed { reason: String },
}

/// Handle to the fire-and-forget booking notice.
///
/// Dropping the ticket leaves the task running. Awaiting [`Self::outcome`]
/// is only needed by callers that must not exit before delivery, such as a
/// short-lived CLI process.
#[derive(Debug)]
pub struct NotificationTicket {
    handle: JoinHandle<NotifyOutcome>,
}

impl NotificationTicket {
    pub async fn outcome(self) -> NotifyOutcome {
        self.handle.await.unwrap_or_else(|e| NotifyOutcome::Failed {
            reason: e.to_string(),
        })
    }
}

#[derive(Debug)]
pub struct Booked {
    pub state: ReservationState,
    pub notification: NotificationTicket,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CancelReceipt {
    pub reservation_id: i64,
    pub message: String,
}

/// A cancellation and the state it replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cancelled {
    pub previous: ReservationState,
    pub receipt: CancelReceipt,
}

/// Log store failures once, at the service boundary, then classify them.
fn classify(operation: &'static str, err: DatabaseError) -> BookingError {
    let err = BookingError::from(err);
    if let BookingError::Persistence(ref source) = err {
        tracing::error!(operation, error = %source, "persistence failure");
    }
    err
}

#[derive(Clone)]
pub struct BookingService {
    db: Arc<VenueDb>,
    notifier: Arc<dyn NotificationSink>,
}

impl BookingService {
    #[must_use]
    pub fn new(db: Arc<VenueDb>, notifier: Arc<dyn NotificationSink>) -> Self {
        Self { db, notifier }
    }

    #[must_use]
    pub fn db(&self) -> &VenueDb {
        &self.db
    }

    /// Create a reservation and schedule its notice.
    ///
    /// The owner defaults to the acting account when the request names none.
    ///
    /// # Errors
    ///
    /// `BookingError::Validation` before any write, or
    /// `BookingError::Persistence` if the store rejects the insert.
    pub async fn book(&self, request: &BookingRequest, actor: &Actor) -> Result<Booked, BookingError> {
        request.validate()?;
        let owner_id = request.owner_id.unwrap_or(actor.id);

        let state = self
            .db
            .create_reservation(owner_id, request)
            .await
            .map_err(|e| classify("book", e))?;

        let notification = self.spawn_notice(state.reservation.clone());
        Ok(Booked { state, notification })
    }

    fn spawn_notice(&self, reservation: Reservation) -> NotificationTicket {
        let db = Arc::clone(&self.db);
        let sink = Arc::clone(&self.notifier);
        let handle = tokio::spawn(async move {
            let owner = match db.get_account(reservation.owner_id).await {
                Ok(owner) => owner,
                Err(e) => {
                    tracing::warn!(
                        reservation_id = reservation.id,
                        owner_id = reservation.owner_id,
                        error = %e,
                        "booking notice skipped"
                    );
                    return NotifyOutcome::Skipped {
                        reason: e.to_string(),
                    };
                }
            };
            match sink.deliver(&reservation, &owner).await {
                Ok(()) => NotifyOutcome::Delivered,
                Err(e) => {
                    tracing::warn!(
                        reservation_id = reservation.id,
                        error = %e,
                        "booking notice failed"
                    );
                    NotifyOutcome::Failed {
                        reason: e.to_string(),
                    }
                }
            }
        });
        NotificationTicket { handle }
    }

    /// Current state of a reservation, for display or audit diffing.
    ///
    /// # Errors
    ///
    /// `BookingError::NotFound` if missing, or inactive while
    /// `include_inactive` is false.
    pub async fn state(&self, id: i64, include_inactive: bool) -> Result<ReservationState, BookingError> {
        self.db
            .get_state(id, include_inactive)
            .await
            .map_err(|e| classify("state", e))
    }

    /// Apply a patch to an active reservation.
    ///
    /// Both returned states come from the transaction that applied the patch.
    ///
    /// # Errors
    ///
    /// `BookingError::Validation` for a bad or empty patch,
    /// `BookingError::NotFound` for a missing or cancelled reservation.
    pub async fn amend(&self, id: i64, patch: &ReservationPatch) -> Result<Amended, BookingError> {
        patch.validate()?;
        if patch.is_empty() {
            return Err(BookingError::Validation("nothing to amend".into()));
        }
        self.db
            .update_reservation(id, patch)
            .await
            .map_err(|e| classify("amend", e))
    }

    /// Replace the service bundle of an active reservation.
    ///
    /// # Errors
    ///
    /// `BookingError::Validation` for bad lines, `BookingError::NotFound`
    /// for a missing or cancelled reservation.
    pub async fn replace_bundle(
        &self,
        id: i64,
        lines: &[BundleLineInput],
    ) -> Result<Amended, BookingError> {
        validate_bundle(lines)?;
        self.db
            .replace_bundle(id, lines)
            .await
            .map_err(|e| classify("replace_bundle", e))
    }

    /// Cancel a reservation. Cancelling twice succeeds.
    ///
    /// # Errors
    ///
    /// `BookingError::NotFound` if the id does not exist.
    pub async fn cancel(&self, id: i64) -> Result<Cancelled, BookingError> {
        let previous = self
            .db
            .soft_delete_reservation(id)
            .await
            .map_err(|e| classify("cancel", e))?;
        Ok(Cancelled {
            previous,
            receipt: CancelReceipt {
                reservation_id: id,
                message: format!("Reservation {id} cancelled"),
            },
        })
    }

    /// # Errors
    ///
    /// `BookingError::NotFound` if missing or hidden.
    pub async fn get(&self, id: i64, include_inactive: bool) -> Result<Reservation, BookingError> {
        self.db
            .get_reservation(id, include_inactive)
            .await
            .map_err(|e| classify("get", e))
    }

    /// # Errors
    ///
    /// `BookingError::Persistence` if the query fails.
    pub async fn bundle(&self, id: i64) -> Result<Vec<BundleLine>, BookingError> {
        self.db
            .get_bundle_lines(id)
            .await
            .map_err(|e| classify("bundle", e))
    }

    /// The acting account's own reservations.
    ///
    /// # Errors
    ///
    /// `BookingError::Persistence` if the query fails.
    pub async fn list_mine(&self, actor: &Actor, query: ListQuery) -> Result<Paged<Reservation>, BookingError> {
        self.db
            .list_reservations_for_owner(actor.id, query)
            .await
            .map_err(|e| classify("list_mine", e))
    }

    /// Every reservation matching `filter`. Role gating happens upstream.
    ///
    /// # Errors
    ///
    /// `BookingError::Persistence` if the query fails.
    pub async fn list_all(
        &self,
        filter: ReservationFilter,
        query: ListQuery,
    ) -> Result<Paged<Reservation>, BookingError> {
        self.db
            .list_reservations(filter, query)
            .await
            .map_err(|e| classify("list_all", e))
    }
}
