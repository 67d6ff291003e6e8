//! The booking desk: mutation plus exactly one audit entry.
//!
//! Every mutating call runs the service operation first. Only when it
//! succeeds does the desk hand the before/after snapshots to the recorder.
//! The audit outcome travels back next to the value; it never turns a
//! successful mutation into an error.

use vb_core::entities::BundleLine;
use vb_core::enums::{AuditAction, EntityType};
use vb_core::identity::{Actor, RequestOrigin};
use vb_core::requests::{BookingRequest, BundleLineInput};

use crate::error::BookingError;
use crate::recorder::{AuditOutcome, AuditRecorder, AuditRequest};
use crate::service::{Amended, Booked, BookingService, CancelReceipt};
use crate::updates::reservation::ReservationPatch;

/// Who is calling, and from where. Supplied by the upstream identity gate.
#[derive(Debug, Clone)]
pub struct CallContext {
    pub actor: Actor,
    pub origin: RequestOrigin,
}

/// A mutation result together with what happened to its audit entry.
#[derive(Debug)]
pub struct Audited<T> {
    pub value: T,
    pub audit: AuditOutcome,
}

#[derive(Clone)]
pub struct BookingDesk {
    service: BookingService,
    recorder: AuditRecorder,
}

impl BookingDesk {
    #[must_use]
    pub const fn new(service: BookingService, recorder: AuditRecorder) -> Self {
        Self { service, recorder }
    }

    /// Read access for non-mutating calls.
    #[must_use]
    pub const fn service(&self) -> &BookingService {
        &self.service
    }

    async fn record(
        &self,
        ctx: &CallContext,
        entity_id: i64,
        action: AuditAction,
        before: Option<serde_json::Value>,
        after: Option<serde_json::Value>,
    ) -> AuditOutcome {
        self.recorder
            .log(AuditRequest {
                entity: EntityType::Reservations,
                entity_id,
                action,
                actor: Some(ctx.actor.clone()),
                before,
                after,
                origin: ctx.origin.clone(),
            })
            .await
    }

    /// # Errors
    ///
    /// See [`BookingService::book`].
    pub async fn book(
        &self,
        request: &BookingRequest,
        ctx: &CallContext,
    ) -> Result<Audited<Booked>, BookingError> {
        let booked = self.service.book(request, &ctx.actor).await?;
        let audit = self
            .record(
                ctx,
                booked.state.reservation.id,
                AuditAction::Create,
                None,
                Some(booked.state.snapshot()),
            )
            .await;
        Ok(Audited {
            value: booked,
            audit,
        })
    }

    /// # Errors
    ///
    /// See [`BookingService::amend`].
    pub async fn amend(
        &self,
        id: i64,
        patch: &ReservationPatch,
        ctx: &CallContext,
    ) -> Result<Audited<Amended>, BookingError> {
        let amended = self.service.amend(id, patch).await?;
        let audit = self
            .record(
                ctx,
                id,
                AuditAction::Update,
                Some(amended.previous.snapshot()),
                Some(amended.current.snapshot()),
            )
            .await;
        Ok(Audited {
            value: amended,
            audit,
        })
    }

    /// # Errors
    ///
    /// See [`BookingService::replace_bundle`].
    pub async fn replace_bundle(
        &self,
        id: i64,
        lines: &[BundleLineInput],
        ctx: &CallContext,
    ) -> Result<Audited<Vec<BundleLine>>, BookingError> {
        let replaced = self.service.replace_bundle(id, lines).await?;
        let audit = self
            .record(
                ctx,
                id,
                AuditAction::Update,
                Some(replaced.previous.snapshot()),
                Some(replaced.current.snapshot()),
            )
            .await;
        Ok(Audited {
            value: replaced.current.lines,
            audit,
        })
    }

    /// # Errors
    ///
    /// See [`BookingService::cancel`].
    pub async fn cancel(
        &self,
        id: i64,
        ctx: &CallContext,
    ) -> Result<Audited<CancelReceipt>, BookingError> {
        let cancelled = self.service.cancel(id).await?;
        let audit = self
            .record(
                ctx,
                id,
                AuditAction::Delete,
                Some(cancelled.previous.snapshot()),
                None,
            )
            .await;
        Ok(Audited {
            value: cancelled.receipt,
            audit,
        })
    }
}
