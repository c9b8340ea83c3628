// SPDX-FileCopyrightText: 2026 Clinflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification store port.

use async_trait::async_trait;

use crate::error::ClinflowError;
use crate::types::{AppointmentId, Notification, NotificationKind};

/// Create and existence-check access to the notification store.
///
/// The engine is the only writer for the two kinds it dispatches; read
/// receipts and every other notification concern belong to the broader
/// notification subsystem.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Whether a notification already exists for `(appointment_id, kind)`.
    async fn exists_for(
        &self,
        appointment_id: &AppointmentId,
        kind: NotificationKind,
    ) -> Result<bool, ClinflowError>;

    /// Persist a fully-constructed notification and return the stored record.
    async fn create(&self, notification: Notification) -> Result<Notification, ClinflowError>;
}
