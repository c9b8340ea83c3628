// SPDX-FileCopyrightText: 2026 Clinflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Appointment store port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::ClinflowError;
use crate::types::{Appointment, AppointmentId, AppointmentStatus};
use crate::window::TimeWindow;

/// Read and transition access to the appointment store.
///
/// The engine reads candidates by status and time filter and performs
/// exactly one kind of write: a status-guarded transition. Everything else
/// about appointment records is owned by external booking and clinical flows.
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Appointments with the given status whose `scheduled_at` falls inside
    /// `window`. Boundary semantics come from the window's end bound.
    async fn find_by_window(
        &self,
        status: AppointmentStatus,
        window: TimeWindow,
    ) -> Result<Vec<Appointment>, ClinflowError>;

    /// Appointments with the given status scheduled strictly before `before`.
    async fn find_past(
        &self,
        status: AppointmentStatus,
        before: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, ClinflowError>;

    /// Set the status to `new` only if the stored status still equals
    /// `expected`. The check and the write must be atomic with respect to
    /// concurrent callers.
    ///
    /// Returns `true` when a record transitioned. `false` means the record
    /// concurrently left `expected` (or does not exist) and must be left
    /// alone.
    async fn compare_and_set_status(
        &self,
        id: &AppointmentId,
        expected: AppointmentStatus,
        new: AppointmentStatus,
    ) -> Result<bool, ClinflowError>;
}
