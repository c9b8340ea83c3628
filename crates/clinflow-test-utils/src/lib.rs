// SPDX-FileCopyrightText: 2026 Clinflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for clinflow integration tests.
//!
//! Provides in-memory repositories, a deterministic clock, and a test
//! harness so dispatch behavior can be verified without a database.
//!
//! # Components
//!
//! - [`InMemoryAppointmentRepository`] - appointment store double with
//!   status-change and failure injection for race and isolation tests
//! - [`InMemoryNotificationRepository`] - notification store double with
//!   capture helpers and per-appointment failure injection
//! - [`FixedClock`] - clock pinned to a test-controlled instant
//! - [`TestHarness`] - builder wiring an engine over the doubles

pub mod clock;
pub mod harness;
pub mod mock_appointments;
pub mod mock_notifications;

use chrono::{DateTime, Utc};

use clinflow_core::types::{Appointment, AppointmentId, AppointmentStatus, PatientId, ProviderId};

pub use clock::FixedClock;
pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_appointments::InMemoryAppointmentRepository;
pub use mock_notifications::InMemoryNotificationRepository;

/// Build an appointment record for tests.
///
/// Patient id derives from the appointment id; the provider is fixed so
/// message assertions can rely on the display name.
pub fn appointment(id: &str, status: AppointmentStatus, scheduled_at: DateTime<Utc>) -> Appointment {
    Appointment {
        id: AppointmentId(id.into()),
        patient_id: PatientId(format!("patient-{id}")),
        provider_id: ProviderId("provider-1".into()),
        provider_name: "Dr. Osei".into(),
        scheduled_at,
        status,
        diagnosis: None,
        notes: None,
    }
}
