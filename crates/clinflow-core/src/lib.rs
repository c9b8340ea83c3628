// SPDX-FileCopyrightText: 2026 Clinflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the clinflow appointment engine.
//!
//! This crate provides the domain types, error type, and port traits shared
//! across the clinflow workspace. The dispatch engine in `clinflow-engine`
//! consumes the ports; `clinflow-storage` and `clinflow-test-utils` provide
//! the SQLite and in-memory implementations.

pub mod error;
pub mod traits;
pub mod types;
pub mod window;

// Re-export key items at crate root for ergonomic imports.
pub use error::ClinflowError;
pub use types::{
    Appointment, AppointmentId, AppointmentStatus, BatchFailure, BatchResult, DispatchOutcome,
    Notification, NotificationId, NotificationKind, PatientId, ProviderId,
};
pub use window::{EndBound, TimeWindow};

// Re-export all ports at crate root.
pub use traits::{AppointmentRepository, Clock, NotificationRepository, SystemClock};
