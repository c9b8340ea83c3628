// SPDX-FileCopyrightText: 2026 Clinflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the clinflow appointment engine.

use thiserror::Error;

use crate::types::{AppointmentId, NotificationKind};

/// The primary error type used across the clinflow repository traits and
/// engine operations.
#[derive(Debug, Error)]
pub enum ClinflowError {
    /// Configuration errors (invalid values, out-of-range offsets).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The store already holds a notification for this `(appointment, kind)`
    /// pair. Losing a creation race this way is expected under overlapping
    /// batch runs; dispatchers treat it as a no-op.
    #[error("notification already exists for appointment {appointment_id} ({kind})")]
    Conflict {
        appointment_id: AppointmentId,
        kind: NotificationKind,
    },

    /// A candidate returned by a repository query violated the query contract
    /// (e.g. a record with the wrong status).
    #[error("contract violation for appointment {appointment_id}: {details}")]
    Contract {
        appointment_id: AppointmentId,
        details: String,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ClinflowError {
    /// Wrap an arbitrary error source as a storage error.
    pub fn storage<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage {
            source: Box::new(source),
        }
    }
}
