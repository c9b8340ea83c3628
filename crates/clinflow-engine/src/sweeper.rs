// SPDX-FileCopyrightText: 2026 Clinflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Missed-appointment sweep: confirmed appointments whose scheduled time has
//! elapsed transition to missed.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use clinflow_core::types::{Appointment, AppointmentStatus, BatchResult, DispatchOutcome};
use clinflow_core::ClinflowError;

use crate::batch::{query_failure, run_batch};
use crate::LifecycleEngine;

impl LifecycleEngine {
    /// Transition every confirmed appointment scheduled strictly before
    /// "now" to missed.
    ///
    /// The write is status-guarded: if a record left `Confirmed` between
    /// fetch and write (concurrent cancellation or completion), the update
    /// applies to nothing and the candidate is a success-no-op. The sweep
    /// never overwrites a status that has already moved on, and it creates
    /// no notifications.
    pub async fn sweep_missed_appointments(&self) -> BatchResult {
        let now = self.clock.now();
        let candidates = match self
            .appointments
            .find_past(AppointmentStatus::Confirmed, now)
            .await
        {
            Ok(candidates) => candidates,
            Err(e) => return query_failure("missed-sweep", &e),
        };
        run_batch(
            "missed-sweep",
            candidates,
            self.config.max_concurrency,
            |appointment| self.process_missed(now, appointment),
        )
        .await
    }

    async fn process_missed(
        &self,
        now: DateTime<Utc>,
        appointment: Appointment,
    ) -> Result<DispatchOutcome, ClinflowError> {
        if appointment.status != AppointmentStatus::Confirmed {
            return Err(ClinflowError::Contract {
                appointment_id: appointment.id.clone(),
                details: format!(
                    "sweep candidate must be confirmed, store returned {}",
                    appointment.status
                ),
            });
        }
        if appointment.scheduled_at >= now {
            return Err(ClinflowError::Contract {
                appointment_id: appointment.id.clone(),
                details: format!(
                    "sweep candidate scheduled at {} is not in the past at {}",
                    appointment.scheduled_at, now
                ),
            });
        }

        let transitioned = self
            .appointments
            .compare_and_set_status(
                &appointment.id,
                AppointmentStatus::Confirmed,
                AppointmentStatus::Missed,
            )
            .await?;
        if transitioned {
            info!(appointment_id = %appointment.id, "appointment marked missed");
            Ok(DispatchOutcome::Applied)
        } else {
            debug!(
                appointment_id = %appointment.id,
                "status changed concurrently, leaving record untouched"
            );
            Ok(DispatchOutcome::AlreadySatisfied)
        }
    }
}
