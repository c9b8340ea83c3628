// SPDX-FileCopyrightText: 2026 Clinflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reminder dispatch: one reminder per confirmed appointment inside the
//! lookahead window.

use chrono::{Duration, FixedOffset};
use tracing::info;

use clinflow_core::types::{
    Appointment, AppointmentStatus, BatchResult, DispatchOutcome, Notification, NotificationKind,
};
use clinflow_core::window::TimeWindow;
use clinflow_core::ClinflowError;

use crate::batch::{query_failure, run_batch};
use crate::LifecycleEngine;

const REMINDER_TITLE: &str = "Appointment reminder";

impl LifecycleEngine {
    /// Ensure every confirmed appointment scheduled within the lookahead
    /// window has exactly one reminder notification.
    ///
    /// The window is `[now, now + lookahead]` with both ends included,
    /// re-derived from the clock on every call. A candidate whose reminder
    /// already exists is a success-no-op, which is what makes repeated or
    /// overlapping invocations idempotent.
    pub async fn dispatch_reminders(&self) -> BatchResult {
        let now = self.clock.now();
        let window = TimeWindow::closed(
            now,
            now + Duration::hours(self.config.reminder_lookahead_hours),
        );
        let candidates = match self
            .appointments
            .find_by_window(AppointmentStatus::Confirmed, window)
            .await
        {
            Ok(candidates) => candidates,
            Err(e) => return query_failure("reminders", &e),
        };
        run_batch(
            "reminders",
            candidates,
            self.config.max_concurrency,
            |appointment| self.process_reminder(appointment),
        )
        .await
    }

    async fn process_reminder(
        &self,
        appointment: Appointment,
    ) -> Result<DispatchOutcome, ClinflowError> {
        if appointment.status != AppointmentStatus::Confirmed {
            return Err(ClinflowError::Contract {
                appointment_id: appointment.id.clone(),
                details: format!(
                    "reminder candidate must be confirmed, store returned {}",
                    appointment.status
                ),
            });
        }

        if self
            .notifications
            .exists_for(&appointment.id, NotificationKind::AppointmentReminder)
            .await?
        {
            return Ok(DispatchOutcome::AlreadySatisfied);
        }

        let notification = Notification::new(
            appointment.patient_id.clone(),
            NotificationKind::AppointmentReminder,
            REMINDER_TITLE,
            reminder_message(&appointment, self.clinic_offset),
            appointment.id.clone(),
            self.clock.now(),
        );
        match self.notifications.create(notification).await {
            Ok(_) => {
                info!(
                    appointment_id = %appointment.id,
                    patient_id = %appointment.patient_id,
                    "reminder notification created"
                );
                Ok(DispatchOutcome::Applied)
            }
            // An overlapping run created it between our check and our write.
            Err(ClinflowError::Conflict { .. }) => Ok(DispatchOutcome::AlreadySatisfied),
            Err(e) => Err(e),
        }
    }
}

/// Message body for a reminder: the provider's display name plus the
/// clinic-local time of day of the visit.
fn reminder_message(appointment: &Appointment, clinic_offset: FixedOffset) -> String {
    let local = appointment.scheduled_at.with_timezone(&clinic_offset);
    format!(
        "Your appointment with {} is scheduled for {}.",
        appointment.provider_name,
        local.format("%H:%M")
    )
}
