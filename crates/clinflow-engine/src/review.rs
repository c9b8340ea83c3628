// SPDX-FileCopyrightText: 2026 Clinflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Review prompts: one follow-up per appointment completed on the previous
//! clinic-local calendar day.

use chrono::{DateTime, Duration, FixedOffset, NaiveTime, Utc};
use tracing::info;

use clinflow_core::types::{
    Appointment, AppointmentStatus, BatchResult, DispatchOutcome, Notification, NotificationKind,
};
use clinflow_core::window::TimeWindow;
use clinflow_core::ClinflowError;

use crate::batch::{query_failure, run_batch};
use crate::LifecycleEngine;

const REVIEW_TITLE: &str = "How was your visit?";

impl LifecycleEngine {
    /// Ensure every appointment completed during the previous clinic-local
    /// calendar day has exactly one review-prompt notification.
    ///
    /// The window is `[yesterday 00:00, today 00:00)`, half-open, so a
    /// record can never match two consecutive daily runs. Bounding the
    /// window to one day keeps the per-run cost independent of historical
    /// appointment volume and self-limits re-prompting to once.
    pub async fn dispatch_review_prompts(&self) -> BatchResult {
        let window = previous_clinic_day(self.clock.now(), self.clinic_offset);
        let candidates = match self
            .appointments
            .find_by_window(AppointmentStatus::Completed, window)
            .await
        {
            Ok(candidates) => candidates,
            Err(e) => return query_failure("review-prompts", &e),
        };
        run_batch(
            "review-prompts",
            candidates,
            self.config.max_concurrency,
            |appointment| self.process_review_prompt(appointment),
        )
        .await
    }

    async fn process_review_prompt(
        &self,
        appointment: Appointment,
    ) -> Result<DispatchOutcome, ClinflowError> {
        if appointment.status != AppointmentStatus::Completed {
            return Err(ClinflowError::Contract {
                appointment_id: appointment.id.clone(),
                details: format!(
                    "review candidate must be completed, store returned {}",
                    appointment.status
                ),
            });
        }

        if self
            .notifications
            .exists_for(&appointment.id, NotificationKind::ReviewPrompt)
            .await?
        {
            return Ok(DispatchOutcome::AlreadySatisfied);
        }

        let notification = Notification::new(
            appointment.patient_id.clone(),
            NotificationKind::ReviewPrompt,
            REVIEW_TITLE,
            review_message(&appointment),
            appointment.id.clone(),
            self.clock.now(),
        );
        match self.notifications.create(notification).await {
            Ok(_) => {
                info!(
                    appointment_id = %appointment.id,
                    patient_id = %appointment.patient_id,
                    "review prompt created"
                );
                Ok(DispatchOutcome::Applied)
            }
            // An overlapping run created it between our check and our write.
            Err(ClinflowError::Conflict { .. }) => Ok(DispatchOutcome::AlreadySatisfied),
            Err(e) => Err(e),
        }
    }
}

/// The previous full clinic-local calendar day, converted back to UTC.
fn previous_clinic_day(now: DateTime<Utc>, clinic_offset: FixedOffset) -> TimeWindow {
    let local_midnight = now
        .with_timezone(&clinic_offset)
        .date_naive()
        .and_time(NaiveTime::MIN);
    // Local wall-clock midnight minus the offset is the same instant in UTC.
    let today_start = DateTime::<Utc>::from_naive_utc_and_offset(
        local_midnight - clinic_offset,
        Utc,
    );
    TimeWindow::half_open(today_start - Duration::days(1), today_start)
}

fn review_message(appointment: &Appointment) -> String {
    format!(
        "How was your visit with {}? Tap to leave a short review.",
        appointment.provider_name
    )
}
