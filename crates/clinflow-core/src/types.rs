// SPDX-FileCopyrightText: 2026 Clinflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common domain types used across the clinflow workspace.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// Unique identifier for an appointment record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AppointmentId(pub String);

impl fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque reference to a patient. Ownership of patient records is external.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatientId(pub String);

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque reference to a care provider. Ownership of provider records is external.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderId(pub String);

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier for a notification record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationId(pub String);

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Appointment lifecycle status.
///
/// The engine owns exactly one transition: `Confirmed -> Missed`, applied by
/// the sweeper when the scheduled time has elapsed. All other transitions
/// belong to external booking and clinical flows, and no record ever leaves
/// a terminal state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
    Missed,
}

impl AppointmentStatus {
    /// Terminal states admit no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Missed)
    }
}

/// Category of a dispatched notification.
///
/// The broader notification subsystem carries more kinds; these are the two
/// the engine creates.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    AppointmentReminder,
    ReviewPrompt,
}

/// An appointment record as returned by the appointment store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub patient_id: PatientId,
    pub provider_id: ProviderId,
    /// Display name of the provider, denormalized by the store so reminder
    /// messages can be rendered without a second lookup.
    pub provider_name: String,
    pub scheduled_at: DateTime<Utc>,
    pub status: AppointmentStatus,
    /// Clinical fields are read-only to the engine.
    pub diagnosis: Option<String>,
    pub notes: Option<String>,
}

/// A notification record.
///
/// `(related_entity_id, kind)` is the deduplication key: at most one
/// notification exists per pair, which is what makes repeated or overlapping
/// batch runs safe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub recipient_id: PatientId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    /// The appointment that triggered this notification.
    pub related_entity_id: AppointmentId,
    /// Mutated only by external read-receipt flows, never by the engine.
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Construct an unread notification with a fresh id.
    ///
    /// `created_at` comes from the caller's injected clock rather than the
    /// system time so batch runs stay deterministic under test.
    pub fn new(
        recipient_id: PatientId,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        related_entity_id: AppointmentId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: NotificationId(Uuid::new_v4().to_string()),
            recipient_id,
            kind,
            title: title.into(),
            message: message.into(),
            related_entity_id,
            is_read: false,
            created_at,
        }
    }
}

/// Outcome of processing one batch candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A side effect was performed: a notification was created or a status
    /// transition applied.
    Applied,
    /// The desired end state already held; nothing was done. Counted as a
    /// success, not a failure.
    AlreadySatisfied,
}

/// A single failure recorded by the batch runner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchFailure {
    /// The candidate that failed, or `None` when the candidate query itself
    /// failed before any candidate was attempted.
    pub candidate_id: Option<AppointmentId>,
    pub error: String,
}

/// Aggregated result of one batch run. The only structured value crossing
/// the boundary back to the trigger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchResult {
    pub attempted: usize,
    pub succeeded: usize,
    pub failures: Vec<BatchFailure>,
}

impl BatchResult {
    /// True when every attempted candidate succeeded.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(AppointmentStatus::Completed.is_terminal());
        assert!(AppointmentStatus::Cancelled.is_terminal());
        assert!(AppointmentStatus::Missed.is_terminal());
        assert!(!AppointmentStatus::Pending.is_terminal());
        assert!(!AppointmentStatus::Confirmed.is_terminal());
    }

    #[test]
    fn status_round_trips_through_display_and_from_str() {
        use std::str::FromStr;

        let variants = [
            AppointmentStatus::Pending,
            AppointmentStatus::Confirmed,
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
            AppointmentStatus::Missed,
        ];
        for variant in variants {
            let s = variant.to_string();
            let parsed = AppointmentStatus::from_str(&s).expect("should parse back");
            assert_eq!(variant, parsed);
        }
        assert_eq!(AppointmentStatus::Confirmed.to_string(), "confirmed");
    }

    #[test]
    fn kind_round_trips_through_display_and_from_str() {
        use std::str::FromStr;

        for kind in [
            NotificationKind::AppointmentReminder,
            NotificationKind::ReviewPrompt,
        ] {
            let parsed = NotificationKind::from_str(&kind.to_string()).expect("should parse back");
            assert_eq!(kind, parsed);
        }
        assert_eq!(
            NotificationKind::AppointmentReminder.to_string(),
            "appointment_reminder"
        );
    }

    #[test]
    fn status_serde_uses_snake_case() {
        let json = serde_json::to_string(&AppointmentStatus::Confirmed).expect("should serialize");
        assert_eq!(json, "\"confirmed\"");
        let parsed: AppointmentStatus =
            serde_json::from_str("\"missed\"").expect("should deserialize");
        assert_eq!(parsed, AppointmentStatus::Missed);
    }

    #[test]
    fn new_notification_is_unread_with_fresh_id() {
        let created_at = Utc::now();
        let a = Notification::new(
            PatientId("patient-1".into()),
            NotificationKind::AppointmentReminder,
            "Appointment reminder",
            "See Dr. Osei at 09:30.",
            AppointmentId("appt-1".into()),
            created_at,
        );
        let b = Notification::new(
            PatientId("patient-1".into()),
            NotificationKind::AppointmentReminder,
            "Appointment reminder",
            "See Dr. Osei at 09:30.",
            AppointmentId("appt-1".into()),
            created_at,
        );
        assert!(!a.is_read);
        assert_eq!(a.created_at, created_at);
        assert_ne!(a.id, b.id, "each construction gets its own id");
    }

    #[test]
    fn batch_result_is_clean_only_without_failures() {
        let mut result = BatchResult {
            attempted: 2,
            succeeded: 2,
            failures: Vec::new(),
        };
        assert!(result.is_clean());

        result.failures.push(BatchFailure {
            candidate_id: Some(AppointmentId("appt-2".into())),
            error: "storage error: timeout".into(),
        });
        assert!(!result.is_clean());
    }
}
