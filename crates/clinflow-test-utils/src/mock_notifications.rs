// SPDX-FileCopyrightText: 2026 Clinflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory notification repository for deterministic testing.
//!
//! `create` enforces the `(related_entity_id, kind)` dedup invariant the
//! same way the SQLite schema's unique index does, so engine tests exercise
//! the conflict path without a database.

use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::Mutex;

use clinflow_core::traits::NotificationRepository;
use clinflow_core::types::{AppointmentId, Notification, NotificationKind, PatientId};
use clinflow_core::ClinflowError;

/// An in-memory notification store.
pub struct InMemoryNotificationRepository {
    notifications: Mutex<Vec<Notification>>,
    fail_create_for: Mutex<HashSet<AppointmentId>>,
}

impl InMemoryNotificationRepository {
    /// An empty store.
    pub fn new() -> Self {
        Self {
            notifications: Mutex::new(Vec::new()),
            fail_create_for: Mutex::new(HashSet::new()),
        }
    }

    /// All stored notifications, in creation order.
    pub async fn all(&self) -> Vec<Notification> {
        self.notifications.lock().await.clone()
    }

    /// Number of stored notifications.
    pub async fn count(&self) -> usize {
        self.notifications.lock().await.len()
    }

    /// Number of notifications for one `(appointment, kind)` pair.
    pub async fn count_for(&self, appointment_id: &AppointmentId, kind: NotificationKind) -> usize {
        self.notifications
            .lock()
            .await
            .iter()
            .filter(|n| n.related_entity_id == *appointment_id && n.kind == kind)
            .count()
    }

    /// Notifications addressed to one recipient.
    pub async fn for_recipient(&self, recipient_id: &PatientId) -> Vec<Notification> {
        self.notifications
            .lock()
            .await
            .iter()
            .filter(|n| n.recipient_id == *recipient_id)
            .cloned()
            .collect()
    }

    /// Make the next `create` whose `related_entity_id` is `id` fail with a
    /// storage error.
    pub async fn fail_create_for(&self, id: &AppointmentId) {
        self.fail_create_for.lock().await.insert(id.clone());
    }
}

impl Default for InMemoryNotificationRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn exists_for(
        &self,
        appointment_id: &AppointmentId,
        kind: NotificationKind,
    ) -> Result<bool, ClinflowError> {
        Ok(self
            .notifications
            .lock()
            .await
            .iter()
            .any(|n| n.related_entity_id == *appointment_id && n.kind == kind))
    }

    async fn create(&self, notification: Notification) -> Result<Notification, ClinflowError> {
        if self
            .fail_create_for
            .lock()
            .await
            .remove(&notification.related_entity_id)
        {
            return Err(ClinflowError::storage(std::io::Error::other(
                "injected notification write failure",
            )));
        }

        let mut notifications = self.notifications.lock().await;
        let duplicate = notifications.iter().any(|n| {
            n.related_entity_id == notification.related_entity_id && n.kind == notification.kind
        });
        if duplicate {
            return Err(ClinflowError::Conflict {
                appointment_id: notification.related_entity_id.clone(),
                kind: notification.kind,
            });
        }
        notifications.push(notification.clone());
        Ok(notification)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn reminder(appointment: &str) -> Notification {
        Notification::new(
            PatientId(format!("patient-{appointment}")),
            NotificationKind::AppointmentReminder,
            "Appointment reminder",
            "Your appointment with Dr. Osei is scheduled for 09:30.",
            AppointmentId(appointment.into()),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn create_then_exists() {
        let repo = InMemoryNotificationRepository::new();
        let id = AppointmentId("appt-1".into());

        assert!(!repo
            .exists_for(&id, NotificationKind::AppointmentReminder)
            .await
            .expect("query should succeed"));

        repo.create(reminder("appt-1")).await.expect("create should succeed");

        assert!(repo
            .exists_for(&id, NotificationKind::AppointmentReminder)
            .await
            .expect("query should succeed"));
        assert!(!repo
            .exists_for(&id, NotificationKind::ReviewPrompt)
            .await
            .expect("query should succeed"));
    }

    #[tokio::test]
    async fn duplicate_create_is_a_conflict() {
        let repo = InMemoryNotificationRepository::new();
        repo.create(reminder("appt-1")).await.expect("create should succeed");

        let err = repo
            .create(reminder("appt-1"))
            .await
            .expect_err("duplicate should be rejected");
        assert!(matches!(err, ClinflowError::Conflict { .. }));
        assert_eq!(repo.count().await, 1);
    }

    #[tokio::test]
    async fn injected_create_failure_fires_once() {
        let repo = InMemoryNotificationRepository::new();
        let id = AppointmentId("appt-1".into());
        repo.fail_create_for(&id).await;

        assert!(repo.create(reminder("appt-1")).await.is_err());
        assert!(repo.create(reminder("appt-1")).await.is_ok());
        assert_eq!(repo.count_for(&id, NotificationKind::AppointmentReminder).await, 1);
    }

    #[tokio::test]
    async fn recipient_filter_returns_only_their_notifications() {
        let repo = InMemoryNotificationRepository::new();
        repo.create(reminder("appt-1")).await.expect("create should succeed");
        repo.create(reminder("appt-2")).await.expect("create should succeed");

        let for_one = repo.for_recipient(&PatientId("patient-appt-1".into())).await;
        assert_eq!(for_one.len(), 1);
        assert_eq!(for_one[0].related_entity_id.0, "appt-1");
    }
}
