// SPDX-FileCopyrightText: 2026 Clinflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory appointment repository for deterministic testing.
//!
//! A single mutex over the whole map serializes every read-check-write
//! sequence, giving `compare_and_set_status` the same atomicity a store with
//! conditional writes provides. Hooks inject storage failures and
//! mid-flight status changes for isolation and race tests.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use clinflow_core::traits::AppointmentRepository;
use clinflow_core::types::{Appointment, AppointmentId, AppointmentStatus};
use clinflow_core::window::TimeWindow;
use clinflow_core::ClinflowError;

/// An in-memory appointment store.
pub struct InMemoryAppointmentRepository {
    appointments: Mutex<HashMap<AppointmentId, Appointment>>,
    fail_cas_for: Mutex<HashSet<AppointmentId>>,
    status_before_cas: Mutex<HashMap<AppointmentId, AppointmentStatus>>,
}

impl InMemoryAppointmentRepository {
    /// An empty store.
    pub fn new() -> Self {
        Self {
            appointments: Mutex::new(HashMap::new()),
            fail_cas_for: Mutex::new(HashSet::new()),
            status_before_cas: Mutex::new(HashMap::new()),
        }
    }

    /// Insert or replace a record.
    pub async fn insert(&self, appointment: Appointment) {
        self.appointments
            .lock()
            .await
            .insert(appointment.id.clone(), appointment);
    }

    /// Fetch a record by id.
    pub async fn get(&self, id: &AppointmentId) -> Option<Appointment> {
        self.appointments.lock().await.get(id).cloned()
    }

    /// The stored status of a record, if it exists.
    pub async fn status_of(&self, id: &AppointmentId) -> Option<AppointmentStatus> {
        self.appointments.lock().await.get(id).map(|a| a.status)
    }

    /// Overwrite a record's status unconditionally, the way external booking
    /// and clinical flows do.
    pub async fn set_status(&self, id: &AppointmentId, status: AppointmentStatus) {
        if let Some(appointment) = self.appointments.lock().await.get_mut(id) {
            appointment.status = status;
        }
    }

    /// Make the next `compare_and_set_status` for `id` fail with a storage
    /// error.
    pub async fn fail_compare_and_set_for(&self, id: &AppointmentId) {
        self.fail_cas_for.lock().await.insert(id.clone());
    }

    /// Apply `status` to the record just before the next
    /// `compare_and_set_status` for `id` evaluates its guard.
    ///
    /// Simulates a concurrent status change landing between a sweep's fetch
    /// and its guarded write. One-shot per call.
    pub async fn set_status_before_cas(&self, id: &AppointmentId, status: AppointmentStatus) {
        self.status_before_cas
            .lock()
            .await
            .insert(id.clone(), status);
    }
}

impl Default for InMemoryAppointmentRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AppointmentRepository for InMemoryAppointmentRepository {
    async fn find_by_window(
        &self,
        status: AppointmentStatus,
        window: TimeWindow,
    ) -> Result<Vec<Appointment>, ClinflowError> {
        let appointments = self.appointments.lock().await;
        let mut matches: Vec<Appointment> = appointments
            .values()
            .filter(|a| a.status == status && window.contains(a.scheduled_at))
            .cloned()
            .collect();
        matches.sort_by(|a, b| (a.scheduled_at, &a.id).cmp(&(b.scheduled_at, &b.id)));
        Ok(matches)
    }

    async fn find_past(
        &self,
        status: AppointmentStatus,
        before: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, ClinflowError> {
        let appointments = self.appointments.lock().await;
        let mut matches: Vec<Appointment> = appointments
            .values()
            .filter(|a| a.status == status && a.scheduled_at < before)
            .cloned()
            .collect();
        matches.sort_by(|a, b| (a.scheduled_at, &a.id).cmp(&(b.scheduled_at, &b.id)));
        Ok(matches)
    }

    async fn compare_and_set_status(
        &self,
        id: &AppointmentId,
        expected: AppointmentStatus,
        new: AppointmentStatus,
    ) -> Result<bool, ClinflowError> {
        if self.fail_cas_for.lock().await.remove(id) {
            return Err(ClinflowError::storage(std::io::Error::other(
                "injected conditional update failure",
            )));
        }

        let mut appointments = self.appointments.lock().await;
        let Some(appointment) = appointments.get_mut(id) else {
            return Ok(false);
        };
        if let Some(interposed) = self.status_before_cas.lock().await.remove(id) {
            appointment.status = interposed;
        }
        if appointment.status == expected {
            appointment.status = new;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use crate::appointment;

    use super::*;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 10, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[tokio::test]
    async fn window_query_filters_by_status_and_time() {
        let repo = InMemoryAppointmentRepository::new();
        let now = base();
        repo.insert(appointment("in", AppointmentStatus::Confirmed, now + Duration::hours(2)))
            .await;
        repo.insert(appointment(
            "late",
            AppointmentStatus::Confirmed,
            now + Duration::hours(30),
        ))
        .await;
        repo.insert(appointment(
            "done",
            AppointmentStatus::Completed,
            now + Duration::hours(2),
        ))
        .await;

        let window = TimeWindow::closed(now, now + Duration::hours(24));
        let found = repo
            .find_by_window(AppointmentStatus::Confirmed, window)
            .await
            .expect("query should succeed");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id.0, "in");
    }

    #[tokio::test]
    async fn past_query_is_strictly_before() {
        let repo = InMemoryAppointmentRepository::new();
        let now = base();
        repo.insert(appointment("past", AppointmentStatus::Confirmed, now - Duration::hours(1)))
            .await;
        repo.insert(appointment("at-now", AppointmentStatus::Confirmed, now))
            .await;

        let found = repo
            .find_past(AppointmentStatus::Confirmed, now)
            .await
            .expect("query should succeed");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id.0, "past");
    }

    #[tokio::test]
    async fn cas_applies_only_when_the_guard_holds() {
        let repo = InMemoryAppointmentRepository::new();
        let now = base();
        let id = AppointmentId("appt-1".into());
        repo.insert(appointment("appt-1", AppointmentStatus::Confirmed, now))
            .await;

        let applied = repo
            .compare_and_set_status(&id, AppointmentStatus::Confirmed, AppointmentStatus::Missed)
            .await
            .expect("cas should succeed");
        assert!(applied);
        assert_eq!(repo.status_of(&id).await, Some(AppointmentStatus::Missed));

        let applied_again = repo
            .compare_and_set_status(&id, AppointmentStatus::Confirmed, AppointmentStatus::Missed)
            .await
            .expect("cas should succeed");
        assert!(!applied_again, "guard no longer holds");
    }

    #[tokio::test]
    async fn cas_on_a_missing_record_is_false() {
        let repo = InMemoryAppointmentRepository::new();
        let applied = repo
            .compare_and_set_status(
                &AppointmentId("ghost".into()),
                AppointmentStatus::Confirmed,
                AppointmentStatus::Missed,
            )
            .await
            .expect("cas should succeed");
        assert!(!applied);
    }

    #[tokio::test]
    async fn injected_cas_failure_fires_once() {
        let repo = InMemoryAppointmentRepository::new();
        let now = base();
        let id = AppointmentId("appt-1".into());
        repo.insert(appointment("appt-1", AppointmentStatus::Confirmed, now))
            .await;
        repo.fail_compare_and_set_for(&id).await;

        let first = repo
            .compare_and_set_status(&id, AppointmentStatus::Confirmed, AppointmentStatus::Missed)
            .await;
        assert!(first.is_err());

        let second = repo
            .compare_and_set_status(&id, AppointmentStatus::Confirmed, AppointmentStatus::Missed)
            .await
            .expect("second attempt should reach the store");
        assert!(second);
    }

    #[tokio::test]
    async fn interposed_status_lands_before_the_guard() {
        let repo = InMemoryAppointmentRepository::new();
        let now = base();
        let id = AppointmentId("appt-1".into());
        repo.insert(appointment("appt-1", AppointmentStatus::Confirmed, now))
            .await;
        repo.set_status_before_cas(&id, AppointmentStatus::Cancelled)
            .await;

        let applied = repo
            .compare_and_set_status(&id, AppointmentStatus::Confirmed, AppointmentStatus::Missed)
            .await
            .expect("cas should succeed");
        assert!(!applied, "concurrent cancellation wins");
        assert_eq!(repo.status_of(&id).await, Some(AppointmentStatus::Cancelled));
    }
}
