// SPDX-FileCopyrightText: 2026 Clinflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Repository trait implementations backed by SQLite.
//!
//! Thin adapters from the `clinflow-core` ports onto the typed query
//! modules. Both repositories share one [`Database`], so every write funnels
//! through the same single-writer thread.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use clinflow_core::traits::{AppointmentRepository, NotificationRepository};
use clinflow_core::types::{
    Appointment, AppointmentId, AppointmentStatus, Notification, NotificationKind,
};
use clinflow_core::window::TimeWindow;
use clinflow_core::ClinflowError;

use crate::database::Database;
use crate::queries;

/// SQLite-backed appointment repository.
pub struct SqliteAppointmentRepository {
    db: Arc<Database>,
}

impl SqliteAppointmentRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AppointmentRepository for SqliteAppointmentRepository {
    async fn find_by_window(
        &self,
        status: AppointmentStatus,
        window: TimeWindow,
    ) -> Result<Vec<Appointment>, ClinflowError> {
        queries::appointments::find_by_window(&self.db, status, window).await
    }

    async fn find_past(
        &self,
        status: AppointmentStatus,
        before: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, ClinflowError> {
        queries::appointments::find_past(&self.db, status, before).await
    }

    async fn compare_and_set_status(
        &self,
        id: &AppointmentId,
        expected: AppointmentStatus,
        new: AppointmentStatus,
    ) -> Result<bool, ClinflowError> {
        queries::appointments::compare_and_set_status(&self.db, id, expected, new).await
    }
}

/// SQLite-backed notification repository.
pub struct SqliteNotificationRepository {
    db: Arc<Database>,
}

impl SqliteNotificationRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NotificationRepository for SqliteNotificationRepository {
    async fn exists_for(
        &self,
        appointment_id: &AppointmentId,
        kind: NotificationKind,
    ) -> Result<bool, ClinflowError> {
        queries::notifications::exists_for(&self.db, appointment_id, kind).await
    }

    async fn create(&self, notification: Notification) -> Result<Notification, ClinflowError> {
        queries::notifications::create(&self.db, notification).await
    }
}
