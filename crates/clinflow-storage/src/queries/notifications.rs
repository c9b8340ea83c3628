// SPDX-FileCopyrightText: 2026 Clinflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification queries: dedup existence checks and guarded creation.

use rusqlite::params;

use clinflow_core::types::{
    AppointmentId, Notification, NotificationId, NotificationKind, PatientId,
};
use clinflow_core::ClinflowError;

use super::{parse_sql_ts, to_sql_ts};
use crate::database::{map_tr_err, Database};

const SELECT_COLUMNS: &str =
    "id, recipient_id, kind, title, message, related_entity_id, is_read, created_at";

fn row_to_notification(row: &rusqlite::Row<'_>) -> Result<Notification, rusqlite::Error> {
    let kind: String = row.get(2)?;
    let created_at: String = row.get(7)?;
    Ok(Notification {
        id: NotificationId(row.get(0)?),
        recipient_id: PatientId(row.get(1)?),
        kind: kind.parse().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
        })?,
        title: row.get(3)?,
        message: row.get(4)?,
        related_entity_id: AppointmentId(row.get(5)?),
        is_read: row.get(6)?,
        created_at: parse_sql_ts(7, created_at)?,
    })
}

/// Whether a notification already exists for `(appointment_id, kind)`.
pub async fn exists_for(
    db: &Database,
    appointment_id: &AppointmentId,
    kind: NotificationKind,
) -> Result<bool, ClinflowError> {
    let related = appointment_id.0.clone();
    let kind = kind.to_string();
    db.connection()
        .call(move |conn| {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(
                     SELECT 1 FROM notifications
                     WHERE related_entity_id = ?1 AND kind = ?2
                 )",
                params![related, kind],
                |row| row.get(0),
            )?;
            Ok(exists)
        })
        .await
        .map_err(map_tr_err)
}

/// Persist a notification.
///
/// A hit on the `(related_entity_id, kind)` unique index surfaces as
/// [`ClinflowError::Conflict`]: the caller lost a creation race to an
/// overlapping run and the desired end state already holds.
pub async fn create(db: &Database, notification: Notification) -> Result<Notification, ClinflowError> {
    let n = notification.clone();
    let result = db
        .connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO notifications
                     (id, recipient_id, kind, title, message, related_entity_id, is_read, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    n.id.0,
                    n.recipient_id.0,
                    n.kind.to_string(),
                    n.title,
                    n.message,
                    n.related_entity_id.0,
                    n.is_read,
                    to_sql_ts(n.created_at)
                ],
            )?;
            Ok(())
        })
        .await;
    match result {
        Ok(()) => Ok(notification),
        Err(tokio_rusqlite::Error::Error(rusqlite::Error::SqliteFailure(e, _)))
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            Err(ClinflowError::Conflict {
                appointment_id: notification.related_entity_id,
                kind: notification.kind,
            })
        }
        Err(e) => Err(map_tr_err(e)),
    }
}

/// Notifications addressed to one recipient, newest first.
pub async fn list_for_recipient(
    db: &Database,
    recipient_id: &PatientId,
) -> Result<Vec<Notification>, ClinflowError> {
    let recipient = recipient_id.0.clone();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM notifications
                 WHERE recipient_id = ?1
                 ORDER BY created_at DESC, id ASC"
            ))?;
            let rows = stmt.query_map(params![recipient], row_to_notification)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
        .await
        .map_err(map_tr_err)
}
