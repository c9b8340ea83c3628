// SPDX-FileCopyrightText: 2026 Clinflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Appointment queries: window scans, past scans, and the status-guarded
//! transition.

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

use clinflow_core::types::{Appointment, AppointmentId, AppointmentStatus, PatientId, ProviderId};
use clinflow_core::window::{EndBound, TimeWindow};
use clinflow_core::ClinflowError;

use super::{parse_sql_ts, to_sql_ts};
use crate::database::{map_tr_err, Database};

const SELECT_COLUMNS: &str =
    "id, patient_id, provider_id, provider_name, scheduled_at, status, diagnosis, notes";

fn row_to_appointment(row: &rusqlite::Row<'_>) -> Result<Appointment, rusqlite::Error> {
    let scheduled_at: String = row.get(4)?;
    let status: String = row.get(5)?;
    Ok(Appointment {
        id: AppointmentId(row.get(0)?),
        patient_id: PatientId(row.get(1)?),
        provider_id: ProviderId(row.get(2)?),
        provider_name: row.get(3)?,
        scheduled_at: parse_sql_ts(4, scheduled_at)?,
        status: status.parse().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
        })?,
        diagnosis: row.get(6)?,
        notes: row.get(7)?,
    })
}

/// Insert a new appointment record.
///
/// Booking flows own record creation; this is the minimal surface they (and
/// tests) need.
pub async fn insert(db: &Database, appointment: &Appointment) -> Result<(), ClinflowError> {
    let a = appointment.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO appointments
                     (id, patient_id, provider_id, provider_name, scheduled_at, status, diagnosis, notes)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    a.id.0,
                    a.patient_id.0,
                    a.provider_id.0,
                    a.provider_name,
                    to_sql_ts(a.scheduled_at),
                    a.status.to_string(),
                    a.diagnosis,
                    a.notes
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Fetch one appointment by id.
pub async fn get(db: &Database, id: &AppointmentId) -> Result<Option<Appointment>, ClinflowError> {
    let id = id.0.clone();
    db.connection()
        .call(move |conn| {
            let appointment = conn
                .query_row(
                    &format!("SELECT {SELECT_COLUMNS} FROM appointments WHERE id = ?1"),
                    params![id],
                    row_to_appointment,
                )
                .optional()?;
            Ok(appointment)
        })
        .await
        .map_err(map_tr_err)
}

/// Appointments with `status` whose `scheduled_at` falls inside `window`.
///
/// The window's end bound picks the comparison operator, so the same query
/// serves both the closed reminder window and the half-open review window.
pub async fn find_by_window(
    db: &Database,
    status: AppointmentStatus,
    window: TimeWindow,
) -> Result<Vec<Appointment>, ClinflowError> {
    let status = status.to_string();
    let from = to_sql_ts(window.from);
    let to = to_sql_ts(window.to);
    let end_op = match window.end_bound {
        EndBound::Inclusive => "<=",
        EndBound::Exclusive => "<",
    };
    let sql = format!(
        "SELECT {SELECT_COLUMNS} FROM appointments
         WHERE status = ?1 AND scheduled_at >= ?2 AND scheduled_at {end_op} ?3
         ORDER BY scheduled_at ASC, id ASC"
    );
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![status, from, to], row_to_appointment)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
        .await
        .map_err(map_tr_err)
}

/// Appointments with `status` scheduled strictly before `before`.
pub async fn find_past(
    db: &Database,
    status: AppointmentStatus,
    before: DateTime<Utc>,
) -> Result<Vec<Appointment>, ClinflowError> {
    let status = status.to_string();
    let before = to_sql_ts(before);
    let sql = format!(
        "SELECT {SELECT_COLUMNS} FROM appointments
         WHERE status = ?1 AND scheduled_at < ?2
         ORDER BY scheduled_at ASC, id ASC"
    );
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![status, before], row_to_appointment)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
        .await
        .map_err(map_tr_err)
}

/// Set the status to `new` only if the stored status still equals `expected`.
///
/// Returns `true` when a row changed. The guard and the write are one
/// `UPDATE`, executed on the single writer thread, so concurrent callers
/// cannot interleave between check and set.
pub async fn compare_and_set_status(
    db: &Database,
    id: &AppointmentId,
    expected: AppointmentStatus,
    new: AppointmentStatus,
) -> Result<bool, ClinflowError> {
    let id = id.0.clone();
    let expected = expected.to_string();
    let new = new.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE appointments
                 SET status = ?1, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?2 AND status = ?3",
                params![new, id, expected],
            )?;
            Ok(changed == 1)
        })
        .await
        .map_err(map_tr_err)
}
