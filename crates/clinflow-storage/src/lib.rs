// SPDX-FileCopyrightText: 2026 Clinflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the clinflow appointment engine.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a
//! single-writer concurrency model via `tokio-rusqlite`, and repository
//! implementations for appointments and notifications. The unique index on
//! `(related_entity_id, kind)` is the schema-level backstop for the
//! engine's notification dedup invariant.

pub mod database;
pub mod migrations;
pub mod queries;
pub mod repos;

pub use database::Database;
pub use repos::{SqliteAppointmentRepository, SqliteNotificationRepository};
