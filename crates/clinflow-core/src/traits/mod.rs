// SPDX-FileCopyrightText: 2026 Clinflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Port definitions the dispatch engine consumes.
//!
//! The engine never talks to a database or a wall clock directly; it is
//! handed `Arc<dyn …>` implementations of these traits. Production
//! implementations live in `clinflow-storage`, deterministic in-memory
//! doubles in `clinflow-test-utils`.

pub mod appointments;
pub mod clock;
pub mod notifications;

// Re-export all ports at the traits module level for convenience.
pub use appointments::AppointmentRepository;
pub use clock::{Clock, SystemClock};
pub use notifications::NotificationRepository;
