// SPDX-FileCopyrightText: 2026 Clinflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Appointment lifecycle and notification dispatch engine.
//!
//! [`LifecycleEngine`] exposes three periodic batch entry points, each
//! invocable on its own cadence by an external trigger:
//!
//! - [`LifecycleEngine::dispatch_reminders`]: one reminder per confirmed
//!   appointment inside the lookahead window
//! - [`LifecycleEngine::dispatch_review_prompts`]: one follow-up per
//!   appointment completed on the previous clinic-local day
//! - [`LifecycleEngine::sweep_missed_appointments`]: `confirmed -> missed`
//!   once the scheduled time has elapsed
//!
//! The entry points share one execution skeleton ([`batch::run_batch`]) that
//! processes candidates independently and isolates per-candidate failures.
//! Repeated or overlapping invocations are safe without a global lock:
//! notification creation is existence-checked per appointment and the missed
//! transition is status-guarded, so batches converge per entity.

pub mod batch;
pub mod config;

mod reminders;
mod review;
mod sweeper;

use std::sync::Arc;

use chrono::FixedOffset;

use clinflow_core::{AppointmentRepository, ClinflowError, Clock, NotificationRepository};

pub use config::EngineConfig;

/// The dispatch engine.
///
/// Holds the injected ports and validated configuration; carries no other
/// state across invocations. "Now" is taken from the clock at each call.
pub struct LifecycleEngine {
    appointments: Arc<dyn AppointmentRepository>,
    notifications: Arc<dyn NotificationRepository>,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
    clinic_offset: FixedOffset,
}

impl LifecycleEngine {
    /// Build an engine over the given ports, rejecting invalid configuration.
    pub fn new(
        appointments: Arc<dyn AppointmentRepository>,
        notifications: Arc<dyn NotificationRepository>,
        clock: Arc<dyn Clock>,
        config: EngineConfig,
    ) -> Result<Self, ClinflowError> {
        config.validate()?;
        let clinic_offset = config.clinic_offset()?;
        Ok(Self {
            appointments,
            notifications,
            clock,
            config,
            clinic_offset,
        })
    }

    /// The configuration this engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
