// SPDX-FileCopyrightText: 2026 Clinflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness wiring the dispatch engine over in-memory doubles.
//!
//! The harness keeps handles to the repositories and the clock so tests can
//! seed records, move time, and assert on stored state around engine calls.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use clinflow_engine::{EngineConfig, LifecycleEngine};

use crate::clock::FixedClock;
use crate::mock_appointments::InMemoryAppointmentRepository;
use crate::mock_notifications::InMemoryNotificationRepository;

/// A dispatch engine over empty in-memory stores and a pinned clock.
pub struct TestHarness {
    pub appointments: Arc<InMemoryAppointmentRepository>,
    pub notifications: Arc<InMemoryNotificationRepository>,
    pub clock: Arc<FixedClock>,
    pub engine: LifecycleEngine,
}

impl TestHarness {
    /// Start configuring a harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// A harness with default config, pinned to `now`.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self::builder().now(now).build()
    }
}

/// Builder for harnesses with non-default clock or engine config.
pub struct TestHarnessBuilder {
    now: DateTime<Utc>,
    config: EngineConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            // An arbitrary weekday mid-morning; tests that care pin their own.
            now: Utc
                .with_ymd_and_hms(2026, 3, 14, 10, 0, 0)
                .single()
                .expect("valid timestamp"),
            config: EngineConfig::default(),
        }
    }

    /// Pin the harness clock to `now`.
    pub fn now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Use a non-default engine config.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Assemble the harness.
    pub fn build(self) -> TestHarness {
        let appointments = Arc::new(InMemoryAppointmentRepository::new());
        let notifications = Arc::new(InMemoryNotificationRepository::new());
        let clock = Arc::new(FixedClock::at(self.now));
        let engine = LifecycleEngine::new(
            appointments.clone(),
            notifications.clone(),
            clock.clone(),
            self.config,
        )
        .expect("harness engine config must be valid");
        TestHarness {
            appointments,
            notifications,
            clock,
            engine,
        }
    }
}
