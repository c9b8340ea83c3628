// SPDX-FileCopyrightText: 2026 Clinflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model for the dispatch engine.
//!
//! Serde structs with per-field default functions, so a partially-specified
//! `[engine]` section fills in sensible values; `deny_unknown_fields`
//! rejects unrecognized keys at load time with an actionable error.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use clinflow_core::ClinflowError;

/// Dispatch engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// How far past "now" reminder dispatch looks, in hours.
    #[serde(default = "default_reminder_lookahead_hours")]
    pub reminder_lookahead_hours: i64,

    /// Maximum number of candidates processed concurrently within one batch.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Clinic offset from UTC in minutes. Drives the review-prompt day
    /// boundaries and the time of day rendered into reminder messages.
    #[serde(default)]
    pub clinic_utc_offset_minutes: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reminder_lookahead_hours: default_reminder_lookahead_hours(),
            max_concurrency: default_max_concurrency(),
            clinic_utc_offset_minutes: 0,
        }
    }
}

fn default_reminder_lookahead_hours() -> i64 {
    24
}

fn default_max_concurrency() -> usize {
    8
}

impl EngineConfig {
    /// Reject values that would make a batch run degenerate.
    pub fn validate(&self) -> Result<(), ClinflowError> {
        if self.reminder_lookahead_hours <= 0 {
            return Err(ClinflowError::Config(format!(
                "reminder_lookahead_hours must be positive, got {}",
                self.reminder_lookahead_hours
            )));
        }
        if self.max_concurrency == 0 {
            return Err(ClinflowError::Config(
                "max_concurrency must be at least 1".into(),
            ));
        }
        self.clinic_offset().map(|_| ())
    }

    /// The clinic's fixed UTC offset.
    pub fn clinic_offset(&self) -> Result<FixedOffset, ClinflowError> {
        FixedOffset::east_opt(self.clinic_utc_offset_minutes * 60).ok_or_else(|| {
            ClinflowError::Config(format!(
                "clinic_utc_offset_minutes out of range: {}",
                self.clinic_utc_offset_minutes
            ))
        })
    }
}
