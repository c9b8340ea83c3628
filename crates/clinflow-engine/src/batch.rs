// SPDX-FileCopyrightText: 2026 Clinflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared batch execution skeleton.
//!
//! All three dispatch jobs fetch their own candidate set and hand it to
//! [`run_batch`], which processes candidates with bounded concurrency and
//! isolates per-candidate failures: one bad record never aborts the rest of
//! the run. The runner is stateless and performs no retries; re-running
//! the same window is always safe because each job's per-candidate work is
//! idempotent.

use std::future::Future;

use futures::stream::{self, StreamExt};
use tracing::{debug, error, info, warn};

use clinflow_core::types::{Appointment, BatchFailure, BatchResult, DispatchOutcome};
use clinflow_core::ClinflowError;

/// Process `candidates` independently with at most `max_concurrency` in
/// flight.
///
/// Logical no-ops ([`DispatchOutcome::AlreadySatisfied`]) count as
/// successes. Per-candidate errors are recorded in the result's `failures`
/// and never propagate out. No ordering across candidates is guaranteed.
pub async fn run_batch<F, Fut>(
    job: &str,
    candidates: Vec<Appointment>,
    max_concurrency: usize,
    process: F,
) -> BatchResult
where
    F: Fn(Appointment) -> Fut,
    Fut: Future<Output = Result<DispatchOutcome, ClinflowError>>,
{
    let attempted = candidates.len();
    info!(job, candidates = attempted, "batch run started");

    let outcomes: Vec<_> = stream::iter(candidates)
        .map(|appointment| {
            let id = appointment.id.clone();
            let fut = process(appointment);
            async move { (id, fut.await) }
        })
        .buffer_unordered(max_concurrency.max(1))
        .collect()
        .await;

    let mut result = BatchResult {
        attempted,
        succeeded: 0,
        failures: Vec::new(),
    };
    let mut already_satisfied = 0usize;
    for (id, outcome) in outcomes {
        match outcome {
            Ok(DispatchOutcome::Applied) => result.succeeded += 1,
            Ok(DispatchOutcome::AlreadySatisfied) => {
                result.succeeded += 1;
                already_satisfied += 1;
                debug!(job, appointment_id = %id, "candidate already in desired state");
            }
            Err(e) => {
                warn!(job, appointment_id = %id, error = %e, "candidate processing failed");
                result.failures.push(BatchFailure {
                    candidate_id: Some(id),
                    error: e.to_string(),
                });
            }
        }
    }

    info!(
        job,
        attempted,
        succeeded = result.succeeded,
        already_satisfied,
        failed = result.failures.len(),
        "batch run finished"
    );
    result
}

/// Result for a run whose candidate query failed before any candidate was
/// attempted. The error still surfaces through `failures` so the trigger can
/// alert and retry; the next run re-derives its window from the clock.
pub(crate) fn query_failure(job: &str, error: &ClinflowError) -> BatchResult {
    error!(job, error = %error, "candidate query failed, nothing attempted");
    BatchResult {
        attempted: 0,
        succeeded: 0,
        failures: vec![BatchFailure {
            candidate_id: None,
            error: error.to_string(),
        }],
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use clinflow_core::types::{AppointmentId, AppointmentStatus, PatientId, ProviderId};

    use super::*;

    fn appointment(id: &str) -> Appointment {
        Appointment {
            id: AppointmentId(id.into()),
            patient_id: PatientId(format!("patient-{id}")),
            provider_id: ProviderId("provider-1".into()),
            provider_name: "Dr. Osei".into(),
            scheduled_at: Utc::now(),
            status: AppointmentStatus::Confirmed,
            diagnosis: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn all_candidates_succeed() {
        let candidates = vec![appointment("a"), appointment("b"), appointment("c")];
        let result = run_batch("test", candidates, 4, |_| async {
            Ok(DispatchOutcome::Applied)
        })
        .await;

        assert_eq!(result.attempted, 3);
        assert_eq!(result.succeeded, 3);
        assert!(result.is_clean());
    }

    #[tokio::test]
    async fn one_failure_does_not_abort_the_rest() {
        let candidates = vec![appointment("a"), appointment("b"), appointment("c")];
        let result = run_batch("test", candidates, 4, |a| async move {
            if a.id.0 == "b" {
                Err(ClinflowError::Internal("write refused".into()))
            } else {
                Ok(DispatchOutcome::Applied)
            }
        })
        .await;

        assert_eq!(result.attempted, 3);
        assert_eq!(result.succeeded, 2);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(
            result.failures[0].candidate_id,
            Some(AppointmentId("b".into()))
        );
        assert!(result.failures[0].error.contains("write refused"));
    }

    #[tokio::test]
    async fn no_ops_count_as_successes() {
        let candidates = vec![appointment("a"), appointment("b")];
        let result = run_batch("test", candidates, 4, |a| async move {
            if a.id.0 == "a" {
                Ok(DispatchOutcome::Applied)
            } else {
                Ok(DispatchOutcome::AlreadySatisfied)
            }
        })
        .await;

        assert_eq!(result.attempted, 2);
        assert_eq!(result.succeeded, 2);
        assert!(result.is_clean());
    }

    #[tokio::test]
    async fn empty_candidate_set_is_a_clean_run() {
        let result = run_batch("test", Vec::new(), 4, |_| async {
            Ok(DispatchOutcome::Applied)
        })
        .await;

        assert_eq!(result.attempted, 0);
        assert_eq!(result.succeeded, 0);
        assert!(result.is_clean());
    }

    #[tokio::test]
    async fn concurrency_of_zero_is_clamped_to_one() {
        let candidates = vec![appointment("a"), appointment("b")];
        let result = run_batch("test", candidates, 0, |_| async {
            Ok(DispatchOutcome::Applied)
        })
        .await;

        assert_eq!(result.succeeded, 2);
    }

    #[test]
    fn query_failure_reports_without_a_candidate() {
        let result = query_failure("test", &ClinflowError::Internal("store down".into()));
        assert_eq!(result.attempted, 0);
        assert_eq!(result.succeeded, 0);
        assert_eq!(result.failures.len(), 1);
        assert!(result.failures[0].candidate_id.is_none());
        assert!(result.failures[0].error.contains("store down"));
    }
}
