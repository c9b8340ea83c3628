// SPDX-FileCopyrightText: 2026 Clinflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Time windows with explicit end-bound semantics.
//!
//! The two dispatch jobs need different boundary rules: reminder dispatch
//! uses a closed window so an appointment at exactly the lookahead horizon
//! is still picked up, while the daily review job uses a half-open window so
//! a record can never match two consecutive runs. Carrying the end bound in
//! the window itself keeps the repository query contract single and puts the
//! policy where the dispatcher can state it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether a window includes its end instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndBound {
    Inclusive,
    Exclusive,
}

/// A time window with an inclusive start and an explicit end bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub end_bound: EndBound,
}

impl TimeWindow {
    /// `[from, to]`: both ends included.
    pub fn closed(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            from,
            to,
            end_bound: EndBound::Inclusive,
        }
    }

    /// `[from, to)`: start included, end excluded.
    pub fn half_open(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            from,
            to,
            end_bound: EndBound::Exclusive,
        }
    }

    /// Whether `instant` falls inside the window.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        if instant < self.from {
            return false;
        }
        match self.end_bound {
            EndBound::Inclusive => instant <= self.to,
            EndBound::Exclusive => instant < self.to,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).single().expect("valid timestamp")
    }

    #[test]
    fn closed_window_includes_both_ends() {
        let window = TimeWindow::closed(at(100), at(200));
        assert!(window.contains(at(100)));
        assert!(window.contains(at(200)));
        assert!(!window.contains(at(99)));
        assert!(!window.contains(at(201)));
    }

    #[test]
    fn half_open_window_excludes_the_end() {
        let window = TimeWindow::half_open(at(100), at(200));
        assert!(window.contains(at(100)));
        assert!(window.contains(at(199)));
        assert!(!window.contains(at(200)));
    }

    #[test]
    fn one_second_past_a_closed_end_is_out() {
        let now = at(1_000_000);
        let window = TimeWindow::closed(now, now + Duration::hours(24));
        assert!(window.contains(now + Duration::hours(24)));
        assert!(!window.contains(now + Duration::hours(24) + Duration::seconds(1)));
    }

    proptest! {
        #[test]
        fn nothing_before_the_start_is_contained(
            start in 0i64..1_000_000,
            len in 0i64..1_000_000,
            offset in 1i64..1_000_000,
        ) {
            let window = TimeWindow::closed(at(start), at(start + len));
            prop_assert!(!window.contains(at(start - offset)));
        }

        #[test]
        fn half_open_is_closed_minus_the_end(
            start in 0i64..1_000_000,
            len in 1i64..1_000_000,
            probe in 0i64..2_000_000,
        ) {
            let closed = TimeWindow::closed(at(start), at(start + len));
            let half_open = TimeWindow::half_open(at(start), at(start + len));
            let instant = at(probe);
            if instant == at(start + len) {
                prop_assert!(closed.contains(instant));
                prop_assert!(!half_open.contains(instant));
            } else {
                prop_assert_eq!(closed.contains(instant), half_open.contains(instant));
            }
        }
    }
}
