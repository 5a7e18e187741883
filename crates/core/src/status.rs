use chrono::{DateTime, Utc};

use crate::model::ProgressEntry;
use crate::time::fractional_hours;

/// Read-time classification of a progress entry.
///
/// Derived on every read against the current clock and the user-editable
/// estimate; never persisted, so an entry can move between `InProgress` and
/// `Delayed` just by time passing or the estimate changing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Status {
    NotStarted,
    InProgress { elapsed_hours: f64 },
    Delayed { elapsed_hours: f64, overrun_hours: f64 },
    Completed { actual_hours: f64 },
}

impl Status {
    /// Classify an entry as of `now`.
    ///
    /// Completion wins over everything. A started entry without a start
    /// timestamp (legacy data) counts as in progress with zero elapsed time.
    #[must_use]
    pub fn derive(entry: &ProgressEntry, now: DateTime<Utc>) -> Self {
        if entry.completed {
            return Status::Completed {
                actual_hours: entry.actual_hours,
            };
        }

        if entry.started {
            let Some(started_at) = entry.started_at else {
                return Status::InProgress { elapsed_hours: 0.0 };
            };
            let elapsed_hours = fractional_hours(now - started_at);
            if elapsed_hours > entry.estimated_hours {
                return Status::Delayed {
                    elapsed_hours,
                    overrun_hours: elapsed_hours - entry.estimated_hours,
                };
            }
            return Status::InProgress { elapsed_hours };
        }

        Status::NotStarted
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Status::Completed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Catalog, ProgressDocument};
    use crate::time::fixed_now;
    use chrono::Duration;

    fn entry() -> ProgressEntry {
        let doc = ProgressDocument::fresh(&Catalog::builtin(), fixed_now());
        doc.entry("Linear Regression").unwrap().clone()
    }

    #[test]
    fn untouched_entry_is_not_started() {
        assert_eq!(Status::derive(&entry(), fixed_now()), Status::NotStarted);
    }

    #[test]
    fn within_estimate_is_in_progress() {
        let mut e = entry();
        e.started = true;
        e.started_at = Some(fixed_now() - Duration::hours(1));
        e.estimated_hours = 3.0;

        match Status::derive(&e, fixed_now()) {
            Status::InProgress { elapsed_hours } => {
                assert!((elapsed_hours - 1.0).abs() < 1e-6);
            }
            other => panic!("expected InProgress, got {other:?}"),
        }
    }

    #[test]
    fn past_estimate_is_delayed_with_overrun() {
        let mut e = entry();
        e.started = true;
        e.started_at = Some(fixed_now() - Duration::hours(5));
        e.estimated_hours = 3.0;

        match Status::derive(&e, fixed_now()) {
            Status::Delayed {
                elapsed_hours,
                overrun_hours,
            } => {
                assert!((elapsed_hours - 5.0).abs() < 1e-6);
                assert!((overrun_hours - 2.0).abs() < 1e-6);
            }
            other => panic!("expected Delayed, got {other:?}"),
        }
    }

    #[test]
    fn completed_wins_regardless_of_other_fields() {
        let mut e = entry();
        e.started = true;
        e.started_at = Some(fixed_now() - Duration::hours(100));
        e.estimated_hours = 1.0;
        e.completed = true;
        e.actual_hours = 42.5;

        assert_eq!(
            Status::derive(&e, fixed_now()),
            Status::Completed { actual_hours: 42.5 }
        );
    }

    #[test]
    fn started_without_timestamp_counts_as_in_progress() {
        let mut e = entry();
        e.started = true;
        e.started_at = None;

        assert_eq!(
            Status::derive(&e, fixed_now()),
            Status::InProgress { elapsed_hours: 0.0 }
        );
    }

    #[test]
    fn raising_the_estimate_clears_a_delay() {
        let mut e = entry();
        e.started = true;
        e.started_at = Some(fixed_now() - Duration::hours(5));
        e.estimated_hours = 3.0;
        assert!(matches!(
            Status::derive(&e, fixed_now()),
            Status::Delayed { .. }
        ));

        e.estimated_hours = 8.0;
        assert!(matches!(
            Status::derive(&e, fixed_now()),
            Status::InProgress { .. }
        ));
    }
}
