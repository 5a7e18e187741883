use tracker_core::Status;

use crate::vm::time_fmt::format_hours;

/// Display mapping for a derived status: card label, detail line, CSS hook.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusVm {
    pub label: &'static str,
    pub detail: String,
    pub css_class: &'static str,
}

impl From<Status> for StatusVm {
    fn from(status: Status) -> Self {
        match status {
            Status::NotStarted => Self {
                label: "Not Started",
                detail: "Not Started".to_string(),
                css_class: "not-started",
            },
            Status::InProgress { .. } => Self {
                label: "In Progress",
                detail: "In Progress".to_string(),
                css_class: "in-progress",
            },
            Status::Delayed { overrun_hours, .. } => Self {
                label: "Delayed",
                detail: format!("Delayed (Exceeded by {} hours)", format_hours(overrun_hours)),
                css_class: "delayed",
            },
            Status::Completed { .. } => Self {
                label: "Completed",
                detail: "Completed".to_string(),
                css_class: "completed",
            },
        }
    }
}

/// The "Hours Spent" metric: elapsed time while working, recorded time once
/// completed, nothing before the first start.
#[must_use]
pub fn hours_spent(status: Status) -> Option<String> {
    match status {
        Status::NotStarted => None,
        Status::InProgress { elapsed_hours } | Status::Delayed { elapsed_hours, .. } => {
            Some(format_hours(elapsed_hours))
        }
        Status::Completed { actual_hours } => {
            (actual_hours > 0.0).then(|| format_hours(actual_hours))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delayed_detail_reports_overrun_to_one_decimal() {
        let vm = StatusVm::from(Status::Delayed {
            elapsed_hours: 5.0,
            overrun_hours: 2.04,
        });
        assert_eq!(vm.label, "Delayed");
        assert_eq!(vm.detail, "Delayed (Exceeded by 2.0 hours)");
        assert_eq!(vm.css_class, "delayed");
    }

    #[test]
    fn hours_spent_follows_the_lifecycle() {
        assert_eq!(hours_spent(Status::NotStarted), None);
        assert_eq!(
            hours_spent(Status::InProgress { elapsed_hours: 1.26 }),
            Some("1.3".to_string())
        );
        assert_eq!(
            hours_spent(Status::Completed { actual_hours: 0.0 }),
            None
        );
        assert_eq!(
            hours_spent(Status::Completed { actual_hours: 7.5 }),
            Some("7.5".to_string())
        );
    }
}
