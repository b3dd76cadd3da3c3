//! Filtering, sorting, status coding and aggregation.
//!
//! # Responsibility
//! - Compose list-view predicates by logical AND.
//! - Order collections stably under every supported criterion.
//! - Derive per-task status and collection-level statistics.
//!
//! # Invariants
//! - An empty filter returns the input unchanged, order preserved.
//! - Sorts are stable; undated records sort after dated ones regardless of
//!   direction.

use crate::model::task::{Category, Task};
use chrono::{NaiveDate, Weekday};
use std::cmp::Reverse;

/// Date-window predicate for the list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBucket {
    /// Due exactly on the reference date.
    Today,
    /// Due within the Monday-started week containing the reference date,
    /// boundaries inclusive.
    ThisWeek,
    /// Due strictly before the reference date and not completed.
    Overdue,
}

/// AND-composed list-view predicates. `Default` matches everything.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Case-insensitive substring match against the description.
    pub text: Option<String>,
    /// Category membership; `None` means any category.
    pub categories: Option<Vec<Category>>,
    /// Completion state; `None` means both.
    pub completed: Option<bool>,
    pub due: Option<DateBucket>,
}

impl TaskFilter {
    /// True when no predicate is set.
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.categories.is_none()
            && self.completed.is_none()
            && self.due.is_none()
    }

    /// Evaluates every set predicate against one task.
    pub fn matches(&self, task: &Task, today: NaiveDate) -> bool {
        if let Some(term) = &self.text {
            let term = term.trim().to_lowercase();
            if !term.is_empty() && !task.text.to_lowercase().contains(&term) {
                return false;
            }
        }

        if let Some(categories) = &self.categories {
            if !categories.contains(&task.category) {
                return false;
            }
        }

        if let Some(state) = self.completed {
            if task.completed != state {
                return false;
            }
        }

        if let Some(bucket) = self.due {
            let hit = match bucket {
                DateBucket::Today => is_due_today(task, today),
                DateBucket::ThisWeek => is_due_this_week(task, today),
                DateBucket::Overdue => is_overdue(task, today),
            };
            if !hit {
                return false;
            }
        }

        true
    }
}

/// Lazily filters `tasks`, preserving input order.
pub fn filter<'a>(
    tasks: &'a [Task],
    filter: &'a TaskFilter,
    today: NaiveDate,
) -> impl Iterator<Item = &'a Task> + 'a {
    tasks.iter().filter(move |task| filter.matches(task, today))
}

/// True iff the task is pending and dated strictly before `today`.
pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    match task.date {
        Some(date) => !task.completed && date < today,
        None => false,
    }
}

/// True iff the task is due exactly on `today`.
pub fn is_due_today(task: &Task, today: NaiveDate) -> bool {
    task.date == Some(today)
}

/// True iff the task is due in the Monday-started week containing `today`.
pub fn is_due_this_week(task: &Task, today: NaiveDate) -> bool {
    let week = today.week(Weekday::Mon);
    task.date
        .is_some_and(|date| date >= week.first_day() && date <= week.last_day())
}

/// Ordering criteria for the list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    DateAsc,
    DateDesc,
    TextAsc,
    TextDesc,
    PendingFirst,
    CompletedFirst,
    UrgentFirst,
}

/// Returns `tasks` stably ordered by `key`.
///
/// Undated records sort after dated ones for both date directions; text
/// comparisons are case-insensitive; grouping keys keep the original
/// relative order within each group.
pub fn sorted_by(mut tasks: Vec<Task>, key: SortKey) -> Vec<Task> {
    match key {
        SortKey::DateAsc => tasks.sort_by_key(|task| (task.date.is_none(), task.date)),
        SortKey::DateDesc => tasks.sort_by_key(|task| (task.date.is_none(), Reverse(task.date))),
        SortKey::TextAsc => tasks.sort_by_key(|task| task.text.to_lowercase()),
        SortKey::TextDesc => {
            tasks.sort_by(|a, b| b.text.to_lowercase().cmp(&a.text.to_lowercase()));
        }
        SortKey::PendingFirst => tasks.sort_by_key(|task| task.completed),
        SortKey::CompletedFirst => tasks.sort_by_key(|task| !task.completed),
        SortKey::UrgentFirst => tasks.sort_by_key(|task| !task.urgent),
    }
    tasks
}

/// Derived per-task status for display color coding.
///
/// Completion wins over overdue: a finished task is never flagged red.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusIndicator {
    Completed,
    Overdue,
    Pending,
}

impl StatusIndicator {
    pub fn for_task(task: &Task, today: NaiveDate) -> Self {
        if task.completed {
            Self::Completed
        } else if is_overdue(task, today) {
            Self::Overdue
        } else {
            Self::Pending
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Completed => "✅",
            Self::Overdue => "🔴",
            Self::Pending => "🟢",
        }
    }

    /// Display color (hex) used by presentation layers.
    pub fn color(self) -> &'static str {
        match self {
            Self::Completed => "#27ae60",
            Self::Overdue => "#d32f2f",
            Self::Pending => "#2e7d32",
        }
    }
}

/// Aggregate counters over one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub urgent: usize,
    pub overdue: usize,
}

impl Stats {
    /// Completion share in percent; 0 for an empty collection.
    pub fn percent_complete(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.completed as f64 / self.total as f64 * 100.0
    }
}

/// Computes aggregate counters for `tasks` against a reference date.
pub fn summarize(tasks: &[Task], today: NaiveDate) -> Stats {
    let mut stats = Stats {
        total: tasks.len(),
        ..Stats::default()
    };

    for task in tasks {
        if task.completed {
            stats.completed += 1;
        } else {
            stats.pending += 1;
        }
        if task.urgent {
            stats.urgent += 1;
        }
        if is_overdue(task, today) {
            stats.overdue += 1;
        }
    }

    stats
}
