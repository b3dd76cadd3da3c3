//! Task record model.
//!
//! # Responsibility
//! - Define the task record and its fixed category set.
//! - Validate and normalize raw caller input into well-formed records.
//! - Convert to/from the persisted wire form.
//!
//! # Invariants
//! - `text` is never empty or whitespace-only on a validated record.
//! - `date`, when present, is a real calendar date (no time component).
//! - `completed` and `urgent` always resolve to a boolean; a record missing
//!   either field deserializes with `false`, never a null.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a task record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TaskId = Uuid;

/// Wire format for due dates, matching the flat-file layout (`DD/MM/YYYY`).
pub const DUE_DATE_FORMAT: &str = "%d/%m/%Y";

// Shape check applied before the calendar parse, so `1/2/2024` and ISO input
// are rejected with the same error as impossible dates.
static DUE_DATE_SHAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}/\d{2}/\d{4}$").expect("valid due date regex"));

/// Validation failure for raw task input or persisted records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Description is empty or whitespace-only.
    EmptyText,
    /// Date input is present but not a valid `DD/MM/YYYY` calendar date.
    InvalidDate { input: String },
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "task text must not be empty"),
            Self::InvalidDate { input } => {
                write!(f, "invalid due date `{input}`; expected DD/MM/YYYY")
            }
        }
    }
}

impl Error for TaskValidationError {}

/// Fixed category set carried over from the original task list.
///
/// Categories are display labels, not a hierarchy; `Other` is the defaulting
/// target for records that predate the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Work,
    Personal,
    Health,
    Study,
    Shopping,
    #[default]
    Other,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 6] = [
        Category::Work,
        Category::Personal,
        Category::Health,
        Category::Study,
        Category::Shopping,
        Category::Other,
    ];

    /// Stable label used in both the flat-file layout and the table schema.
    pub fn wire_label(self) -> &'static str {
        match self {
            Category::Work => "work",
            Category::Personal => "personal",
            Category::Health => "health",
            Category::Study => "study",
            Category::Shopping => "shopping",
            Category::Other => "other",
        }
    }

    /// Parses a wire label, case-insensitively. Returns `None` for unknown
    /// labels so callers decide between defaulting and rejecting.
    pub fn parse(value: &str) -> Option<Category> {
        let normalized = value.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|category| category.wire_label() == normalized)
    }

    /// Display emoji used by presentation layers.
    pub fn emoji(self) -> &'static str {
        match self {
            Category::Work => "🏢",
            Category::Personal => "🏠",
            Category::Health => "💪",
            Category::Study => "📚",
            Category::Shopping => "🛒",
            Category::Other => "⚡",
        }
    }

    /// Display color (hex) used by presentation layers.
    pub fn color(self) -> &'static str {
        match self {
            Category::Work => "#3498db",
            Category::Personal => "#2ecc71",
            Category::Health => "#f39c12",
            Category::Study => "#9b59b6",
            Category::Shopping => "#e91e63",
            Category::Other => "#95a5a6",
        }
    }
}

/// Canonical task record.
///
/// The wire form keeps every optional field defaultable so old files written
/// before `category`/`urgent`/`id` existed still load; unknown extra fields
/// are ignored on read and dropped on rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable ID. Generated locally when the backing file predates the field.
    #[serde(default = "Uuid::new_v4")]
    pub id: TaskId,
    /// Task description. Never blank on a validated record.
    pub text: String,
    /// Optional due date; absent means "undated".
    #[serde(default, with = "due_date_wire", skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub urgent: bool,
}

impl Task {
    /// Checks record-level invariants shared by every write path.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.text.trim().is_empty() {
            return Err(TaskValidationError::EmptyText);
        }
        Ok(())
    }
}

/// Raw caller input for a new task, before validation and defaulting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub text: String,
    /// Raw `DD/MM/YYYY` input; blank or absent means undated.
    pub date: Option<String>,
    /// `None` defaults to [`Category::Other`].
    pub category: Option<Category>,
    pub urgent: bool,
}

impl TaskDraft {
    /// Creates a draft with only a description set.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Validates and normalizes this draft into a task with a fresh ID.
    ///
    /// # Errors
    /// - [`TaskValidationError::EmptyText`] when the description is blank.
    /// - [`TaskValidationError::InvalidDate`] when a date is present but not
    ///   a parseable `DD/MM/YYYY` calendar date.
    pub fn validate(self) -> Result<Task, TaskValidationError> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(TaskValidationError::EmptyText);
        }

        // Blank date input counts as "undated", matching the entry form.
        let date = match self.date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_due_date(raw)?),
        };

        Ok(Task {
            id: Uuid::new_v4(),
            text: text.to_string(),
            date,
            completed: false,
            category: self.category.unwrap_or_default(),
            urgent: self.urgent,
        })
    }
}

/// Parses a `DD/MM/YYYY` due date.
pub fn parse_due_date(input: &str) -> Result<NaiveDate, TaskValidationError> {
    let trimmed = input.trim();
    if !DUE_DATE_SHAPE_RE.is_match(trimmed) {
        return Err(TaskValidationError::InvalidDate {
            input: input.to_string(),
        });
    }
    NaiveDate::parse_from_str(trimmed, DUE_DATE_FORMAT).map_err(|_| {
        TaskValidationError::InvalidDate {
            input: input.to_string(),
        }
    })
}

/// Formats a due date back into the `DD/MM/YYYY` wire form.
pub fn format_due_date(date: NaiveDate) -> String {
    date.format(DUE_DATE_FORMAT).to_string()
}

mod due_date_wire {
    use super::{format_due_date, parse_due_date};
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_some(&format_due_date(*date)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => parse_due_date(&raw)
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{format_due_date, parse_due_date, Category, TaskValidationError};

    #[test]
    fn parse_due_date_accepts_wire_form() {
        let date = parse_due_date("05/06/2024").expect("valid date should parse");
        assert_eq!(format_due_date(date), "05/06/2024");
    }

    #[test]
    fn parse_due_date_rejects_wrong_shape_and_impossible_dates() {
        assert!(matches!(
            parse_due_date("2024-06-05"),
            Err(TaskValidationError::InvalidDate { .. })
        ));
        assert!(matches!(
            parse_due_date("1/6/2024"),
            Err(TaskValidationError::InvalidDate { .. })
        ));
        assert!(matches!(
            parse_due_date("31/02/2024"),
            Err(TaskValidationError::InvalidDate { .. })
        ));
    }

    #[test]
    fn category_labels_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.wire_label()), Some(category));
        }
        assert_eq!(Category::parse(" WORK "), Some(Category::Work));
        assert_eq!(Category::parse("chores"), None);
    }
}
