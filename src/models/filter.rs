use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::entry::{Habit, JournalEntry};

/// Teacher/parent confirmation filter used by the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationState {
    #[default]
    All,
    /// Confirmed by both teacher and parent.
    Validated,
    /// Missing at least one confirmation.
    Unvalidated,
}

/// Selection criteria for listing entries. Empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFilter {
    /// Exact owner match.
    pub student_id: Option<String>,
    /// Case-insensitive substring of the owner id.
    pub student_search: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub habit: Option<Habit>,
    pub validation: ValidationState,
}

impl EntryFilter {
    pub fn for_student(student_id: impl Into<String>) -> Self {
        Self {
            student_id: Some(student_id.into()),
            ..Self::default()
        }
    }

    pub fn on_date(mut self, date: NaiveDate) -> Self {
        self.from = Some(date);
        self.to = Some(date);
        self
    }

    pub fn with_habit(mut self, habit: Option<Habit>) -> Self {
        self.habit = habit;
        self
    }

    pub fn matches(&self, entry: &JournalEntry) -> bool {
        if let Some(student_id) = &self.student_id {
            if entry.student_id() != student_id {
                return false;
            }
        }
        if let Some(needle) = &self.student_search {
            if !entry
                .student_id()
                .to_lowercase()
                .contains(&needle.to_lowercase())
            {
                return false;
            }
        }
        if self.from.is_some_and(|from| entry.date() < from) {
            return false;
        }
        if self.to.is_some_and(|to| entry.date() > to) {
            return false;
        }
        if self.habit.is_some_and(|habit| entry.habit() != habit) {
            return false;
        }
        match self.validation {
            ValidationState::All => true,
            ValidationState::Validated => entry.is_fully_validated(),
            ValidationState::Unvalidated => !entry.is_fully_validated(),
        }
    }
}

/// Admin change to the validation flags. Only the named flags are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationPatch {
    pub validated_by_teacher: Option<bool>,
    pub validated_by_parent: Option<bool>,
}

impl ValidationPatch {
    pub fn is_empty(&self) -> bool {
        self.validated_by_teacher.is_none() && self.validated_by_parent.is_none()
    }

    pub fn apply(&self, entry: &mut JournalEntry) {
        if let Some(teacher) = self.validated_by_teacher {
            entry.validated_by_teacher = teacher;
        }
        if let Some(parent) = self.validated_by_parent {
            entry.validated_by_parent = parent;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entry::{EntryContent, HabitDetail};
    use chrono::Utc;
    use uuid::Uuid;

    fn entry(student: &str, day: u32, habit_time: &str) -> JournalEntry {
        let content = EntryContent {
            student_id: student.into(),
            date: NaiveDate::from_ymd_opt(2025, 5, day).unwrap(),
            religion: None,
            detail: HabitDetail::WakeEarly {
                time: habit_time.parse().unwrap(),
            },
            notes: None,
        };
        JournalEntry::new(Uuid::new_v4(), content, Utc::now())
    }

    #[test]
    fn date_range_is_inclusive() {
        let filter = EntryFilter {
            from: NaiveDate::from_ymd_opt(2025, 5, 18),
            to: NaiveDate::from_ymd_opt(2025, 5, 19),
            ..EntryFilter::default()
        };
        assert!(!filter.matches(&entry("S1", 17, "05:00")));
        assert!(filter.matches(&entry("S1", 18, "05:00")));
        assert!(filter.matches(&entry("S1", 19, "05:00")));
        assert!(!filter.matches(&entry("S1", 20, "05:00")));
    }

    #[test]
    fn student_search_ignores_case() {
        let filter = EntryFilter {
            student_search: Some("s123".into()),
            ..EntryFilter::default()
        };
        assert!(filter.matches(&entry("S12345", 19, "05:00")));
        assert!(!filter.matches(&entry("S67890", 19, "05:00")));
    }

    #[test]
    fn habit_filter_excludes_other_habits() {
        let filter = EntryFilter::default().with_habit(Some(Habit::SleepEarly));
        assert!(!filter.matches(&entry("S1", 19, "05:00")));
    }

    #[test]
    fn validation_state_needs_both_flags() {
        let mut e = entry("S1", 19, "05:00");
        e.validated_by_teacher = true;

        let validated = EntryFilter {
            validation: ValidationState::Validated,
            ..EntryFilter::default()
        };
        let unvalidated = EntryFilter {
            validation: ValidationState::Unvalidated,
            ..EntryFilter::default()
        };
        assert!(!validated.matches(&e));
        assert!(unvalidated.matches(&e));

        e.validated_by_parent = true;
        assert!(validated.matches(&e));
        assert!(!unvalidated.matches(&e));
    }

    #[test]
    fn patch_only_touches_named_flags() {
        let mut e = entry("S1", 19, "05:00");
        e.validated_by_parent = true;

        ValidationPatch {
            validated_by_teacher: Some(true),
            validated_by_parent: None,
        }
        .apply(&mut e);
        assert!(e.validated_by_teacher);
        assert!(e.validated_by_parent);

        ValidationPatch {
            validated_by_teacher: Some(false),
            validated_by_parent: None,
        }
        .apply(&mut e);
        assert!(!e.validated_by_teacher);
        assert!(e.validated_by_parent);
    }
}
