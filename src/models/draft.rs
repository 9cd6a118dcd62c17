//! Candidate entries and the per-habit rule table.
//!
//! A draft is what a habit form (or a JSON body) submits: every field
//! optional, free text untrimmed, and habits, religions, prayers, times and
//! dates as raw strings. Validation
//! turns it into an [`EntryContent`] carrying exactly the chosen habit's
//! payload, or reports one [`FieldError`] per missing or malformed field.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::entry::{
    ClockTime, EntryContent, Habit, HabitDetail, PrayerType, Religion, WorshipPractice,
};

/// Upper bound for notes and every free-text payload field.
pub const TEXT_MAX_CHARS: usize = 500;

const TOO_LONG: &str = "must be at most 500 characters";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EntryDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub habit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub religion: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prayer_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worship_activity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub menu_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub information_learned: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reflection: Option<String>,

    #[validate(custom = "within_text_limit")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn single(field: &str, reason: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.push(field, reason);
        errors
    }

    pub fn push(&mut self, field: &str, reason: impl Into<String>) {
        self.0.push(FieldError {
            field: field.to_string(),
            reason: reason.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", e.field, e.reason)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

const REQUIRED: &str = "is required";

fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn within_text_limit(text: &str) -> Result<(), ValidationError> {
    if text.trim().chars().count() > TEXT_MAX_CHARS {
        let mut error = ValidationError::new("length");
        error.message = Some(TOO_LONG.into());
        return Err(error);
    }
    Ok(())
}

fn one_of<'a>(allowed: impl IntoIterator<Item = &'a str>) -> String {
    let allowed: Vec<_> = allowed.into_iter().collect();
    format!("must be one of: {}", allowed.join(", "))
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

impl EntryDraft {
    /// Validate against the habit named in the draft itself.
    pub fn into_content(self) -> Result<EntryContent, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        match trimmed(&self.habit).map(|raw| raw.parse::<Habit>()) {
            Some(Ok(habit)) => return self.into_content_for(habit),
            Some(Err(_)) => errors.push("habit", one_of(Habit::ALL.iter().map(Habit::as_str))),
            None => errors.push("habit", REQUIRED),
        }
        self.check_common(&mut errors);
        Err(errors)
    }

    /// Validate against `habit`, ignoring whatever habit the draft names.
    /// Fields belonging to other habits are dropped.
    pub fn into_content_for(self, habit: Habit) -> Result<EntryContent, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let (student_id, date, religion) = self.check_common(&mut errors);
        let detail = self.check_detail(habit, religion, &mut errors);

        match (student_id, date, detail) {
            (Some(student_id), Some(date), Some(detail)) if errors.is_empty() => Ok(EntryContent {
                student_id,
                date,
                religion,
                detail,
                notes: trimmed(&self.notes),
            }),
            _ => Err(errors),
        }
    }

    fn check_common(
        &self,
        errors: &mut ValidationErrors,
    ) -> (Option<String>, Option<NaiveDate>, Option<Religion>) {
        let student_id = trimmed(&self.student_id);
        if student_id.is_none() {
            errors.push("studentId", REQUIRED);
        }

        let date = match trimmed(&self.date) {
            None => {
                errors.push("date", REQUIRED);
                None
            }
            Some(raw) => match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.push("date", "must be a date in YYYY-MM-DD format");
                    None
                }
            },
        };

        let religion = match trimmed(&self.religion) {
            None => None,
            Some(raw) => match raw.parse::<Religion>() {
                Ok(religion) => Some(religion),
                Err(_) => {
                    errors.push("religion", one_of(Religion::ALL.iter().map(Religion::as_str)));
                    None
                }
            },
        };

        if let Err(report) = self.validate() {
            let mut fields: Vec<_> = report.field_errors().into_iter().collect();
            fields.sort_by_key(|(name, _)| *name);
            for (name, failures) in fields {
                for failure in failures {
                    let reason = failure
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| failure.code.to_string());
                    errors.push(&camel_case(name), reason);
                }
            }
        }

        (student_id, date, religion)
    }

    fn check_detail(
        &self,
        habit: Habit,
        religion: Option<Religion>,
        errors: &mut ValidationErrors,
    ) -> Option<HabitDetail> {
        let before = errors.len();
        let detail = match habit {
            Habit::WakeEarly => require_time(errors, "time", &self.time)
                .map(|time| HabitDetail::WakeEarly { time }),
            Habit::SleepEarly => require_time(errors, "time", &self.time)
                .map(|time| HabitDetail::SleepEarly { time }),
            Habit::Worship => {
                let time = require_time(errors, "time", &self.time);
                let practice = match religion {
                    None => {
                        // an unknown religion is already reported
                        if !errors.has_field("religion") {
                            errors.push("religion", REQUIRED);
                        }
                        None
                    }
                    Some(Religion::Islam) => match trimmed(&self.prayer_type) {
                        None => {
                            errors.push("prayerType", REQUIRED);
                            None
                        }
                        Some(raw) => match raw.parse::<PrayerType>() {
                            Ok(prayer) => Some(WorshipPractice::PrayerType(prayer)),
                            Err(_) => {
                                errors.push(
                                    "prayerType",
                                    one_of(PrayerType::ALL.iter().map(PrayerType::as_str)),
                                );
                                None
                            }
                        },
                    },
                    Some(_) => require_text(errors, "worshipActivity", &self.worship_activity)
                        .map(WorshipPractice::WorshipActivity),
                };
                time.zip(practice)
                    .map(|(time, practice)| HabitDetail::Worship { time, practice })
            }
            Habit::Exercise => {
                let start = require_time(errors, "startTime", &self.start_time);
                let end = require_time(errors, "endTime", &self.end_time);
                start
                    .zip(end)
                    .map(|(start_time, end_time)| HabitDetail::Exercise {
                        start_time,
                        end_time,
                    })
            }
            Habit::HealthyEating => require_text(errors, "menuDescription", &self.menu_description)
                .map(|menu_description| HabitDetail::HealthyEating { menu_description }),
            Habit::LovesLearning => {
                let title = require_text(errors, "materialTitle", &self.material_title);
                let learned = require_text(errors, "informationLearned", &self.information_learned);
                title.zip(learned).map(|(material_title, information_learned)| {
                    HabitDetail::LovesLearning {
                        material_title,
                        information_learned,
                    }
                })
            }
            Habit::SocialEngagement => {
                let activity = require_text(errors, "activity", &self.activity);
                let reflection = require_text(errors, "reflection", &self.reflection);
                activity
                    .zip(reflection)
                    .map(|(activity, reflection)| HabitDetail::SocialEngagement {
                        activity,
                        reflection,
                    })
            }
        };
        debug_assert!(detail.is_some() || errors.len() > before);
        detail
    }

    /// Apply a partial edit on top of this draft.
    ///
    /// The student id never changes. When the edit switches habit, the old
    /// habit's payload is cleared so only fields supplied by the edit can
    /// satisfy the new habit.
    pub fn merge(self, edit: EntryDraft) -> EntryDraft {
        let switching = matches!(
            (trimmed(&self.habit), trimmed(&edit.habit)),
            (Some(old), Some(new)) if old != new
        );
        let base = if switching { self.common_only() } else { self };

        EntryDraft {
            student_id: base.student_id,
            date: edit.date.or(base.date),
            habit: edit.habit.or(base.habit),
            religion: edit.religion.or(base.religion),
            time: edit.time.or(base.time),
            prayer_type: edit.prayer_type.or(base.prayer_type),
            worship_activity: edit.worship_activity.or(base.worship_activity),
            start_time: edit.start_time.or(base.start_time),
            end_time: edit.end_time.or(base.end_time),
            menu_description: edit.menu_description.or(base.menu_description),
            material_title: edit.material_title.or(base.material_title),
            information_learned: edit.information_learned.or(base.information_learned),
            activity: edit.activity.or(base.activity),
            reflection: edit.reflection.or(base.reflection),
            notes: edit.notes.or(base.notes),
        }
    }

    fn common_only(self) -> EntryDraft {
        EntryDraft {
            student_id: self.student_id,
            date: self.date,
            habit: self.habit,
            religion: self.religion,
            notes: self.notes,
            ..EntryDraft::default()
        }
    }
}

fn require_text(errors: &mut ValidationErrors, field: &str, value: &Option<String>) -> Option<String> {
    let value = trimmed(value);
    match value {
        None => {
            errors.push(field, REQUIRED);
            None
        }
        Some(text) if text.chars().count() > TEXT_MAX_CHARS => {
            errors.push(field, TOO_LONG);
            None
        }
        Some(text) => Some(text),
    }
}

fn require_time(errors: &mut ValidationErrors, field: &str, value: &Option<String>) -> Option<ClockTime> {
    match trimmed(value) {
        None => {
            errors.push(field, REQUIRED);
            None
        }
        Some(raw) => match raw.parse::<ClockTime>() {
            Ok(time) => Some(time),
            Err(_) => {
                errors.push(field, "must be a time in HH:MM format");
                None
            }
        },
    }
}

impl From<&EntryContent> for EntryDraft {
    fn from(content: &EntryContent) -> Self {
        let mut draft = EntryDraft {
            student_id: Some(content.student_id.clone()),
            date: Some(content.date.format("%Y-%m-%d").to_string()),
            habit: Some(content.habit().as_str().to_string()),
            religion: content.religion.map(|r| r.as_str().to_string()),
            notes: content.notes.clone(),
            ..EntryDraft::default()
        };

        match &content.detail {
            HabitDetail::WakeEarly { time } | HabitDetail::SleepEarly { time } => {
                draft.time = Some(time.to_string());
            }
            HabitDetail::Worship { time, practice } => {
                draft.time = Some(time.to_string());
                match practice {
                    WorshipPractice::PrayerType(prayer) => {
                        draft.prayer_type = Some(prayer.as_str().to_string())
                    }
                    WorshipPractice::WorshipActivity(activity) => {
                        draft.worship_activity = Some(activity.clone())
                    }
                }
            }
            HabitDetail::Exercise {
                start_time,
                end_time,
            } => {
                draft.start_time = Some(start_time.to_string());
                draft.end_time = Some(end_time.to_string());
            }
            HabitDetail::HealthyEating { menu_description } => {
                draft.menu_description = Some(menu_description.clone());
            }
            HabitDetail::LovesLearning {
                material_title,
                information_learned,
            } => {
                draft.material_title = Some(material_title.clone());
                draft.information_learned = Some(information_learned.clone());
            }
            HabitDetail::SocialEngagement {
                activity,
                reflection,
            } => {
                draft.activity = Some(activity.clone());
                draft.reflection = Some(reflection.clone());
            }
        }
        draft
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(habit: Habit) -> EntryDraft {
        EntryDraft {
            student_id: Some("S12345".into()),
            date: Some("2025-05-19".into()),
            habit: Some(habit.as_str().into()),
            ..EntryDraft::default()
        }
    }

    /// A complete draft for each habit, with the fields its rule table needs.
    fn complete(habit: Habit) -> (EntryDraft, Vec<&'static str>) {
        let mut d = base(habit);
        let fields = match habit {
            Habit::WakeEarly | Habit::SleepEarly => {
                d.time = Some("05:30".into());
                vec!["time"]
            }
            Habit::Worship => {
                d.religion = Some("Christian".into());
                d.time = Some("08:00".into());
                d.worship_activity = Some("Ibadah Minggu".into());
                vec!["religion", "time", "worshipActivity"]
            }
            Habit::Exercise => {
                d.start_time = Some("07:00".into());
                d.end_time = Some("07:30".into());
                vec!["startTime", "endTime"]
            }
            Habit::HealthyEating => {
                d.menu_description = Some("Nasi, sayur bayam, tempe".into());
                vec!["menuDescription"]
            }
            Habit::LovesLearning => {
                d.material_title = Some("Pecahan".into());
                d.information_learned = Some("Menyederhanakan pecahan".into());
                vec!["materialTitle", "informationLearned"]
            }
            Habit::SocialEngagement => {
                d.activity = Some("Kerja bakti".into());
                d.reflection = Some("Senang membantu".into());
                vec!["activity", "reflection"]
            }
        };
        (d, fields)
    }

    fn clear(draft: &mut EntryDraft, field: &str) {
        match field {
            "time" => draft.time = None,
            "religion" => draft.religion = None,
            "worshipActivity" => draft.worship_activity = None,
            "startTime" => draft.start_time = None,
            "endTime" => draft.end_time = None,
            "menuDescription" => draft.menu_description = None,
            "materialTitle" => draft.material_title = None,
            "informationLearned" => draft.information_learned = None,
            "activity" => draft.activity = None,
            "reflection" => draft.reflection = None,
            other => panic!("unexpected field {other}"),
        }
    }

    #[test]
    fn complete_drafts_validate_for_every_habit() {
        for habit in Habit::ALL {
            let (draft, _) = complete(habit);
            let content = draft.into_content().unwrap();
            assert_eq!(content.habit(), habit);
        }
    }

    #[test]
    fn omitting_any_required_field_names_that_field() {
        for habit in Habit::ALL {
            let (draft, fields) = complete(habit);
            for field in fields {
                let mut d = draft.clone();
                clear(&mut d, field);
                let errors = d.into_content().unwrap_err();
                assert!(
                    errors.has_field(field),
                    "{habit}: expected error on {field}, got {errors}"
                );
            }
        }
    }

    #[test]
    fn fields_of_other_habits_are_not_required_or_kept() {
        let (mut draft, _) = complete(Habit::HealthyEating);
        draft.time = Some("not a time".into());
        draft.activity = Some("ignored".into());

        let content = draft.into_content().unwrap();
        assert_eq!(
            content.detail,
            HabitDetail::HealthyEating {
                menu_description: "Nasi, sayur bayam, tempe".into()
            }
        );
    }

    #[test]
    fn islamic_worship_requires_prayer_type_not_activity() {
        let mut draft = base(Habit::Worship);
        draft.religion = Some("Islam".into());
        draft.time = Some("04:45".into());

        let errors = draft.clone().into_content().unwrap_err();
        assert!(errors.has_field("prayerType"));
        assert!(!errors.has_field("worshipActivity"));

        draft.prayer_type = Some("dawn".into());
        let content = draft.into_content().unwrap();
        assert_eq!(
            content.detail,
            HabitDetail::Worship {
                time: "04:45".parse().unwrap(),
                practice: WorshipPractice::PrayerType(PrayerType::Dawn),
            }
        );
    }

    #[test]
    fn missing_habit_and_common_fields_are_reported() {
        let errors = EntryDraft::default().into_content().unwrap_err();
        assert!(errors.has_field("habit"));
        assert!(errors.has_field("studentId"));
        assert!(errors.has_field("date"));
    }

    #[test]
    fn malformed_date_and_time_are_rejected() {
        let (mut draft, _) = complete(Habit::WakeEarly);
        draft.date = Some("19/05/2025".into());
        draft.time = Some("half past five".into());

        let errors = draft.into_content().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.has_field("date"));
        assert!(errors.has_field("time"));
    }

    #[test]
    fn exercise_may_run_past_midnight() {
        let (mut draft, _) = complete(Habit::Exercise);
        draft.start_time = Some("23:30".into());
        draft.end_time = Some("00:15".into());
        let content = draft.into_content().unwrap();
        assert_eq!(
            content.detail,
            HabitDetail::Exercise {
                start_time: "23:30".parse().unwrap(),
                end_time: "00:15".parse().unwrap(),
            }
        );
    }

    #[test]
    fn unknown_enum_values_are_reported_on_their_field() {
        let (mut draft, _) = complete(Habit::WakeEarly);
        draft.habit = Some("bangun_pagi".into());
        draft.religion = Some("Muslim".into());
        let errors = draft.into_content().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.has_field("habit"));
        assert!(errors.has_field("religion"));

        let mut draft = base(Habit::Worship);
        draft.religion = Some("Muslim".into());
        draft.time = Some("04:45".into());
        let errors = draft.into_content().unwrap_err();
        assert_eq!(errors.len(), 1, "{errors}");
        assert!(errors.has_field("religion"));

        let mut draft = base(Habit::Worship);
        draft.religion = Some("Islam".into());
        draft.time = Some("04:45".into());
        draft.prayer_type = Some("subuh".into());
        let errors = draft.into_content().unwrap_err();
        assert!(errors.has_field("prayerType"));
        assert!(errors.errors()[0].reason.contains("dawn"));
    }

    #[test]
    fn notes_over_limit_fail_instead_of_truncating() {
        let (mut draft, _) = complete(Habit::SleepEarly);
        draft.notes = Some("a".repeat(501));
        let errors = draft.clone().into_content().unwrap_err();
        assert!(errors.has_field("notes"));

        draft.notes = Some("é".repeat(500));
        let content = draft.into_content().unwrap();
        assert_eq!(content.notes.unwrap().chars().count(), 500);
    }

    #[test]
    fn notes_limit_applies_to_the_trimmed_text() {
        let (mut draft, _) = complete(Habit::SleepEarly);
        draft.notes = Some(format!("{}   ", "a".repeat(499)));
        let content = draft.into_content().unwrap();
        assert_eq!(content.notes.unwrap().chars().count(), 499);
    }

    #[test]
    fn blank_notes_become_absent() {
        let (mut draft, _) = complete(Habit::SleepEarly);
        draft.notes = Some("   ".into());
        assert_eq!(draft.into_content().unwrap().notes, None);
    }

    #[test]
    fn switching_habit_clears_the_old_payload() {
        let (wake, _) = complete(Habit::WakeEarly);
        let edit = EntryDraft {
            habit: Some("sleep_early".into()),
            ..EntryDraft::default()
        };

        let merged = wake.clone().merge(edit);
        assert_eq!(merged.time, None);
        let errors = merged.into_content().unwrap_err();
        assert!(errors.has_field("time"));

        let edit = EntryDraft {
            habit: Some("sleep_early".into()),
            time: Some("21:00".into()),
            ..EntryDraft::default()
        };
        let content = wake.merge(edit).into_content().unwrap();
        assert_eq!(
            content.detail,
            HabitDetail::SleepEarly {
                time: "21:00".parse().unwrap()
            }
        );
        assert_eq!(content.student_id, "S12345");
    }

    #[test]
    fn merge_keeps_student_id() {
        let (draft, _) = complete(Habit::HealthyEating);
        let edit = EntryDraft {
            student_id: Some("S99999".into()),
            menu_description: Some("Bubur ayam".into()),
            ..EntryDraft::default()
        };
        let content = draft.merge(edit).into_content().unwrap();
        assert_eq!(content.student_id, "S12345");
    }

    #[test]
    fn content_converts_back_to_an_equivalent_draft() {
        for habit in Habit::ALL {
            let (draft, _) = complete(habit);
            let content = draft.into_content().unwrap();
            let again = EntryDraft::from(&content).into_content().unwrap();
            assert_eq!(again, content);
        }
    }
}
