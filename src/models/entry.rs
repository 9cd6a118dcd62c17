use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::models::draft::{EntryDraft, ValidationErrors};

/// The seven daily habits a student can journal against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Habit {
    WakeEarly,
    Worship,
    Exercise,
    HealthyEating,
    LovesLearning,
    SocialEngagement,
    SleepEarly,
}

impl Habit {
    pub const ALL: [Habit; 7] = [
        Habit::WakeEarly,
        Habit::Worship,
        Habit::Exercise,
        Habit::HealthyEating,
        Habit::LovesLearning,
        Habit::SocialEngagement,
        Habit::SleepEarly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Habit::WakeEarly => "wake_early",
            Habit::Worship => "worship",
            Habit::Exercise => "exercise",
            Habit::HealthyEating => "healthy_eating",
            Habit::LovesLearning => "loves_learning",
            Habit::SocialEngagement => "social_engagement",
            Habit::SleepEarly => "sleep_early",
        }
    }

    /// Label shown in exports and on the admin dashboard.
    pub fn display_name(&self) -> &'static str {
        match self {
            Habit::WakeEarly => "Bangun Pagi",
            Habit::Worship => "Beribadah",
            Habit::Exercise => "Berolahraga",
            Habit::HealthyEating => "Makan Sehat",
            Habit::LovesLearning => "Gemar Belajar",
            Habit::SocialEngagement => "Bermasyarakat",
            Habit::SleepEarly => "Tidur Cepat",
        }
    }
}

impl fmt::Display for Habit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Habit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Habit::ALL
            .into_iter()
            .find(|h| h.as_str() == s)
            .ok_or_else(|| format!("unknown habit '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Religion {
    Islam,
    Christian,
    Catholic,
    Hindu,
    Buddhist,
    Confucian,
    Other,
}

impl Religion {
    pub const ALL: [Religion; 7] = [
        Religion::Islam,
        Religion::Christian,
        Religion::Catholic,
        Religion::Hindu,
        Religion::Buddhist,
        Religion::Confucian,
        Religion::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Religion::Islam => "Islam",
            Religion::Christian => "Christian",
            Religion::Catholic => "Catholic",
            Religion::Hindu => "Hindu",
            Religion::Buddhist => "Buddhist",
            Religion::Confucian => "Confucian",
            Religion::Other => "Other",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Religion::Islam => "Islam",
            Religion::Christian => "Kristen",
            Religion::Catholic => "Katolik",
            Religion::Hindu => "Hindu",
            Religion::Buddhist => "Buddha",
            Religion::Confucian => "Konghucu",
            Religion::Other => "Lainnya",
        }
    }
}

impl FromStr for Religion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Religion::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("unknown religion '{s}'"))
    }
}

/// The five daily prayers, only meaningful for Islam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrayerType {
    Dawn,
    Noon,
    Afternoon,
    Sunset,
    Night,
}

impl PrayerType {
    pub const ALL: [PrayerType; 5] = [
        PrayerType::Dawn,
        PrayerType::Noon,
        PrayerType::Afternoon,
        PrayerType::Sunset,
        PrayerType::Night,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrayerType::Dawn => "dawn",
            PrayerType::Noon => "noon",
            PrayerType::Afternoon => "afternoon",
            PrayerType::Sunset => "sunset",
            PrayerType::Night => "night",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PrayerType::Dawn => "Subuh",
            PrayerType::Noon => "Dzuhur",
            PrayerType::Afternoon => "Ashar",
            PrayerType::Sunset => "Maghrib",
            PrayerType::Night => "Isya",
        }
    }
}

impl FromStr for PrayerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PrayerType::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown prayer type '{s}'"))
    }
}

/// Wall-clock time with minute precision, serialized as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    pub fn new(time: NaiveTime) -> Self {
        Self(time)
    }

    pub fn time(&self) -> NaiveTime {
        self.0
    }
}

impl FromStr for ClockTime {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s.trim(), "%H:%M").map(Self)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// How a worship entry was observed. Prayers are recorded for Islam, a free
/// text activity for every other religion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WorshipPractice {
    PrayerType(PrayerType),
    WorshipActivity(String),
}

/// Habit-specific payload. One variant per habit, each carrying only the
/// fields that habit records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "habit", rename_all = "snake_case")]
pub enum HabitDetail {
    WakeEarly {
        time: ClockTime,
    },
    Worship {
        time: ClockTime,
        practice: WorshipPractice,
    },
    #[serde(rename_all = "camelCase")]
    Exercise {
        start_time: ClockTime,
        end_time: ClockTime,
    },
    #[serde(rename_all = "camelCase")]
    HealthyEating {
        menu_description: String,
    },
    #[serde(rename_all = "camelCase")]
    LovesLearning {
        material_title: String,
        information_learned: String,
    },
    SocialEngagement {
        activity: String,
        reflection: String,
    },
    SleepEarly {
        time: ClockTime,
    },
}

impl HabitDetail {
    pub fn habit(&self) -> Habit {
        match self {
            HabitDetail::WakeEarly { .. } => Habit::WakeEarly,
            HabitDetail::Worship { .. } => Habit::Worship,
            HabitDetail::Exercise { .. } => Habit::Exercise,
            HabitDetail::HealthyEating { .. } => Habit::HealthyEating,
            HabitDetail::LovesLearning { .. } => Habit::LovesLearning,
            HabitDetail::SocialEngagement { .. } => Habit::SocialEngagement,
            HabitDetail::SleepEarly { .. } => Habit::SleepEarly,
        }
    }
}

/// The student-authored part of an entry, as accepted by validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryContent {
    pub student_id: String,
    pub date: NaiveDate,
    pub religion: Option<Religion>,
    pub detail: HabitDetail,
    pub notes: Option<String>,
}

impl EntryContent {
    pub fn habit(&self) -> Habit {
        self.detail.habit()
    }
}

/// A persisted journal entry.
///
/// On the wire this is a flat camelCase object with `habit` as the tag and
/// only the chosen habit's payload fields present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "EntryRecord", try_from = "EntryRecord")]
pub struct JournalEntry {
    pub id: Uuid,
    pub content: EntryContent,
    pub validated_by_teacher: bool,
    pub validated_by_parent: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JournalEntry {
    pub fn new(id: Uuid, content: EntryContent, now: DateTime<Utc>) -> Self {
        Self {
            id,
            content,
            validated_by_teacher: false,
            validated_by_parent: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn habit(&self) -> Habit {
        self.content.habit()
    }

    pub fn student_id(&self) -> &str {
        &self.content.student_id
    }

    pub fn date(&self) -> NaiveDate {
        self.content.date
    }

    /// Both validators have confirmed the entry.
    pub fn is_fully_validated(&self) -> bool {
        self.validated_by_teacher && self.validated_by_parent
    }
}

/// Flat serde shape of [`JournalEntry`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntryRecord {
    id: Uuid,
    #[serde(flatten)]
    draft: EntryDraft,
    #[serde(default)]
    validated_by_teacher: bool,
    #[serde(default)]
    validated_by_parent: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<JournalEntry> for EntryRecord {
    fn from(entry: JournalEntry) -> Self {
        Self {
            id: entry.id,
            draft: EntryDraft::from(&entry.content),
            validated_by_teacher: entry.validated_by_teacher,
            validated_by_parent: entry.validated_by_parent,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

impl TryFrom<EntryRecord> for JournalEntry {
    type Error = ValidationErrors;

    fn try_from(record: EntryRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: record.id,
            content: record.draft.into_content()?,
            validated_by_teacher: record.validated_by_teacher,
            validated_by_parent: record.validated_by_parent,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn exercise_entry() -> JournalEntry {
        let content = EntryContent {
            student_id: "S12345".into(),
            date: NaiveDate::from_ymd_opt(2025, 5, 19).unwrap(),
            religion: None,
            detail: HabitDetail::Exercise {
                start_time: "07:00".parse().unwrap(),
                end_time: "07:30".parse().unwrap(),
            },
            notes: Some("Lari pagi".into()),
        };
        JournalEntry::new(Uuid::nil(), content, Utc::now())
    }

    #[test]
    fn entry_serializes_as_flat_tagged_object() {
        let value = serde_json::to_value(exercise_entry()).unwrap();

        assert_eq!(value["habit"], json!("exercise"));
        assert_eq!(value["studentId"], json!("S12345"));
        assert_eq!(value["date"], json!("2025-05-19"));
        assert_eq!(value["startTime"], json!("07:00"));
        assert_eq!(value["endTime"], json!("07:30"));
        assert_eq!(value["validatedByTeacher"], json!(false));
        assert!(value.get("time").is_none());
        assert!(value.get("menuDescription").is_none());
        assert!(value.get("religion").is_none());
    }

    #[test]
    fn entry_json_round_trips() {
        let entry = exercise_entry();
        let text = serde_json::to_string(&entry).unwrap();
        let back: JournalEntry = serde_json::from_str(&text).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn detail_payload_keeps_worship_practice() {
        let detail = HabitDetail::Worship {
            time: "04:45".parse().unwrap(),
            practice: WorshipPractice::PrayerType(PrayerType::Dawn),
        };
        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["habit"], json!("worship"));
        assert_eq!(value["practice"]["prayerType"], json!("dawn"));

        let back: HabitDetail = serde_json::from_value(value).unwrap();
        assert_eq!(back, detail);
    }

    #[test]
    fn habit_names_parse_back() {
        for habit in Habit::ALL {
            assert_eq!(habit.as_str().parse::<Habit>().unwrap(), habit);
        }
        assert!("bangun_pagi".parse::<Habit>().is_err());
    }

    #[test]
    fn clock_time_rejects_bad_input() {
        assert!("7:5x".parse::<ClockTime>().is_err());
        assert!("25:00".parse::<ClockTime>().is_err());
        assert_eq!("06:05".parse::<ClockTime>().unwrap().to_string(), "06:05");
    }
}
