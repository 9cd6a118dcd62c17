use crate::models::entry::{HabitDetail, WorshipPractice};

/// One-line summary of a habit payload, shared by every export format.
pub fn describe(detail: &HabitDetail) -> String {
    match detail {
        HabitDetail::WakeEarly { time } => format!("Jam Bangun: {time}"),
        HabitDetail::Worship { time, practice } => match practice {
            WorshipPractice::PrayerType(prayer) => {
                format!("{} pada {time}", prayer.display_name())
            }
            WorshipPractice::WorshipActivity(activity) => format!("{activity} pada {time}"),
        },
        HabitDetail::Exercise {
            start_time,
            end_time,
        } => format!("{start_time} - {end_time}"),
        HabitDetail::HealthyEating { menu_description } => menu_description.clone(),
        HabitDetail::LovesLearning {
            material_title,
            information_learned,
        } => format!("{material_title}: {information_learned}"),
        HabitDetail::SocialEngagement {
            activity,
            reflection,
        } => format!("{activity}: {reflection}"),
        HabitDetail::SleepEarly { time } => format!("Jam Tidur: {time}"),
    }
}
