//! Weekly opening hours for a pharmacy.
//!
//! Serialized as the backend expects:
//!
//! ```json
//! [{"day": "Monday", "isOpen": true, "openTime": "08:00", "closeTime": "20:00"}, ...]
//! ```

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// Errors found when validating [`WorkingHours`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkingHoursError {
    #[error("{day}: closing time must be after opening time")]
    CloseBeforeOpen { day: String },
    #[error("{day} appears more than once")]
    DuplicateDay { day: String },
    #[error("invalid time '{0}', expected HH:MM")]
    InvalidTime(String),
}

/// Opening hours for one day of the week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    #[serde(with = "weekday_name")]
    pub day: Weekday,
    pub is_open: bool,
    #[serde(with = "hhmm")]
    pub open_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub close_time: NaiveTime,
}

/// A week of [`DaySchedule`] entries, Monday first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkingHours(Vec<DaySchedule>);

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

fn default_open() -> NaiveTime {
    NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN)
}

fn default_close() -> NaiveTime {
    NaiveTime::from_hms_opt(20, 0, 0).unwrap_or(NaiveTime::MIN)
}

impl Default for WorkingHours {
    /// Every day open 08:00-20:00.
    fn default() -> Self {
        Self(
            WEEK.iter()
                .map(|&day| DaySchedule {
                    day,
                    is_open: true,
                    open_time: default_open(),
                    close_time: default_close(),
                })
                .collect(),
        )
    }
}

impl WorkingHours {
    /// Use an existing schedule, or the default week when it is empty.
    #[must_use]
    pub fn from_days(days: Vec<DaySchedule>) -> Self {
        if days.is_empty() {
            Self::default()
        } else {
            Self(days)
        }
    }

    #[must_use]
    pub fn days(&self) -> &[DaySchedule] {
        &self.0
    }

    fn day_mut(&mut self, day: Weekday) -> Option<&mut DaySchedule> {
        self.0.iter_mut().find(|d| d.day == day)
    }

    /// Flip a day between open and closed. Returns the new open state, or
    /// `None` if the day is not in the schedule.
    pub fn toggle(&mut self, day: Weekday) -> Option<bool> {
        let entry = self.day_mut(day)?;
        entry.is_open = !entry.is_open;
        Some(entry.is_open)
    }

    /// Set the opening time of a day. Returns `false` if the day is missing.
    pub fn set_open_time(&mut self, day: Weekday, time: NaiveTime) -> bool {
        let Some(entry) = self.day_mut(day) else {
            return false;
        };
        entry.open_time = time;
        true
    }

    /// Set the closing time of a day. Returns `false` if the day is missing.
    pub fn set_close_time(&mut self, day: Weekday, time: NaiveTime) -> bool {
        let Some(entry) = self.day_mut(day) else {
            return false;
        };
        entry.close_time = time;
        true
    }

    /// Whether the pharmacy is open on `day` at `time`.
    #[must_use]
    pub fn is_open_at(&self, day: Weekday, time: NaiveTime) -> bool {
        self.0
            .iter()
            .any(|d| d.day == day && d.is_open && d.open_time <= time && time < d.close_time)
    }

    /// Check that no day repeats and that every open day closes after it opens.
    ///
    /// # Errors
    ///
    /// Returns the first problem found, in schedule order.
    pub fn validate(&self) -> Result<(), WorkingHoursError> {
        let mut seen = Vec::with_capacity(self.0.len());
        for entry in &self.0 {
            if seen.contains(&entry.day) {
                return Err(WorkingHoursError::DuplicateDay {
                    day: weekday_name::full(entry.day).to_owned(),
                });
            }
            seen.push(entry.day);

            if entry.is_open && entry.close_time <= entry.open_time {
                return Err(WorkingHoursError::CloseBeforeOpen {
                    day: weekday_name::full(entry.day).to_owned(),
                });
            }
        }
        Ok(())
    }
}

/// Parse an `HH:MM` time as typed into a form.
///
/// # Errors
///
/// Returns `WorkingHoursError::InvalidTime` if the input is not `HH:MM`.
pub fn parse_time(input: &str) -> Result<NaiveTime, WorkingHoursError> {
    NaiveTime::parse_from_str(input.trim(), hhmm::FORMAT)
        .map_err(|_| WorkingHoursError::InvalidTime(input.to_owned()))
}

mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}

mod weekday_name {
    use chrono::Weekday;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const fn full(day: Weekday) -> &'static str {
        match day {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        }
    }

    #[allow(clippy::trivially_copy_pass_by_ref)] // serde `with` signature
    pub fn serialize<S: Serializer>(day: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(full(*day))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Weekday, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<Weekday>().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_default_week() {
        let hours = WorkingHours::default();
        assert_eq!(hours.days().len(), 7);
        assert_eq!(hours.days()[0].day, Weekday::Mon);
        assert_eq!(hours.days()[6].day, Weekday::Sun);
        assert!(hours.days().iter().all(|d| d.is_open));
        assert!(hours.validate().is_ok());
    }

    #[test]
    fn test_empty_schedule_uses_default() {
        assert_eq!(WorkingHours::from_days(vec![]), WorkingHours::default());
    }

    #[test]
    fn test_wire_format() {
        let hours = WorkingHours::default();
        let json = serde_json::to_value(&hours).unwrap();
        assert_eq!(
            json[0],
            serde_json::json!({
                "day": "Monday",
                "isOpen": true,
                "openTime": "08:00",
                "closeTime": "20:00"
            })
        );

        let parsed: WorkingHours = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, hours);
    }

    #[test]
    fn test_toggle_and_edit() {
        let mut hours = WorkingHours::default();
        assert_eq!(hours.toggle(Weekday::Sun), Some(false));
        assert!(!hours.is_open_at(Weekday::Sun, t(12, 0)));

        assert!(hours.set_open_time(Weekday::Mon, t(9, 30)));
        assert!(!hours.is_open_at(Weekday::Mon, t(9, 0)));
        assert!(hours.is_open_at(Weekday::Mon, t(9, 30)));
        assert!(!hours.is_open_at(Weekday::Mon, t(20, 0)));
    }

    #[test]
    fn test_validate_close_before_open() {
        let mut hours = WorkingHours::default();
        hours.set_close_time(Weekday::Wed, t(7, 0));
        assert_eq!(
            hours.validate(),
            Err(WorkingHoursError::CloseBeforeOpen {
                day: "Wednesday".to_string()
            })
        );

        // Closed days are not checked.
        hours.toggle(Weekday::Wed);
        assert!(hours.validate().is_ok());
    }

    #[test]
    fn test_validate_duplicate_day() {
        let mut days = WorkingHours::default().days().to_vec();
        days.push(days[0].clone());
        let hours = WorkingHours::from_days(days);
        assert!(matches!(
            hours.validate(),
            Err(WorkingHoursError::DuplicateDay { .. })
        ));
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("08:15").unwrap(), t(8, 15));
        assert!(parse_time("8am").is_err());
    }
}
