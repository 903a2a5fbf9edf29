use std::ops::{Index, IndexMut};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use strum::{EnumIter, IntoEnumIterator};
use typed_builder::TypedBuilder;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, EnumIter, strum::Display)]
pub enum Day {
    Friday,
    Saturday,
    Sunday,
}
impl Day {
    /// Key used in the agenda file and in artifact file names.
    pub fn key(self) -> &'static str {
        match self {
            Day::Friday => "friday",
            Day::Saturday => "saturday",
            Day::Sunday => "sunday",
        }
    }

    /// Text of the day tab on the agenda page.
    pub fn tab_label(self) -> &'static str {
        match self {
            Day::Friday => "FRIDAY",
            Day::Saturday => "SATURDAY",
            Day::Sunday => "SUNDAY",
        }
    }

    /// Guesses which day a page is showing from its visible text.
    /// Later days are checked first.
    pub fn shown_in(page_text: &str) -> Option<Day> {
        Day::iter()
            .rev()
            .find(|day| page_text.contains(day.tab_label()))
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ByDay<T> {
    #[serde(default)]
    pub friday: T,
    #[serde(default)]
    pub saturday: T,
    #[serde(default)]
    pub sunday: T,
}
impl<T> Index<Day> for ByDay<T> {
    type Output = T;
    fn index(&self, day: Day) -> &T {
        match day {
            Day::Friday => &self.friday,
            Day::Saturday => &self.saturday,
            Day::Sunday => &self.sunday,
        }
    }
}
impl<T> IndexMut<Day> for ByDay<T> {
    fn index_mut(&mut self, day: Day) -> &mut T {
        match day {
            Day::Friday => &mut self.friday,
            Day::Saturday => &mut self.saturday,
            Day::Sunday => &mut self.sunday,
        }
    }
}

pub type Schedule = ByDay<Vec<Event>>;

impl Schedule {
    pub fn total_events(&self) -> usize {
        Day::iter().map(|day| self[day].len()).sum()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Break,
    Social,
}

/// A schedule entry inferred from page text. Every field may be missing.
#[skip_serializing_none]
#[derive(Clone, PartialEq, Eq, Debug, Default, TypedBuilder, Serialize, Deserialize)]
pub struct Event {
    #[builder(default, setter(strip_option, into))]
    pub time: Option<String>,
    #[builder(default, setter(strip_option, into))]
    pub duration: Option<String>,
    #[builder(default, setter(strip_option, into))]
    pub title: Option<String>,
    #[builder(default, setter(strip_option, into))]
    pub location: Option<String>,
    #[builder(default, setter(strip_option))]
    pub speakers: Option<Vec<String>>,
    #[builder(default, setter(strip_option, into))]
    pub description: Option<String>,
    #[serde(rename = "type")]
    #[builder(default, setter(strip_option))]
    pub kind: Option<EventKind>,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Metadata {
    pub event: String,
    pub dates: ByDay<String>,
    pub scraped_at: DateTime<Utc>,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct AgendaFile {
    pub metadata: Metadata,
    #[serde(default)]
    pub schedule: Schedule,
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::{AgendaFile, ByDay, Day, Event, EventKind, Metadata, Schedule};

    #[test]
    fn event_omits_missing_fields() {
        let event = Event::builder()
            .time("10:00 AM")
            .title("AFTERNOON BREAK")
            .kind(EventKind::Break)
            .build();
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"time": "10:00 AM", "title": "AFTERNOON BREAK", "type": "break"})
        );
    }

    #[test]
    fn agenda_file_tolerates_missing_days() {
        let value = json!({
            "metadata": {
                "event": "Open Sauce 2025",
                "dates": {"friday": "July 18, 2025"},
                "scraped_at": "2025-07-01T12:00:00Z"
            },
            "schedule": {
                "saturday": [{"time": "1:00 PM", "title": "Could AI Make This Panel?"}]
            }
        });
        let agenda: AgendaFile = serde_json::from_value(value).unwrap();
        assert_eq!(
            agenda.metadata,
            Metadata {
                event: "Open Sauce 2025".to_owned(),
                dates: ByDay {
                    friday: "July 18, 2025".to_owned(),
                    ..Default::default()
                },
                scraped_at: Utc.with_ymd_and_hms(2025, 7, 1, 12, 0, 0).unwrap(),
            }
        );
        assert!(agenda.schedule.friday.is_empty());
        assert_eq!(agenda.schedule[Day::Saturday].len(), 1);
        assert_eq!(agenda.schedule.total_events(), 1);
    }

    #[test]
    fn day_shown_prefers_later_days() {
        assert_eq!(Day::shown_in("FRIDAY SATURDAY"), Some(Day::Saturday));
        assert_eq!(Day::shown_in("... SUNDAY ... FRIDAY"), Some(Day::Sunday));
        assert_eq!(Day::shown_in("Friday"), None);
    }

    #[test]
    fn schedule_is_indexed_by_day() {
        let mut schedule = Schedule::default();
        schedule[Day::Sunday].push(Event::default());
        assert_eq!(schedule.sunday.len(), 1);
        assert_eq!(Day::Sunday.to_string(), "Sunday");
        assert_eq!(Day::Sunday.key(), "sunday");
    }
}
