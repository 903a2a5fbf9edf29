use std::path::Path;

use anyhow::Context;
use log::{debug, info};
use serde::Deserialize;
use strum::IntoEnumIterator;

use crate::{
    fs_json_util::read_toml,
    schema::{ByDay, Day, Event, EventKind, Schedule},
};

pub const DEFAULT_FIXUPS: &str = include_str!("fixups.toml");

pub type Fixups = ByDay<Vec<Fixup>>;

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum TitleMatcher {
    Is(String),
    Contains(String),
}
impl TitleMatcher {
    pub fn matches(&self, title: &str) -> bool {
        match self {
            TitleMatcher::Is(expected) => title == expected,
            TitleMatcher::Contains(part) => title.contains(part.as_str()),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Deserialize)]
#[serde(try_from = "FixupEntry")]
pub struct Fixup {
    pub matcher: TitleMatcher,
    pub title: Option<String>,
    pub description: Option<String>,
    pub speakers: Option<Vec<String>>,
    pub kind: Option<EventKind>,
}
impl Fixup {
    /// Overwrites the fields this fixup carries; others are left untouched.
    pub fn apply(&self, event: &mut Event) {
        if let Some(title) = &self.title {
            event.title = Some(title.clone());
        }
        if let Some(description) = &self.description {
            event.description = Some(description.clone());
        }
        if let Some(speakers) = &self.speakers {
            event.speakers = Some(speakers.clone());
        }
        if let Some(kind) = self.kind {
            event.kind = Some(kind);
        }
    }
}

/// On-disk form of a fixup, before the matcher is checked.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixupEntry {
    title_is: Option<String>,
    title_contains: Option<String>,
    title: Option<String>,
    description: Option<String>,
    speakers: Option<Vec<String>>,
    #[serde(rename = "type")]
    kind: Option<EventKind>,
}

#[derive(PartialEq, Eq, Debug, thiserror::Error)]
pub enum FixupError {
    #[error("A fixup needs either `title_is` or `title_contains`")]
    MissingMatcher,
    #[error("A fixup cannot have both `title_is` ({0:?}) and `title_contains` ({1:?})")]
    AmbiguousMatcher(String, String),
}

impl TryFrom<FixupEntry> for Fixup {
    type Error = FixupError;

    fn try_from(entry: FixupEntry) -> Result<Self, FixupError> {
        let matcher = match (entry.title_is, entry.title_contains) {
            (Some(exact), None) => TitleMatcher::Is(exact),
            (None, Some(part)) => TitleMatcher::Contains(part),
            (None, None) => return Err(FixupError::MissingMatcher),
            (Some(exact), Some(part)) => return Err(FixupError::AmbiguousMatcher(exact, part)),
        };
        Ok(Fixup {
            matcher,
            title: entry.title,
            description: entry.description,
            speakers: entry.speakers,
            kind: entry.kind,
        })
    }
}

pub fn parse_fixups(text: &str) -> anyhow::Result<Fixups> {
    toml::from_str(text).context("While parsing the fixup table")
}

/// Reads the fixup table at `path`, or the built-in one when no path is given.
pub fn load_fixups(path: Option<&Path>) -> anyhow::Result<Fixups> {
    let fixups = match path {
        Some(path) => read_toml(path)?,
        None => parse_fixups(DEFAULT_FIXUPS)?,
    };
    info!(
        "Loaded {} fixups",
        Day::iter().map(|day| fixups[day].len()).sum::<usize>()
    );
    Ok(fixups)
}

/// Every fixup of a day is tried against every event of that day, in declared order.
/// A fixup sees the title as left by the fixups before it.
pub fn apply_fixups(schedule: &mut Schedule, fixups: &Fixups) {
    for day in Day::iter() {
        for event in &mut schedule[day] {
            for fixup in &fixups[day] {
                if fixup.matcher.matches(event.title.as_deref().unwrap_or_default()) {
                    debug!("Fixing {day} event {:?}", event.title);
                    fixup.apply(event);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{apply_fixups, parse_fixups, TitleMatcher, DEFAULT_FIXUPS};
    use crate::schema::{Event, EventKind, Schedule};

    fn titled(title: &str) -> Event {
        Event::builder().time("1:00 PM").title(title).build()
    }

    #[test]
    fn default_table_parses() {
        let fixups = parse_fixups(DEFAULT_FIXUPS).unwrap();
        assert_eq!(fixups.friday.len(), 4);
        assert_eq!(fixups.saturday.len(), 5);
        assert_eq!(fixups.sunday.len(), 5);
        assert_eq!(
            fixups.friday[0].matcher,
            TitleMatcher::Is("Schedule Overview".to_owned())
        );
        assert_eq!(fixups.friday[1].kind, Some(EventKind::Break));
    }

    #[test]
    fn matcher_is_required_and_unique() {
        let missing = parse_fixups("[[friday]]\ntitle = \"x\"\n").unwrap_err();
        assert!(format!("{missing:#}").contains("either `title_is` or `title_contains`"));
        let both =
            parse_fixups("[[friday]]\ntitle_is = \"a\"\ntitle_contains = \"b\"\n").unwrap_err();
        assert!(format!("{both:#}").contains("cannot have both"));
        assert!(parse_fixups("[[friday]]\ntitle_is = \"a\"\ncolour = \"red\"\n").is_err());
        assert!(parse_fixups("[[friyay]]\ntitle_is = \"a\"\n").is_err());
    }

    #[test]
    fn default_fixups_patch_known_events() {
        let fixups = parse_fixups(DEFAULT_FIXUPS).unwrap();
        let mut schedule = Schedule::default();
        schedule.friday = vec![
            titled("AFTERNOON BREAK"),
            titled("Industry Reception"),
            titled("Schedule Overview for the day"),
        ];
        schedule.saturday = vec![titled("Robotics and AnimatronicsWhat if")];
        schedule.sunday = vec![titled("Farmer Consulting"), titled("Lunch")];
        let untouched = schedule.sunday[1].clone();

        apply_fixups(&mut schedule, &fixups);

        assert_eq!(schedule.friday[0].kind, Some(EventKind::Break));
        assert_eq!(schedule.friday[1].kind, Some(EventKind::Social));
        // `title_is` needs the exact title.
        assert_eq!(schedule.friday[2].description, None);

        let robotics = &schedule.saturday[0];
        assert_eq!(robotics.title.as_deref(), Some("Robotics and Animatronics!"));
        assert_eq!(
            robotics.description.as_deref(),
            Some("What if the robots could move?")
        );
        assert_eq!(robotics.speakers.as_ref().map(Vec::len), Some(6));
        assert_eq!(robotics.time.as_deref(), Some("1:00 PM"));

        assert_eq!(
            schedule.sunday[0].description.as_deref(),
            Some("Two \"farmers\" and one farmer walk into a panel...")
        );
        assert_eq!(schedule.sunday[1], untouched);
    }

    #[test]
    fn later_fixups_see_earlier_titles() {
        let fixups = parse_fixups(
            r#"
[[sunday]]
title_contains = "Magic"
title = "Space Magic"

[[sunday]]
title_contains = "Space"
description = "matched after rename"
"#,
        )
        .unwrap();
        let mut schedule = Schedule::default();
        schedule.sunday = vec![titled("Movie Magic")];
        apply_fixups(&mut schedule, &fixups);
        assert_eq!(
            schedule.sunday[0].description.as_deref(),
            Some("matched after rename")
        );
    }
}
