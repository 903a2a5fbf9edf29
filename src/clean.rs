//! Repairs the noise the extraction pass lets through: titles that are really stylesheet or
//! script fragments, navigation links picked up as speakers, and day banners glued onto
//! titles.

use log::{debug, info};
use strum::IntoEnumIterator;

use crate::{
    fixups::{apply_fixups, Fixups},
    schema::{AgendaFile, Day, Event, Schedule},
};

const CODE_MARKERS: &[&str] = &[
    "var elementskit",
    "#site-main",
    "padding:",
    "const ",
    "function",
];

const NON_SPEAKER_MARKERS: &[&str] = &[
    "BUY TICKETS",
    "Overview",
    "Featured Creators",
    "Exhibits",
    "SHOP",
    "Sponsor",
    "Privacy Policy",
    "!important",
    "const ",
    "©",
    "{",
    "}",
    "(",
];

pub fn clean_agenda(mut raw: AgendaFile, fixups: &Fixups) -> AgendaFile {
    let mut schedule = Schedule::default();
    for day in Day::iter() {
        let events = std::mem::take(&mut raw.schedule[day]);
        let before = events.len();
        schedule[day] = events.into_iter().filter_map(clean_event).collect();
        info!("{day}: kept {} of {before} events", schedule[day].len());
    }
    apply_fixups(&mut schedule, fixups);
    AgendaFile {
        metadata: raw.metadata,
        schedule,
    }
}

/// Returns `None` when the event is noise.
pub fn clean_event(mut event: Event) -> Option<Event> {
    if let Some(title) = &event.title {
        if is_code(title) {
            debug!("Dropping code fragment {title:?}");
            return None;
        }
    }

    if let Some(speakers) = event.speakers.take() {
        let speakers: Vec<_> = speakers.into_iter().filter(|s| is_speaker(s)).collect();
        if !speakers.is_empty() {
            event.speakers = Some(speakers);
        }
    }

    if let Some(title) = event.title.take() {
        let title = strip_date_banner(&title);
        match split_description(&title) {
            Some((title, description)) => {
                event.title = Some(title.trim().to_owned());
                if event.description.is_none() && description.chars().count() > 20 {
                    event.description = Some(description.to_owned());
                }
            }
            None => event.title = Some(title),
        }
    }

    match &event.title {
        Some(title) if title.chars().count() >= 3 => Some(event),
        _ => None,
    }
}

fn is_code(title: &str) -> bool {
    CODE_MARKERS.iter().any(|marker| title.contains(marker))
}

fn is_speaker(speaker: &str) -> bool {
    speaker.chars().count() < 50
        && !NON_SPEAKER_MARKERS
            .iter()
            .any(|marker| speaker.contains(marker))
        && !regex!(r"^[0-9]+\s*mins?$").is_match(speaker)
}

/// Removes weekday and month names, day-of-month numbers and the event's own banner text,
/// which the page renders right next to titles (e.g. `SaturdayJuly 19Open Sauce Day 1`).
fn strip_date_banner(title: &str) -> String {
    let title = regex!(r"Monday|Tuesday|Wednesday|Thursday|Friday|Saturday|Sunday")
        .replace_all(title, " ");
    let title = regex!(
        r"January|February|March|April|May|June|July|August|September|October|November|December"
    )
    .replace_all(&title, " ");
    let title = regex!(r"\s+[0-9]{1,2}\s+").replace_all(&title, " ");
    let title = title.replace("Open Sauce", "");
    let title = regex!(r"Day [0-9]").replace_all(&title, "");
    title.replace("Industry Day", "").trim().to_owned()
}

/// Splits `summary textDescription text` at the first lowercase-to-uppercase boundary.
/// Both the leading run and the boundary must lie beyond the tenth character.
fn split_description(title: &str) -> Option<(&str, &str)> {
    let head = regex!(r"^([^A-Z]+(?:[A-Z][a-z]+)*)").captures(title)?;
    if head[1].chars().count() <= 10 {
        return None;
    }
    let boundary = regex!(r"[a-z][A-Z]").find(title)?.start();
    if title[..boundary].chars().count() <= 10 {
        return None;
    }
    Some(title.split_at(boundary + 1))
}
