//! Infers event records from an agenda page that has no reliable markup.
//!
//! Every element whose text mentions a clock time is a candidate. The title is heading-like
//! text found next to it or among its ancestors' children, and speakers are whatever lines of the
//! surrounding block are left over once time, title and stage are removed.

use std::collections::HashSet;

use itertools::Itertools;
use log::debug;
use regex::Regex;
use scraper::{ElementRef, Html};

use crate::schema::Event;

/// Elements with more children than this are treated as layout containers.
const MAX_CHILD_ELEMENTS: usize = 5;
/// How many ancestors are inspected when looking for a title.
const MAX_TITLE_CLIMB: usize = 5;

fn clock_time() -> &'static Regex {
    regex!(r"(?i)(?-u:\b)[0-9]{1,2}:[0-9]{2}\s*(AM|PM)(?-u:\b)")
}

fn wholly_parenthesized() -> &'static Regex {
    regex!(r"^\(.*\)$")
}

pub fn extract_events(html: &Html) -> Vec<Event> {
    let mut seen_texts = HashSet::new();
    let events = html
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|&element| child_element_count(element) <= MAX_CHILD_ELEMENTS)
        .filter_map(|element| {
            let text = trimmed_text(element);
            if !seen_texts.insert(text.clone()) {
                return None;
            }
            infer_event(element, &text)
        })
        .collect_vec();
    debug!("{} candidate events before deduplication", events.len());
    events
        .into_iter()
        .unique_by(|event| event.title.clone())
        .collect()
}

fn infer_event(element: ElementRef, text: &str) -> Option<Event> {
    let time = clock_time().find(text)?.as_str();
    let title = find_title(element, text)?;
    let duration = regex!(r"(?i)\(([0-9]+)\s*mins?\)")
        .find(text)
        .map(|m| m.as_str().to_owned());
    let location = regex!(r"(?i)(?-u:\b)(MAIN\s*STAGE|SECOND\s*STAGE|WORKSHOP|STAGE)(?-u:\b)")
        .find(text)
        .map(|m| m.as_str().to_owned());
    let speakers = find_speakers(element, time, &title, location.as_deref());
    Some(Event {
        time: Some(time.to_owned()),
        duration,
        title: Some(title),
        location,
        speakers,
        ..Default::default()
    })
}

/// Climbs one level at a time, testing the next sibling and then the parent's children.
/// A next-sibling match ends the search; a match among the parent's children is kept but can
/// be replaced by one found further up.
fn find_title(element: ElementRef, text: &str) -> Option<String> {
    let mut title = None;
    let mut current = Some(element);
    for _ in 0..MAX_TITLE_CLIMB {
        let Some(node) = current else { break };
        if let Some(next) = node.next_siblings().find_map(ElementRef::wrap) {
            let next_text = trimmed_text(next);
            if is_title_like(&next_text) {
                return Some(next_text);
            }
        }
        let parent = node.parent().and_then(ElementRef::wrap);
        if let Some(parent) = parent {
            if let Some(found) = parent
                .children()
                .filter_map(ElementRef::wrap)
                .map(trimmed_text)
                .find(|sibling_text| sibling_text != text && is_title_like(sibling_text))
            {
                title = Some(found);
            }
        }
        current = parent;
    }
    title
}

fn is_title_like(text: &str) -> bool {
    let len = text.chars().count();
    10 < len && len < 200 && !clock_time().is_match(text) && !wholly_parenthesized().is_match(text)
}

fn find_speakers(
    element: ElementRef,
    time: &str,
    title: &str,
    location: Option<&str>,
) -> Option<Vec<String>> {
    let parent_text = element
        .parent()
        .and_then(ElementRef::wrap)
        .map(|parent| parent.text().collect::<String>())
        .unwrap_or_default();
    let mut rest = parent_text.replacen(time, "", 1).replacen(title, "", 1);
    if let Some(location) = location {
        rest = rest.replacen(location, "", 1);
    }
    let speakers = rest
        .split('\n')
        .map(str::trim)
        .filter(|line| is_speaker_like(line))
        .map(str::to_owned)
        .collect_vec();
    (!speakers.is_empty()).then_some(speakers)
}

fn is_speaker_like(line: &str) -> bool {
    let len = line.chars().count();
    2 < len
        && len < 50
        && !wholly_parenthesized().is_match(line)
        && !regex!(r"[0-9]{1,2}:[0-9]{2}").is_match(line)
        && !regex!(r"(?i)^(FRIDAY|SATURDAY|SUNDAY|DAY [0-9]|OPEN SAUCE)").is_match(line)
}

fn trimmed_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_owned()
}

fn child_element_count(element: ElementRef) -> usize {
    element
        .children()
        .filter(|child| child.value().is_element())
        .count()
}
