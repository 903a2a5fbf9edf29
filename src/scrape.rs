use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use log::{error, info, warn};
use scraper::Html;
use strum::IntoEnumIterator;

use crate::{
    config::Config,
    extract::extract_events,
    schema::{AgendaFile, Day, Event, Metadata, Schedule},
};

/// What the scraper needs from a rendered agenda page.
pub trait AgendaPage {
    /// Switches the page to `day`. Returns `false` when no day tab could be activated.
    fn select_day(&self, day: Day) -> bool;
    fn content(&self) -> anyhow::Result<String>;
    fn visible_text(&self) -> anyhow::Result<String>;
    fn screenshot(&self, path: &Path) -> anyhow::Result<()>;
}

/// Files written next to the agenda for each day that was scraped.
#[derive(Clone, Debug)]
pub struct Artifacts {
    pub dir: PathBuf,
    pub file_prefix: String,
    pub screenshots: bool,
    pub html: bool,
}
impl Artifacts {
    pub fn path(&self, day: Day, extension: &str) -> PathBuf {
        self.dir
            .join(format!("{}-{}.{extension}", self.file_prefix, day.key()))
    }

    fn save<P: AgendaPage>(&self, page: &P, day: Day, content: &str) -> anyhow::Result<()> {
        if self.screenshots {
            let path = self.path(day, "png");
            page.screenshot(&path)
                .with_context(|| format!("While taking a screenshot to {path:?}"))?;
        }
        if self.html {
            fs_err::write(self.path(day, "html"), content)?;
        }
        Ok(())
    }
}

/// Scrapes every day. Errors are logged and whatever was collected so far is kept.
pub fn scrape_schedule<P: AgendaPage>(page: &P, artifacts: &Artifacts) -> Schedule {
    let mut schedule = Schedule::default();
    if let Err(e) = collect_days(page, artifacts, &mut schedule) {
        error!("Error during scraping: {e:?}");
    }
    schedule
}

fn collect_days<P: AgendaPage>(
    page: &P,
    artifacts: &Artifacts,
    schedule: &mut Schedule,
) -> anyhow::Result<()> {
    for day in Day::iter() {
        info!("Extracting {day} schedule...");
        if !page.select_day(day) {
            warn!("Could not navigate to {day} tab");
            continue;
        }
        let content = page.content()?;
        let events = extract_events(&Html::parse_document(&content));
        info!("Found {} events for {day}", events.len());
        schedule[day] = events;
        artifacts.save(page, day, &content)?;
    }

    if schedule.total_events() == 0 {
        info!("No events found via tabs. Extracting all visible events...");
        let events = extract_events(&Html::parse_document(&page.content()?));
        let found = events.len();
        match Day::shown_in(&page.visible_text()?) {
            Some(day) => {
                info!("The page appears to show {day}");
                schedule[day] = events;
            }
            None => warn!("Could not tell which day the page shows; discarding {found} events"),
        }
        info!("Found {found} events in visible content");
    }
    Ok(())
}

pub fn build_agenda(config: &Config, schedule: Schedule) -> AgendaFile {
    AgendaFile {
        metadata: Metadata {
            event: config.event_name.clone(),
            dates: config.dates.clone(),
            scraped_at: Utc::now(),
        },
        schedule,
    }
}

pub fn log_summary(agenda: &AgendaFile) {
    info!("Summary:");
    for day in Day::iter() {
        info!("- {day}: {} events", agenda.schedule[day].len());
    }
    info!("- Total: {} events", agenda.schedule.total_events());
    for day in Day::iter() {
        if let Some(event) = agenda.schedule[day].first() {
            info!("Sample {day} event:\n{}", pretty(event));
        }
    }
}

fn pretty(event: &Event) -> String {
    serde_json::to_string_pretty(event).unwrap_or_else(|e| format!("<unprintable: {e}>"))
}
