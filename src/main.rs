use std::path::PathBuf;

use agenda_scraping::{
    browser::BrowserPage,
    clean::clean_agenda,
    config::Config,
    fixups::load_fixups,
    fs_json_util::{read_json, read_toml, write_json},
    schema::{AgendaFile, Day},
    scrape::{build_agenda, log_summary, scrape_schedule, Artifacts},
};
use clap::{Args, Parser, Subcommand};
use log::info;
use strum::IntoEnumIterator;

#[derive(Parser)]
struct Opts {
    /// TOML file overriding the built-in settings.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scrape the agenda page into the raw agenda file.
    Scrape(ScrapeOpts),
    /// Clean a raw agenda file.
    Clean(CleanOpts),
    /// Scrape, then clean.
    Run(RunOpts),
}

#[derive(Args)]
struct ScrapeOpts {
    #[arg(long)]
    raw_output: Option<PathBuf>,
    /// Show the browser window.
    #[arg(long)]
    headful: bool,
    #[arg(long)]
    no_screenshots: bool,
    /// Also save each day's page HTML next to the screenshots.
    #[arg(long)]
    save_html: bool,
}

#[derive(Args)]
struct CleanOpts {
    #[arg(long)]
    raw_input: Option<PathBuf>,
    #[command(flatten)]
    target: CleanTarget,
}

#[derive(Args)]
struct CleanTarget {
    #[arg(long)]
    cleaned_output: Option<PathBuf>,
    /// Fixup table replacing the built-in one.
    #[arg(long)]
    fixups: Option<PathBuf>,
}

#[derive(Args)]
struct RunOpts {
    #[command(flatten)]
    scrape: ScrapeOpts,
    #[command(flatten)]
    target: CleanTarget,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opts = Opts::parse();
    let config: Config = match &opts.config {
        Some(path) => read_toml(path)?,
        None => Config::default(),
    };
    match &opts.command {
        Command::Scrape(scrape_opts) => {
            scrape(&config, scrape_opts)?;
        }
        Command::Clean(clean_opts) => {
            let raw_path = clean_opts
                .raw_input
                .as_ref()
                .unwrap_or(&config.output.raw_path);
            let raw = read_json(raw_path)?;
            info!("Loaded {raw_path:?}");
            clean(&config, &clean_opts.target, raw)?;
        }
        Command::Run(run_opts) => {
            let raw = scrape(&config, &run_opts.scrape)?;
            clean(&config, &run_opts.target, raw)?;
        }
    }
    Ok(())
}

fn scrape(config: &Config, opts: &ScrapeOpts) -> anyhow::Result<AgendaFile> {
    let mut browser_config = config.browser.clone();
    if opts.headful {
        browser_config.headless = false;
    }
    let artifacts = Artifacts {
        dir: config.output.artifacts_dir.clone(),
        file_prefix: config.output.file_prefix.clone(),
        screenshots: config.output.screenshots && !opts.no_screenshots,
        html: opts.save_html,
    };
    fs_err::create_dir_all(&artifacts.dir)?;

    let schedule = {
        let page = BrowserPage::open(&config.agenda_url, &browser_config)?;
        let schedule = scrape_schedule(&page, &artifacts);
        if !browser_config.headless {
            page.linger();
        }
        schedule
    };

    let agenda = build_agenda(config, schedule);
    let raw_path = opts.raw_output.as_ref().unwrap_or(&config.output.raw_path);
    write_json(raw_path, &agenda)?;
    info!("Scraping complete! Data saved to {raw_path:?}");
    log_summary(&agenda);
    Ok(agenda)
}

fn clean(config: &Config, target: &CleanTarget, raw: AgendaFile) -> anyhow::Result<()> {
    info!("Cleaning agenda data...");
    let fixups = load_fixups(target.fixups.as_deref())?;
    let cleaned = clean_agenda(raw, &fixups);
    let cleaned_path = target
        .cleaned_output
        .as_ref()
        .unwrap_or(&config.output.cleaned_path);
    write_json(cleaned_path, &cleaned)?;
    info!("Data cleaned and saved to {cleaned_path:?}");
    info!("Cleaned event counts:");
    for day in Day::iter() {
        info!("- {day}: {} events", cleaned.schedule[day].len());
    }
    Ok(())
}
