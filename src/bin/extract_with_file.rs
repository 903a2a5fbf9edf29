use std::path::PathBuf;

use agenda_scraping::{clean::clean_event, extract::extract_events};
use clap::Parser;
use scraper::Html;

/// Runs event extraction on a saved agenda page.
#[derive(Parser)]
struct Opts {
    input_file: PathBuf,
    /// Also show what cleaning makes of each event.
    #[arg(long)]
    clean: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opts = Opts::parse();
    let html = Html::parse_document(&fs_err::read_to_string(&opts.input_file)?);
    let events = extract_events(&html);
    println!("{} events", events.len());
    for event in events {
        println!("    {event:?}");
        if opts.clean {
            match clean_event(event) {
                Some(cleaned) => println!("        => {cleaned:?}"),
                None => println!("        => dropped"),
            }
        }
    }
    Ok(())
}
