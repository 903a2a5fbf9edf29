#[macro_use]
pub mod macros;

pub mod browser;
pub mod clean;
pub mod config;
pub mod extract;
pub mod fixups;
pub mod fs_json_util;
pub mod schema;
pub mod scrape;
