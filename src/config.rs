use std::{path::PathBuf, time::Duration};

use serde::Deserialize;
use serde_with::{serde_as, DurationMilliSeconds};
use url::Url;

use crate::schema::ByDay;

pub const AGENDA_URL: &str = "https://opensauce.com/agenda/";

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub agenda_url: Url,
    pub event_name: String,
    pub dates: ByDay<String>,
    pub browser: BrowserConfig,
    pub output: OutputConfig,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            agenda_url: Url::parse(AGENDA_URL).unwrap(),
            event_name: "Open Sauce 2025".to_owned(),
            dates: ByDay {
                friday: "July 18, 2025".to_owned(),
                saturday: "July 19, 2025".to_owned(),
                sunday: "July 20, 2025".to_owned(),
            },
            browser: BrowserConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

#[serde_as]
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrowserConfig {
    pub headless: bool,
    pub window_size: (u32, u32),
    pub remote_debugging_port: Option<u16>,
    /// Wait after the initial navigation so client-side rendering can finish.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "settle_after_load_ms")]
    pub settle_after_load: Duration,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "settle_after_click_ms")]
    pub settle_after_click: Duration,
    /// How long the page stays open after scraping, for visual review in headed mode.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "linger_before_close_ms")]
    pub linger_before_close: Duration,
    /// Elements at least this wide are taken for headings rather than tabs.
    pub max_tab_width: f64,
}
impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_size: (1920, 1080),
            remote_debugging_port: None,
            settle_after_load: Duration::from_millis(3000),
            settle_after_click: Duration::from_millis(2000),
            linger_before_close: Duration::from_millis(5000),
            max_tab_width: 200.,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub raw_path: PathBuf,
    pub cleaned_path: PathBuf,
    pub artifacts_dir: PathBuf,
    pub file_prefix: String,
    pub screenshots: bool,
}
impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            raw_path: "opensauce-agenda.json".into(),
            cleaned_path: "opensauce-agenda-cleaned.json".into(),
            artifacts_dir: ".".into(),
            file_prefix: "opensauce".to_owned(),
            screenshots: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::Config;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
event_name = "Open Sauce 2026"

[dates]
friday = "July 17, 2026"

[browser]
headless = false
settle_after_click_ms = 500
window_size = [1280, 720]
"#,
        )
        .unwrap();
        assert_eq!(config.event_name, "Open Sauce 2026");
        assert_eq!(config.dates.friday, "July 17, 2026");
        assert_eq!(config.dates.saturday, "");
        assert!(!config.browser.headless);
        assert_eq!(config.browser.window_size, (1280, 720));
        assert_eq!(config.browser.settle_after_click, Duration::from_millis(500));
        assert_eq!(config.browser.settle_after_load, Duration::from_secs(3));
        assert_eq!(config.agenda_url.as_str(), "https://opensauce.com/agenda/");
        assert!(config.output.screenshots);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<Config>("agenda = \"x\"").is_err());
    }
}
