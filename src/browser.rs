use std::{path::Path, sync::Arc, thread::sleep};

use anyhow::{bail, Context};
use headless_chrome::{
    protocol::cdp::Page::{CaptureScreenshotFormatOption::Png, Viewport},
    Browser, LaunchOptionsBuilder, Tab,
};
use log::{debug, info};
use url::Url;

use crate::{config::BrowserConfig, scrape::AgendaPage, schema::Day};

/// A single tab showing the agenda. The browser process exits when this is dropped.
pub struct BrowserPage {
    // Keeps the browser process alive as long as the tab is in use.
    _browser: Browser,
    tab: Arc<Tab>,
    config: BrowserConfig,
}

type TabStrategy = fn(&BrowserPage, &str) -> anyhow::Result<bool>;

impl BrowserPage {
    pub fn open(url: &Url, config: &BrowserConfig) -> anyhow::Result<Self> {
        let browser = Browser::new(
            LaunchOptionsBuilder::default()
                .headless(config.headless)
                .port(config.remote_debugging_port)
                .window_size(Some(config.window_size))
                .build()?,
        )
        .context("Failed to launch the browser")?;
        let tab = browser.new_tab()?;
        info!("Navigating to {url}...");
        tab.navigate_to(url.as_str())?.wait_until_navigated()?;
        sleep(config.settle_after_load);
        Ok(Self {
            _browser: browser,
            tab,
            config: config.clone(),
        })
    }

    /// Keeps the page open for a while so a headed browser can be inspected.
    pub fn linger(&self) {
        sleep(self.config.linger_before_close);
    }

    /// Clicks the first exact-text match that is narrow enough to be a tab, not a heading.
    fn click_narrow_label(&self, label: &str) -> anyhow::Result<bool> {
        let elements = self.tab.find_elements_by_xpath(&exact_text_xpath(label))?;
        let narrow = first_narrow(
            &elements,
            |element| Ok(element.get_box_model()?.content.width()),
            self.config.max_tab_width,
        );
        match narrow {
            Some(element) => {
                element.click()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Clicks the parent of the first exact-text match, if that match is rendered.
    fn click_label_parent(&self, label: &str) -> anyhow::Result<bool> {
        let first = format!("({})[1]", exact_text_xpath(label));
        let model = self.tab.find_element_by_xpath(&first)?.get_box_model()?;
        if model.content.width() <= 0. || model.content.height() <= 0. {
            return Ok(false);
        }
        self.tab
            .find_element_by_xpath(&format!("{first}/.."))?
            .click()?;
        Ok(true)
    }

    fn click_button_or_link(&self, label: &str) -> anyhow::Result<bool> {
        let xpath = format!("//button[contains(., '{label}')] | //a[contains(., '{label}')]");
        match self.tab.find_elements_by_xpath(&xpath)?.first() {
            Some(element) => {
                element.click()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

fn exact_text_xpath(label: &str) -> String {
    format!("//body//*[normalize-space(.)='{label}']")
}

/// Elements whose width cannot be measured (not rendered) are passed over.
fn first_narrow<T>(
    candidates: &[T],
    width: impl Fn(&T) -> anyhow::Result<f64>,
    max_width: f64,
) -> Option<&T> {
    candidates.iter().find(|&candidate| match width(candidate) {
        Ok(measured) => measured < max_width,
        Err(e) => {
            debug!("Skipping an element without a box: {e:#}");
            false
        }
    })
}

impl AgendaPage for BrowserPage {
    fn select_day(&self, day: Day) -> bool {
        let label = day.tab_label();
        let strategies: [(&str, TabStrategy); 3] = [
            ("narrow exact label", BrowserPage::click_narrow_label),
            ("parent of exact label", BrowserPage::click_label_parent),
            ("button or link", BrowserPage::click_button_or_link),
        ];
        for (name, strategy) in strategies {
            info!("Trying to click {day} tab ({name})...");
            match strategy(self, label) {
                Ok(true) => {
                    sleep(self.config.settle_after_click);
                    info!("Successfully clicked {day} tab");
                    return true;
                }
                Ok(false) => debug!("No {label} element for this strategy"),
                Err(e) => debug!("Strategy {name:?} failed: {e:#}"),
            }
        }
        false
    }

    fn content(&self) -> anyhow::Result<String> {
        self.tab.get_content()
    }

    fn visible_text(&self) -> anyhow::Result<String> {
        self.tab.find_element("body")?.get_inner_text()
    }

    fn screenshot(&self, path: &Path) -> anyhow::Result<()> {
        let body = self.tab.find_element("body")?.get_box_model()?;
        let (width, height) = (body.margin.width(), body.margin.height());
        if width <= 0. || height <= 0. {
            bail!("The page body has no area ({width}x{height})");
        }
        let viewport = Viewport {
            x: 0.,
            y: 0.,
            width,
            height,
            scale: 1.,
        };
        let png = self
            .tab
            .capture_screenshot(Png, None, Some(viewport), true)?;
        fs_err::write(path, png)?;
        info!("Saved screenshot to {path:?}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use anyhow::bail;

    use super::{exact_text_xpath, first_narrow};

    #[test]
    fn label_xpath_normalizes_whitespace() {
        assert_eq!(
            exact_text_xpath("FRIDAY"),
            "//body//*[normalize-space(.)='FRIDAY']"
        );
    }

    #[test]
    fn unrendered_labels_are_skipped() {
        // (name, rendered width)
        let labels = [
            ("mobile copy", None),
            ("section heading", Some(900.)),
            ("tab", Some(120.)),
            ("footer link", Some(80.)),
        ];
        let width = |&(name, width): &(&str, Option<f64>)| match width {
            Some(width) => Ok(width),
            None => bail!("{name} has no box"),
        };
        assert_eq!(first_narrow(&labels, width, 200.).map(|l| l.0), Some("tab"));
        assert_eq!(first_narrow(&labels, width, 50.), None);
        assert_eq!(first_narrow(&labels[..1], width, 200.), None);
    }
}
