use std::time::Duration;

use anyhow::Context;
use rand::Rng;
use thirtyfour::{ChromiumLikeCapabilities, DesiredCapabilities, WebDriver};

use crate::configuration::WebDriverSettings;
use crate::services::pipeline::PageFetcher;

/// One headless browser session. The driver holds exactly one "current
/// document" at a time, so navigation calls must stay strictly sequential;
/// the session is never shared across concurrent fetches.
pub struct Droid {
    driver: WebDriver,
    settings: WebDriverSettings,
}

impl Droid {
    pub async fn new(settings: &WebDriverSettings) -> anyhow::Result<Self> {
        let mut caps = DesiredCapabilities::chrome();
        caps.add_arg("--headless")?;
        caps.add_arg("--disable-gpu")?;
        caps.add_arg("--window-size=1920,1080")?;

        let driver = WebDriver::new(&settings.url, caps)
            .await
            .context("Failed to connect to the webdriver endpoint")?;

        Ok(Droid {
            driver,
            settings: settings.clone(),
        })
    }

    /// Poll document.readyState instead of trusting a fixed sleep, then wait
    /// a short residual delay (plus jitter) for late-rendering widgets.
    async fn wait_until_settled(&self) {
        for _ in 0..self.settings.ready_poll_attempts {
            let ready = self
                .driver
                .execute("return document.readyState;", Vec::new())
                .await
                .ok()
                .and_then(|ret| ret.convert::<String>().ok())
                .map(|state| state == "complete")
                .unwrap_or(false);

            if ready {
                break;
            }
            tokio::time::sleep(Duration::from_millis(self.settings.ready_poll_interval_ms)).await;
        }

        let jitter = match self.settings.settle_jitter_ms {
            0 => 0,
            upper => rand::thread_rng().gen_range(0..=upper),
        };
        tokio::time::sleep(Duration::from_millis(self.settings.settle_ms + jitter)).await;
    }

    /// Releases the underlying browser session. Must be called exactly once
    /// per session, on failure paths included.
    pub async fn quit(self) -> anyhow::Result<()> {
        self.driver
            .quit()
            .await
            .context("Failed to close the browser session")
    }
}

impl PageFetcher for Droid {
    async fn fetch(&self, url: &str) -> anyhow::Result<String> {
        self.driver
            .goto(url)
            .await
            .with_context(|| format!("Navigation failed for {}", url))?;

        self.wait_until_settled().await;

        self.driver
            .source()
            .await
            .context("Failed to read the page source")
    }
}
