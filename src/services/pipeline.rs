use std::future::Future;

use actix_web::web::Data;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use url::Url;
use uuid::Uuid;

use crate::configuration::{MarketplaceSettings, WebDriverSettings};
use crate::domain::niche::{EnrichedItem, PipelineRun, RunConfig, SearchQuery};
use crate::services::droid::Droid;
use crate::services::run_store::RunStore;
use crate::services::{rank_scraper, search_scraper};

/// Anything that can load a URL and hand back the settled page source. The
/// browser session implements this; tests substitute canned documents.
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = anyhow::Result<String>> + Send;
}

pub struct SearchJob {
    pub id: Uuid,
    pub config: RunConfig,
}

pub struct NicheJobSender {
    pub sender: UnboundedSender<SearchJob>,
}

pub fn build_search_url(marketplace: &MarketplaceSettings, keyword: &str, page: u8) -> String {
    format!(
        "{}/s?k={}&i={}&page={}",
        marketplace.base_url.trim_end_matches('/'),
        keyword.replace(' ', "+"),
        marketplace.category,
        page
    )
}

/// Traverse one keyword's search pages and filter candidates by rank and
/// review thresholds.
///
/// Pages are fetched sequentially and every candidate's detail page is
/// consulted before the next page loads; the shared browser session holds a
/// single current document, so nothing here may run concurrently. Parsing
/// failures degrade per item (skip) or per field (default) and never abort
/// the run; a navigation failure does, returning whatever was accumulated so
/// far with `session_error` set.
pub async fn run<F: PageFetcher>(
    fetcher: &F,
    marketplace: &MarketplaceSettings,
    query: &SearchQuery,
) -> PipelineRun {
    let mut run = PipelineRun::new(query);

    let base_url = match Url::parse(&marketplace.base_url) {
        Ok(url) => url,
        Err(e) => {
            run.session_error = Some(format!("Invalid marketplace base url: {}", e));
            return run;
        }
    };

    for page in 1..=query.max_pages {
        let search_url = build_search_url(marketplace, &query.keyword, page);
        let page_source = match fetcher.fetch(&search_url).await {
            Ok(source) => source,
            Err(e) => {
                log::error!(
                    "Failed to load search page {} for '{}': {:?}",
                    page,
                    query.keyword,
                    e
                );
                run.session_error = Some(e.to_string());
                return run;
            }
        };

        let page_data = search_scraper::extract_results(&page_source, &base_url);

        // Snapshot-at-first-page policy: later pages never update the total.
        if page == 1 {
            run.total_results_reported = page_data.total_results;
        }

        log::info!(
            "Page {} for '{}': {} candidates",
            page,
            query.keyword,
            page_data.items.len()
        );

        for candidate in page_data.items {
            let detail_source = match fetcher.fetch(&candidate.detail_url).await {
                Ok(source) => source,
                Err(e) => {
                    log::error!("Failed to load detail page {}: {:?}", candidate.detail_url, e);
                    run.session_error = Some(e.to_string());
                    return run;
                }
            };

            let rank = rank_scraper::extract_rank(&detail_source);
            if rank.is_none() {
                log::info!("No rank published for '{}', excluded", candidate.title);
            }

            let enriched = EnrichedItem { candidate, rank };
            if let Some(record) = enriched.into_record(query) {
                run.records.push(record);
            }
        }
    }

    run
}

/// Background worker: receives search jobs and processes their keywords
/// strictly sequentially, publishing progress and the final outcome into the
/// run store. One browser session is reused across keywords; after a session
/// failure it is torn down and a fresh one started for the next keyword.
pub async fn niche_search_handler(
    mut receiver: UnboundedReceiver<SearchJob>,
    store: Data<RunStore>,
    webdriver: WebDriverSettings,
    marketplace: MarketplaceSettings,
) {
    log::info!("Started niche search handler");

    while let Some(job) = receiver.recv().await {
        store.mark_running(job.id);

        let mut droid = match Droid::new(&webdriver).await {
            Ok(droid) => Some(droid),
            Err(e) => {
                log::error!("Failed to start a browser session: {:?}", e);
                store.fail(job.id, e.to_string());
                continue;
            }
        };

        let mut runs: Vec<PipelineRun> = vec![];

        for keyword in &job.config.keywords {
            let query = job.config.query_for(keyword);
            let keyword_run = match droid.as_ref() {
                Some(session) => run(session, &marketplace, &query).await,
                None => {
                    let mut aborted = PipelineRun::new(&query);
                    aborted.session_error = Some("No browser session available".to_string());
                    aborted
                }
            };

            match &keyword_run.session_error {
                None if keyword_run.records.is_empty() => log::warn!(
                    "Keyword '{}': no records below the thresholds out of {} total results",
                    keyword,
                    keyword_run.total_results_reported
                ),
                None => log::info!(
                    "Keyword '{}': {} records out of {} total results",
                    keyword,
                    keyword_run.records.len(),
                    keyword_run.total_results_reported
                ),
                Some(reason) => log::error!(
                    "Keyword '{}' aborted after {} records: {}",
                    keyword,
                    keyword_run.records.len(),
                    reason
                ),
            }

            let session_broken = keyword_run.session_error.is_some();
            store.record_progress(job.id, &keyword_run);
            runs.push(keyword_run);

            if session_broken {
                if let Some(session) = droid.take() {
                    if let Err(e) = session.quit().await {
                        log::warn!("Failed to close a broken browser session: {:?}", e);
                    }
                }
                match Droid::new(&webdriver).await {
                    Ok(fresh) => droid = Some(fresh),
                    Err(e) => log::error!("Could not restart the browser session: {:?}", e),
                }
            }
        }

        if let Some(session) = droid.take() {
            if let Err(e) = session.quit().await {
                log::warn!("Failed to close the browser session: {:?}", e);
            }
        }

        store.complete(job.id, runs);
    }
}
