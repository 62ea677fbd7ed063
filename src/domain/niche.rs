use serde::Serialize;

pub const MIN_PAGES: u8 = 1;
pub const MAX_PAGES: u8 = 5;

/// Immutable input for one keyword's pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchQuery {
    pub keyword: String,
    pub max_pages: u8,
    pub max_rank: u64,
    pub max_reviews: u64,
}

/// One search-result entry before its detail page has been consulted.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateItem {
    pub title: String,
    pub detail_url: String,
    pub review_count: u64,
}

/// A candidate plus the rank read off its detail page. A missing rank means
/// extraction failed or no rank was published; such items never reach the
/// output set.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedItem {
    pub candidate: CandidateItem,
    pub rank: Option<u64>,
}

impl EnrichedItem {
    /// The inclusion invariant lives here: rank present, rank strictly below
    /// the limit, reviews strictly below the limit. A book sitting exactly on
    /// either limit is excluded.
    pub fn into_record(self, query: &SearchQuery) -> Option<ResultRecord> {
        let rank = self.rank?;

        if rank < query.max_rank && self.candidate.review_count < query.max_reviews {
            Some(ResultRecord {
                keyword: query.keyword.clone(),
                title: self.candidate.title,
                detail_url: self.candidate.detail_url,
                rank,
                review_count: self.candidate.review_count,
            })
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRecord {
    pub keyword: String,
    pub title: String,
    pub detail_url: String,
    pub rank: u64,
    pub review_count: u64,
}

/// Accumulated output of one keyword's traversal. `total_results_reported`
/// is snapshotted from page 1 only; later pages never update it.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineRun {
    pub query: SearchQuery,
    pub total_results_reported: u64,
    pub records: Vec<ResultRecord>,
    /// Set when a navigation/session failure aborted this keyword early.
    /// Records accumulated before the failure are retained.
    pub session_error: Option<String>,
}

impl PipelineRun {
    pub fn new(query: &SearchQuery) -> Self {
        PipelineRun {
            query: query.clone(),
            total_results_reported: 0,
            records: vec![],
            session_error: None,
        }
    }
}

/// Validated batch configuration. Built from raw user input before any
/// browser work starts.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub keywords: Vec<String>,
    pub max_pages: u8,
    pub max_rank: u64,
    pub max_reviews: u64,
}

impl RunConfig {
    /// Keywords arrive as a comma-separated string; entries are trimmed and
    /// empties dropped. At least one keyword must survive and max_pages must
    /// sit in [1, 5].
    pub fn parse(
        keywords: &str,
        max_pages: u8,
        max_rank: u64,
        max_reviews: u64,
    ) -> Result<Self, String> {
        let keywords: Vec<String> = keywords
            .split(',')
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();

        if keywords.is_empty() {
            return Err("No keywords provided".to_string());
        }
        if !(MIN_PAGES..=MAX_PAGES).contains(&max_pages) {
            return Err(format!(
                "max_pages must be between {} and {}, got {}",
                MIN_PAGES, MAX_PAGES, max_pages
            ));
        }

        Ok(RunConfig {
            keywords,
            max_pages,
            max_rank,
            max_reviews,
        })
    }

    pub fn query_for(&self, keyword: &str) -> SearchQuery {
        SearchQuery {
            keyword: keyword.to_string(),
            max_pages: self.max_pages,
            max_rank: self.max_rank,
            max_reviews: self.max_reviews,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(max_rank: u64, max_reviews: u64) -> SearchQuery {
        SearchQuery {
            keyword: "coloring book".to_string(),
            max_pages: 1,
            max_rank,
            max_reviews,
        }
    }

    fn enriched(rank: Option<u64>, review_count: u64) -> EnrichedItem {
        EnrichedItem {
            candidate: CandidateItem {
                title: "Il grande libro dei gatti".to_string(),
                detail_url: "https://www.amazon.it/dp/B000".to_string(),
                review_count,
            },
            rank,
        }
    }

    #[test]
    fn record_requires_rank_below_limit_and_reviews_below_limit() {
        let record = enriched(Some(5000), 10).into_record(&query(100_000, 50));

        let record = record.expect("item within both limits");
        assert_eq!(record.rank, 5000);
        assert_eq!(record.review_count, 10);
        assert_eq!(record.keyword, "coloring book");
    }

    #[test]
    fn absent_rank_is_never_included() {
        assert_eq!(enriched(None, 0).into_record(&query(100_000, 50)), None);
    }

    #[test]
    fn limits_are_strict_less_than() {
        // Exactly on either limit is out.
        assert_eq!(enriched(Some(100_000), 10).into_record(&query(100_000, 50)), None);
        assert_eq!(enriched(Some(5000), 50).into_record(&query(100_000, 50)), None);
        assert!(enriched(Some(99_999), 49).into_record(&query(100_000, 50)).is_some());
    }

    #[test]
    fn run_config_trims_and_drops_empty_keywords() {
        let config = RunConfig::parse(" coloring book bambini , attività 3 anni ,, ", 2, 200_000, 100)
            .expect("valid config");

        assert_eq!(
            config.keywords,
            vec!["coloring book bambini".to_string(), "attività 3 anni".to_string()]
        );
    }

    #[test]
    fn run_config_rejects_empty_keyword_list() {
        assert!(RunConfig::parse(" , ,", 1, 1, 1).is_err());
    }

    #[test]
    fn run_config_rejects_out_of_range_pages() {
        assert!(RunConfig::parse("gatti", 0, 1, 1).is_err());
        assert!(RunConfig::parse("gatti", 6, 1, 1).is_err());
        assert!(RunConfig::parse("gatti", 5, 1, 1).is_ok());
    }
}
