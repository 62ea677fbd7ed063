use std::collections::HashMap;
use std::sync::Mutex;

use serde::Serialize;
use uuid::Uuid;

use crate::domain::niche::{PipelineRun, ResultRecord};

/// Per-keyword progress line shown to the caller: records found vs. total
/// results reported. Zero-result keywords carry a warning, not an error.
#[derive(Debug, Clone, Serialize)]
pub struct KeywordSummary {
    pub keyword: String,
    pub records_found: usize,
    pub total_results_reported: u64,
    pub warning: Option<String>,
}

impl KeywordSummary {
    pub fn from_run(run: &PipelineRun) -> Self {
        let warning = match &run.session_error {
            Some(reason) => Some(format!("Run aborted: {}", reason)),
            None if run.records.is_empty() => {
                Some("No results below the configured thresholds. Try widening the filters.".to_string())
            }
            None => None,
        };

        KeywordSummary {
            keyword: run.query.keyword.clone(),
            records_found: run.records.len(),
            total_results_reported: run.total_results_reported,
            warning,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Running {
        summaries: Vec<KeywordSummary>,
    },
    Complete {
        summaries: Vec<KeywordSummary>,
        runs: Vec<PipelineRun>,
    },
    Failed {
        reason: String,
    },
}

/// In-memory registry of search jobs, shared between the HTTP surface and
/// the background handler. Keyword runs pass through by value; nothing in
/// here aliases the browser session.
#[derive(Default)]
pub struct RunStore {
    jobs: Mutex<HashMap<Uuid, JobStatus>>,
}

impl RunStore {
    pub fn register(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.jobs.lock().unwrap().insert(id, JobStatus::Queued);
        id
    }

    pub fn mark_running(&self, id: Uuid) {
        self.jobs
            .lock()
            .unwrap()
            .insert(id, JobStatus::Running { summaries: vec![] });
    }

    /// Append one finished keyword's summary while the job is still running.
    pub fn record_progress(&self, id: Uuid, run: &PipelineRun) {
        let mut jobs = self.jobs.lock().unwrap();
        if let Some(JobStatus::Running { summaries }) = jobs.get_mut(&id) {
            summaries.push(KeywordSummary::from_run(run));
        }
    }

    pub fn complete(&self, id: Uuid, runs: Vec<PipelineRun>) {
        let summaries = runs.iter().map(KeywordSummary::from_run).collect();
        self.jobs
            .lock()
            .unwrap()
            .insert(id, JobStatus::Complete { summaries, runs });
    }

    pub fn fail(&self, id: Uuid, reason: String) {
        self.jobs.lock().unwrap().insert(id, JobStatus::Failed { reason });
    }

    pub fn status(&self, id: Uuid) -> Option<JobStatus> {
        self.jobs.lock().unwrap().get(&id).cloned()
    }

    /// The batch's accumulated records, in accumulation order. Only available
    /// once the job has completed.
    pub fn records(&self, id: Uuid) -> Option<Vec<ResultRecord>> {
        match self.jobs.lock().unwrap().get(&id) {
            Some(JobStatus::Complete { runs, .. }) => Some(
                runs.iter()
                    .flat_map(|run| run.records.iter().cloned())
                    .collect(),
            ),
            _ => None,
        }
    }
}
