use std::time::Duration;

use indicatif::ProgressBar;
use thiserror::Error;
use tokio::time::Instant;

use crate::data::{self, DataSource, LoadError};
use crate::filter::url::parse_location;
use crate::filter::FilterState;
use crate::prober::{self, DocumentCategory, ProbeOptions};
use crate::render::ViewBindings;
use crate::store::{RenderedView, Store};

#[derive(Clone, Debug)]
pub struct Options {
    pub data: DataSource,
    pub docs: String,
    pub docs_href: Option<String>,
    pub location: String,
    pub expanded: bool,
    pub categories: Vec<DocumentCategory>,
    pub concurrency: usize,
    pub rate: Option<u32>,
    pub timeout_seconds: usize,
    pub title: String,
    pub bindings: ViewBindings,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            data: DataSource::Path("./Data.json".into()),
            docs: ".".to_string(),
            docs_href: None,
            location: String::new(),
            expanded: false,
            categories: prober::default_categories(),
            concurrency: 16,
            rate: None,
            timeout_seconds: 10,
            title: "Employee Directory".to_string(),
            bindings: ViewBindings::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("invalid concurrency {value}, expected positive integer")]
    InvalidConcurrency { value: usize },

    #[error("{message}")]
    InvalidLocation { message: String },

    #[error("{message}")]
    InvalidDocs { message: String },

    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("render was superseded by a newer one")]
    Superseded,
}

#[derive(Clone, Debug)]
pub struct RunResult {
    pub started_at: Instant,
    pub elapsed: Duration,
    pub view: RenderedView,
    pub page: String,
}

#[derive(Clone, Debug)]
pub struct Runner {
    options: Options,
}

impl Runner {
    pub fn new(options: Options) -> Result<Self, RunnerError> {
        if options.concurrency == 0 {
            return Err(RunnerError::InvalidConcurrency {
                value: options.concurrency,
            });
        }
        parse_location(&options.location)
            .map_err(|message| RunnerError::InvalidLocation { message })?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub async fn run(&self) -> Result<RunResult, RunnerError> {
        self.run_with_progress(None).await
    }

    pub async fn run_with_progress(
        &self,
        pb: Option<&ProgressBar>,
    ) -> Result<RunResult, RunnerError> {
        let started_at = Instant::now();

        let client = data::build_client(self.options.timeout_seconds)
            .map_err(|e| RunnerError::HttpClientBuild { source: e })?;
        let directory = data::load_source(&self.options.data, &client).await?;

        let mut location = parse_location(&self.options.location)
            .map_err(|message| RunnerError::InvalidLocation { message })?;
        if self.options.expanded {
            let mut state = FilterState::from_url(&location);
            state.expanded = true;
            state.write_to_url(&mut location);
        }

        let prober = prober::prober_for(
            &self.options.docs,
            self.options.docs_href.as_deref(),
            client,
        )
        .map_err(|message| RunnerError::InvalidDocs { message })?;

        let mut store = Store::new(directory, location);
        let probe_options = ProbeOptions {
            concurrency: self.options.concurrency,
            rate: self.options.rate,
        };
        let view = store
            .begin_render()
            .run(
                prober.as_ref(),
                &self.options.categories,
                &probe_options,
                pb,
            )
            .await;
        if !store.commit(view) {
            return Err(RunnerError::Superseded);
        }
        let page = store
            .page(&self.options.title, &self.options.bindings)
            .ok_or(RunnerError::Superseded)?;
        let view = store.current().cloned().ok_or(RunnerError::Superseded)?;

        Ok(RunResult {
            started_at,
            elapsed: started_at.elapsed(),
            view,
            page,
        })
    }
}
