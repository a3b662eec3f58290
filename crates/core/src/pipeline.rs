//! End-to-end run: search, rank, show, select, download, launch.
//!
//! Everything the run touches is passed in: the sources, the client, the
//! presenter and the input/output streams. Nothing reads process globals.

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

use crate::config::Config;
use crate::launcher::{CommandLauncher, Launcher};
use crate::presenter::{Presenter, TablePresenter};
use crate::search::{rank, Aggregator, SearchError, SearchRequest};
use crate::selector::{SelectionError, Selector, DEFAULT_MAX_READ_ERRORS};
use crate::sequencer::{LaunchOutcome, SequenceError, Sequencer};
use crate::source::SourceRegistry;

/// How a run ended without error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// The search succeeded but found nothing to select.
    NoResults,
    Launched(LaunchOutcome),
}

/// Errors that end a run, by stage.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Search failed: {0}")]
    Search(#[from] SearchError),

    #[error("Selection failed: {0}")]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Sequence(#[from] SequenceError),

    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),
}

/// The search-and-open workflow.
pub struct Pipeline {
    aggregator: Aggregator,
    sequencer: Sequencer,
    presenter: Box<dyn Presenter>,
    max_read_errors: usize,
}

impl Pipeline {
    pub fn new(
        registry: SourceRegistry,
        launcher: Arc<dyn Launcher>,
        source_timeout: Duration,
    ) -> Self {
        Self {
            aggregator: Aggregator::new(registry.clone(), source_timeout),
            sequencer: Sequencer::new(registry, launcher),
            presenter: Box::new(TablePresenter::new()),
            max_read_errors: DEFAULT_MAX_READ_ERRORS,
        }
    }

    /// Pipeline with the configured client command and a table colored
    /// when stdout is a terminal.
    pub fn from_config(config: &Config, registry: SourceRegistry) -> Self {
        let launcher = Arc::new(CommandLauncher::from_config(&config.client));
        Self::new(
            registry,
            launcher,
            Duration::from_secs(config.search.source_timeout_secs as u64),
        )
        .with_presenter(TablePresenter::for_terminal())
    }

    pub fn with_presenter(mut self, presenter: impl Presenter + 'static) -> Self {
        self.presenter = Box::new(presenter);
        self
    }

    pub fn with_max_read_errors(mut self, max: usize) -> Self {
        self.max_read_errors = max;
        self
    }

    /// Run `request` to completion, reading the selection from `input` and
    /// writing everything meant for the user to `output`.
    pub async fn run<R: BufRead, W: Write>(
        &self,
        request: &SearchRequest,
        input: R,
        output: &mut W,
    ) -> Result<PipelineOutcome, PipelineError> {
        info!(query = %request.query(), target = %request.target(), "Searching");
        let result = self.aggregator.run(request).await?;

        for failure in &result.source_errors {
            writeln!(
                output,
                "Warning: source {} failed: {}",
                failure.source_name, failure.error
            )?;
        }

        let torrents = rank(result.torrents);
        if torrents.is_empty() {
            writeln!(output, "No torrents found for \"{}\".", request.query())?;
            return Ok(PipelineOutcome::NoResults);
        }

        self.presenter.render(&torrents, &mut *output)?;

        let index = Selector::new(input, &mut *output)
            .with_max_read_errors(self.max_read_errors)
            .select(torrents.len())?;
        let selected = &torrents[index];
        info!(
            index = index,
            name = %selected.name(),
            source = %selected.source(),
            "Selected torrent"
        );

        let outcome = self.sequencer.execute(selected, output).await?;
        Ok(PipelineOutcome::Launched(outcome))
    }
}
