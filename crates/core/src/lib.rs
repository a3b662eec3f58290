pub mod config;
pub mod launcher;
pub mod pipeline;
pub mod presenter;
pub mod search;
pub mod selector;
pub mod sequencer;
pub mod source;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, load_optional_config, validate_config, ClientConfig,
    Config, ConfigError, DownloadConfig, SearchConfig, SourceBackend, SourceConfig, ALL_SOURCES,
};
pub use launcher::{CommandLauncher, LaunchError, Launcher};
pub use pipeline::{Pipeline, PipelineError, PipelineOutcome};
pub use presenter::{Presenter, TablePresenter};
pub use search::{
    normalize, rank, Aggregator, NormalizeError, SearchError, SearchRequest, SearchResult,
    TargetSource, Torrent, ValidationError,
};
pub use selector::{SelectionError, Selector};
pub use sequencer::{LaunchOutcome, SequenceError, Sequencer};
pub use source::{
    ArchiveSource, RawTorrentResult, RegistryError, Source, SourceError, SourceFailure,
    SourceRegistry,
};
