use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Corpus source unavailable: {0}")]
    DataSource(String),

    #[error("Corpus has no usable question/answer rows")]
    EmptyCorpus,

    #[error("Encoder model could not be loaded: {0}")]
    ModelLoad(String),

    #[error("Engine has no corpus loaded; call load() first")]
    NotLoaded,

    #[error("Engine is not trained; call train() first")]
    NotTrained,

    #[error("Engine is not initialized; call initialize() first")]
    NotInitialized,

    #[error("Encoding failed: {0}")]
    Encoder(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
