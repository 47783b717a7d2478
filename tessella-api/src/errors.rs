use thiserror::Error;

/// Errors owned by the data-source collaborator. They reach the tile as a
/// terminal failure for the current data generation; retry policy lives with
/// the source, never inside the pipeline.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("request cancelled")]
    Cancelled,
    #[error("source error: {0}")]
    Other(String),
}

/// Errors produced while turning a raw payload into usable tile data.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("malformed tile payload: {0}")]
    Malformed(String),
    #[error("unsupported payload encoding: {0}")]
    UnsupportedEncoding(String),
}

/// What the tile observer sees. A tile carrying one of these is
/// complete-with-error, never perpetually loading.
#[derive(Error, Debug)]
pub enum TileError {
    #[error("failed to load tile data: {0}")]
    Source(#[from] SourceError),
    #[error("failed to parse tile data: {0}")]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
