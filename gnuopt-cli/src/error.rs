use std::io;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Arguments(#[from] gnuopt::ParseError),

    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid option map: {0}")]
    Map(#[from] serde_json::Error),

    #[error("cannot encode output: {0}")]
    Encode(serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;

impl CliError {
    pub fn io(path: &str, source: io::Error) -> Self {
        CliError::Io {
            path: path.to_string(),
            source,
        }
    }
}
