use thiserror::Error;

/// Failures while reading or writing the CSV tables.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to access '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parse error at line {line}: {source}")]
    Csv {
        line: usize,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid row at line {line}: {reason}")]
    Row { line: usize, reason: String },

    #[error("No usable rows in '{path}'")]
    Empty { path: String },
}

impl LoadError {
    pub(crate) fn io(path: &str, source: std::io::Error) -> Self {
        LoadError::Io {
            path: path.to_string(),
            source,
        }
    }
}

pub type LoadResult<T> = Result<T, LoadError>;
