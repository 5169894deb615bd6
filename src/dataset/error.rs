use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("Cannot locate {0}. Set FIN_CSV_PATH or place the file in ./data/ or the working directory")]
    NotFound(String),
    #[error("Failed to read tidy table {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
