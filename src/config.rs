use std::env;
use std::path::{Path, PathBuf};

use crate::dataset::DatasetError;
use crate::tidy::batch::TIDY_CSV_NAME;

#[derive(Debug, Clone)]
pub struct Config {
    /// Explicit tidy table location (`FIN_CSV_PATH`)
    pub csv_path: Option<PathBuf>,
    pub server_host: String,
    pub server_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Config {
            csv_path: env::var("FIN_CSV_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// First existing of `FIN_CSV_PATH`, `data/financials_tidy.csv`, `./financials_tidy.csv`
    pub fn resolve_csv_path(&self) -> Result<PathBuf, DatasetError> {
        let data_dir = Path::new("data").join(TIDY_CSV_NAME);
        let working_dir = PathBuf::from(TIDY_CSV_NAME);

        self.csv_path
            .iter()
            .cloned()
            .chain([data_dir, working_dir])
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| DatasetError::NotFound(TIDY_CSV_NAME.to_string()))
    }
}
