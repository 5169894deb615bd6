use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::dataset::{DatasetError, DatasetSummary};
use crate::indicators::Indicator;
use crate::tidy::Observation;

/// In-memory copy of the tidy table, limited to dashboard indicators
#[derive(Clone)]
pub struct ObservationRepository {
    observations: Arc<Vec<Observation>>,
    source: String,
    loaded_at: DateTime<Utc>,
}

impl ObservationRepository {
    /// Build from already extracted rows; non-indicator rows are dropped
    pub fn from_observations(observations: Vec<Observation>, source: impl Into<String>) -> Self {
        let total = observations.len();
        let kept: Vec<Observation> = observations
            .into_iter()
            .filter(|o| Indicator::is_indicator(&o.variable))
            .collect();
        debug!("Kept {} of {} rows matching an indicator", kept.len(), total);

        Self {
            observations: Arc::new(kept),
            source: source.into(),
            loaded_at: Utc::now(),
        }
    }

    /// Read a `state,city,variable,year,value` CSV
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let csv_error = |source| DatasetError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv::Reader::from_path(path).map_err(csv_error)?;
        let mut observations = Vec::new();
        let mut skipped = 0;

        for (line, record) in reader.deserialize::<Observation>().enumerate() {
            match record {
                Ok(observation) => observations.push(observation),
                Err(e) if e.is_io_error() => return Err(csv_error(e)),
                Err(e) => {
                    warn!("Skipping unreadable row {}: {}", line + 2, e);
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            warn!("Skipped {} unreadable rows in {}", skipped, path.display());
        }

        let repo = Self::from_observations(observations, path.display().to_string());
        info!("Loaded {} indicator observations", repo.len());
        Ok(repo)
    }

    pub fn all(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn summary(&self) -> DatasetSummary {
        let states: BTreeSet<&str> = self
            .observations
            .iter()
            .filter_map(|o| o.state.as_deref())
            .collect();
        let cities: BTreeSet<&str> = self.observations.iter().map(|o| o.city.as_str()).collect();

        DatasetSummary {
            source: self.source.clone(),
            observations: self.len(),
            states: states.len(),
            cities: cities.len(),
            loaded_at: self.loaded_at,
        }
    }
}
