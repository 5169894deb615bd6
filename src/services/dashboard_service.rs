use std::collections::{BTreeMap, BTreeSet};

use crate::dataset::{
    CityOption, CitySeries, DatasetSummary, IndicatorInfo, ObservationRepository, SeriesPoint,
    SeriesResponse,
};
use crate::indicators::{Indicator, INDICATORS};

pub const NO_DATA_MESSAGE: &str = "No data for selected filters";

/// Current state and city selections of the dashboard
#[derive(Debug, Clone, Default)]
pub struct SeriesFilter {
    pub states: Vec<String>,
    pub cities: Vec<String>,
}

impl SeriesFilter {
    /// Cities to chart.
    ///
    /// No selection at all shows every city; an explicit city selection shows
    /// exactly those; states picked without any city show nothing until a
    /// city is chosen.
    fn city_subset(&self, all_cities: BTreeSet<String>) -> BTreeSet<String> {
        if self.states.is_empty() && self.cities.is_empty() {
            all_cities
        } else if !self.cities.is_empty() {
            self.cities.iter().cloned().collect()
        } else {
            BTreeSet::new()
        }
    }
}

#[derive(Clone)]
pub struct DashboardService {
    repo: ObservationRepository,
}

impl DashboardService {
    pub fn new(repo: ObservationRepository) -> Self {
        Self { repo }
    }

    pub fn summary(&self) -> DatasetSummary {
        self.repo.summary()
    }

    pub fn indicators(&self) -> Vec<IndicatorInfo> {
        INDICATORS.iter().map(IndicatorInfo::from).collect()
    }

    /// Sorted distinct states present in the data
    pub fn states(&self) -> Vec<String> {
        self.repo
            .all()
            .iter()
            .filter_map(|o| o.state.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn cities(&self) -> BTreeSet<String> {
        self.repo.all().iter().map(|o| o.city.clone()).collect()
    }

    /// City picker entries: every city, with those in `states` listed first
    /// and marked with `" *"`.
    pub fn city_options(&self, states: &[String]) -> Vec<CityOption> {
        let all_cities = self.cities();
        if states.is_empty() {
            return all_cities
                .into_iter()
                .map(|city| CityOption {
                    label: city.clone(),
                    value: city,
                })
                .collect();
        }

        let top: BTreeSet<String> = self
            .repo
            .all()
            .iter()
            .filter(|o| o.state.as_ref().is_some_and(|s| states.contains(s)))
            .map(|o| o.city.clone())
            .collect();

        let marked = top.iter().map(|city| CityOption {
            label: format!("{city} *"),
            value: city.clone(),
        });
        let rest = all_cities
            .iter()
            .filter(|city| !top.contains(*city))
            .map(|city| CityOption {
                label: city.clone(),
                value: city.clone(),
            });

        marked.chain(rest).collect()
    }

    /// Chart data for one indicator; `None` when the indicator is unknown
    pub fn series(&self, indicator: &str, filter: &SeriesFilter) -> Option<SeriesResponse> {
        let indicator = Indicator::find(indicator)?;
        let subset = filter.city_subset(self.cities());

        let mut by_city: BTreeMap<String, Vec<SeriesPoint>> = BTreeMap::new();
        for observation in self
            .repo
            .all()
            .iter()
            .filter(|o| o.variable == indicator.name && subset.contains(&o.city))
        {
            by_city
                .entry(observation.city.clone())
                .or_default()
                .push(SeriesPoint {
                    year: observation.year,
                    value: observation.value,
                });
        }

        let series: Vec<CitySeries> = by_city
            .into_iter()
            .map(|(city, mut points)| {
                points.sort_by_key(|p| p.year);
                CitySeries { city, points }
            })
            .collect();

        let message = series.is_empty().then(|| NO_DATA_MESSAGE.to_string());

        Some(SeriesResponse {
            indicator: IndicatorInfo::from(indicator),
            series,
            message,
        })
    }
}
