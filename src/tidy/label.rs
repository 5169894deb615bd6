use std::fmt;
use std::path::Path;

/// Region and locality a workbook describes, taken from its file name
/// (`<REGION>_<LOCALITY>.xlsx`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceLabel {
    pub region: Option<String>,
    pub locality: String,
}

impl SourceLabel {
    pub fn new(region: Option<String>, locality: impl Into<String>) -> Self {
        Self {
            region,
            locality: locality.into(),
        }
    }

    /// Split a file name on its first underscore.
    ///
    /// The extension is dropped first. Without an underscore the whole stem
    /// is the locality and the region is unknown.
    ///
    /// ```
    /// use finance_decoder::tidy::SourceLabel;
    ///
    /// let label = SourceLabel::from_file_name("AZ_Bullhead_City.xlsx");
    /// assert_eq!(label.region.as_deref(), Some("AZ"));
    /// assert_eq!(label.locality, "Bullhead_City");
    /// ```
    pub fn from_file_name(file_name: &str) -> Self {
        let stem = Path::new(file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_name.to_string());

        match stem.split_once('_') {
            Some((region, locality)) if !region.is_empty() => {
                Self::new(Some(region.to_string()), locality)
            }
            Some((_, locality)) => Self::new(None, locality),
            None => Self::new(None, stem.as_str()),
        }
    }

    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_file_name(&name)
    }
}

impl fmt::Display for SourceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.region {
            Some(region) => write!(f, "{}/{}", region, self.locality),
            None => write!(f, "{}", self.locality),
        }
    }
}
