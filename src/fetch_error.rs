#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Invalid URL {0}: {1}")]
    InvalidUrl(String, String),
    #[error("Could not find a 'mid=...' parameter in the URL: {0}")]
    MissingMapId(String),
    #[error("Unrecognised Sheets URL: {0}")]
    UnrecognisedSheetUrl(String),
    #[error("Failed to parse KML: {0}")]
    Kml(String),
}
