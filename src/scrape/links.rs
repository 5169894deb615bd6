use regex::Regex;
use std::sync::OnceLock;
use url::Url;

use crate::fetch_error::FetchError;

pub const DEFAULT_KML_BASE_URL: &str = "https://www.google.com/maps/d/kml";
pub const DEFAULT_EXPORT_BASE_URL: &str = "https://docs.google.com/spreadsheets/d/";

fn sheet_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/d/([A-Za-z0-9_-]+)").expect("valid sheet id pattern"))
}

/// Map id from either a bare id or a My Maps URL carrying `mid=`
///
/// ```
/// use finance_decoder::scrape::links::map_id_from_arg;
///
/// assert_eq!(map_id_from_arg("1AbCdEf").unwrap(), "1AbCdEf");
/// assert_eq!(
///     map_id_from_arg("https://www.google.com/maps/d/viewer?mid=1AbCdEf&ll=0,0").unwrap(),
///     "1AbCdEf"
/// );
/// ```
pub fn map_id_from_arg(arg: &str) -> Result<String, FetchError> {
    let arg = arg.trim();
    if !arg.starts_with("http") {
        return Ok(arg.to_string());
    }

    let url = Url::parse(arg).map_err(|e| FetchError::InvalidUrl(arg.to_string(), e.to_string()))?;
    url.query_pairs()
        .find(|(key, value)| key == "mid" && !value.is_empty())
        .map(|(_, value)| value.into_owned())
        .ok_or_else(|| FetchError::MissingMapId(arg.to_string()))
}

/// KML export URL for a map id
pub fn kml_url(base_url: &str, map_id: &str) -> Result<Url, FetchError> {
    Url::parse_with_params(base_url, &[("forcekml", "1"), ("mid", map_id)])
        .map_err(|e| FetchError::InvalidUrl(base_url.to_string(), e.to_string()))
}

/// Turn any Sheets link into its `.xlsx` export link
pub fn to_export_url(sheet_url: &str, export_base_url: &str) -> Result<String, FetchError> {
    let file_id = sheet_id_regex()
        .captures(sheet_url)
        .and_then(|caps| caps.get(1))
        .ok_or_else(|| FetchError::UnrecognisedSheetUrl(sheet_url.to_string()))?
        .as_str();

    let base = export_base_url.trim_end_matches('/');
    Ok(format!("{base}/{file_id}/export?format=xlsx"))
}
