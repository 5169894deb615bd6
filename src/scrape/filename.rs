use unicode_normalization::UnicodeNormalization;

/// Lower-cased state name to USPS abbreviation
const STATE_ABBR: &[(&str, &str)] = &[
    ("alabama", "AL"),
    ("alaska", "AK"),
    ("arizona", "AZ"),
    ("arkansas", "AR"),
    ("california", "CA"),
    ("colorado", "CO"),
    ("connecticut", "CT"),
    ("delaware", "DE"),
    ("florida", "FL"),
    ("georgia", "GA"),
    ("hawaii", "HI"),
    ("idaho", "ID"),
    ("illinois", "IL"),
    ("indiana", "IN"),
    ("iowa", "IA"),
    ("kansas", "KS"),
    ("kentucky", "KY"),
    ("louisiana", "LA"),
    ("maine", "ME"),
    ("maryland", "MD"),
    ("massachusetts", "MA"),
    ("michigan", "MI"),
    ("minnesota", "MN"),
    ("mississippi", "MS"),
    ("missouri", "MO"),
    ("montana", "MT"),
    ("nebraska", "NE"),
    ("nevada", "NV"),
    ("new hampshire", "NH"),
    ("new jersey", "NJ"),
    ("new mexico", "NM"),
    ("new york", "NY"),
    ("north carolina", "NC"),
    ("north dakota", "ND"),
    ("ohio", "OH"),
    ("oklahoma", "OK"),
    ("oregon", "OR"),
    ("pennsylvania", "PA"),
    ("rhode island", "RI"),
    ("south carolina", "SC"),
    ("south dakota", "SD"),
    ("tennessee", "TN"),
    ("texas", "TX"),
    ("utah", "UT"),
    ("vermont", "VT"),
    ("virginia", "VA"),
    ("washington", "WA"),
    ("west virginia", "WV"),
    ("wisconsin", "WI"),
    ("wyoming", "WY"),
];

pub fn state_abbreviation(state: &str) -> Option<&'static str> {
    let state = state.trim().to_lowercase();
    STATE_ABBR
        .iter()
        .find(|(name, _)| *name == state)
        .map(|(_, abbr)| *abbr)
}

/// File name for a placemark: `"Bullhead City, Arizona"` → `"AZ_Bullhead_City.xlsx"`.
///
/// Unknown states fall back to their first two letters upper-cased (`XX` when
/// absent). Accents are folded to ASCII, ASCII punctuation is dropped and
/// spaces become underscores.
pub fn safe_filename(placemark_name: &str) -> String {
    let (city_part, state_part) = placemark_name
        .split_once(',')
        .unwrap_or((placemark_name, ""));
    let city = city_part.trim();
    let state = state_part.trim().to_lowercase();

    let abbrev = match state_abbreviation(&state) {
        Some(abbr) => abbr.to_string(),
        None if state.is_empty() => "XX".to_string(),
        None => state.chars().take(2).collect::<String>().to_uppercase(),
    };

    let city_clean: String = city
        .nfkd()
        .filter(|c| c.is_ascii() && !c.is_ascii_punctuation())
        .map(|c| if c == ' ' { '_' } else { c })
        .collect();
    let city_clean = if city_clean.is_empty() {
        "UnknownCity".to_string()
    } else {
        city_clean
    };

    format!("{abbrev}_{city_clean}.xlsx")
}
