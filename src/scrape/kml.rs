//! Placemark link extraction from a My Maps KML export.
//!
//! Each placemark's description (or its first `ExtendedData/Data/value`)
//! may embed a Google Sheets link; at most one link is taken per placemark.

use percent_encoding::percent_decode_str;
use quick_xml::escape::{resolve_xml_entity, unescape};
use quick_xml::events::{BytesRef, Event};
use quick_xml::Reader;
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, instrument};

use crate::fetch_error::FetchError;

const PLACEMARK: &[u8] = b"Placemark";
const NAME: &[u8] = b"name";
const DESCRIPTION: &[u8] = b"description";
const EXTENDED_VALUE_PATH: [&[u8]; 3] = [b"ExtendedData", b"Data", b"value"];

/// A spreadsheet link found on a placemark
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLink {
    pub sheet_url: String,
    /// Placemark display text, e.g. "Bullhead City, Arizona"
    pub place_name: String,
}

fn docs_link_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)https?://docs\.google\.com/[^\s"'<>]+"#).expect("valid docs link pattern")
    })
}

/// Text fields collected while inside one placemark
#[derive(Default)]
struct PlacemarkText {
    /// Element path relative to the placemark
    path: Vec<Vec<u8>>,
    name: Option<String>,
    description: Option<String>,
    extended_value: Option<String>,
    current: String,
}

impl PlacemarkText {
    fn capturing(&self) -> bool {
        self.is_name() || self.is_description() || self.is_extended_value()
    }

    fn is_name(&self) -> bool {
        self.name.is_none() && self.path.len() == 1 && self.path[0] == NAME
    }

    fn is_description(&self) -> bool {
        self.description.is_none() && self.path.last().is_some_and(|p| p == DESCRIPTION)
    }

    fn is_extended_value(&self) -> bool {
        self.extended_value.is_none()
            && self.path.len() >= 3
            && self.path[self.path.len() - 3..]
                .iter()
                .zip(EXTENDED_VALUE_PATH)
                .all(|(seen, want)| seen == want)
    }

    /// Close the innermost element, storing its text if it was captured
    fn close(&mut self) {
        if self.capturing() {
            let text = std::mem::take(&mut self.current);
            if self.is_name() {
                self.name = Some(text);
            } else if self.is_description() {
                self.description = Some(text);
            } else {
                self.extended_value = Some(text);
            }
        }
        self.path.pop();
    }

    fn place_name(&self) -> String {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("Unknown")
            .to_string()
    }

    fn blob(&self) -> Option<&str> {
        self.description
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.extended_value.as_deref())
            .filter(|s| !s.is_empty())
    }
}

fn resolve_reference(reference: &BytesRef) -> Result<String, FetchError> {
    let raw = reference
        .xml_content()
        .map_err(|e| FetchError::Kml(e.to_string()))?;

    if let Some(number) = raw.strip_prefix('#') {
        let code = match number.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => number.parse::<u32>(),
        }
        .map_err(|_| FetchError::Kml(format!("bad character reference &{raw};")))?;
        Ok(char::from_u32(code).map(String::from).unwrap_or_default())
    } else if let Some(entity) = resolve_xml_entity(&raw) {
        Ok(entity.to_string())
    } else {
        // HTML-only entities such as &nbsp; are kept verbatim
        Ok(format!("&{raw};"))
    }
}

/// Clean a raw link: undo HTML escaping, then percent-encoding
fn normalize_link(raw: &str) -> String {
    let unescaped = unescape(raw).map(|s| s.into_owned()).unwrap_or_else(|_| raw.to_string());
    percent_decode_str(&unescaped).decode_utf8_lossy().into_owned()
}

/// First Sheets link in a description blob
fn first_sheet_link(blob: &str) -> Option<String> {
    docs_link_regex()
        .find_iter(blob)
        .map(|m| normalize_link(m.as_str()))
        .find(|url| url.contains("spreadsheets"))
}

/// All (sheet link, placemark name) pairs in document order
#[instrument(skip(kml), fields(kml_size = kml.len()))]
pub fn extract_sheet_links(kml: &str) -> Result<Vec<SheetLink>, FetchError> {
    let mut reader = Reader::from_str(kml);
    reader.config_mut().trim_text(false);

    let mut links = Vec::new();
    let mut placemark: Option<PlacemarkText> = None;
    let mut placemarks = 0;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| FetchError::Kml(format!("at byte {}: {e}", reader.buffer_position())))?;

        match event {
            Event::Eof => break,
            Event::Start(start) if start.local_name().as_ref() == PLACEMARK => {
                placemark = Some(PlacemarkText::default());
            }
            Event::Start(start) => {
                if let Some(pm) = placemark.as_mut() {
                    pm.path.push(start.local_name().as_ref().to_vec());
                }
            }
            Event::End(end) if end.local_name().as_ref() == PLACEMARK => {
                let Some(pm) = placemark.take() else { continue };
                placemarks += 1;

                let Some(blob) = pm.blob() else { continue };
                if let Some(sheet_url) = first_sheet_link(blob) {
                    links.push(SheetLink {
                        sheet_url,
                        place_name: pm.place_name(),
                    });
                }
            }
            Event::End(_) => {
                if let Some(pm) = placemark.as_mut() {
                    pm.close();
                }
            }
            Event::Text(text) => {
                if let Some(pm) = placemark.as_mut().filter(|pm| pm.capturing()) {
                    let content = text.xml_content().map_err(|e| FetchError::Kml(e.to_string()))?;
                    pm.current.push_str(&content);
                }
            }
            Event::CData(cdata) => {
                if let Some(pm) = placemark.as_mut().filter(|pm| pm.capturing()) {
                    let content = cdata.decode().map_err(|e| FetchError::Kml(e.to_string()))?;
                    pm.current.push_str(&content);
                }
            }
            Event::GeneralRef(reference) => {
                if let Some(pm) = placemark.as_mut().filter(|pm| pm.capturing()) {
                    pm.current.push_str(&resolve_reference(&reference)?);
                }
            }
            _ => (),
        }
    }

    debug!("Found {} sheet links in {} placemarks", links.len(), placemarks);
    Ok(links)
}
