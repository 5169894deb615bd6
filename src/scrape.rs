// Link harvester: map KML → Sheets links → downloaded .xlsx workbooks
// named <STATE>_<City>.xlsx for the tidy batch.

pub mod downloader;
pub mod filename;
pub mod harvest;
pub mod kml;
pub mod links;

pub use downloader::{DownloadError, SheetDownloader};
pub use filename::safe_filename;
pub use harvest::{harvest, HarvestError, HarvestReport};
pub use kml::{extract_sheet_links, SheetLink};
