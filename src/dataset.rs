pub mod error;
pub mod models;
pub mod repository;

pub use error::DatasetError;
pub use models::*;
pub use repository::ObservationRepository;
