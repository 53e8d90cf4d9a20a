//! Field-survey workflow around the sampler: configuration, tile labels,
//! administrative lookup, lon/lat projection, the runner, and CSV export.
pub mod admin;
pub mod config;
pub mod export;
pub mod grid_id;
pub mod projection;
pub mod runner;

pub use admin::{AdminBoundaries, AdminNames, AdminRegion, RegionMatch};
pub use config::SurveyConfig;
pub use export::{to_csv_string, write_csv, write_csv_file};
pub use grid_id::{grid_id, GridId};
pub use projection::LonLatProjector;
pub use runner::{SurveyRecord, SurveyResult, SurveyRunner};
