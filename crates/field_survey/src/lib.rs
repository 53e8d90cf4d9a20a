#![forbid(unsafe_code)]
//! field_survey: spatially balanced selection of field-survey locations.
//!
//! Modules:
//! - mask: eligibility masks over co-registered rasters
//! - frame: candidates and the sampling frame
//! - design: sample size policy and inclusion probabilities
//! - balance: balancing covariates and balance diagnostics
//! - sampling: cube method (flight + landing) and simple random baseline
//! - survey: config, grid labels, admin lookup, projection, runner, CSV export
//!
//! For a walkthrough, see the README and the `field_survey_examples` binaries.
pub mod balance;
pub mod design;
pub mod error;
pub mod events;
pub mod frame;
mod linalg;
pub mod mask;
pub mod sampling;
pub mod survey;

/// Convenient re-exports for common types. Import with `use field_survey::prelude::*;`.
pub mod prelude {
    pub use crate::balance::{balance_report, BalanceReport, BalancingMatrix, ColumnBalance};
    pub use crate::design::{target_sample_size, InclusionProbabilities};
    pub use crate::error::{Error, Result};
    pub use crate::events::{EventSink, FnSink, SamplingEvent, VecSink};
    pub use crate::frame::{Candidate, SamplingFrame, SamplingUnit};
    pub use crate::mask::{build_mask, build_mask_with, EligibilityCriteria, GridSpec, Raster};
    pub use crate::sampling::{
        CubeSampling, Sample, SampleDesign, SimpleRandomSampling, UnitOrder,
    };
    pub use crate::survey::{
        grid_id, to_csv_string, write_csv, write_csv_file, AdminBoundaries, AdminNames,
        AdminRegion, GridId, LonLatProjector, RegionMatch, SurveyConfig, SurveyRecord,
        SurveyResult, SurveyRunner,
    };
}
