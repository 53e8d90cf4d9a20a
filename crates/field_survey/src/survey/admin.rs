//! Administrative boundary lookup.
//!
//! [`AdminBoundaries`] is an ordered layer of named polygons. A point matches the first
//! region whose boundary intersects it (edges included); points outside every region
//! are [`RegionMatch::Unmatched`].
use geo::{BoundingRect, Intersects, MultiPolygon, Point, Rect};
use glam::DVec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Placeholder written for every name level of an unmatched point.
pub const UNMATCHED_PLACEHOLDER: &str = "NA";

/// Name hierarchy of an administrative unit.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AdminNames {
    pub region: String,
    pub district: String,
    pub ward: String,
}

impl AdminNames {
    pub fn new(
        region: impl Into<String>,
        district: impl Into<String>,
        ward: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            district: district.into(),
            ward: ward.into(),
        }
    }

    pub fn unmatched() -> Self {
        Self::new(
            UNMATCHED_PLACEHOLDER,
            UNMATCHED_PLACEHOLDER,
            UNMATCHED_PLACEHOLDER,
        )
    }
}

/// One named polygon of the boundary layer, in the same projection as the frame.
#[derive(Clone, Debug)]
pub struct AdminRegion {
    pub names: AdminNames,
    boundary: MultiPolygon<f64>,
    bbox: Option<Rect<f64>>,
}

impl AdminRegion {
    pub fn new(names: AdminNames, boundary: impl Into<MultiPolygon<f64>>) -> Self {
        let boundary = boundary.into();
        let bbox = boundary.bounding_rect();
        Self {
            names,
            boundary,
            bbox,
        }
    }

    pub fn boundary(&self) -> &MultiPolygon<f64> {
        &self.boundary
    }

    /// Whether `p` lies inside or on the edge of this region.
    pub fn covers(&self, p: DVec2) -> bool {
        let Some(bbox) = self.bbox else {
            return false;
        };
        let (min, max) = (bbox.min(), bbox.max());
        if p.x < min.x || p.x > max.x || p.y < min.y || p.y > max.y {
            return false;
        }
        self.boundary.intersects(&Point::new(p.x, p.y))
    }
}

/// Outcome of a point lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegionMatch<'a> {
    Matched(&'a AdminNames),
    Unmatched,
}

impl RegionMatch<'_> {
    /// Matched names, or [`AdminNames::unmatched`].
    pub fn names_or_placeholder(&self) -> AdminNames {
        match self {
            RegionMatch::Matched(names) => (*names).clone(),
            RegionMatch::Unmatched => AdminNames::unmatched(),
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, RegionMatch::Matched(_))
    }
}

/// Ordered layer of administrative regions.
#[derive(Clone, Debug, Default)]
pub struct AdminBoundaries {
    regions: Vec<AdminRegion>,
}

impl AdminBoundaries {
    pub fn new() -> Self {
        Self {
            regions: Vec::new(),
        }
    }

    /// Add a region (builder-style).
    pub fn with_region(mut self, region: AdminRegion) -> Self {
        self.regions.push(region);
        self
    }

    pub fn push(&mut self, region: AdminRegion) {
        self.regions.push(region);
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn regions(&self) -> &[AdminRegion] {
        &self.regions
    }

    /// First region covering `p`, in layer order.
    pub fn locate(&self, p: DVec2) -> RegionMatch<'_> {
        self.regions
            .iter()
            .find(|r| r.covers(p))
            .map_or(RegionMatch::Unmatched, |r| RegionMatch::Matched(&r.names))
    }

    /// Like [`Self::locate`], failing with [`Error::UnmatchedRegion`] outside every region.
    pub fn try_locate(&self, p: DVec2) -> Result<&AdminNames> {
        match self.locate(p) {
            RegionMatch::Matched(names) => Ok(names),
            RegionMatch::Unmatched => Err(Error::UnmatchedRegion { x: p.x, y: p.y }),
        }
    }
}
