//! Conversion of projected frame coordinates to WGS84 longitude/latitude.
//!
//! Projections are resolved from EPSG codes with the `crs-definitions` database and
//! applied with `proj4rs`, both pure Rust.
use std::fmt;

use glam::DVec2;
use proj4rs::proj::Proj;
use proj4rs::transform::transform;

use crate::error::{Error, Result};

/// EPSG code of WGS84 longitude/latitude.
pub const WGS84_EPSG: u16 = 4326;

/// PROJ.4 string for an EPSG code, if known.
pub fn proj_string(epsg: u16) -> Option<&'static str> {
    crs_definitions::from_code(epsg).map(|def| def.proj4)
}

fn is_geographic(proj4: &str) -> bool {
    proj4.contains("+proj=longlat")
}

/// Projects frame coordinates to longitude/latitude in degrees.
pub struct LonLatProjector {
    source_epsg: Option<u16>,
    // `None` when the source is already geographic.
    projs: Option<(Proj, Proj)>,
}

impl fmt::Debug for LonLatProjector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LonLatProjector")
            .field("source_epsg", &self.source_epsg)
            .field("identity", &self.projs.is_none())
            .finish()
    }
}

impl LonLatProjector {
    /// Coordinates are already longitude/latitude.
    pub fn identity() -> Self {
        Self {
            source_epsg: None,
            projs: None,
        }
    }

    /// Coordinates are in the projected CRS `epsg`.
    pub fn from_epsg(epsg: u16) -> Result<Self> {
        let source_str = proj_string(epsg).ok_or_else(|| {
            Error::Projection(format!("EPSG:{epsg} is not in the crs-definitions database"))
        })?;
        if is_geographic(source_str) {
            return Ok(Self {
                source_epsg: Some(epsg),
                projs: None,
            });
        }
        let target_str = proj_string(WGS84_EPSG).ok_or_else(|| {
            Error::Projection(format!("EPSG:{WGS84_EPSG} is not in the crs-definitions database"))
        })?;

        let source = Proj::from_proj_string(source_str)
            .map_err(|e| Error::Projection(format!("invalid source EPSG:{epsg}: {e:?}")))?;
        let target = Proj::from_proj_string(target_str)
            .map_err(|e| Error::Projection(format!("invalid target EPSG:{WGS84_EPSG}: {e:?}")))?;
        Ok(Self {
            source_epsg: Some(epsg),
            projs: Some((source, target)),
        })
    }

    /// Optional EPSG: `None` builds the identity projector.
    pub fn from_optional_epsg(epsg: Option<u16>) -> Result<Self> {
        match epsg {
            Some(code) => Self::from_epsg(code),
            None => Ok(Self::identity()),
        }
    }

    pub fn source_epsg(&self) -> Option<u16> {
        self.source_epsg
    }

    /// Longitude (x) and latitude (y) in degrees.
    pub fn to_lon_lat(&self, p: DVec2) -> Result<DVec2> {
        if !p.is_finite() {
            return Err(Error::NonFiniteCoordinate { x: p.x, y: p.y });
        }
        let Some((source, target)) = &self.projs else {
            return Ok(p);
        };
        let mut point = (p.x, p.y, 0.0);
        transform(source, target, &mut point)
            .map_err(|e| Error::Projection(format!("transform of ({}, {}) failed: {e:?}", p.x, p.y)))?;
        Ok(DVec2::new(point.0.to_degrees(), point.1.to_degrees()))
    }
}
