//! Geospatial scoping: features, feature groups, feature services and masks.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The naming authority for geographic feature identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureAuthority {
    NwsLid,
    UsgsSiteCode,
    NwmFeatureId,
    Custom,
}

impl fmt::Display for FeatureAuthority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeatureAuthority::NwsLid => "nws lid",
            FeatureAuthority::UsgsSiteCode => "usgs site code",
            FeatureAuthority::NwmFeatureId => "nwm feature id",
            FeatureAuthority::Custom => "custom",
        };
        write!(f, "{name}")
    }
}

/// A single geographic feature.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Geometry {
    pub name: String,
}

impl Geometry {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Correlated features across the dataset orientations. A tuple is sparse
/// when a side that participates in the evaluation has no feature name.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GeometryTuple {
    pub left: Option<Geometry>,
    pub right: Option<Geometry>,
    pub baseline: Option<Geometry>,
}

impl GeometryTuple {
    /// A tuple with the same feature name on the left and right sides.
    pub fn of(name: &str) -> Self {
        Self {
            left: Some(Geometry::new(name)),
            right: Some(Geometry::new(name)),
            baseline: None,
        }
    }

    pub fn has_baseline(&self) -> bool {
        self.baseline.is_some()
    }

    /// Returns true when either of the two required sides is missing.
    pub fn is_sparse(&self) -> bool {
        self.left.is_none() || self.right.is_none()
    }

    /// A short display name for messaging, preferring the left feature.
    pub fn display_name(&self) -> &str {
        self.left
            .as_ref()
            .or(self.right.as_ref())
            .or(self.baseline.as_ref())
            .map(|geometry| geometry.name.as_str())
            .unwrap_or("<unnamed>")
    }
}

/// Singleton feature tuples.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Features {
    #[serde(default)]
    pub geometries: Vec<GeometryTuple>,
}

/// A named group of feature tuples that is evaluated collectively.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometryGroup {
    pub name: String,
    #[serde(default)]
    pub geometries: Vec<GeometryTuple>,
}

/// Feature groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureGroups {
    #[serde(default)]
    pub groups: Vec<GeometryGroup>,
}

/// One group request against a feature service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureServiceGroup {
    pub group: String,
    pub value: String,
    /// Whether the group forms a single pool rather than singleton features.
    #[serde(default)]
    pub pool: bool,
}

/// A remote service that resolves feature names and correlations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureService {
    pub uri: Option<String>,
    #[serde(default)]
    pub groups: Vec<FeatureServiceGroup>,
}

impl FeatureService {
    /// Returns true when any group is pooled.
    pub fn has_pooled_group(&self) -> bool {
        self.groups.iter().any(|group| group.pool)
    }
}

/// A geospatial mask in well-known-text form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpatialMask {
    pub wkt: String,
    pub srid: Option<i64>,
}
