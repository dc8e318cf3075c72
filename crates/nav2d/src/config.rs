#[cfg(feature = "bevy_reflect")]
use bevy_reflect::prelude::*;
use thiserror::Error;

/// Specifies a configuration to use when baking [`NavigationData`](crate::NavigationData).
/// Usually built using [`Nav2dConfigBuilder`], which validates the values.
///
/// Distances are in world units (wu).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bevy_reflect", derive(Reflect))]
#[cfg_attr(
    all(feature = "serialize", feature = "bevy_reflect"),
    reflect(Serialize, Deserialize)
)]
pub struct Nav2dConfig {
    /// The name stored in the baked asset.
    pub name: String,

    /// The version stamp stored in the baked asset.
    pub version: u32,

    /// The number of vertices a circle is tessellated into. `[Limit: >= 3]`
    ///
    /// Higher values follow the circle more closely but produce more edges to test per query.
    pub circle_vertex_count: u16,

    /// Tolerances used by [`NavigationData::map_point`](crate::NavigationData::map_point).
    pub map_point: MapPointConfig,

    /// Whether zero-length edges are pruned from the baked nodes.
    pub prune_degenerate_edges: bool,

    /// Whether contours whose winding disagrees with their hierarchy depth are reversed.
    ///
    /// When enabled, solid nodes end up counter-clockwise and hole nodes clockwise.
    /// When disabled, vertex order is kept as extracted and mismatches are only reported.
    pub enforce_winding: bool,
}

/// The tolerances used when mapping an arbitrary point onto the navigable boundary.
/// These are stored per navigation asset so they can be tuned per level.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bevy_reflect", derive(Reflect))]
pub struct MapPointConfig {
    /// How far away from a node's bounds a point may be and still be considered for that node. `[Limit: >= 0] [Units: wu]`
    pub max_deviation: f32,

    /// A boundary match at or below this distance is accepted immediately,
    /// without looking at the remaining nodes. `[Limit: 0 <= value <= max_deviation] [Units: wu]`
    pub instant_accept_deviation: f32,
}

impl Default for MapPointConfig {
    fn default() -> Self {
        Self {
            max_deviation: 3.0,
            instant_accept_deviation: 0.01,
        }
    }
}

/// A builder for [`Nav2dConfig`]. The default values are a reasonable start for human-sized agents in a world measured in meters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bevy_reflect", derive(Reflect))]
#[cfg_attr(
    all(feature = "serialize", feature = "bevy_reflect"),
    reflect(Serialize, Deserialize)
)]
pub struct Nav2dConfigBuilder {
    /// See [`Nav2dConfig::name`]
    pub name: String,
    /// See [`Nav2dConfig::version`]
    pub version: u32,
    /// See [`Nav2dConfig::circle_vertex_count`]
    pub circle_vertex_count: u16,
    /// See [`MapPointConfig::max_deviation`]
    pub map_point_max_deviation: f32,
    /// See [`MapPointConfig::instant_accept_deviation`]
    pub map_point_instant_accept_deviation: f32,
    /// See [`Nav2dConfig::prune_degenerate_edges`]
    pub prune_degenerate_edges: bool,
    /// See [`Nav2dConfig::enforce_winding`]
    pub enforce_winding: bool,
}

impl Default for Nav2dConfigBuilder {
    fn default() -> Self {
        let map_point = MapPointConfig::default();
        Self {
            name: "NavigationData2D".to_string(),
            version: 1,
            circle_vertex_count: 16,
            map_point_max_deviation: map_point.max_deviation,
            map_point_instant_accept_deviation: map_point.instant_accept_deviation,
            prune_degenerate_edges: true,
            enforce_winding: false,
        }
    }
}

impl Default for Nav2dConfig {
    fn default() -> Self {
        let builder = Nav2dConfigBuilder::default();
        Self {
            name: builder.name,
            version: builder.version,
            circle_vertex_count: builder.circle_vertex_count,
            map_point: MapPointConfig {
                max_deviation: builder.map_point_max_deviation,
                instant_accept_deviation: builder.map_point_instant_accept_deviation,
            },
            prune_degenerate_edges: builder.prune_degenerate_edges,
            enforce_winding: builder.enforce_winding,
        }
    }
}

impl Nav2dConfigBuilder {
    /// Builds a [`Nav2dConfig`] from the current configuration.
    pub fn build(self) -> Result<Nav2dConfig, Nav2dConfigError> {
        if self.circle_vertex_count < 3 {
            return Err(Nav2dConfigError::TooFewCircleVertices(
                self.circle_vertex_count,
            ));
        }
        let max_deviation = self.map_point_max_deviation;
        let instant_accept_deviation = self.map_point_instant_accept_deviation;
        for (name, value) in [
            ("max_deviation", max_deviation),
            ("instant_accept_deviation", instant_accept_deviation),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Nav2dConfigError::InvalidDeviation { name, value });
            }
        }
        if instant_accept_deviation > max_deviation {
            return Err(Nav2dConfigError::InstantAcceptExceedsMax {
                instant_accept_deviation,
                max_deviation,
            });
        }
        Ok(Nav2dConfig {
            name: self.name,
            version: self.version,
            circle_vertex_count: self.circle_vertex_count,
            map_point: MapPointConfig {
                max_deviation,
                instant_accept_deviation,
            },
            prune_degenerate_edges: self.prune_degenerate_edges,
            enforce_winding: self.enforce_winding,
        })
    }
}

/// Errors that can occur when building a [`Nav2dConfig`] with [`Nav2dConfigBuilder::build`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Nav2dConfigError {
    /// Happens when circles would be tessellated into something without area.
    #[error("Circles need at least 3 vertices, but got {0}")]
    TooFewCircleVertices(u16),
    /// Happens when a tolerance is negative, NaN or infinite.
    #[error("Map point tolerance `{name}` must be finite and non-negative, but got {value}")]
    InvalidDeviation {
        /// The name of the tolerance
        name: &'static str,
        /// The rejected value
        value: f32,
    },
    /// Happens when the instant accept tolerance is larger than the maximum tolerance.
    #[error(
        "Instant accept deviation ({instant_accept_deviation}) must not exceed max deviation ({max_deviation})"
    )]
    InstantAcceptExceedsMax {
        /// The configured instant accept tolerance
        instant_accept_deviation: f32,
        /// The configured maximum tolerance
        max_deviation: f32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_builder_is_valid() {
        let config = Nav2dConfigBuilder::default().build().unwrap();
        assert_eq!(config, Nav2dConfig::default());
    }

    #[test]
    fn rejects_too_few_circle_vertices() {
        let result = Nav2dConfigBuilder {
            circle_vertex_count: 2,
            ..Default::default()
        }
        .build();
        assert_eq!(result, Err(Nav2dConfigError::TooFewCircleVertices(2)));
    }

    #[test]
    fn rejects_negative_deviation() {
        let result = Nav2dConfigBuilder {
            map_point_max_deviation: -1.0,
            ..Default::default()
        }
        .build();
        assert!(matches!(
            result,
            Err(Nav2dConfigError::InvalidDeviation {
                name: "max_deviation",
                ..
            })
        ));
    }

    #[test]
    fn rejects_instant_accept_above_max() {
        let result = Nav2dConfigBuilder {
            map_point_max_deviation: 1.0,
            map_point_instant_accept_deviation: 2.0,
            ..Default::default()
        }
        .build();
        assert!(matches!(
            result,
            Err(Nav2dConfigError::InstantAcceptExceedsMax { .. })
        ));
    }
}
