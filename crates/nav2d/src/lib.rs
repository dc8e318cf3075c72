#![doc = include_str!("../../../readme.md")]

mod bake;
mod config;
mod contour;
mod contour_tree;
mod geometry_set;
mod main_api;
pub(crate) mod math;
mod nav_data;
mod shape;
mod warning;

pub use config::{MapPointConfig, Nav2dConfig, Nav2dConfigBuilder, Nav2dConfigError};
pub use contour::Contour;
pub use contour_tree::{ContourNode, ContourNodeKey, ContourTree};
pub use geometry_set::CollisionGeometrySet;
pub use math::Aabb2d;
pub use nav_data::{
    DynamicObstruction, MappedPoint, NavNode, NavNodeLink, NavNodeLinkKind, NavVertex,
    NavigationData, NavigationDataError, PointMapping,
};
pub use shape::{ShapeDescriptor, ShapeKind};
pub use warning::BakeWarning;

pub use glam;
