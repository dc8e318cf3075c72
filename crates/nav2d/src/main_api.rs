use crate::{CollisionGeometrySet, ContourTree, Nav2dConfig, NavigationData, ShapeDescriptor};

impl NavigationData {
    /// Runs the whole bake: extracts contours from `shapes`, nests them, and flattens the hierarchy
    /// into navigation nodes.
    ///
    /// The bake is deterministic. The same shapes and configuration always produce identical data.
    /// Problems with the input never abort the bake; they are collected in [`NavigationData::warnings`].
    ///
    /// # Arguments
    ///
    /// - `shapes` - The collision shapes in world space. Their index is used to refer to them in warnings.
    /// - `config` - The configuration of the bake and of the produced asset.
    ///
    pub fn bake(shapes: &[ShapeDescriptor], config: &Nav2dConfig) -> NavigationData {
        let mut warnings = Vec::new();
        let geometry =
            CollisionGeometrySet::extract(shapes, config.circle_vertex_count, &mut warnings);
        let tree = ContourTree::build(&geometry);
        tree.bake(config, warnings)
    }
}
