//! Terrain Instances
//!
//! A shared tile plus its placement transform. The transform is the only
//! thing that changes per frame.

use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

use glam::{Mat4, Quat, Vec3};

use crate::gpu::TerrainInstanceRaw;
use crate::terrain::Tile;

#[derive(Clone, Debug)]
pub struct TerrainInstance {
    tile: Arc<Tile>,
    pub position: Vec3,
    pub rotation: Quat,
}

impl TerrainInstance {
    /// Lay a tile flat: tile-local `+Z` (height) becomes world `+Y`, and the
    /// tile's top edge faces away from the camera (`-Z`).
    pub fn lying_flat(tile: Arc<Tile>, position: Vec3) -> Self {
        Self {
            tile,
            position,
            rotation: Quat::from_rotation_x(-FRAC_PI_2),
        }
    }

    pub fn tile(&self) -> &Arc<Tile> {
        &self.tile
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }

    /// World-space position of a tile-local point.
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.model_matrix().transform_point3(local)
    }

    pub fn to_raw(&self) -> TerrainInstanceRaw {
        TerrainInstanceRaw {
            model: self.model_matrix().to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TessellationMode;
    use crate::terrain::Vertex;
    use glam::Vec2;

    #[test]
    fn test_lying_flat_maps_height_to_world_up() {
        let tile = Arc::new(Tile::new(
            vec![Vertex { position: Vec3::ZERO, uv: Vec2::ZERO }; 3],
            TessellationMode::TriangleList,
            1.0,
        ));
        let instance = TerrainInstance::lying_flat(tile, Vec3::new(1.0, -1.0, -5.0));

        let up = instance.to_world(Vec3::new(0.0, 0.0, 2.0));
        assert!((up - Vec3::new(1.0, 1.0, -5.0)).length() < 1e-5);

        // Going down the tile (negative local Y) comes towards the camera
        let near = instance.to_world(Vec3::new(0.0, -3.0, 0.0));
        assert!((near - Vec3::new(1.0, -1.0, -2.0)).length() < 1e-5);
    }
}
