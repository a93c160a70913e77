//! Tessellator Tests - Rhombus Layout, Traversal Order, Seam Wrap
//!
//! Tests for the rhombus tile generator: vertex counts, UV mapping, the
//! boustrophedon polyline order, and the bottom-strip wrap that makes
//! back-to-back tiles meet without a step.

use glam::Vec2;
use terrain_strip_engine::terrain::{RHOMBUS_RADIUS, TileMetrics};
use terrain_strip_engine::{
    HeightSampler, Raster, TerrainConfig, TessellationMode, TileTessellator, VConvention,
};

const EPS: f32 = 1e-4;

/// Deterministic bumpy heightmap.
fn noise_raster(width: u32, height: u32) -> Raster {
    let luma = (0..width * height)
        .map(|i| {
            let h = i.wrapping_mul(2_654_435_761).rotate_left(13) ^ (i * 97);
            (h % 256) as u8
        })
        .collect();
    Raster::from_luma(width, height, luma).unwrap()
}

fn tessellator(raster: &Raster, w: u32, h: u32, convention: VConvention) -> TileTessellator<'_> {
    let sampler = HeightSampler::new(raster, 4.0, convention);
    TileTessellator::new(TileMetrics::new(w, h).unwrap(), sampler)
}

// ============================================================================
// Layout
// ============================================================================

#[test]
fn test_triangle_list_vertex_count() {
    let raster = noise_raster(16, 16);
    for (w, h) in [(1, 1), (2, 1), (5, 3), (20, 20)] {
        let tile = tessellator(&raster, w, h, VConvention::Inverted).build(TessellationMode::TriangleList);
        assert_eq!(tile.vertex_count(), (w * h * 4 * 3) as usize);
        assert_eq!(tile.positions().len(), tile.vertex_count() * 3);
        assert_eq!(tile.uvs().len(), tile.vertex_count() * 2);
    }
}

#[test]
fn test_tile_extents() {
    let m = TileMetrics::new(20, 10).unwrap();
    let r = RHOMBUS_RADIUS;
    assert!((m.max_width - 20.5 * 2.0 * r).abs() < EPS);
    assert!((m.max_height - 10.5 * 2.0 * r).abs() < EPS);
    assert!((m.effective_step() - (m.max_height - r)).abs() < EPS);
}

#[test]
fn test_vertices_stay_inside_extents() {
    let raster = noise_raster(8, 8);
    let tess = tessellator(&raster, 4, 3, VConvention::Inverted);
    let m = *tess.metrics();
    let tile = tess.build(TessellationMode::TriangleList);

    for v in tile.vertices() {
        assert!(v.position.x >= -EPS && v.position.x <= m.max_width + EPS);
        assert!(v.position.y <= EPS && v.position.y >= -m.max_height - EPS);
        assert!(v.uv.x >= -EPS && v.uv.x <= 1.0 + EPS);
        assert!(v.uv.y >= -EPS && v.uv.y <= 1.0 + EPS);
    }
}

#[test]
fn test_uv_is_one_at_top_edge() {
    let raster = noise_raster(4, 4);
    let tess = tessellator(&raster, 3, 3, VConvention::Inverted);
    let top = tess.vertex_at(Vec2::new(RHOMBUS_RADIUS, 0.0));
    assert!((top.uv.y - 1.0).abs() < EPS);
}

#[test]
fn test_from_config_rejects_zero_height() {
    let raster = noise_raster(4, 4);
    let config = TerrainConfig {
        grid_height: 0,
        ..Default::default()
    };
    assert!(TileTessellator::from_config(&config, &raster).is_err());
}

// ============================================================================
// Boustrophedon order
// ============================================================================

#[test]
fn test_polyline_rows_alternate_direction() {
    let raster = noise_raster(8, 8);
    let tess = tessellator(&raster, 2, 2, VConvention::Inverted);
    let list = tess.build(TessellationMode::TriangleList);
    let line = tess.build(TessellationMode::Polyline);

    // One row = 2 cells x 4 triangles x 3 corners
    let row = 24;
    let (list, line) = (list.vertices(), line.vertices());

    // Row 0: columns 0 then 1, triangles 1..4
    assert_eq!(&line[..row], &list[..row]);

    // Row 1: columns 1 then 0, triangles 4..1
    let mut reversed = list[row..2 * row].to_vec();
    reversed.reverse();
    assert_eq!(&line[row..2 * row], reversed.as_slice());
}

#[test]
fn test_polyline_steps_are_one_edge_at_most() {
    let raster = noise_raster(12, 12);
    let tile = tessellator(&raster, 5, 4, VConvention::Direct).build(TessellationMode::Polyline);
    // Longest triangle edge is the vertical 2r diagonal of a rhombus
    let max_step = 2.0 * RHOMBUS_RADIUS + EPS;

    for pair in tile.vertices().windows(2) {
        let d = pair[0].position.truncate().distance(pair[1].position.truncate());
        assert!(d <= max_step, "jump of {d} between consecutive polyline vertices");
    }
}

#[test]
fn test_polyline_line_strip_matches_positions() {
    let raster = noise_raster(6, 6);
    let tile = tessellator(&raster, 2, 1, VConvention::Inverted).build(TessellationMode::Polyline);
    assert_eq!(tile.line_strip(), Some(tile.positions()));
}

// ============================================================================
// Seam wrap
// ============================================================================

fn check_seam(convention: VConvention) {
    let raster = noise_raster(17, 13);
    let tess = tessellator(&raster, 6, 5, convention);
    let m = *tess.metrics();
    let step = m.effective_step();
    let tile = tess.build(TessellationMode::TriangleList);

    let mut bottom = 0;
    let mut matched_in_mesh = 0;
    for v in tile.vertices() {
        if v.position.y >= m.seam_threshold() {
            continue;
        }
        bottom += 1;

        // The next tile sits one step further along; this point is on its top rows
        let above = Vec2::new(v.position.x, v.position.y + step);
        let expected = tess.vertex_at(above).position.z;
        assert!(
            (v.position.z - expected).abs() < 1e-5,
            "seam mismatch at ({}, {}): {} vs {}",
            v.position.x,
            v.position.y,
            v.position.z,
            expected
        );

        let twin = tile.vertices().iter().find(|w| {
            (w.position.x - above.x).abs() < EPS && (w.position.y - above.y).abs() < EPS
        });
        if let Some(twin) = twin {
            matched_in_mesh += 1;
            assert!((twin.position.z - v.position.z).abs() < 1e-5);
        }
    }

    assert!(bottom > 0);
    assert!(matched_in_mesh > 0);
}

#[test]
fn test_seam_heights_match_next_tile_inverted() {
    check_seam(VConvention::Inverted);
}

#[test]
fn test_seam_heights_match_next_tile_direct() {
    check_seam(VConvention::Direct);
}

#[test]
fn test_seam_resample_stays_in_unit_range() {
    let m = TileMetrics::new(20, 20).unwrap();
    let r = m.radius;
    for y in [-2.0 * r * 20.0, -2.0 * r * 20.0 - r] {
        let v = m.uv(Vec2::new(0.0, y)).y;
        let wrapped = m.sample_v(y, v);
        assert!(wrapped >= -EPS && wrapped <= 1.0 + EPS, "wrapped v {wrapped}");
    }
}

#[test]
fn test_normals_point_up() {
    let raster = noise_raster(9, 9);
    let tile = tessellator(&raster, 3, 3, VConvention::Inverted).build(TessellationMode::Polyline);
    for n in tile.normals() {
        assert!(n.z > 0.0);
    }
}

#[test]
fn test_wireframe_has_fewer_segments_than_edges() {
    let raster = noise_raster(9, 9);
    let tile = tessellator(&raster, 3, 3, VConvention::Inverted).build(TessellationMode::TriangleList);
    let segments = tile.wireframe_segments();
    assert!(!segments.is_empty());
    assert!(segments.len() < tile.triangle_count() * 3);
}
