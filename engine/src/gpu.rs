//! GPU Buffers for Terrain Tiles
//!
//! Vertex and instance records for handing tiles to a wgpu renderer. The
//! crate builds no pipelines; these helpers only upload data and describe its
//! layout so the host renderer can bind it.
//!
//! Shader locations:
//! - 0: position (vec3<f32>)
//! - 1: normal   (vec3<f32>)
//! - 2: uv       (vec2<f32>)
//! - 3..=6: instance model matrix columns (vec4<f32> each)

use wgpu::util::DeviceExt;

use crate::error::GpuError;
use crate::placement::TerrainInstance;
use crate::terrain::Tile;

/// Interleaved tile vertex (32 bytes).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TerrainGpuVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

static_assertions::assert_eq_size!(TerrainGpuVertex, [u8; 32]);

/// Per-instance model matrix, column-major (64 bytes).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TerrainInstanceRaw {
    pub model: [[f32; 4]; 4],
}

static_assertions::assert_eq_size!(TerrainInstanceRaw, [u8; 64]);

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

const INSTANCE_ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
    3 => Float32x4, 4 => Float32x4, 5 => Float32x4, 6 => Float32x4
];

const LINE_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

impl TerrainGpuVertex {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TerrainGpuVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &VERTEX_ATTRIBUTES,
        }
    }
}

impl TerrainInstanceRaw {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TerrainInstanceRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &INSTANCE_ATTRIBUTES,
        }
    }
}

/// Layout of a bare position stream, as produced by [`Tile::line_strip`].
pub fn line_strip_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: (3 * std::mem::size_of::<f32>()) as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &LINE_ATTRIBUTES,
    }
}

/// Upload a tile's interleaved vertices. Draw with `tile.vertex_count()`
/// vertices as a triangle list.
pub fn create_tile_vertex_buffer(device: &wgpu::Device, tile: &Tile, label: Option<&str>) -> wgpu::Buffer {
    let vertices = tile.gpu_vertices();
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label,
        contents: bytemuck::cast_slice(&vertices),
        usage: wgpu::BufferUsages::VERTEX,
    })
}

/// Upload a polyline tile's line strip. `None` for triangle-list tiles.
pub fn create_line_strip_buffer(
    device: &wgpu::Device,
    tile: &Tile,
    label: Option<&str>,
) -> Option<wgpu::Buffer> {
    let strip = tile.line_strip()?;
    Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label,
        contents: bytemuck::cast_slice(&strip),
        usage: wgpu::BufferUsages::VERTEX,
    }))
}

/// Instance buffer with room for `capacity` instances, rewritten every frame.
pub fn create_instance_buffer(device: &wgpu::Device, capacity: usize, label: Option<&str>) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label,
        size: (capacity * std::mem::size_of::<TerrainInstanceRaw>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Per-instance records in instance order.
pub fn instance_records(instances: &[TerrainInstance]) -> Vec<TerrainInstanceRaw> {
    instances.iter().map(TerrainInstance::to_raw).collect()
}

/// Bytes needed for `count` instance records, or an error if `capacity`
/// bytes cannot hold them.
pub fn instance_bytes_needed(capacity: u64, count: usize) -> Result<u64, GpuError> {
    let needed = (count * std::mem::size_of::<TerrainInstanceRaw>()) as u64;
    if needed > capacity {
        return Err(GpuError::InstanceOverflow { capacity, needed });
    }
    Ok(needed)
}

/// Write this frame's transforms into an instance buffer. Nothing is written
/// if the buffer is too small for `instances`.
pub fn write_instances(
    queue: &wgpu::Queue,
    buffer: &wgpu::Buffer,
    instances: &[TerrainInstance],
) -> Result<(), GpuError> {
    instance_bytes_needed(buffer.size(), instances.len())?;
    let records = instance_records(instances);
    queue.write_buffer(buffer, 0, bytemuck::cast_slice(&records));
    Ok(())
}
