use bevy::asset::RenderAssetUsages;
use bevy::mesh::{Indices, PrimitiveTopology};
use bevy::prelude::*;
use bevy::render::render_resource::TextureFormat;

use super::constants::{
    HEIGHT_SCALE, LOD_BLOCK_SIZE, LOD_FAR, LOD_NEAR, TEXTURE_SCALE, TILE_SIZE,
};

/// Highest mesh-simplification level; a tile at this level samples the
/// heightfield every 2^MAX_LOD_LEVEL grid lines
const MAX_LOD_LEVEL: u32 = 3;

/// Error type for height-map decoding
#[derive(Debug)]
pub enum HeightfieldError {
    /// The image has no CPU-side pixel data to sample
    MissingPixelData,
    UnsupportedFormat(TextureFormat),
    /// A heightfield needs at least 2x2 samples to span a tile
    TooSmall { width: u32, height: u32 },
}

impl std::fmt::Display for HeightfieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeightfieldError::MissingPixelData => write!(f, "height-map pixel data not resident"),
            HeightfieldError::UnsupportedFormat(format) => {
                write!(f, "unsupported height-map format: {:?}", format)
            }
            HeightfieldError::TooSmall { width, height } => {
                write!(f, "height-map too small: {}x{}", width, height)
            }
        }
    }
}

impl std::error::Error for HeightfieldError {}

/// Normalized height samples decoded from the shared height-map image.
///
/// One fixed field is reused for every tile, so the terrain repeats visually
/// from tile to tile.
#[derive(Resource, Debug, Clone)]
pub struct Heightfield {
    pub width: u32,
    pub height: u32,
    samples: Vec<f32>,
}

impl Heightfield {
    /// Decode an image into normalized samples in [0, 1].
    ///
    /// Grayscale height-maps decode from the single channel; RGBA images use
    /// the red channel (height-maps store the same value in all three).
    pub fn from_image(image: &Image) -> Result<Self, HeightfieldError> {
        let width = image.width();
        let height = image.height();
        if width < 2 || height < 2 {
            return Err(HeightfieldError::TooSmall { width, height });
        }

        let stride = match image.texture_descriptor.format {
            TextureFormat::R8Unorm => 1,
            TextureFormat::Rgba8Unorm | TextureFormat::Rgba8UnormSrgb => 4,
            other => return Err(HeightfieldError::UnsupportedFormat(other)),
        };

        let data = image
            .data
            .as_ref()
            .ok_or(HeightfieldError::MissingPixelData)?;
        let sample_count = (width * height) as usize;
        if data.len() < sample_count * stride {
            return Err(HeightfieldError::MissingPixelData);
        }

        let samples = (0..sample_count)
            .map(|i| data[i * stride] as f32 / 255.0)
            .collect();

        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Sample by grid index, clamped to the field's edges
    pub fn sample(&self, x: u32, y: u32) -> f32 {
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        self.samples[(y * self.width + x) as usize]
    }

    /// World-space height at a grid index, vertical scale applied
    fn height_at(&self, x: u32, y: u32) -> f32 {
        self.sample(x, y) * HEIGHT_SCALE
    }

    /// Surface normal at a grid index from central height differences.
    /// Differences clamp at the field edges.
    fn normal_at(&self, x: u32, y: u32) -> [f32; 3] {
        let step_x = TILE_SIZE / (self.width - 1) as f32;
        let step_z = TILE_SIZE / (self.height - 1) as f32;

        let dx = self.height_at(x + 1, y) - self.height_at(x.saturating_sub(1), y);
        let dz = self.height_at(x, y + 1) - self.height_at(x, y.saturating_sub(1));

        Vec3::new(-dx / (2.0 * step_x), 1.0, -dz / (2.0 * step_z))
            .normalize()
            .into()
    }
}

/// Pick the heightfield subsampling step for a tile from its distance to the
/// focal viewpoint. At or under `LOD_NEAR` the tile meshes at full
/// resolution; at or beyond `LOD_FAR` at maximum simplification. The step is
/// capped by the block subdivision size.
pub fn lod_step_for_distance(distance: f32) -> u32 {
    let level = if distance <= LOD_NEAR {
        0
    } else if distance >= LOD_FAR {
        MAX_LOD_LEVEL
    } else {
        let t = (distance - LOD_NEAR) / (LOD_FAR - LOD_NEAR);
        (t * MAX_LOD_LEVEL as f32).ceil() as u32
    };
    (1 << level).min(LOD_BLOCK_SIZE)
}

/// Build the renderable mesh for one terrain tile.
///
/// The mesh spans [0, TILE_SIZE] on X and Z from the tile's origin corner,
/// with heights from the shared field scaled vertically. UVs span the
/// texture-scale factor so the grass texture repeats across the tile. `step`
/// subsamples the field grid; the final row and column are always emitted so
/// a simplified tile still spans the full tile.
pub fn build_tile_mesh(field: &Heightfield, step: u32) -> Mesh {
    let xs = grid_lines(field.width, step);
    let zs = grid_lines(field.height, step);

    let mut positions = Vec::with_capacity(xs.len() * zs.len());
    let mut normals = Vec::with_capacity(xs.len() * zs.len());
    let mut uvs = Vec::with_capacity(xs.len() * zs.len());

    for &gz in &zs {
        for &gx in &xs {
            let fx = gx as f32 / (field.width - 1) as f32;
            let fz = gz as f32 / (field.height - 1) as f32;
            positions.push([fx * TILE_SIZE, field.height_at(gx, gz), fz * TILE_SIZE]);
            normals.push(field.normal_at(gx, gz));
            uvs.push([fx * TEXTURE_SCALE, fz * TEXTURE_SCALE]);
        }
    }

    let row = xs.len() as u32;
    let mut indices = Vec::with_capacity((xs.len() - 1) * (zs.len() - 1) * 6);
    for z in 0..zs.len() as u32 - 1 {
        for x in 0..row - 1 {
            let i = z * row + x;
            // two triangles per grid cell, counter-clockwise seen from above
            indices.extend_from_slice(&[i, i + row, i + 1, i + 1, i + row, i + row + 1]);
        }
    }

    Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
    .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
    .with_inserted_indices(Indices::U32(indices))
}

/// Grid line indices 0, step, 2*step, ..., always ending at the last line
fn grid_lines(extent: u32, step: u32) -> Vec<u32> {
    let step = step.max(1) as usize;
    let mut lines: Vec<u32> = (0..extent - 1).step_by(step).collect();
    lines.push(extent - 1);
    lines
}
