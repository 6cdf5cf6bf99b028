use crate::color;
use crate::config::{Rgba8, Scale};
use crate::world::Heightfield;
use glam::Vec3;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [u8; 4],
}

impl Vertex {
    fn new(position: Vec3, normal: Vec3, color: Rgba8) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            color: color.to_array(),
        }
    }
}

/// Independent triangles: every three vertices form one face.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub terrain_vertex_count: usize,
}

/// Vertices `build` emits for a grid of side `size`.
pub fn vertex_count(size: usize) -> usize {
    let cells = size.saturating_sub(1);
    cells * cells * 6 + 6
}

#[cfg(test)]
impl Mesh {
    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn terrain(&self) -> &[Vertex] {
        &self.vertices[..self.terrain_vertex_count]
    }

    pub fn water(&self) -> &[Vertex] {
        &self.vertices[self.terrain_vertex_count..]
    }
}

/// Triangulates the heightfield (two faces per cell, `x` outer and `y` inner)
/// and appends a flat water quad at `water_height` over the same footprint.
///
/// Normals are the raw, unnormalised cross product of each face's edges and
/// are shared by its three vertices.
pub fn build(heightfield: &Heightfield, scale: Scale, water_height: f32, water_color: Rgba8) -> Mesh {
    let size = heightfield.size();
    let cells = size.saturating_sub(1);
    let mut vertices = Vec::with_capacity(vertex_count(size));

    let corner = |x: usize, y: usize| {
        Vec3::new(x as f32 * scale.x, y as f32 * scale.y, scale.z * heightfield.get(x, y))
    };
    let shade = |x: usize, y: usize| color::classify(heightfield.get(x, y));

    for x in 0..cells {
        for y in 0..cells {
            let bottom_left = corner(x, y);
            let top_left = corner(x, y + 1);
            let bottom_right = corner(x + 1, y);
            let top_right = corner(x + 1, y + 1);

            let first = (bottom_left - top_left).cross(bottom_right - bottom_left);
            vertices.push(Vertex::new(bottom_left, first, shade(x, y)));
            vertices.push(Vertex::new(top_left, first, shade(x, y + 1)));
            vertices.push(Vertex::new(bottom_right, first, shade(x + 1, y)));

            let second = (top_left - top_right).cross(bottom_right - top_left);
            vertices.push(Vertex::new(top_left, second, shade(x, y + 1)));
            vertices.push(Vertex::new(top_right, second, shade(x + 1, y + 1)));
            vertices.push(Vertex::new(bottom_right, second, shade(x + 1, y)));
        }
    }
    let terrain_vertex_count = vertices.len();

    let z = water_height * scale.z;
    let width = cells as f32 * scale.x;
    let depth = cells as f32 * scale.y;
    let up = Vec3::Z;
    let water = [
        Vec3::new(0.0, 0.0, z),
        Vec3::new(0.0, depth, z),
        Vec3::new(width, 0.0, z),
        Vec3::new(0.0, depth, z),
        Vec3::new(width, depth, z),
        Vec3::new(width, 0.0, z),
    ];
    vertices.extend(water.into_iter().map(|p| Vertex::new(p, up, water_color)));

    let mesh = Mesh { vertices, terrain_vertex_count };
    log::info!(
        "Built landscape mesh: {} terrain triangles, {} vertices total",
        mesh.terrain_vertex_count / 3,
        mesh.vertices.len()
    );
    mesh
}
