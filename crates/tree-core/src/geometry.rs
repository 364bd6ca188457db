//! Procedural meshes shared by every instanced batch.

use crate::config::OrnamentKind;
use std::f32::consts::{PI, TAU};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MeshKind {
    Cube,
    Sphere,
    Torus,
    Quad,
}

impl MeshKind {
    pub const ALL: [MeshKind; 4] = [
        MeshKind::Cube,
        MeshKind::Sphere,
        MeshKind::Torus,
        MeshKind::Quad,
    ];

    pub fn for_ornament(kind: OrnamentKind) -> Self {
        match kind {
            OrnamentKind::Gift => MeshKind::Cube,
            OrnamentKind::Bauble | OrnamentKind::Light => MeshKind::Sphere,
            OrnamentKind::Bow => MeshKind::Torus,
        }
    }

    pub fn build(self) -> MeshData {
        match self {
            MeshKind::Cube => cube(1.0),
            MeshKind::Sphere => uv_sphere(0.5, 16, 16),
            MeshKind::Torus => torus(0.45, 0.15, 16, 32),
            MeshKind::Quad => quad(1.0, 1.0),
        }
    }
}

/// Axis-aligned cube centred on the origin, flat-shaded.
pub fn cube(size: f32) -> MeshData {
    let h = size * 0.5;
    // (normal, tangent u, tangent v)
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ];
    let mut mesh = MeshData::default();
    for (n, u, v) in faces {
        let base = mesh.vertices.len() as u16;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let position = [
                (n[0] + u[0] * su + v[0] * sv) * h,
                (n[1] + u[1] * su + v[1] * sv) * h,
                (n[2] + u[2] * su + v[2] * sv) * h,
            ];
            mesh.vertices.push(Vertex { position, normal: n });
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    mesh
}

pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let mut mesh = MeshData::default();
    for y in 0..=height_segments {
        let v = y as f32 / height_segments as f32;
        let theta = v * PI;
        for x in 0..=width_segments {
            let u = x as f32 / width_segments as f32;
            let phi = u * TAU;
            let normal = [-phi.cos() * theta.sin(), theta.cos(), phi.sin() * theta.sin()];
            mesh.vertices.push(Vertex {
                position: normal.map(|c| c * radius),
                normal,
            });
        }
    }
    let stride = width_segments + 1;
    for y in 0..height_segments {
        for x in 0..width_segments {
            let a = (y * stride + x) as u16;
            let b = (y * stride + x + 1) as u16;
            let c = ((y + 1) * stride + x) as u16;
            let d = ((y + 1) * stride + x + 1) as u16;
            if y != 0 {
                mesh.indices.extend_from_slice(&[a, c, b]);
            }
            if y != height_segments - 1 {
                mesh.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    mesh
}

/// Torus in the XY plane around the Z axis.
pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> MeshData {
    let mut mesh = MeshData::default();
    for j in 0..=radial_segments {
        let v = j as f32 / radial_segments as f32 * TAU;
        for i in 0..=tubular_segments {
            let u = i as f32 / tubular_segments as f32 * TAU;
            let position = [
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            ];
            let center = [radius * u.cos(), radius * u.sin(), 0.0];
            let normal = [
                (position[0] - center[0]) / tube,
                (position[1] - center[1]) / tube,
                (position[2] - center[2]) / tube,
            ];
            mesh.vertices.push(Vertex { position, normal });
        }
    }
    let stride = tubular_segments + 1;
    for j in 1..=radial_segments {
        for i in 1..=tubular_segments {
            let a = (stride * j + i - 1) as u16;
            let b = (stride * (j - 1) + i - 1) as u16;
            let c = (stride * (j - 1) + i) as u16;
            let d = (stride * j + i) as u16;
            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
    mesh
}

/// Unit quad in the XY plane facing +Z.
pub fn quad(width: f32, height: f32) -> MeshData {
    let (w, h) = (width * 0.5, height * 0.5);
    let normal = [0.0, 0.0, 1.0];
    MeshData {
        vertices: [(-w, -h), (w, -h), (w, h), (-w, h)]
            .into_iter()
            .map(|(x, y)| Vertex {
                position: [x, y, 0.0],
                normal,
            })
            .collect(),
        indices: vec![0, 1, 2, 0, 2, 3],
    }
}
