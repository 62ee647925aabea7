use std::f32::consts::{PI, TAU};

use cgmath::{InnerSpace, Vector3};

use crate::data_structures::placement::ShapeKind;

/// Segments around the circumference of round shapes.
pub const ROUND_SEGMENTS: u32 = 36;
/// Latitude bands of the sphere.
pub const SPHERE_STACKS: u32 = 18;
/// Top radius of the tapered cylinder; the bottom radius is 1.
pub const TAPER_TOP_RADIUS: f32 = 0.5;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl MeshVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// CPU-side triangle list for one primitive shape.
///
/// Triangles wind counter-clockwise when seen from the side their vertex
/// normals point to.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Unit-sized geometry for `shape`.
    ///
    /// - plane: the XZ square from -1 to 1 facing +Y
    /// - box: the cube from -0.5 to 0.5
    /// - sphere: radius 1 around the origin
    /// - cylinder, cone, tapered cylinder: base of radius 1 on y = 0, height 1
    pub fn for_shape(shape: ShapeKind) -> Self {
        match shape {
            ShapeKind::Plane => plane(),
            ShapeKind::Box => cuboid(),
            ShapeKind::Sphere => sphere(ROUND_SEGMENTS, SPHERE_STACKS),
            ShapeKind::Cylinder => frustum(ROUND_SEGMENTS, 1.0, 1.0),
            ShapeKind::Cone => frustum(ROUND_SEGMENTS, 1.0, 0.0),
            ShapeKind::TaperedCylinder => frustum(ROUND_SEGMENTS, 1.0, TAPER_TOP_RADIUS),
        }
    }

    fn push(&mut self, position: [f32; 3], normal: [f32; 3], tex_coords: [f32; 2]) -> u32 {
        self.vertices.push(MeshVertex {
            position,
            normal,
            tex_coords,
        });
        self.vertices.len() as u32 - 1
    }

    /// Push a triangle, flipping it if needed so it faces along its vertex normals.
    fn push_face(&mut self, a: u32, b: u32, c: u32) {
        let pos = |i: u32| Vector3::from(self.vertices[i as usize].position);
        let normal = |i: u32| Vector3::from(self.vertices[i as usize].normal);
        let face = (pos(b) - pos(a)).cross(pos(c) - pos(a));
        if face.dot(normal(a) + normal(b) + normal(c)) < 0.0 {
            self.indices.extend_from_slice(&[a, c, b]);
        } else {
            self.indices.extend_from_slice(&[a, b, c]);
        }
    }

    fn push_quad(&mut self, corners: [[f32; 3]; 4], normal: [f32; 3]) {
        let uvs = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        let base = self.vertices.len() as u32;
        for (corner, uv) in corners.iter().zip(uvs) {
            self.push(*corner, normal, uv);
        }
        self.push_face(base, base + 1, base + 2);
        self.push_face(base, base + 2, base + 3);
    }
}

pub fn plane() -> MeshData {
    let mut mesh = MeshData::default();
    mesh.push_quad(
        [
            [-1.0, 0.0, 1.0],
            [1.0, 0.0, 1.0],
            [1.0, 0.0, -1.0],
            [-1.0, 0.0, -1.0],
        ],
        [0.0, 1.0, 0.0],
    );
    mesh
}

pub fn cuboid() -> MeshData {
    let mut mesh = MeshData::default();
    // (normal, u axis, v axis) per face
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ];
    for (normal, u, v) in faces {
        let (n, u, v) = (Vector3::from(normal), Vector3::from(u), Vector3::from(v));
        let center = n * 0.5;
        let corner = |su: f32, sv: f32| -> [f32; 3] { (center + u * (0.5 * su) + v * (0.5 * sv)).into() };
        mesh.push_quad(
            [
                corner(-1.0, -1.0),
                corner(1.0, -1.0),
                corner(1.0, 1.0),
                corner(-1.0, 1.0),
            ],
            normal,
        );
    }
    mesh
}

pub fn sphere(sectors: u32, stacks: u32) -> MeshData {
    let mut mesh = MeshData::default();
    for i in 0..=stacks {
        let phi = PI / 2.0 - i as f32 * PI / stacks as f32;
        let (y, ring) = (phi.sin(), phi.cos());
        for j in 0..=sectors {
            let theta = j as f32 * TAU / sectors as f32;
            let position = [ring * theta.cos(), y, ring * theta.sin()];
            let uv = [j as f32 / sectors as f32, 1.0 - i as f32 / stacks as f32];
            mesh.push(position, position, uv);
        }
    }
    let row = sectors + 1;
    for i in 0..stacks {
        for j in 0..sectors {
            let k1 = i * row + j;
            let k2 = k1 + row;
            // the pole rows collapse to a point, skip their degenerate halves
            if i != 0 {
                mesh.push_face(k1, k2, k1 + 1);
            }
            if i != stacks - 1 {
                mesh.push_face(k1 + 1, k2, k2 + 1);
            }
        }
    }
    mesh
}

/// A capped cone section with radius `bottom` on y = 0 and `top` on y = 1.
///
/// A zero top radius yields a cone without a top cap.
pub fn frustum(sectors: u32, bottom: f32, top: f32) -> MeshData {
    let mut mesh = MeshData::default();

    // side
    for j in 0..=sectors {
        let u = j as f32 / sectors as f32;
        let theta = u * TAU;
        let (cos, sin) = (theta.cos(), theta.sin());
        let normal: [f32; 3] = Vector3::new(cos, bottom - top, sin).normalize().into();
        mesh.push([bottom * cos, 0.0, bottom * sin], normal, [u, 0.0]);
        mesh.push([top * cos, 1.0, top * sin], normal, [u, 1.0]);
    }
    for j in 0..sectors {
        let (b0, t0, b1, t1) = (2 * j, 2 * j + 1, 2 * j + 2, 2 * j + 3);
        mesh.push_face(b0, b1, t0);
        if top > 0.0 {
            mesh.push_face(t0, b1, t1);
        }
    }

    push_cap(&mut mesh, sectors, bottom, 0.0, -1.0);
    if top > 0.0 {
        push_cap(&mut mesh, sectors, top, 1.0, 1.0);
    }
    mesh
}

fn push_cap(mesh: &mut MeshData, sectors: u32, radius: f32, y: f32, facing: f32) {
    let normal = [0.0, facing, 0.0];
    let center = mesh.push([0.0, y, 0.0], normal, [0.5, 0.5]);
    let first = mesh.vertices.len() as u32;
    for j in 0..=sectors {
        let theta = j as f32 * TAU / sectors as f32;
        let (cos, sin) = (theta.cos(), theta.sin());
        mesh.push(
            [radius * cos, y, radius * sin],
            normal,
            [0.5 + 0.5 * cos, 0.5 + 0.5 * sin],
        );
    }
    for j in 0..sectors {
        mesh.push_face(center, first + j, first + j + 1);
    }
}
