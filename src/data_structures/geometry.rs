//! Procedural meshes built on the CPU.
//!
//! Every generator emits counter-clockwise front faces (matching the
//! pipelines' `FrontFace::Ccw` + back-face culling), unit normals and
//! per-vertex tangents so the same shader can light them as loaded models.

use std::f32::consts::PI;

use cgmath::{InnerSpace, Matrix4, Point3, Transform, Vector2, Vector3};
use wgpu::util::DeviceExt;

use crate::data_structures::model::{self, ModelVertex};

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    pub fn from_points<I: IntoIterator<Item = Point3<f32>>>(points: I) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| {
            (
                Point3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z)),
                Point3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z)),
            )
        });
        Some(Self { min, max })
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: Point3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: Point3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }

    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }

    pub fn center(&self) -> Point3<f32> {
        self.min + self.size() * 0.5
    }

    pub fn max_extent(&self) -> f32 {
        let size = self.size();
        size.x.max(size.y).max(size.z)
    }

    pub fn corners(&self) -> [Point3<f32>; 8] {
        let (a, b) = (self.min, self.max);
        [
            Point3::new(a.x, a.y, a.z),
            Point3::new(b.x, a.y, a.z),
            Point3::new(a.x, b.y, a.z),
            Point3::new(b.x, b.y, a.z),
            Point3::new(a.x, a.y, b.z),
            Point3::new(b.x, a.y, b.z),
            Point3::new(a.x, b.y, b.z),
            Point3::new(b.x, b.y, b.z),
        ]
    }

    /// Box around this box after `matrix` was applied.
    pub fn transformed(&self, matrix: &Matrix4<f32>) -> Aabb {
        let corners = self.corners().map(|c| matrix.transform_point(c));
        Aabb::from_points(corners).unwrap_or(*self)
    }
}

/// Solid forms a procedural sculpture can take.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Cube,
    Sphere,
    Cone,
    Cylinder,
    Torus,
    TorusKnot,
    Octahedron,
}

impl Shape {
    pub fn mesh(self) -> MeshData {
        match self {
            Shape::Cube => MeshData::cuboid(1.0, 1.0, 1.0),
            Shape::Sphere => MeshData::sphere(0.5, 48, 32),
            Shape::Cone => MeshData::cylinder(0.0, 0.5, 1.0, 48),
            Shape::Cylinder => MeshData::cylinder(0.4, 0.4, 1.0, 48),
            Shape::Torus => MeshData::torus(0.4, 0.15, 24, 64),
            Shape::TorusKnot => MeshData::torus_knot(0.4, 0.12, 128, 16, 2, 3),
            Shape::Octahedron => MeshData::octahedron(0.5),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u32>,
}

fn vertex(position: Vector3<f32>, normal: Vector3<f32>, uv: [f32; 2]) -> ModelVertex {
    ModelVertex {
        position: position.into(),
        tex_coords: uv,
        normal: normal.into(),
        tangent: [0.0; 3],
        bitangent: [0.0; 3],
    }
}

impl MeshData {
    /// Box centred on the origin.
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let (hx, hy, hz) = (width / 2.0, height / 2.0, depth / 2.0);
        let mut mesh = Self::default();
        let x = Vector3::unit_x();
        let y = Vector3::unit_y();
        let z = Vector3::unit_z();
        mesh.quad(x * hx, x, -z, y, hz, hy);
        mesh.quad(-x * hx, -x, z, y, hz, hy);
        mesh.quad(y * hy, y, x, -z, hx, hz);
        mesh.quad(-y * hy, -y, x, z, hx, hz);
        mesh.quad(z * hz, z, x, y, hx, hy);
        mesh.quad(-z * hz, -z, -x, y, hx, hy);
        mesh.compute_tangents();
        mesh
    }

    /// Rectangle in the xy plane facing +z.
    pub fn plane(width: f32, height: f32) -> Self {
        let mut mesh = Self::default();
        mesh.quad(
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::unit_z(),
            Vector3::unit_x(),
            Vector3::unit_y(),
            width / 2.0,
            height / 2.0,
        );
        mesh.compute_tangents();
        mesh
    }

    /// Rectangle in the xz plane facing +y with texture coordinates tiled `repeat` times.
    pub fn floor(width: f32, depth: f32, repeat: f32) -> Self {
        let mut mesh = Self::default();
        mesh.quad(
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::unit_y(),
            Vector3::unit_x(),
            -Vector3::unit_z(),
            width / 2.0,
            depth / 2.0,
        );
        mesh.vertices.iter_mut().for_each(|v| {
            v.tex_coords = [v.tex_coords[0] * repeat, v.tex_coords[1] * repeat];
        });
        mesh.compute_tangents();
        mesh
    }

    /// Adds a quad whose front face points along `normal`. `u × v` must equal `normal`.
    fn quad(
        &mut self,
        center: Vector3<f32>,
        normal: Vector3<f32>,
        u: Vector3<f32>,
        v: Vector3<f32>,
        half_u: f32,
        half_v: f32,
    ) {
        let base = self.vertices.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let position = center + u * (su * half_u) + v * (sv * half_v);
            let uv = [(su + 1.0) / 2.0, 1.0 - (sv + 1.0) / 2.0];
            self.vertices.push(vertex(position, normal, uv));
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let mut mesh = Self::default();
        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                let normal = Vector3::new(
                    -(u * 2.0 * PI).cos() * (v * PI).sin(),
                    (v * PI).cos(),
                    (u * 2.0 * PI).sin() * (v * PI).sin(),
                );
                mesh.vertices.push(vertex(normal * radius, normal, [u, v]));
            }
        }
        let row = width_segments + 1;
        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;
                if iy != 0 {
                    mesh.indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height_segments - 1 {
                    mesh.indices.extend_from_slice(&[b, c, d]);
                }
            }
        }
        mesh.compute_tangents();
        mesh
    }

    /// Capped cylinder along y, centred on the origin. A zero top radius makes a cone.
    pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, segments: u32) -> Self {
        let mut mesh = Self::default();
        let half = height / 2.0;
        let slope = (radius_bottom - radius_top) / height;

        for (row, (radius, y)) in [(radius_top, half), (radius_bottom, -half)].iter().enumerate() {
            for x in 0..=segments {
                let u = x as f32 / segments as f32;
                let (sin, cos) = (u * 2.0 * PI).sin_cos();
                let normal = Vector3::new(sin, slope, cos).normalize();
                mesh.vertices.push(vertex(
                    Vector3::new(radius * sin, *y, radius * cos),
                    normal,
                    [u, row as f32],
                ));
            }
        }
        let row = segments + 1;
        for x in 0..segments {
            let a = x;
            let b = row + x;
            let c = row + x + 1;
            let d = x + 1;
            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }

        if radius_top > 0.0 {
            mesh.cap(radius_top, half, true, segments);
        }
        if radius_bottom > 0.0 {
            mesh.cap(radius_bottom, -half, false, segments);
        }
        mesh.compute_tangents();
        mesh
    }

    fn cap(&mut self, radius: f32, y: f32, top: bool, segments: u32) {
        let normal = if top {
            Vector3::unit_y()
        } else {
            -Vector3::unit_y()
        };
        let center = self.vertices.len() as u32;
        self.vertices
            .push(vertex(Vector3::new(0.0, y, 0.0), normal, [0.5, 0.5]));
        for x in 0..=segments {
            let (sin, cos) = (x as f32 / segments as f32 * 2.0 * PI).sin_cos();
            self.vertices.push(vertex(
                Vector3::new(radius * sin, y, radius * cos),
                normal,
                [0.5 + sin * 0.5, 0.5 + cos * 0.5],
            ));
        }
        for x in 0..segments {
            let i = center + 1 + x;
            if top {
                self.indices.extend_from_slice(&[center, i, i + 1]);
            } else {
                self.indices.extend_from_slice(&[center, i + 1, i]);
            }
        }
    }

    /// Ring in the xy plane around the origin.
    pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Self {
        let mut mesh = Self::default();
        for j in 0..=radial_segments {
            for i in 0..=tubular_segments {
                let u = i as f32 / tubular_segments as f32 * 2.0 * PI;
                let v = j as f32 / radial_segments as f32 * 2.0 * PI;
                let position = Vector3::new(
                    (radius + tube * v.cos()) * u.cos(),
                    (radius + tube * v.cos()) * u.sin(),
                    tube * v.sin(),
                );
                let center = Vector3::new(radius * u.cos(), radius * u.sin(), 0.0);
                mesh.vertices.push(vertex(
                    position,
                    (position - center).normalize(),
                    [
                        i as f32 / tubular_segments as f32,
                        j as f32 / radial_segments as f32,
                    ],
                ));
            }
        }
        let row = tubular_segments + 1;
        for j in 1..=radial_segments {
            for i in 1..=tubular_segments {
                let a = row * j + i - 1;
                let b = row * (j - 1) + i - 1;
                let c = row * (j - 1) + i;
                let d = row * j + i;
                mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }
        mesh.compute_tangents();
        mesh
    }

    /// (p, q) torus knot swept with a circular tube.
    pub fn torus_knot(
        radius: f32,
        tube: f32,
        tubular_segments: u32,
        radial_segments: u32,
        p: u32,
        q: u32,
    ) -> Self {
        let curve = |u: f32| {
            let quo = q as f32 / p as f32 * u;
            let cs = quo.cos();
            Vector3::new(
                radius * (2.0 + cs) * 0.5 * u.cos(),
                radius * (2.0 + cs) * 0.5 * u.sin(),
                radius * quo.sin() * 0.5,
            )
        };

        let mut mesh = Self::default();
        for i in 0..=tubular_segments {
            let u = i as f32 / tubular_segments as f32 * p as f32 * 2.0 * PI;
            let p1 = curve(u);
            let p2 = curve(u + 0.01);
            let t = p2 - p1;
            let n = p2 + p1;
            let b = t.cross(n).normalize();
            let n = b.cross(t).normalize();
            for j in 0..=radial_segments {
                let v = j as f32 / radial_segments as f32 * 2.0 * PI;
                let cx = -tube * v.cos();
                let cy = tube * v.sin();
                let position = p1 + n * cx + b * cy;
                mesh.vertices.push(vertex(
                    position,
                    (position - p1).normalize(),
                    [
                        i as f32 / tubular_segments as f32,
                        j as f32 / radial_segments as f32,
                    ],
                ));
            }
        }
        let row = radial_segments + 1;
        for j in 1..=tubular_segments {
            for i in 1..=radial_segments {
                let a = row * (j - 1) + (i - 1);
                let b = row * j + (i - 1);
                let c = row * j + i;
                let d = row * (j - 1) + i;
                mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }
        mesh.compute_tangents();
        mesh
    }

    /// Flat shaded octahedron with its tips on the axes.
    pub fn octahedron(radius: f32) -> Self {
        let mut mesh = Self::default();
        for sx in [1.0f32, -1.0] {
            for sy in [1.0f32, -1.0] {
                for sz in [1.0f32, -1.0] {
                    let x = Vector3::new(sx * radius, 0.0, 0.0);
                    let y = Vector3::new(0.0, sy * radius, 0.0);
                    let z = Vector3::new(0.0, 0.0, sz * radius);
                    let normal = Vector3::new(sx, sy, sz).normalize();
                    let corners = if sx * sy * sz > 0.0 {
                        [x, y, z]
                    } else {
                        [x, z, y]
                    };
                    let base = mesh.vertices.len() as u32;
                    for (corner, uv) in corners.into_iter().zip([[0.0, 1.0], [0.5, 0.0], [1.0, 1.0]]) {
                        mesh.vertices.push(vertex(corner, normal, uv));
                    }
                    mesh.indices.extend_from_slice(&[base, base + 1, base + 2]);
                }
            }
        }
        mesh.compute_tangents();
        mesh
    }

    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.vertices.iter().map(|v| Point3::from(v.position)))
    }

    /// Averages per-triangle tangents and bitangents into the vertices.
    pub fn compute_tangents(&mut self) {
        let vertices = &mut self.vertices;
        vertices.iter_mut().for_each(|v| {
            v.tangent = [0.0; 3];
            v.bitangent = [0.0; 3];
        });
        let mut triangles_included = vec![0u32; vertices.len()];

        for c in self.indices.chunks(3) {
            if c.len() < 3 {
                continue;
            }
            let (i0, i1, i2) = (c[0] as usize, c[1] as usize, c[2] as usize);
            let pos0: Vector3<f32> = vertices[i0].position.into();
            let pos1: Vector3<f32> = vertices[i1].position.into();
            let pos2: Vector3<f32> = vertices[i2].position.into();
            let uv0: Vector2<f32> = vertices[i0].tex_coords.into();
            let uv1: Vector2<f32> = vertices[i1].tex_coords.into();
            let uv2: Vector2<f32> = vertices[i2].tex_coords.into();

            let delta_pos1 = pos1 - pos0;
            let delta_pos2 = pos2 - pos0;
            let delta_uv1 = uv1 - uv0;
            let delta_uv2 = uv2 - uv0;

            let det = delta_uv1.x * delta_uv2.y - delta_uv1.y * delta_uv2.x;
            if det.abs() < f32::EPSILON {
                continue;
            }
            let r = 1.0 / det;
            let tangent = (delta_pos1 * delta_uv2.y - delta_pos2 * delta_uv1.y) * r;
            // flipped for right-handed normal maps in wgpu's texture space
            let bitangent = (delta_pos2 * delta_uv1.x - delta_pos1 * delta_uv2.x) * -r;

            for i in [i0, i1, i2] {
                vertices[i].tangent = (tangent + Vector3::from(vertices[i].tangent)).into();
                vertices[i].bitangent = (bitangent + Vector3::from(vertices[i].bitangent)).into();
                triangles_included[i] += 1;
            }
        }

        for (i, n) in triangles_included.into_iter().enumerate() {
            if n == 0 {
                continue;
            }
            let denom = 1.0 / n as f32;
            let v = &mut vertices[i];
            v.tangent = (Vector3::from(v.tangent) * denom).into();
            v.bitangent = (Vector3::from(v.bitangent) * denom).into();
        }
    }

    /// Uploads the mesh. `material` indexes into the owning model's materials.
    pub fn into_mesh(self, device: &wgpu::Device, name: &str, material: usize) -> model::Mesh {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Vertex Buffer", name)),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Index Buffer", name)),
            contents: bytemuck::cast_slice(&self.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        model::Mesh {
            name: name.to_string(),
            vertex_buffer,
            index_buffer,
            num_elements: self.indices.len() as u32,
            material,
        }
    }
}
