//! Loading of external assets: raw bytes, image textures and glTF models.
//!
//! Everything here is async so the same code runs on the web, where files are
//! fetched from the page's origin, and natively, where they are read from
//! `./assets`.

use cgmath::{InnerSpace, Matrix, Matrix3, Matrix4, Point3, SquareMatrix, Transform, Vector3};

use crate::{
    data_structures::{
        geometry::{Aabb, MeshData},
        model::{self, MaterialUniform, ModelVertex},
        texture::Texture,
    },
    resources::texture::{load_binary, load_texture, material_layout},
};

pub mod texture;

/// Resolves a URI referenced by `file_name` against that file's directory.
pub fn resolve_relative(file_name: &str, uri: &str) -> String {
    match file_name.rsplit_once('/') {
        Some((dir, _)) if !uri.starts_with('/') => format!("{dir}/{uri}"),
        _ => uri.to_string(),
    }
}

/// Loads a `.glb`/`.gltf` file into a single model.
///
/// Node transforms are baked into the vertices so the returned model can be
/// placed with one instance. The returned box bounds the baked vertices.
pub async fn load_model_gltf(
    file_name: &str,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<(model::Model, Aabb)> {
    let bytes = load_binary(file_name).await?;
    let gltf = gltf::Gltf::from_slice(&bytes)?;

    let mut buffer_data: Vec<Vec<u8>> = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => {
                let blob = gltf
                    .blob
                    .as_deref()
                    .ok_or_else(|| anyhow::anyhow!("{file_name} references a missing binary chunk"))?;
                buffer_data.push(blob.into());
            }
            gltf::buffer::Source::Uri(uri) => {
                buffer_data.push(load_binary(&resolve_relative(file_name, uri)).await?)
            }
        }
    }

    let layout = material_layout(device);
    let mut materials = Vec::new();
    for material in gltf.materials() {
        let pbr = material.pbr_metallic_roughness();
        let diffuse_texture = match pbr.base_color_texture() {
            Some(info) => match info.texture().source().source() {
                gltf::image::Source::View { view, mime_type } => {
                    let start = view.offset();
                    let end = start + view.length();
                    let data = buffer_data
                        .get(view.buffer().index())
                        .and_then(|buffer| buffer.get(start..end))
                        .ok_or_else(|| anyhow::anyhow!("{file_name}: image view out of bounds"))?;
                    Texture::from_bytes(
                        device,
                        queue,
                        data,
                        file_name,
                        mime_type.split('/').last(),
                        false,
                    )?
                }
                gltf::image::Source::Uri { uri, mime_type } => {
                    let format = mime_type.and_then(|mt| mt.split('/').last());
                    load_texture(&resolve_relative(file_name, uri), false, device, queue, format).await?
                }
            },
            None => Texture::from_colour(device, queue, [255; 4]),
        };
        let mut uniform = MaterialUniform::tinted(pbr.base_color_factor());
        uniform.roughness = pbr.roughness_factor();
        uniform.metalness = pbr.metallic_factor();
        let name = material.name().unwrap_or(file_name);
        materials.push(model::Material::new(
            device,
            name,
            diffuse_texture,
            Texture::create_default_normal_map(1, 1, device, queue),
            uniform,
            &layout,
        ));
    }
    // primitives without a material fall back to plain white
    let default_material = materials.len();
    materials.push(model::Material::new(
        device,
        "default",
        Texture::from_colour(device, queue, [255; 4]),
        Texture::create_default_normal_map(1, 1, device, queue),
        MaterialUniform::default(),
        &layout,
    ));

    let mut primitives = Vec::new();
    let scene = gltf
        .default_scene()
        .or_else(|| gltf.scenes().next())
        .ok_or_else(|| anyhow::anyhow!("{file_name} contains no scene"))?;
    for node in scene.nodes() {
        collect_primitives(&node, Matrix4::identity(), &buffer_data, default_material, &mut primitives);
    }

    let bounds = primitives
        .iter()
        .filter_map(|(mesh, _)| mesh.bounds())
        .reduce(|a, b| a.union(&b))
        .ok_or_else(|| anyhow::anyhow!("{file_name} contains no geometry"))?;

    let meshes = primitives
        .into_iter()
        .enumerate()
        .map(|(idx, (mesh, material))| mesh.into_mesh(device, &format!("{file_name}#{idx}"), material))
        .collect();

    Ok((model::Model { meshes, materials }, bounds))
}

fn collect_primitives(
    node: &gltf::Node,
    parent: Matrix4<f32>,
    buffer_data: &[Vec<u8>],
    default_material: usize,
    out: &mut Vec<(MeshData, usize)>,
) {
    let transform = parent * Matrix4::from(node.transform().matrix());
    let normal_matrix = normal_matrix(&transform);

    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            let reader = primitive.reader(|buffer| buffer_data.get(buffer.index()).map(Vec::as_slice));
            let Some(positions) = reader.read_positions() else {
                log::warn!("primitive {} of mesh {:?} has no positions", primitive.index(), mesh.name());
                continue;
            };
            let mut vertices: Vec<ModelVertex> = positions
                .map(|p| ModelVertex {
                    position: transform.transform_point(Point3::from(p)).into(),
                    ..Default::default()
                })
                .collect();
            if let Some(normals) = reader.read_normals() {
                for (vertex, n) in vertices.iter_mut().zip(normals) {
                    let n = normal_matrix * Vector3::from(n);
                    vertex.normal = if n.magnitude2() > 0.0 { n.normalize().into() } else { n.into() };
                }
            }
            if let Some(tex_coords) = reader.read_tex_coords(0) {
                for (vertex, uv) in vertices.iter_mut().zip(tex_coords.into_f32()) {
                    vertex.tex_coords = uv;
                }
            }
            let indices = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                None => (0..vertices.len() as u32).collect(),
            };
            let mut data = MeshData { vertices, indices };
            data.compute_tangents();
            let material = primitive.material().index().unwrap_or(default_material);
            out.push((data, material));
        }
    }

    for child in node.children() {
        collect_primitives(&child, transform, buffer_data, default_material, out);
    }
}

fn normal_matrix(transform: &Matrix4<f32>) -> Matrix3<f32> {
    let linear = Matrix3::from_cols(
        transform.x.truncate(),
        transform.y.truncate(),
        transform.z.truncate(),
    );
    linear
        .invert()
        .map(|inverse| inverse.transpose())
        .unwrap_or(linear)
}
