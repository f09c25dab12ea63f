//! The gallery's fixed lighting rig and its GPU resources.
//!
//! One uniform carries ambient light, fog, the directional "sun" with the
//! orthographic frustum used for its shadow map, and up to
//! [`MAX_LOCAL_LIGHTS`] point/spot lights.

use cgmath::{InnerSpace, Matrix4, Point3, Vector3};
use wgpu::util::DeviceExt;

use crate::{camera::OPENGL_TO_WGPU_MATRIX, config::GalleryConfig, data_structures::texture};

pub const MAX_LOCAL_LIGHTS: usize = 8;
pub const SHADOW_MAP_SIZE: u32 = 2048;

/// Point light (`cone_deg == None`) or spot light.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalLight {
    pub position: [f32; 3],
    pub colour: [f32; 3],
    pub intensity: f32,
    pub range: f32,
    pub direction: [f32; 3],
    pub cone_deg: Option<f32>,
}

impl LocalLight {
    pub fn point(position: [f32; 3], colour: [f32; 3], intensity: f32, range: f32) -> Self {
        Self {
            position,
            colour,
            intensity,
            range,
            direction: [0.0, -1.0, 0.0],
            cone_deg: None,
        }
    }

    pub fn spot(position: [f32; 3], target: [f32; 3], colour: [f32; 3], intensity: f32, cone_deg: f32) -> Self {
        let direction = (Point3::from(target) - Point3::from(position)).normalize();
        Self {
            position,
            colour,
            intensity,
            range: 30.0,
            direction: direction.into(),
            cone_deg: Some(cone_deg),
        }
    }

    fn to_raw(&self) -> LocalLightRaw {
        LocalLightRaw {
            position: self.position,
            range: self.range,
            colour: self.colour,
            intensity: self.intensity,
            direction: self.direction,
            // -1 lets every direction through, i.e. a point light
            cos_cutoff: self.cone_deg.map_or(-1.0, |deg| deg.to_radians().cos()),
        }
    }
}

/// Directional light with the box its shadow map covers.
#[derive(Clone, Debug, PartialEq)]
pub struct Sun {
    pub direction: Vector3<f32>,
    pub colour: [f32; 3],
    pub intensity: f32,
    /// Half extent of the orthographic shadow frustum.
    pub shadow_extent: f32,
    pub shadow_distance: f32,
}

impl Sun {
    pub fn view_proj(&self) -> Matrix4<f32> {
        let direction = self.direction.normalize();
        let eye = Point3::new(0.0, 0.0, 0.0) - direction * self.shadow_distance;
        let up = if direction.y.abs() > 0.99 {
            Vector3::unit_z()
        } else {
            Vector3::unit_y()
        };
        let view = Matrix4::look_at_rh(eye, Point3::new(0.0, 0.0, 0.0), up);
        let e = self.shadow_extent;
        let proj = cgmath::ortho(-e, e, -e, e, 0.1, self.shadow_distance * 2.0);
        OPENGL_TO_WGPU_MATRIX * proj * view
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LightRig {
    pub ambient: [f32; 3],
    pub ambient_intensity: f32,
    pub sun: Sun,
    pub locals: Vec<LocalLight>,
}

impl LightRig {
    /// Warm ceiling lights over the room and spots on the long walls.
    pub fn gallery(config: &GalleryConfig) -> Self {
        let w = config.room_half_width;
        let d = config.room_half_depth;
        let h = config.wall_height - 1.0;
        let warm = [1.0, 0.95, 0.85];
        Self {
            ambient: [1.0, 1.0, 1.0],
            ambient_intensity: 0.35,
            sun: Sun {
                direction: Vector3::new(-10.0, -20.0, -10.0),
                colour: [1.0, 1.0, 1.0],
                intensity: 0.6,
                shadow_extent: (w * w + d * d).sqrt() + config.wall_height,
                shadow_distance: 40.0,
            },
            locals: vec![
                LocalLight::point([-w / 2.0, h, -d / 2.0], warm, 0.8, 25.0),
                LocalLight::point([w / 2.0, h, -d / 2.0], warm, 0.8, 25.0),
                LocalLight::point([-w / 2.0, h, d / 2.0], warm, 0.8, 25.0),
                LocalLight::point([w / 2.0, h, d / 2.0], warm, 0.8, 25.0),
                LocalLight::spot([0.0, h, -d / 2.0], [0.0, 4.0, -d], warm, 1.2, 35.0),
                LocalLight::spot([0.0, h, d / 2.0], [0.0, 4.0, d], warm, 1.2, 35.0),
            ],
        }
    }

    pub fn to_uniform(&self, config: &GalleryConfig) -> LightUniform {
        if self.locals.len() > MAX_LOCAL_LIGHTS {
            log::warn!(
                "{} local lights configured, only the first {} are used",
                self.locals.len(),
                MAX_LOCAL_LIGHTS
            );
        }
        let mut lights = [<LocalLightRaw as bytemuck::Zeroable>::zeroed(); MAX_LOCAL_LIGHTS];
        let count = self.locals.len().min(MAX_LOCAL_LIGHTS);
        for (slot, light) in lights.iter_mut().zip(&self.locals) {
            *slot = light.to_raw();
        }
        let fog = config.clear_colour.map(|c| c as f32);
        LightUniform {
            ambient: self.ambient,
            ambient_intensity: self.ambient_intensity,
            fog_colour: fog,
            fog_near: config.fog_near,
            sun_direction: self.sun.direction.normalize().into(),
            fog_far: config.fog_far,
            sun_colour: self.sun.colour,
            sun_intensity: self.sun.intensity,
            sun_view_proj: self.sun.view_proj().into(),
            lights,
            light_count: count as u32,
            _padding: [0; 3],
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LocalLightRaw {
    position: [f32; 3],
    range: f32,
    colour: [f32; 3],
    intensity: f32,
    direction: [f32; 3],
    cos_cutoff: f32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    ambient: [f32; 3],
    ambient_intensity: f32,
    fog_colour: [f32; 3],
    fog_near: f32,
    sun_direction: [f32; 3],
    fog_far: f32,
    sun_colour: [f32; 3],
    sun_intensity: f32,
    sun_view_proj: [[f32; 4]; 4],
    lights: [LocalLightRaw; MAX_LOCAL_LIGHTS],
    light_count: u32,
    // uniforms are laid out in 16 byte steps
    _padding: [u32; 3],
}

impl LightUniform {
    pub fn light_count(&self) -> u32 {
        self.light_count
    }
}

#[derive(Debug)]
pub struct LightResources {
    pub uniform: LightUniform,
    pub buffer: wgpu::Buffer,
    pub shadow_map: texture::Texture,
    /// Uniform + shadow map, for the main pass.
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
    /// Uniform only, for the pass that writes the shadow map.
    pub shadow_bind_group: wgpu::BindGroup,
    pub shadow_bind_group_layout: wgpu::BindGroupLayout,
}

impl LightResources {
    pub fn new(device: &wgpu::Device, uniform: LightUniform) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Light Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let shadow_map = texture::Texture::create_shadow_map(device, SHADOW_MAP_SIZE);

        let uniform_entry = wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[
                uniform_entry,
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        sample_type: wgpu::TextureSampleType::Depth,
                        view_dimension: wgpu::TextureViewDimension::D2,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                    count: None,
                },
            ],
            label: Some("light_bind_group_layout"),
        });
        let shadow_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[uniform_entry],
                label: Some("shadow_bind_group_layout"),
            });

        let comparison_sampler = match &shadow_map.sampler {
            Some(sampler) => sampler.clone(),
            None => texture::create_comparison_sampler(device),
        };
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&shadow_map.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&comparison_sampler),
                },
            ],
            label: Some("light_bind_group"),
        });
        let shadow_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &shadow_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("shadow_bind_group"),
        });

        Self {
            uniform,
            buffer,
            shadow_map,
            bind_group,
            bind_group_layout,
            shadow_bind_group,
            shadow_bind_group_layout,
        }
    }

    pub fn write(&mut self, queue: &wgpu::Queue, uniform: LightUniform) {
        self.uniform = uniform;
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}
