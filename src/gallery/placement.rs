//! Where frames, canvases and sculptures go.
//!
//! Artworks give a nominal point on a wall. The wall is picked by comparing
//! the horizontal offset with the depth offset: `|x| > |z|` means a side
//! wall, anything else (ties included) one of the depth walls. Frames are
//! pushed half their depth into the room so their back face is flush with the
//! wall; canvases sit a small gap in front of the frame's front face.

use cgmath::{Deg, One, Quaternion, Rotation3, Vector3};

use crate::{
    config::GalleryConfig,
    data_structures::{geometry::Aabb, instance::Instance},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WallSide {
    /// z < 0
    Back,
    /// z >= 0
    Front,
    /// x < 0
    Left,
    /// x >= 0
    Right,
}

impl WallSide {
    pub fn classify(position: Vector3<f32>) -> Self {
        if position.x.abs() > position.z.abs() {
            if position.x < 0.0 {
                WallSide::Left
            } else {
                WallSide::Right
            }
        } else if position.z < 0.0 {
            WallSide::Back
        } else {
            WallSide::Front
        }
    }

    /// Unit normal pointing into the room.
    pub fn normal(self) -> Vector3<f32> {
        match self {
            WallSide::Back => Vector3::unit_z(),
            WallSide::Front => -Vector3::unit_z(),
            WallSide::Left => Vector3::unit_x(),
            WallSide::Right => -Vector3::unit_x(),
        }
    }

    /// Turns a quad facing +z so it faces into the room from this wall.
    pub fn rotation(self) -> Quaternion<f32> {
        match self {
            WallSide::Back => Quaternion::one(),
            WallSide::Front => Quaternion::from_angle_y(Deg(180.0)),
            WallSide::Left => Quaternion::from_angle_y(Deg(90.0)),
            WallSide::Right => Quaternion::from_angle_y(Deg(-90.0)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallPlacement {
    pub wall: WallSide,
    /// Centre of the frame box.
    pub frame: Vector3<f32>,
    /// Centre of the canvas quad.
    pub painting: Vector3<f32>,
    pub rotation: Quaternion<f32>,
}

pub fn place_on_wall(position: Vector3<f32>, config: &GalleryConfig) -> WallPlacement {
    let wall = WallSide::classify(position);
    let normal = wall.normal();
    WallPlacement {
        wall,
        frame: position + normal * (config.frame_depth / 2.0),
        painting: position + normal * (config.frame_depth + config.painting_offset),
        rotation: wall.rotation(),
    }
}

/// Frame box around a canvas of `size`, as an instance of a unit cube.
pub fn frame_instance(placement: &WallPlacement, size: [f32; 2], config: &GalleryConfig) -> Instance {
    Instance {
        position: placement.frame,
        rotation: placement.rotation,
        scale: Vector3::new(
            size[0] + 2.0 * config.frame_border,
            size[1] + 2.0 * config.frame_border,
            config.frame_depth,
        ),
    }
}

/// Uniform scale that fits `bounds` into the configured sculpture size.
pub fn sculpture_scale(bounds: &Aabb, config: &GalleryConfig, double_size: bool) -> f32 {
    let extent = bounds.max_extent();
    if extent <= f32::EPSILON || !extent.is_finite() {
        return 1.0;
    }
    let scale = config.sculpture_size / extent;
    if double_size { scale * 2.0 } else { scale }
}

/// Instance of a pedestal standing on the floor at `position`.
pub fn pedestal_instance(position: [f32; 3], config: &GalleryConfig) -> Instance {
    let [w, h, d] = config.pedestal_size;
    Instance {
        position: Vector3::new(position[0], h / 2.0, position[2]),
        scale: Vector3::new(w, h, d),
        ..Default::default()
    }
}

/// Scales a model with `bounds` and sets it centred on top of the pedestal at `position`.
pub fn sculpture_instance(
    bounds: &Aabb,
    position: [f32; 3],
    config: &GalleryConfig,
    double_size: bool,
) -> Instance {
    let scale = sculpture_scale(bounds, config, double_size);
    let center = bounds.center();
    let pedestal_top = config.pedestal_size[1];
    Instance {
        position: Vector3::new(
            position[0] - center.x * scale,
            pedestal_top - bounds.min.y * scale,
            position[2] - center.z * scale,
        ),
        ..Default::default()
    }
    .with_scale(scale)
}
