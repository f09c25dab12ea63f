//! Object picking and selection.
//!
//! Picking is done on the CPU: a ray is cast from the camera through the
//! cursor and tested against the world space boxes the scene graph reports
//! for pickable nodes (see [`crate::data_structures::scene_graph::SceneNode::pick_bounds`]).
//! The nearest hit wins.

use winit::{dpi::PhysicalPosition, event::MouseButton};

use crate::{camera::Ray, data_structures::geometry::Aabb};

/// A press and release further apart than this is a drag, not a click.
pub const CLICK_TOLERANCE_PX: f64 = 4.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MouseButtonState {
    Left,
    Right,
    #[default]
    None,
}

/// Cursor state tracked by the event loop.
#[derive(Clone, Debug, Default)]
pub struct MouseState {
    pub coords: PhysicalPosition<f64>,
    pub pressed: MouseButtonState,
    press_origin: Option<PhysicalPosition<f64>>,
}

impl MouseState {
    pub fn press(&mut self, button: MouseButton) {
        self.pressed = match button {
            MouseButton::Left => MouseButtonState::Left,
            MouseButton::Right => MouseButtonState::Right,
            _ => return,
        };
        self.press_origin = Some(self.coords);
    }

    /// Returns `true` when the release completes a left click.
    pub fn release(&mut self, button: MouseButton) -> bool {
        let was_left = self.pressed == MouseButtonState::Left && button == MouseButton::Left;
        self.pressed = MouseButtonState::None;
        let origin = self.press_origin.take();
        match origin {
            Some(origin) if was_left => {
                let dx = self.coords.x - origin.x;
                let dy = self.coords.y - origin.y;
                (dx * dx + dy * dy).sqrt() < CLICK_TOLERANCE_PX
            }
            _ => false,
        }
    }

    /// Pixel delta to `position` while the left button is held.
    pub fn drag_delta(&self, position: PhysicalPosition<f64>) -> Option<(f64, f64)> {
        match self.pressed {
            MouseButtonState::Left => Some((position.x - self.coords.x, position.y - self.coords.y)),
            _ => None,
        }
    }
}

/// Id of the nearest box hit by `ray`.
pub fn nearest_hit(ray: &Ray, bounds: &[(u32, Aabb)]) -> Option<u32> {
    bounds
        .iter()
        .filter_map(|(id, aabb)| ray.intersect_aabb(aabb).map(|t| (*id, t)))
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(id, _)| id)
}
