//! Camera navigation: damped orbit, keyboard walking and preset viewpoints.
//!
//! The three input schemes share one camera. [`Navigator`] arbitrates them
//! with an explicit [`NavigationMode`]:
//!
//! - a preset request always starts a jump, whatever the current mode
//! - drag or wheel input during a jump cancels it where it is and orbits
//! - a walk key during a jump cancels it and walks
//! - walking ends when the last walk key is released
//!
//! Orbit input composes with walking: walking translates camera and pivot
//! together, so the orbit keeps revolving around the same relative point.

use std::f32::consts::{PI, TAU};

use cgmath::{InnerSpace, Point3, Vector3};
use instant::Duration;
use winit::keyboard::KeyCode;

use crate::{camera::Camera, config::GalleryConfig};

/// Below this a damped delta counts as settled.
const SETTLED: f32 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkKey {
    Forward,
    Backward,
    Left,
    Right,
}

impl WalkKey {
    pub fn from_key_code(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::KeyW | KeyCode::ArrowUp => Some(Self::Forward),
            KeyCode::KeyS | KeyCode::ArrowDown => Some(Self::Backward),
            KeyCode::KeyA | KeyCode::ArrowLeft => Some(Self::Left),
            KeyCode::KeyD | KeyCode::ArrowRight => Some(Self::Right),
            _ => None,
        }
    }
}

/// Currently held walk keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MovementState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl MovementState {
    pub fn set(&mut self, key: WalkKey, pressed: bool) {
        match key {
            WalkKey::Forward => self.forward = pressed,
            WalkKey::Backward => self.backward = pressed,
            WalkKey::Left => self.left = pressed,
            WalkKey::Right => self.right = pressed,
        }
    }

    pub fn is_set(&self, key: WalkKey) -> bool {
        match key {
            WalkKey::Forward => self.forward,
            WalkKey::Backward => self.backward,
            WalkKey::Left => self.left,
            WalkKey::Right => self.right,
        }
    }

    pub fn any(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }

    /// World space step for one frame. Ignores where the camera faces.
    pub fn offset(&self, speed: f32) -> Vector3<f32> {
        let mut offset = Vector3::new(0.0, 0.0, 0.0);
        if self.forward {
            offset.z -= speed;
        }
        if self.backward {
            offset.z += speed;
        }
        if self.left {
            offset.x -= speed;
        }
        if self.right {
            offset.x += speed;
        }
        offset
    }
}

/// The four preset viewpoints, one per wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Compass {
    Back,
    Front,
    Left,
    Right,
}

impl Compass {
    pub const ALL: [Compass; 4] = [Compass::Back, Compass::Front, Compass::Left, Compass::Right];

    pub fn name(self) -> &'static str {
        match self {
            Compass::Back => "Back",
            Compass::Front => "Front",
            Compass::Left => "Left",
            Compass::Right => "Right",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|compass| compass.name().eq_ignore_ascii_case(name))
    }

    pub fn from_key_code(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Digit1 => Some(Compass::Back),
            KeyCode::Digit2 => Some(Compass::Front),
            KeyCode::Digit3 => Some(Compass::Left),
            KeyCode::Digit4 => Some(Compass::Right),
            _ => None,
        }
    }

    pub fn viewpoint(self) -> ViewpointTarget {
        let (position, look_at) = match self {
            Compass::Back => ([0.0, 4.0, -7.0], [0.0, 4.0, -15.0]),
            Compass::Front => ([0.0, 4.0, 7.0], [0.0, 4.0, 15.0]),
            Compass::Left => ([-12.0, 4.0, 0.0], [-20.0, 4.0, 0.0]),
            Compass::Right => ([12.0, 4.0, 0.0], [20.0, 4.0, 0.0]),
        };
        ViewpointTarget {
            name: self.name(),
            position: position.into(),
            look_at: look_at.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewpointTarget {
    pub name: &'static str,
    pub position: Point3<f32>,
    pub look_at: Point3<f32>,
}

/// Damped orbit around a pivot, in the spirit of the usual web orbit controls.
#[derive(Clone, Debug)]
pub struct OrbitController {
    pub target: Point3<f32>,
    theta_delta: f32,
    phi_delta: f32,
    scale: f32,
    damping_factor: f32,
    rotate_speed: f32,
    zoom_speed: f32,
    min_distance: f32,
    max_distance: f32,
    min_polar_angle: f32,
    max_polar_angle: f32,
}

impl OrbitController {
    pub fn new(config: &GalleryConfig, target: Point3<f32>) -> Self {
        Self {
            target,
            theta_delta: 0.0,
            phi_delta: 0.0,
            scale: 1.0,
            damping_factor: config.damping_factor,
            rotate_speed: config.rotate_speed,
            zoom_speed: config.zoom_speed,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            min_polar_angle: config.min_polar_angle,
            max_polar_angle: config.max_polar_angle,
        }
    }

    /// Pointer drag in pixels.
    pub fn handle_drag(&mut self, dx: f64, dy: f64) {
        self.theta_delta -= dx as f32 * self.rotate_speed;
        self.phi_delta -= dy as f32 * self.rotate_speed;
    }

    /// Wheel input in lines. Positive values zoom in.
    pub fn handle_zoom(&mut self, lines: f32) {
        self.scale *= 0.95f32.powf(self.zoom_speed * lines);
    }

    pub fn is_idle(&self) -> bool {
        self.theta_delta.abs() < SETTLED && self.phi_delta.abs() < SETTLED && self.scale == 1.0
    }

    /// Drops pending motion and pivots around the camera's look-at point.
    pub fn sync(&mut self, camera: &Camera) {
        self.target = camera.target;
        self.stop();
    }

    pub fn stop(&mut self) {
        self.theta_delta = 0.0;
        self.phi_delta = 0.0;
        self.scale = 1.0;
    }

    pub fn distance_range(&self) -> (f32, f32) {
        (self.min_distance, self.max_distance)
    }

    /// Applies one frame of pending motion. Leaves the camera alone when idle.
    pub fn update(&mut self, camera: &mut Camera) {
        if self.is_idle() {
            self.stop();
            return;
        }

        let offset = camera.position - self.target;
        let radius = offset.magnitude().max(self.min_distance);
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        theta += self.theta_delta * self.damping_factor;
        phi += self.phi_delta * self.damping_factor;
        phi = phi.clamp(self.min_polar_angle, self.max_polar_angle.min(PI - SETTLED));

        let mut radius = radius * self.scale;
        if !radius.is_finite() {
            radius = self.max_distance;
        }
        let radius = radius.clamp(self.min_distance, self.max_distance);

        let (sin_phi, cos_phi) = phi.sin_cos();
        let (sin_theta, cos_theta) = theta.sin_cos();
        let offset = Vector3::new(
            radius * sin_phi * sin_theta,
            radius * cos_phi,
            radius * sin_phi * cos_theta,
        );
        camera.position = self.target + offset;
        camera.target = self.target;

        self.theta_delta *= 1.0 - self.damping_factor;
        self.phi_delta *= 1.0 - self.damping_factor;
        if self.theta_delta.abs() < SETTLED {
            self.theta_delta = 0.0;
        }
        if self.phi_delta.abs() < SETTLED {
            self.phi_delta = 0.0;
        }
        self.scale = 1.0;
    }
}

/// Where a camera looks: yaw around +y (0 faces +z), pitch, and how far away
/// the look-at point is.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Heading {
    yaw: f32,
    pitch: f32,
    distance: f32,
}

impl Heading {
    fn between(position: Point3<f32>, target: Point3<f32>) -> Option<Self> {
        let offset = target - position;
        let distance = offset.magnitude();
        if distance.is_nan() || distance <= SETTLED {
            return None;
        }
        let direction = offset / distance;
        Some(Self {
            yaw: direction.x.atan2(direction.z),
            pitch: direction.y.clamp(-1.0, 1.0).asin(),
            distance,
        })
    }

    fn direction(&self) -> Vector3<f32> {
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        Vector3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw)
    }

    /// Turns the short way round; half a turn goes counter-clockwise.
    fn lerp(&self, to: &Heading, t: f32) -> Heading {
        let mut yaw_delta = (to.yaw - self.yaw) % TAU;
        if yaw_delta > PI {
            yaw_delta -= TAU;
        } else if yaw_delta <= -PI {
            yaw_delta += TAU;
        }
        Heading {
            yaw: self.yaw + yaw_delta * t,
            pitch: self.pitch + (to.pitch - self.pitch) * t,
            distance: self.distance + (to.distance - self.distance) * t,
        }
    }
}

/// An in-flight move to a preset viewpoint.
///
/// Position moves on a straight line while the viewing direction turns, so
/// the look-at point stays in front of the camera for the whole jump.
#[derive(Clone, Debug, PartialEq)]
pub struct Jump {
    from_position: Point3<f32>,
    from_heading: Heading,
    to_heading: Heading,
    to: ViewpointTarget,
    min_distance: f32,
    elapsed: f32,
    duration: f32,
}

impl Jump {
    fn new(camera: &Camera, to: ViewpointTarget, duration: f32, min_distance: f32) -> Self {
        let to_heading = Heading::between(to.position, to.look_at).unwrap_or(Heading {
            yaw: 0.0,
            pitch: 0.0,
            distance: min_distance,
        });
        let from_heading = Heading::between(camera.position, camera.target).unwrap_or(to_heading);
        Self {
            from_position: camera.position,
            from_heading,
            to_heading,
            to,
            min_distance,
            elapsed: 0.0,
            duration,
        }
    }

    pub fn destination(&self) -> &ViewpointTarget {
        &self.to
    }

    /// Moves the camera along the jump. Returns `true` once it arrived.
    fn advance(&mut self, camera: &mut Camera, dt: f32) -> bool {
        self.elapsed += dt;
        let t = if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        };
        if t >= 1.0 {
            camera.position = self.to.position;
            camera.target = self.to.look_at;
            return true;
        }
        let eased = t * t * (3.0 - 2.0 * t);
        let heading = self.from_heading.lerp(&self.to_heading, eased);
        camera.position = self.from_position + (self.to.position - self.from_position) * eased;
        camera.target = camera.position + heading.direction() * heading.distance.max(self.min_distance);
        false
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum NavigationMode {
    Orbiting,
    JumpingToPreset(Jump),
    Walking,
}

/// Owns every piece of navigation input state and applies it once per frame.
#[derive(Clone, Debug)]
pub struct Navigator {
    mode: NavigationMode,
    movement: MovementState,
    orbit: OrbitController,
    move_speed: f32,
    jump_duration: f32,
}

impl Navigator {
    pub fn new(config: &GalleryConfig, camera: &Camera) -> Self {
        Self {
            mode: NavigationMode::Orbiting,
            movement: MovementState::default(),
            orbit: OrbitController::new(config, camera.target),
            move_speed: config.move_speed,
            jump_duration: config.jump_duration,
        }
    }

    pub fn mode(&self) -> &NavigationMode {
        &self.mode
    }

    pub fn movement(&self) -> &MovementState {
        &self.movement
    }

    pub fn orbit(&self) -> &OrbitController {
        &self.orbit
    }

    pub fn request_viewpoint(&mut self, compass: Compass, camera: &Camera) {
        log::debug!("jumping to the {} viewpoint", compass.name());
        self.orbit.stop();
        self.mode = NavigationMode::JumpingToPreset(Jump::new(
            camera,
            compass.viewpoint(),
            self.jump_duration,
            self.orbit.min_distance,
        ));
    }

    /// Repeated presses of a key that is already held change nothing.
    pub fn handle_walk_key(&mut self, key: WalkKey, pressed: bool, camera: &Camera) {
        if self.movement.is_set(key) == pressed {
            return;
        }
        self.movement.set(key, pressed);
        match (&self.mode, pressed) {
            (NavigationMode::JumpingToPreset(_), true) => {
                self.orbit.sync(camera);
                self.mode = NavigationMode::Walking;
            }
            (NavigationMode::Orbiting, true) => self.mode = NavigationMode::Walking,
            (NavigationMode::Walking, false) if !self.movement.any() => {
                self.mode = NavigationMode::Orbiting
            }
            _ => (),
        }
    }

    pub fn handle_drag(&mut self, dx: f64, dy: f64, camera: &Camera) {
        self.cancel_jump(camera);
        self.orbit.handle_drag(dx, dy);
    }

    pub fn handle_zoom(&mut self, lines: f32, camera: &Camera) {
        self.cancel_jump(camera);
        self.orbit.handle_zoom(lines);
    }

    fn cancel_jump(&mut self, camera: &Camera) {
        if let NavigationMode::JumpingToPreset(_) = self.mode {
            self.orbit.sync(camera);
            self.mode = NavigationMode::Orbiting;
        }
    }

    /// Runs one frame of navigation.
    pub fn update(&mut self, camera: &mut Camera, dt: Duration) {
        if let NavigationMode::JumpingToPreset(jump) = &mut self.mode {
            if jump.advance(camera, dt.as_secs_f32()) {
                self.orbit.sync(camera);
                self.mode = NavigationMode::Orbiting;
            }
            return;
        }

        if self.movement.any() {
            self.mode = NavigationMode::Walking;
        } else if self.mode == NavigationMode::Walking {
            self.mode = NavigationMode::Orbiting;
        }

        if self.mode == NavigationMode::Walking {
            camera.translate(self.movement.offset(self.move_speed));
            self.orbit.target = camera.target;
        }
        self.orbit.update(camera);
    }
}
