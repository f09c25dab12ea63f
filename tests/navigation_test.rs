use art_gallery::{
    camera::Camera,
    config::GalleryConfig,
    navigation::{Compass, NavigationMode, Navigator, WalkKey},
};
use cgmath::MetricSpace;
use instant::Duration;
use winit::keyboard::KeyCode;

use crate::common::test_utils::{assert_close, assert_point_close};

mod common;

const FRAME: Duration = Duration::from_millis(16);

fn start() -> (GalleryConfig, Camera, Navigator) {
    let config = GalleryConfig::default();
    let camera = Camera::new(config.camera_start, config.camera_start_target);
    let navigator = Navigator::new(&config, &camera);
    (config, camera, navigator)
}

#[test]
fn should_start_orbiting_without_moving() {
    let (_, mut camera, mut navigator) = start();
    let before = camera.clone();
    navigator.update(&mut camera, FRAME);
    assert_eq!(navigator.mode(), &NavigationMode::Orbiting);
    assert_eq!(camera, before);
}

#[test]
fn should_land_exactly_on_the_left_viewpoint() {
    let (_, mut camera, mut navigator) = start();
    navigator.request_viewpoint(Compass::Left, &camera);
    assert!(matches!(navigator.mode(), NavigationMode::JumpingToPreset(_)));

    navigator.update(&mut camera, Duration::from_secs(2));

    assert_point_close(camera.position, [-12.0, 4.0, 0.0]);
    assert_point_close(camera.target, [-20.0, 4.0, 0.0]);
    assert_eq!(navigator.mode(), &NavigationMode::Orbiting);
    assert_point_close(navigator.orbit().target, [-20.0, 4.0, 0.0]);

    // settled orbit leaves the camera where the jump put it
    navigator.update(&mut camera, FRAME);
    assert_point_close(camera.position, [-12.0, 4.0, 0.0]);
}

#[test]
fn should_ease_between_start_and_viewpoint() {
    let (_, mut camera, mut navigator) = start();
    let from = camera.position;
    navigator.request_viewpoint(Compass::Back, &camera);
    navigator.update(&mut camera, Duration::from_millis(400));

    let to = Compass::Back.viewpoint().position;
    let travelled = from.distance(camera.position);
    let total = from.distance(to);
    assert!(travelled > 0.0 && travelled < total);
    assert!(matches!(navigator.mode(), NavigationMode::JumpingToPreset(_)));
}

#[test]
fn should_jump_instantly_with_zero_duration() {
    let config = GalleryConfig {
        jump_duration: 0.0,
        ..Default::default()
    };
    let mut camera = Camera::new(config.camera_start, config.camera_start_target);
    let mut navigator = Navigator::new(&config, &camera);
    navigator.request_viewpoint(Compass::Right, &camera);
    navigator.update(&mut camera, Duration::from_millis(0));
    assert_point_close(camera.position, [12.0, 4.0, 0.0]);
    assert_point_close(camera.target, [20.0, 4.0, 0.0]);
}

#[test]
fn should_walk_by_exact_steps() {
    let (config, mut camera, mut navigator) = start();
    navigator.handle_walk_key(WalkKey::Forward, true, &camera);
    assert_eq!(navigator.mode(), &NavigationMode::Walking);

    navigator.update(&mut camera, FRAME);
    navigator.update(&mut camera, FRAME);

    assert_point_close(camera.position, [0.0, 5.0, 10.0 - 2.0 * config.move_speed]);
    assert_point_close(camera.target, [0.0, 4.0, -2.0 * config.move_speed]);
}

#[test]
fn should_walk_diagonally_when_two_keys_are_held() {
    let (config, mut camera, mut navigator) = start();
    navigator.handle_walk_key(WalkKey::Backward, true, &camera);
    navigator.handle_walk_key(WalkKey::Right, true, &camera);
    navigator.update(&mut camera, FRAME);
    assert_point_close(camera.position, [config.move_speed, 5.0, 10.0 + config.move_speed]);
}

#[test]
fn should_return_to_orbiting_when_walk_keys_are_released() {
    let (_, mut camera, mut navigator) = start();
    navigator.handle_walk_key(WalkKey::Left, true, &camera);
    navigator.update(&mut camera, FRAME);
    navigator.handle_walk_key(WalkKey::Left, false, &camera);
    assert_eq!(navigator.mode(), &NavigationMode::Orbiting);

    let after_walk = camera.clone();
    navigator.update(&mut camera, FRAME);
    assert_eq!(camera, after_walk);
}

#[test]
fn should_cancel_jump_in_place_on_drag() {
    let (_, mut camera, mut navigator) = start();
    navigator.request_viewpoint(Compass::Front, &camera);
    navigator.update(&mut camera, Duration::from_millis(300));
    let midway = camera.clone();

    navigator.handle_drag(0.0, 0.0, &camera);

    assert_eq!(navigator.mode(), &NavigationMode::Orbiting);
    assert_eq!(navigator.orbit().target, midway.target);
    navigator.update(&mut camera, FRAME);
    assert_eq!(camera, midway);
}

#[test]
fn should_cancel_jump_when_walking() {
    let (_, mut camera, mut navigator) = start();
    navigator.request_viewpoint(Compass::Front, &camera);
    navigator.update(&mut camera, Duration::from_millis(300));
    navigator.handle_walk_key(WalkKey::Forward, true, &camera);
    assert_eq!(navigator.mode(), &NavigationMode::Walking);
}

#[test]
fn should_prefer_a_new_preset_over_walking() {
    let (_, mut camera, mut navigator) = start();
    navigator.handle_walk_key(WalkKey::Forward, true, &camera);
    navigator.update(&mut camera, FRAME);
    navigator.request_viewpoint(Compass::Back, &camera);
    assert!(matches!(
        navigator.mode(),
        NavigationMode::JumpingToPreset(jump) if jump.destination().name == "Back"
    ));
}

#[test]
fn should_clamp_zoom_to_distance_range() {
    let config = GalleryConfig::default();
    let mut camera = Camera::new([0.0, 4.0, 10.0], [0.0, 4.0, 0.0]);
    let mut navigator = Navigator::new(&config, &camera);

    navigator.handle_zoom(-1000.0, &camera);
    navigator.update(&mut camera, FRAME);
    assert_close(camera.position.distance(camera.target), config.max_distance);

    navigator.handle_zoom(1000.0, &camera);
    navigator.update(&mut camera, FRAME);
    assert_close(camera.position.distance(camera.target), config.min_distance);
}

#[test]
fn should_keep_orbit_above_the_floor() {
    let config = GalleryConfig::default();
    let mut camera = Camera::new([0.0, 4.0, 10.0], [0.0, 4.0, 0.0]);
    let mut navigator = Navigator::new(&config, &camera);
    // dragging up pushes the polar angle past the horizon
    for _ in 0..50 {
        navigator.handle_drag(0.0, -500.0, &camera);
        navigator.update(&mut camera, FRAME);
    }
    assert!(camera.position.y >= camera.target.y - 1e-3);
}

#[test]
fn should_damp_orbit_after_a_single_drag() {
    let config = GalleryConfig::default();
    let mut camera = Camera::new([0.0, 4.0, 10.0], [0.0, 4.0, 0.0]);
    let mut navigator = Navigator::new(&config, &camera);
    navigator.handle_drag(100.0, 0.0, &camera);

    navigator.update(&mut camera, FRAME);
    let first = camera.position;
    navigator.update(&mut camera, FRAME);
    let second = camera.position;
    navigator.update(&mut camera, FRAME);
    let third = camera.position;

    let step_one = first.distance(second);
    let step_two = second.distance(third);
    assert!(step_one > 0.0);
    assert!(step_two < step_one);
    assert_close(camera.position.distance(camera.target), 10.0);
}

#[test]
fn should_map_keys_and_names_to_compass() {
    assert_eq!(Compass::from_key_code(KeyCode::Digit1), Some(Compass::Back));
    assert_eq!(Compass::from_key_code(KeyCode::Digit4), Some(Compass::Right));
    assert_eq!(Compass::from_key_code(KeyCode::Digit5), None);
    assert_eq!(Compass::from_name("left"), Some(Compass::Left));
    assert_eq!(Compass::from_name("up"), None);
    assert_eq!(WalkKey::from_key_code(KeyCode::ArrowUp), Some(WalkKey::Forward));
    assert_eq!(WalkKey::from_key_code(KeyCode::KeyD), Some(WalkKey::Right));
}

#[test]
fn should_face_each_wall_from_its_viewpoint() {
    for compass in Compass::ALL {
        let viewpoint = compass.viewpoint();
        assert_close(viewpoint.position.y, 4.0);
        assert_close(viewpoint.look_at.y, 4.0);
        assert_close(viewpoint.position.distance(viewpoint.look_at), 8.0);
    }
}

#[test]
fn should_resume_walking_after_jump_when_keys_are_still_held() {
    let (config, mut camera, mut navigator) = start();
    navigator.handle_walk_key(WalkKey::Forward, true, &camera);
    navigator.request_viewpoint(Compass::Right, &camera);
    navigator.update(&mut camera, Duration::from_secs(2));
    assert_eq!(navigator.mode(), &NavigationMode::Orbiting);

    navigator.update(&mut camera, FRAME);
    assert_eq!(navigator.mode(), &NavigationMode::Walking);
    assert_point_close(camera.position, [12.0, 4.0, -config.move_speed]);
}

#[test]
fn should_keep_jump_going_when_a_held_key_is_pressed_again() {
    let (_, mut camera, mut navigator) = start();
    navigator.handle_walk_key(WalkKey::Forward, true, &camera);
    navigator.request_viewpoint(Compass::Left, &camera);
    navigator.update(&mut camera, FRAME);

    navigator.handle_walk_key(WalkKey::Forward, true, &camera);

    assert!(matches!(navigator.mode(), NavigationMode::JumpingToPreset(_)));
    assert!(navigator.movement().forward);
}

fn assert_jump_keeps_looking_ahead(from: Compass, to: Compass) {
    let config = GalleryConfig::default();
    let start = from.viewpoint();
    let mut camera = Camera::new(start.position, start.look_at);
    let mut navigator = Navigator::new(&config, &camera);
    navigator.request_viewpoint(to, &camera);

    for _ in 0..20 {
        navigator.update(&mut camera, Duration::from_millis(50));
        let distance = camera.position.distance(camera.target);
        assert!(
            distance >= config.min_distance - 1e-3,
            "{from:?} -> {to:?}: camera {:?} too close to target {:?}",
            camera.position,
            camera.target
        );
        let view: [[f32; 4]; 4] = camera.calc_matrix().into();
        assert!(view.iter().flatten().all(|v| v.is_finite()), "{view:?}");
    }
    assert_eq!(navigator.mode(), &NavigationMode::Orbiting);
    assert_point_close(camera.position, [
        to.viewpoint().position.x,
        to.viewpoint().position.y,
        to.viewpoint().position.z,
    ]);
}

#[test]
fn should_keep_a_valid_view_between_opposite_viewpoints() {
    assert_jump_keeps_looking_ahead(Compass::Left, Compass::Right);
    assert_jump_keeps_looking_ahead(Compass::Right, Compass::Left);
    assert_jump_keeps_looking_ahead(Compass::Back, Compass::Front);
    assert_jump_keeps_looking_ahead(Compass::Front, Compass::Back);
}

#[test]
fn should_look_sideways_halfway_from_left_to_right() {
    let config = GalleryConfig::default();
    let start = Compass::Left.viewpoint();
    let mut camera = Camera::new(start.position, start.look_at);
    let mut navigator = Navigator::new(&config, &camera);
    navigator.request_viewpoint(Compass::Right, &camera);

    navigator.update(&mut camera, Duration::from_millis(400));

    assert_point_close(camera.position, [0.0, 4.0, 0.0]);
    assert_close(camera.position.distance(camera.target), 8.0);
    assert_close(camera.target.y, 4.0);
}
