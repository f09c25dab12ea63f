use art_gallery::{
    camera::{Camera, Projection},
    config::GalleryConfig,
    data_structures::geometry::{Aabb, MeshData},
    gallery::{catalog::ExhibitRef, placement::pedestal_instance},
    pick::{MouseButtonState, MouseState, nearest_hit},
};
use cgmath::{Deg, Point3};
use winit::{dpi::PhysicalPosition, event::MouseButton};

use crate::common::test_utils::assert_close;

mod common;

fn cube(center: [f32; 3], half: f32) -> Aabb {
    Aabb {
        min: Point3::new(center[0] - half, center[1] - half, center[2] - half),
        max: Point3::new(center[0] + half, center[1] + half, center[2] + half),
    }
}

fn centre_ray() -> art_gallery::camera::Ray {
    let camera = Camera::new([0.0, 0.0, 5.0], [0.0, 0.0, 0.0]);
    let projection = Projection::new(800, 600, Deg(45.0), 0.1, 100.0);
    camera.cast_ray_from_mouse((400.0, 300.0), 800.0, 600.0, &projection)
}

#[test]
fn should_follow_surface_aspect() {
    let mut projection = Projection::new(800, 600, Deg(45.0), 0.1, 100.0);
    assert_close(projection.aspect(), 800.0 / 600.0);
    projection.resize(1920, 1080);
    assert_close(projection.aspect(), 1920.0 / 1080.0);
}

#[test]
fn should_cast_centre_ray_towards_target() {
    let ray = centre_ray();
    assert_close(ray.direction.x, 0.0);
    assert_close(ray.direction.y, 0.0);
    assert_close(ray.direction.z, -1.0);
}

#[test]
fn should_hit_box_in_front_of_camera() {
    let ray = centre_ray();
    let distance = ray.intersect_aabb(&cube([0.0, 0.0, 0.0], 1.0));
    assert!(matches!(distance, Some(t) if t > 3.5 && t < 4.0), "{distance:?}");
}

#[test]
fn should_miss_box_behind_camera() {
    let ray = centre_ray();
    assert_eq!(ray.intersect_aabb(&cube([0.0, 0.0, 10.0], 1.0)), None);
    assert_eq!(ray.intersect_aabb(&cube([5.0, 0.0, 0.0], 1.0)), None);
}

#[test]
fn should_pick_nearest_exhibit() {
    let ray = centre_ray();
    let bounds = vec![
        (7, cube([0.0, 0.0, -5.0], 1.0)),
        (3, cube([0.0, 0.0, 0.0], 1.0)),
        (9, cube([4.0, 0.0, 0.0], 1.0)),
    ];
    assert_eq!(nearest_hit(&ray, &bounds), Some(3));
    assert_eq!(nearest_hit(&ray, &bounds[2..]), None);
}

#[test]
fn should_let_pedestal_hide_sculpture_behind_it() {
    let config = GalleryConfig::default();
    let pedestal = pedestal_instance([0.0, 0.0, 0.0], &config);
    let pedestal_bounds = MeshData::cuboid(1.0, 1.0, 1.0)
        .bounds()
        .map(|unit| unit.transformed(&pedestal.to_matrix()))
        .unwrap();
    let sculpture = ExhibitRef::Sculpture(0).pick_id();
    let bounds = vec![
        (sculpture, cube([0.0, 0.6, -3.0], 0.5)),
        (0, pedestal_bounds),
    ];

    let camera = Camera::new([0.0, 0.6, 5.0], [0.0, 0.6, 0.0]);
    let projection = Projection::new(800, 600, Deg(45.0), 0.1, 100.0);
    let ray = camera.cast_ray_from_mouse((400.0, 300.0), 800.0, 600.0, &projection);

    let hit = nearest_hit(&ray, &bounds);
    assert_eq!(hit, Some(0));
    assert_eq!(hit.and_then(ExhibitRef::from_pick_id), None);
    assert_eq!(nearest_hit(&ray, &bounds[..1]), Some(sculpture));
}

#[test]
fn should_count_short_press_as_click() {
    let mut mouse = MouseState::default();
    mouse.coords = PhysicalPosition::new(100.0, 100.0);
    mouse.press(MouseButton::Left);
    mouse.coords = PhysicalPosition::new(102.0, 101.0);
    assert!(mouse.release(MouseButton::Left));
    assert_eq!(mouse.pressed, MouseButtonState::None);
}

#[test]
fn should_not_count_drag_as_click() {
    let mut mouse = MouseState::default();
    mouse.coords = PhysicalPosition::new(100.0, 100.0);
    mouse.press(MouseButton::Left);
    mouse.coords = PhysicalPosition::new(140.0, 100.0);
    assert!(!mouse.release(MouseButton::Left));
}

#[test]
fn should_only_click_with_left_button() {
    let mut mouse = MouseState::default();
    mouse.press(MouseButton::Right);
    assert_eq!(mouse.pressed, MouseButtonState::Right);
    assert!(!mouse.release(MouseButton::Right));
}

#[test]
fn should_report_drag_delta_while_left_is_held() {
    let mut mouse = MouseState::default();
    mouse.coords = PhysicalPosition::new(10.0, 10.0);
    assert_eq!(mouse.drag_delta(PhysicalPosition::new(15.0, 7.0)), None);

    mouse.press(MouseButton::Left);
    assert_eq!(
        mouse.drag_delta(PhysicalPosition::new(15.0, 7.0)),
        Some((5.0, -3.0))
    );
}
