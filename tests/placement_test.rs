use art_gallery::{
    config::GalleryConfig,
    data_structures::geometry::Aabb,
    gallery::placement::{
        WallSide, frame_instance, pedestal_instance, place_on_wall, sculpture_instance,
        sculpture_scale,
    },
};
use cgmath::{Point3, Rotation, Vector3};

use crate::common::test_utils::{assert_close, assert_vec_close};

mod common;

#[test]
fn should_classify_walls_by_dominant_axis() {
    assert_eq!(WallSide::classify(Vector3::new(-10.0, 4.0, -15.0)), WallSide::Back);
    assert_eq!(WallSide::classify(Vector3::new(8.0, 4.0, 15.0)), WallSide::Front);
    assert_eq!(WallSide::classify(Vector3::new(-20.0, 4.0, 6.0)), WallSide::Left);
    assert_eq!(WallSide::classify(Vector3::new(20.0, 4.0, -6.0)), WallSide::Right);
}

#[test]
fn should_send_ties_to_the_depth_walls() {
    assert_eq!(WallSide::classify(Vector3::new(5.0, 0.0, 5.0)), WallSide::Front);
    assert_eq!(WallSide::classify(Vector3::new(-5.0, 0.0, -5.0)), WallSide::Back);
    assert_eq!(WallSide::classify(Vector3::new(0.0, 3.0, 0.0)), WallSide::Front);
}

#[test]
fn should_turn_canvas_towards_the_room() {
    for wall in [WallSide::Back, WallSide::Front, WallSide::Left, WallSide::Right] {
        let facing = wall.rotation().rotate_vector(Vector3::unit_z());
        let normal = wall.normal();
        assert_vec_close(facing, [normal.x, normal.y, normal.z]);
    }
}

#[test]
fn should_place_frame_flush_and_canvas_in_front() {
    let config = GalleryConfig::default();
    let placement = place_on_wall(Vector3::new(0.0, 4.0, -15.0), &config);

    assert_eq!(placement.wall, WallSide::Back);
    assert_vec_close(placement.frame, [0.0, 4.0, -15.0 + config.frame_depth / 2.0]);
    assert_vec_close(
        placement.painting,
        [0.0, 4.0, -15.0 + config.frame_depth + config.painting_offset],
    );
}

#[test]
fn should_offset_side_wall_paintings_along_x() {
    let config = GalleryConfig::default();
    let placement = place_on_wall(Vector3::new(20.0, 4.0, 6.0), &config);

    assert_eq!(placement.wall, WallSide::Right);
    assert_vec_close(placement.frame, [20.0 - config.frame_depth / 2.0, 4.0, 6.0]);
    assert!(placement.painting.x < placement.frame.x);
    assert_close(placement.painting.z, 6.0);
}

#[test]
fn should_size_frame_around_canvas() {
    let config = GalleryConfig::default();
    let placement = place_on_wall(Vector3::new(-20.0, 4.0, 0.0), &config);
    let frame = frame_instance(&placement, [3.0, 4.0], &config);

    assert_vec_close(
        frame.scale,
        [
            3.0 + 2.0 * config.frame_border,
            4.0 + 2.0 * config.frame_border,
            config.frame_depth,
        ],
    );
    assert_eq!(frame.rotation, placement.rotation);
    assert_eq!(frame.position, placement.frame);
}

#[test]
fn should_fit_sculptures_into_the_configured_size() {
    let config = GalleryConfig::default();
    let bounds = Aabb {
        min: Point3::new(-1.0, 0.0, -1.0),
        max: Point3::new(1.0, 4.0, 1.0),
    };
    assert_close(sculpture_scale(&bounds, &config, false), config.sculpture_size / 4.0);
    assert_close(sculpture_scale(&bounds, &config, true), config.sculpture_size / 2.0);
}

#[test]
fn should_leave_degenerate_models_unscaled() {
    let config = GalleryConfig::default();
    let point = Aabb {
        min: Point3::new(1.0, 1.0, 1.0),
        max: Point3::new(1.0, 1.0, 1.0),
    };
    assert_close(sculpture_scale(&point, &config, false), 1.0);
}

#[test]
fn should_stand_sculpture_on_top_of_its_pedestal() {
    let config = GalleryConfig::default();
    let bounds = Aabb {
        min: Point3::new(2.0, -3.0, 5.0),
        max: Point3::new(4.0, 1.0, 7.0),
    };
    let instance = sculpture_instance(&bounds, [-12.0, 0.0, 8.0], &config, false);
    let placed = bounds.transformed(&instance.to_matrix());

    assert_close(placed.min.y, config.pedestal_size[1]);
    assert_close(placed.center().x, -12.0);
    assert_close(placed.center().z, 8.0);
    assert_close(placed.max_extent(), config.sculpture_size);
}

#[test]
fn should_put_pedestal_on_the_floor() {
    let config = GalleryConfig::default();
    let pedestal = pedestal_instance([6.0, 0.0, 0.0], &config);
    let unit = Aabb {
        min: Point3::new(-0.5, -0.5, -0.5),
        max: Point3::new(0.5, 0.5, 0.5),
    };
    let placed = unit.transformed(&pedestal.to_matrix());

    assert_close(placed.min.y, 0.0);
    assert_close(placed.max.y, config.pedestal_size[1]);
    assert_close(placed.center().x, 6.0);
}
