use art_gallery::data_structures::{
    geometry::{Aabb, MeshData, Shape},
    texture::checkerboard,
};
use cgmath::{InnerSpace, Matrix4, Point3, Vector3};

use crate::common::test_utils::{assert_close, assert_point_close};

mod common;

const SHAPES: [Shape; 7] = [
    Shape::Cube,
    Shape::Sphere,
    Shape::Cone,
    Shape::Cylinder,
    Shape::Torus,
    Shape::TorusKnot,
    Shape::Octahedron,
];

fn assert_front_faces_follow_normals(mesh: &MeshData) {
    for tri in mesh.indices.chunks(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| mesh.vertices[i as usize]);
        let p0 = Vector3::from(a.position);
        let face = (Vector3::from(b.position) - p0).cross(Vector3::from(c.position) - p0);
        assert!(face.dot(Vector3::from(a.normal)) > 0.0, "clockwise triangle {tri:?}");
    }
}

#[test]
fn should_build_valid_meshes_for_every_shape() {
    for shape in SHAPES {
        let mesh = shape.mesh();
        assert!(!mesh.vertices.is_empty(), "{shape:?} is empty");
        assert_eq!(mesh.indices.len() % 3, 0);
        assert!(
            mesh.indices
                .iter()
                .all(|i| (*i as usize) < mesh.vertices.len())
        );
        for v in &mesh.vertices {
            assert_close(Vector3::from(v.normal).magnitude(), 1.0);
        }
    }
}

#[test]
fn should_give_every_shape_solid_bounds() {
    for shape in SHAPES {
        let bounds = shape.mesh().bounds().expect("mesh has vertices");
        let size = bounds.size();
        assert!(size.x > 0.0 && size.y > 0.0 && size.z > 0.0, "{shape:?} is flat");
    }
}

#[test]
fn should_wind_flat_meshes_counter_clockwise() {
    assert_front_faces_follow_normals(&MeshData::cuboid(2.0, 1.0, 3.0));
    assert_front_faces_follow_normals(&MeshData::plane(2.0, 1.0));
    assert_front_faces_follow_normals(&MeshData::floor(40.0, 30.0, 4.0));
    assert_front_faces_follow_normals(&MeshData::octahedron(1.0));
}

#[test]
fn should_tile_floor_texture() {
    let floor = MeshData::floor(40.0, 30.0, 4.0);
    let max_u = floor
        .vertices
        .iter()
        .map(|v| v.tex_coords[0])
        .fold(f32::MIN, f32::max);
    assert_close(max_u, 4.0);
    let bounds = floor.bounds().expect("floor has vertices");
    assert_point_close(bounds.min, [-20.0, 0.0, -15.0]);
    assert_point_close(bounds.max, [20.0, 0.0, 15.0]);
}

#[test]
fn should_give_tangents_to_textured_quads() {
    let plane = MeshData::plane(1.0, 1.0);
    for v in &plane.vertices {
        let tangent = Vector3::from(v.tangent);
        assert!(tangent.magnitude() > 0.0);
        assert_close(tangent.dot(Vector3::from(v.normal)), 0.0);
    }
}

#[test]
fn should_grow_bounds_with_union_and_transform() {
    let a = Aabb::from_points([Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 2.0, 3.0)])
        .expect("two points");
    let b = Aabb::from_points([Point3::new(-1.0, 1.0, 1.0)]).expect("one point");
    let union = a.union(&b);
    assert_point_close(union.min, [-1.0, 0.0, 0.0]);
    assert_point_close(union.max, [1.0, 2.0, 3.0]);

    let moved = a.transformed(&Matrix4::from_translation(Vector3::new(10.0, 0.0, 0.0)));
    assert_point_close(moved.min, [10.0, 0.0, 0.0]);
    assert_point_close(moved.center(), [10.5, 1.0, 1.5]);
    assert_eq!(Aabb::from_points(Vec::<Point3<f32>>::new()), None);
}

#[test]
fn should_alternate_checkerboard_tiles() {
    let light = [230, 230, 230, 255];
    let dark = [40, 40, 40, 255];
    let image = checkerboard(8, 64, light, dark);

    assert_eq!(image.dimensions(), (512, 512));
    assert_eq!(image.get_pixel(0, 0).0, light);
    assert_eq!(image.get_pixel(63, 63).0, light);
    assert_eq!(image.get_pixel(64, 0).0, dark);
    assert_eq!(image.get_pixel(0, 64).0, dark);
    assert_eq!(image.get_pixel(64, 64).0, light);
}
