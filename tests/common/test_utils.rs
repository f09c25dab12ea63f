use cgmath::{Point3, Vector3};

pub const EPS: f32 = 1e-4;

pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < EPS,
        "expected {expected}, got {actual}"
    );
}

pub fn assert_vec_close(actual: Vector3<f32>, expected: [f32; 3]) {
    assert!(
        (actual.x - expected[0]).abs() < EPS
            && (actual.y - expected[1]).abs() < EPS
            && (actual.z - expected[2]).abs() < EPS,
        "expected {expected:?}, got {actual:?}"
    );
}

pub fn assert_point_close(actual: Point3<f32>, expected: [f32; 3]) {
    assert_vec_close(Vector3::new(actual.x, actual.y, actual.z), expected);
}
