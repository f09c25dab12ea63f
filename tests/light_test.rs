use art_gallery::{
    config::GalleryConfig,
    pipelines::light::{LightRig, LocalLight, MAX_LOCAL_LIGHTS},
};
use cgmath::{Matrix4, Point3, Transform};

#[test]
fn should_upload_every_light_of_the_gallery_rig() {
    let config = GalleryConfig::default();
    let rig = LightRig::gallery(&config);
    let uniform = rig.to_uniform(&config);
    assert_eq!(uniform.light_count() as usize, rig.locals.len());
}

#[test]
fn should_cap_local_lights() {
    let config = GalleryConfig::default();
    let mut rig = LightRig::gallery(&config);
    rig.locals = (0..12)
        .map(|i| LocalLight::point([i as f32, 8.0, 0.0], [1.0, 1.0, 1.0], 1.0, 10.0))
        .collect();
    assert_eq!(rig.to_uniform(&config).light_count() as usize, MAX_LOCAL_LIGHTS);
}

#[test]
fn should_keep_the_room_inside_the_shadow_frustum() {
    let config = GalleryConfig::default();
    let view_proj: Matrix4<f32> = LightRig::gallery(&config).sun.view_proj();
    let (w, d, h) = (config.room_half_width, config.room_half_depth, config.wall_height);
    for corner in [
        Point3::new(-w, 0.0, -d),
        Point3::new(w, 0.0, d),
        Point3::new(-w, h, d),
        Point3::new(w, h, -d),
    ] {
        let clip = view_proj.transform_point(corner);
        assert!(clip.x.abs() <= 1.0 && clip.y.abs() <= 1.0, "{corner:?} -> {clip:?}");
        assert!((0.0..=1.0).contains(&clip.z), "{corner:?} -> {clip:?}");
    }
}
