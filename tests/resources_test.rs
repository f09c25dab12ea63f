use art_gallery::resources::resolve_relative;

#[test]
fn should_resolve_buffer_next_to_its_model() {
    assert_eq!(
        resolve_relative("models/venus.gltf", "venus.bin"),
        "models/venus.bin"
    );
    assert_eq!(
        resolve_relative("models/statues/venus.gltf", "textures/marble.png"),
        "models/statues/textures/marble.png"
    );
}

#[test]
fn should_keep_uri_when_model_sits_at_the_root() {
    assert_eq!(resolve_relative("venus.gltf", "venus.bin"), "venus.bin");
}

#[test]
fn should_keep_absolute_uri() {
    assert_eq!(
        resolve_relative("models/venus.gltf", "/shared/venus.bin"),
        "/shared/venus.bin"
    );
}
