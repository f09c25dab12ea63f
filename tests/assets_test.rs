use art_gallery::{
    error::GalleryError,
    gallery::assets::{AssetRegistry, AssetStatus},
};

#[test]
fn should_track_pending_until_loaded() {
    let mut registry = AssetRegistry::new();
    registry.register("images/mona_lisa.jpg");
    registry.register("models/david.glb");
    assert_eq!(registry.pending(), 2);

    registry.mark_loaded("images/mona_lisa.jpg");
    assert_eq!(registry.pending(), 1);
    assert_eq!(
        registry.status("images/mona_lisa.jpg"),
        Some(&AssetStatus::Loaded)
    );
}

#[test]
fn should_keep_reason_of_failed_load() {
    let mut registry = AssetRegistry::new();
    registry.register("models/david.glb");
    let error = GalleryError::asset("models/david.glb", &anyhow::anyhow!("not found"));
    registry.mark_failed(&error);

    assert_eq!(registry.failed(), 1);
    assert_eq!(registry.pending(), 0);
    assert!(matches!(
        registry.status("models/david.glb"),
        Some(AssetStatus::Failed(reason)) if reason.contains("not found")
    ));
}

#[test]
fn should_ignore_non_asset_errors() {
    let mut registry = AssetRegistry::new();
    registry.register("images/hay_wain.jpg");
    registry.mark_failed(&GalleryError::Gpu("no adapter".to_string()));
    assert_eq!(registry.failed(), 0);
    assert_eq!(registry.pending(), 1);
}

#[test]
fn should_not_reset_status_on_second_register() {
    let mut registry = AssetRegistry::new();
    registry.register("images/hay_wain.jpg");
    registry.mark_loaded("images/hay_wain.jpg");
    registry.register("images/hay_wain.jpg");
    assert_eq!(
        registry.status("images/hay_wain.jpg"),
        Some(&AssetStatus::Loaded)
    );
    assert_eq!(registry.iter().count(), 1);
}
