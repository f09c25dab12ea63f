use art_gallery::{
    data_structures::geometry::Shape,
    gallery::{
        catalog::{ExhibitRef, SculptureForm, artworks, sculptures},
        placement::WallSide,
    },
};
use cgmath::Vector3;

#[test]
fn should_ship_the_full_collection() {
    assert_eq!(artworks().len(), 9);
    assert_eq!(sculptures().len(), 8);
}

#[test]
fn should_hang_every_artwork_on_its_nominal_wall() {
    let walls: Vec<_> = artworks()
        .iter()
        .map(|artwork| WallSide::classify(Vector3::from(artwork.position)))
        .collect();
    let count = |side| walls.iter().filter(|wall| **wall == side).count();

    assert_eq!(count(WallSide::Back), 3);
    assert_eq!(count(WallSide::Front), 2);
    assert_eq!(count(WallSide::Left), 2);
    assert_eq!(count(WallSide::Right), 2);
}

#[test]
fn should_keep_sculptures_inside_the_room() {
    for sculpture in sculptures() {
        let [x, y, z] = sculpture.position;
        assert!(x.abs() < 20.0 && z.abs() < 15.0, "{} is outside", sculpture.title);
        assert_eq!(y, 0.0);
    }
}

#[test]
fn should_double_only_david_and_spire() {
    let doubled: Vec<_> = sculptures()
        .into_iter()
        .filter(|sculpture| sculpture.is_double_size())
        .map(|sculpture| sculpture.title)
        .collect();
    assert_eq!(doubled, vec!["David", "Spire"]);
}

#[test]
fn should_mix_models_and_procedural_forms() {
    let all = sculptures();
    let models: Vec<_> = all.iter().filter_map(|s| s.model_path()).collect();
    assert_eq!(models.len(), 3);
    assert!(models.iter().all(|path| path.ends_with(".glb")));
    assert!(
        all.iter()
            .any(|s| s.form == SculptureForm::Procedural(Shape::TorusKnot))
    );
}

#[test]
fn should_round_trip_pick_ids() {
    for idx in 0..artworks().len() {
        let exhibit = ExhibitRef::Artwork(idx);
        assert_eq!(ExhibitRef::from_pick_id(exhibit.pick_id()), Some(exhibit));
    }
    for idx in 0..sculptures().len() {
        let exhibit = ExhibitRef::Sculpture(idx);
        assert_eq!(ExhibitRef::from_pick_id(exhibit.pick_id()), Some(exhibit));
    }
    assert_eq!(ExhibitRef::from_pick_id(0), None);
}

#[test]
fn should_caption_with_title_artist_and_year() {
    let mona_lisa = &artworks()[0];
    let caption = mona_lisa.caption();
    assert!(caption.starts_with("Mona Lisa"));
    assert!(caption.contains("Leonardo da Vinci"));
    assert!(caption.contains(mona_lisa.year));
}
