//! The fixed collection on show.
//!
//! Positions of artworks are nominal points on a wall plane (the room's walls
//! sit at x = ±20 and z = ±15); [`super::placement`] works out which wall and
//! how far in front of it frame and canvas go. Sculptures stand on the floor
//! at `position` and are placed on a pedestal.

use crate::data_structures::geometry::Shape;

#[derive(Clone, Debug, PartialEq)]
pub struct ArtworkDescriptor {
    pub title: &'static str,
    pub artist: &'static str,
    pub year: &'static str,
    pub description: &'static str,
    pub position: [f32; 3],
    /// Width and height of the canvas in world units.
    pub size: [f32; 2],
    /// Image file below the assets directory.
    pub image: &'static str,
}

/// What stands on a pedestal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SculptureForm {
    Procedural(Shape),
    /// glTF binary below the assets directory.
    Model(&'static str),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SculptureDescriptor {
    pub title: &'static str,
    pub artist: &'static str,
    pub year: &'static str,
    pub description: &'static str,
    /// Floor position of the pedestal centre.
    pub position: [f32; 3],
    pub form: SculptureForm,
    pub colour: [f32; 3],
}

/// Sculptures shown at twice the usual size.
pub const DOUBLE_SIZE: [&str; 2] = ["David", "Spire"];

impl ArtworkDescriptor {
    pub fn caption(&self) -> String {
        format!(
            "{} ({}), {}. {}",
            self.title, self.year, self.artist, self.description
        )
    }
}

impl SculptureDescriptor {
    pub fn caption(&self) -> String {
        format!(
            "{} ({}), {}. {}",
            self.title, self.year, self.artist, self.description
        )
    }

    pub fn is_double_size(&self) -> bool {
        DOUBLE_SIZE.contains(&self.title)
    }

    pub fn model_path(&self) -> Option<&'static str> {
        match self.form {
            SculptureForm::Model(path) => Some(path),
            SculptureForm::Procedural(_) => None,
        }
    }
}

/// Index into one of the two lists, convertible to and from the pick id
/// the scene graph tags its nodes with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExhibitRef {
    Artwork(usize),
    Sculpture(usize),
}

const ARTWORK_PICK_BASE: u32 = 1;
const SCULPTURE_PICK_BASE: u32 = 1000;

impl ExhibitRef {
    pub fn pick_id(self) -> u32 {
        match self {
            ExhibitRef::Artwork(idx) => ARTWORK_PICK_BASE + idx as u32,
            ExhibitRef::Sculpture(idx) => SCULPTURE_PICK_BASE + idx as u32,
        }
    }

    /// `0` is reserved for the room itself and never maps to an exhibit.
    pub fn from_pick_id(id: u32) -> Option<Self> {
        match id {
            0 => None,
            id if id >= SCULPTURE_PICK_BASE => Some(ExhibitRef::Sculpture((id - SCULPTURE_PICK_BASE) as usize)),
            id => Some(ExhibitRef::Artwork((id - ARTWORK_PICK_BASE) as usize)),
        }
    }
}

pub fn artworks() -> Vec<ArtworkDescriptor> {
    vec![
        ArtworkDescriptor {
            title: "Mona Lisa",
            artist: "Leonardo da Vinci",
            year: "c. 1503",
            description: "Half-length portrait of a seated woman before an imaginary landscape.",
            position: [-10.0, 4.0, -15.0],
            size: [2.0, 3.0],
            image: "images/mona_lisa.jpg",
        },
        ArtworkDescriptor {
            title: "The Starry Night",
            artist: "Vincent van Gogh",
            year: "1889",
            description: "A swirling night sky over the village of Saint-Remy.",
            position: [0.0, 4.0, -15.0],
            size: [4.0, 3.2],
            image: "images/starry_night.jpg",
        },
        ArtworkDescriptor {
            title: "Girl with a Pearl Earring",
            artist: "Johannes Vermeer",
            year: "c. 1665",
            description: "A tronie of a girl in a turban glancing over her shoulder.",
            position: [10.0, 4.0, -15.0],
            size: [2.4, 2.8],
            image: "images/pearl_earring.jpg",
        },
        ArtworkDescriptor {
            title: "The Great Wave off Kanagawa",
            artist: "Katsushika Hokusai",
            year: "c. 1831",
            description: "Woodblock print of a towering wave threatening three boats, Mount Fuji behind.",
            position: [-8.0, 4.0, 15.0],
            size: [4.0, 2.7],
            image: "images/great_wave.jpg",
        },
        ArtworkDescriptor {
            title: "Wanderer above the Sea of Fog",
            artist: "Caspar David Friedrich",
            year: "c. 1818",
            description: "A lone figure on a rocky precipice looks out over a fog covered landscape.",
            position: [8.0, 4.0, 15.0],
            size: [2.4, 3.1],
            image: "images/wanderer.jpg",
        },
        ArtworkDescriptor {
            title: "The Birth of Venus",
            artist: "Sandro Botticelli",
            year: "c. 1485",
            description: "The goddess arrives at the shore on a scallop shell.",
            position: [-20.0, 4.0, -6.0],
            size: [4.4, 2.8],
            image: "images/birth_of_venus.jpg",
        },
        ArtworkDescriptor {
            title: "The Night Watch",
            artist: "Rembrandt van Rijn",
            year: "1642",
            description: "A militia company led by Captain Frans Banninck Cocq moves out.",
            position: [-20.0, 4.0, 6.0],
            size: [4.0, 3.3],
            image: "images/night_watch.jpg",
        },
        ArtworkDescriptor {
            title: "Water Lilies",
            artist: "Claude Monet",
            year: "1906",
            description: "Lilies on the pond of Monet's garden at Giverny.",
            position: [20.0, 4.0, -6.0],
            size: [4.0, 2.6],
            image: "images/water_lilies.jpg",
        },
        ArtworkDescriptor {
            title: "The Hay Wain",
            artist: "John Constable",
            year: "1821",
            description: "A horse drawn wagon crosses the river Stour near Flatford Mill.",
            position: [20.0, 4.0, 6.0],
            size: [3.6, 2.5],
            image: "images/hay_wain.jpg",
        },
    ]
}

pub fn sculptures() -> Vec<SculptureDescriptor> {
    vec![
        SculptureDescriptor {
            title: "Venus de Milo",
            artist: "Alexandros of Antioch",
            year: "c. 150 BC",
            description: "Marble statue of Aphrodite, her arms lost.",
            position: [-12.0, 0.0, -8.0],
            form: SculptureForm::Model("models/venus_de_milo.glb"),
            colour: [0.95, 0.93, 0.9],
        },
        SculptureDescriptor {
            title: "David",
            artist: "Michelangelo",
            year: "1504",
            description: "The biblical hero before his fight with Goliath.",
            position: [12.0, 0.0, -8.0],
            form: SculptureForm::Model("models/david.glb"),
            colour: [0.95, 0.93, 0.9],
        },
        SculptureDescriptor {
            title: "The Thinker",
            artist: "Auguste Rodin",
            year: "1904",
            description: "A nude male figure deep in thought, cast in bronze.",
            position: [0.0, 0.0, -6.0],
            form: SculptureForm::Model("models/thinker.glb"),
            colour: [0.55, 0.4, 0.25],
        },
        SculptureDescriptor {
            title: "Endless Loop",
            artist: "Studio Collection",
            year: "2024",
            description: "A (2,3) torus knot in polished brass.",
            position: [-6.0, 0.0, 0.0],
            form: SculptureForm::Procedural(Shape::TorusKnot),
            colour: [0.85, 0.65, 0.2],
        },
        SculptureDescriptor {
            title: "Crystal",
            artist: "Studio Collection",
            year: "2024",
            description: "A regular octahedron in frosted blue glass.",
            position: [6.0, 0.0, 0.0],
            form: SculptureForm::Procedural(Shape::Octahedron),
            colour: [0.45, 0.65, 0.95],
        },
        SculptureDescriptor {
            title: "Halo",
            artist: "Studio Collection",
            year: "2023",
            description: "A torus in matte red lacquer.",
            position: [-12.0, 0.0, 8.0],
            form: SculptureForm::Procedural(Shape::Torus),
            colour: [0.8, 0.2, 0.2],
        },
        SculptureDescriptor {
            title: "Spire",
            artist: "Studio Collection",
            year: "2023",
            description: "A slender cone in white marble.",
            position: [12.0, 0.0, 8.0],
            form: SculptureForm::Procedural(Shape::Cone),
            colour: [0.92, 0.92, 0.9],
        },
        SculptureDescriptor {
            title: "Pearl",
            artist: "Studio Collection",
            year: "2022",
            description: "A polished sphere.",
            position: [0.0, 0.0, 6.0],
            form: SculptureForm::Procedural(Shape::Sphere),
            colour: [0.9, 0.88, 0.85],
        },
    ]
}
