//! Engine data structures: meshes, models, textures, scene graphs and instances.
//!
//! - `geometry` builds procedural meshes on the CPU and holds [`geometry::Aabb`]
//! - `model` contains mesh and material definitions, GPU resources for 3D models
//! - `texture` contains the GPU texture wrapper and generated textures
//! - `instance` holds per-instance transformation data
//! - `scene_graph` enables hierarchical scene organization

pub mod geometry;
pub mod instance;
pub mod model;
pub mod scene_graph;
pub mod texture;
