//! art-gallery
//!
//! An explorable 3D art gallery for native windows and the browser (WebGL2).
//! A room with a checkerboard floor holds framed paintings on its four walls
//! and sculptures on pedestals, lit by a fixed rig with a shadow casting sun.
//! The camera orbits with damping, walks with WASD/arrow keys and jumps to
//! one of four preset viewpoints.
//!
//! High-level modules
//! - `gallery`: the application; scene composition, catalog, placement and asset registry
//! - `navigation`: orbit, walk and preset jumps reconciled by a navigation mode
//! - `camera`: camera, projection and picking rays
//! - `config`: every tunable constant
//! - `context`: central GPU and window context that owns device/queue/pipelines
//! - `data_structures`: meshes, models, instances, textures and the scene graph
//! - `flow`: event loop and the flow trait the gallery implements
//! - `pick`: mouse state and ray based picking
//! - `pipelines`: the lit pipeline, the shadow pipeline and the light rig
//! - `resources`: loading images and glTF models
//! - `render`: render composition consumed by the frame loop
//! - `web`: the host page contract (wasm32 only)
//!

pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod error;
pub mod flow;
pub mod gallery;
pub mod navigation;
pub mod pick;
pub mod pipelines;
pub mod render;
pub mod resources;
#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::{
    config::GalleryConfig,
    gallery::{Gallery, GalleryEvent},
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Opens the gallery with the default configuration.
pub fn run() -> anyhow::Result<()> {
    run_with(GalleryConfig::default())
}

pub fn run_with(config: GalleryConfig) -> anyhow::Result<()> {
    flow::run::<Gallery, GalleryEvent>(Box::new(move |init, emitter| {
        Box::pin(async move { Gallery::new(init, emitter, config) })
    }))
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    run().map_err(|e| JsValue::from_str(&format!("{e:#}")))
}
