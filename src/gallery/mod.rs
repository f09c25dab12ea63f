//! The gallery application: scene composition, input and picking.
//!
//! [`Gallery`] is the application context. It owns the camera and the
//! [`Navigator`] that moves it, the catalog, the registry of asset loads and
//! the scene graph. The room, frames, pedestals and procedural sculptures are
//! built synchronously when the gallery is constructed. Canvases and glTF
//! sculptures are loaded afterwards; each load is a one-shot future that ends
//! in a mutation splicing the finished node into the scene (or recording the
//! failure), applied by the event loop.

pub mod assets;
pub mod catalog;
pub mod placement;

use cgmath::{Deg, Vector3};
use instant::Duration;
use winit::{
    event::{ElementState, KeyEvent, MouseScrollDelta, WindowEvent},
    keyboard::PhysicalKey,
};

use crate::{
    camera::{Camera, Projection},
    config::GalleryConfig,
    context::{Context, InitContext},
    data_structures::{
        geometry::{Aabb, MeshData},
        instance::Instance,
        model::{Material, MaterialUniform, Model},
        scene_graph::{ContainerNode, ModelNode, SceneNode},
        texture::{self, Texture},
    },
    error::GalleryError,
    flow::{Emitter, GraphicsFlow, Mutation, Out},
    navigation::{Compass, Navigator, WalkKey},
    pipelines::light::LightRig,
    render::Render,
    resources::{self, texture::material_layout},
};

use self::{
    assets::AssetRegistry,
    catalog::{ArtworkDescriptor, ExhibitRef, SculptureDescriptor, SculptureForm},
    placement::WallPlacement,
};

/// Pixels of wheel travel counted as one line.
const PIXELS_PER_LINE: f64 = 50.0;
/// Pick id of everything that is not an exhibit.
const ROOM_ID: u32 = 0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GalleryEvent {
    Viewpoint(Compass),
}

type LoadFuture = Box<dyn Future<Output = Mutation<Gallery>>>;

pub struct Gallery {
    config: GalleryConfig,
    camera: Camera,
    navigator: Navigator,
    artworks: Vec<ArtworkDescriptor>,
    sculptures: Vec<SculptureDescriptor>,
    registry: AssetRegistry,
    scene: ContainerNode,
    emitter: Emitter<Gallery, GalleryEvent>,
    init: InitContext,
    material_layout: wgpu::BindGroupLayout,
}

impl Gallery {
    pub fn new(
        init: InitContext,
        emitter: Emitter<Gallery, GalleryEvent>,
        config: GalleryConfig,
    ) -> Self {
        let camera = Camera::new(config.camera_start, config.camera_start_target);
        let navigator = Navigator::new(&config, &camera);
        let artworks = catalog::artworks();
        let sculptures = catalog::sculptures();

        let mut registry = AssetRegistry::new();
        artworks.iter().for_each(|artwork| registry.register(artwork.image));
        sculptures
            .iter()
            .filter_map(SculptureDescriptor::model_path)
            .for_each(|path| registry.register(path));

        let material_layout = material_layout(&init.device);
        let mut gallery = Self {
            config,
            camera,
            navigator,
            artworks,
            sculptures,
            registry,
            scene: ContainerNode::new(0),
            emitter,
            init,
            material_layout,
        };
        gallery.compose_room();
        gallery.compose_frames();
        gallery.compose_pedestals();
        gallery.compose_procedural_sculptures();
        log::info!(
            "gallery composed: {} artworks, {} sculptures",
            gallery.artworks.len(),
            gallery.sculptures.len()
        );
        gallery
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }

    pub fn describe(&self, id: u32) -> Option<String> {
        match ExhibitRef::from_pick_id(id)? {
            ExhibitRef::Artwork(idx) => self.artworks.get(idx).map(ArtworkDescriptor::caption),
            ExhibitRef::Sculpture(idx) => self.sculptures.get(idx).map(SculptureDescriptor::caption),
        }
    }

    /// Adds a finished node to the live scene.
    fn splice(&mut self, path: &str, node: Box<dyn SceneNode>) {
        self.scene.add_child(node);
        self.registry.mark_loaded(path);
    }

    fn solid_model(
        &self,
        name: &str,
        mesh: MeshData,
        colour: [u8; 4],
        uniform: MaterialUniform,
    ) -> (Model, Option<Aabb>) {
        let bounds = mesh.bounds();
        let texture = Texture::from_colour(&self.init.device, &self.init.queue, colour);
        let model = build_model(&self.init, &self.material_layout, name, mesh, texture, uniform);
        (model, bounds)
    }

    /// Adds a node drawing `model` once per instance.
    ///
    /// Room geometry is picked under [`ROOM_ID`] so it hides exhibits behind it.
    fn add_static(&mut self, (model, bounds): (Model, Option<Aabb>), instances: Vec<Instance>) {
        let mut node = ModelNode::from_model(instances.len(), ROOM_ID, &self.init.device, model);
        if let Some(bounds) = bounds {
            node = node.with_bounds(bounds);
        }
        for (idx, instance) in instances.into_iter().enumerate() {
            node.set_local_transform(idx, instance);
        }
        node.update_world_transform_all();
        node.write_to_buffers(&self.init.queue, &self.init.device);
        self.scene.add_child(Box::new(node));
    }

    /// Checkerboard floor and four walls. The room has no ceiling.
    fn compose_room(&mut self) {
        let w = self.config.room_half_width;
        let d = self.config.room_half_depth;
        let h = self.config.wall_height;
        let t = self.config.wall_thickness;

        let checker = texture::checkerboard(
            self.config.checker_tiles,
            self.config.checker_tile_px,
            [200, 200, 200, 255],
            [60, 60, 60, 255],
        );
        let floor_texture = Texture::from_rgba(
            &self.init.device,
            &self.init.queue,
            &checker,
            Some("floor checkerboard"),
            false,
        );
        let mut floor_uniform = MaterialUniform::default();
        floor_uniform.roughness = 0.3;
        let floor_mesh = MeshData::floor(2.0 * w, 2.0 * d, self.config.floor_repeat);
        let floor_bounds = floor_mesh.bounds();
        let floor = build_model(
            &self.init,
            &self.material_layout,
            "floor",
            floor_mesh,
            floor_texture,
            floor_uniform,
        );
        self.add_static((floor, floor_bounds), vec![Instance::new()]);

        let mut wall_uniform = MaterialUniform::default();
        wall_uniform.roughness = 0.9;
        wall_uniform.metalness = 0.0;
        let wall = self.solid_model("wall", MeshData::cuboid(1.0, 1.0, 1.0), [236, 232, 224, 255], wall_uniform);
        // inner faces lie on the room's bounding planes
        let walls = [
            (Vector3::new(0.0, h / 2.0, -(d + t / 2.0)), Vector3::new(2.0 * (w + t), h, t)),
            (Vector3::new(0.0, h / 2.0, d + t / 2.0), Vector3::new(2.0 * (w + t), h, t)),
            (Vector3::new(-(w + t / 2.0), h / 2.0, 0.0), Vector3::new(t, h, 2.0 * d)),
            (Vector3::new(w + t / 2.0, h / 2.0, 0.0), Vector3::new(t, h, 2.0 * d)),
        ]
        .into_iter()
        .map(|(position, scale)| Instance {
            position,
            scale,
            ..Default::default()
        })
        .collect();
        self.add_static(wall, walls);
    }

    fn compose_frames(&mut self) {
        let frames = self
            .artworks
            .iter()
            .map(|artwork| {
                let placement = placement::place_on_wall(artwork.position.into(), &self.config);
                placement::frame_instance(&placement, artwork.size, &self.config)
            })
            .collect();
        let mut uniform = MaterialUniform::default();
        uniform.roughness = 0.5;
        let frame = self.solid_model("frame", MeshData::cuboid(1.0, 1.0, 1.0), [92, 64, 40, 255], uniform);
        self.add_static(frame, frames);
    }

    fn compose_pedestals(&mut self) {
        let pedestals = self
            .sculptures
            .iter()
            .map(|sculpture| placement::pedestal_instance(sculpture.position, &self.config))
            .collect();
        let mut uniform = MaterialUniform::default();
        uniform.roughness = 0.7;
        let pedestal = self.solid_model("pedestal", MeshData::cuboid(1.0, 1.0, 1.0), [245, 245, 245, 255], uniform);
        self.add_static(pedestal, pedestals);
    }

    fn compose_procedural_sculptures(&mut self) {
        let procedural: Vec<(usize, SculptureDescriptor)> = self
            .sculptures
            .iter()
            .cloned()
            .enumerate()
            .filter(|(_, sculpture)| matches!(sculpture.form, SculptureForm::Procedural(_)))
            .collect();
        for (idx, sculpture) in procedural {
            let SculptureForm::Procedural(shape) = sculpture.form else {
                continue;
            };
            let mesh = shape.mesh();
            let Some(bounds) = mesh.bounds() else {
                log::warn!("{:?} produced an empty mesh", shape);
                continue;
            };
            let [r, g, b] = sculpture.colour;
            let mut uniform = MaterialUniform::tinted([r, g, b, 1.0]);
            uniform.roughness = 0.35;
            uniform.metalness = 0.4;
            let (model, _) = self.solid_model(sculpture.title, mesh, [255; 4], uniform);
            let instance =
                placement::sculpture_instance(&bounds, sculpture.position, &self.config, sculpture.is_double_size());
            let node = prepared_node(&self.init, model, bounds, instance, ExhibitRef::Sculpture(idx).pick_id());
            self.scene.add_child(node);
        }
    }

    fn painting_loads(&self) -> Vec<LoadFuture> {
        self.artworks
            .iter()
            .enumerate()
            .map(|(idx, artwork)| {
                let init = self.init.clone();
                let layout = self.material_layout.clone();
                let artwork = artwork.clone();
                let placement = placement::place_on_wall(artwork.position.into(), &self.config);
                let pick_id = ExhibitRef::Artwork(idx).pick_id();
                Box::new(async move {
                    let path = artwork.image;
                    let mutation: Mutation<Gallery> =
                        match load_painting(&init, &layout, &artwork, &placement, pick_id).await {
                            Ok(node) => Box::new(move |gallery: &mut Gallery| gallery.splice(path, node)),
                            Err(e) => {
                                let error = GalleryError::asset(path, &e);
                                Box::new(move |gallery: &mut Gallery| gallery.registry.mark_failed(&error))
                            }
                        };
                    mutation
                }) as LoadFuture
            })
            .collect()
    }

    fn sculpture_loads(&self) -> Vec<LoadFuture> {
        self.sculptures
            .iter()
            .enumerate()
            .filter_map(|(idx, sculpture)| {
                let path = sculpture.model_path()?;
                let init = self.init.clone();
                let position = sculpture.position;
                let double_size = sculpture.is_double_size();
                let config = self.config.clone();
                let pick_id = ExhibitRef::Sculpture(idx).pick_id();
                Some(Box::new(async move {
                    let mutation: Mutation<Gallery> =
                        match resources::load_model_gltf(path, &init.device, &init.queue).await {
                            Ok((model, bounds)) => {
                                let instance =
                                    placement::sculpture_instance(&bounds, position, &config, double_size);
                                let node = prepared_node(&init, model, bounds, instance, pick_id);
                                Box::new(move |gallery: &mut Gallery| gallery.splice(path, node))
                            }
                            Err(e) => {
                                let error = GalleryError::asset(path, &e);
                                Box::new(move |gallery: &mut Gallery| gallery.registry.mark_failed(&error))
                            }
                        };
                    mutation
                }) as LoadFuture)
            })
            .collect()
    }

    fn handle_key(&mut self, event: &KeyEvent) {
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        let pressed = event.state == ElementState::Pressed;
        if let Some(key) = WalkKey::from_key_code(code) {
            // auto-repeat is not a new press
            if !event.repeat {
                self.navigator.handle_walk_key(key, pressed, &self.camera);
            }
        } else if let Some(compass) = Compass::from_key_code(code) {
            if pressed && !event.repeat {
                self.emitter.emit(GalleryEvent::Viewpoint(compass));
            }
        }
    }
}

fn build_model(
    init: &InitContext,
    layout: &wgpu::BindGroupLayout,
    name: &str,
    mesh: MeshData,
    diffuse: Texture,
    uniform: MaterialUniform,
) -> Model {
    let normal = Texture::create_default_normal_map(1, 1, &init.device, &init.queue);
    let material = Material::new(&init.device, name, diffuse, normal, uniform, layout);
    Model {
        meshes: vec![mesh.into_mesh(&init.device, name, 0)],
        materials: vec![material],
    }
}

/// A pickable single instance node, transforms computed and uploaded.
fn prepared_node(
    init: &InitContext,
    model: Model,
    bounds: Aabb,
    instance: Instance,
    pick_id: u32,
) -> Box<dyn SceneNode> {
    let mut node = ModelNode::from_model(1, pick_id, &init.device, model).with_bounds(bounds);
    node.set_local_transform(0, instance);
    node.update_world_transform_all();
    node.write_to_buffers(&init.queue, &init.device);
    Box::new(node)
}

async fn load_painting(
    init: &InitContext,
    layout: &wgpu::BindGroupLayout,
    artwork: &ArtworkDescriptor,
    placement: &WallPlacement,
    pick_id: u32,
) -> anyhow::Result<Box<dyn SceneNode>> {
    let texture = resources::texture::load_texture(artwork.image, false, &init.device, &init.queue, None).await?;
    let mesh = MeshData::plane(artwork.size[0], artwork.size[1]);
    let bounds = mesh
        .bounds()
        .ok_or_else(|| anyhow::anyhow!("canvas mesh is empty"))?;
    let mut uniform = MaterialUniform::default();
    uniform.roughness = 0.85;
    uniform.metalness = 0.0;
    let model = build_model(init, layout, artwork.title, mesh, texture, uniform);
    let instance = Instance {
        position: placement.painting,
        rotation: placement.rotation,
        ..Default::default()
    };
    Ok(prepared_node(init, model, bounds, instance, pick_id))
}

impl GraphicsFlow<GalleryEvent> for Gallery {
    fn on_init(&mut self, ctx: &mut Context) -> Out<Self> {
        ctx.projection = Projection::new(
            ctx.config.width,
            ctx.config.height,
            Deg(self.config.fovy_deg),
            self.config.znear,
            self.config.zfar,
        );
        let [r, g, b] = self.config.clear_colour;
        ctx.clear_colour = wgpu::Color { r, g, b, a: 1.0 };
        let lights = LightRig::gallery(&self.config).to_uniform(&self.config);
        ctx.light.write(&ctx.queue, lights);

        #[cfg(target_arch = "wasm32")]
        {
            crate::web::hide_loading_screen();
            let emitter = self.emitter.clone();
            crate::web::bind_compass_controls(move |compass| {
                emitter.emit(GalleryEvent::Viewpoint(compass))
            });
        }

        let mut loads = self.painting_loads();
        loads.extend(self.sculpture_loads());
        log::info!("loading {} assets", loads.len());
        Out::FutFn(loads)
    }

    fn on_update(&mut self, _ctx: &Context, dt: Duration) -> Out<Self> {
        self.navigator.update(&mut self.camera, dt);
        Out::Empty
    }

    fn on_window_events(&mut self, ctx: &Context, event: &WindowEvent) -> Out<Self> {
        match event {
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event),
            WindowEvent::CursorMoved { position, .. } => {
                if let Some((dx, dy)) = ctx.mouse.drag_delta(*position) {
                    self.navigator.handle_drag(dx, dy, &self.camera);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(position) => (position.y / PIXELS_PER_LINE) as f32,
                };
                self.navigator.handle_zoom(lines, &self.camera);
            }
            _ => (),
        }
        Out::Empty
    }

    fn on_click(&mut self, _ctx: &Context, id: u32) -> Out<Self> {
        match self.describe(id) {
            Some(caption) => {
                log::info!("{caption}");
                #[cfg(target_arch = "wasm32")]
                crate::web::show_artwork_info(&caption);
            }
            None if id == ROOM_ID => log::trace!("click on room geometry"),
            None => log::debug!("click on unknown pick id {id}"),
        }
        Out::Empty
    }

    fn on_custom_events(&mut self, _ctx: &Context, event: GalleryEvent) -> Option<GalleryEvent> {
        match event {
            GalleryEvent::Viewpoint(compass) => {
                self.navigator.request_viewpoint(compass, &self.camera);
                None
            }
        }
    }

    fn on_render(&self) -> Render<'_> {
        Render::from(&self.scene as &dyn SceneNode)
    }

    fn camera(&self) -> &Camera {
        &self.camera
    }

    fn pick_bounds(&self) -> Vec<(u32, Aabb)> {
        self.scene.pick_bounds()
    }
}
