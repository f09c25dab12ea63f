//! Flow control and application event loop.
//!
//! A "flow" is the application living inside the event loop: it handles
//! input, updates itself every frame and says what to draw. The gallery is
//! one such flow. This module owns the `winit` event loop, the GPU
//! [`Context`] and the plumbing that lets a flow run async work.
//!
//! # User-facing types
//!
//! - [`GraphicsFlow<E>`] is the trait the application implements
//! - [`Out<F>`] is what lifecycle hooks return to start async work
//! - [`Emitter<F, E>`] pushes custom events into the loop from callbacks the
//!   flow registers outside of it (DOM listeners, for instance)
//!
//! # Lifecycle
//!
//! Each frame:
//! 1. Window events are passed to `on_window_events`; clicks are resolved to
//!    a pick id by ray casting and passed to `on_click`
//! 2. Finished async work is applied (`Out::FutFn` mutations, [`Emitter`] events)
//! 3. `on_update` runs with the elapsed time
//! 4. The camera uniform is written from [`GraphicsFlow::camera`]
//! 5. `on_render` is flattened and drawn twice: into the sun's shadow map and
//!    onto the surface
//!
//! Async work never blocks a frame. Natively it runs on a
//! [`futures::executor::LocalPool`] that is polled until stalled once per
//! frame, on the web it is handed to `wasm_bindgen_futures::spawn_local`.
//! Either way results come back as user events and are applied on the event
//! loop thread, so the flow has exactly one writer.

use std::{fmt::Debug, iter, pin::Pin, sync::Arc};

#[cfg(not(target_arch = "wasm32"))]
use futures::{
    executor::{LocalPool, LocalSpawner},
    task::LocalSpawnExt,
};
use instant::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    window::Window,
};

use crate::{
    camera::Camera,
    context::{Context, InitContext},
    data_structures::{geometry::Aabb, model::DrawModel},
    error::GalleryError,
    pick::nearest_hit,
    render::{Instanced, Render},
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// A change to the flow, produced off the event loop and applied on it.
pub type Mutation<F> = Box<dyn FnOnce(&mut F)>;

/// This is the Output Type for every lifecycle hook where the flow can pass async work that is
/// driven according to the platform it's running on.
///
/// `Out::FutFn` resolves futures of mutations that are applied to the flow once resolved. This
/// is how loaded assets are spliced into a live scene.
///
/// `Empty` is the default output used when no futures need to be handled.
pub enum Out<F> {
    FutFn(Vec<Box<dyn Future<Output = Mutation<F>>>>),
    Empty,
}

impl<F> Default for Out<F> {
    fn default() -> Self {
        Self::Empty
    }
}

/// Trait for the application running inside the event loop.
///
/// # Lifecycle
///
/// 1. The flow is built by its [`FlowConstructor`] once the GPU is up
/// 2. `on_init()` is called once; configure the context (projection, clear colour, lights)
/// 3. `on_window_events()` is called for each winit window event
/// 4. `on_click()` is called when a pickable object was clicked
/// 5. `on_custom_events()` is called for events sent through an [`Emitter`]
/// 6. `on_update()` is called every frame
/// 7. `on_render()` is called each frame and specifies what to draw
///
pub trait GraphicsFlow<E>: Sized + 'static {
    /// Initialize the flow and configure the context.
    ///
    /// This is the only place with mutable access to the Context.
    fn on_init(&mut self, ctx: &mut Context) -> Out<Self>;

    /// Called every frame with the elapsed time `dt`.
    fn on_update(&mut self, ctx: &Context, dt: Duration) -> Out<Self>;

    /// Handle window events (keyboard, mouse, window resizing, etc.).
    ///
    /// Called before the context records the event, so `ctx.mouse` still
    /// holds the cursor position of the previous event.
    fn on_window_events(&mut self, ctx: &Context, event: &WindowEvent) -> Out<Self>;

    /// `id` is the pick id of the nearest box from [`GraphicsFlow::pick_bounds`] under the cursor.
    fn on_click(&mut self, ctx: &Context, id: u32) -> Out<Self>;

    /// Handle custom application events.
    ///
    /// Returns the event if it was not consumed.
    fn on_custom_events(&mut self, ctx: &Context, event: E) -> Option<E>;

    /// Return renderable objects for this frame.
    fn on_render(&self) -> Render<'_>;

    /// The camera the frame is rendered from.
    fn camera(&self) -> &Camera;

    /// World space boxes of everything clickable, tagged with pick ids.
    fn pick_bounds(&self) -> Vec<(u32, Aabb)>;
}

/// Type alias for a flow constructor (factory function).
///
/// Takes an [`InitContext`] and an [`Emitter`] and asynchronously returns the flow.
pub type FlowConstructor<F, E> =
    Box<dyn FnOnce(InitContext, Emitter<F, E>) -> Pin<Box<dyn Future<Output = F>>>>;

/// Sends custom events into the event loop.
pub struct Emitter<F: 'static, E: 'static> {
    proxy: EventLoopProxy<FlowEvent<F, E>>,
}

impl<F: 'static, E: 'static> Clone for Emitter<F, E> {
    fn clone(&self) -> Self {
        Self {
            proxy: self.proxy.clone(),
        }
    }
}

impl<F: 'static, E: 'static> Emitter<F, E> {
    pub fn emit(&self, event: E) {
        if self.proxy.send_event(FlowEvent::Custom(event)).is_err() {
            log::warn!("event loop closed, custom event dropped");
        }
    }
}

impl<F: 'static, E: 'static> Debug for Emitter<F, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Emitter")
    }
}

/// GPU context plus the flow it renders.
pub struct AppState<F: 'static> {
    pub(crate) ctx: Context,
    flow: F,
    is_surface_configured: bool,
}

impl<F: 'static> AppState<F> {
    fn resize(&mut self, width: u32, height: u32) {
        if self.ctx.resize(width, height) {
            self.is_surface_configured = true;
        }
    }

    fn render<E>(&mut self) -> Result<(), wgpu::SurfaceError>
    where
        F: GraphicsFlow<E>,
    {
        // invoke main render loop
        self.ctx.window.request_redraw();

        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        self.ctx
            .camera
            .write(&self.ctx.queue, self.flow.camera(), &self.ctx.projection);

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut flat: Vec<Instanced> = Vec::new();
        self.flow.on_render().flatten(&mut flat);
        let draws: Vec<Instanced> = flat
            .into_iter()
            .filter(|instanced| {
                if instanced.amount == 0 || instanced.instance.size() == 0 {
                    log::warn!("model {} has no instances and is skipped", instanced.id);
                    return false;
                }
                true
            })
            .collect();

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut shadow_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shadow Pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.light.shadow_map.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
                ..Default::default()
            });
            shadow_pass.set_pipeline(&self.ctx.pipelines.shadow);
            for instanced in &draws {
                shadow_pass.set_vertex_buffer(1, instanced.instance.slice(..));
                shadow_pass.draw_model_shadow(
                    instanced.model,
                    0..instanced.amount as u32,
                    &self.ctx.light.shadow_bind_group,
                );
            }
        }
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
                ..Default::default()
            });

            render_pass.set_pipeline(&self.ctx.pipelines.basic);
            for instanced in &draws {
                render_pass.set_vertex_buffer(1, instanced.instance.slice(..));
                render_pass.draw_model_instanced(
                    instanced.model,
                    0..instanced.amount as u32,
                    &self.ctx.camera.bind_group,
                    &self.ctx.light.bind_group,
                );
            }
        }

        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

pub struct App<F: 'static, E: 'static> {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    #[cfg(not(target_arch = "wasm32"))]
    local_pool: LocalPool,
    #[cfg(not(target_arch = "wasm32"))]
    spawner: LocalSpawner,
    proxy: EventLoopProxy<FlowEvent<F, E>>,
    state: Option<AppState<F>>,
    // Taken on the first `resumed`.
    constructor: Option<FlowConstructor<F, E>>,
    error: Option<anyhow::Error>,
    last_time: Instant,
}

impl<F, E> App<F, E>
where
    F: GraphicsFlow<E>,
    E: 'static,
{
    fn new(
        event_loop: &EventLoop<FlowEvent<F, E>>,
        constructor: FlowConstructor<F, E>,
    ) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let local_pool = LocalPool::new();
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime: tokio::runtime::Runtime::new()?,
            #[cfg(not(target_arch = "wasm32"))]
            spawner: local_pool.spawner(),
            #[cfg(not(target_arch = "wasm32"))]
            local_pool,
            proxy,
            state: None,
            constructor: Some(constructor),
            error: None,
            last_time: Instant::now(),
        })
    }

    fn initialized(&mut self, event_loop: &ActiveEventLoop, result: anyhow::Result<AppState<F>>) {
        let mut state = match result {
            Ok(state) => state,
            Err(e) => {
                log::error!("initialization failed: {e:#}");
                self.error = Some(e);
                event_loop.exit();
                return;
            }
        };

        // Trigger a resize now that we are initialized
        let size = state.ctx.window.inner_size();
        state.resize(size.width, size.height);
        let out = state.flow.on_init(&mut state.ctx);
        handle_flow_output(
            #[cfg(not(target_arch = "wasm32"))]
            &self.spawner,
            &self.proxy,
            out,
        );
        state.ctx.window.request_redraw();
        self.last_time = Instant::now();
        self.state = Some(state);
    }
}

pub enum FlowEvent<F: 'static, E: 'static> {
    #[allow(dead_code)]
    Initialized(Box<anyhow::Result<AppState<F>>>),
    Mut(Mutation<F>),
    Custom(E),
}

impl<F: 'static, E: 'static> Debug for FlowEvent<F, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized(result) => f
                .debug_tuple("Initialized")
                .field(&result.is_ok())
                .finish(),
            Self::Mut(_) => f.write_str("Mut(|&mut F| -> {...})"),
            Self::Custom(_) => f.write_str("Custom(E)"),
        }
    }
}

impl<F, E> ApplicationHandler<FlowEvent<F, E>> for App<F, E>
where
    F: GraphicsFlow<E>,
    E: 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let Some(constructor) = self.constructor.take() else {
            return;
        };

        let window_attributes = Window::default_attributes().with_title("Art Gallery");
        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                let e = anyhow::Error::new(e).context(GalleryError::Gpu("window creation".into()));
                self.initialized(event_loop, Err(e));
                return;
            }
        };

        #[cfg(target_arch = "wasm32")]
        crate::web::mount_canvas(&window);

        let emitter = Emitter {
            proxy: self.proxy.clone(),
        };
        let init_future = async move {
            let ctx = Context::new(window).await?;
            // The clone in into() only clones the Arcs inside device and queue
            let flow = constructor((&ctx).into(), emitter).await;
            anyhow::Ok(AppState {
                ctx,
                flow,
                is_surface_configured: false,
            })
        };

        #[cfg(not(target_arch = "wasm32"))]
        {
            let result = self.async_runtime.block_on(init_future);
            self.initialized(event_loop, result);
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let result = init_future.await;
                if proxy
                    .send_event(FlowEvent::Initialized(Box::new(result)))
                    .is_err()
                {
                    log::error!("event loop closed before initialization finished");
                }
            });
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: FlowEvent<F, E>) {
        match event {
            // This is the message from our wasm `spawn_local`
            FlowEvent::Initialized(result) => self.initialized(event_loop, *result),
            FlowEvent::Mut(mutation) => {
                if let Some(state) = &mut self.state {
                    mutation(&mut state.flow);
                }
            }
            FlowEvent::Custom(custom_event) => {
                if let Some(state) = &mut self.state {
                    if state
                        .flow
                        .on_custom_events(&state.ctx, custom_event)
                        .is_some()
                    {
                        log::warn!("Custom event was not consumed");
                    }
                }
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        let out = state.flow.on_window_events(&state.ctx, &event);
        handle_flow_output(
            #[cfg(not(target_arch = "wasm32"))]
            &self.spawner,
            &self.proxy,
            out,
        );

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::CursorMoved { position, .. } => state.ctx.mouse.coords = position,
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button,
                ..
            } => state.ctx.mouse.press(button),
            WindowEvent::MouseInput {
                state: ElementState::Released,
                button,
                ..
            } => {
                if !state.ctx.mouse.release(button) {
                    return;
                }
                let coords = state.ctx.mouse.coords;
                let ray = state.flow.camera().cast_ray_from_mouse(
                    (coords.x, coords.y),
                    state.ctx.config.width as f32,
                    state.ctx.config.height as f32,
                    &state.ctx.projection,
                );
                if let Some(id) = nearest_hit(&ray, &state.flow.pick_bounds()) {
                    let out = state.flow.on_click(&state.ctx, id);
                    handle_flow_output(
                        #[cfg(not(target_arch = "wasm32"))]
                        &self.spawner,
                        &self.proxy,
                        out,
                    );
                }
            }
            WindowEvent::RedrawRequested => {
                #[cfg(not(target_arch = "wasm32"))]
                self.local_pool.run_until_stalled();

                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();

                let out = state.flow.on_update(&state.ctx, dt);
                handle_flow_output(
                    #[cfg(not(target_arch = "wasm32"))]
                    &self.spawner,
                    &self.proxy,
                    out,
                );

                match state.render::<E>() {
                    Ok(()) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => {
                        log::error!("Unable to render {}", e);
                    }
                }
            }
            _ => {}
        }
    }
}

fn spawn(
    #[cfg(not(target_arch = "wasm32"))] spawner: &LocalSpawner,
    task: impl Future<Output = ()> + 'static,
) {
    #[cfg(not(target_arch = "wasm32"))]
    if let Err(e) = spawner.spawn_local(task) {
        log::error!("could not spawn task: {e}");
    }

    #[cfg(target_arch = "wasm32")]
    wasm_bindgen_futures::spawn_local(task);
}

fn handle_flow_output<F: 'static, E: 'static>(
    #[cfg(not(target_arch = "wasm32"))] spawner: &LocalSpawner,
    proxy: &EventLoopProxy<FlowEvent<F, E>>,
    out: Out<F>,
) {
    // Mutations are applied by `user_event`, never from inside a task
    let Out::FutFn(futures) = out else {
        return;
    };
    for fut in futures.into_iter().map(Pin::from) {
        let proxy = proxy.clone();
        spawn(
            #[cfg(not(target_arch = "wasm32"))]
            spawner,
            async move {
                let mutation = fut.await;
                if proxy.send_event(FlowEvent::Mut(mutation)).is_err() {
                    log::warn!("event loop closed, mutation dropped");
                }
            },
        );
    }
}

/// Runs `constructor`'s flow until the window closes.
///
/// Natively this blocks and returns initialization errors; on the web the
/// loop is handed to the browser and this returns immediately.
pub fn run<F, E>(constructor: FlowConstructor<F, E>) -> anyhow::Result<()>
where
    F: GraphicsFlow<E>,
    E: 'static,
{
    #[cfg(not(target_arch = "wasm32"))]
    {
        let env = env_logger::Env::default().default_filter_or("info");
        if let Err(e) = env_logger::Builder::from_env(env).try_init() {
            eprintln!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        console_log::init_with_level(log::Level::Info).unwrap_throw();
    }

    let event_loop: EventLoop<FlowEvent<F, E>> = EventLoop::with_user_event()
        .build()
        .map_err(GalleryError::from)?;

    #[allow(unused_mut)]
    let mut app: App<F, E> = App::new(&event_loop, constructor)?;

    #[cfg(not(target_arch = "wasm32"))]
    {
        event_loop.run_app(&mut app).map_err(GalleryError::from)?;
        if let Some(e) = app.error.take() {
            return Err(e);
        }
    }

    #[cfg(target_arch = "wasm32")]
    {
        use winit::platform::web::EventLoopExtWebSys;
        event_loop.spawn_app(app);
    }

    Ok(())
}
