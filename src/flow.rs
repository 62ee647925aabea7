//! Application event loop.
//!
//! [`run`] opens a window, builds the scene once the window exists and then
//! redraws it on every `RedrawRequested`. The lifecycle is:
//!
//! 1. `resumed`: create the GPU context, the backend and the [`SceneDriver`]
//! 2. `Resized`: reconfigure the surface and re-upload the camera
//! 3. `RedrawRequested`: record the scene's draws and submit them
//! 4. `exiting`: release the scene's textures

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use crate::{
    backend::{TextureHandle, WgpuBackend},
    context::Context,
    driver::SceneDriver,
    resources::decoder::FlippedImageDecoder,
    scene::SceneDescription,
};

struct AppState {
    ctx: Context,
    backend: WgpuBackend,
    driver: SceneDriver<TextureHandle>,
}

impl AppState {
    fn new(window: Arc<Window>, description: &SceneDescription) -> anyhow::Result<Self> {
        let ctx = futures::executor::block_on(Context::new(window))?;
        ctx.surface.configure(&ctx.device, &ctx.config);

        let mut backend = WgpuBackend::new(&ctx.device, &ctx.queue, ctx.config.format);
        let decoder = FlippedImageDecoder::new(&description.asset_root);
        let driver = SceneDriver::initialize(description, &mut backend, &decoder)?;
        driver.apply_camera(&mut backend, ctx.config.width, ctx.config.height);

        Ok(Self {
            ctx,
            backend,
            driver,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.ctx.resize(width, height) {
            self.driver.apply_camera(&mut self.backend, width, height);
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let report = self.driver.render_frame(&mut self.backend);
        if !report.is_complete() {
            log::debug!(
                "Frame drew {} objects, skipped {}",
                report.drawn,
                report.skipped.len()
            );
        }
        self.backend.render(
            &view,
            &self.ctx.depth_texture.view,
            self.driver.clear_color(),
        );

        self.ctx.window.pre_present_notify();
        output.present();
        Ok(())
    }
}

pub struct App {
    description: SceneDescription,
    state: Option<AppState>,
    error: Option<anyhow::Error>,
}

impl App {
    pub fn new(description: SceneDescription) -> Self {
        Self {
            description,
            state: None,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{:#}", error);
        self.error = Some(error);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window_attributes = Window::default_attributes().with_title("Still Life");
        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };

        match AppState::new(window, &self.description) {
            Ok(state) => {
                state.ctx.window.request_redraw();
                self.state = Some(state);
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                match state.render() {
                    Ok(()) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of GPU memory");
                        event_loop.exit();
                    }
                    Err(e) => log::error!("Unable to render: {}", e),
                }
                state.ctx.window.request_redraw();
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(AppState {
            mut backend, driver, ..
        }) = self.state.take()
        {
            driver.teardown(&mut backend);
        }
    }
}

/// Open a window and render `description` until the window is closed.
pub fn run(description: SceneDescription) -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };

    let event_loop = EventLoop::new()?;
    let mut app = App::new(description);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
