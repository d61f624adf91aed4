//! Interactive Voronoi diagram viewer.
//!
//! Opens a fixed-size window and renders the diagram with a software
//! rasterizer. Hover a generator point to highlight it, drag it with the
//! primary mouse button to reshape the diagram, and click the secondary
//! button to toggle between Euclidean and Manhattan distance.
//!
//! All diagram logic lives in `voronoi-core`; this binary only owns the
//! event loop, the pixel surface, and the translation from platform events
//! to the core's pointer vocabulary.

use std::num::NonZeroU32;
use std::rc::Rc;

use anyhow::Context;
use clap::Parser;
use image::RgbImage;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use voronoi_core::{
    DiagramModel, DistanceMetric, Interaction, PointerButton, PointerEvent, RenderConfig, Renderer,
};

#[derive(Parser, Debug)]
#[command(name = "voronoi")]
#[command(about = "Interactive Voronoi diagram", long_about = None)]
struct Args {
    /// Number of generator points
    #[arg(long, default_value = "20")]
    points: usize,

    /// Window width in pixels
    #[arg(long, default_value = "800")]
    width: u32,

    /// Window height in pixels
    #[arg(long, default_value = "600")]
    height: u32,

    /// Random seed for point placement and colors
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Startup distance metric: euclidean | manhattan
    #[arg(long, default_value = "euclidean")]
    metric: DistanceMetric,

    /// Marker radius in pixels
    #[arg(long, default_value_t = voronoi_core::DRAW_RADIUS)]
    draw_radius: f64,

    /// Radius of the hovered/dragged marker, also the grab distance
    #[arg(long, default_value_t = voronoi_core::DRAG_RADIUS)]
    drag_radius: f64,

    /// Fraction of the surface (centered) that initial points occupy
    #[arg(long, default_value = "0.5")]
    spawn_fraction: f64,
}

/// Window-bound graphics state, created once the event loop is live.
struct Gfx {
    window: Rc<Window>,
    surface: softbuffer::Surface<Rc<Window>, Rc<Window>>,
    // the surface borrows nothing from the context at runtime, but the
    // display connection must stay open
    _context: softbuffer::Context<Rc<Window>>,
}

struct App {
    args: Args,
    model: DiagramModel,
    interaction: Interaction,
    renderer: Renderer,
    raster: RgbImage,
    gfx: Option<Gfx>,
}

impl App {
    /// Feed one pointer event through the interaction machine. Every
    /// command that mutates the model triggers exactly one redraw request;
    /// the platform coalesces them.
    fn pointer(&mut self, event: PointerEvent) {
        if let Some(command) = self.interaction.handle(&self.model, event) {
            tracing::debug!(?command, "applying");
            self.model.apply(command);
            if let Some(gfx) = &self.gfx {
                gfx.window.request_redraw();
            }
        }
    }

    /// Full recompute of the raster, then one blit to the display.
    fn redraw(&mut self) {
        let Some(gfx) = self.gfx.as_mut() else {
            return;
        };

        // the only render failure is an empty point set, which the model
        // invariants forbid; skip the frame rather than aborting
        if let Err(e) = self.renderer.render(&self.model, &mut self.raster) {
            tracing::error!("skipping frame: {e}");
            return;
        }

        let mut buffer = match gfx.surface.buffer_mut() {
            Ok(buffer) => buffer,
            Err(e) => {
                tracing::error!("failed to acquire frame buffer: {e}");
                return;
            }
        };
        for (dst, src) in buffer.iter_mut().zip(self.raster.as_raw().chunks_exact(3)) {
            *dst = u32::from(src[0]) << 16 | u32::from(src[1]) << 8 | u32::from(src[2]);
        }
        if let Err(e) = buffer.present() {
            tracing::error!("failed to present frame: {e}");
        }
    }

    /// The platform owns surface sizing; follow it with a matching surface
    /// resize and a recreated raster.
    fn resized(&mut self, size: PhysicalSize<u32>) {
        let Some(gfx) = self.gfx.as_mut() else {
            return;
        };
        let (Some(w), Some(h)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return;
        };
        if let Err(e) = gfx.surface.resize(w, h) {
            tracing::error!("failed to resize surface: {e}");
            return;
        }
        if self.raster.dimensions() != (size.width, size.height) {
            self.raster = RgbImage::new(size.width, size.height);
        }
        gfx.window.request_redraw();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gfx.is_some() {
            return;
        }
        match create_gfx(event_loop, self.args.width, self.args.height) {
            Ok(gfx) => {
                gfx.window.request_redraw();
                self.gfx = Some(gfx);
            }
            Err(e) => {
                tracing::error!("failed to create window: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => self.resized(size),
            WindowEvent::CursorMoved { position, .. } => self.pointer(PointerEvent::Moved {
                x: position.x,
                y: position.y,
            }),
            WindowEvent::MouseInput { state, button, .. } => {
                let Some(button) = map_button(button) else {
                    return;
                };
                self.pointer(match state {
                    ElementState::Pressed => PointerEvent::Pressed(button),
                    ElementState::Released => PointerEvent::Released(button),
                });
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }
}

fn map_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Right => Some(PointerButton::Secondary),
        _ => None,
    }
}

fn create_gfx(event_loop: &ActiveEventLoop, width: u32, height: u32) -> anyhow::Result<Gfx> {
    let attrs = Window::default_attributes()
        .with_title("Voronoi")
        .with_inner_size(PhysicalSize::new(width, height))
        .with_resizable(false);
    let window = Rc::new(
        event_loop
            .create_window(attrs)
            .context("failed to create window")?,
    );

    let context = softbuffer::Context::new(Rc::clone(&window))
        .map_err(|e| anyhow::anyhow!("failed to create graphics context: {e}"))?;
    let mut surface = softbuffer::Surface::new(&context, Rc::clone(&window))
        .map_err(|e| anyhow::anyhow!("failed to create surface: {e}"))?;

    let size = window.inner_size();
    surface
        .resize(
            NonZeroU32::new(size.width).unwrap_or(NonZeroU32::MIN),
            NonZeroU32::new(size.height).unwrap_or(NonZeroU32::MIN),
        )
        .map_err(|e| anyhow::anyhow!("failed to size surface: {e}"))?;

    Ok(Gfx {
        window,
        surface,
        _context: context,
    })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut model = DiagramModel::random(
        args.points,
        args.width as f64,
        args.height as f64,
        args.spawn_fraction,
        args.seed,
    );
    model.set_metric(args.metric);
    tracing::info!(
        points = args.points,
        seed = args.seed,
        metric = %args.metric,
        "initialized diagram"
    );

    let renderer = Renderer::new(RenderConfig {
        draw_radius: args.draw_radius,
        drag_radius: args.drag_radius,
        ..RenderConfig::default()
    });
    let interaction = Interaction::new(args.drag_radius);
    let raster = RgbImage::new(args.width, args.height);

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App {
        args,
        model,
        interaction,
        renderer,
        raster,
        gfx: None,
    };
    event_loop
        .run_app(&mut app)
        .context("event loop terminated with an error")?;
    Ok(())
}
