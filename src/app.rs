use std::sync::Arc;

use log::{debug, error, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::KeyCode;
use winit::window::{Window, WindowAttributes, WindowId};

use crate::config::AppConfig;
use crate::error::{GardenError, Result};
use crate::gpu::GpuContext;
use crate::input::Input;
use crate::renderer::Renderer;
use crate::scene::SceneComposer;
use crate::viewport::ViewportState;

/// Open the garden window and run until it is closed.
///
/// Fonts are loaded and the first scene is built as soon as the window
/// exists. Resizing regrows the garden, `R` regrows it at the current size,
/// and `Escape` quits.
///
/// # Example
/// ```ignore
/// garden::run(AppConfig::new().title("Garden").size(1280, 720))?;
/// ```
pub fn run(config: AppConfig) -> Result<()> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let rng = match config.seed {
        Some(seed) => {
            info!("seeding layout with {seed}");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };
    let composer = SceneComposer::new(config.scene.clone(), config.fonts.clone(), rng);

    let mut app = GardenApp {
        state: AppState::Pending {
            config,
            composer: Some(composer),
        },
        error: None,
    };
    event_loop.run_app(&mut app)?;

    match app.error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct GardenApp {
    state: AppState,
    /// First fatal error; ends the event loop.
    error: Option<GardenError>,
}

enum AppState {
    Pending {
        config: AppConfig,
        composer: Option<SceneComposer<StdRng>>,
    },
    Running {
        window: Arc<Window>,
        gpu: GpuContext,
        renderer: Renderer,
        composer: SceneComposer<StdRng>,
        input: Input,
    },
}

impl GardenApp {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: GardenError) {
        error!("{err}");
        self.error.get_or_insert(err);
        event_loop.exit();
    }
}

/// Window, GPU and renderer creation followed by font loading and the first
/// scene build.
fn start(
    event_loop: &ActiveEventLoop,
    config: &AppConfig,
    mut composer: SceneComposer<StdRng>,
) -> Result<AppState> {
    let window_attrs = WindowAttributes::default()
        .with_title(&config.title)
        .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));
    let window = Arc::new(event_loop.create_window(window_attrs)?);

    let gpu = GpuContext::new(window.clone())?;
    let viewport = ViewportState::new(gpu.width() as f32, gpu.height() as f32).ok_or(
        GardenError::InvalidConfig {
            key: "size",
            value: format!("{}x{}", gpu.width(), gpu.height()),
        },
    )?;

    let mut renderer = Renderer::new(&gpu, viewport);
    composer.initialize(renderer.assets_mut(), viewport)?;
    window.request_redraw();

    Ok(AppState::Running {
        window,
        gpu,
        renderer,
        composer,
        input: Input::new(),
    })
}

/// Keyboard commands the garden responds to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Shortcut {
    Quit,
    Regrow,
}

/// The command for this frame's key presses. Quitting wins over regrowing.
fn shortcut(input: &Input) -> Option<Shortcut> {
    if input.key_pressed(KeyCode::Escape) {
        Some(Shortcut::Quit)
    } else if input.key_pressed(KeyCode::KeyR) {
        Some(Shortcut::Regrow)
    } else {
        None
    }
}

impl ApplicationHandler for GardenApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let AppState::Pending { config, composer } = &mut self.state else {
            return;
        };
        let Some(composer) = composer.take() else {
            return;
        };

        match start(event_loop, config, composer) {
            Ok(running) => self.state = running,
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let AppState::Running {
            window,
            gpu,
            renderer,
            composer,
            input,
        } = &mut self.state
        else {
            return;
        };

        input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                let Some(viewport) = ViewportState::from_physical(size) else {
                    debug!("ignoring zero-sized resize");
                    return;
                };
                gpu.resize(size.width, size.height);
                renderer.resize(gpu, viewport);
                if let Err(err) = composer.on_viewport_resize(viewport) {
                    warn!("resize before the scene was ready: {err}");
                }
            }
            WindowEvent::RedrawRequested => {
                match shortcut(input) {
                    Some(Shortcut::Quit) => {
                        event_loop.exit();
                        return;
                    }
                    Some(Shortcut::Regrow) => {
                        info!("regrowing the garden");
                        if let Err(err) = composer.regenerate() {
                            warn!("cannot regrow: {err}");
                        }
                    }
                    None => {}
                }

                match renderer.render(gpu, input, |canvas| composer.render_frame(canvas)) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        warn!("surface lost or outdated, reconfiguring");
                        gpu.reconfigure();
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        error!("GPU out of memory");
                        event_loop.exit();
                        return;
                    }
                    Err(err) => warn!("frame skipped: {err}"),
                }

                input.begin_frame();
                window.request_redraw();
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::event::ElementState;

    #[test]
    fn no_keys_no_shortcut() {
        assert_eq!(shortcut(&Input::new()), None);
    }

    #[test]
    fn r_regrows_once_per_press() {
        let mut input = Input::new();
        input.key(KeyCode::KeyR, ElementState::Pressed);
        assert_eq!(shortcut(&input), Some(Shortcut::Regrow));

        // Held across frames: no second regrow until released.
        input.begin_frame();
        input.key(KeyCode::KeyR, ElementState::Pressed);
        assert_eq!(shortcut(&input), None);
    }

    #[test]
    fn escape_beats_regrow() {
        let mut input = Input::new();
        input.key(KeyCode::KeyR, ElementState::Pressed);
        input.key(KeyCode::Escape, ElementState::Pressed);
        assert_eq!(shortcut(&input), Some(Shortcut::Quit));
    }
}
