use std::sync::Arc;
use winit::error::OsError;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Fullscreen, Window, WindowAttributes};

pub struct PlatformConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
}

pub fn create_window(
    event_loop: &ActiveEventLoop,
    config: &PlatformConfig,
) -> Result<Arc<Window>, OsError> {
    let attrs = WindowAttributes::default()
        .with_title(&config.title)
        .with_resizable(true)
        .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height))
        .with_fullscreen(config.fullscreen.then_some(Fullscreen::Borderless(None)));

    let window = event_loop.create_window(attrs)?;
    Ok(Arc::new(window))
}

/// Flip between borderless fullscreen and windowed mode.
pub fn toggle_fullscreen(window: &Window) {
    let next = toggled(window.fullscreen());
    if next.is_some() {
        log::info!("Entering fullscreen");
    } else {
        log::info!("Leaving fullscreen");
    }
    window.set_fullscreen(next);
}

fn toggled(current: Option<Fullscreen>) -> Option<Fullscreen> {
    match current {
        Some(_) => None,
        None => Some(Fullscreen::Borderless(None)),
    }
}
