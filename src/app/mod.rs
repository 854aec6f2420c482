use arrayvec::ArrayVec;

use crate::utils::Size;

pub mod input;
use input::{InputAction, InputKey, InputModifiers};

// Internal implementation.
mod glfw;
use glfw::GlfwApplication;

// ----------------------------------------------
// Application
// ----------------------------------------------

pub trait Application {
    fn should_quit(&self) -> bool;
    fn request_quit(&mut self);

    fn poll_events(&mut self) -> ApplicationEventList;
    fn present(&mut self);

    fn window_size(&self) -> Size;
    fn framebuffer_size(&self) -> Size;

    // Seconds since the application started.
    fn time(&self) -> f64;
}

// ----------------------------------------------
// ApplicationEvent
// ----------------------------------------------

#[derive(Debug)]
pub enum ApplicationEvent {
    Quit,
    WindowResize(Size),
    KeyInput(InputKey, InputAction, InputModifiers),
}

pub const MAX_EVENTS_PER_POLL: usize = 32;
pub type ApplicationEventList = ArrayVec<ApplicationEvent, MAX_EVENTS_PER_POLL>;

// ----------------------------------------------
// ApplicationBuilder
// ----------------------------------------------

pub struct ApplicationBuilder {
    title: String,
    window_size: Size,
}

impl ApplicationBuilder {
    pub fn new() -> Self {
        ApplicationBuilder {
            title: String::default(),
            window_size: Size::new(1024, 768),
        }
    }

    pub fn window_title(&mut self, title: &str) -> &mut Self {
        self.title = title.to_string();
        self
    }

    pub fn window_size(&mut self, size: Size) -> &mut Self {
        self.window_size = size;
        self
    }

    // Opens the window and makes its GL 3.3 core context current.
    pub fn build(&self) -> Result<impl Application + use<>, String> {
        GlfwApplication::new(self.title.clone(), self.window_size)
    }
}
