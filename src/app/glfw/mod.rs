use glfw::Context;

use crate::{
    log,
    app::{Application, ApplicationEvent, ApplicationEventList},
    utils::Size,
};

// These will be exposed as public types in the app module
// so we don't have to replicate all the GLFW enums.
pub type InputModifiers = glfw::Modifiers;
pub type InputAction = glfw::Action;
pub type InputKey = glfw::Key;

pub struct GlfwApplication {
    window_size: Size,
    should_quit: bool,
    glfw_instance: glfw::Glfw,
    window: glfw::PWindow,
    event_receiver: glfw::GlfwReceiver<(f64, glfw::WindowEvent)>,
}

impl GlfwApplication {
    pub fn new(title: String, window_size: Size) -> Result<Self, String> {
        debug_assert!(window_size.is_valid());

        let mut glfw_instance = glfw::init(glfw::fail_on_errors)
            .map_err(|err| format!("Failed to initialize GLFW: {err:?}"))?;

        glfw_instance.window_hint(glfw::WindowHint::ContextVersion(3, 3));
        glfw_instance.window_hint(glfw::WindowHint::OpenGlForwardCompat(true));
        glfw_instance.window_hint(glfw::WindowHint::OpenGlProfile(glfw::OpenGlProfileHint::Core));

        let (mut window, event_receiver) = glfw_instance
            .create_window(window_size.width as u32,
                           window_size.height as u32,
                           title.as_str(),
                           glfw::WindowMode::Windowed)
            .ok_or_else(|| "Failed to create GLFW window!".to_string())?;

        window.make_current();
        glfw_instance.set_swap_interval(glfw::SwapInterval::Sync(1));

        // Listen to these application events:
        window.set_size_polling(true);
        window.set_close_polling(true);
        window.set_key_polling(true);

        gl::load_with(|symbol| window.get_proc_address(symbol) as *const _);

        Ok(GlfwApplication {
            window_size,
            should_quit: false,
            glfw_instance,
            window,
            event_receiver,
        })
    }
}

impl Application for GlfwApplication {
    fn should_quit(&self) -> bool {
        self.should_quit || self.window.should_close()
    }

    fn request_quit(&mut self) {
        self.window.set_should_close(true);
        self.should_quit = true;
    }

    fn poll_events(&mut self) -> ApplicationEventList {
        self.glfw_instance.poll_events();

        let mut translated_events = ApplicationEventList::new();

        for (_, event) in glfw::flush_messages(&self.event_receiver) {
            // NOTE: To receive events here we must call set_<event>_polling().
            // See set_size_polling/set_close_polling calls above.
            let translated = match event {
                glfw::WindowEvent::Size(width, height) => {
                    self.window_size = Size::new(width, height);
                    ApplicationEvent::WindowResize(self.window_size)
                }
                glfw::WindowEvent::Close => {
                    ApplicationEvent::Quit
                }
                glfw::WindowEvent::Key(key, _scan_code, action, modifiers) => {
                    ApplicationEvent::KeyInput(key, action, modifiers)
                }
                unhandled_event => {
                    log::verbose!(log::channel!("viewer"), "Unhandled GLFW window event: {unhandled_event:?}");
                    continue;
                }
            };

            if translated_events.try_push(translated).is_err() {
                log::warn!(log::channel!("viewer"), "Dropping window events, more than {} in one frame.",
                           translated_events.capacity());
                break;
            }
        }

        translated_events
    }

    fn present(&mut self) {
        self.window.swap_buffers();
    }

    fn window_size(&self) -> Size {
        self.window_size
    }

    fn framebuffer_size(&self) -> Size {
        let (width, height) = self.window.get_framebuffer_size();
        Size::new(width, height)
    }

    fn time(&self) -> f64 {
        self.glfw_instance.get_time()
    }
}
