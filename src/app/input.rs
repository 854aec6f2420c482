// Expose them here so we don't have to duplicate these enums.
pub use super::glfw::InputModifiers;
pub use super::glfw::InputAction;
pub use super::glfw::InputKey;
