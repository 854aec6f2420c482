use std::{ffi::CStr, os::raw::c_char};

use crate::log;

pub mod buffer;
pub mod context;
pub mod shader;
pub mod system;
pub mod texture;
pub mod vertex;

pub fn log_gl_info() {
    let gl_strings = [
        ("GL_VERSION", gl::VERSION),
        ("GL_VENDOR", gl::VENDOR),
        ("GLSL_VERSION", gl::SHADING_LANGUAGE_VERSION),
    ];

    for (label, name) in gl_strings {
        let value = unsafe { gl::GetString(name) };
        if value.is_null() {
            continue;
        }

        let value = unsafe { CStr::from_ptr(value as *const c_char) };
        log::info!(log::channel!("render"), "{label}: {}", value.to_string_lossy());
    }
}

pub fn gl_error_to_string(error: gl::types::GLenum) -> &'static str {
    match error {
        gl::NO_ERROR => "No error",
        gl::INVALID_ENUM => "Invalid enum",
        gl::INVALID_VALUE => "Invalid value",
        gl::INVALID_OPERATION => "Invalid operation",
        gl::STACK_OVERFLOW => "Stack overflow",
        gl::STACK_UNDERFLOW => "Stack underflow",
        gl::OUT_OF_MEMORY => "Out of memory",
        gl::INVALID_FRAMEBUFFER_OPERATION => "Invalid framebuffer operation",
        _ => "Unknown error",
    }
}

pub fn panic_if_gl_error() {
    let error_code = unsafe { gl::GetError() };
    if error_code != gl::NO_ERROR {
        panic!("OpenGL Error: {} (0x{:X})", gl_error_to_string(error_code), error_code);
    }
}
