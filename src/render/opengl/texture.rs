use std::ffi::c_void;
use slab::Slab;

use crate::{
    log,
    render::{
        self,
        NativeTextureHandle,
        TextureFilter,
        TextureHandle,
        TextureLoaderFlags,
        TextureSettings,
        TextureWrapMode,
    },
    utils::Size,
};

use super::gl_error_to_string;

// ----------------------------------------------
// Constants
// ----------------------------------------------

pub const NULL_TEXTURE_HANDLE: gl::types::GLuint = 0;

// ----------------------------------------------
// TextureUnit
// ----------------------------------------------

pub const MAX_TEXTURE_UNITS: usize = 4;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TextureUnit(pub u32);

// ----------------------------------------------
// Texture Sampling
// ----------------------------------------------

fn gl_filter(filter: TextureFilter, has_mipmaps: bool) -> (gl::types::GLenum, gl::types::GLenum) {
    // (min, mag)
    match (filter, has_mipmaps) {
        (TextureFilter::Nearest, false) => (gl::NEAREST, gl::NEAREST),
        (TextureFilter::Linear,  false) => (gl::LINEAR, gl::LINEAR),
        (TextureFilter::Nearest, true)  => (gl::NEAREST_MIPMAP_NEAREST, gl::NEAREST),
        (TextureFilter::Linear,  true)  => (gl::LINEAR_MIPMAP_LINEAR, gl::LINEAR),
    }
}

fn gl_wrap_mode(wrap_mode: TextureWrapMode) -> gl::types::GLenum {
    match wrap_mode {
        TextureWrapMode::Repeat => gl::REPEAT,
        TextureWrapMode::ClampToEdge => gl::CLAMP_TO_EDGE,
    }
}

// ----------------------------------------------
// Texture2D
// ----------------------------------------------

pub struct Texture2D {
    handle: gl::types::GLuint,
    size: Size,
    name: String,
}

impl Texture2D {
    pub fn from_file(file_path: &str,
                     flags: TextureLoaderFlags,
                     settings: TextureSettings) -> Result<Self, String> {

        debug_assert!(!file_path.is_empty());

        let mut image = image::open(file_path)
            .map_err(|err| format!("Failed to load image file '{file_path}': {err}"))?;

        if flags.contains(TextureLoaderFlags::FlipV) {
            image.apply_orientation(image::metadata::Orientation::FlipVertical);
        }

        if flags.contains(TextureLoaderFlags::FlipH) {
            image.apply_orientation(image::metadata::Orientation::FlipHorizontal);
        }

        let image_buffer = image.to_rgba8();
        let size = Size::new(image_buffer.width() as i32, image_buffer.height() as i32);
        if !size.is_valid() {
            return Err(format!("Image file '{file_path}' is empty"));
        }

        Ok(Self::with_pixels(image_buffer.as_raw(), size, settings, file_path))
    }

    // `pixels` are tightly packed RGBA8.
    pub fn with_pixels(pixels: &[u8],
                       size: Size,
                       settings: TextureSettings,
                       debug_name: &str) -> Self {

        debug_assert!(size.is_valid());
        debug_assert!(pixels.len() == (size.area() as usize) * 4,
                      "Texture '{debug_name}': expected {} bytes, got {}", size.area() * 4, pixels.len());

        let handle = unsafe {
            let mut handle = NULL_TEXTURE_HANDLE;
            gl::GenTextures(1, &mut handle);
            if handle == NULL_TEXTURE_HANDLE {
                panic!("Failed to create texture handle!");
            }

            gl::ActiveTexture(gl::TEXTURE0);
            gl::BindTexture(gl::TEXTURE_2D, handle);

            // Rows of 256 RGBA pixels are always 4-byte aligned, but
            // arbitrary images loaded from disk may not be.
            gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);

            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                gl::RGBA as gl::types::GLint, // Only RGBA images supported for now.
                size.width as gl::types::GLsizei,
                size.height as gl::types::GLsizei,
                0,
                gl::RGBA,
                gl::UNSIGNED_BYTE,
                pixels.as_ptr() as *const c_void);

            if settings.gen_mipmaps {
                gl::GenerateMipmap(gl::TEXTURE_2D);

                let error_code = gl::GetError();
                if error_code != gl::NO_ERROR {
                    panic!("Failed to generate texture mipmaps. OpenGL Error: {} (0x{:X})",
                           gl_error_to_string(error_code),
                           error_code);
                }
            }

            let (gl_min_filter, gl_mag_filter) = gl_filter(settings.filter, settings.gen_mipmaps);

            gl::TexParameteri(
                gl::TEXTURE_2D,
                gl::TEXTURE_MIN_FILTER,
                gl_min_filter as gl::types::GLint);
            gl::TexParameteri(
                gl::TEXTURE_2D,
                gl::TEXTURE_MAG_FILTER,
                gl_mag_filter as gl::types::GLint);

            let wrap_mode = gl_wrap_mode(settings.wrap_mode) as gl::types::GLint;
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, wrap_mode);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, wrap_mode);

            // Unbind.
            gl::BindTexture(gl::TEXTURE_2D, NULL_TEXTURE_HANDLE);

            handle
        };

        log::verbose!(log::channel!("render"),
                      "Created texture '{debug_name}' ({size}, {}, {})",
                      settings.filter, settings.wrap_mode);

        Self {
            handle,
            size,
            name: debug_name.to_string(),
        }
    }

    pub fn handle(&self) -> gl::types::GLuint {
        self.handle
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for Texture2D {
    fn drop(&mut self) {
        if self.handle != NULL_TEXTURE_HANDLE {
            unsafe {
                gl::DeleteTextures(1, &self.handle);
            }
            self.handle = NULL_TEXTURE_HANDLE;
        }
    }
}

// ----------------------------------------------
// TextureCache
// ----------------------------------------------

pub struct TextureCache {
    textures: Slab<Texture2D>,
}

impl TextureCache {
    pub fn new(initial_capacity: usize) -> Self {
        Self {
            textures: Slab::with_capacity(initial_capacity),
        }
    }

    pub fn handle_to_texture(&self, handle: TextureHandle) -> Option<&Texture2D> {
        match handle {
            TextureHandle::Index(index) => self.textures.get(index as usize),
            TextureHandle::Invalid => None,
        }
    }

    fn add_texture(&mut self, texture: Texture2D) -> TextureHandle {
        let index = self.textures.insert(texture);
        TextureHandle::Index(index as u32)
    }
}

impl render::TextureCache for TextureCache {
    fn load_texture(&mut self,
                    file_path: &str,
                    flags: TextureLoaderFlags,
                    settings: TextureSettings) -> Result<TextureHandle, String> {

        match Texture2D::from_file(file_path, flags, settings) {
            Ok(texture) => Ok(self.add_texture(texture)),
            Err(err) => {
                log::error!(log::channel!("render"), "TextureCache: {err}");
                Err(err)
            }
        }
    }

    fn new_texture_with_pixels(&mut self,
                               debug_name: &str,
                               size: Size,
                               pixels: &[u8],
                               settings: TextureSettings) -> TextureHandle {

        let texture = Texture2D::with_pixels(pixels, size, settings, debug_name);
        self.add_texture(texture)
    }

    fn release_texture(&mut self, handle: &mut TextureHandle) {
        if let TextureHandle::Index(index) = *handle {
            // Dropping the Texture2D deletes the GL texture.
            if let Some(texture) = self.textures.try_remove(index as usize) {
                log::verbose!(log::channel!("render"), "Released texture '{}' ({})", texture.name(), texture.size());
            }
        }
        *handle = TextureHandle::invalid();
    }

    fn to_native_handle(&self, handle: TextureHandle) -> NativeTextureHandle {
        let bits = self.handle_to_texture(handle)
            .map_or(NULL_TEXTURE_HANDLE, |texture| texture.handle());
        NativeTextureHandle { bits: bits as usize }
    }
}
