use std::ffi::c_void;

use crate::utils::{Color, Size};

use super::{
    log_gl_info,
    panic_if_gl_error,
    shader::{ShaderProgram, NULL_SHADER_HANDLE},
    texture::{TextureUnit, MAX_TEXTURE_UNITS, NULL_TEXTURE_HANDLE},
    buffer::{IndexType, VertexArray, NULL_VERTEX_ARRAY_HANDLE},
};

// ----------------------------------------------
// Constants
// ----------------------------------------------

#[repr(u32)]
#[derive(Copy, Clone)]
pub enum AlphaBlend {
    Enabled,
    Disabled,
}

#[repr(u32)]
#[derive(Copy, Clone)]
pub enum DepthTest {
    Enabled,
    Disabled,
}

#[repr(u32)]
#[derive(Copy, Clone)]
pub enum BackFaceCulling {
    Enabled,
    Disabled,
}

// ----------------------------------------------
// RenderContext
// ----------------------------------------------

// Tracks bound GL objects to skip redundant state changes.
pub struct RenderContext {
    clear_color: Color,
    current_shader_program: gl::types::GLuint,
    current_vertex_array: gl::types::GLuint,
    current_index_type: Option<IndexType>,
    current_texture2d: [gl::types::GLuint; MAX_TEXTURE_UNITS],
    texture_changes_count: u32,
    draw_calls_count: u32,
}

impl RenderContext {
    pub fn new() -> Self {
        log_gl_info();

        Self {
            clear_color: Color::black(),
            current_shader_program: NULL_SHADER_HANDLE,
            current_vertex_array: NULL_VERTEX_ARRAY_HANDLE,
            current_index_type: None,
            current_texture2d: [NULL_TEXTURE_HANDLE; MAX_TEXTURE_UNITS],
            texture_changes_count: 0,
            draw_calls_count: 0,
        }
    }

    pub fn set_clear_color(&mut self, color: Color) -> &mut Self {
        self.clear_color = color;
        self
    }

    pub fn set_alpha_blend(&mut self, alpha_blend: AlphaBlend) -> &mut Self {
        match alpha_blend {
            AlphaBlend::Enabled => unsafe {
                gl::Enable(gl::BLEND);
                gl::BlendFunc(gl::SRC_ALPHA, gl::ONE_MINUS_SRC_ALPHA);
            },
            AlphaBlend::Disabled => unsafe {
                gl::Disable(gl::BLEND);
            },
        }
        self
    }

    pub fn set_depth_test(&mut self, depth_test: DepthTest) -> &mut Self {
        match depth_test {
            DepthTest::Enabled => unsafe {
                gl::Enable(gl::DEPTH_TEST);
                gl::DepthFunc(gl::LESS); // The default.
            },
            DepthTest::Disabled => unsafe {
                gl::Disable(gl::DEPTH_TEST);
            },
        }
        self
    }

    pub fn set_backface_culling(&mut self, backface_culling: BackFaceCulling) -> &mut Self {
        match backface_culling {
            BackFaceCulling::Enabled => unsafe {
                gl::Enable(gl::CULL_FACE);
                gl::CullFace(gl::BACK);
            },
            BackFaceCulling::Disabled => unsafe {
                gl::Disable(gl::CULL_FACE);
            },
        }
        self
    }

    pub fn set_viewport(&mut self, size: Size) -> &mut Self {
        debug_assert!(size.is_valid());
        unsafe {
            gl::Viewport(0, 0, size.width, size.height);
        }
        self
    }

    // Takes a raw GL texture name so that textures owned by
    // the host application can be bound alongside our own.
    pub fn set_texture_2d(&mut self, tex_handle: gl::types::GLuint, tex_unit: TextureUnit) -> &mut Self {
        let unit = tex_unit.0 as usize;
        debug_assert!(unit < MAX_TEXTURE_UNITS);

        if self.current_texture2d[unit] != tex_handle {
            self.current_texture2d[unit] = tex_handle;
            self.texture_changes_count += 1;

            unsafe {
                gl::ActiveTexture(gl::TEXTURE0 + tex_unit.0);
                gl::BindTexture(gl::TEXTURE_2D, tex_handle);
            }
        }
        self
    }

    // Unbinds every texture unit and leaves unit 0 active.
    pub fn unset_all_textures(&mut self) {
        unsafe {
            for unit in (0..MAX_TEXTURE_UNITS).rev() {
                gl::ActiveTexture(gl::TEXTURE0 + (unit as gl::types::GLenum));
                gl::BindTexture(gl::TEXTURE_2D, NULL_TEXTURE_HANDLE);
            }
        }
        self.current_texture2d = [NULL_TEXTURE_HANDLE; MAX_TEXTURE_UNITS];
    }

    pub fn set_shader_program(&mut self, shader_program: &ShaderProgram) -> &mut Self {
        debug_assert!(shader_program.is_valid());

        let shader_program_handle = shader_program.handle();

        if self.current_shader_program != shader_program_handle {
            self.current_shader_program = shader_program_handle;

            unsafe {
                gl::UseProgram(self.current_shader_program);
            }
        }
        self
    }

    pub fn unset_shader_program(&mut self) {
        unsafe {
            gl::UseProgram(NULL_SHADER_HANDLE);
        }
        self.current_shader_program = NULL_SHADER_HANDLE;
    }

    pub fn set_vertex_array(&mut self, vertex_array: &VertexArray) -> &mut Self {
        debug_assert!(vertex_array.is_valid());

        let vertex_array_handle = vertex_array.handle();

        if self.current_vertex_array != vertex_array_handle {
            self.current_vertex_array = vertex_array_handle;
            self.current_index_type = Some(vertex_array.index_type());

            unsafe {
                gl::BindVertexArray(self.current_vertex_array);
            }
        }
        self
    }

    pub fn unset_vertex_array(&mut self) {
        unsafe {
            gl::BindVertexArray(NULL_VERTEX_ARRAY_HANDLE);
        }
        self.current_vertex_array = NULL_VERTEX_ARRAY_HANDLE;
        self.current_index_type = None;
    }

    pub fn draw_indexed(&mut self, first_index: u32, index_count: u32) {
        debug_assert!(index_count != 0);
        debug_assert!(self.current_shader_program != NULL_SHADER_HANDLE);
        debug_assert!(self.current_vertex_array != NULL_VERTEX_ARRAY_HANDLE);

        let Some(index_type) = self.current_index_type else {
            return;
        };

        let offset_in_bytes = (first_index as usize) * index_type.size_in_bytes();

        unsafe {
            gl::DrawElements(
                gl::TRIANGLES,
                index_count as gl::types::GLsizei,
                index_type.to_gl_enum(),
                offset_in_bytes as *const c_void);
        }

        self.draw_calls_count += 1;
    }

    // Sets and draws the whole VertexArray.
    pub fn draw_vertex_array(&mut self, vertex_array: &VertexArray) {
        self.set_vertex_array(vertex_array);
        self.draw_indexed(0, vertex_array.index_count());
        self.unset_vertex_array();
    }

    pub fn begin_frame(&mut self) {
        self.texture_changes_count = 0;
        self.draw_calls_count = 0;

        unsafe {
            gl::ClearColor(self.clear_color.r,
                           self.clear_color.g,
                           self.clear_color.b,
                           self.clear_color.a);

            gl::Clear(gl::COLOR_BUFFER_BIT);
        }
    }

    pub fn end_frame(&mut self) {
        self.unset_shader_program();
        self.unset_vertex_array();
        self.unset_all_textures();

        panic_if_gl_error();
    }

    pub fn texture_changes(&self) -> u32 {
        self.texture_changes_count
    }

    pub fn draw_calls(&self) -> u32 {
        self.draw_calls_count
    }
}
