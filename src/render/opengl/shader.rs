use std::ptr;
use std::ffi::CString;
use paste::paste;

use crate::{
    log,
    utils::Vec2,
};

use super::{
    texture::TextureUnit
};

// ----------------------------------------------
// Constants
// ----------------------------------------------

pub const NULL_SHADER_HANDLE: gl::types::GLuint = 0;

// ----------------------------------------------
// ShaderVariable
// ----------------------------------------------

pub struct ShaderVariable {
    pub location: gl::types::GLint,
    pub program_handle: gl::types::GLuint, // ShaderProgram it belongs to.
    pub name: String,
}

impl ShaderVariable {
    pub fn is_valid(&self) -> bool {
        // For shader uniform variables the location can be zero.
        // Only negative values are invalid.
        self.location >= 0 && self.program_handle != NULL_SHADER_HANDLE
    }
}

// ----------------------------------------------
// ShaderVarTrait
// ----------------------------------------------

pub trait ShaderVarTrait {
    fn set_uniform(variable: &ShaderVariable, value: Self);
}

impl ShaderVarTrait for f32 {
    fn set_uniform(variable: &ShaderVariable, value: Self) {
        unsafe {
            gl::ProgramUniform1f(variable.program_handle, variable.location, value);
        }
    }
}

impl ShaderVarTrait for Vec2 {
    fn set_uniform(variable: &ShaderVariable, value: Self) {
        unsafe {
            gl::ProgramUniform2f(
                variable.program_handle,
                variable.location,
                value.x,
                value.y);
        }
    }
}

// Samplers are set to the texture unit they read from.
impl ShaderVarTrait for TextureUnit {
    fn set_uniform(variable: &ShaderVariable, value: Self) {
        unsafe {
            gl::ProgramUniform1i(
                variable.program_handle,
                variable.location,
                value.0 as gl::types::GLint);
        }
    }
}

// ----------------------------------------------
// ShaderProgram
// ----------------------------------------------

pub struct ShaderProgram {
    vertex_shader_handle: gl::types::GLuint,
    fragment_shader_handle: gl::types::GLuint,
    program_handle: gl::types::GLuint,
}

impl ShaderProgram {
    pub fn with_vs_fs_code(vertex_shader_code: &str, fragment_shader_code: &str) -> Result<Self, String> {
        // Construct first so that Drop cleans up whatever was created if a later stage fails.
        let mut program = Self {
            vertex_shader_handle: NULL_SHADER_HANDLE,
            fragment_shader_handle: NULL_SHADER_HANDLE,
            program_handle: NULL_SHADER_HANDLE,
        };

        program.vertex_shader_handle = Self::create_shader(gl::VERTEX_SHADER, vertex_shader_code)?;
        program.fragment_shader_handle = Self::create_shader(gl::FRAGMENT_SHADER, fragment_shader_code)?;
        program.program_handle = Self::create_program(program.vertex_shader_handle, program.fragment_shader_handle)?;

        Ok(program)
    }

    pub fn is_valid(&self) -> bool {
        self.program_handle != NULL_SHADER_HANDLE
    }

    pub fn handle(&self) -> gl::types::GLuint {
        self.program_handle
    }

    pub fn find_variable(&self, name: &str) -> Result<ShaderVariable, String> {
        debug_assert!(!name.is_empty());
        debug_assert!(self.is_valid());

        // Marshall to null terminated C string:
        let c_str_name = CString::new(name.as_bytes())
            .map_err(|err| format!("Invalid shader variable name '{name}': {err}"))?;

        let location = unsafe { gl::GetUniformLocation(self.program_handle, c_str_name.as_ptr()) };

        if location < 0 {
            Err(format!("Cannot find shader variable '{name}'"))
        } else {
            Ok(ShaderVariable {
                location,
                program_handle: self.program_handle,
                name: name.to_string(),
            })
        }
    }

    pub fn set_variable<T: ShaderVarTrait>(&self, variable: &ShaderVariable, value: T) -> &Self {
        debug_assert!(variable.is_valid());
        debug_assert!(self.program_handle == variable.program_handle,
                      "Shader variable '{}' does not belong to this ShaderProgram!", variable.name);

        T::set_uniform(variable, value);
        self
    }

    fn create_shader(shader_type: gl::types::GLenum,
                     shader_code: &str) -> Result<gl::types::GLuint, String> {

        debug_assert!(!shader_code.is_empty());

        let shader_stage_prefix = match shader_type {
            gl::VERTEX_SHADER => "[VS]: ",
            gl::FRAGMENT_SHADER => "[FS]: ",
            _ => "[??]: ",
        };

        // Marshall to null terminated C string:
        let c_str_code = CString::new(shader_code.as_bytes())
            .map_err(|err| format!("{shader_stage_prefix}Invalid shader source: {err}"))?;

        unsafe {
            let shader_handle = gl::CreateShader(shader_type);
            if shader_handle == NULL_SHADER_HANDLE {
                return Err(format!("{shader_stage_prefix}gl::CreateShader() failed"));
            }

            gl::ShaderSource(shader_handle, 1, &c_str_code.as_ptr(), ptr::null());
            gl::CompileShader(shader_handle);

            // Check for shader compile errors:
            let mut success = gl::FALSE as gl::types::GLint;
            gl::GetShaderiv(shader_handle, gl::COMPILE_STATUS, &mut success);

            if success != gl::TRUE as gl::types::GLint {
                let mut log_length: gl::types::GLint = 0;
                gl::GetShaderiv(shader_handle, gl::INFO_LOG_LENGTH, &mut log_length);

                let mut info_log = vec![0u8; log_length.max(1) as usize];
                gl::GetShaderInfoLog(
                    shader_handle,
                    info_log.len() as gl::types::GLsizei,
                    ptr::null_mut(),
                    info_log.as_mut_ptr() as *mut gl::types::GLchar);

                gl::DeleteShader(shader_handle);
                return Err(shader_stage_prefix.to_string() + &info_log_to_string(&info_log));
            }

            Ok(shader_handle)
        }
    }

    fn create_program(vertex_shader_handle: gl::types::GLuint,
                      fragment_shader_handle: gl::types::GLuint) -> Result<gl::types::GLuint, String> {

        debug_assert!(vertex_shader_handle != NULL_SHADER_HANDLE);
        debug_assert!(fragment_shader_handle != NULL_SHADER_HANDLE);

        unsafe {
            let program_handle = gl::CreateProgram();
            if program_handle == NULL_SHADER_HANDLE {
                return Err("gl::CreateProgram() failed".to_string());
            }

            gl::AttachShader(program_handle, vertex_shader_handle);
            gl::AttachShader(program_handle, fragment_shader_handle);
            gl::LinkProgram(program_handle);

            // Check for linking errors:
            let mut success = gl::FALSE as gl::types::GLint;
            gl::GetProgramiv(program_handle, gl::LINK_STATUS, &mut success);

            if success != gl::TRUE as gl::types::GLint {
                let mut log_length: gl::types::GLint = 0;
                gl::GetProgramiv(program_handle, gl::INFO_LOG_LENGTH, &mut log_length);

                let mut info_log = vec![0u8; log_length.max(1) as usize];
                gl::GetProgramInfoLog(
                    program_handle,
                    info_log.len() as gl::types::GLsizei,
                    ptr::null_mut(),
                    info_log.as_mut_ptr() as *mut gl::types::GLchar);

                gl::DeleteProgram(program_handle);
                return Err(info_log_to_string(&info_log));
            }

            // Bind the program to force OpenGL to fully initialize it now,
            // in case the driver is deferring initialization to first use.
            gl::UseProgram(program_handle);
            gl::UseProgram(NULL_SHADER_HANDLE);

            Ok(program_handle)
        }
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        if self.vertex_shader_handle != NULL_SHADER_HANDLE {
            unsafe {
                gl::DeleteShader(self.vertex_shader_handle);
            }
            self.vertex_shader_handle = NULL_SHADER_HANDLE;
        }
        if self.fragment_shader_handle != NULL_SHADER_HANDLE {
            unsafe {
                gl::DeleteShader(self.fragment_shader_handle);
            }
            self.fragment_shader_handle = NULL_SHADER_HANDLE;
        }
        if self.program_handle != NULL_SHADER_HANDLE {
            unsafe {
                gl::DeleteProgram(self.program_handle);
            }
            self.program_handle = NULL_SHADER_HANDLE;
        }
    }
}

// ----------------------------------------------
// Helper functions & macros
// ----------------------------------------------

// Info logs are null terminated C strings.
fn info_log_to_string(info_log: &[u8]) -> String {
    let end = info_log.iter().position(|&c| c == 0).unwrap_or(info_log.len());
    String::from_utf8_lossy(&info_log[..end]).into_owned()
}

pub fn new_program_from_code(vs_code: &str, fs_code: &str) -> Result<ShaderProgram, String> {
    ShaderProgram::with_vs_fs_code(vs_code, fs_code).map_err(|info_log| {
        log::error!(log::channel!("render"), "Shader Compilation Error: {info_log}");
        info_log
    })
}

#[macro_export]
macro_rules! shader {
    (
        $mod_name:ident,
        $($field:ident : $field_type:ty),* $(,)?
    ) => {
        pub mod $mod_name {
            use super::*;

            pub struct Vars {
                $(
                    pub $field: ShaderVariable,
                )*
            }

            pub struct Shader {
                pub variables: Vars,
                pub program: ShaderProgram,
            }

            impl Shader {
                pub fn load() -> Result<Self, String> {
                    const VS_SRC: &str = include_str!(
                        concat!("shaders/", stringify!($mod_name), ".vert")
                    );
                    const FS_SRC: &str = include_str!(
                        concat!("shaders/", stringify!($mod_name), ".frag")
                    );

                    let program = new_program_from_code(VS_SRC, FS_SRC)?;
                    Ok(Self {
                        variables: Vars {
                            $(
                                $field: program.find_variable($crate::name_of!(Vars, $field))?,
                            )*
                        },
                        program,
                    })
                }
                // Generate strongly-typed setters for each shader uniform variable.
                // This uses the `paste` Rust crate to generate each set_varname() method.
                paste! {
                    $(
                        pub fn [<set_ $field>](&self, value: $field_type) {
                            self.program.set_variable(&self.variables.$field, value);
                        }
                    )*
                }
            }
        }
    };
}

// ----------------------------------------------
// Built-in shaders
// ----------------------------------------------

// Heightmap panned by `map_offset`, trail sprite rotated by `rotation_angle`.
shader!(
    minimap,
    // Uniform variables:
    map_offset : Vec2,
    rotation_angle : f32,
    overlay_alpha : f32,
    map_texture : TextureUnit,
    trail_texture : TextureUnit,
);
