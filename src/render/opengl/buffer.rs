use std::mem;
use std::ffi::c_void;

// ----------------------------------------------
// Constants
// ----------------------------------------------

pub const NULL_BUFFER_HANDLE: gl::types::GLuint = 0;
pub const NULL_VERTEX_ARRAY_HANDLE: gl::types::GLuint = 0;

#[repr(u32)]
#[derive(Copy, Clone)]
pub enum BufferUsageHint {
    StaticDraw = gl::STATIC_DRAW, // The user will set the data once.
}

// ----------------------------------------------
// VertexBuffer
// ----------------------------------------------

pub struct VertexBuffer {
    handle: gl::types::GLuint,
    count: u32,
}

impl VertexBuffer {
    pub fn with_data<T>(vertices: &[T], usage_hint: BufferUsageHint) -> Self {
        debug_assert!(!vertices.is_empty());

        let count  = vertices.len() as u32;
        let stride = mem::size_of::<T>() as u32;
        let handle = create_gl_buffer(gl::ARRAY_BUFFER,
                                      vertices.as_ptr() as *const c_void,
                                      (count * stride) as usize,
                                      usage_hint);
        Self { handle, count }
    }

    pub fn is_valid(&self) -> bool {
        self.handle != NULL_BUFFER_HANDLE
    }

}

impl Drop for VertexBuffer {
    fn drop(&mut self) {
        if self.handle != NULL_BUFFER_HANDLE {
            unsafe {
                gl::DeleteBuffers(1, &self.handle);
            }
            self.handle = NULL_BUFFER_HANDLE;
        }
    }
}

// ----------------------------------------------
// IndexType
// ----------------------------------------------

#[repr(u32)]
#[derive(Copy, Clone)]
pub enum IndexType {
    U16,
    U32,
}

impl IndexType {
    pub fn size_in_bytes(&self) -> usize {
        match self {
            IndexType::U16 => mem::size_of::<u16>(),
            IndexType::U32 => mem::size_of::<u32>(),
        }
    }

    pub fn to_gl_enum(&self) -> gl::types::GLenum {
        match self {
            IndexType::U16 => gl::UNSIGNED_SHORT,
            IndexType::U32 => gl::UNSIGNED_INT,
        }
    }
}

// Map type (u16, u32) to enum (IndexType::U16, IndexType::U32).
pub trait IndexTrait {
    fn index_type() -> IndexType;
}

impl IndexTrait for u16 {
    fn index_type() -> IndexType {
        IndexType::U16
    }
}

impl IndexTrait for u32 {
    fn index_type() -> IndexType {
        IndexType::U32
    }
}

// ----------------------------------------------
// IndexBuffer
// ----------------------------------------------

pub struct IndexBuffer {
    handle: gl::types::GLuint,
    count: u32,
    index_type: IndexType,
}

impl IndexBuffer {
    pub fn with_data<T: IndexTrait>(indices: &[T], usage_hint: BufferUsageHint) -> Self {
        debug_assert!(!indices.is_empty());
        debug_assert!(mem::size_of::<T>() == T::index_type().size_in_bytes());

        let count  = indices.len() as u32;
        let index_type = T::index_type();
        let handle = create_gl_buffer(gl::ELEMENT_ARRAY_BUFFER,
                                      indices.as_ptr() as *const c_void,
                                      (count as usize) * index_type.size_in_bytes(),
                                      usage_hint);
        Self { handle, count, index_type }
    }

    pub fn is_valid(&self) -> bool {
        self.handle != NULL_BUFFER_HANDLE
    }

}

impl Drop for IndexBuffer {
    fn drop(&mut self) {
        if self.handle != NULL_BUFFER_HANDLE {
            unsafe {
                gl::DeleteBuffers(1, &self.handle);
            }
            self.handle = NULL_BUFFER_HANDLE;
        }
    }
}

fn create_gl_buffer(target: gl::types::GLenum,
                    data: *const c_void,
                    size_in_bytes: usize,
                    usage_hint: BufferUsageHint) -> gl::types::GLuint {
    debug_assert!(size_in_bytes != 0);

    unsafe {
        let mut buffer_handle = NULL_BUFFER_HANDLE;
        gl::GenBuffers(1, &mut buffer_handle);
        if buffer_handle == NULL_BUFFER_HANDLE {
            panic!("Failed to create GL buffer handle!");
        }

        gl::BindBuffer(target, buffer_handle);
        gl::BufferData(target,
                       size_in_bytes as gl::types::GLsizeiptr,
                       data,
                       usage_hint as gl::types::GLenum);
        gl::BindBuffer(target, NULL_BUFFER_HANDLE);

        buffer_handle
    }
}

// ----------------------------------------------
// VertexElementDef
// ----------------------------------------------

pub struct VertexElementDef {
    pub count: u32,
    pub kind: gl::types::GLenum,
}

impl VertexElementDef {
    pub fn size_in_bytes(&self) -> usize {
        match self.kind {
            gl::FLOAT => mem::size_of::<f32>(),

            gl::BYTE => mem::size_of::<i8>(),
            gl::UNSIGNED_BYTE => mem::size_of::<u8>(),

            gl::SHORT => mem::size_of::<i16>(),
            gl::UNSIGNED_SHORT => mem::size_of::<u16>(),

            gl::INT => mem::size_of::<i32>(),
            gl::UNSIGNED_INT => mem::size_of::<u32>(),

            _ => panic!("Unhandled VertexElementDef type!"),
        }
    }
}

pub trait VertexTrait {
    fn layout() -> Vec<VertexElementDef>;
    fn stride() -> usize;
}

// ----------------------------------------------
// VertexArray
// ----------------------------------------------

// Owns the vertex and index buffers it references.
pub struct VertexArray {
    handle: gl::types::GLuint,
    vertex_buffer: VertexBuffer,
    index_buffer: IndexBuffer,
}

impl VertexArray {
    pub fn new(vertex_buffer: VertexBuffer,
               index_buffer: IndexBuffer,
               vertex_layout: &[VertexElementDef],
               vertex_stride: usize) -> Self {

        debug_assert!(vertex_buffer.is_valid());
        debug_assert!(index_buffer.is_valid());
        debug_assert!(vertex_stride != 0);

        let array_handle = unsafe {
            let mut array_handle = NULL_VERTEX_ARRAY_HANDLE;
            gl::GenVertexArrays(1, &mut array_handle);
            if array_handle == NULL_VERTEX_ARRAY_HANDLE {
                panic!("Failed to create vertex array handle!");
            }

            gl::BindVertexArray(array_handle);
            gl::BindBuffer(gl::ARRAY_BUFFER, vertex_buffer.handle);
            gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, index_buffer.handle);

            // Set vertex layout. Attribute index matches the layout(location) in the shader.
            let mut offset: usize = 0;
            for (index, vertex_element) in vertex_layout.iter().enumerate() {
                gl::EnableVertexAttribArray(index as gl::types::GLuint);
                gl::VertexAttribPointer(
                    index as gl::types::GLuint,
                    vertex_element.count as gl::types::GLint,
                    vertex_element.kind,
                    gl::FALSE,
                    vertex_stride as gl::types::GLsizei,
                    offset as *const c_void);

                offset += (vertex_element.count as usize) * vertex_element.size_in_bytes();
            }

            // Unbind the VAO first so it keeps the element buffer binding.
            gl::BindVertexArray(NULL_VERTEX_ARRAY_HANDLE);
            gl::BindBuffer(gl::ARRAY_BUFFER, NULL_BUFFER_HANDLE);
            gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, NULL_BUFFER_HANDLE);

            array_handle
        };

        Self {
            handle: array_handle,
            vertex_buffer,
            index_buffer,
        }
    }

    pub fn handle(&self) -> gl::types::GLuint {
        self.handle
    }

    pub fn index_type(&self) -> IndexType {
        self.index_buffer.index_type
    }

    pub fn is_valid(&self) -> bool {
        (self.handle != NULL_VERTEX_ARRAY_HANDLE)
        && self.vertex_buffer.is_valid()
        && self.index_buffer.is_valid()
    }

    pub fn index_count(&self) -> u32 {
        self.index_buffer.count
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_buffer.count
    }
}

impl Drop for VertexArray {
    fn drop(&mut self) {
        if self.handle != NULL_VERTEX_ARRAY_HANDLE {
            unsafe {
                gl::DeleteVertexArrays(1, &self.handle);
            }
            self.handle = NULL_VERTEX_ARRAY_HANDLE;
        }
    }
}
