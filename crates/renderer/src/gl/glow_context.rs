//! [`GlApi`] over a real OpenGL context.
//!
//! The embedding host owns window creation and function loading
//! (`glow::Context::from_loader_function`); this adapter only forwards the
//! capability surface onto it. Methods are fully qualified because `glow`
//! spells several of them identically to [`GlApi`].

use glow::HasContext;

use crate::error::ShaderStage;

use super::{BufferTarget, GlApi, Topology};

fn shader_kind(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

fn buffer_kind(target: BufferTarget) -> u32 {
    match target {
        BufferTarget::Array => glow::ARRAY_BUFFER,
        BufferTarget::ElementArray => glow::ELEMENT_ARRAY_BUFFER,
    }
}

fn primitive_kind(topology: Topology) -> u32 {
    match topology {
        Topology::TriangleStrip => glow::TRIANGLE_STRIP,
        Topology::LineStrip => glow::LINE_STRIP,
    }
}

impl GlApi for glow::Context {
    type Shader = glow::NativeShader;
    type Program = glow::NativeProgram;
    type Buffer = glow::NativeBuffer;
    type VertexArray = glow::NativeVertexArray;
    type UniformLocation = glow::NativeUniformLocation;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String> {
        unsafe { HasContext::create_shader(self, shader_kind(stage)) }
    }

    fn shader_source(&self, shader: Self::Shader, source: &str) {
        unsafe { HasContext::shader_source(self, shader, source) }
    }

    fn compile_shader(&self, shader: Self::Shader) {
        unsafe { HasContext::compile_shader(self, shader) }
    }

    fn shader_compile_status(&self, shader: Self::Shader) -> bool {
        unsafe { HasContext::get_shader_compile_status(self, shader) }
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        unsafe { HasContext::get_shader_info_log(self, shader) }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { HasContext::delete_shader(self, shader) }
    }

    fn create_program(&self) -> Result<Self::Program, String> {
        unsafe { HasContext::create_program(self) }
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { HasContext::attach_shader(self, program, shader) }
    }

    fn link_program(&self, program: Self::Program) {
        unsafe { HasContext::link_program(self, program) }
    }

    fn program_link_status(&self, program: Self::Program) -> bool {
        unsafe { HasContext::get_program_link_status(self, program) }
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        unsafe { HasContext::get_program_info_log(self, program) }
    }

    fn use_program(&self, program: Option<Self::Program>) {
        unsafe { HasContext::use_program(self, program) }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { HasContext::delete_program(self, program) }
    }

    fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32> {
        unsafe { HasContext::get_attrib_location(self, program, name) }
    }

    fn uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        unsafe { HasContext::get_uniform_location(self, program, name) }
    }

    fn create_buffer(&self) -> Result<Self::Buffer, String> {
        unsafe { HasContext::create_buffer(self) }
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<Self::Buffer>) {
        unsafe { HasContext::bind_buffer(self, buffer_kind(target), buffer) }
    }

    fn buffer_data_static(&self, target: BufferTarget, data: &[u8]) {
        unsafe {
            HasContext::buffer_data_u8_slice(self, buffer_kind(target), data, glow::STATIC_DRAW)
        }
    }

    fn delete_buffer(&self, buffer: Self::Buffer) {
        unsafe { HasContext::delete_buffer(self, buffer) }
    }

    fn create_vertex_array(&self) -> Result<Self::VertexArray, String> {
        unsafe { HasContext::create_vertex_array(self) }
    }

    fn bind_vertex_array(&self, array: Option<Self::VertexArray>) {
        unsafe { HasContext::bind_vertex_array(self, array) }
    }

    fn delete_vertex_array(&self, array: Self::VertexArray) {
        unsafe { HasContext::delete_vertex_array(self, array) }
    }

    fn enable_vertex_attrib_array(&self, location: u32) {
        unsafe { HasContext::enable_vertex_attrib_array(self, location) }
    }

    fn vertex_attrib_pointer_f32(&self, location: u32, size: i32) {
        unsafe {
            HasContext::vertex_attrib_pointer_f32(self, location, size, glow::FLOAT, false, 0, 0)
        }
    }

    fn uniform_1_f32(&self, location: &Self::UniformLocation, value: f32) {
        unsafe { HasContext::uniform_1_f32(self, Some(location), value) }
    }

    fn uniform_3_f32(&self, location: &Self::UniformLocation, x: f32, y: f32, z: f32) {
        unsafe { HasContext::uniform_3_f32(self, Some(location), x, y, z) }
    }

    fn uniform_matrix_4_f32(&self, location: &Self::UniformLocation, matrix: &[f32; 16]) {
        unsafe { HasContext::uniform_matrix_4_f32_slice(self, Some(location), false, matrix) }
    }

    fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32) {
        unsafe { HasContext::clear_color(self, red, green, blue, alpha) }
    }

    fn clear_depth(&self, depth: f64) {
        unsafe { HasContext::clear_depth_f64(self, depth) }
    }

    fn enable_depth_test(&self) {
        unsafe {
            HasContext::enable(self, glow::DEPTH_TEST);
            HasContext::depth_func(self, glow::LEQUAL);
        }
    }

    fn clear(&self, color: bool, depth: bool) {
        let mut mask = 0;
        if color {
            mask |= glow::COLOR_BUFFER_BIT;
        }
        if depth {
            mask |= glow::DEPTH_BUFFER_BIT;
        }
        unsafe { HasContext::clear(self, mask) }
    }

    fn draw_arrays(&self, topology: Topology, first: i32, count: i32) {
        unsafe { HasContext::draw_arrays(self, primitive_kind(topology), first, count) }
    }

    fn draw_elements_u32(&self, topology: Topology, count: i32) {
        unsafe {
            HasContext::draw_elements(self, primitive_kind(topology), count, glow::UNSIGNED_INT, 0)
        }
    }
}
