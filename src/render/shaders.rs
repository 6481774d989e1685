use std::collections::HashMap;
use std::ffi::{CString, NulError};
use std::ptr;

use gl::types::*;
use glam::{Mat4, Vec3};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("Shader compilation failed: {0}")]
    CompilationFailed(String),
    #[error("Shader linking failed: {0}")]
    LinkingFailed(String),
    #[error("Shader source contains a nul byte: {0}")]
    Nul(#[from] NulError),
}

/// A linked GL program with a cache of uniform locations.
pub struct ShaderProgram {
    id: GLuint,
    uniforms: HashMap<String, GLint>,
}

impl ShaderProgram {
    pub fn from_sources(vertex_source: &str, fragment_source: &str) -> Result<Self, ShaderError> {
        let vertex_shader = Self::compile(vertex_source, gl::VERTEX_SHADER)?;
        let fragment_shader = match Self::compile(fragment_source, gl::FRAGMENT_SHADER) {
            Ok(shader) => shader,
            Err(err) => {
                unsafe { gl::DeleteShader(vertex_shader) };
                return Err(err);
            }
        };

        let program = unsafe { gl::CreateProgram() };
        unsafe {
            gl::AttachShader(program, vertex_shader);
            gl::AttachShader(program, fragment_shader);
            gl::LinkProgram(program);
            gl::DeleteShader(vertex_shader);
            gl::DeleteShader(fragment_shader);
        }

        let mut success = 1;
        unsafe {
            gl::GetProgramiv(program, gl::LINK_STATUS, &mut success);
        }

        if success == 0 {
            let mut len = 0;
            unsafe {
                gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len);
            }

            let error = create_whitespace_cstring_with_len(len.max(0) as usize);
            unsafe {
                gl::GetProgramInfoLog(program, len, ptr::null_mut(), error.as_ptr() as *mut GLchar);
                gl::DeleteProgram(program);
            }

            return Err(ShaderError::LinkingFailed(error.to_string_lossy().into_owned()));
        }

        Ok(Self {
            id: program,
            uniforms: HashMap::new(),
        })
    }

    fn compile(source: &str, shader_type: GLenum) -> Result<GLuint, ShaderError> {
        let source = CString::new(source.as_bytes())?;
        let shader = unsafe { gl::CreateShader(shader_type) };

        unsafe {
            gl::ShaderSource(shader, 1, &source.as_ptr(), ptr::null());
            gl::CompileShader(shader);
        }

        let mut success = 1;
        unsafe {
            gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut success);
        }

        if success == 0 {
            let mut len = 0;
            unsafe {
                gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len);
            }

            let error = create_whitespace_cstring_with_len(len.max(0) as usize);
            unsafe {
                gl::GetShaderInfoLog(shader, len, ptr::null_mut(), error.as_ptr() as *mut GLchar);
                gl::DeleteShader(shader);
            }

            return Err(ShaderError::CompilationFailed(error.to_string_lossy().into_owned()));
        }

        Ok(shader)
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn set_used(&self) {
        unsafe {
            gl::UseProgram(self.id);
        }
    }

    /// Cached lookup; unknown names resolve to -1, which GL ignores.
    pub fn uniform_location(&mut self, name: &str) -> GLint {
        if let Some(location) = self.uniforms.get(name) {
            return *location;
        }

        let location = match CString::new(name) {
            Ok(cname) => unsafe { gl::GetUniformLocation(self.id, cname.as_ptr()) },
            Err(_) => -1,
        };

        if location == -1 {
            log::warn!("Uniform '{}' not found in shader", name);
        }

        self.uniforms.insert(name.to_string(), location);
        location
    }

    // Uniform setters. The program must already be in use.
    pub fn set_uniform_1i(&mut self, name: &str, value: i32) {
        let location = self.uniform_location(name);
        unsafe {
            gl::Uniform1i(location, value);
        }
    }

    pub fn set_uniform_1f(&mut self, name: &str, value: f32) {
        let location = self.uniform_location(name);
        unsafe {
            gl::Uniform1f(location, value);
        }
    }

    pub fn set_uniform_3f(&mut self, name: &str, value: Vec3) {
        let location = self.uniform_location(name);
        unsafe {
            gl::Uniform3f(location, value.x, value.y, value.z);
        }
    }

    pub fn set_uniform_mat4(&mut self, name: &str, value: &Mat4) {
        let location = self.uniform_location(name);
        let columns = value.to_cols_array();
        unsafe {
            gl::UniformMatrix4fv(location, 1, gl::FALSE, columns.as_ptr());
        }
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteProgram(self.id);
        }
    }
}

fn create_whitespace_cstring_with_len(len: usize) -> CString {
    let buffer = vec![b' '; len];
    // Spaces only, so there is no interior nul.
    unsafe { CString::from_vec_unchecked(buffer) }
}

/// Built-in programs used by the world renderer.
pub mod builtin {
    /// Chunk geometry lit by block and sky light plus the held torch, with
    /// exponential fog toward the sky colour.
    pub const MAIN_VERTEX: &str = r#"
        #version 330 core
        layout (location = 0) in vec3 v_position;
        layout (location = 1) in vec2 v_texCoord;
        layout (location = 2) in vec4 v_light;

        out vec4 a_color;
        out vec2 a_texCoord;
        out float a_distance;
        out vec3 a_torchLight;

        uniform mat4 u_model;
        uniform mat4 u_proj;
        uniform mat4 u_view;
        uniform vec3 u_skyLightColor;
        uniform vec3 u_cameraPos;
        uniform float u_gamma;
        uniform vec3 u_torchlightColor;
        uniform float u_torchlightDistance;

        void main() {
            vec4 worldPos = u_model * vec4(v_position, 1.0);
            vec3 toCamera = u_cameraPos - worldPos.xyz;
            a_distance = length(toCamera);

            a_color = vec4(pow(v_light.rgb, vec3(u_gamma)), 1.0);
            a_color.rgb = max(a_color.rgb, u_skyLightColor * v_light.a);

            float torch = max(0.0, 1.0 - a_distance / u_torchlightDistance);
            a_torchLight = u_torchlightColor * torch;

            a_texCoord = v_texCoord;
            gl_Position = u_proj * u_view * worldPos;
        }
    "#;

    pub const MAIN_FRAGMENT: &str = r#"
        #version 330 core
        in vec4 a_color;
        in vec2 a_texCoord;
        in float a_distance;
        in vec3 a_torchLight;

        out vec4 f_color;

        uniform sampler2D u_texture0;
        uniform vec3 u_fogColor;
        uniform float u_fogFactor;

        void main() {
            vec4 tex = texture(u_texture0, a_texCoord);
            if (tex.a < 0.1) {
                discard;
            }
            vec3 lit = tex.rgb * max(a_color.rgb, a_torchLight);
            float fog = 1.0 - exp(-u_fogFactor * a_distance);
            f_color = vec4(mix(lit, u_fogColor, clamp(fog, 0.0, 1.0)), tex.a);
        }
    "#;

    pub const LINES_VERTEX: &str = r#"
        #version 330 core
        layout (location = 0) in vec3 v_position;
        layout (location = 1) in vec4 v_color;

        out vec4 a_color;

        uniform mat4 u_projview;

        void main() {
            a_color = v_color;
            gl_Position = u_projview * vec4(v_position, 1.0);
        }
    "#;

    pub const LINES_FRAGMENT: &str = r#"
        #version 330 core
        in vec4 a_color;
        out vec4 f_color;

        void main() {
            f_color = a_color;
        }
    "#;
}
