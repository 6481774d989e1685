use thiserror::Error;

use crate::render::shaders::ShaderError;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Shader error: {0}")]
    Shader(#[from] ShaderError),

    #[error("Texture data has {actual} bytes, expected {expected}")]
    InvalidTexture { expected: usize, actual: usize },
}
