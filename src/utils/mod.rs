pub mod error;

pub use error::RenderError;
