//! Rendering pipeline
//!
//! Immediate-mode drawing: every pass, every live entity's geometry is
//! re-uploaded and drawn with its own transforms. There is no batching,
//! instancing or culling.

pub mod camera;
pub mod device;
pub mod headless;
pub mod lighting;
pub mod renderer;

pub use camera::Camera;
pub use device::{BufferTarget, DeviceResult, GraphicsDevice, ProgramHandle, ShaderSources, ShaderStage, Uniform};
pub use headless::{DeviceCall, DeviceStats, HeadlessDevice};
pub use lighting::{DirectionalLight, LightError, LightSlots};
pub use renderer::{compose_clip, FrameStats, Renderer};

/// Rendering errors
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    /// A shader stage failed to compile
    #[error("{stage:?} shader failed to compile: {log}")]
    ShaderCompilation {
        /// Stage that failed
        stage: ShaderStage,
        /// Compiler output
        log: String,
    },

    /// Compiled stages failed to link
    #[error("Program failed to link: {0}")]
    ProgramLink(String),

    /// Shader source could not be read
    #[error("Shader load error: {0}")]
    ShaderLoad(String),

    /// No drawing context is available
    #[error("No graphics context available")]
    MissingContext,

    /// A draw was attempted before initialization
    #[error("Renderer not initialized")]
    NotInitialized,

    /// Device-specific failure
    #[error("Device error: {0}")]
    Device(String),
}
