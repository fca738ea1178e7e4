//! Immediate-mode renderer
//!
//! Draws every entity in its live set, which the registry keeps in step with
//! its own contents, in insertion order, once per pass.
//! For each entity the geometry buffers are re-uploaded, the clip and normal
//! matrices are bound together with the tint, and one indexed draw is
//! issued. Upload and draw for one entity finish before the next starts.

use crate::config::{EngineConfig, ProjectionConfig};
use crate::ecs::{EntityList, EntityRegistry, GameObject};
use crate::foundation::math::{make_perspective, multiply_all, Mat4};

use super::camera::Camera;
use super::device::{BufferTarget, GraphicsDevice, ProgramHandle, ShaderSources, Uniform};
use super::lighting::{DirectionalLight, LightSlots};
use super::RenderError;

/// Object-to-clip transform = projection · view · world
pub fn compose_clip(projection: &Mat4, view: &Mat4, world: &Mat4) -> Mat4 {
    multiply_all(&[*projection, *view, *world])
}

/// Per-frame totals returned by [`Renderer::draw`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Indexed draws issued
    pub draw_calls: usize,
    /// Bytes uploaded to device buffers
    pub bytes_uploaded: usize,
    /// Live-set ids with no stored entity
    pub skipped: usize,
}

/// Renderer state
pub struct Renderer {
    program: Option<ProgramHandle>,
    live: EntityList,
    projection: ProjectionConfig,
    clear_color: [f32; 4],
    directional: DirectionalLight,
    warned_non_uniform: bool,
}

impl Renderer {
    /// Create a renderer configured from `config`
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            program: None,
            live: EntityList::new(),
            projection: config.projection,
            clear_color: config.clear_color,
            directional: DirectionalLight::from_config(&config.lighting),
            warned_non_uniform: false,
        }
    }

    /// Compile the program, enable depth testing and bind the directional light
    ///
    /// Any error here is fatal to setup.
    pub fn initialize(&mut self, device: &mut dyn GraphicsDevice, shaders: &ShaderSources) -> Result<(), RenderError> {
        let program = device.create_program(shaders)?;
        device.use_program(program)?;
        device.enable_depth_test();
        self.directional.upload(device)?;
        self.program = Some(program);
        log::info!("Renderer initialized with program {}", program.0);
        Ok(())
    }

    /// Whether [`Renderer::initialize`] succeeded
    pub fn is_initialized(&self) -> bool {
        self.program.is_some()
    }

    /// Ids drawn each frame
    pub fn live_set(&self) -> &EntityList {
        &self.live
    }

    /// Directional light bound at initialization
    pub fn directional_light(&self) -> &DirectionalLight {
        &self.directional
    }

    /// Projection for a surface of the given size
    pub fn projection_matrix(&self, width: u32, height: u32) -> Mat4 {
        let aspect = if height == 0 { 1.0 } else { width as f32 / height as f32 };
        make_perspective(self.projection.fov_deg, aspect, self.projection.near, self.projection.far)
    }

    /// Draw one frame
    pub fn draw(
        &mut self,
        device: &mut dyn GraphicsDevice,
        registry: &EntityRegistry,
        camera: &Camera,
        lights: &LightSlots,
    ) -> Result<FrameStats, RenderError> {
        if self.program.is_none() {
            return Err(RenderError::NotInitialized);
        }

        let (width, height) = device.display_size();
        if device.surface_size() != (width, height) {
            log::debug!("Resizing surface to {}x{}", width, height);
            device.resize_surface(width, height);
        }
        device.set_viewport(0, 0, width, height);
        device.clear(self.clear_color);
        lights.upload(device)?;

        let projection = self.projection_matrix(width, height);
        let view = camera.view_matrix();
        let mut stats = FrameStats::default();

        for id in self.live.snapshot() {
            match registry.get(id) {
                Some(object) => self.draw_object(device, object, &projection, &view, &mut stats)?,
                None => stats.skipped += 1,
            }
        }
        Ok(stats)
    }

    fn draw_object(
        &mut self,
        device: &mut dyn GraphicsDevice,
        object: &dyn GameObject,
        projection: &Mat4,
        view: &Mat4,
        stats: &mut FrameStats,
    ) -> Result<(), RenderError> {
        let entity = object.entity();
        let geometry = entity.geometry();

        let mut uploads: Vec<(BufferTarget, &[u8])> = vec![
            (BufferTarget::Positions, bytemuck::cast_slice(&geometry.vertices)),
            (BufferTarget::Normals, bytemuck::cast_slice(&geometry.normals)),
        ];
        if !geometry.texcoords.is_empty() {
            uploads.push((BufferTarget::TexCoords, bytemuck::cast_slice(&geometry.texcoords)));
        }
        uploads.push((BufferTarget::Indices, bytemuck::cast_slice(&geometry.indices)));
        for (target, bytes) in uploads {
            device.upload_buffer(target, bytes)?;
            stats.bytes_uploaded += bytes.len();
        }

        let world = entity.world_matrix();
        device.set_uniform_mat4(Uniform::ClipMatrix, &compose_clip(projection, view, &world))?;

        // The world matrix is only a valid normal matrix for uniform scale.
        if !entity.scale.is_uniform() && !self.warned_non_uniform {
            log::debug!("Drawing {:?} with non-uniform scale; lighting normals will be skewed", object.kind());
            self.warned_non_uniform = true;
        }
        device.set_uniform_mat4(Uniform::NormalMatrix, &world)?;
        device.set_uniform_vec3(Uniform::MaterialColor, &entity.material_color)?;

        let index_count = u32::try_from(geometry.index_count())
            .map_err(|_| RenderError::Device(format!("{} indices exceed a draw", geometry.index_count())))?;
        device.draw_indexed(index_count)?;
        stats.draw_calls += 1;
        log::trace!("Drew {:?} with {} indices", object.kind(), index_count);
        Ok(())
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("program", &self.program)
            .field("live", &self.live.len())
            .finish()
    }
}
