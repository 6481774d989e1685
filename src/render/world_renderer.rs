use crossbeam_channel::Receiver;
use glam::{Mat4, Vec3};
use log::{debug, trace};

use super::batch3d::Batch3D;
use super::camera::Camera;
use super::chunks_renderer::MeshCache;
use super::context::{Capability, GraphicsContext, ShaderKind, TextureKind};
use super::culling::ChunkCulling;
use super::frame::{FramePhase, FrameStats};
use super::line_batch::LineBatch;
use super::order::{camera_grid_position, gather_candidates, order_back_to_front};
use super::overlay::{draw_debug_axes, draw_selection};
use crate::config::RenderConfig;
use crate::world::chunk::{CHUNK_D, CHUNK_W};
use crate::world::events::LevelEvent;
use crate::world::level::Level;

/// Per-frame driver for the world pass.
///
/// Owns the mesh cache and the overlay batches; borrows the level and the
/// graphics context only for the duration of [`WorldRenderer::draw`].
pub struct WorldRenderer<C: MeshCache> {
    cache: C,
    events: Receiver<LevelEvent>,
    culling: ChunkCulling,
    config: RenderConfig,
    line_batch: LineBatch,
    batch3d: Batch3D,
    phase: FramePhase,
}

impl<C: MeshCache> WorldRenderer<C> {
    /// Subscribes to `level`'s chunk events so hidden chunks get their
    /// meshes released.
    pub fn new(level: &Level, cache: C, config: RenderConfig) -> Self {
        Self {
            cache,
            events: level.events.subscribe(),
            culling: ChunkCulling::from_config(&config),
            line_batch: LineBatch::new(config.line_batch_capacity),
            batch3d: Batch3D::new(config.batch3d_capacity),
            config,
            phase: FramePhase::FrameDone,
        }
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut C {
        &mut self.cache
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Last phase entered. `FrameDone` between frames.
    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    /// Applies pending level events. Returns how many meshes were unloaded.
    pub fn sync_events(&mut self) -> usize {
        let mut unloaded = 0;
        for event in self.events.try_iter() {
            match event {
                LevelEvent::ChunkHidden(chunk) => {
                    debug!("Chunk ({}, {}) hidden", chunk.x(), chunk.z());
                    self.cache.unload(&chunk);
                    unloaded += 1;
                }
                LevelEvent::ChunkShown(_) => {}
            }
        }
        unloaded
    }

    fn enter(&mut self, phase: FramePhase) {
        debug_assert_eq!(
            self.phase.next().unwrap_or(FramePhase::ClearTarget),
            phase,
            "frame phase {:?} cannot follow {:?}",
            phase,
            self.phase
        );
        self.phase = phase;
    }

    /// Renders one frame of `level` as seen from `camera`.
    ///
    /// Panics if the player's chosen or selected block id is not
    /// registered in the level's block registry.
    pub fn draw<G: GraphicsContext>(
        &mut self,
        gfx: &mut G,
        camera: &Camera,
        level: &Level,
        occlusion: bool,
    ) -> FrameStats {
        self.sync_events();
        let mut stats = FrameStats::default();

        // A previous frame may have unwound partway through.
        self.phase = FramePhase::FrameDone;

        self.enter(FramePhase::ClearTarget);
        let sky = Vec3::from(self.config.sky_color);
        gfx.clear(sky);

        self.enter(FramePhase::SetupGlobalUniforms);
        self.setup_uniforms(gfx, camera, level, sky);

        self.enter(FramePhase::GatherCandidates);
        let candidates = gather_candidates(&level.chunks.read());
        stats.candidates = candidates.len();

        self.enter(FramePhase::Order);
        let ordered = order_back_to_front(candidates, camera_grid_position(camera.position));

        self.enter(FramePhase::DrawOpaquePass);
        let front = camera.front();
        gfx.set_capability(Capability::Multisample, false);
        for candidate in ordered {
            // Streaming code may have emptied the slot or shifted the grid
            // since the gather. Only the gathered coordinate is drawn.
            let chunk = {
                let chunks = level.chunks.read();
                chunks
                    .get(candidate.index)
                    .filter(|chunk| chunk.coord() == candidate.coord)
                    .or_else(|| chunks.get_at(candidate.coord))
                    .cloned()
            };
            let Some(chunk) = chunk else {
                stats.vanished += 1;
                continue;
            };

            if !chunk.is_lighted() {
                stats.unlighted += 1;
                continue;
            }

            let Some(mesh) = self.cache.get_or_render(&chunk) else {
                stats.pending += 1;
                continue;
            };

            if self
                .culling
                .should_skip(chunk.coord(), camera.position, front, occlusion)
            {
                stats.occluded += 1;
                continue;
            }

            let model = Mat4::from_translation(Vec3::new(
                (chunk.x() * CHUNK_W) as f32,
                0.0,
                (chunk.z() * CHUNK_D) as f32 + self.config.seam_bias_z,
            ));
            gfx.uniform_matrix("u_model", &model);
            gfx.draw_mesh(mesh);
            stats.drawn += 1;
        }
        gfx.set_capability(Capability::Multisample, true);

        self.enter(FramePhase::TransientBatchPass);
        gfx.uniform_matrix("u_model", &Mat4::IDENTITY);
        self.batch3d.begin();
        self.batch3d.render(gfx);

        self.enter(FramePhase::SelectionOverlayPass);
        if let Some((id, position)) = level.player_controller.selection() {
            let model = level.blocks.get(id).model;
            draw_selection(gfx, &mut self.line_batch, camera, model, position);
        }

        self.enter(FramePhase::DebugOverlayPass);
        if level.player.debug {
            draw_debug_axes(gfx, &mut self.line_batch, camera);
        }

        self.enter(FramePhase::FrameDone);
        trace!("Frame: {}", stats);
        stats
    }

    fn setup_uniforms<G: GraphicsContext>(
        &self,
        gfx: &mut G,
        camera: &Camera,
        level: &Level,
        sky: Vec3,
    ) {
        let (width, height) = gfx.surface_size();
        gfx.viewport(0, 0, width, height);
        gfx.set_capability(Capability::DepthTest, true);
        gfx.set_capability(Capability::CullFace, true);

        let torchlight = level.blocks.get(level.player.chosen_block).emission_color();

        gfx.use_shader(ShaderKind::Main);
        gfx.uniform_matrix("u_proj", &camera.projection());
        gfx.uniform_matrix("u_view", &camera.view());
        gfx.uniform1f("u_gamma", self.config.gamma);
        gfx.uniform3f("u_skyLightColor", Vec3::from(self.config.sky_light_color));
        gfx.uniform3f("u_fogColor", sky);
        gfx.uniform1f("u_fogFactor", self.config.fog_factor);
        gfx.uniform3f("u_cameraPos", camera.position);
        gfx.uniform3f("u_torchlightColor", torchlight);
        gfx.uniform1f("u_torchlightDistance", self.config.torchlight_distance);
        gfx.bind_texture(TextureKind::Blocks);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use glam::IVec3;

    use super::*;
    use crate::render::chunks_renderer::ChunksRenderer;
    use crate::render::headless::{GfxCommand, HeadlessContext, HeadlessMeshBuilder};
    use crate::render::mesh::Mesh;
    use crate::world::block::{BlockId, BlockRegistry};
    use crate::world::chunk::Chunk;
    use crate::world::chunk_coord::ChunkCoord;
    use crate::world::chunks::Chunks;

    /// Records every query and unload before delegating to a real cache.
    struct SpyCache {
        inner: ChunksRenderer<HeadlessMeshBuilder>,
        queried: Vec<ChunkCoord>,
        unloaded: Vec<ChunkCoord>,
    }

    impl SpyCache {
        fn new() -> Self {
            Self {
                inner: ChunksRenderer::new(HeadlessMeshBuilder::new()),
                queried: Vec::new(),
                unloaded: Vec::new(),
            }
        }
    }

    impl MeshCache for SpyCache {
        fn get_or_render(&mut self, chunk: &Chunk) -> Option<&Mesh> {
            self.queried.push(chunk.coord());
            self.inner.get_or_render(chunk)
        }

        fn unload(&mut self, chunk: &Chunk) {
            self.unloaded.push(chunk.coord());
            self.inner.unload(chunk);
        }
    }

    /// Runs `mutate` against the level on the first mesh request, the way a
    /// streaming thread could between two slot lookups.
    struct StreamingCache {
        inner: ChunksRenderer<HeadlessMeshBuilder>,
        level: Arc<Level>,
        mutate: Option<Box<dyn FnOnce(&Level)>>,
    }

    impl StreamingCache {
        fn new(level: Arc<Level>, mutate: impl FnOnce(&Level) + 'static) -> Self {
            Self {
                inner: ChunksRenderer::new(HeadlessMeshBuilder::new()),
                level,
                mutate: Some(Box::new(mutate)),
            }
        }
    }

    impl MeshCache for StreamingCache {
        fn get_or_render(&mut self, chunk: &Chunk) -> Option<&Mesh> {
            if let Some(mutate) = self.mutate.take() {
                mutate(&self.level);
            }
            self.inner.get_or_render(chunk)
        }

        fn unload(&mut self, chunk: &Chunk) {
            self.inner.unload(chunk);
        }
    }

    // Camera sits in the middle of chunk (0, 0), i.e. grid position (0.5, 0.5).
    const EYE: Vec3 = Vec3::new(8.0, 80.0, 8.0);

    /// Chunks at horizontal distance 10 (+X), 5 (-X) and 1 (+X) from the
    /// camera, stored at slot indices 15, 0 and 6.
    fn three_chunk_level() -> Level {
        let level = Level::new(Chunks::new(16, 1, -5, 0), BlockRegistry::default());
        for x in [10, -5, 1] {
            let chunk = Chunk::new(x, 0);
            chunk.set_lighted(true);
            level.show_chunk(Arc::new(chunk)).unwrap();
        }
        level
    }

    fn renderer(level: &Level) -> WorldRenderer<SpyCache> {
        WorldRenderer::new(level, SpyCache::new(), RenderConfig::default())
    }

    fn camera() -> Camera {
        Camera::new(EYE, 70.0, 16.0 / 9.0)
    }

    fn drawn_chunks(gfx: &HeadlessContext, renderer: &WorldRenderer<SpyCache>) -> Vec<i32> {
        drawn_by(gfx, renderer.cache().inner.builder())
    }

    fn drawn_by(gfx: &HeadlessContext, builder: &HeadlessMeshBuilder) -> Vec<i32> {
        gfx.commands()
            .iter()
            .filter_map(|command| match command {
                GfxCommand::DrawMesh { vao, .. } => builder.chunk_of(*vao).map(|c| c.x()),
                _ => None,
            })
            .collect()
    }

    fn position_of(commands: &[GfxCommand], wanted: &GfxCommand) -> usize {
        commands
            .iter()
            .position(|command| command == wanted)
            .unwrap_or_else(|| panic!("{wanted:?} not recorded"))
    }

    #[test]
    fn test_draws_farthest_first_without_occlusion() {
        let level = three_chunk_level();
        let mut renderer = renderer(&level);
        let mut gfx = HeadlessContext::new(800, 600);

        let stats = renderer.draw(&mut gfx, &camera(), &level, false);

        assert_eq!(drawn_chunks(&gfx, &renderer), vec![10, -5, 1]);
        assert_eq!(stats.candidates, 3);
        assert_eq!(stats.drawn, 3);
        assert_eq!(stats.occluded, 0);
        assert_eq!(renderer.phase(), FramePhase::FrameDone);
    }

    #[test]
    fn test_far_chunk_behind_camera_is_occluded() {
        let level = three_chunk_level();
        let mut renderer = renderer(&level);
        let mut gfx = HeadlessContext::new(800, 600);
        let mut camera = camera();
        camera.look_along(Vec3::NEG_X);

        let stats = renderer.draw(&mut gfx, &camera, &level, true);

        assert_eq!(drawn_chunks(&gfx, &renderer), vec![-5, 1]);
        assert_eq!(stats.occluded, 1);
        assert_eq!(stats.drawn, 2);
    }

    #[test]
    fn test_occlusion_off_draws_every_ready_chunk() {
        let level = three_chunk_level();
        let mut renderer = renderer(&level);
        let mut gfx = HeadlessContext::new(800, 600);
        let mut camera = camera();
        camera.look_along(Vec3::NEG_X);

        let stats = renderer.draw(&mut gfx, &camera, &level, false);

        let draws = gfx
            .commands()
            .iter()
            .filter(|c| matches!(c, GfxCommand::DrawMesh { .. }))
            .count();
        assert_eq!(draws, 3);
        assert_eq!(stats.drawn, 3);
    }

    #[test]
    fn test_unlighted_chunks_never_reach_the_cache() {
        let level = three_chunk_level();
        let dark = Chunk::new(3, 0);
        level.show_chunk(Arc::new(dark)).unwrap();

        let mut renderer = renderer(&level);
        let mut gfx = HeadlessContext::new(800, 600);
        let stats = renderer.draw(&mut gfx, &camera(), &level, false);

        assert_eq!(stats.candidates, 4);
        assert_eq!(stats.unlighted, 1);
        assert!(!renderer.cache().queried.contains(&ChunkCoord::new(3, 0)));
        assert_eq!(renderer.cache().queried.len(), 3);
    }

    #[test]
    fn test_pending_mesh_is_skipped_silently() {
        let level = three_chunk_level();
        let mut renderer = renderer(&level);
        renderer
            .cache_mut()
            .inner
            .builder_mut()
            .refuse(ChunkCoord::new(-5, 0));
        let mut gfx = HeadlessContext::new(800, 600);

        let stats = renderer.draw(&mut gfx, &camera(), &level, false);

        assert_eq!(stats.pending, 1);
        assert_eq!(drawn_chunks(&gfx, &renderer), vec![10, 1]);
    }

    #[test]
    fn test_chunk_model_matrix_carries_seam_bias() {
        let level = Level::new(Chunks::new(4, 4, 0, 0), BlockRegistry::default());
        let chunk = Chunk::new(2, 3);
        chunk.set_lighted(true);
        level.show_chunk(Arc::new(chunk)).unwrap();

        let mut renderer = renderer(&level);
        let mut gfx = HeadlessContext::new(800, 600);
        renderer.draw(&mut gfx, &camera(), &level, false);

        let expected = Mat4::from_translation(Vec3::new(32.0, 0.0, 49.0));
        let commands = gfx.commands();
        let draw = commands
            .iter()
            .position(|c| matches!(c, GfxCommand::DrawMesh { .. }))
            .unwrap();
        assert_eq!(
            commands[draw - 1],
            GfxCommand::UniformMatrix {
                name: "u_model".to_string(),
                value: expected
            }
        );
    }

    #[test]
    fn test_multisample_toggles_once_around_opaque_pass() {
        let level = three_chunk_level();
        let mut renderer = renderer(&level);
        let mut gfx = HeadlessContext::new(800, 600);
        renderer.draw(&mut gfx, &camera(), &level, false);

        let commands = gfx.commands();
        let disables: Vec<usize> = commands
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == GfxCommand::Disable(Capability::Multisample))
            .map(|(i, _)| i)
            .collect();
        let enables: Vec<usize> = commands
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == GfxCommand::Enable(Capability::Multisample))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(disables.len(), 1);
        assert_eq!(enables.len(), 1);

        let draws: Vec<usize> = commands
            .iter()
            .enumerate()
            .filter(|(_, c)| matches!(c, GfxCommand::DrawMesh { .. }))
            .map(|(i, _)| i)
            .collect();
        assert!(draws.iter().all(|&d| disables[0] < d && d < enables[0]));
        assert!(gfx.is_enabled(Capability::Multisample));
    }

    #[test]
    fn test_global_uniforms_precede_chunk_draws() {
        let mut level = three_chunk_level();
        level.player.chosen_block = BlockId(3);
        let mut renderer = renderer(&level);
        let mut gfx = HeadlessContext::new(640, 480);
        renderer.draw(&mut gfx, &camera(), &level, false);

        let commands = gfx.commands();
        assert_eq!(commands[0], GfxCommand::Clear(Vec3::new(0.7, 0.81, 1.0)));
        assert_eq!(
            commands[1],
            GfxCommand::Viewport {
                x: 0,
                y: 0,
                width: 640,
                height: 480
            }
        );

        let torch = commands
            .iter()
            .find_map(|c| match c {
                GfxCommand::Uniform3f { name, value } if name == "u_torchlightColor" => Some(*value),
                _ => None,
            })
            .unwrap();
        assert!((torch - Vec3::new(1.0, 14.0 / 15.0, 13.0 / 15.0)).length() < 1e-6);

        let gamma = position_of(
            commands,
            &GfxCommand::Uniform1f {
                name: "u_gamma".to_string(),
                value: 1.6,
            },
        );
        let texture = position_of(commands, &GfxCommand::BindTexture(TextureKind::Blocks));
        let first_draw = commands
            .iter()
            .position(|c| matches!(c, GfxCommand::DrawMesh { .. }))
            .unwrap();
        assert!(gamma < texture && texture < first_draw);
        assert_eq!(
            commands
                .iter()
                .filter(|c| matches!(c, GfxCommand::BindTexture(_)))
                .count(),
            1
        );
    }

    #[test]
    fn test_selection_outline_drawn_after_chunks() {
        let mut level = three_chunk_level();
        level.player_controller.select(BlockId(1), IVec3::new(0, 70, 0));
        let mut renderer = renderer(&level);
        let mut gfx = HeadlessContext::new(800, 600);
        renderer.draw(&mut gfx, &camera(), &level, false);

        let commands = gfx.commands();
        let last_mesh = commands
            .iter()
            .rposition(|c| matches!(c, GfxCommand::DrawMesh { .. }))
            .unwrap();
        let lines = position_of(commands, &GfxCommand::UseShader(ShaderKind::Lines));
        assert!(last_mesh < lines);
        assert_eq!(position_of(commands, &GfxCommand::LineWidth(2.0)), lines + 2);
        assert!(matches!(commands.last(), Some(GfxCommand::DrawLines(v)) if v.len() == 24));
        assert_eq!(gfx.current_shader(), Some(ShaderKind::Lines));
    }

    #[test]
    fn test_no_selection_means_no_lines() {
        let level = three_chunk_level();
        let mut renderer = renderer(&level);
        let mut gfx = HeadlessContext::new(800, 600);
        renderer.draw(&mut gfx, &camera(), &level, false);

        assert!(!gfx
            .commands()
            .iter()
            .any(|c| matches!(c, GfxCommand::UseShader(ShaderKind::Lines) | GfxCommand::DrawLines(_))));
        assert_eq!(gfx.current_shader(), Some(ShaderKind::Main));
    }

    #[test]
    #[should_panic(expected = "not registered")]
    fn test_unknown_selected_block_panics() {
        let mut level = three_chunk_level();
        level.player_controller.select(BlockId(999), IVec3::ZERO);
        let mut renderer = renderer(&level);
        let mut gfx = HeadlessContext::new(800, 600);
        renderer.draw(&mut gfx, &camera(), &level, false);
    }

    #[test]
    fn test_debug_pass_restores_depth_test() {
        let mut level = three_chunk_level();
        level.player.debug = true;
        let mut renderer = renderer(&level);
        let mut gfx = HeadlessContext::new(800, 600);

        renderer.draw(&mut gfx, &camera(), &level, false);
        let commands = gfx.take_commands();

        let disabled = position_of(&commands, &GfxCommand::Disable(Capability::DepthTest));
        let line_draws: Vec<usize> = commands
            .iter()
            .enumerate()
            .filter(|(_, c)| matches!(c, GfxCommand::DrawLines(_)))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(line_draws.len(), 2);
        assert!(line_draws.iter().all(|&i| i > disabled));
        assert_eq!(commands.last(), Some(&GfxCommand::Enable(Capability::DepthTest)));
        assert!(gfx.is_enabled(Capability::DepthTest));

        // The next frame starts with depth testing on and draws normally.
        let stats = renderer.draw(&mut gfx, &camera(), &level, false);
        assert_eq!(stats.drawn, 3);
        assert!(gfx.is_enabled(Capability::DepthTest));
    }

    #[test]
    fn test_hidden_chunk_mesh_is_unloaded() {
        let level = three_chunk_level();
        let mut renderer = renderer(&level);
        let mut gfx = HeadlessContext::new(800, 600);
        renderer.draw(&mut gfx, &camera(), &level, false);
        assert!(renderer.cache().inner.contains(ChunkCoord::new(-5, 0)));

        level.hide_chunk(ChunkCoord::new(-5, 0));
        gfx.take_commands();
        let stats = renderer.draw(&mut gfx, &camera(), &level, false);

        assert_eq!(renderer.cache().unloaded, vec![ChunkCoord::new(-5, 0)]);
        assert!(!renderer.cache().inner.contains(ChunkCoord::new(-5, 0)));
        assert_eq!(renderer.cache().inner.builder().released(), 1);
        assert_eq!(stats.candidates, 2);
        assert_eq!(drawn_chunks(&gfx, &renderer), vec![10, 1]);
    }

    #[test]
    fn test_cached_meshes_are_reused_across_frames() {
        let level = three_chunk_level();
        let mut renderer = renderer(&level);
        let mut gfx = HeadlessContext::new(800, 600);
        renderer.draw(&mut gfx, &camera(), &level, false);
        renderer.draw(&mut gfx, &camera(), &level, false);

        assert_eq!(renderer.cache().inner.builder().built(), 3);
        assert_eq!(renderer.cache().queried.len(), 6);
    }

    #[test]
    fn test_chunk_hidden_mid_frame_is_skipped() {
        let level = Arc::new(three_chunk_level());
        let cache = StreamingCache::new(level.clone(), |level| {
            level.hide_chunk(ChunkCoord::new(1, 0));
        });
        let mut renderer = WorldRenderer::new(&level, cache, RenderConfig::default());
        let mut gfx = HeadlessContext::new(800, 600);

        let stats = renderer.draw(&mut gfx, &camera(), &level, false);

        assert_eq!(drawn_by(&gfx, renderer.cache().inner.builder()), vec![10, -5]);
        assert_eq!(stats.vanished, 1);
        assert_eq!(stats.drawn, 2);
        assert_eq!(renderer.phase(), FramePhase::FrameDone);
    }

    #[test]
    fn test_grid_shift_mid_frame_draws_each_chunk_once() {
        let level = Arc::new(Level::new(Chunks::new(8, 1, 0, 0), BlockRegistry::default()));
        for x in 0..8 {
            let chunk = Chunk::new(x, 0);
            chunk.set_lighted(true);
            level.show_chunk(Arc::new(chunk)).unwrap();
        }
        let cache = StreamingCache::new(level.clone(), |level| {
            level.translate(1, 0);
        });
        let mut renderer = WorldRenderer::new(&level, cache, RenderConfig::default());
        let mut gfx = HeadlessContext::new(800, 600);

        let stats = renderer.draw(&mut gfx, &camera(), &level, false);

        // Chunk 0 fell off the grid; every other chunk keeps its place in the order.
        assert_eq!(
            drawn_by(&gfx, renderer.cache().inner.builder()),
            vec![7, 6, 5, 4, 3, 2, 1]
        );
        assert_eq!(stats.candidates, 8);
        assert_eq!(stats.drawn, 7);
        assert_eq!(stats.vanished, 1);
    }

    #[test]
    fn test_frame_after_a_panicked_frame_starts_clean() {
        let mut level = three_chunk_level();
        level.player_controller.select(BlockId(999), IVec3::ZERO);
        let mut renderer = renderer(&level);
        let mut gfx = HeadlessContext::new(800, 600);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            renderer.draw(&mut gfx, &camera(), &level, false)
        }));
        assert!(result.is_err());
        assert_eq!(renderer.phase(), FramePhase::SelectionOverlayPass);

        level.player_controller.clear_selection();
        let stats = renderer.draw(&mut gfx, &camera(), &level, false);
        assert_eq!(stats.drawn, 3);
        assert_eq!(renderer.phase(), FramePhase::FrameDone);
    }
}
