use std::f32::consts::TAU;
use std::sync::Arc;

use anyhow::{Context, Result};
use glam::{IVec3, Vec3};
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;

use chunkview::{
    render::HeadlessMeshBuilder,
    world::{BlockId, CHUNK_H},
    BlockRegistry, Camera, Chunk, Chunks, ChunksRenderer, FrameStats, HeadlessContext, Level,
    RenderConfig, WorldRenderer,
};

const GRID: u32 = 16;
const FRAMES: u32 = 120;
const ORBIT_RADIUS: f32 = 96.0;

fn build_level() -> Result<Level> {
    let half = GRID as i32 / 2;
    let mut level = Level::new(Chunks::new(GRID, GRID, -half, -half), BlockRegistry::default());

    for z in -half..half {
        for x in -half..half {
            let chunk = Chunk::new(x, z);
            // Leave a ring of chunks unlit along the far edge, as if still streaming.
            chunk.set_lighted(z < half - 1);
            level
                .show_chunk(Arc::new(chunk))
                .with_context(|| format!("Failed to place chunk ({x}, {z})"))?;
        }
    }

    level.player.chosen_block = BlockId(6);
    level.player.debug = true;
    level.player_controller.select(BlockId(5), IVec3::new(3, 64, -2));
    Ok(level)
}

fn main() -> Result<()> {
    SimpleLogger::new().with_level(LevelFilter::Info).init()?;

    let config = match std::env::args().nth(1) {
        Some(path) => RenderConfig::load(&path).with_context(|| format!("Failed to load {path}"))?,
        None => RenderConfig::default(),
    };

    let level = build_level()?;
    info!("Level ready with {} chunks", level.chunks.read().loaded());

    let mut gfx = HeadlessContext::new(1280, 720);
    let mut renderer = WorldRenderer::new(
        &level,
        ChunksRenderer::new(HeadlessMeshBuilder::new()),
        config,
    );
    let mut camera = Camera::new(Vec3::new(ORBIT_RADIUS, CHUNK_H as f32 * 0.4, 0.0), 70.0, 16.0 / 9.0);

    let mut totals = FrameStats::default();
    for frame in 0..FRAMES {
        let angle = frame as f32 / FRAMES as f32 * TAU;
        camera.position.x = angle.cos() * ORBIT_RADIUS;
        camera.position.z = angle.sin() * ORBIT_RADIUS;
        camera.look_along(Vec3::new(-camera.position.x, -20.0, -camera.position.z));

        if frame == FRAMES / 2 {
            let evicted = level.translate(1, 0);
            info!("Shifted loaded area, {} chunks hidden", evicted);
        }

        gfx.take_commands();
        let stats = renderer.draw(&mut gfx, &camera, &level, true);
        if frame % 30 == 0 {
            info!("Frame {}: {} ({} GPU calls)", frame, stats, gfx.draw_calls());
        }

        totals += stats;
    }

    info!("{} frames: {}", FRAMES, totals);
    info!("{} meshes cached", renderer.cache().len());
    Ok(())
}
