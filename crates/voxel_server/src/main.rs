//! Headless streaming driver.
//!
//! Runs the engine the way a dedicated server would: a fixed tick loop
//! moving a focal point through a flat world, logging how the working set
//! evolves. Pass a TOML config path as the only argument to override the
//! defaults.

use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use voxel_world::{FlatGenerator, VoxelWorld, WorldConfig};

const TICKS: u32 = 300;
const TICK_INTERVAL: Duration = Duration::from_millis(50);
/// Focal point speed, in blocks per tick.
const SPEED: i32 = 2;

fn load_config() -> WorldConfig {
    let Some(path) = std::env::args().nth(1) else {
        return WorldConfig::default();
    };
    match std::fs::read_to_string(&path) {
        Ok(raw) => match WorldConfig::from_toml_str(&raw) {
            Ok(config) => config,
            Err(err) => {
                warn!("invalid config {path}: {err}; using defaults");
                WorldConfig::default()
            }
        },
        Err(err) => {
            warn!("cannot read config {path}: {err}; using defaults");
            WorldConfig::default()
        }
    }
}

fn main() {
    env_logger::init();
    info!("voxel world server v{}", voxel_world::version());

    let config = load_config();
    let radius = config.view_radius;
    let mut world = VoxelWorld::with_config(Some(Arc::new(FlatGenerator::new())), config);
    world.start_streaming();

    let mut focal_x = 0;
    let focal_z = 0;
    for tick in 0..TICKS {
        world.update_streaming(focal_x, focal_z, radius);
        info!(
            "tick {tick} | focal ({focal_x}, {focal_z}) | loaded {} | queued gen {}",
            world.store().len(),
            world.queued_generation_jobs()
        );
        focal_x += SPEED;
        std::thread::sleep(TICK_INTERVAL);
    }

    world.stop_streaming();
    info!("server shutdown");
}
