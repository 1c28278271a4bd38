//! Headless level run: a player walking right at constant speed.

use std::fs;

use ledge_common::{Aabb, LedgeError, LedgeResult, Vec2};
use ledge_levelgen::{Catalog, CatalogFile, ChunkTemplate, ExitSlot, LevelGenerator, LevelSession};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::RunnerConfig;

/// Catalog used when no catalog file is configured.
pub const BUILTIN_CATALOG: &str = include_str!("../assets/default_catalog.ron");

/// One placed chunk in the summary.
#[derive(Debug, Clone, Serialize)]
pub struct ChunkSummary {
    /// Chunk id
    pub id: u32,
    /// Template name
    pub template: String,
    /// World position of the template origin
    pub position: Vec2,
    /// World-space solid bounds
    pub bounds: Aabb,
    /// Id of the chunk this one is attached to
    pub parent: Option<u32>,
}

/// Result of a simulated run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Seed the level was generated with
    pub seed: u64,
    /// Where the player spawned
    pub spawn: Vec2,
    /// Ticks simulated
    pub ticks: u32,
    /// Player x after the last tick
    pub final_player_x: f32,
    /// Chunks in the level
    pub chunk_count: usize,
    /// Chunks still waiting to be expanded
    pub leaf_count: usize,
    /// Right edge of the generated level
    pub rightmost_extent: Option<f32>,
    /// Ticks that actually called into the generator
    pub generator_passes: u32,
    /// Exits left as dead ends
    pub unresolved_exits: usize,
    /// Passes that hit the placement cap
    pub truncated_passes: u32,
    /// Every placed chunk, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunks: Option<Vec<ChunkSummary>>,
}

/// Reads the configured catalog file, or the built-in one.
pub fn load_catalog_file(config: &RunnerConfig) -> LedgeResult<CatalogFile> {
    let file = match &config.catalog_path {
        Some(path) => {
            info!("Loading chunk catalog from {}", path.display());
            let source = fs::read_to_string(path)?;
            CatalogFile::from_ron_str(&source)?
        },
        None => CatalogFile::from_ron_str(BUILTIN_CATALOG)?,
    };
    Ok(file)
}

/// Splits a catalog file into the starting template and the draw catalog.
///
/// The starting template is not drawn for regular placements.
pub fn prepare_catalog(
    file: CatalogFile,
    starting_template: &str,
) -> LedgeResult<(ChunkTemplate, Catalog)> {
    let start = file.template(starting_template).cloned().ok_or_else(|| {
        LedgeError::Config(format!("starting template {starting_template:?} not in catalog"))
    })?;
    let templates = file
        .templates
        .into_iter()
        .filter(|t| t.name != starting_template)
        .collect();
    let catalog = Catalog::from_templates(templates)?;
    Ok((start, catalog))
}

/// Runs the configured number of ticks and summarizes the level.
pub fn run(config: &RunnerConfig) -> LedgeResult<RunSummary> {
    let (start, catalog) = prepare_catalog(load_catalog_file(config)?, &config.starting_template)?;

    let rng = config.generator.random_source();
    let seed = rng.seed();
    info!("Level seed: {seed}, {} templates", catalog.len());

    let generator = LevelGenerator::new(config.generator.clone(), catalog, start, rng)?;
    let mut session = LevelSession::new(generator);
    let spawn = session.start()?;

    let step = config.player_speed * config.tick_seconds;
    let mut player_x = spawn.x;
    let mut generator_passes = 0;
    let mut truncated_passes = 0;

    for tick in 0..config.ticks {
        player_x += step;
        let Some(report) = session.update(player_x) else {
            continue;
        };
        generator_passes += 1;
        if report.truncated {
            truncated_passes += 1;
        }
        if !report.placed.is_empty() {
            debug!("Tick {tick}: placed {} chunks", report.placed.len());
        }
    }

    let generator = session.generator();
    if generator.leaves().is_empty() {
        info!("Level has no open exits left");
    }
    let unresolved_exits = generator
        .index()
        .iter()
        .flat_map(|c| c.exits())
        .filter(|slot| matches!(slot, ExitSlot::Unresolved { .. }))
        .count();

    let chunks = config.print_chunks.then(|| {
        generator
            .index()
            .iter()
            .map(|c| ChunkSummary {
                id: c.id().raw(),
                template: c.template().name.clone(),
                position: c.position(),
                bounds: c.bounds(),
                parent: c.parent().map(|link| link.chunk.raw()),
            })
            .collect()
    });

    Ok(RunSummary {
        seed,
        spawn,
        ticks: config.ticks,
        final_player_x: player_x,
        chunk_count: generator.index().len(),
        leaf_count: generator.leaves().len(),
        rightmost_extent: generator.index().rightmost_extent(),
        generator_passes,
        unresolved_exits,
        truncated_passes,
        chunks,
    })
}
