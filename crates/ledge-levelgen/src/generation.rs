//! Procedural level generation entry points.

use std::sync::Arc;

use ledge_common::{ChunkId, LevelError, LevelResult, Vec2};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::Catalog;
use crate::collision::{BoxCaster, CollisionBackend, DEFAULT_SEAM_TOLERANCE};
use crate::frontier::{
    ExpansionReport, FrontierPolicy, FrontierScheduler, DEFAULT_MAX_PLACEMENTS_PER_PASS,
};
use crate::placement::{PlacementConfig, PlacementEngine};
use crate::rng::{RandomSource, SeededRandom};
use crate::spatial_index::{Candidate, PlacedChunk, SpatialIndex};
use crate::template::ChunkTemplate;

/// Level generator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Level seed (None = random)
    pub seed: Option<u64>,
    /// Where the starting chunk's local origin is placed
    pub anchor: Vec2,
    /// How far ahead of the player the level is kept generated
    pub lead_distance: f32,
    /// Template draws and overlap cast
    pub placement: PlacementConfig,
    /// Handling of leaves beyond the target
    pub frontier_policy: FrontierPolicy,
    /// Safety cap on chunks placed by one pass
    pub max_placements_per_pass: usize,
    /// Overlap depth tolerated where chunks meet
    pub seam_tolerance: f32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: None,
            anchor: Vec2::ZERO,
            lead_distance: 20.0,
            placement: PlacementConfig::default(),
            frontier_policy: FrontierPolicy::default(),
            max_placements_per_pass: DEFAULT_MAX_PLACEMENTS_PER_PASS,
            seam_tolerance: DEFAULT_SEAM_TOLERANCE,
        }
    }
}

impl GeneratorConfig {
    /// Creates a config with a fixed seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        self.placement.max_attempts = self.placement.max_attempts.clamp(1, 1000);
        if !self.placement.cast_distance.is_finite() || self.placement.cast_distance <= 0.0 {
            self.placement.cast_distance = PlacementConfig::default().cast_distance;
        }
        if !self.placement.cast_direction.is_finite()
            || self.placement.cast_direction.length_squared() <= f32::EPSILON
        {
            self.placement.cast_direction = Vec2::Y;
        }
        if !self.lead_distance.is_finite() {
            self.lead_distance = Self::default().lead_distance;
        }
        self.lead_distance = self.lead_distance.max(0.0);
        if !self.anchor.is_finite() {
            self.anchor = Vec2::ZERO;
        }
        self.max_placements_per_pass = self.max_placements_per_pass.max(1);
        if !self.seam_tolerance.is_finite() {
            self.seam_tolerance = DEFAULT_SEAM_TOLERANCE;
        }
        self.seam_tolerance = self.seam_tolerance.clamp(0.0, 0.5);
    }

    /// Creates the random source this config asks for.
    #[must_use]
    pub fn random_source(&self) -> SeededRandom {
        self.seed.map_or_else(SeededRandom::from_entropy, SeededRandom::new)
    }
}

/// Streams chunks into a level, left to right.
///
/// Owns the spatial index and frontier for one level session.
pub struct LevelGenerator<R = SeededRandom, B = BoxCaster> {
    config: GeneratorConfig,
    catalog: Catalog,
    starting_template: Arc<ChunkTemplate>,
    index: SpatialIndex,
    frontier: FrontierScheduler,
    placement: PlacementEngine<B>,
    rng: R,
    start_chunk: Option<ChunkId>,
}

impl<R: RandomSource> LevelGenerator<R, BoxCaster> {
    /// Creates a generator using the box-sweep collision backend.
    pub fn new(
        config: GeneratorConfig,
        catalog: Catalog,
        starting_template: ChunkTemplate,
        rng: R,
    ) -> LevelResult<Self> {
        let backend = BoxCaster::new(config.seam_tolerance);
        Self::with_backend(config, catalog, starting_template, rng, backend)
    }
}

impl LevelGenerator {
    /// Creates a generator seeded from `config.seed`.
    pub fn from_config(
        config: GeneratorConfig,
        catalog: Catalog,
        starting_template: ChunkTemplate,
    ) -> LevelResult<Self> {
        let rng = config.random_source();
        info!("Level seed: {}", rng.seed());
        Self::new(config, catalog, starting_template, rng)
    }
}

impl<R: RandomSource, B: CollisionBackend> LevelGenerator<R, B> {
    /// Creates a generator with a custom collision backend.
    pub fn with_backend(
        mut config: GeneratorConfig,
        catalog: Catalog,
        starting_template: ChunkTemplate,
        rng: R,
        backend: B,
    ) -> LevelResult<Self> {
        starting_template.validate().map_err(|e| {
            LevelError::InvalidStartingTemplate(format!("{}: {e}", starting_template.name))
        })?;
        config.validate();

        let frontier =
            FrontierScheduler::new(config.frontier_policy, config.max_placements_per_pass);
        let placement = PlacementEngine::new(backend, config.placement);

        Ok(Self {
            config,
            catalog,
            starting_template: Arc::new(starting_template),
            index: SpatialIndex::new(),
            frontier,
            placement,
            rng,
            start_chunk: None,
        })
    }

    /// Places the starting chunk and generates `lead_distance` ahead of its entry.
    ///
    /// Returns the world position of the starting chunk's entry point, where
    /// the player should spawn.
    pub fn generate_level_start(&mut self, lead_distance: f32) -> LevelResult<Vec2> {
        if self.start_chunk.is_some() {
            return Err(LevelError::AlreadyStarted);
        }

        let position = self.config.anchor;
        let bounds = self
            .placement
            .backend()
            .bounding_box_of(&self.starting_template.shape, position)
            .ok_or_else(|| {
                LevelError::InvalidStartingTemplate(format!(
                    "{}: no solid geometry",
                    self.starting_template.name
                ))
            })?;

        let id = self.index.insert(Candidate {
            template: Arc::clone(&self.starting_template),
            position,
            bounds,
            parent: None,
        });
        self.frontier.push_leaf(id);
        self.start_chunk = Some(id);

        let spawn = position + self.starting_template.entry_point;
        info!(
            "Level started with {:?}, spawn at ({}, {})",
            self.starting_template.name, spawn.x, spawn.y
        );

        self.expand_to(spawn.x + lead_distance);
        Ok(spawn)
    }

    /// Generates chunks until the frontier reaches `x_position`.
    ///
    /// Safe to call every tick; calls with a target that is not larger than
    /// a previous one do nothing.
    pub fn generate_chunks_up_to(&mut self, x_position: f32) -> ExpansionReport {
        self.expand_to(x_position)
    }

    fn expand_to(&mut self, target_x: f32) -> ExpansionReport {
        self.frontier.expand_to(
            target_x,
            &mut self.index,
            &self.catalog,
            &self.placement,
            &mut self.rng,
        )
    }

    /// Returns the placed chunks.
    #[must_use]
    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    /// Returns the template catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Returns the current leaf chunks.
    #[must_use]
    pub fn leaves(&self) -> &[ChunkId] {
        self.frontier.leaves()
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Returns the starting chunk once the level has started.
    #[must_use]
    pub fn start_chunk(&self) -> Option<&PlacedChunk> {
        self.start_chunk.and_then(|id| self.index.get(id))
    }

    /// Returns true once `generate_level_start` has run.
    #[must_use]
    pub const fn is_started(&self) -> bool {
        self.start_chunk.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledge_common::Aabb;
    use std::collections::VecDeque;

    /// Replays a fixed list of draws.
    struct Scripted(VecDeque<usize>);

    impl RandomSource for Scripted {
        fn next_int(&mut self, min: usize, max_exclusive: usize) -> usize {
            let v = self.0.pop_front().expect("script exhausted");
            assert!((min..max_exclusive).contains(&v));
            v
        }
    }

    fn unit_box() -> Aabb {
        Aabb::new(Vec2::new(-1.0, -1.0), Vec2::new(1.0, 1.0))
    }

    fn template_a() -> ChunkTemplate {
        ChunkTemplate::boxed("A", unit_box(), Vec2::ZERO, vec![Vec2::new(5.0, 0.0)])
    }

    fn template_b() -> ChunkTemplate {
        ChunkTemplate::boxed("B", unit_box(), Vec2::ZERO, vec![])
    }

    #[test]
    fn test_start_then_dead_end() {
        let catalog = Catalog::from_templates(vec![template_a(), template_b()]).expect("catalog");
        // Catalog order is [A, B]; the only draw picks B
        let rng = Scripted(VecDeque::from(vec![1]));
        let mut generator =
            LevelGenerator::new(GeneratorConfig::default(), catalog, template_a(), rng).expect("generator");

        let spawn = generator.generate_level_start(6.0).expect("start");
        assert_eq!(spawn, Vec2::ZERO);

        let chunks: Vec<_> = generator.index().iter().collect();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].template().name, "A");
        assert_eq!(chunks[0].position(), Vec2::ZERO);
        assert_eq!(chunks[1].template().name, "B");
        assert_eq!(chunks[1].position(), Vec2::new(5.0, 0.0));
        assert!(generator.leaves().is_empty());

        // B has no exits, so nothing is left to grow
        let report = generator.generate_chunks_up_to(20.0);
        assert!(report.is_noop());
        assert_eq!(generator.index().len(), 2);
    }

    #[test]
    fn test_anchor_moves_spawn() {
        let catalog = Catalog::from_templates(vec![template_b()]).expect("catalog");
        let config = GeneratorConfig {
            anchor: Vec2::new(3.0, 4.0),
            ..GeneratorConfig::with_seed(1)
        };
        let start = ChunkTemplate::boxed("start", unit_box(), Vec2::new(-0.5, 0.0), vec![]);
        let mut generator = LevelGenerator::from_config(config, catalog, start).expect("generator");

        let spawn = generator.generate_level_start(10.0).expect("start");
        assert_eq!(spawn, Vec2::new(2.5, 4.0));
        let start_chunk = generator.start_chunk().expect("started");
        assert_eq!(start_chunk.bounds(), unit_box().translate(Vec2::new(3.0, 4.0)));
    }

    #[test]
    fn test_start_twice_is_error() {
        let catalog = Catalog::from_templates(vec![template_b()]).expect("catalog");
        let mut generator =
            LevelGenerator::from_config(GeneratorConfig::with_seed(9), catalog, template_b()).expect("generator");
        generator.generate_level_start(1.0).expect("first start");
        assert!(matches!(
            generator.generate_level_start(1.0),
            Err(LevelError::AlreadyStarted)
        ));
    }

    #[test]
    fn test_invalid_starting_template() {
        let catalog = Catalog::from_templates(vec![template_b()]).expect("catalog");
        let broken = ChunkTemplate::new("broken", ledge_common::Shape::default(), Vec2::ZERO, vec![]);
        let result = LevelGenerator::from_config(GeneratorConfig::default(), catalog, broken);
        assert!(matches!(result, Err(LevelError::InvalidStartingTemplate(_))));
    }

    #[test]
    fn test_generate_before_start_is_noop() {
        let catalog = Catalog::from_templates(vec![template_a()]).expect("catalog");
        let mut generator =
            LevelGenerator::from_config(GeneratorConfig::with_seed(2), catalog, template_a()).expect("generator");
        assert!(generator.generate_chunks_up_to(100.0).is_noop());
        assert!(generator.index().is_empty());
        assert!(!generator.is_started());
    }

    #[test]
    fn test_config_validation() {
        let mut config = GeneratorConfig {
            lead_distance: -5.0,
            max_placements_per_pass: 0,
            seam_tolerance: f32::NAN,
            placement: PlacementConfig {
                max_attempts: 0,
                cast_direction: Vec2::ZERO,
                cast_distance: -1.0,
            },
            ..GeneratorConfig::default()
        };
        config.validate();

        assert_eq!(config.placement.max_attempts, 1);
        assert_eq!(config.placement.cast_direction, Vec2::Y);
        assert!((config.placement.cast_distance - 0.1).abs() < f32::EPSILON);
        assert!(config.lead_distance.abs() < f32::EPSILON);
        assert_eq!(config.max_placements_per_pass, 1);
        assert!((config.seam_tolerance - DEFAULT_SEAM_TOLERANCE).abs() < f32::EPSILON);
    }
}
