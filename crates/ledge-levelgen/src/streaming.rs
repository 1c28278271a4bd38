//! Per-tick level streaming driven by the player's position.
//!
//! The game places the player at the spawn point returned by [`LevelSession::start`]
//! and calls [`LevelSession::update`] every tick. The session keeps the level
//! generated `lead_distance` units ahead of the player and skips the
//! generator entirely while the player has not moved past its previous
//! high-water mark.

use ledge_common::{LevelResult, Vec2};
use tracing::debug;

use crate::collision::CollisionBackend;
use crate::frontier::ExpansionReport;
use crate::generation::LevelGenerator;
use crate::rng::RandomSource;

/// A running level: a generator plus the lead-distance policy.
pub struct LevelSession<R, B> {
    generator: LevelGenerator<R, B>,
    lead_distance: f32,
    /// Highest target handed to the generator so far
    high_water: Option<f32>,
}

impl<R: RandomSource, B: CollisionBackend> LevelSession<R, B> {
    /// Wraps a generator, using its configured lead distance.
    #[must_use]
    pub fn new(generator: LevelGenerator<R, B>) -> Self {
        let lead_distance = generator.config().lead_distance;
        Self {
            generator,
            lead_distance,
            high_water: None,
        }
    }

    /// Generates the start of the level and returns the spawn position.
    pub fn start(&mut self) -> LevelResult<Vec2> {
        let spawn = self.generator.generate_level_start(self.lead_distance)?;
        self.high_water = Some(spawn.x + self.lead_distance);
        Ok(spawn)
    }

    /// Keeps the level generated ahead of `player_x`.
    ///
    /// Returns `None` when the target did not advance and the generator was
    /// not called.
    pub fn update(&mut self, player_x: f32) -> Option<ExpansionReport> {
        if !self.generator.is_started() {
            return None;
        }
        let target = player_x + self.lead_distance;
        if !target.is_finite() || self.high_water.is_some_and(|hw| target <= hw) {
            return None;
        }
        self.high_water = Some(target);

        let report = self.generator.generate_chunks_up_to(target);
        if !report.placed.is_empty() {
            debug!(
                "Player at x={player_x}: {} chunks placed, {} total",
                report.placed.len(),
                self.generator.index().len()
            );
        }
        Some(report)
    }

    /// Returns the lead distance.
    #[must_use]
    pub const fn lead_distance(&self) -> f32 {
        self.lead_distance
    }

    /// Returns the highest target generated toward.
    #[must_use]
    pub const fn high_water(&self) -> Option<f32> {
        self.high_water
    }

    /// Returns the underlying generator.
    #[must_use]
    pub const fn generator(&self) -> &LevelGenerator<R, B> {
        &self.generator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::collision::BoxCaster;
    use crate::generation::GeneratorConfig;
    use crate::rng::SeededRandom;
    use crate::template::ChunkTemplate;
    use ledge_common::Aabb;

    fn corridor(name: &str) -> ChunkTemplate {
        ChunkTemplate::boxed(
            name,
            Aabb::new(Vec2::ZERO, Vec2::new(4.0, 1.0)),
            Vec2::ZERO,
            vec![Vec2::new(4.0, 0.0)],
        )
    }

    fn session(lead: f32) -> LevelSession<SeededRandom, BoxCaster> {
        let catalog = Catalog::from_templates(vec![corridor("corridor")]).expect("catalog");
        let config = GeneratorConfig {
            lead_distance: lead,
            ..GeneratorConfig::with_seed(42)
        };
        let generator =
            LevelGenerator::from_config(config, catalog, corridor("start")).expect("generator");
        LevelSession::new(generator)
    }

    #[test]
    fn test_update_before_start_does_nothing() {
        let mut session = session(20.0);
        assert!(session.update(100.0).is_none());
        assert!(session.generator().index().is_empty());
    }

    #[test]
    fn test_start_generates_lead() {
        let mut session = session(20.0);
        let spawn = session.start().expect("start");
        assert_eq!(spawn, Vec2::ZERO);
        assert_eq!(session.high_water(), Some(20.0));
        let extent = session.generator().index().rightmost_extent().expect("chunks");
        assert!(extent > 20.0);
    }

    #[test]
    fn test_update_only_when_target_advances() {
        let mut session = session(20.0);
        session.start().expect("start");
        let before = session.generator().index().len();

        assert!(session.update(0.0).is_none());
        assert!(session.update(-5.0).is_none());
        assert_eq!(session.generator().index().len(), before);

        let report = session.update(30.0).expect("advanced");
        assert!(!report.placed.is_empty());
        assert_eq!(session.high_water(), Some(50.0));
        let extent = session.generator().index().rightmost_extent().expect("chunks");
        assert!(extent > 50.0);
    }
}
