//! Seeded obstacle placement around the start point

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::Obstacle;
use crate::consts::SCATTER_ATTEMPTS;

/// Place `count` obstacles at uniform per-axis offsets in `[-spread, spread]`.
///
/// Candidates closer than `clearance` to `center` are re-rolled so the mover
/// doesn't start inside one. After `SCATTER_ATTEMPTS` tries the last
/// candidate is kept, so the count is always honoured.
pub fn scatter_obstacles(
    center: DVec2,
    count: usize,
    spread: f64,
    clearance: f64,
    seed: u64,
) -> Vec<Obstacle> {
    let mut rng = Pcg32::seed_from_u64(seed);
    let spread = spread.abs();

    (0..count as u32)
        .map(|id| {
            let mut pos = center;
            for _ in 0..SCATTER_ATTEMPTS {
                pos = center + random_offset(&mut rng, spread);
                if pos.distance(center) >= clearance {
                    break;
                }
            }
            Obstacle::new(id, pos)
        })
        .collect()
}

fn random_offset(rng: &mut Pcg32, spread: f64) -> DVec2 {
    if spread == 0.0 {
        return DVec2::ZERO;
    }
    DVec2::new(
        rng.random_range(-spread..=spread),
        rng.random_range(-spread..=spread),
    )
}
