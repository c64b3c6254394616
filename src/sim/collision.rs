//! Position update and obstacle contact
//!
//! Contact is a velocity-killing event, not a positional correction: the
//! mover lands wherever this tick's velocity takes it (possibly inside an
//! obstacle's radius) and stops there.

use glam::DVec2;

use super::state::Obstacle;

/// Result of moving one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    /// Position after applying velocity (never rolled back)
    pub position: DVec2,
    /// Velocity to feed into the next integration, zero on contact
    pub velocity: DVec2,
    /// Id of the obstacle that was hit, lowest id if several
    pub contact: Option<u32>,
}

impl Resolution {
    pub fn hit(&self) -> bool {
        self.contact.is_some()
    }
}

/// Move by `velocity` and stop on contact with any obstacle.
///
/// Velocity is world motion, so the mover travels opposite to it.
pub fn resolve(
    prev_position: DVec2,
    velocity: DVec2,
    obstacles: &[Obstacle],
    collision_radius: f64,
) -> Resolution {
    let position = prev_position - velocity;

    let contact = obstacles
        .iter()
        .filter(|o| o.touches(position, collision_radius))
        .map(|o| o.id)
        .min();

    Resolution {
        position,
        velocity: if contact.is_some() { DVec2::ZERO } else { velocity },
        contact,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obstacle(id: u32, x: f64, y: f64) -> Obstacle {
        Obstacle::new(id, DVec2::new(x, y))
    }

    #[test]
    fn test_position_moves_against_velocity() {
        let res = resolve(DVec2::new(10.0, 10.0), DVec2::new(1.0, -2.0), &[], 1.0);
        assert_eq!(res.position, DVec2::new(9.0, 12.0));
        assert_eq!(res.velocity, DVec2::new(1.0, -2.0));
        assert!(!res.hit());
    }

    #[test]
    fn test_contact_zeroes_velocity_without_rollback() {
        let obstacles = [obstacle(0, 0.0, 0.0)];
        // Lands 0.5 from the obstacle with radius 1.0
        let res = resolve(DVec2::new(1.5, 0.0), DVec2::new(1.0, 0.0), &obstacles, 1.0);
        assert_eq!(res.position, DVec2::new(0.5, 0.0));
        assert_eq!(res.velocity, DVec2::ZERO);
        assert_eq!(res.contact, Some(0));
    }

    #[test]
    fn test_contact_is_strictly_inside_radius() {
        let obstacles = [obstacle(0, 0.0, 0.0)];
        // Lands exactly on the radius
        let res = resolve(DVec2::new(2.0, 0.0), DVec2::new(1.0, 0.0), &obstacles, 1.0);
        assert_eq!(res.position, DVec2::new(1.0, 0.0));
        assert!(!res.hit());
        assert_eq!(res.velocity, DVec2::new(1.0, 0.0));
    }

    #[test]
    fn test_reports_lowest_id_on_multiple_contacts() {
        let obstacles = [
            obstacle(7, 0.1, 0.0),
            obstacle(3, -0.1, 0.0),
            obstacle(9, 50.0, 50.0),
        ];
        let res = resolve(DVec2::new(0.0, 1.0), DVec2::new(0.0, 1.0), &obstacles, 0.5);
        assert_eq!(res.contact, Some(3));
    }

    #[test]
    fn test_stationary_mover_inside_radius_stays_stopped() {
        let obstacles = [obstacle(0, 0.0, 0.0)];
        let res = resolve(DVec2::new(0.2, 0.0), DVec2::ZERO, &obstacles, 1.0);
        assert_eq!(res.position, DVec2::new(0.2, 0.0));
        assert_eq!(res.velocity, DVec2::ZERO);
        assert!(res.hit());
    }

    #[test]
    fn test_map_scale_contact() {
        // Reference tuning: one max-speed tick north into a 0.0001 radius
        let start = DVec2::new(-73.9857, 40.7484);
        let obstacles = [obstacle(0, -73.9857, 40.74848)];
        let res = resolve(start, DVec2::new(0.0, -0.00001), &obstacles, 0.0001);
        assert!(res.hit());
        assert!((res.position.y - 40.74841).abs() < 1e-12);
    }
}
