//! Presentation-side board rotation.
//!
//! Rotation is cosmetic. Move legality always uses the canonical
//! coordinates stored on the [`Board`](crate::topology::Board); only
//! rendering and hit-testing go through a [`RotationView`].

use std::f64::consts::{PI, TAU};

use serde::Serialize;

use crate::geometry::{Point, BOARD_CENTER};
use crate::topology::{Area, PlayerCount};

/// Radius around a node centre that counts as a click on it.
pub const HIT_RADIUS: f64 = 15.0;

/// Angle that turns `area` to face the viewer.
pub fn facing_angle(player_count: PlayerCount, area: Area) -> f64 {
    match (player_count, area) {
        (PlayerCount::Three, Area::Bottom) => -PI / 2.0 + 0.52,
        (PlayerCount::Three, Area::Right) => PI / 2.0 - 0.52,
        (PlayerCount::Three, Area::Top) => PI,
        (PlayerCount::Three, Area::Left) => 0.0,
        (_, Area::Top) => PI,
        (_, Area::Bottom) => 0.0,
        (_, Area::Right) => PI / 2.0,
        (_, Area::Left) => 3.0 * PI / 2.0,
    }
}

#[derive(Clone, Copy, PartialEq, Debug, Serialize)]
pub struct RotationView {
    pub enabled: bool,
    /// Current angle in radians. Not normalised: it accumulates the signed
    /// shortest turn at every change.
    pub angle: f64,
}

impl RotationView {
    pub fn new(enabled: bool) -> Self {
        RotationView {
            enabled,
            angle: 0.0,
        }
    }

    /// Turn toward the home area of the player now moving. Disabled views
    /// stay at 0.
    pub fn face(&mut self, player_count: PlayerCount, area: Area) {
        if !self.enabled {
            self.angle = 0.0;
            return;
        }
        let target = facing_angle(player_count, area);
        // `%` keeps the dividend's sign, so delta lies in (-3π, π).
        let delta = ((target - self.angle + PI) % TAU) - PI;
        self.angle += delta;
    }

    /// Where a canonical point is drawn.
    pub fn apply(&self, point: Point) -> Point {
        if !self.enabled {
            return point;
        }
        point.rotate_about(BOARD_CENTER, self.angle)
    }
}

impl Default for RotationView {
    fn default() -> Self {
        RotationView::new(false)
    }
}
