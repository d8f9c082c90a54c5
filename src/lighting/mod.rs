mod easing;

pub use easing::LightEasing;

use serde::{Deserialize, Serialize};

use crate::geometry::MapCoord;

/// Largest radius a light is ever evaluated over, in tiles.
pub const MAX_LIGHT_RADIUS: i32 = 128;

/// Brightness at which the ambient source switches the map to full-bright.
pub const FULL_BRIGHT: u8 = 255;

// ── LightSource ───────────────────────────────────────────────────────────────

/// A radial light: `max_light` at the centre easing to `min_light` at `radius`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct LightSource {
    pub min_light: u8,
    pub max_light: u8,
    pub radius: u8,
    pub easing: LightEasing,
}

impl LightSource {
    pub const fn new(min_light: u8, max_light: u8, radius: u8, easing: LightEasing) -> Self {
        Self { min_light, max_light, radius, easing }
    }

    /// Ambient source that puts a map in full-bright mode.
    pub const fn full_bright() -> Self {
        Self::new(0, FULL_BRIGHT, 0, LightEasing::Linear)
    }

    /// A source that can never contribute light and is ignored everywhere.
    #[inline]
    pub fn is_inert(&self) -> bool {
        self.max_light == 0 || self.min_light > self.max_light
    }

    /// Radius actually evaluated, capped at `MAX_LIGHT_RADIUS`.
    #[inline]
    pub fn effective_radius(&self) -> i32 {
        (self.radius as i32).min(MAX_LIGHT_RADIUS)
    }

    /// Light contributed at `distance` tiles from the centre, rounded to the
    /// nearest integer.
    pub fn light_at(&self, distance: f64) -> u8 {
        let range = self.max_light as f64 - self.min_light as f64;
        let eased = self
            .easing
            .ease(distance, self.max_light as f64, -range, self.radius as f64);
        eased.round().clamp(0.0, FULL_BRIGHT as f64) as u8
    }
}

// ── PendingLight ──────────────────────────────────────────────────────────────

/// A queued light change, applied by `LevelMap::update_lights`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PendingLight {
    pub position: MapCoord,
    pub source: LightSource,
    pub remove: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inert_sources() {
        assert!(LightSource::new(0, 0, 4, LightEasing::Linear).is_inert());
        assert!(LightSource::new(10, 5, 4, LightEasing::Linear).is_inert());
        assert!(!LightSource::new(5, 5, 4, LightEasing::Linear).is_inert());
    }

    #[test]
    fn light_at_rounds_to_nearest() {
        let ls = LightSource::new(0, 100, 3, LightEasing::Linear);
        assert_eq!(ls.light_at(0.0), 100);
        assert_eq!(ls.light_at(1.0), 67);
        assert_eq!(ls.light_at(2.0), 33);
        assert_eq!(ls.light_at(3.0), 0);
    }

    #[test]
    fn radius_is_capped() {
        let ls = LightSource::new(0, 100, 200, LightEasing::Linear);
        assert_eq!(ls.effective_radius(), MAX_LIGHT_RADIUS);
    }
}
