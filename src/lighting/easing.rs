// =============================================================================
// EASING CURVES
// =============================================================================
//
// Penner-style "ease in" functions with the classic signature
// `ease(t, b, c, d)`: time `t` in `[0, d]`, start value `b`, total change `c`.
// For light falloff: t = distance, b = max light, c = -(max - min), d = radius.

use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

/// Falloff curve of a light source.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightEasing {
    #[default]
    Linear,
    Sine,
    Quad,
    Cubic,
    Quart,
    Quint,
    Expo,
    Circ,
}

impl LightEasing {
    /// Evaluate the curve. A zero duration yields the start value.
    pub fn ease(self, t: f64, b: f64, c: f64, d: f64) -> f64 {
        if d <= 0.0 {
            return b;
        }
        let p = (t / d).clamp(0.0, 1.0);
        match self {
            LightEasing::Linear => c * p + b,
            LightEasing::Sine => -c * (p * FRAC_PI_2).cos() + c + b,
            LightEasing::Quad => c * p * p + b,
            LightEasing::Cubic => c * p.powi(3) + b,
            LightEasing::Quart => c * p.powi(4) + b,
            LightEasing::Quint => c * p.powi(5) + b,
            LightEasing::Expo => {
                if p == 0.0 {
                    b
                } else {
                    c * 2f64.powf(10.0 * (p - 1.0)) + b
                }
            }
            LightEasing::Circ => -c * ((1.0 - p * p).sqrt() - 1.0) + b,
        }
    }
}
