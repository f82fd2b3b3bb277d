//! Tapering window functions and overlap-add gain normalization.

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use crate::config::ConfigError;

/// Window function types.
///
/// All tapering windows are generated in their periodic form (`i / n` rather
/// than `i / (n - 1)`), which is the form that sums to a constant when shifted
/// by `n / steps` for the usual step counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WindowFunction {
    /// Rectangular (no windowing)
    Rectangular,
    /// Hann window (raised cosine)
    Hann,
    /// Hamming window
    Hamming,
    /// Blackman window
    Blackman,
    /// Blackman-Harris window (better sidelobe suppression)
    BlackmanHarris,
}

impl WindowFunction {
    /// All window functions, in declaration order.
    pub const ALL: [WindowFunction; 5] = [
        WindowFunction::Rectangular,
        WindowFunction::Hann,
        WindowFunction::Hamming,
        WindowFunction::Blackman,
        WindowFunction::BlackmanHarris,
    ];

    /// Whether this is the trivial (all-ones) window.
    pub fn is_rectangular(self) -> bool {
        self == WindowFunction::Rectangular
    }

    /// Short lowercase name, matching the serialized form.
    pub fn name(self) -> &'static str {
        match self {
            WindowFunction::Rectangular => "rectangular",
            WindowFunction::Hann => "hann",
            WindowFunction::Hamming => "hamming",
            WindowFunction::Blackman => "blackman",
            WindowFunction::BlackmanHarris => "blackman-harris",
        }
    }

    /// Parse a window name as accepted on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "rectangular" | "rect" | "none" => Some(WindowFunction::Rectangular),
            "hann" | "hanning" => Some(WindowFunction::Hann),
            "hamming" => Some(WindowFunction::Hamming),
            "blackman" => Some(WindowFunction::Blackman),
            "blackman-harris" | "blackmanharris" => Some(WindowFunction::BlackmanHarris),
            _ => None,
        }
    }

    /// Apply window to a buffer
    pub fn apply(&self, buffer: &mut [f32]) {
        let n = buffer.len() as f32;
        match self {
            WindowFunction::Rectangular => {}
            WindowFunction::Hann => {
                for (i, sample) in buffer.iter_mut().enumerate() {
                    *sample *= 0.5 * (1.0 - (2.0 * PI * i as f32 / n).cos());
                }
            }
            WindowFunction::Hamming => {
                for (i, sample) in buffer.iter_mut().enumerate() {
                    *sample *= 0.54 - 0.46 * (2.0 * PI * i as f32 / n).cos();
                }
            }
            WindowFunction::Blackman => {
                for (i, sample) in buffer.iter_mut().enumerate() {
                    let x = 2.0 * PI * i as f32 / n;
                    *sample *= 0.42 - 0.5 * x.cos() + 0.08 * (2.0 * x).cos();
                }
            }
            WindowFunction::BlackmanHarris => {
                for (i, sample) in buffer.iter_mut().enumerate() {
                    let x = 2.0 * PI * i as f32 / n;
                    *sample *= 0.35875 - 0.48829 * x.cos() + 0.14128 * (2.0 * x).cos()
                        - 0.01168 * (3.0 * x).cos();
                }
            }
        }
    }

    /// Get window coefficients, or `None` for the rectangular window.
    pub fn coefficients(&self, size: usize) -> Option<Vec<f32>> {
        if self.is_rectangular() {
            return None;
        }
        let mut coeffs = vec![1.0; size];
        self.apply(&mut coeffs);
        Some(coeffs)
    }
}

impl std::fmt::Display for WindowFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Which side of the transform carries the overlap-add gain correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaledSide {
    /// The synthesis window is scaled (it is tapering).
    Synthesis,
    /// The synthesis window is rectangular, so the analysis window is scaled.
    Analysis,
}

/// Analysis/synthesis window pair with a precomputed overlap-add gain.
///
/// Overlap-adding the product `analysis[i] * synthesis[i]` every `step`
/// samples gives a constant for the supported window/step combinations. The
/// reciprocal of that constant is folded into one of the two windows so that
/// reconstruction needs no further gain stage.
#[derive(Debug, Clone)]
pub struct WindowPair {
    analysis: Option<Vec<f32>>,
    synthesis: Option<Vec<f32>>,
    scale: f32,
    scaled_side: ScaledSide,
}

impl WindowPair {
    /// Build the pair for `window_size` samples advanced by `step` per hop.
    pub fn new(
        analysis: WindowFunction,
        synthesis: WindowFunction,
        window_size: usize,
        step: usize,
    ) -> Result<Self, ConfigError> {
        if analysis.is_rectangular() && synthesis.is_rectangular() {
            return Err(ConfigError::BothWindowsRectangular);
        }

        let analysis_coeffs = analysis.coefficients(window_size);
        let synthesis_coeffs = synthesis.coefficients(window_size);

        // Mean over every starting offset of the product sum sampled each
        // `step`; equal to the sampled sum when the pair overlaps to a constant.
        let product_sum: f64 = (0..window_size)
            .map(|i| {
                let a = analysis_coeffs.as_ref().map_or(1.0, |w| w[i]);
                let s = synthesis_coeffs.as_ref().map_or(1.0, |w| w[i]);
                f64::from(a) * f64::from(s)
            })
            .sum();
        let overlap_gain = product_sum / step as f64;
        if overlap_gain <= f64::EPSILON {
            return Err(ConfigError::DegenerateWindowPair {
                analysis,
                synthesis,
            });
        }

        let scaled_side = if synthesis.is_rectangular() {
            ScaledSide::Analysis
        } else {
            ScaledSide::Synthesis
        };

        Ok(Self {
            analysis: analysis_coeffs,
            synthesis: synthesis_coeffs,
            scale: (1.0 / overlap_gain) as f32,
            scaled_side,
        })
    }

    /// Overlap-add gain correction folded into one of the windows.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Which window receives [`scale`](Self::scale).
    pub fn scaled_side(&self) -> ScaledSide {
        self.scaled_side
    }

    /// Analysis window coefficients for a session.
    ///
    /// With `with_output` the gain correction is included when it lives on
    /// the analysis side; analysis-only sessions see the raw window.
    pub fn analysis(&self, with_output: bool) -> Option<Vec<f32>> {
        let mut coeffs = self.analysis.clone()?;
        if with_output && self.scaled_side == ScaledSide::Analysis {
            coeffs.iter_mut().for_each(|c| *c *= self.scale);
        }
        Some(coeffs)
    }

    /// Synthesis window coefficients, gain correction included.
    pub fn synthesis(&self) -> Option<Vec<f32>> {
        let mut coeffs = self.synthesis.clone()?;
        if self.scaled_side == ScaledSide::Synthesis {
            coeffs.iter_mut().for_each(|c| *c *= self.scale);
        }
        Some(coeffs)
    }
}
