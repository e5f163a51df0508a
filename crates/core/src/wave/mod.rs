//! Wave-table motion engine.
//!
//! Every horizontal displacement in the demo comes from here. Periodic
//! waveforms are quantized once into integer delta curves ([`curve`]), the
//! curves are chained into cumulative per-channel tables ([`table`]), and the
//! tables are read back with a periodic extrapolation rule ([`sampler`]) so
//! the animation never runs out of precomputed data.

pub mod curve;
pub mod sampler;
pub mod table;

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

pub use curve::{generate_curve, CurveSet};
pub use sampler::{sample, wrap_sum};
pub use table::{WaveChannel, WaveTable, WaveTables};

/// Named waveform shapes that can be chained into a wave table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaveKind {
    Zero,
    SlowSin,
    MedSin,
    FastSin,
    SlowDist,
    MedDist,
    FastDist,
    /// Double-period curve with an alternating third harmonic whose amplitude
    /// ramps in and out. Terminates every section.
    Splitted,
    BgSin1,
    BgSin2,
    BgSin3,
}

impl WaveKind {
    pub const ALL: [WaveKind; 11] = [
        WaveKind::Zero,
        WaveKind::SlowSin,
        WaveKind::MedSin,
        WaveKind::FastSin,
        WaveKind::SlowDist,
        WaveKind::MedDist,
        WaveKind::FastDist,
        WaveKind::Splitted,
        WaveKind::BgSin1,
        WaveKind::BgSin2,
        WaveKind::BgSin3,
    ];

    /// Angular step in degrees before the distortion rate is applied.
    pub fn base_step(self) -> f64 {
        match self {
            WaveKind::Zero => 2.25,
            WaveKind::SlowSin => 0.20,
            WaveKind::MedSin => 0.25,
            WaveKind::FastSin => 0.30,
            WaveKind::SlowDist => 0.12,
            WaveKind::MedDist => 0.16,
            WaveKind::FastDist => 0.20,
            WaveKind::Splitted => 0.18,
            WaveKind::BgSin1 => 0.50,
            WaveKind::BgSin2 => 0.80,
            WaveKind::BgSin3 => 0.50,
        }
    }

    /// Total phase drift, in pixels, accumulated over one cycle.
    ///
    /// Not affected by the distortion rate.
    pub fn progress(self) -> f64 {
        match self {
            WaveKind::SlowSin => 140.0,
            WaveKind::MedSin | WaveKind::SlowDist => 175.0,
            WaveKind::FastSin | WaveKind::MedDist => 210.0,
            WaveKind::FastDist => 245.0,
            WaveKind::Zero
            | WaveKind::Splitted
            | WaveKind::BgSin1
            | WaveKind::BgSin2
            | WaveKind::BgSin3 => 0.0,
        }
    }

    /// Angular span of one cycle in degrees.
    pub fn angle_limit(self) -> f64 {
        match self {
            WaveKind::Splitted => 720.0,
            _ => 360.0,
        }
    }

    /// Raw displacement in pixels at `degrees`; `sample` is the position of
    /// this sample inside its cycle.
    pub fn amplitude(self, degrees: f64, sample: usize) -> f64 {
        let rad = degrees * PI / 180.0;
        match self {
            WaveKind::Zero => 0.0,
            WaveKind::SlowSin => 100.0 * rad.sin(),
            WaveKind::MedSin => 110.0 * rad.sin(),
            WaveKind::FastSin => 120.0 * rad.sin(),
            WaveKind::SlowDist => 100.0 * rad.sin() + 25.0 * (rad * 10.0).sin(),
            WaveKind::MedDist => 110.0 * rad.sin() + 27.5 * (rad * 9.0).sin(),
            WaveKind::FastDist => 120.0 * rad.sin() + 30.0 * (rad * 8.0).sin(),
            WaveKind::Splitted => {
                const RAMP: f64 = 160.0;
                let dir = if sample % 2 == 1 { -1.0 } else { 1.0 };
                let limit = self.angle_limit();
                let mut amp = 12.0;
                if degrees < RAMP {
                    amp *= degrees / RAMP;
                } else if limit - RAMP < degrees {
                    amp *= (limit - degrees) / RAMP;
                }
                90.0 * rad.sin() + dir * amp * (rad * 3.0).sin()
            }
            WaveKind::BgSin1 | WaveKind::BgSin2 => -60.0 * rad.sin(),
            WaveKind::BgSin3 => -60.0 * rad.sin() - 15.0 * (rad * 4.0).sin(),
        }
    }

    pub(crate) fn slot(self) -> usize {
        self as usize
    }
}
