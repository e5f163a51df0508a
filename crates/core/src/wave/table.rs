use serde::Serialize;

use super::WaveKind::*;
use super::{sampler, CurveSet, WaveKind};

/// Background channel, intro section.
pub const BACK_INTRO: [WaveKind; 5] = [Zero, Zero, Zero, Zero, Zero];

/// Background channel, looping section.
pub const BACK_MAIN: [WaveKind; 19] = [
    BgSin1, BgSin1, BgSin2, BgSin2, BgSin3, BgSin3, //
    BgSin1, BgSin1, BgSin2, BgSin2, BgSin3, BgSin3, //
    BgSin1, BgSin1, BgSin2, BgSin2, BgSin3, BgSin3, //
    Splitted,
];

/// Foreground (text) channel, intro section.
pub const FRONT_INTRO: [WaveKind; 14] = [
    Zero, Zero, Zero, Zero, Zero, //
    Zero, Zero, Zero, Zero, Zero, //
    FastSin, MedSin, SlowSin, Splitted,
];

/// Foreground (text) channel, looping section.
pub const FRONT_MAIN: [WaveKind; 13] = [
    SlowSin, SlowSin, SlowDist, SlowSin, //
    SlowSin, MedSin, FastSin, MedSin, //
    SlowSin, MedDist, MedSin, SlowSin, //
    Splitted,
];

/// Flattened running sum of a chain of curves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WaveTable(Vec<i32>);

impl WaveTable {
    /// Concatenates the curves named by `selectors`, accumulating across
    /// segment boundaries.
    pub fn build(selectors: &[WaveKind], curves: &CurveSet) -> Self {
        let mut count = 0;
        let offsets = selectors
            .iter()
            .flat_map(|&kind| curves.curve(kind).iter())
            .map(|delta| {
                count += delta;
                count
            })
            .collect();
        Self(offsets)
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Final cumulative offset, or zero for an empty table.
    pub fn last(&self) -> i32 {
        self.0.last().copied().unwrap_or(0)
    }
}

impl From<Vec<i32>> for WaveTable {
    fn from(offsets: Vec<i32>) -> Self {
        Self(offsets)
    }
}

/// Intro and looping tables of one displacement channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WaveChannel {
    pub intro: WaveTable,
    pub main: WaveTable,
}

impl WaveChannel {
    pub fn build(intro: &[WaveKind], main: &[WaveKind], curves: &CurveSet) -> Self {
        Self {
            intro: WaveTable::build(intro, curves),
            main: WaveTable::build(main, curves),
        }
    }

    /// Cumulative offset at logical `index`, extrapolated periodically past
    /// the end of the looping table.
    pub fn sample(&self, index: usize) -> i64 {
        sampler::sample(index, self.intro.as_slice(), self.main.as_slice())
    }
}

/// Both displacement channels, generated once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WaveTables {
    pub background: WaveChannel,
    pub foreground: WaveChannel,
}

impl WaveTables {
    pub fn generate(distortion_rate: f64) -> Self {
        let curves = CurveSet::generate(distortion_rate);
        Self::from_curves(&curves)
    }

    pub fn from_curves(curves: &CurveSet) -> Self {
        Self {
            background: WaveChannel::build(&BACK_INTRO, &BACK_MAIN, curves),
            foreground: WaveChannel::build(&FRONT_INTRO, &FRONT_MAIN, curves),
        }
    }
}
