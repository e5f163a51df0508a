use serde::Serialize;

use super::WaveKind;

// Absorbs representation error when the step does not divide the span exactly
// (e.g. 360 / 0.3).
const SAMPLE_EPSILON: f64 = 1e-9;

/// Largest curve [`generate_curve`] will produce.
pub const MAX_CURVE_SAMPLES: usize = 1 << 20;

/// Quantizes one cycle of `kind` into integer deltas.
///
/// The kind is sampled at `0, step, 2*step, ..` up to and including
/// `limit - step`. Each sample is biased by a decal that grows by
/// `progress / samples` per sample, floored and negated; the output holds the
/// difference to the previous quantized value, so a running sum reproduces
/// the curve at pixel precision with the drift baked in.
///
/// A non-positive step, or one so small that the cycle would exceed
/// [`MAX_CURVE_SAMPLES`], yields an empty curve.
pub fn generate_curve(kind: WaveKind, step: f64, progress: f64, limit: f64) -> Vec<i32> {
    if !(step.is_finite() && step > 0.0) {
        return Vec::new();
    }

    let span = (limit / step + SAMPLE_EPSILON).floor();
    if !(0.0..=MAX_CURVE_SAMPLES as f64).contains(&span) {
        tracing::warn!(?kind, step, limit, "curve step out of range, generating nothing");
        return Vec::new();
    }
    let count = span as usize;
    let raw: Vec<f64> = (0..count)
        .map(|sample| kind.amplitude(sample as f64 * step, sample))
        .collect();

    let increment = progress / count.max(1) as f64;
    let mut decal = 0.0;
    let mut previous = 0;
    raw.iter()
        .map(|value| {
            let quantized = -((value - decal).floor() as i32);
            let delta = quantized - previous;
            previous = quantized;
            decal += increment;
            delta
        })
        .collect()
}

/// One generated curve per [`WaveKind`], built once and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurveSet {
    curves: Vec<Vec<i32>>,
}

impl CurveSet {
    /// Generates every curve with its step scaled by `distortion_rate`.
    ///
    /// Only the step is scaled. Progress constants keep their nominal value,
    /// which changes the drift rate per sample along with the step.
    pub fn generate(distortion_rate: f64) -> Self {
        let curves = WaveKind::ALL
            .iter()
            .map(|&kind| {
                generate_curve(
                    kind,
                    kind.base_step() * distortion_rate,
                    kind.progress(),
                    kind.angle_limit(),
                )
            })
            .collect();
        Self { curves }
    }

    pub fn curve(&self, kind: WaveKind) -> &[i32] {
        &self.curves[kind.slot()]
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn net_shift(kind: WaveKind) -> i32 {
        CurveSet::generate(1.0).curve(kind).iter().sum()
    }

    #[test]
    fn zero_curve_is_160_zeros() {
        let curves = CurveSet::generate(1.0);
        let zero = curves.curve(WaveKind::Zero);
        assert_eq!(zero.len(), 160);
        assert!(zero.iter().all(|&delta| delta == 0));
    }

    #[rstest]
    #[case(WaveKind::SlowSin, 1800)]
    #[case(WaveKind::MedSin, 1440)]
    #[case(WaveKind::FastSin, 1200)]
    #[case(WaveKind::SlowDist, 3000)]
    #[case(WaveKind::MedDist, 2250)]
    #[case(WaveKind::FastDist, 1800)]
    #[case(WaveKind::Splitted, 4000)]
    #[case(WaveKind::BgSin1, 720)]
    #[case(WaveKind::BgSin2, 450)]
    #[case(WaveKind::BgSin3, 720)]
    fn sample_counts_cover_one_cycle(#[case] kind: WaveKind, #[case] expected: usize) {
        assert_eq!(CurveSet::generate(1.0).curve(kind).len(), expected);
    }

    #[rstest]
    #[case(WaveKind::Zero)]
    #[case(WaveKind::SlowSin)]
    #[case(WaveKind::MedSin)]
    #[case(WaveKind::FastSin)]
    #[case(WaveKind::SlowDist)]
    #[case(WaveKind::MedDist)]
    #[case(WaveKind::FastDist)]
    #[case(WaveKind::Splitted)]
    #[case(WaveKind::BgSin1)]
    #[case(WaveKind::BgSin2)]
    #[case(WaveKind::BgSin3)]
    fn one_cycle_nets_the_progress_drift(#[case] kind: WaveKind) {
        let shift = net_shift(kind) as f64;
        assert!(
            (shift - kind.progress()).abs() <= 3.0,
            "{kind:?} drifted by {shift}, expected about {}",
            kind.progress()
        );
    }

    #[test]
    fn running_sum_tracks_the_continuous_curve() {
        let curve = CurveSet::generate(1.0);
        let deltas = curve.curve(WaveKind::SlowSin);
        let step = WaveKind::SlowSin.base_step();
        let increment = WaveKind::SlowSin.progress() / deltas.len() as f64;

        let mut sum = 0;
        for (sample, delta) in deltas.iter().enumerate() {
            sum += delta;
            let expected =
                -WaveKind::SlowSin.amplitude(sample as f64 * step, sample) + increment * sample as f64;
            assert!((sum as f64 - expected).abs() <= 1.0, "sample {sample}");
        }
    }

    #[test]
    fn generation_is_deterministic() {
        assert_eq!(CurveSet::generate(1.0), CurveSet::generate(1.0));
        assert_eq!(CurveSet::generate(0.7), CurveSet::generate(0.7));
    }

    #[test]
    fn distortion_rate_scales_step_but_not_progress() {
        let fast = CurveSet::generate(2.0);
        assert_eq!(fast.curve(WaveKind::SlowSin).len(), 900);
        assert_eq!(fast.curve(WaveKind::Zero).len(), 80);

        let shift: i32 = fast.curve(WaveKind::SlowSin).iter().sum();
        assert!((shift as f64 - 140.0).abs() <= 3.0);
    }

    #[test]
    fn degenerate_step_yields_empty_curve() {
        assert!(generate_curve(WaveKind::SlowSin, 0.0, 140.0, 360.0).is_empty());
        assert!(generate_curve(WaveKind::SlowSin, f64::NAN, 140.0, 360.0).is_empty());
    }

    #[test]
    fn tiny_step_is_refused_instead_of_allocating() {
        assert!(generate_curve(WaveKind::SlowSin, 0.2 * 1e-300, 140.0, 360.0).is_empty());
        assert!(generate_curve(WaveKind::SlowSin, 1e-9, 140.0, 360.0).is_empty());
        assert!(generate_curve(WaveKind::Splitted, 0.18, 0.0, f64::INFINITY).is_empty());

        let at_ceiling = 360.0 / MAX_CURVE_SAMPLES as f64;
        assert_eq!(
            generate_curve(WaveKind::Zero, at_ceiling, 0.0, 360.0).len(),
            MAX_CURVE_SAMPLES
        );
    }

    #[test]
    fn smallest_accepted_rate_stays_bounded() {
        let rate = *crate::config::DISTORTION_RATE_RANGE.start();
        let curves = CurveSet::generate(rate);
        for &kind in &WaveKind::ALL {
            let len = curves.curve(kind).len();
            assert!(len > 0 && len <= 400_000, "{kind:?} has {len} samples");
        }
    }
}
