//! Histogram binning and kernel density estimation for the univariate view.

use super::profile::percentile;

/// Equal-width histogram over `[edges[0], edges[last]]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `counts.len() + 1` ascending bin edges.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        match (self.edges.first(), self.edges.last()) {
            (Some(lo), Some(hi)) if !self.counts.is_empty() => (hi - lo) / self.counts.len() as f64,
            _ => 0.0,
        }
    }

    /// `(center, count)` per bin.
    pub fn bars(&self) -> impl Iterator<Item = (f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(w, c)| ((w[0] + w[1]) / 2.0, *c))
    }
}

/// Upper bound on the number of histogram bins.
pub const MAX_BINS: usize = 1_000;

/// Number of bins by the "auto" rule: the larger of the Sturges and
/// Freedman-Diaconis bin counts (FD is skipped when the IQR is zero).
///
/// A few extreme outliers can push the FD count into the millions; when it
/// exceeds [`MAX_BINS`] the Sturges count is used instead.
pub fn auto_bin_count(sorted: &[f64]) -> usize {
    let n = sorted.len();
    if n < 2 {
        return 1;
    }
    let range = sorted[n - 1] - sorted[0];
    if !range.is_finite() || range == 0.0 {
        return 1;
    }

    let sturges = ((n as f64).log2() + 1.0).ceil() as usize;
    let iqr = percentile(sorted, 0.75) - percentile(sorted, 0.25);
    let fd = if iqr > 0.0 {
        let width = 2.0 * iqr / (n as f64).cbrt();
        range / width
    } else {
        0.0
    };
    let fd = if fd.is_finite() && fd <= MAX_BINS as f64 {
        fd.ceil() as usize
    } else {
        0
    };
    sturges.max(fd).clamp(1, MAX_BINS)
}

/// Bin `values` with [`auto_bin_count`] bins. Empty input gives an empty
/// histogram; a constant column gives one bin of width 1 around the value.
pub fn histogram(values: &[f64]) -> Histogram {
    if values.is_empty() {
        return Histogram {
            edges: Vec::new(),
            counts: Vec::new(),
        };
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let (mut lo, mut hi) = (sorted[0], sorted[sorted.len() - 1]);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let bins = auto_bin_count(&sorted);
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for v in &sorted {
        // the last edge is inclusive
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    let edges = (0..=bins).map(|i| lo + width * i as f64).collect();

    Histogram { edges, counts }
}

/// Gaussian KDE using Scott's bandwidth (`std * n^(-1/5)`), evaluated at
/// `points` evenly spaced positions over `[min, max]`.
///
/// The density is multiplied by `scale` so it can sit on top of a count
/// histogram (`scale = n * bin_width`). Returns nothing when the bandwidth is
/// undefined (fewer than two values or zero spread).
pub fn kde(values: &[f64], points: usize, scale: f64) -> Vec<[f64; 2]> {
    let n = values.len();
    if n < 2 || points < 2 {
        return Vec::new();
    }
    let nf = n as f64;
    let mean = values.iter().sum::<f64>() / nf;
    let std = (values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (nf - 1.0)).sqrt();
    let bandwidth = std * nf.powf(-0.2);
    if !(bandwidth > 0.0) {
        return Vec::new();
    }

    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let step = (hi - lo) / (points - 1) as f64;
    let norm = 1.0 / (nf * bandwidth * (2.0 * std::f64::consts::PI).sqrt());

    (0..points)
        .map(|i| {
            let x = lo + step * i as f64;
            let density: f64 = values
                .iter()
                .map(|v| {
                    let u = (x - v) / bandwidth;
                    (-0.5 * u * u).exp()
                })
                .sum::<f64>()
                * norm;
            [x, density * scale]
        })
        .collect()
}
