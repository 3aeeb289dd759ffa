use super::ResamplingFilter;

/// Weights below this magnitude are dropped before normalization.
const NEGLIGIBLE_WEIGHT: f64 = 1e-9;

/// Support used when minification would shrink the kernel below one pixel.
const POINT_SAMPLING_SUPPORT: f64 = 0.5 + 1e-6;

/// One source sample and its weight in a destination sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contribution {
    pub pixel: usize,
    pub weight: f64,
}

/// Per-axis list of contributions for every destination index.
///
/// The entries of each destination index are sorted by source index,
/// carry no duplicates, and sum to one.
#[derive(Debug, Clone, PartialEq)]
pub struct ContributionTable {
    offsets: Vec<usize>,
    contributions: Vec<Contribution>,
}

impl ContributionTable {
    /// Maps `src_len` samples onto `dst_len` samples with `filter`.
    ///
    /// Destination index `i` is centred on source coordinate
    /// `(i + 0.5) / scale − 0.5`. When minifying, the kernel is stretched by
    /// `1 / scale`. Source indices outside `[0, src_len)` clamp to the border.
    pub fn new(filter: ResamplingFilter, src_len: usize, dst_len: usize) -> Self {
        assert!(src_len > 0 && dst_len > 0, "axis lengths must be positive");

        let scale = dst_len as f64 / src_len as f64;
        let (support, fscale) = if scale < 1.0 {
            let support = filter.support() / scale;
            if support <= 0.5 {
                (POINT_SAMPLING_SUPPORT, 1.0)
            } else {
                (support, 1.0 / scale)
            }
        } else {
            (filter.support(), 1.0)
        };

        let mut offsets = Vec::with_capacity(dst_len + 1);
        let mut contributions: Vec<Contribution> =
            Vec::with_capacity(dst_len * (2.0 * support + 1.0) as usize);
        offsets.push(0);

        for i in 0..dst_len {
            let start = contributions.len();
            let center = (i as f64 + 0.5) / scale - 0.5;
            let left = (center - support).ceil() as i64;
            let right = (center + support).floor() as i64;

            for j in left..=right {
                let weight = filter.weight((center - j as f64) / fscale);
                if weight.abs() < NEGLIGIBLE_WEIGHT {
                    continue;
                }
                let pixel = j.clamp(0, src_len as i64 - 1) as usize;
                // clamped indices repeat only at the ends, so duplicates are adjacent
                let repeated = contributions.len() > start
                    && contributions[contributions.len() - 1].pixel == pixel;
                if repeated {
                    let last = contributions.len() - 1;
                    contributions[last].weight += weight;
                } else {
                    contributions.push(Contribution { pixel, weight });
                }
            }

            let entries = &mut contributions[start..];
            let density: f64 = entries.iter().map(|c| c.weight).sum();
            if entries.is_empty() || density.abs() < NEGLIGIBLE_WEIGHT {
                contributions.truncate(start);
                contributions.push(Contribution {
                    pixel: (center.round().max(0.0) as usize).min(src_len - 1),
                    weight: 1.0,
                });
            } else {
                entries.iter_mut().for_each(|c| c.weight /= density);
            }
            offsets.push(contributions.len());
        }

        Self {
            offsets,
            contributions,
        }
    }

    /// Number of destination indices.
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Contributions to destination index `i`.
    #[inline]
    pub fn get(&self, i: usize) -> &[Contribution] {
        &self.contributions[self.offsets[i]..self.offsets[i + 1]]
    }

    pub fn iter(&self) -> impl Iterator<Item = &[Contribution]> + '_ {
        (0..self.len()).map(|i| self.get(i))
    }

    /// Smallest and largest source index read by destination indices `range`.
    pub fn source_span(&self, range: std::ops::Range<usize>) -> (usize, usize) {
        range
            .flat_map(|i| self.get(i).iter().map(|c| c.pixel))
            .fold((usize::MAX, 0), |(lo, hi), p| (lo.min(p), hi.max(p)))
    }
}
