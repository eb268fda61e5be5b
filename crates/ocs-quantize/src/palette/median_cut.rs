//! Weighted median cut palette selection.

use std::collections::HashMap;

use super::palette::Rgb;

/// Count distinct colors.
///
/// Returns `(color, count)` pairs sorted by color so that palette selection is
/// deterministic regardless of hash ordering.
pub fn histogram(pixels: &[Rgb]) -> Vec<(Rgb, u32)> {
    let mut counts: HashMap<Rgb, u32> = HashMap::new();
    for &pixel in pixels {
        *counts.entry(pixel).or_insert(0) += 1;
    }

    let mut entries: Vec<(Rgb, u32)> = counts.into_iter().collect();
    entries.sort_unstable_by_key(|&(color, _)| color);
    entries
}

/// A box of histogram entries for median cut subdivision.
#[derive(Debug, Clone)]
struct ColorBox {
    entries: Vec<(Rgb, u32)>,
}

impl ColorBox {
    fn new(entries: Vec<(Rgb, u32)>) -> Self {
        Self { entries }
    }

    fn total_weight(&self) -> u64 {
        self.entries.iter().map(|&(_, w)| w as u64).sum()
    }

    /// Range (max - min) along each channel.
    fn ranges(&self) -> [u8; 3] {
        let mut min = [u8::MAX; 3];
        let mut max = [u8::MIN; 3];
        for (color, _) in &self.entries {
            for c in 0..3 {
                min[c] = min[c].min(color[c]);
                max[c] = max[c].max(color[c]);
            }
        }
        [
            max[0].saturating_sub(min[0]),
            max[1].saturating_sub(min[1]),
            max[2].saturating_sub(min[2]),
        ]
    }

    fn can_split(&self) -> bool {
        self.entries.len() > 1
    }

    /// Split priority: heavy boxes with a wide channel range split first.
    fn priority(&self) -> u64 {
        let ranges = self.ranges();
        let widest = ranges[0].max(ranges[1]).max(ranges[2]) as u64;
        self.total_weight() * widest
    }

    /// Weighted mean color of the box, rounded to the nearest byte.
    fn average(&self) -> Rgb {
        let mut sums = [0u64; 3];
        let mut weight = 0u64;
        for &(color, w) in &self.entries {
            for c in 0..3 {
                sums[c] += color[c] as u64 * w as u64;
            }
            weight += w as u64;
        }
        if weight == 0 {
            return [0, 0, 0];
        }
        [
            ((sums[0] + weight / 2) / weight) as u8,
            ((sums[1] + weight / 2) / weight) as u8,
            ((sums[2] + weight / 2) / weight) as u8,
        ]
    }

    /// Split along the widest channel at the weighted median.
    fn split(mut self) -> (ColorBox, ColorBox) {
        let ranges = self.ranges();
        let axis = if ranges[0] >= ranges[1] && ranges[0] >= ranges[2] {
            0
        } else if ranges[1] >= ranges[2] {
            1
        } else {
            2
        };

        self.entries
            .sort_unstable_by_key(|&(color, _)| (color[axis], color));

        let half_weight = self.total_weight() / 2;
        let mut accumulated = 0u64;
        let mut split_idx = 1;
        for (i, &(_, w)) in self.entries.iter().enumerate() {
            accumulated += w as u64;
            if accumulated >= half_weight && i + 1 < self.entries.len() {
                split_idx = i + 1;
                break;
            }
        }
        split_idx = split_idx.clamp(1, self.entries.len() - 1);

        let right = self.entries.split_off(split_idx);
        (ColorBox::new(self.entries), ColorBox::new(right))
    }
}

/// Select up to `max_colors` representative colors from a histogram.
///
/// If the histogram already has `max_colors` or fewer entries, its colors are
/// returned unchanged. Otherwise boxes are split until the budget is reached
/// and each box contributes its weighted mean. The result never contains
/// duplicates.
pub fn median_cut(histogram: Vec<(Rgb, u32)>, max_colors: usize) -> Vec<Rgb> {
    if histogram.is_empty() || max_colors == 0 {
        return Vec::new();
    }

    if histogram.len() <= max_colors {
        return histogram.into_iter().map(|(color, _)| color).collect();
    }

    let mut boxes = Vec::with_capacity(max_colors);
    boxes.push(ColorBox::new(histogram));

    while boxes.len() < max_colors {
        let candidate = boxes
            .iter()
            .enumerate()
            .filter(|(_, b)| b.can_split())
            .max_by_key(|(i, b)| (b.priority(), std::cmp::Reverse(*i)))
            .map(|(i, _)| i);

        let Some(idx) = candidate else {
            break;
        };

        let (left, right) = boxes.swap_remove(idx).split();
        boxes.push(left);
        boxes.push(right);
    }

    let mut colors: Vec<Rgb> = Vec::with_capacity(boxes.len());
    for color in boxes.iter().map(ColorBox::average) {
        if !colors.contains(&color) {
            colors.push(color);
        }
    }
    colors.sort_unstable();
    colors
}
