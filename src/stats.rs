//! Descriptive statistics over a single sample set.
//!
//! All functions are pure. The input slice is never reordered: the median is taken
//! from a sorted copy.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Summary of one (report, test case) sample set, in the producer's unit (seconds).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub median: f64,
    pub mean: f64,
    /// Population standard deviation (no Bessel correction).
    pub stdev: f64,
    pub min: f64,
    pub max: f64,
}

/// A [`Summary`] converted to whole milliseconds for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MillisSummary {
    pub samples: usize,
    pub median: i64,
    pub mean: i64,
    pub stdev: i64,
    pub min: i64,
    pub max: i64,
}

/// Summarize `samples`. Returns `None` for an empty slice.
pub fn summarize(samples: &[f64]) -> Option<Summary> {
    if samples.is_empty() {
        return None;
    }

    let mean = mean(samples);
    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Some(Summary {
        count: samples.len(),
        median: median(samples),
        mean,
        stdev: population_stdev(samples, mean),
        min,
        max,
    })
}

fn mean(samples: &[f64]) -> f64 {
    samples.iter().sum::<f64>() / samples.len() as f64
}

fn median(samples: &[f64]) -> f64 {
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

fn population_stdev(samples: &[f64], mean: f64) -> f64 {
    let variance = samples
        .iter()
        .map(|x| {
            let diff = x - mean;
            diff * diff
        })
        .sum::<f64>()
        / samples.len() as f64;
    variance.sqrt()
}

/// Round half toward positive infinity, the way the dashboard has always displayed values.
pub fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Round to two decimal places, halves toward positive infinity.
pub fn round_to_hundredths(x: f64) -> f64 {
    round_half_up(x * 100.0) / 100.0
}

/// Seconds to whole milliseconds. Out-of-range values saturate.
pub fn to_millis(seconds: f64) -> i64 {
    round_half_up(seconds * 1000.0) as i64
}

impl Summary {
    pub fn to_millis(&self) -> MillisSummary {
        MillisSummary {
            samples: self.count,
            median: to_millis(self.median),
            mean: to_millis(self.mean),
            stdev: to_millis(self.stdev),
            min: to_millis(self.min),
            max: to_millis(self.max),
        }
    }
}

impl MillisSummary {
    /// Multi-line tooltip text, one statistic per line.
    pub fn tooltip(&self) -> String {
        format!(
            "samples: {}\nmedian: {}\nmean: {}\nstdev: {}\nmin: {}\nmax: {}",
            self.samples, self.median, self.mean, self.stdev, self.min, self.max
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_summarize_four_samples() {
        let s = summarize(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(s.count, 4);
        assert!(approx(s.mean, 2.5));
        assert!(approx(s.median, 2.5));
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 4.0);
        assert!(approx(s.stdev, 1.25f64.sqrt()));
        assert!((s.stdev - 1.1180).abs() < 1e-4);
    }

    #[test]
    fn test_median_even_count_is_mean_of_middle() {
        let s = summarize(&[10.0, 20.0]).unwrap();
        assert_eq!(s.median, 15.0);
    }

    #[test]
    fn test_median_odd_count_unsorted_input() {
        let samples = [5.0, 1.0, 3.0];
        let s = summarize(&samples).unwrap();
        assert_eq!(s.median, 3.0);
        // input untouched
        assert_eq!(samples, [5.0, 1.0, 3.0]);
    }

    #[test]
    fn test_single_sample() {
        let s = summarize(&[0.042]).unwrap();
        assert_eq!(s.count, 1);
        assert_eq!(s.median, 0.042);
        assert_eq!(s.stdev, 0.0);
        assert_eq!(s.min, s.max);
    }

    #[test]
    fn test_empty_is_none() {
        assert!(summarize(&[]).is_none());
    }

    #[test]
    fn test_millis_rounding() {
        assert_eq!(round_half_up(12.5), 13.0);
        assert_eq!(round_half_up(-0.5), 0.0);
        assert_eq!(to_millis(0.0124), 12);
        assert_eq!(to_millis(0.1), 100);
    }

    #[test]
    fn test_hundredths_round_half_up() {
        assert_eq!(round_to_hundredths(0.125), 0.13);
        assert_eq!(round_to_hundredths(12.375), 12.38);
        assert_eq!(round_to_hundredths(-0.125), -0.12);
        assert_eq!(round_to_hundredths(33.333333), 33.33);
    }

    #[test]
    fn test_tooltip_lines() {
        let s = summarize(&[0.010, 0.020]).unwrap().to_millis();
        assert_eq!(
            s.tooltip(),
            "samples: 2\nmedian: 15\nmean: 15\nstdev: 5\nmin: 10\nmax: 20"
        );
    }
}
