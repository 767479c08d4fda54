//! Descriptive statistics over finite values.

use ordered_float::OrderedFloat;
use std::collections::HashMap;

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (`n - 1` denominator).
pub(crate) fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let squares: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((squares / (values.len() - 1) as f64).sqrt())
}

/// Most frequent value; ties go to the smallest.
pub(crate) fn mode(values: &[f64]) -> Option<f64> {
    let mut counts: HashMap<OrderedFloat<f64>, usize> = HashMap::new();
    for v in values {
        *counts.entry(OrderedFloat(*v)).or_default() += 1;
    }
    counts
        .into_iter()
        .max_by(|(a, a_count), (b, b_count)| a_count.cmp(b_count).then(b.cmp(a)))
        .map(|(value, _)| value.into_inner())
}

pub(crate) fn sorted_ascending(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by_key(|v| OrderedFloat(*v));
    sorted
}

pub(crate) fn sorted_descending(values: &[f64]) -> Vec<f64> {
    let mut sorted = sorted_ascending(values);
    sorted.reverse();
    sorted
}

/// `(min, max)` of `values`, or `None` when empty.
pub(crate) fn extent(values: &[f64]) -> Option<(f64, f64)> {
    let min = values.iter().copied().map(OrderedFloat).min()?;
    let max = values.iter().copied().map(OrderedFloat).max()?;
    Some((min.into_inner(), max.into_inner()))
}
