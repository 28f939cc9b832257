#![allow(dead_code)]

use nst_run::{process_samples_array, Matrix, NestedRun};

pub const NEG_INF: f64 = f64::NEG_INFINITY;

/// Builds a samples array with a single parameter column (the sample index).
pub fn samples(logl: &[f64], birth_logl: &[f64]) -> Matrix {
    let rows: Vec<[f64; 3]> = logl
        .iter()
        .zip(birth_logl)
        .enumerate()
        .map(|(idx, (&value, &birth))| [idx as f64, value, birth])
        .collect();
    Matrix::from_rows(&rows).unwrap()
}

/// logl = 1..6, birth = [-inf, -inf, 1, 2, 4, 4].
pub fn split_scenario() -> NestedRun {
    process_samples_array(&samples(
        &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
        &[NEG_INF, NEG_INF, 1.0, 2.0, 4.0, 4.0],
    ))
    .unwrap()
}

/// True when `a` and `b` agree up to a consistent renaming of labels.
pub fn same_up_to_relabel(a: &[usize], b: &[usize]) -> bool {
    use std::collections::BTreeMap;
    if a.len() != b.len() {
        return false;
    }
    let mut forward = BTreeMap::new();
    let mut backward = BTreeMap::new();
    for (&x, &y) in a.iter().zip(b) {
        if *forward.entry(x).or_insert(y) != y || *backward.entry(y).or_insert(x) != x {
            return false;
        }
    }
    true
}
