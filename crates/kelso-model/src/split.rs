//! Stratified train/test splitting.

use crate::error::{ModelError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Split row indices into train and test sets, preserving the class ratio.
///
/// Each class is shuffled with the seeded RNG and split independently, so
/// the test set holds `test_fraction` of each class (rounded per class).
/// The returned index vectors are sorted ascending, which keeps downstream
/// matrix selection deterministic regardless of shuffle order.
///
/// # Errors
///
/// Returns [`ModelError::InvalidConfig`] for a fraction outside (0, 1) and
/// [`ModelError::EmptyInput`] when either resulting set would be empty.
pub fn stratified_split(
    labels: &[bool],
    test_fraction: f64,
    seed: u64,
) -> Result<(Vec<usize>, Vec<usize>)> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(ModelError::InvalidConfig(format!(
            "test fraction must lie in (0, 1), got {test_fraction}"
        )));
    }
    if labels.is_empty() {
        return Err(ModelError::EmptyInput("stratified split"));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();

    for class in [false, true] {
        let mut members: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|&(_, &l)| l == class)
            .map(|(i, _)| i)
            .collect();
        if members.is_empty() {
            continue;
        }
        members.shuffle(&mut rng);
        let n_test = ((members.len() as f64) * test_fraction).round() as usize;
        let n_test = n_test.min(members.len());
        test.extend_from_slice(&members[..n_test]);
        train.extend_from_slice(&members[n_test..]);
    }

    if train.is_empty() || test.is_empty() {
        return Err(ModelError::EmptyInput(
            "stratified split produced an empty partition",
        ));
    }

    train.sort_unstable();
    test.sort_unstable();
    Ok((train, test))
}
