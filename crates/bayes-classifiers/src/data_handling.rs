//! Train/test partitioning of a `Frame`.
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{thread_rng, Rng, SeedableRng};

use crate::error::{ClassifierError, Result};
use crate::frame::Frame;

/// Disjoint train and test partitions of one frame.
#[derive(Debug, Clone)]
pub struct Split {
    pub train: Frame,
    pub test: Frame,
}

/// Split `frame` with a thread-local RNG.
pub fn split(frame: &Frame, test_ratio: f64) -> Result<Split> {
    split_with_rng(frame, test_ratio, &mut thread_rng())
}

/// Split `frame` reproducibly when `seed` is given.
pub fn split_seeded(frame: &Frame, test_ratio: f64, seed: Option<u64>) -> Result<Split> {
    match seed {
        Some(seed) => split_with_rng(frame, test_ratio, &mut StdRng::seed_from_u64(seed)),
        None => split(frame, test_ratio),
    }
}

/// Partition the rows of `frame` by a uniformly random permutation.
///
/// The first `floor(n * (1 - test_ratio))` permuted rows form the training
/// set and the remainder the test set, both kept in permuted order. Every
/// column is gathered with the same permutation so rows stay aligned.
///
/// An empty train or test partition is a legal outcome and is returned as-is.
pub fn split_with_rng<R: Rng + ?Sized>(
    frame: &Frame,
    test_ratio: f64,
    rng: &mut R,
) -> Result<Split> {
    if !test_ratio.is_finite() || !(0.0..=1.0).contains(&test_ratio) {
        return Err(ClassifierError::InvalidParameter {
            name: "test_ratio".to_string(),
            value: test_ratio.to_string(),
            reason: "must be within [0, 1]".to_string(),
        });
    }

    let n_samples = frame.nrows();
    let mut indices: Vec<usize> = (0..n_samples).collect();
    indices.shuffle(rng);

    let n_train = ((n_samples as f64 * (1.0 - test_ratio)).floor() as usize).min(n_samples);
    let (train_idx, test_idx) = indices.split_at(n_train);

    if n_train == 0 || n_train == n_samples {
        log::warn!(
            "Split of {} rows with test ratio {} produced {} training and {} test rows",
            n_samples,
            test_ratio,
            train_idx.len(),
            test_idx.len()
        );
    } else {
        log::debug!(
            "Split {} rows into {} training and {} test rows",
            n_samples,
            train_idx.len(),
            test_idx.len()
        );
    }

    Ok(Split {
        train: frame.select_rows(train_idx),
        test: frame.select_rows(test_idx),
    })
}
