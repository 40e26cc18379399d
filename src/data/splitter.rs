// ============================================================
// Layer 4 - Train/Validation Splitter
// ============================================================
// Holds out a slice of the training records for validation.
// The test split is never touched here; it stays unseen until
// the final evaluation.
//
// bAbI files are ordered episode by episode, so the records are
// shuffled first. The shuffle is seeded, which makes the split
// (and therefore the validation numbers) reproducible across runs.
//
// Reference: rand crate documentation (SliceRandom, SeedableRng)

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Shuffle `samples` with `seed` and split off `val_fraction` of them.
///
/// # Returns
/// A tuple (train_samples, val_samples)
pub fn split_train_val<T>(mut samples: Vec<T>, val_fraction: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let mut rng = StdRng::seed_from_u64(seed);
    samples.shuffle(&mut rng);

    let total    = samples.len();
    let val_size = ((total as f64) * val_fraction.clamp(0.0, 1.0)).round() as usize;
    let split_at = total - val_size.min(total);

    // After this: samples = [0..split_at], val = [split_at..total]
    let val = samples.split_off(split_at);

    tracing::debug!(
        "Dataset split: {} training, {} validation",
        samples.len(),
        val.len(),
    );

    (samples, val)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_split_sizes() {
        let items: Vec<usize> = (0..1000).collect();
        let (train, val)      = split_train_val(items, 0.05, 7);
        assert_eq!(train.len(), 950);
        assert_eq!(val.len(),   50);
    }

    #[test]
    fn test_all_items_preserved() {
        let items: Vec<usize> = (0..50).collect();
        let (train, val)      = split_train_val(items, 0.3, 1);
        let mut all: Vec<usize> = train.into_iter().chain(val).collect();
        all.sort();
        assert_eq!(all, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_same_seed_same_split() {
        let (a, _) = split_train_val((0..100).collect::<Vec<usize>>(), 0.1, 42);
        let (b, _) = split_train_val((0..100).collect::<Vec<usize>>(), 0.1, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_dataset() {
        let (train, val) = split_train_val(Vec::<usize>::new(), 0.05, 0);
        assert!(train.is_empty());
        assert!(val.is_empty());
    }

    #[test]
    fn test_zero_fraction_keeps_everything_for_training() {
        let (train, val) = split_train_val((0..10).collect::<Vec<usize>>(), 0.0, 0);
        assert_eq!(train.len(), 10);
        assert!(val.is_empty());
    }
}
