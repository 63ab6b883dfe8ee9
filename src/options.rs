//! Field construction options
use crate::error::{Error, Result};
use crate::types::SplitMethod;

/// Ranges above this many points build their two halves on separate rayon tasks
pub const PARALLEL_THRESHOLD: usize = 1024;

/// Parameters fixed at field construction
#[derive(Debug, Clone, PartialEq)]
pub struct FieldOptions {
    /// Smallest separation of interest
    min_sep: f64,
    /// Largest separation of interest
    max_sep: f64,
    /// Dimensionless bin size fraction, `b`
    bin_size: f64,
    /// How cells are divided between their children
    split_method: SplitMethod,
    /// Seed for [`SplitMethod::Random`]
    seed: u64,
    /// Ranges with at least this many points are split in parallel
    parallel_threshold: usize,
}

impl FieldOptions {
    /// Create options for a separation range and bin size fraction
    ///
    /// Parameters are checked by [`FieldOptions::validate`] when a field is built.
    pub fn new(min_sep: f64, max_sep: f64, bin_size: f64) -> Self {
        Self {
            min_sep,
            max_sep,
            bin_size,
            split_method: SplitMethod::default(),
            seed: 0,
            parallel_threshold: PARALLEL_THRESHOLD,
        }
    }

    /// Check the separation range and bin size
    pub fn validate(&self) -> Result<()> {
        if !(self.min_sep.is_finite() && self.max_sep.is_finite() && self.bin_size.is_finite()) {
            return Err(Error::InvalidInput(format!(
                "Non-finite parameters: min_sep={}, max_sep={}, bin_size={}",
                self.min_sep, self.max_sep, self.bin_size
            )));
        }
        if self.min_sep < 0.0 {
            return Err(Error::InvalidInput(format!(
                "min_sep must be non-negative, got {}",
                self.min_sep
            )));
        }
        if self.max_sep <= self.min_sep {
            return Err(Error::InvalidInput(format!(
                "max_sep ({}) must exceed min_sep ({})",
                self.max_sep, self.min_sep
            )));
        }
        if self.bin_size <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "bin_size must be positive, got {}",
                self.bin_size
            )));
        }
        Ok(())
    }

    /// Smallest separation of interest
    pub fn min_sep(&self) -> f64 {
        self.min_sep
    }

    /// Largest separation of interest
    pub fn max_sep(&self) -> f64 {
        self.max_sep
    }

    /// Bin size fraction
    pub fn bin_size(&self) -> f64 {
        self.bin_size
    }

    /// Split method
    pub fn split_method(&self) -> SplitMethod {
        self.split_method
    }

    /// Random seed
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Parallel threshold
    pub fn parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    /// Set the split method
    pub fn set_split_method(&mut self, split_method: SplitMethod) {
        self.split_method = split_method;
    }

    /// Set the seed used by [`SplitMethod::Random`]
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
    }

    /// Set the number of points above which subtrees are built in parallel
    pub fn set_parallel_threshold(&mut self, threshold: usize) {
        self.parallel_threshold = threshold;
    }

    /// Largest size a cell may have and still be a leaf
    ///
    /// A pair of cells both below this size, separated by at least `min_sep`, has a
    /// separation uncertainty no larger than `b` times the separation, so splitting
    /// them further cannot move the pair into another bin.
    pub fn min_size(&self) -> f64 {
        self.min_sep * self.bin_size / (2.0 + 3.0 * self.bin_size)
    }

    /// Largest size a top-level cell may have
    ///
    /// Larger cells would be split by every correlation routine, so they are never stored.
    pub fn max_size(&self) -> f64 {
        self.max_sep * self.bin_size
    }
}

#[cfg(test)]
mod test {
    use super::{FieldOptions, PARALLEL_THRESHOLD};
    use crate::error::Error;
    use crate::types::SplitMethod;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let options = FieldOptions::new(1.0, 100.0, 0.1);
        assert!(options.validate().is_ok());
        assert_eq!(options.split_method(), SplitMethod::Middle);
        assert_eq!(options.seed(), 0);
        assert_eq!(options.parallel_threshold(), PARALLEL_THRESHOLD);
    }

    #[test]
    fn test_sizes() {
        let options = FieldOptions::new(1.0, 100.0, 0.1);
        assert_relative_eq!(options.min_size(), 0.1 / 2.3);
        assert_relative_eq!(options.max_size(), 10.0);
        assert!(options.min_size() <= options.bin_size() * options.min_sep());
    }

    #[test]
    fn test_setters() {
        let mut options = FieldOptions::new(1.0, 100.0, 0.1);
        options.set_split_method(SplitMethod::Random);
        options.set_seed(42);
        options.set_parallel_threshold(16);
        assert_eq!(options.split_method(), SplitMethod::Random);
        assert_eq!(options.seed(), 42);
        assert_eq!(options.parallel_threshold(), 16);
    }

    #[test]
    fn test_invalid() {
        for options in [
            FieldOptions::new(-1.0, 100.0, 0.1),
            FieldOptions::new(10.0, 10.0, 0.1),
            FieldOptions::new(10.0, 5.0, 0.1),
            FieldOptions::new(1.0, 100.0, 0.0),
            FieldOptions::new(1.0, 100.0, -0.5),
            FieldOptions::new(f64::NAN, 100.0, 0.1),
            FieldOptions::new(1.0, f64::INFINITY, 0.1),
        ] {
            assert!(matches!(options.validate(), Err(Error::InvalidInput(_))));
        }
        assert!(FieldOptions::new(0.0, 1.0, 0.1).validate().is_ok());
    }
}
