use crate::{MlErr, Result};

/// The value every slot of a fresh `ErrorTracker` holds.
pub const ERROR_SENTINEL: f32 = 1_000_000.0;

/// A fixed-capacity circular buffer of the most recent losses.
///
/// The running mean is always taken over the full capacity, so until `capacity` values have been
/// recorded the untouched sentinel slots dominate it. Callers comparing the mean against a
/// threshold must expect it to stay inflated during that warm-up.
#[derive(Debug, Clone)]
pub struct ErrorTracker {
    errors: Box<[f32]>,
    position: usize,
}

impl ErrorTracker {
    /// Creates a new `ErrorTracker` with every slot set to `ERROR_SENTINEL`.
    ///
    /// # Arguments
    /// * `capacity` - The amount of losses remembered.
    ///
    /// # Returns
    /// An error if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(MlErr::InvalidErrorMemory { got: capacity });
        }

        Ok(Self {
            errors: vec![ERROR_SENTINEL; capacity].into_boxed_slice(),
            position: 0,
        })
    }

    /// Writes `value` over the oldest slot and returns the new running mean.
    pub fn record(&mut self, value: f32) -> f32 {
        self.errors[self.position] = value;
        self.position = (self.position + 1) % self.errors.len();
        self.mean()
    }

    /// Returns the arithmetic mean of every slot, sentinels included.
    pub fn mean(&self) -> f32 {
        let sum: f64 = self.errors.iter().map(|&e| e as f64).sum();
        (sum / self.errors.len() as f64) as f32
    }

    pub fn capacity(&self) -> usize {
        self.errors.len()
    }

    /// Returns the slot the next `record` call will write to.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Forgets every recorded value.
    pub fn reset(&mut self) {
        self.errors.fill(ERROR_SENTINEL);
        self.position = 0;
    }
}
