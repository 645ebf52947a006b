/// What to do when a single row fails to decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Record the row in the [`crate::DecodeReport`] and keep going.
    #[default]
    Skip,

    /// Stop at the first bad row and return its error.
    Abort,
}

/// Knobs for [`crate::decode_bag`] and [`crate::decode_rows`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Decode each channel kind on its own `rayon` task.
    ///
    /// The result is identical to sequential decoding.
    pub parallel: bool,

    pub failure_policy: FailurePolicy,
}

impl DecodeOptions {
    #[inline]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    #[inline]
    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }
}
