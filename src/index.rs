//! Engagement index and baseline correction.
//!
//! `engagement_index` — beta / (theta + alpha), the standard EEG
//! cognitive-engagement proxy.
//!
//! `baseline_corrected` — index(task) − index(baseline), removing the
//! participant's resting-state level so groups can be compared.

/// Theta, alpha and beta spectral power for one participant, one channel,
/// one condition, one stage.
///
/// Powers are non-negative by construction upstream.  A missing recording is
/// encoded in the dataset as an all-NaN or all-zero triple; use
/// [`PowerTriple::is_missing`] rather than probing individual components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerTriple {
    pub theta: f64,
    pub alpha: f64,
    pub beta: f64,
}

impl PowerTriple {
    pub fn new(theta: f64, alpha: f64, beta: f64) -> Self {
        Self { theta, alpha, beta }
    }

    /// Whether this triple is the missing-data sentinel (any NaN component,
    /// or all three powers exactly zero).
    pub fn is_missing(&self) -> bool {
        self.theta.is_nan()
            || self.alpha.is_nan()
            || self.beta.is_nan()
            || (self.theta == 0.0 && self.alpha == 0.0 && self.beta == 0.0)
    }

    /// Engagement index: `beta / (theta + alpha)`.
    ///
    /// NaN when `theta + alpha == 0`; callers treat NaN as missing, never as
    /// a failure.  Non-negative for any valid (non-negative, non-degenerate)
    /// input.
    pub fn engagement_index(&self) -> f64 {
        debug_assert!(
            self.theta.is_nan() || self.theta >= 0.0,
            "theta less than 0"
        );
        debug_assert!(
            self.alpha.is_nan() || self.alpha >= 0.0,
            "alpha less than 0"
        );
        debug_assert!(self.beta.is_nan() || self.beta >= 0.0, "beta less than 0");

        let denom = self.theta + self.alpha;
        if denom == 0.0 {
            f64::NAN
        } else {
            self.beta / denom
        }
    }
}

/// Engagement index from raw band powers. See [`PowerTriple::engagement_index`].
pub fn engagement_index(theta: f64, alpha: f64, beta: f64) -> f64 {
    PowerTriple::new(theta, alpha, beta).engagement_index()
}

/// Baseline-corrected engagement index:
/// `index(task) − index(baseline)` for the same participant / channel / model.
///
/// Deterministic, no side effects; NaN propagates from either input.
pub fn baseline_corrected(baseline: PowerTriple, task: PowerTriple) -> f64 {
    task.engagement_index() - baseline.engagement_index()
}
