//! Checking policy.
//!
//! `CheckConfig` is fixed when a [`Checker`](crate::Checker) is created and
//! baked into every validator it compiles, so the hot path never consults it.
//!
//! # Environment
//!
//! | Variable | Values | Default |
//! |---|---|---|
//! | `VIGIL_SAMPLE` | `first`, `first-last`, `all`, `leading:N` | `first-last` |
//! | `VIGIL_FORWARD_REFS` | `eager`, `lazy` | `eager` |
//! | `VIGIL_NUMERIC_TOWER` | `1`/`true`, `0`/`false` | off |
//! | `VIGIL_MAX_REPR_LEN` | positive integer | `96` |

use vigil_types::SampleStrategy;

/// When forward references are resolved.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum ForwardRefPolicy {
    /// At compile time; an unresolvable name fails the compile.
    #[default]
    Eager,
    /// On first check; an unresolvable name fails that check with a
    /// configuration error, and resolution is retried on the next one.
    Lazy,
}

/// Checking policy for one checker.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct CheckConfig {
    /// Container items inspected on the hot path.
    pub sample: SampleStrategy,
    /// Forward reference resolution timing.
    pub forward_refs: ForwardRefPolicy,
    /// Accept `int` where `float` is expected.
    pub numeric_tower: bool,
    /// Maximum characters of a value shown in a diagnostic.
    pub max_repr_len: usize,
}

impl Default for CheckConfig {
    fn default() -> Self {
        CheckConfig {
            sample: SampleStrategy::FirstAndLast,
            forward_refs: ForwardRefPolicy::Eager,
            numeric_tower: false,
            max_repr_len: 96,
        }
    }
}

impl CheckConfig {
    #[must_use]
    pub fn with_sample(mut self, sample: SampleStrategy) -> Self {
        self.sample = sample;
        self
    }

    #[must_use]
    pub fn with_forward_refs(mut self, policy: ForwardRefPolicy) -> Self {
        self.forward_refs = policy;
        self
    }

    #[must_use]
    pub fn with_numeric_tower(mut self, enabled: bool) -> Self {
        self.numeric_tower = enabled;
        self
    }

    #[must_use]
    pub fn with_max_repr_len(mut self, len: usize) -> Self {
        self.max_repr_len = len;
        self
    }

    /// Read the policy from `VIGIL_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the policy from an arbitrary variable source.
    ///
    /// Unparseable values keep the default and log a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = CheckConfig::default();

        if let Some(raw) = lookup("VIGIL_SAMPLE") {
            match parse_sample(&raw) {
                Some(sample) => config.sample = sample,
                None => tracing::warn!(value = %raw, "ignoring invalid VIGIL_SAMPLE"),
            }
        }
        if let Some(raw) = lookup("VIGIL_FORWARD_REFS") {
            match raw.trim().to_ascii_lowercase().as_str() {
                "eager" => config.forward_refs = ForwardRefPolicy::Eager,
                "lazy" => config.forward_refs = ForwardRefPolicy::Lazy,
                _ => tracing::warn!(value = %raw, "ignoring invalid VIGIL_FORWARD_REFS"),
            }
        }
        if let Some(raw) = lookup("VIGIL_NUMERIC_TOWER") {
            match parse_flag(&raw) {
                Some(enabled) => config.numeric_tower = enabled,
                None => tracing::warn!(value = %raw, "ignoring invalid VIGIL_NUMERIC_TOWER"),
            }
        }
        if let Some(raw) = lookup("VIGIL_MAX_REPR_LEN") {
            match raw.trim().parse::<usize>() {
                Ok(len) if len > 0 => config.max_repr_len = len,
                _ => tracing::warn!(value = %raw, "ignoring invalid VIGIL_MAX_REPR_LEN"),
            }
        }

        config
    }
}

/// Parse a sample strategy spelled `first`, `first-last`, `all` or `leading:N`.
pub fn parse_sample(raw: &str) -> Option<SampleStrategy> {
    let raw = raw.trim().to_ascii_lowercase();
    match raw.as_str() {
        "first" => Some(SampleStrategy::First),
        "first-last" => Some(SampleStrategy::FirstAndLast),
        "all" => Some(SampleStrategy::Exhaustive),
        _ => {
            let count = raw.strip_prefix("leading:")?.parse::<usize>().ok()?;
            (count > 0).then_some(SampleStrategy::Leading(count))
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
