//! Forward reference resolution.
//!
//! Forward references name a hint that may not exist yet when the
//! referencing hint is built (`list["Node"]` inside the definition of
//! `Node`). The checker asks a [`NameResolver`] for the hint behind a name;
//! `NotFound` is an explicit outcome rather than an error so resolvers stay
//! trivial to write.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use vigil_types::HintId;

/// Where a reference appears.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct ResolveContext<'a> {
    /// Module of the callable whose signature holds the reference.
    pub module: Option<&'a str>,
}

/// Outcome of a resolution.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Resolution {
    Found(HintId),
    NotFound,
}

/// Resolves forward reference names to hints.
pub trait NameResolver: Send + Sync {
    fn resolve(&self, name: &str, cx: &ResolveContext<'_>) -> Resolution;
}

/// A resolver that knows no names.
#[derive(Copy, Clone, Default, Debug)]
pub struct NullResolver;

impl NameResolver for NullResolver {
    fn resolve(&self, _name: &str, _cx: &ResolveContext<'_>) -> Resolution {
        Resolution::NotFound
    }
}

/// Thread-safe table from qualified names to hints.
///
/// Names without a `.` are looked up in the referencing module first
/// (`module.Name`), then as a top-level name. Dotted names are absolute.
#[derive(Default)]
pub struct ScopeResolver {
    names: RwLock<FxHashMap<Box<str>, HintId>>,
}

impl ScopeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `qualified` (e.g. `shapes.Node`) to `hint`, replacing any
    /// previous binding.
    pub fn define(&self, qualified: &str, hint: HintId) {
        tracing::debug!(name = qualified, "defined forward reference target");
        self.names.write().insert(qualified.into(), hint);
    }

    /// Number of bound names.
    pub fn len(&self) -> usize {
        self.names.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.read().is_empty()
    }
}

impl NameResolver for ScopeResolver {
    fn resolve(&self, name: &str, cx: &ResolveContext<'_>) -> Resolution {
        let names = self.names.read();
        if !name.contains('.') {
            if let Some(module) = cx.module {
                let qualified = format!("{module}.{name}");
                if let Some(&hint) = names.get(qualified.as_str()) {
                    return Resolution::Found(hint);
                }
            }
        }
        match names.get(name) {
            Some(&hint) => Resolution::Found(hint),
            None => Resolution::NotFound,
        }
    }
}

/// Check that `name` is a dotted sequence of identifiers.
pub fn is_valid_reference(name: &str) -> bool {
    !name.is_empty() && name.split('.').all(is_identifier)
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_alphabetic() => {
            chars.all(|c| c == '_' || c.is_alphanumeric())
        }
        _ => false,
    }
}
