//! Validator compilation and runtime checking for vigil.
//!
//! The pipeline from hint to verdict:
//!
//! ```text
//! HintId ──classify──▶ HintShape ──compile──▶ Validator ──publish──▶ ValidatorCache
//!                                                  │
//!                         CheckSite[] ──check──────┘──reject──▶ explain ──▶ Violation
//! ```
//!
//! - [`Checker`]: owns the cache, the resolver and the policy
//! - [`Validator`]: immutable compiled check for one hint
//! - [`CheckSite`]: one value against one validator, labelled for diagnostics
//! - [`CompiledSignature`]: every hint of one callable, compiled all or nothing
//! - [`VigilError`]: the error taxonomy, by phase and audience
//!
//! # Hot Path
//!
//! A successful check walks validators and values without allocating.
//! Labels, reprs and diagnostics are only produced for the first site that
//! fails.

mod cache;
mod checker;
mod compile;
mod config;
mod engine;
mod error;
mod explain;
mod resolve;
mod signature;
mod stack;
mod validator;

pub use cache::{CacheStats, ValidatorCache};
pub use checker::Checker;
pub use config::{parse_sample, CheckConfig, ForwardRefPolicy};
pub use engine::{CheckSite, SiteKind};
pub use error::{Audience, InternalInvariant, Phase, VigilError, Violation};
pub use resolve::{
    is_valid_reference, NameResolver, NullResolver, Resolution, ResolveContext, ScopeResolver,
};
pub use signature::{Bound, CompiledSignature, Param, ParamKind, Signature};
pub use validator::Validator;
