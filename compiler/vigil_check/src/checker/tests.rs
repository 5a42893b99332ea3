#![allow(clippy::unwrap_used)]

use super::*;
use crate::{NullResolver, ScopeResolver};
use pretty_assertions::assert_eq;
use vigil_types::{ClassId, ShapeTag};

fn checker() -> Checker {
    Checker::new(Arc::new(HintPool::new()), Arc::new(NullResolver))
}

#[test]
fn classify_delegates_to_the_pool() {
    let checker = checker();
    let list_int = checker.pool().list(HintId::INT);
    assert_eq!(
        checker.classify(list_int),
        HintShape::Sequence {
            origin: ClassId::LIST,
            elem: HintId::INT
        }
    );
    assert_eq!(checker.classify(HintId::ANY), HintShape::OBJECT);
    assert_eq!(
        checker.classify(checker.pool().opaque("x")).tag(),
        ShapeTag::Unsupported
    );
}

#[test]
fn clones_share_the_cache() {
    let checker = checker();
    let other = checker.clone();
    let list_str = checker.pool().list(HintId::STR);

    let first = checker.get_or_compile(list_str).unwrap();
    let second = other.get_or_compile(list_str).unwrap();
    assert!(first.ptr_eq(&second));
    assert_eq!(other.cached_validators(), 2);
}

#[test]
fn default_config() {
    let checker = checker();
    assert_eq!(checker.config(), &CheckConfig::default());
}

#[test]
fn scopes_are_interned_per_module() {
    let resolver = Arc::new(ScopeResolver::new());
    let checker = Checker::new(Arc::new(HintPool::new()), resolver);
    let state = checker.state();
    let hint = checker.pool().forward_ref("Node");

    let a = state.scope_for(hint, Some("a"));
    let b = state.scope_for(hint, Some("b"));
    assert_ne!(a, b);
    assert_eq!(state.scope_for(hint, Some("a")), a);
    assert_eq!(state.scope_for(hint, None), ScopeId::GLOBAL);
    assert_eq!(state.scope_for(HintId::INT, Some("a")), ScopeId::GLOBAL);
}

#[test]
fn unknown_names_are_unsupported() {
    let checker = checker();
    let err = checker.state().resolve("Ghost", Some("m")).unwrap_err();
    assert_eq!(err.code(), ErrorCode::V2003);
    assert_eq!(
        err.to_string(),
        "unsupported type hint `'Ghost'`: `Ghost` does not name a known hint"
    );
}

#[test]
fn concurrent_first_compiles_publish_one_validator() {
    let checker = checker();
    let pool = checker.pool();
    let hint = pool.dict(HintId::STR, pool.list(pool.optional(HintId::INT)));

    let validators: Vec<Validator> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| checker.get_or_compile(hint).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(validators.iter().all(|v| v.ptr_eq(&validators[0])));
    assert!(validators[0].ptr_eq(&checker.get_or_compile(hint).unwrap()));
}
