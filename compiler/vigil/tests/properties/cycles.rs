//! Recursive hints through forward references.

use vigil::{CheckConfig, ErrorCode, ForwardRefPolicy, HintId, Phase, Pith, Session};

use crate::common::{check, passes, rejection};

/// `Tree = list["Tree"] | int`, reachable through its forward reference.
fn tree_session(policy: ForwardRefPolicy) -> (Session, HintId) {
    let session = Session::with_config(CheckConfig::default().with_forward_refs(policy));
    let pool = session.pool();
    let tree = pool.union(&[pool.list(pool.forward_ref("Tree")), HintId::INT]);
    session.define("Tree", tree);
    (session, tree)
}

fn nest(depth: usize, leaf: Pith) -> Pith {
    (0..depth).fold(leaf, |inner, _| Pith::list(vec![inner]))
}

#[test]
fn recursive_hints_check_finite_values() {
    for policy in [ForwardRefPolicy::Eager, ForwardRefPolicy::Lazy] {
        let (session, tree) = tree_session(policy);
        assert!(passes(&session, tree, &nest(5, Pith::Int(1))));
        assert!(passes(&session, tree, &Pith::list(Vec::new())));
        assert!(!passes(&session, tree, &nest(5, Pith::string("leaf"))));
    }
}

#[test]
fn deeply_nested_values() {
    let (session, tree) = tree_session(ForwardRefPolicy::Eager);
    assert!(passes(&session, tree, &nest(1_000, Pith::Int(1))));

    let err = check(&session, tree, &nest(1_000, Pith::None)).unwrap_err();
    assert_eq!(err.violation().unwrap().diagnostic.path.depth(), 1_000);
}

#[test]
fn recursive_diagnostics_descend_the_value() {
    let (session, tree) = tree_session(ForwardRefPolicy::Eager);
    let value = Pith::list(vec![Pith::Int(1), Pith::list(vec![Pith::None])]);

    let message = rejection(&session, tree, &value);
    assert!(message.starts_with("parameter `x` of `props.f()` at [1][0]: "), "{message}");
}

#[test]
fn self_reference_without_a_container_is_rejected() {
    let session = Session::new();
    let pool = session.pool();
    let alias = pool.union(&[pool.forward_ref("Alias"), HintId::NONE]);
    session.define("Alias", alias);

    let err = session.checker().get_or_compile(alias).unwrap_err();
    assert_eq!(err.code(), ErrorCode::V1001);
    assert_eq!(err.phase(), Phase::Classification);
}

#[test]
fn lazy_references_may_be_defined_after_compiling() {
    let session = Session::with_config(
        CheckConfig::default().with_forward_refs(ForwardRefPolicy::Lazy),
    );
    let pool = session.pool();
    let forest = pool.list(pool.forward_ref("Node"));
    let validator = session.checker().get_or_compile(forest).unwrap();

    let err = check(&session, forest, &Pith::list(vec![Pith::Int(1)])).unwrap_err();
    assert!(!err.is_violation());
    assert_eq!(err.code(), ErrorCode::V2003);

    session.define("Node", pool.dict(HintId::STR, forest));
    let node = Pith::dict(vec![(Pith::string("kids"), Pith::list(Vec::new()))]);
    assert!(passes(&session, forest, &Pith::list(vec![node])));
    assert!(validator.ptr_eq(&session.checker().get_or_compile(forest).unwrap()));
}

#[test]
fn eager_references_must_exist_at_compile_time() {
    let session = Session::new();
    let hint = session.pool().list(session.pool().forward_ref("Node"));

    let err = session.checker().get_or_compile(hint).unwrap_err();
    assert_eq!(err.code(), ErrorCode::V2003);
    assert_eq!(err.phase(), Phase::Compile);
}
