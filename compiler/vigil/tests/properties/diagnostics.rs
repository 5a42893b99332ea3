//! Diagnostics locate the minimal failing sub-value.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use vigil::{ErrorCode, HintId, PathSegment, Pith, Session};

use crate::common::{check, int_list, rejection};

#[test]
fn sequence_failures_name_the_index() {
    let session = Session::new();
    let list_int = session.pool().list(HintId::INT);
    let value = Pith::list(vec![Pith::Int(1), Pith::Int(2), Pith::string("x")]);

    assert_eq!(
        rejection(&session, list_int, &value),
        "parameter `x` of `props.f()` at [2]: expected `int`, got str 'x'"
    );
}

#[test]
fn tuple_length_mismatch_is_a_length_diagnostic() {
    let session = Session::new();
    let pair = session.pool().tuple(&[HintId::INT, HintId::INT]);

    let err = check(&session, pair, &Pith::tuple(vec![Pith::Int(1)])).unwrap_err();
    let diagnostic = &err.violation().unwrap().diagnostic;
    assert_eq!(diagnostic.code, ErrorCode::V3002);
    assert_eq!(diagnostic.message, "expected tuple of length 2, got length 1");
}

proptest! {
    #[test]
    fn wrong_length_is_never_an_item_diagnostic(len in 0usize..6, arity in 0usize..4) {
        prop_assume!(len != arity);
        let session = Session::new();
        let hint = session.pool().tuple(&vec![HintId::INT; arity]);
        // Items that would also fail, to make sure length is reported first.
        let value = Pith::tuple(vec![Pith::string("x"); len]);

        let err = check(&session, hint, &value).unwrap_err();
        prop_assert_eq!(err.violation().unwrap().diagnostic.code, ErrorCode::V3002);
    }

    #[test]
    fn the_reported_index_is_the_first_bad_item(len in 1usize..20, bad in 0usize..20) {
        let bad = bad % len;
        let session = Session::new();
        let list_int = session.pool().list(HintId::INT);
        let mut items: Vec<Pith> = (0..len).map(|n| Pith::Int(i64::try_from(n).unwrap())).collect();
        items[bad] = Pith::None;
        // Make sure the default sample sees a failure.
        items[len - 1] = Pith::None;

        let err = check(&session, list_int, &Pith::list(items)).unwrap_err();
        let path = err.violation().unwrap().diagnostic.path.clone();
        prop_assert_eq!(path.segments(), &[PathSegment::Index(bad)][..]);
    }
}

#[test]
fn nested_containers() {
    let session = Session::new();
    let pool = session.pool();
    let table = pool.dict(HintId::STR, pool.list(pool.tuple(&[HintId::STR, HintId::INT])));
    let value = Pith::dict(vec![(
        Pith::string("rows"),
        Pith::list(vec![
            Pith::tuple(vec![Pith::string("a"), Pith::Int(1)]),
            Pith::tuple(vec![Pith::string("b"), Pith::Float(2.0)]),
        ]),
    )]);

    assert_eq!(
        rejection(&session, table, &value),
        "parameter `x` of `props.f()` at ['rows'][1][1]: expected `int`, got float 2.0"
    );
}

#[test]
fn containers_of_the_wrong_class_fail_at_the_root() {
    let session = Session::new();
    let list_int = session.pool().list(HintId::INT);
    assert_eq!(
        rejection(&session, list_int, &Pith::set(vec![Pith::Int(1)])),
        "parameter `x` of `props.f()`: expected `list[int]`, got set {1}"
    );
    assert_eq!(
        rejection(&session, list_int, &Pith::None),
        "parameter `x` of `props.f()`: expected `list[int]`, got None"
    );
}

#[test]
fn literal_and_callable_categories() {
    let session = Session::new();
    let pool = session.pool();
    let mode = pool.literal([vigil::Literal::Str("r".into())]);
    let callback = pool.callable(Some(&[HintId::INT]), HintId::NONE);

    let err = check(&session, mode, &Pith::string("w")).unwrap_err();
    assert_eq!(err.code(), ErrorCode::V3003);
    let err = check(&session, callback, &int_list(&[1])).unwrap_err();
    assert_eq!(err.code(), ErrorCode::V3004);
}

#[test]
fn long_values_are_truncated() {
    let session = Session::with_config(vigil::CheckConfig::default().with_max_repr_len(12));
    let list_str = session.pool().list(HintId::STR);
    let value = int_list(&(0..100).collect::<Vec<_>>());

    let err = check(&session, list_str, &value).unwrap_err();
    let diagnostic = &err.violation().unwrap().diagnostic;
    assert_eq!(diagnostic.found.as_deref(), Some("0"));

    let err = check(&session, HintId::INT, &value).unwrap_err();
    let found = err.violation().unwrap().diagnostic.found.clone().unwrap();
    assert_eq!(found.chars().count(), 12);
    assert!(found.ends_with("..."));
}

#[test]
fn tuple_subclasses_without_items_are_violations() {
    let session = Session::new();
    let (point, _) = session.define_class("Point", &[vigil::ClassId::TUPLE]).unwrap();
    let empty = session.pool().tuple(&[]);

    let err = check(&session, empty, &Pith::instance(point, "Point()")).unwrap_err();
    assert!(err.is_violation(), "{err:?}");
    assert_eq!(
        err.to_string(),
        "parameter `x` of `props.f()`: expected `tuple[()]`, got Point Point()"
    );
}
