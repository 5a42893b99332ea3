//! Union classification and diagnostics.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use vigil::{ErrorCode, HintId, HintShape, Pith, Session};

use crate::common::{check, passes, pith};

const MEMBERS: [HintId; 5] = [
    HintId::NONE,
    HintId::BOOL,
    HintId::INT,
    HintId::STR,
    HintId::BYTES,
];

fn members() -> impl Strategy<Value = Vec<HintId>> {
    proptest::collection::vec(proptest::sample::select(MEMBERS.to_vec()), 1..6)
}

proptest! {
    #[test]
    fn nested_unions_flatten(a in members(), b in members()) {
        let session = Session::new();
        let pool = session.pool();
        let inner = pool.union(&a);
        let mut nested = vec![inner];
        nested.extend(&b);
        let mut flat = a.clone();
        flat.extend(&b);

        prop_assert_eq!(
            session.checker().classify(pool.union(&nested)),
            session.checker().classify(pool.union(&flat))
        );
    }

    #[test]
    fn flattening_preserves_decisions(a in members(), b in members(), value in pith()) {
        let session = Session::new();
        let pool = session.pool();
        let nested = pool.union(&[pool.union(&a), pool.union(&b)]);
        let mut flat = a.clone();
        flat.extend(&b);
        let flat = pool.union(&flat);

        prop_assert_eq!(passes(&session, nested, &value), passes(&session, flat, &value));
    }

    #[test]
    fn single_member_unions_degenerate(which in 0..MEMBERS.len()) {
        let session = Session::new();
        let hint = MEMBERS[which];
        prop_assert_eq!(
            session.checker().classify(session.pool().union(&[hint])),
            session.checker().classify(hint)
        );
    }
}

#[test]
fn ignorable_members_make_the_union_ignorable() {
    let session = Session::new();
    let union = session.pool().union(&[HintId::INT, HintId::ANY]);
    assert_eq!(session.checker().classify(union), HintShape::OBJECT);
    assert!(passes(&session, union, &Pith::bytes(b"x".to_vec())));
}

#[test]
fn closest_member_is_the_matching_container() {
    let session = Session::new();
    let pool = session.pool();
    let union = pool.union(&[HintId::INT, pool.tuple(&[HintId::INT, HintId::INT])]);
    let value = Pith::tuple(vec![Pith::Int(1), Pith::string("a")]);

    let err = check(&session, union, &value).unwrap_err();
    let violation = err.violation().unwrap();
    assert_eq!(violation.diagnostic.code, ErrorCode::V3001);
    assert_eq!(violation.diagnostic.expected.as_deref(), Some("int"));
    assert_eq!(violation.diagnostic.path.to_string(), "[1]");
    assert_eq!(
        violation.message(),
        "parameter `x` of `props.f()` at [1]: expected `int`, got str 'a'; \
         `tuple[int, int]` is the closest member of `int | tuple[int, int]`"
    );
}

#[test]
fn members_are_reported_in_declared_order() {
    let session = Session::new();
    let pool = session.pool();
    let union = pool.union(&[pool.list(HintId::INT), pool.list(HintId::STR)]);
    let value = Pith::list(vec![Pith::None]);

    let err = check(&session, union, &value).unwrap_err();
    let diagnostic = &err.violation().unwrap().diagnostic;
    assert_eq!(diagnostic.expected.as_deref(), Some("int"));
    assert_eq!(
        diagnostic.notes,
        vec!["`list[int]` is the closest member of `list[int] | list[str]`".to_string()]
    );
}

#[test]
fn deeper_failures_win_ties() {
    let session = Session::new();
    let pool = session.pool();
    let shallow = pool.list(HintId::INT);
    let deep = pool.list(pool.list(HintId::INT));
    let union = pool.union(&[shallow, deep]);
    let value = Pith::list(vec![Pith::list(vec![Pith::string("x")])]);

    let err = check(&session, union, &value).unwrap_err();
    assert_eq!(err.violation().unwrap().diagnostic.path.to_string(), "[0][0]");
}
