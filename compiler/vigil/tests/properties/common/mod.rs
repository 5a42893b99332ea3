//! Shared helpers for property tests.

use proptest::prelude::*;
use vigil::{CheckSite, HintId, Pith, Session, SiteKind, VigilError};

/// Check `pith` as the single parameter `x` of `props.f()`.
pub fn check(session: &Session, hint: HintId, pith: &Pith) -> Result<(), VigilError> {
    let validator = session.checker().get_or_compile(hint)?;
    let site = CheckSite::new(
        SiteKind::Parameter {
            callable: "props.f",
            name: "x",
            position: 0,
        },
        pith,
        &validator,
    );
    session.checker().check(&[site])
}

/// Whether `pith` passes, panicking on anything but a violation.
pub fn passes(session: &Session, hint: HintId, pith: &Pith) -> bool {
    match check(session, hint, pith) {
        Ok(()) => true,
        Err(err) if err.is_violation() => false,
        Err(err) => panic!("unexpected checker error: {err}"),
    }
}

/// The violation message for a rejected pair.
pub fn rejection(session: &Session, hint: HintId, pith: &Pith) -> String {
    match check(session, hint, pith) {
        Ok(()) => panic!("expected {pith} to be rejected"),
        Err(err) => err.to_string(),
    }
}

pub fn int_list(values: &[i64]) -> Pith {
    Pith::list(values.iter().map(|&n| Pith::Int(n)).collect())
}

/// Arbitrary scalar piths.
pub fn scalar() -> impl Strategy<Value = Pith> {
    prop_oneof![
        Just(Pith::None),
        any::<bool>().prop_map(Pith::Bool),
        any::<i64>().prop_map(Pith::Int),
        (-1.0e6f64..1.0e6).prop_map(Pith::Float),
        "[a-z]{0,6}".prop_map(Pith::string),
        proptest::collection::vec(any::<u8>(), 0..4).prop_map(Pith::bytes),
    ]
}

/// Arbitrary piths up to three levels deep.
pub fn pith() -> impl Strategy<Value = Pith> {
    scalar().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..4).prop_map(Pith::list),
            proptest::collection::vec(inner.clone(), 0..4).prop_map(Pith::tuple),
            proptest::collection::vec(("[a-c]".prop_map(Pith::string), inner), 0..3)
                .prop_map(Pith::dict),
        ]
    })
}
