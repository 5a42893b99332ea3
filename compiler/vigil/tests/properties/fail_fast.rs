//! Check sites run in declaration order and stop at the first violation.

use pretty_assertions::assert_eq;
use vigil::{Bound, HintId, Param, Pith, Session, Signature, VigilError};

fn two_params(session: &Session) -> vigil::CompiledSignature {
    let signature = Signature::new("pair")
        .in_module("demo")
        .param(Param::positional("a", HintId::INT))
        .param(Param::positional("b", HintId::STR))
        .returns(HintId::NONE);
    session.checker().compile_signature(&signature).unwrap()
}

#[test]
fn only_the_first_violation_is_reported() {
    let session = Session::new();
    let compiled = two_params(&session);
    let (a, b) = (Pith::string("x"), Pith::string("y"));

    let err = compiled
        .check_call(&[Bound::Value(&a), Bound::Value(&b)])
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "parameter `a` of `demo.pair()`: expected `int`, got str 'x'"
    );
}

#[test]
fn later_parameters_are_reported_when_earlier_ones_pass() {
    let session = Session::new();
    let compiled = two_params(&session);
    let (a, b) = (Pith::Int(1), Pith::Int(2));

    let err = compiled
        .check_call(&[Bound::Value(&a), Bound::Value(&b)])
        .unwrap_err();
    assert_eq!(err.violation().unwrap().label, "parameter `b` of `demo.pair()`");
}

#[test]
fn the_return_is_checked_last() {
    let session = Session::new();
    let calls = std::cell::Cell::new(0);
    let signature = Signature::new("pair")
        .in_module("demo")
        .param(Param::positional("a", HintId::INT))
        .returns(HintId::NONE);
    let checked = session
        .wrap(&signature, |_: &[Pith]| {
            calls.set(calls.get() + 1);
            Pith::Int(0)
        })
        .unwrap();

    let err = checked.call(&[Pith::None]).unwrap_err();
    assert!(matches!(err, VigilError::ArgumentViolation(_)));
    assert_eq!(calls.get(), 0);

    let err = checked.call(&[Pith::Int(1)]).unwrap_err();
    assert!(matches!(err, VigilError::ReturnViolation(_)));
    assert_eq!(calls.get(), 1);
}

#[test]
fn incomplete_signatures_never_compile() {
    let session = Session::new();
    let signature = Signature::new("broken")
        .param(Param::positional("a", HintId::INT))
        .param(Param::positional("b", session.pool().opaque("Unpack[Ts]")));

    assert!(session.checker().compile_signature(&signature).is_err());
    assert!(session.wrap(&signature, |_: &[Pith]| Pith::None).is_err());
}
