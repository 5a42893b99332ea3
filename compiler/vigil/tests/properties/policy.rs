//! Checking policy: sampling, forward reference timing, environment.

use pretty_assertions::assert_eq;
use vigil::{parse_sample, CheckConfig, ForwardRefPolicy, HintId, Pith, SampleStrategy, Session};

use crate::common::{int_list, passes};

/// `[1, 2, ..., "bad" at index, ..., n]`
fn with_bad_item(len: usize, index: usize) -> Pith {
    let mut items: Vec<Pith> = (0..len).map(|n| Pith::Int(i64::try_from(n).unwrap())).collect();
    items[index] = Pith::string("bad");
    Pith::list(items)
}

fn session(sample: SampleStrategy) -> Session {
    Session::with_config(CheckConfig::default().with_sample(sample))
}

#[test]
fn sample_strategies_decide_what_is_seen() {
    let cases = [
        (SampleStrategy::First, 0, false),
        (SampleStrategy::First, 9, true),
        (SampleStrategy::FirstAndLast, 9, false),
        (SampleStrategy::FirstAndLast, 5, true),
        (SampleStrategy::Leading(3), 2, false),
        (SampleStrategy::Leading(3), 3, true),
        (SampleStrategy::Exhaustive, 5, false),
    ];
    for (sample, bad, expect_pass) in cases {
        let session = session(sample);
        let list_int = session.pool().list(HintId::INT);
        assert_eq!(
            passes(&session, list_int, &with_bad_item(10, bad)),
            expect_pass,
            "{sample:?} with a bad item at {bad}"
        );
    }
}

#[test]
fn mappings_sample_entries() {
    let session = session(SampleStrategy::First);
    let dict = session.pool().dict(HintId::STR, HintId::INT);
    let second_bad = Pith::dict(vec![
        (Pith::string("a"), Pith::Int(1)),
        (Pith::string("b"), Pith::None),
    ]);
    assert!(passes(&session, dict, &second_bad));

    let session = self::session(SampleStrategy::Exhaustive);
    let dict = session.pool().dict(HintId::STR, HintId::INT);
    assert!(!passes(&session, dict, &second_bad));
}

#[test]
fn empty_containers_always_pass() {
    for sample in [
        SampleStrategy::First,
        SampleStrategy::FirstAndLast,
        SampleStrategy::Leading(4),
        SampleStrategy::Exhaustive,
    ] {
        let session = session(sample);
        let list_int = session.pool().list(HintId::INT);
        assert!(passes(&session, list_int, &int_list(&[])));
    }
}

#[test]
fn config_from_variables() {
    let vars = [
        ("VIGIL_SAMPLE", "leading:4"),
        ("VIGIL_FORWARD_REFS", "lazy"),
        ("VIGIL_NUMERIC_TOWER", "1"),
        ("VIGIL_MAX_REPR_LEN", "40"),
    ];
    let config = CheckConfig::from_lookup(|key: &str| {
        vars.iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| (*value).to_string())
    });
    assert_eq!(
        config,
        CheckConfig::default()
            .with_sample(SampleStrategy::Leading(4))
            .with_forward_refs(ForwardRefPolicy::Lazy)
            .with_numeric_tower(true)
            .with_max_repr_len(40)
    );
}

#[test]
fn invalid_variables_keep_defaults() {
    let config = CheckConfig::from_lookup(|key: &str| match key {
        "VIGIL_SAMPLE" => Some("leading:0".to_string()),
        "VIGIL_FORWARD_REFS" => Some("eventually".to_string()),
        "VIGIL_MAX_REPR_LEN" => Some("-3".to_string()),
        _ => None,
    });
    assert_eq!(config, CheckConfig::default());
    assert_eq!(parse_sample("all"), Some(SampleStrategy::Exhaustive));
}
