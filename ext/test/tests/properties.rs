//! Contract properties, checked against every matcher the crate ships.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use vouch_test::prelude::*;

/// One of everything, including compositions.
fn catalogue() -> Vec<Arc<dyn Matcher>> {
    vec![
        Arc::new(equal_to(1)),
        Arc::new(equal_to(Value::Null)),
        Arc::new(anything()),
        Arc::new(null_value()),
        Arc::new(not_null_value()),
        Arc::new(instance_of::<str>()),
        Arc::new(is(equal_to("x"))),
        Arc::new(described_as("renamed %0", equal_to(2)).with_values([Value::from(2)])),
        Arc::new(greater_than(1)),
        Arc::new(greater_than_or_equal_to(1.5)),
        Arc::new(compares_equal_to("m")),
        Arc::new(less_than_or_equal_to('k')),
        Arc::new(less_than(0)),
        Arc::new(Comparator::new("length", |a: &Value, b: &Value| {
            Some(a.as_str()?.len().cmp(&b.as_str()?.len()))
        })
        .greater_than("ab")),
        Arc::new(contains_string("ell")),
        Arc::new(starts_with("H").ignoring_case()),
        Arc::new(ends_with("")),
        Arc::new(equal_to_ignoring_case("HELLO")),
        Arc::new(matches_regex("[a-z]+").unwrap()),
        Arc::new(close_to(1.0, 0.5).unwrap()),
        Arc::new(has_item(equal_to(1))),
        Arc::new(every_item(not_null_value())),
        Arc::new(has_size(0)),
        Arc::new(empty()),
        Arc::new(applying(|s: &str| s.len(), greater_than(2))),
        Arc::new(feature("a list whose first item is", "first item", |items: &[Value]| {
            items.first().cloned().unwrap_or_default()
        }, equal_to(1))),
        Arc::new(not(equal_to(0))),
        Arc::new(all_of![greater_than(0), less_than(5)]),
        Arc::new(all_of(Vec::new())),
        Arc::new(any_of![contains_string("a"), greater_than(3), null_value()]),
        Arc::new(any_of(Vec::new())),
        Arc::new(not(any_of![all_of![anything(), is(null_value())], has_size(1)])),
    ]
}

#[test]
fn null_and_unrelated_types_never_panic() {
    for matcher in catalogue() {
        for item in probe_values() {
            let _ = matcher.matches(&item);
        }
    }
}

#[test]
fn mismatch_is_never_empty() {
    let items = probe_values();
    for matcher in catalogue() {
        check_mismatch_non_empty(matcher.as_ref(), &items).unwrap();
    }
}

#[test]
fn explain_agrees_with_matches() {
    let items = probe_values();
    for matcher in catalogue() {
        check_explain_consistent(matcher.as_ref(), &items).unwrap();
    }
}

#[test]
fn negation_is_an_involution() {
    let items = probe_values();
    for matcher in catalogue() {
        check_double_negation(matcher, &items).unwrap();
    }
}

#[test]
fn trace_root_agrees_with_matches() {
    let items = probe_values();
    for matcher in catalogue() {
        check_trace_agrees(matcher.as_ref(), &items).unwrap();
    }
}

#[test]
fn conjunction_short_circuits_in_order() {
    let matcher = all_of![less_than(0), Exploding];
    assert!(!matcher.matches(&Value::from(1)));

    let mut mismatch = Description::new();
    assert!(!matcher.explain(&Value::from(1), &mut mismatch));
    assert_eq!(mismatch.as_str(), "<1> was greater than <0>");

    let mut mismatch = Description::new();
    matcher.describe_mismatch(&Value::from(1), &mut mismatch);
    assert_eq!(mismatch.as_str(), "<1> was greater than <0>");
}

#[test]
fn disjunction_short_circuits_in_order() {
    let matcher = any_of![greater_than(0), Exploding];
    assert!(matcher.matches(&Value::from(1)));
    assert!(matcher.explain(&Value::from(1), &mut Description::new()));
}

#[test]
fn conjunction_reports_only_the_first_failure() {
    let first = Counting::new(less_than(0));
    let second = Counting::new(less_than(-10));
    let matcher = all_of![first.clone(), second.clone()];

    let mut mismatch = Description::new();
    matcher.describe_mismatch(&Value::from(5), &mut mismatch);

    assert_eq!(mismatch.as_str(), "<5> was greater than <0>");
    assert_eq!(first.calls(), 1);
    assert_eq!(second.calls(), 0);
}

#[test]
fn ordering_family() {
    assert!(greater_than(1).matches(&Value::from(2)));
    assert!(!greater_than(1).matches(&Value::from(1)));
    assert!(!greater_than(1).matches(&Value::from(0)));
    assert!(compares_equal_to(5).matches(&Value::from(5)));
    assert!(!compares_equal_to(5).matches(&Value::from(4)));

    let mut mismatch = Description::new();
    greater_than(1).describe_mismatch(&Value::from(0), &mut mismatch);
    assert_eq!(mismatch.as_str(), "<0> was less than <1>");
}

#[test]
fn value_formatting() {
    let mut d = Description::new();
    d.append_value("hello");
    assert_eq!(d.as_str(), "\"hello\"");

    let mut d = Description::new();
    d.append_value(&Value::Null);
    assert_eq!(d.as_str(), "null");

    let mut d = Description::new();
    d.append_value(&1);
    assert_eq!(d.as_str(), "<1>");
}

#[test]
fn unprintable_values_still_describe() {
    let matcher = equal_to(1);
    let mut mismatch = Description::new();
    matcher.describe_mismatch(&Value::custom(Unprintable), &mut mismatch);
    assert_eq!(mismatch.as_str(), "was <unprintable (unprintable)>");
}

#[test]
fn feature_extraction_reuses_the_decided_value() {
    let (calls, extract) = ticking();
    let matcher = applying(extract, equal_to(100));
    let item = Value::from("anything");

    assert!(!matcher.matches(&item));
    let mut mismatch = Description::new();
    matcher.describe_mismatch(&item, &mut mismatch);

    assert_eq!(mismatch.as_str(), "was <1>");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn feature_extraction_with_a_draining_source() {
    let matcher = applying(
        draining(vec![Value::from("first"), Value::from("second")]),
        equal_to("second"),
    );
    let item = Value::from(0);

    assert!(!matcher.matches(&item));
    let mut mismatch = Description::new();
    matcher.describe_mismatch(&item, &mut mismatch);
    assert_eq!(mismatch.as_str(), "was \"first\"");
}

#[test]
fn nested_feature_mismatch_reuses_the_decided_value() {
    let item = Value::from("x");

    let (calls, extract) = ticking();
    let matcher = all_of![applying(extract, equal_to(10))];
    assert!(!matcher.matches(&item));
    let mut mismatch = Description::new();
    matcher.describe_mismatch(&item, &mut mismatch);
    assert_eq!(mismatch.as_str(), "was <1>");
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let (calls, extract) = ticking();
    let matcher = any_of![less_than(0), applying(extract, equal_to(10))];
    assert!(!matcher.matches(&item));
    let mut mismatch = Description::new();
    matcher.describe_mismatch(&item, &mut mismatch);
    assert_eq!(
        mismatch.as_str(),
        "\"x\" could not be compared to <0> and was <1>"
    );
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn negated_feature_mismatch_agrees_with_the_verdict() {
    let item = Value::from("x");

    let (calls, extract) = ticking();
    let matcher = not(applying(extract, equal_to(1)));
    assert!(!matcher.matches(&item));
    let mut mismatch = Description::new();
    matcher.describe_mismatch(&item, &mut mismatch);
    assert_eq!(mismatch.as_str(), "was \"x\"");
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let (calls, extract) = ticking();
    let matcher = all_of![not(applying(extract, equal_to(1)))];
    assert!(!matcher.matches(&item));
    let mut mismatch = Description::new();
    assert!(!matcher.explain(&item, &mut mismatch));
    assert_eq!(mismatch.as_str(), "was \"x\"");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn nested_draining_source_is_read_once_per_verdict() {
    let item = Value::from(0);

    let matcher = all_of![
        greater_than(-1),
        applying(draining(vec![Value::from("first"), Value::from("second")]), equal_to("second")),
    ];
    assert!(!matcher.matches(&item));
    let mut mismatch = Description::new();
    matcher.describe_mismatch(&item, &mut mismatch);
    assert_eq!(mismatch.as_str(), "was \"first\"");

    let matcher = any_of![
        applying(draining(vec![Value::from("first"), Value::from("second")]), equal_to("second")),
        less_than(0),
    ];
    assert!(!matcher.matches(&item));
    let mut mismatch = Description::new();
    matcher.describe_mismatch(&item, &mut mismatch);
    assert_eq!(mismatch.as_str(), "was \"first\" and <0> was equal to <0>");

    let matcher = not(applying(
        draining(vec![Value::from("first"), Value::from("second")]),
        equal_to("first"),
    ));
    assert!(!matcher.matches(&item));
    let mut mismatch = Description::new();
    matcher.describe_mismatch(&item, &mut mismatch);
    assert_eq!(mismatch.as_str(), "was <0>");
}

#[test]
fn panicking_display_does_not_break_reports() {
    let err = check_that(Value::custom(Panicky), &equal_to(1)).unwrap_err();
    assert_eq!(err.actual, "was <panicky (unprintable)>");
}

#[test]
fn shared_matcher_across_threads() {
    let matcher: Arc<dyn Matcher> = Arc::new(applying(|s: &str| s.len(), greater_than(3)));
    let handles: Vec<_> = (0..4)
        .map(|n| {
            let matcher = Arc::clone(&matcher);
            std::thread::spawn(move || {
                let item = Value::from("x".repeat(n + 2));
                let matched = matcher.matches(&item);
                let mut mismatch = Description::new();
                matcher.describe_mismatch(&item, &mut mismatch);
                (matched, mismatch.into_string())
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results[0], (false, "<2> was less than <3>".to_string()));
    assert_eq!(results[1], (false, "<3> was equal to <3>".to_string()));
    assert!(results[2].0);
    assert!(results[3].0);
}

#[test]
fn assert_that_end_to_end() {
    assert_that!(2, all_of![greater_than(0), less_than(5)]);

    let err = check_that(2, &all_of![greater_than(5), less_than(10)]).unwrap_err();
    assert!(err
        .expected
        .contains("a value greater than <5> and a value less than <10>"));
    assert_eq!(err.actual, "<2> was less than <5>");

    let report = std::panic::catch_unwind(|| {
        assert_that!(2, all_of![greater_than(5), less_than(10)]);
    })
    .unwrap_err();
    let message = report
        .downcast_ref::<String>()
        .cloned()
        .unwrap_or_default();
    assert!(message.contains("Expected: (a value greater than <5> and a value less than <10>)"));
    assert!(message.contains("     got: <2> was less than <5>"));
}
