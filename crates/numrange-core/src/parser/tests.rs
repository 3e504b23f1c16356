use super::*;
use crate::{
    config::ParserConfig,
    error::ErrorClass,
    mapping::IdentityWrapper,
    obs::{MetricsEvent, MetricsSink, ParseOutcome, with_metrics_sink},
    range::{BoundSide, Bounds, NumericKind, NumericRange},
    test_support::Harness,
    token::{Token, TokenStream, tokenize},
};
use proptest::prelude::*;
use std::cell::RefCell;

fn built(harness: &Harness, body: &str) -> Filter {
    harness
        .parse(body)
        .unwrap_or_else(|err| panic!("'{body}' should parse: {err}"))
}

fn bound_error(harness: &Harness, body: &str) -> (BoundSide, NumericKind, String) {
    match harness.parse(body) {
        Err(RangeParseError::BoundParse {
            side,
            kind,
            text,
            ..
        }) => (side, kind, text),
        other => panic!("'{body}' should fail on a bound, got {other:?}"),
    }
}

// ---------------------------------------------------------------------
// Bounds per kind
// ---------------------------------------------------------------------

#[test]
fn from_to_builds_inclusive_bounds_for_every_kind() {
    let harness = Harness::new();

    let cases = [
        ("age", NumericRange::Int32(Bounds::new(Some(18), Some(65)))),
        ("views", NumericRange::Int64(Bounds::new(Some(18), Some(65)))),
        ("score", NumericRange::Float32(Bounds::new(Some(18.0), Some(65.0)))),
        ("weight", NumericRange::Float64(Bounds::new(Some(18.0), Some(65.0)))),
    ];

    for (field, expected) in cases {
        let filter = built(&harness, &format!(r#"{{"{field}":{{"from":"18","to":"65"}}}}"#));
        let range = filter.range();

        assert_eq!(range.field(), field);
        assert_eq!(range.range(), &expected);
        assert!(range.include_lower());
        assert!(range.include_upper());
    }
}

#[test]
fn numeric_json_bounds_are_read_as_text() {
    let harness = Harness::new();
    let filter = built(&harness, r#"{"weight":{"gt":1.5,"lte":10}}"#);

    assert_eq!(
        filter.range().range(),
        &NumericRange::Float64(Bounds::new(Some(1.5), Some(10.0)))
    );
    assert!(!filter.range().include_lower());
    assert!(filter.range().include_upper());
}

#[test]
fn integral_fields_reject_decimal_json_numbers() {
    let harness = Harness::new();

    assert_eq!(
        bound_error(&harness, r#"{"age":{"from":5.0}}"#),
        (BoundSide::Lower, NumericKind::Int32, "5.0".to_string())
    );
    assert_eq!(
        bound_error(&harness, r#"{"views":{"from":1e10}}"#),
        (BoundSide::Lower, NumericKind::Int64, "1e10".to_string())
    );
    assert_eq!(
        bound_error(&harness, r#"{"age":{"from":"5.0"}}"#),
        (BoundSide::Lower, NumericKind::Int32, "5.0".to_string())
    );
}

#[test]
fn bound_errors_quote_json_number_as_written() {
    let harness = Harness::new();

    assert_eq!(
        bound_error(&harness, r#"{"views":{"to":-9223372036854775809}}"#),
        (
            BoundSide::Upper,
            NumericKind::Int64,
            "-9223372036854775809".to_string(),
        )
    );
}

#[test]
fn decimal_fields_accept_exponent_json_numbers() {
    let harness = Harness::new();
    let filter = built(&harness, r#"{"weight":{"from":1e10,"to":2.50}}"#);

    assert_eq!(
        filter.range().range(),
        &NumericRange::Float64(Bounds::new(Some(1e10), Some(2.5)))
    );
}

#[test]
fn int64_bounds_keep_full_precision() {
    let harness = Harness::new();

    for body in [
        r#"{"views":{"from":"9223372036854775807"}}"#,
        r#"{"views":{"from":9223372036854775807}}"#,
    ] {
        assert_eq!(
            built(&harness, body).range().range(),
            &NumericRange::Int64(Bounds::new(Some(i64::MAX), None))
        );
    }
}

#[test]
fn open_range_is_legal() {
    let harness = Harness::new();
    let filter = built(&harness, r#"{"age":{}}"#);

    assert!(filter.range().range().is_unbounded());
    assert_eq!(filter.range().kind(), NumericKind::Int32);
}

#[test]
fn inverted_range_still_builds() {
    let harness = Harness::new();
    let filter = built(&harness, r#"{"age":{"from":"9","to":"1"}}"#);

    assert!(filter.range().range().is_inverted());
}

// ---------------------------------------------------------------------
// Synonyms and overwrite order
// ---------------------------------------------------------------------

#[test]
fn gte_matches_from_with_include_lower() {
    let harness = Harness::new();

    let a = built(&harness, r#"{"age":{"gte":"5"}}"#);
    let b = built(&harness, r#"{"age":{"from":"5","include_lower":true}}"#);
    let c = built(&harness, r#"{"age":{"ge":"5"}}"#);

    assert_eq!(a, b);
    assert_eq!(a, c);
}

#[test]
fn exclusive_synonyms_match_explicit_flags() {
    let harness = Harness::new();

    let a = built(&harness, r#"{"age":{"gt":"1","lt":"9"}}"#);
    let b = built(
        &harness,
        r#"{"age":{"from":"1","to":"9","includeLower":false,"includeUpper":false}}"#,
    );

    assert_eq!(a, b);
}

#[test]
fn later_lower_key_wins_with_its_inclusivity() {
    let harness = Harness::new();
    let filter = built(&harness, r#"{"age":{"gt":"1","gte":"2"}}"#);

    assert_eq!(
        filter.range().range(),
        &NumericRange::Int32(Bounds::new(Some(2), None))
    );
    assert!(filter.range().include_lower());
}

#[test]
fn outer_keys_may_precede_the_field() {
    let harness = Harness::new();
    let filter = built(&harness, r#"{"_name":"n","_cache":false,"age":{"lt":"3"}}"#);

    assert_eq!(filter.range().field(), "age");
    assert!(harness.named.get("n").is_some());
}

// ---------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------

#[test]
fn unknown_field_is_mapping_error() {
    let harness = Harness::new();
    let err = harness.parse(r#"{"missing":{"from":"1"}}"#).unwrap_err();

    assert_eq!(
        err,
        RangeParseError::UnknownField {
            field: "missing".into(),
        }
    );
    assert_eq!(err.class(), ErrorClass::Mapping);
    assert_eq!(err.to_string(), "failed to find mapping for field 'missing'");
}

#[test]
fn non_numeric_fields_are_type_errors() {
    let harness = Harness::new();

    for field in ["title", "active", "created"] {
        let err = harness
            .parse(&format!(r#"{{"{field}":{{"from":"1"}}}}"#))
            .unwrap_err();

        assert_eq!(
            err,
            RangeParseError::NotNumeric {
                field: field.into(),
            }
        );
        assert_eq!(err.class(), ErrorClass::Type);
    }
}

#[test]
fn malformed_lower_bound_is_bound_parse_error() {
    let harness = Harness::new();
    let err = harness
        .parse(r#"{"age":{"from":"not-a-number"}}"#)
        .unwrap_err();

    assert_eq!(err.field(), Some("age"));
    assert_eq!(
        bound_error(&harness, r#"{"age":{"from":"not-a-number"}}"#),
        (
            BoundSide::Lower,
            NumericKind::Int32,
            "not-a-number".to_string(),
        )
    );
}

#[test]
fn out_of_range_and_fractional_integers_are_rejected() {
    let harness = Harness::new();

    for body in [
        r#"{"age":{"to":"2147483648"}}"#,
        r#"{"age":{"to":"1.5"}}"#,
        r#"{"views":{"to":"9223372036854775808"}}"#,
        r#"{"score":{"to":"1e39"}}"#,
    ] {
        let (side, _, _) = bound_error(&harness, body);

        assert_eq!(side, BoundSide::Upper, "{body}");
    }
}

#[test]
fn structural_failures_never_register_or_cache() {
    let harness = Harness::new();

    for body in [
        r#"{"age":"5","_name":"n"}"#,
        r#"{"age":{"from":{"x":1}},"_name":"n"}"#,
        r#"{"age":{"from":[1]},"_name":"n"}"#,
        r#"{"_name":"n","_cache":true}"#,
        r#"{"age":{},"views":{},"_name":"n"}"#,
        r#"["age"]"#,
    ] {
        let err = harness.parse(body).unwrap_err();
        assert_eq!(err.class(), ErrorClass::Structural, "{body}");
    }

    assert!(harness.named.is_empty());
    assert!(harness.cache.is_empty());
}

#[test]
fn failed_bound_does_not_register_name() {
    let harness = Harness::new();
    let result = harness.parse(r#"{"age":{"from":"x"},"_name":"n","_cache":true}"#);

    assert!(result.is_err());
    assert!(harness.named.is_empty());
    assert!(harness.cache.is_empty());
}

// ---------------------------------------------------------------------
// Post-processing
// ---------------------------------------------------------------------

#[test]
fn same_name_twice_keeps_latest_filter() {
    let harness = Harness::new();

    built(&harness, r#"{"age":{"from":"1"},"_name":"n"}"#);
    let second = built(&harness, r#"{"age":{"from":"2"},"_name":"n"}"#);

    assert_eq!(harness.named.len(), 1);
    assert_eq!(harness.named.get("n"), Some(second));
}

#[test]
fn identical_cached_filters_share_one_entry() {
    let harness = Harness::new();

    let a = built(&harness, r#"{"age":{"from":"1","to":"5"},"_cache":true}"#);
    let b = built(&harness, r#"{"age":{"gte":"1","lte":"5"},"_cache":"true"}"#);
    let c = built(&harness, r#"{"age":{"gt":"1","lte":"5"},"_cache":true}"#);

    let (a, b, c) = (
        a.cached().unwrap(),
        b.cached().unwrap(),
        c.cached().unwrap(),
    );
    assert!(a.shares_entry_with(b));
    assert!(!a.shares_entry_with(c));
    assert_eq!(harness.cache.len(), 2);
}

#[test]
fn fields_sharing_storage_share_cache_entry() {
    let harness = Harness::new();

    let a = built(&harness, r#"{"price":{"from":"1"},"_cache":true}"#);
    let b = built(&harness, r#"{"cost":{"from":"1"},"_cache":true}"#);

    assert!(a.cached().unwrap().shares_entry_with(b.cached().unwrap()));
}

#[test]
fn uncached_by_default_unless_configured() {
    let harness = Harness::new();
    let plain = built(&harness, r#"{"age":{"from":"1"}}"#);
    assert!(matches!(plain, Filter::Range(_)));

    let config = ParserConfig {
        cache_by_default: true,
        ..ParserConfig::default()
    };
    let ctx = harness.ctx().with_config(&config);

    let cached = harness.parse_with(&ctx, r#"{"age":{"from":"1"}}"#).unwrap();
    assert!(matches!(cached, Filter::Cached(_)));

    let opted_out = harness
        .parse_with(&ctx, r#"{"age":{"from":"1"},"_cache":false}"#)
        .unwrap();
    assert!(matches!(opted_out, Filter::Range(_)));
}

#[test]
fn type_prefixed_field_is_scoped_then_registered() {
    let harness = Harness::new();
    let filter = built(
        &harness,
        r#"{"product.price":{"lt":"10"},"_cache":true,"_name":"cheap"}"#,
    );

    let Filter::TypeScoped { doc_type, inner } = &filter else {
        panic!("expected type-scoped filter, got {filter:?}");
    };
    assert_eq!(doc_type, "product");
    assert!(matches!(**inner, Filter::Cached(_)));
    assert_eq!(filter.range().storage_name(), "price_dv");
    assert_eq!(harness.named.get("cheap"), Some(filter));
}

#[test]
fn identity_wrapper_skips_type_scope() {
    let harness = Harness::new();
    let ctx = harness.ctx().with_wrapper(&IdentityWrapper);
    let filter = harness
        .parse_with(&ctx, r#"{"product.price":{"lt":"10"}}"#)
        .unwrap();

    assert!(matches!(filter, Filter::Range(_)));
}

// ---------------------------------------------------------------------
// Cursor and dispatch
// ---------------------------------------------------------------------

#[test]
fn parse_stops_after_outer_object() {
    let harness = Harness::new();
    let mut tokens = TokenStream::new(vec![
        Token::StartObject,
        Token::field("age"),
        Token::StartObject,
        Token::field("from"),
        Token::text("1"),
        Token::EndObject,
        Token::EndObject,
        Token::field("next"),
    ]);

    NumericRangeFilterParser
        .parse(&harness.ctx(), &mut tokens)
        .unwrap();

    assert_eq!(tokens.remaining(), 1);
}

#[test]
fn registry_dispatches_every_parser_name() {
    let harness = Harness::new();
    let registry = FilterParserRegistry::with_defaults().unwrap();

    for name in NumericRangeFilterParser::NAMES {
        let body = format!(r#"{{"{name}":{{"age":{{"lt":"3"}}}}}}"#);
        let mut tokens = tokenize(&body).unwrap();
        let filter = registry.parse_filter(&harness.ctx(), &mut tokens).unwrap();

        assert_eq!(filter.range().field(), "age");
        assert!(tokens.is_exhausted());
    }
}

#[test]
fn registry_rejects_unknown_filter_name() {
    let harness = Harness::new();
    let registry = FilterParserRegistry::with_defaults().unwrap();
    let mut tokens = tokenize(r#"{"geo_distance":{"age":{}}}"#).unwrap();

    assert_eq!(
        registry.parse_filter(&harness.ctx(), &mut tokens),
        Err(RangeParseError::UnknownFilter {
            name: "geo_distance".into(),
        })
    );
}

#[test]
fn registry_rejects_duplicate_registration() {
    let mut registry = FilterParserRegistry::with_defaults().unwrap();

    assert_eq!(
        registry.register(Arc::new(NumericRangeFilterParser)),
        Err(RegistryError::DuplicateName {
            name: "numeric_range".into(),
        })
    );
    assert_eq!(
        registry.alias("numericRange", "numeric_range"),
        Err(RegistryError::DuplicateName {
            name: "numericRange".into(),
        })
    );
}

#[test]
fn configured_aliases_dispatch_to_target() {
    let mut config = ParserConfig::default();
    config
        .aliases
        .insert("num_range".into(), "numeric_range".into());
    let registry = FilterParserRegistry::from_config(&config).unwrap();
    assert!(registry.get("num_range").is_some());

    config.aliases.insert("bad".into(), "geo".into());
    assert_eq!(
        FilterParserRegistry::from_config(&config).unwrap_err(),
        RegistryError::UnknownTarget {
            alias: "bad".into(),
            target: "geo".into(),
        }
    );
}

// ---------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------

#[derive(Default)]
struct CaptureSink {
    outcomes: RefCell<Vec<(Option<String>, ParseOutcome)>>,
    starts: RefCell<usize>,
}

impl MetricsSink for CaptureSink {
    fn record(&self, event: MetricsEvent<'_>) {
        match event {
            MetricsEvent::ParseStart => *self.starts.borrow_mut() += 1,
            MetricsEvent::ParseFinish { field, outcome } => self
                .outcomes
                .borrow_mut()
                .push((field.map(str::to_string), outcome)),
            MetricsEvent::CacheMemoized { .. } | MetricsEvent::NamedFilterRegistered { .. } => {}
        }
    }
}

#[test]
fn parse_records_start_and_classified_finish() {
    let harness = Harness::new();
    let sink = CaptureSink::default();

    with_metrics_sink(&sink, || {
        let _ = harness.parse(r#"{"age":{"from":"1"}}"#);
        let _ = harness.parse(r#"{"missing":{}}"#);
        let _ = harness.parse(r#"{"title":{}}"#);
        let _ = harness.parse(r#"{"age":{"to":"x"}}"#);
        let _ = harness.parse("{}");
    });

    assert_eq!(*sink.starts.borrow(), 5);
    assert_eq!(
        *sink.outcomes.borrow(),
        vec![
            (Some("age".to_string()), ParseOutcome::Built),
            (
                Some("missing".to_string()),
                ParseOutcome::Failed(ErrorClass::Mapping),
            ),
            (
                Some("title".to_string()),
                ParseOutcome::Failed(ErrorClass::Type),
            ),
            (
                Some("age".to_string()),
                ParseOutcome::Failed(ErrorClass::BoundParse),
            ),
            (None, ParseOutcome::Failed(ErrorClass::Structural)),
        ]
    );
}

// ---------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------

fn arb_lower_key() -> impl Strategy<Value = (&'static str, Option<bool>)> {
    prop_oneof![
        Just(("from", None)),
        Just(("gt", Some(false))),
        Just(("gte", Some(true))),
        Just(("ge", Some(true))),
    ]
}

fn arb_upper_key() -> impl Strategy<Value = (&'static str, Option<bool>)> {
    prop_oneof![
        Just(("to", None)),
        Just(("lt", Some(false))),
        Just(("lte", Some(true))),
        Just(("le", Some(true))),
    ]
}

proptest! {
    #[test]
    fn int64_bounds_round_trip_through_any_synonym(
        lower in any::<i64>(),
        upper in any::<i64>(),
        (lower_key, lower_inclusive) in arb_lower_key(),
        (upper_key, upper_inclusive) in arb_upper_key(),
    ) {
        let harness = Harness::new();
        let body = format!(
            r#"{{"views":{{"{lower_key}":"{lower}","{upper_key}":{upper}}}}}"#
        );
        let filter = harness.parse(&body).unwrap();
        let range = filter.range();

        prop_assert_eq!(
            range.range(),
            &NumericRange::Int64(Bounds::new(Some(lower), Some(upper)))
        );
        prop_assert_eq!(range.include_lower(), lower_inclusive.unwrap_or(true));
        prop_assert_eq!(range.include_upper(), upper_inclusive.unwrap_or(true));
    }

    #[test]
    fn int32_accepts_exactly_its_own_range(value in any::<i64>()) {
        let harness = Harness::new();
        let result = harness.parse(&format!(r#"{{"age":{{"from":{value}}}}}"#));

        match i32::try_from(value) {
            Ok(native) => {
                let filter = result.unwrap();
                prop_assert_eq!(
                    filter.range().range(),
                    &NumericRange::Int32(Bounds::new(Some(native), None))
                );
            }
            Err(_) => prop_assert_eq!(result.unwrap_err().class(), ErrorClass::BoundParse),
        }
    }

    #[test]
    fn decimal_json_numbers_never_reach_integral_fields(
        whole in any::<i32>(),
        fraction in 0u8..100,
    ) {
        let harness = Harness::new();
        let literal = format!("{whole}.{fraction:02}");
        let body = format!(r#"{{"views":{{"lt":{literal}}}}}"#);

        let (side, kind, text) = bound_error(&harness, &body);
        prop_assert_eq!(side, BoundSide::Upper);
        prop_assert_eq!(kind, NumericKind::Int64);
        prop_assert_eq!(text, literal);
    }
}
