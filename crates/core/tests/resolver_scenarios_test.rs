use dbexpect_core::{
    AssertionMode, ConfigError, DatasetLocation, EffectiveCheck, ExpectationResolver,
    ExpectationScope, ExpectationSpec, ModifierRegistry, ReplaceValues, Value,
};

fn class_scope(spec: ExpectationSpec) -> ExpectationScope {
    ExpectationScope::single("class OrderServiceTest", spec)
}

fn method_scope(spec: ExpectationSpec) -> ExpectationScope {
    ExpectationScope::single("method places_order", spec)
}

fn tables(checks: &[EffectiveCheck]) -> Vec<Option<&str>> {
    checks.iter().map(|check| check.spec().table()).collect()
}

#[test]
fn different_tables_with_override_are_both_kept() {
    let scopes = [
        class_scope(ExpectationSpec::default().with_table("orders")),
        method_scope(
            ExpectationSpec::default()
                .with_table("payments")
                .with_override(true),
        ),
    ];

    let checks = ExpectationResolver::new()
        .resolve(&scopes)
        .expect("scopes must resolve");

    assert_eq!(tables(&checks), [Some("orders"), Some("payments")]);
    assert_eq!(checks[0].scope(), "class OrderServiceTest");
    assert_eq!(checks[1].scope(), "method places_order");
}

#[test]
fn same_table_with_override_keeps_only_inner() {
    let scopes = [
        class_scope(ExpectationSpec::default().with_table("orders")),
        method_scope(
            ExpectationSpec::new(DatasetLocation::parse("orders-after.yml"))
                .with_table("orders")
                .with_override(true),
        ),
    ];

    let checks = ExpectationResolver::new()
        .resolve(&scopes)
        .expect("scopes must resolve");

    assert_eq!(checks.len(), 1);
    assert_eq!(checks[0].scope(), "method places_order");
    assert_eq!(
        checks[0].spec().location(),
        &DatasetLocation::Path("orders-after.yml".to_string())
    );
}

#[test]
fn non_overriding_inner_runs_after_outer() {
    let scopes = [
        class_scope(ExpectationSpec::new(DatasetLocation::parse("class.yml"))),
        method_scope(
            ExpectationSpec::new(DatasetLocation::parse("method.yml"))
                .with_override(false)
                .with_assertion_mode(AssertionMode::NonStrictUnordered),
        ),
    ];

    let checks = ExpectationResolver::new()
        .resolve(&scopes)
        .expect("scopes must resolve");

    let scopes: Vec<_> = checks.iter().map(EffectiveCheck::scope).collect();
    assert_eq!(scopes, ["class OrderServiceTest", "method places_order"]);
    assert_eq!(
        checks[1].spec().assertion_mode(),
        AssertionMode::NonStrictUnordered
    );
}

#[test]
fn untargeted_override_discards_outer() {
    let scopes = [
        class_scope(ExpectationSpec::new(DatasetLocation::parse("class.yml"))),
        method_scope(ExpectationSpec::new(DatasetLocation::parse("method.yml"))),
    ];

    let checks = ExpectationResolver::new()
        .resolve(&scopes)
        .expect("scopes must resolve");

    assert_eq!(checks.len(), 1);
    assert_eq!(checks[0].scope(), "method places_order");
}

#[test]
fn query_without_table_fails_before_any_check_is_produced() {
    let scopes = [
        class_scope(ExpectationSpec::default().with_table("orders")),
        method_scope(ExpectationSpec::default().with_query("SELECT * FROM orders")),
    ];

    let error = ExpectationResolver::new()
        .resolve(&scopes)
        .expect_err("query without table must be rejected");

    match &error {
        ConfigError::QueryWithoutTable { scope, query } => {
            assert_eq!(scope, "method places_order");
            assert_eq!(query, "SELECT * FROM orders");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(error.to_string().contains("`table` is empty"));
}

#[test]
fn query_with_table_is_accepted() {
    let scopes = [method_scope(
        ExpectationSpec::default()
            .with_table("orders")
            .with_query("SELECT id FROM orders WHERE status = 'PAID'"),
    )];

    let checks = ExpectationResolver::new()
        .resolve(&scopes)
        .expect("query with table must resolve");

    assert_eq!(
        checks[0].spec().query(),
        Some("SELECT id FROM orders WHERE status = 'PAID'")
    );
}

#[test]
fn registered_modifiers_pass_validation() {
    let mut registry = ModifierRegistry::new();
    registry
        .register("null-token", ReplaceValues::new("[null]", Value::Null))
        .expect("registration must succeed");

    let scopes = [method_scope(
        ExpectationSpec::default().with_modifiers(["null-token"]),
    )];

    let checks = ExpectationResolver::with_registry(&registry)
        .resolve(&scopes)
        .expect("known modifiers must resolve");

    assert_eq!(checks[0].spec().modifiers()[0].as_str(), "null-token");
}

#[test]
fn no_scopes_resolve_to_no_checks() {
    let checks = ExpectationResolver::new()
        .resolve(&[])
        .expect("empty scope list must resolve");

    assert!(checks.is_empty());
}
