use super::*;
use crate::error::DbError;

const USERS: ColumnAliases = ColumnAliases::new(&[("firstName", "first_name")]);

const COMPANIES: ColumnAliases =
    ColumnAliases::new(&[("numEmployees", "num_employees"), ("logoUrl", "logo_url")]);

fn debug_params(params: &ParamList) -> Vec<String> {
    params.iter().map(|p| format!("{p:?}")).collect()
}

// ==================== partial_update ====================

#[test]
fn single_aliased_field() {
    let set = partial_update(&Changeset::new().set("firstName", "Marty"), &USERS).unwrap();
    assert_eq!(set.clause, r#""first_name"=$1"#);
    assert_eq!(debug_params(&set.params), vec![r#""Marty""#]);
}

#[test]
fn value_is_passed_through_uncoerced() {
    let set = partial_update(&Changeset::new().set("numEmployees", "7"), &COMPANIES).unwrap();
    assert_eq!(set.clause, r#""num_employees"=$1"#);
    assert_eq!(debug_params(&set.params), vec![r#""7""#]);
}

#[test]
fn unaliased_field_is_used_verbatim() {
    let changes = Changeset::new()
        .set("firstName", "Aliya")
        .set("age", 32_i32);
    let set = partial_update(&changes, &USERS).unwrap();
    assert_eq!(set.clause, r#""first_name"=$1, "age"=$2"#);
    assert_eq!(debug_params(&set.params), vec![r#""Aliya""#, "32"]);
}

#[test]
fn placeholders_follow_insertion_order() {
    let changes = Changeset::new()
        .set("logoUrl", "http://a.img")
        .set("name", "Acme")
        .set("numEmployees", 12_i32)
        .set("description", "Anvils");
    let set = partial_update(&changes, &COMPANIES).unwrap();

    assert_eq!(
        set.clause,
        r#""logo_url"=$1, "name"=$2, "num_employees"=$3, "description"=$4"#
    );
    assert_eq!(set.clause.split(", ").count(), changes.len());
    assert_eq!(set.params.len(), 4);
    assert_eq!(set.next_index(), 5);
}

#[test]
fn resetting_a_field_keeps_its_position() {
    let changes = Changeset::new()
        .set("name", "First")
        .set("description", "d")
        .set("name", "Second");
    let set = partial_update(&changes, &COMPANIES).unwrap();
    assert_eq!(set.clause, r#""name"=$1, "description"=$2"#);
    assert_eq!(debug_params(&set.params), vec![r#""Second""#, r#""d""#]);
}

#[test]
fn empty_changeset_is_rejected() {
    let err = partial_update(&Changeset::new(), &COMPANIES).unwrap_err();
    assert!(matches!(err, DbError::InvalidInput(InvalidInput::NoData)));
}

#[test]
fn same_input_renders_identically() {
    let build = || {
        let changes = Changeset::new().set("numEmployees", 3_i32).set("name", "X");
        partial_update(&changes, &COMPANIES).unwrap().clause
    };
    assert_eq!(build(), build());
}

#[test]
fn restricted_table_rejects_unlisted_fields() {
    const RESTRICTED: ColumnAliases =
        ColumnAliases::new(&[("numEmployees", "num_employees")]).restrict_to(&["name", "numEmployees"]);

    let ok = partial_update(&Changeset::new().set("numEmployees", 1_i32), &RESTRICTED).unwrap();
    assert_eq!(ok.clause, r#""num_employees"=$1"#);

    let err = partial_update(
        &Changeset::new()
            .set("name", "ok")
            .set("handle\"=$1; DROP TABLE companies; --", "x"),
        &RESTRICTED,
    )
    .unwrap_err();
    match err {
        DbError::InvalidInput(InvalidInput::UnknownField { field }) => {
            assert!(field.starts_with("handle"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn quotes_in_fallback_names_are_escaped() {
    let set = partial_update(&Changeset::new().set("we\"ird", 1_i32), &USERS).unwrap();
    assert_eq!(set.clause, r#""we""ird"=$1"#);
}

#[test]
fn push_opt_skips_none() {
    let mut changes = Changeset::new();
    changes
        .push_opt("name", Some("Acme".to_string()))
        .push_opt::<String>("description", None)
        .push_opt("numEmployees", Some(4_i32));
    assert_eq!(changes.fields().collect::<Vec<_>>(), vec!["name", "numEmployees"]);
}

#[test]
fn resolve_column_defaults_to_identity() {
    assert_eq!(resolve_column("numEmployees", &COMPANIES), "num_employees");
    assert_eq!(resolve_column("name", &COMPANIES), "name");
}

// ==================== WhereBuilder ====================

#[test]
fn empty_builder_yields_no_clause() {
    let w = WhereBuilder::new().build();
    assert!(w.is_empty());
    assert!(w.params.is_empty());
    assert_eq!(w.to_sql_suffix(), "");
}

#[test]
fn conditions_share_one_counter() {
    let mut w = WhereBuilder::new();
    w.and_gte("num_employees", 10_i32)
        .and_lte("num_employees", 50_i32)
        .and_icontains("name", "net");
    let w = w.build();
    assert_eq!(
        w.clause,
        "num_employees >= $1 AND num_employees <= $2 AND name ILIKE '%' || $3 || '%'"
    );
    assert_eq!(debug_params(&w.params), vec!["10", "50", r#""net""#]);
    assert_eq!(w.to_sql_suffix(), format!(" WHERE {}", w.clause));
}

#[test]
fn skipped_options_do_not_consume_placeholders() {
    let mut w = WhereBuilder::new();
    w.and_gte_opt::<i32>("num_employees", None)
        .and_lte_opt("num_employees", Some(5_i32))
        .and_icontains_opt("name", Some("a"));
    assert_eq!(w.param_count(), 2);
    assert_eq!(
        w.build().clause,
        "num_employees <= $1 AND name ILIKE '%' || $2 || '%'"
    );
}

#[test]
fn eq_opt_adds_only_present_values() {
    let mut w = WhereBuilder::new();
    w.and_eq_opt::<String>("handle", None)
        .and_eq_opt("name", Some("Acme"));
    let w = w.build();
    assert_eq!(w.clause, "name = $1");
    assert_eq!(debug_params(&w.params), vec![r#""Acme""#]);
}

#[test]
fn offset_shifts_placeholders() {
    let mut w = WhereBuilder::with_offset(2);
    w.and_eq("handle", "c1").and_ilike("name", "C%");
    assert_eq!(w.build().clause, "handle = $3 AND name ILIKE $4");
}
