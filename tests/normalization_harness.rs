#![allow(unused)]
//! Actor normalization integration harness.
//!
//! # What this covers
//!
//! - **Alias table**: known provider spellings for each bucket, including the
//!   joint SAF/RSF name that must resolve to RSF because of rule order.
//! - **Fallback**: unrecognised and empty names land in `Other Armed Groups`
//!   without error.
//! - **Purity**: classification is deterministic and ignores case and
//!   whitespace runs (proptest).
//! - **Period tagging**: records on the break date are tagged `war`.
//! - **Audit**: one row per distinct actor with its occurrence count and the
//!   rule that placed it.
//! - **Replacement tables**: a taxonomy file on disk replaces the embedded one.
//!
//! # Running
//!
//! ```sh
//! cargo test --test normalization_harness
//! ```

mod common;
use common::*;

use ced_core::{ActorBucket, ActorNormalizer, Period, Taxonomy, TaxonomyError};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

// ---------------------------------------------------------------------------
// Alias table
// ---------------------------------------------------------------------------

#[rstest]
#[case("Rapid Support Forces", ActorBucket::Rsf)]
#[case("Military Forces of Sudan (2019-2023) Rapid Support Forces", ActorBucket::Rsf)]
#[case("RSF", ActorBucket::Rsf)]
#[case("Military Forces of Sudan (2019-)", ActorBucket::Saf)]
#[case("Government of Sudan (2019-)", ActorBucket::Saf)]
#[case("Sudanese Armed Forces", ActorBucket::Saf)]
#[case("SAF", ActorBucket::Saf)]
#[case("Protesters (Sudan)", ActorBucket::ProtestGroups)]
#[case("Rioters (Sudan)", ActorBucket::ProtestGroups)]
#[case("Demonstrators (Sudan)", ActorBucket::ProtestGroups)]
#[case("Unidentified Armed Group (Sudan)", ActorBucket::OtherArmedGroups)]
#[case("Police Forces of Sudan (2019-)", ActorBucket::OtherArmedGroups)]
fn known_aliases_classify(#[case] name: &str, #[case] bucket: ActorBucket) {
    assert_bucket!(Taxonomy::builtin(), name, bucket);
}

#[test]
fn joint_alias_is_matched_by_an_rsf_rule() {
    let taxonomy = Taxonomy::builtin();
    let c = taxonomy.classify("Military Forces of Sudan (2019-2023) Rapid Support Forces");
    let rule = &taxonomy.rules()[c.rule.unwrap()];
    assert_eq!(rule.bucket, ActorBucket::Rsf);
    // An SAF rule later in the table would also match this name.
    assert!(taxonomy
        .rules()
        .iter()
        .skip(c.rule.unwrap() + 1)
        .any(|r| r.bucket == ActorBucket::Saf && r.pattern.contains("military forces of sudan")));
}

#[test]
fn saf_acronym_needs_a_word_boundary() {
    let taxonomy = Taxonomy::builtin();
    assert_bucket!(taxonomy, "Safety Committee", ActorBucket::OtherArmedGroups);
}

// ---------------------------------------------------------------------------
// Fallback
// ---------------------------------------------------------------------------

#[rstest]
#[case("")]
#[case("   ")]
#[case("Civilians (Sudan)")]
fn unrecognised_names_fall_back(#[case] name: &str) {
    let c = Taxonomy::builtin().classify(name);
    assert!(c.is_fallback());
    assert_eq!(c.bucket, ActorBucket::OtherArmedGroups);
}

#[test]
fn generated_names_fall_back() {
    let taxonomy = Taxonomy::builtin();
    for name in unmapped_actor_names(25) {
        assert_bucket!(taxonomy, &name, ActorBucket::OtherArmedGroups);
    }
}

#[test]
fn missing_actor1_is_attributed_to_fallback() {
    let events = normalized(vec![EventRecordBuilder::new("2023-05-01")
        .actor2("Rapid Support Forces")
        .build()]);
    assert_eq!(events[0].actor_bucket, ActorBucket::OtherArmedGroups);
    assert_eq!(events[0].counterpart_bucket, Some(ActorBucket::Rsf));
}

// ---------------------------------------------------------------------------
// Purity
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn classification_is_deterministic(name in ".{0,60}") {
        let taxonomy = Taxonomy::builtin();
        prop_assert_eq!(taxonomy.classify(&name), taxonomy.classify(&name));
    }

    #[test]
    fn classification_ignores_case_and_spacing(
        idx in 0usize..4,
        upper in any::<bool>(),
        pad in 1usize..4,
    ) {
        let names = [
            "Rapid Support Forces",
            "Military Forces of Sudan (2019-)",
            "Protesters (Sudan)",
            "Unidentified Armed Group (Sudan)",
        ];
        let taxonomy = Taxonomy::builtin();
        let base = names[idx];
        let cased = if upper { base.to_uppercase() } else { base.to_lowercase() };
        let spaced = format!("{}{}{}", " ".repeat(pad), cased.replace(' ', &" ".repeat(pad)), " ".repeat(pad));
        prop_assert_eq!(taxonomy.classify(&spaced).bucket, taxonomy.classify(base).bucket);
    }
}

// ---------------------------------------------------------------------------
// Period tagging
// ---------------------------------------------------------------------------

#[rstest]
#[case("2023-04-14", Period::PreWar)]
#[case("2023-04-15", Period::War)]
#[case("2019-04-15", Period::PreWar)]
#[case("2025-01-23", Period::War)]
fn normalized_records_carry_their_period(#[case] day: &str, #[case] period: Period) {
    let events = normalized(vec![EventRecordBuilder::new(day).build()]);
    assert_eq!(events[0].period, period);
}

#[test]
fn normalization_preserves_order_and_fields() {
    let records = vec![
        EventRecordBuilder::new("2023-05-01").actor1("Rapid Support Forces").fatalities(4).build(),
        EventRecordBuilder::new("2022-05-01").actor1("Protesters (Sudan)").build(),
    ];
    let events = normalized(records.clone());
    let back: Vec<_> = events.iter().map(|e| e.event.clone()).collect();
    assert_eq!(back, records);
    assert_eq!(
        events.iter().map(|e| e.actor_bucket).collect::<Vec<_>>(),
        [ActorBucket::Rsf, ActorBucket::ProtestGroups]
    );
}

// ---------------------------------------------------------------------------
// Audit
// ---------------------------------------------------------------------------

#[test]
fn audit_lists_each_actor_once() {
    let records = vec![
        EventRecordBuilder::new("2023-05-01")
            .actor1("Rapid Support Forces")
            .actor2("Civilians (Sudan)")
            .build(),
        EventRecordBuilder::new("2023-05-02")
            .actor1("Military Forces of Sudan (2019-)")
            .actor2("Rapid Support Forces")
            .build(),
    ];
    let taxonomy = Taxonomy::builtin();
    let audit = ActorNormalizer::new(&taxonomy).audit(&records);

    let rows: Vec<(&str, ActorBucket, usize)> = audit
        .iter()
        .map(|a| (a.actor.as_str(), a.bucket, a.occurrences))
        .collect();
    assert_eq!(
        rows,
        [
            ("Civilians (Sudan)", ActorBucket::OtherArmedGroups, 1),
            ("Military Forces of Sudan (2019-)", ActorBucket::Saf, 1),
            ("Rapid Support Forces", ActorBucket::Rsf, 2),
        ]
    );
    assert_eq!(audit[0].rule, None);
    assert_eq!(audit[2].rule.as_deref(), Some("exact:Rapid Support Forces"));
}

// ---------------------------------------------------------------------------
// Replacement tables
// ---------------------------------------------------------------------------

#[test]
fn taxonomy_file_replaces_builtin_rules() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taxonomy.toml");
    std::fs::write(
        &path,
        r#"
version = "test.1"

[[rules]]
kind = "contains"
pattern = "police"
bucket = "SAF"
"#,
    )
    .unwrap();

    let taxonomy = Taxonomy::load(&path).unwrap();
    assert_eq!(taxonomy.version(), "test.1");
    assert_bucket!(taxonomy, "Police Forces of Sudan (2019-)", ActorBucket::Saf);
    assert_bucket!(taxonomy, "Rapid Support Forces", ActorBucket::OtherArmedGroups);
}

#[test]
fn taxonomy_with_bad_regex_is_rejected() {
    let err = Taxonomy::from_toml_str(
        r#"
version = "bad.1"

[[rules]]
kind = "regex"
pattern = "(unclosed"
bucket = "RSF"
"#,
    )
    .unwrap_err();
    assert!(matches!(err, TaxonomyError::InvalidRegex { index: 0, .. }), "{err:?}");
}
