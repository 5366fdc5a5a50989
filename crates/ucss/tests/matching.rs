//! Integration tests for utility-class matching.
//!
//! Covers token resolution end to end:
//! - Emission order by class priority and weight tiers
//! - Numeric payloads (precision padding, fractions, reserved keywords)
//! - Pseudo-classes and breakpoint grouping
//! - Class and unit overrides

use proptest::prelude::*;
use ucss::{ClassOverride, Compiler, RuleGroups, STANDARD_GROUP};

fn compile(tokens: &str) -> RuleGroups {
    Compiler::new()
        .unwrap()
        .compile_classes(tokens.split_whitespace())
}

fn standard(groups: &RuleGroups) -> String {
    groups
        .get(STANDARD_GROUP)
        .iter()
        .map(ToString::to_string)
        .collect()
}

fn selectors(groups: &RuleGroups, group: &str) -> Vec<String> {
    groups
        .get(group)
        .iter()
        .map(|rule| rule.selector.clone())
        .collect()
}

// ============================================================================
// ORDERING
// ============================================================================

#[test]
fn test_priority_order_ignores_markup_order() {
    let css = standard(&compile("bgc-ff0000 jc-center d-flex"));
    let display = css.find("display:flex").unwrap();
    let justify = css.find("justify-content:center").unwrap();
    let background = css.find("background-color:#ff0000").unwrap();
    assert!(display < justify);
    assert!(justify < background);
}

#[test]
fn test_weight_tiers_within_one_class() {
    let groups = compile("m-i-2 m-2px m-2");
    assert_eq!(
        selectors(&groups, STANDARD_GROUP),
        vec!["m-2", "m-2px", "m-i-2"]
    );
    let css = standard(&groups);
    assert!(css.contains(".m-2{\n\tmargin:0.2rem;\n}"));
    assert!(css.contains(".m-2px{\n\tmargin:2px;\n}"));
    assert!(css.contains(".m-i-2{\n\tmargin:0.2rem !important;\n}"));
}

#[test]
fn test_multi_property_class() {
    let css = standard(&compile("ph-10"));
    assert_eq!(
        css,
        ".ph-10{\n\tpadding-left:1.0rem;\n\tpadding-right:1.0rem;\n}\n"
    );
}

// ============================================================================
// VALUES
// ============================================================================

#[test]
fn test_keyword_aliases() {
    let css = standard(&compile("d-inflex jc-bspace ws-bspace fd-col"));
    assert!(css.contains("display:inline-flex;"));
    assert!(css.contains("justify-content:space-between;"));
    assert!(css.contains("white-space:break-spaces;"));
    assert!(css.contains("flex-direction:column;"));
}

#[test]
fn test_colors() {
    let css = standard(&compile("c-red bgc-fff bc-ff000080"));
    assert!(css.contains("color:red;"));
    assert!(css.contains("background-color:#fff;"));
    assert!(css.contains("border-color:#ff000080;"));
}

#[test]
fn test_negative_offsets() {
    let css = standard(&compile("m--2 t--15px"));
    assert!(css.contains("margin:-0.2rem;"));
    assert!(css.contains("top:-15px;"));
}

#[test]
fn test_fixed_precision_classes() {
    let css = standard(&compile("z-10 lh-2"));
    assert!(css.contains("z-index:10;"));
    assert!(css.contains("line-height:2;"));
}

#[test]
fn test_explicit_unit_on_fixed_unit_class_is_dropped() {
    let groups = compile("z-10px op-5");
    assert_eq!(selectors(&groups, STANDARD_GROUP), vec!["op-5"]);
    assert!(standard(&groups).contains("opacity:0.5;"));
}

#[test]
fn test_unknown_tokens_are_skipped() {
    assert!(compile("foo-bar x-1 d-sideways hello").is_empty());
}

// ============================================================================
// SELECTORS
// ============================================================================

#[test]
fn test_pseudo_class_suffix() {
    let css = standard(&compile("c__hvr-red d-i_fcs-block"));
    assert!(css.contains(".c__hvr-red:hover{\n\tcolor:red;\n}"));
    assert!(css.contains(".d-i_fcs-block:focus{\n\tdisplay:block !important;\n}"));
}

#[test]
fn test_breakpoint_grouping() {
    let groups = compile("md-d-none mdl-m-2 mdp-w-50 w-100");
    assert_eq!(selectors(&groups, STANDARD_GROUP), vec!["w-100"]);
    assert_eq!(selectors(&groups, "md"), vec!["md-d-none"]);
    assert_eq!(selectors(&groups, "mdl"), vec!["mdl-m-2"]);
    assert_eq!(selectors(&groups, "mdp"), vec!["mdp-w-50"]);
}

// ============================================================================
// OVERRIDES
// ============================================================================

#[test]
fn test_rename_makes_old_key_unresolvable() {
    let mut builder = Compiler::builder();
    let change = ClassOverride {
        rename: Some("disp".into()),
        ..Default::default()
    };
    assert!(builder.override_class("d", &change).unwrap());
    let compiler = builder.build().unwrap();

    let groups = compiler.compile_classes(["d-flex", "disp-flex"]);
    assert_eq!(selectors(&groups, STANDARD_GROUP), vec!["disp-flex"]);
    let rule = &groups.get(STANDARD_GROUP)[0];
    assert_eq!(rule.declarations[0].property, "display");
    assert_eq!(rule.declarations[0].value, "flex");
    assert_eq!(rule.weight, 1.0);
}

#[test]
fn test_rename_collision() {
    let mut builder = Compiler::builder();
    let change = ClassOverride {
        rename: Some("m".into()),
        ..Default::default()
    };
    assert!(matches!(
        builder.override_class("p", &change),
        Err(ucss::UcssError::RenameCollision { .. })
    ));
}

#[test]
fn test_unit_and_precision_overrides() {
    let mut builder = Compiler::builder();
    let change = ClassOverride {
        unit: Some("px".into()),
        precision: Some(0),
        priority: Some(0.5),
        ..Default::default()
    };
    builder.override_class("w", &change).unwrap();
    builder.set_unit_precision("rem", 2).unwrap();
    let compiler = builder.build().unwrap();

    let groups = compiler.compile_classes(["d-flex", "w-120", "m-5"]);
    assert_eq!(
        selectors(&groups, STANDARD_GROUP),
        vec!["w-120", "d-flex", "m-5"]
    );
    let css = standard(&groups);
    assert!(css.contains("width:120px;"));
    assert!(css.contains("margin:0.05rem;"));
}

#[test]
fn test_unit_override_ignored_on_fixed_class() {
    let mut builder = Compiler::builder();
    let change = ClassOverride {
        unit: Some("px".into()),
        ..Default::default()
    };
    assert!(!builder.override_class("d", &change).unwrap());
}

// ============================================================================
// PROPERTIES
// ============================================================================

const NUMERIC_KEYS: [(&str, &str); 6] = [
    ("w", "width"),
    ("h", "height"),
    ("m", "margin"),
    ("pt", "padding-top"),
    ("fsz", "font-size"),
    ("brad", "border-radius"),
];

const SUFFIXES: [(&str, &str); 6] = [
    ("px", "px"),
    ("rem", "rem"),
    ("pr", "%"),
    ("vmn", "vmin"),
    ("q", "Q"),
    ("dvh", "dvh"),
];

proptest! {
    #[test]
    fn prop_fractional_payload_is_not_padded(
        class in proptest::sample::select(NUMERIC_KEYS.to_vec()),
        unit in proptest::sample::select(SUFFIXES.to_vec()),
        int in "[0-9]{1,3}",
        frac in "[0-9]{1,3}",
    ) {
        let token = format!("{}-{int}_{frac}{}", class.0, unit.0);
        let css = standard(&compile(&token));
        let expected = format!("\t{}:{int}.{frac}{};", class.1, unit.1);
        prop_assert!(css.contains(&expected), "{css} lacks {expected}");
    }

    #[test]
    fn prop_reserved_payload_is_verbatim(
        class in proptest::sample::select(NUMERIC_KEYS.to_vec()),
        value in proptest::sample::select(vec!["auto", "inherit", "initial", "unset", "none"]),
        important in any::<bool>(),
    ) {
        let imp = if important { "-i" } else { "" };
        let token = format!("{}{imp}-{value}", class.0);
        let css = standard(&compile(&token));
        let expected = format!("\t{}:{value}", class.1);
        prop_assert!(css.contains(&expected), "{css} lacks {expected}");
    }

    #[test]
    fn prop_flagged_matches_sort_after_plain(
        class in proptest::sample::select(NUMERIC_KEYS.to_vec()),
        n in 1u32..500,
    ) {
        let plain = format!("{}-{n}", class.0);
        let unit = format!("{}-{n}px", class.0);
        let flagged = format!("{}-i-{n}", class.0);
        let groups = compile(&format!("{flagged} {unit} {plain}"));
        prop_assert_eq!(selectors(&groups, STANDARD_GROUP), vec![plain, unit, flagged]);
    }
}
