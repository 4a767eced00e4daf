use std::collections::BTreeSet;

use cdr_context::assemble::{CATALOG_HEADER, FALLBACK, INSTRUCTIONS, PREAMBLE};
use cdr_context::{assemble, fixed_overhead, DEFAULT_MAX_CHARS};
use cdr_core::models::rule::Rule;
use proptest::prelude::*;

const INDEX: &str = "CARDIOVASCULAR: R1, R2, R3";

fn rule(name: &str, full_text: &str) -> Rule {
    Rule {
        id: name.to_lowercase(),
        name: name.to_string(),
        category: "CARDIOVASCULAR".to_string(),
        full_text: full_text.to_string(),
        application: String::new(),
        keywords: BTreeSet::new(),
    }
}

/// A rule whose block, with its joining newline, takes exactly `cost`
/// characters of the budget.
fn rule_costing(name: &str, cost: usize) -> Rule {
    let header = format!("--- {name} (CARDIOVASCULAR) ---\n").chars().count();
    rule(name, &"x".repeat(cost - header - 2))
}

#[test]
fn empty_index_short_circuits() {
    let none: Vec<Rule> = Vec::new();
    assert_eq!(assemble(&none, "", 16_000), "");

    let some = vec![rule("R1", "## R1\nbody")];
    assert_eq!(assemble(&some, "", DEFAULT_MAX_CHARS), "");
}

#[test]
fn no_candidates_falls_back_to_catalog_only() {
    let none: Vec<Rule> = Vec::new();
    let block = assemble(&none, INDEX, DEFAULT_MAX_CHARS);
    assert_eq!(
        block,
        format!("{PREAMBLE}\n{CATALOG_HEADER}\n{INDEX}\n{FALLBACK}")
    );
    assert!(!block.contains(INSTRUCTIONS));
}

#[test]
fn candidates_without_text_count_as_none() {
    let blank = vec![rule("R1", ""), rule("R2", "")];
    let block = assemble(&blank, INDEX, DEFAULT_MAX_CHARS);
    assert!(block.ends_with(FALLBACK));
}

#[test]
fn larger_rule_is_skipped_and_later_ones_still_admitted() {
    let rules = vec![
        rule_costing("R1", 5000),
        rule_costing("R2", 11000),
        rule_costing("R3", 4000),
    ];
    let max = fixed_overhead(INDEX) + 10_000;
    let block = assemble(&rules, INDEX, max);

    let first = block.find("--- R1 (").expect("R1 admitted");
    let third = block.find("--- R3 (").expect("R3 admitted");
    assert!(first < third);
    assert!(!block.contains("--- R2 ("));
    assert_eq!(block.chars().count(), max - 1000);
}

#[test]
fn rule_that_exactly_fills_the_budget_is_admitted() {
    let rules = vec![rule_costing("R1", 300)];
    let max = fixed_overhead(INDEX) + 300;
    let block = assemble(&rules, INDEX, max);
    assert!(block.contains("--- R1 ("));
    assert_eq!(block.chars().count(), max);

    let tight = assemble(&rules, INDEX, max - 1);
    assert!(!tight.contains("--- R1 ("));
}

#[test]
fn candidate_order_is_kept() {
    let rules = vec![rule("Zeta", "## Zeta\nz"), rule("Alpha", "## Alpha\na")];
    let block = assemble(&rules, INDEX, DEFAULT_MAX_CHARS);
    let zeta = block.find("--- Zeta (CARDIOVASCULAR) ---\n## Zeta\nz\n").unwrap();
    let alpha = block.find("--- Alpha (CARDIOVASCULAR) ---").unwrap();
    assert!(zeta < alpha);
}

#[test]
fn block_layout() {
    let rules = vec![rule("R1", "## R1\nbody")];
    let block = assemble(&rules, INDEX, DEFAULT_MAX_CHARS);
    assert!(block.starts_with(&format!("{PREAMBLE}\n{CATALOG_HEADER}\n{INDEX}\n")));
    assert!(block.ends_with(INSTRUCTIONS));
    assert_eq!(INSTRUCTIONS.lines().filter(|l| l.starts_with(char::is_numeric)).count(), 6);
}

#[test]
fn budget_is_counted_in_characters() {
    // 'é' is two bytes but one character.
    let header = "--- R1 (CARDIOVASCULAR) ---\n".chars().count();
    let rules = vec![rule("R1", &"é".repeat(100 - header - 2))];
    let max = fixed_overhead(INDEX) + 100;
    assert!(assemble(&rules, INDEX, max).contains("--- R1 ("));
}

#[test]
fn fixed_parts_survive_a_budget_smaller_than_them() {
    let rules = vec![rule("R1", "## R1\nbody")];
    let block = assemble(&rules, INDEX, 10);
    assert!(block.ends_with(INSTRUCTIONS));
    assert!(!block.contains("--- R1 ("));
    assert_eq!(block.chars().count(), fixed_overhead(INDEX));
}

proptest! {
    #[test]
    fn output_never_exceeds_budget_beyond_fixed_parts(
        sizes in prop::collection::vec(1usize..3000, 1..12),
        max_chars in 0usize..20_000,
        wide in any::<bool>(),
    ) {
        let fill = if wide { "é" } else { "x" };
        let rules: Vec<Rule> = sizes
            .iter()
            .enumerate()
            .map(|(i, n)| rule(&format!("R{i}"), &fill.repeat(*n)))
            .collect();

        let block = assemble(&rules, INDEX, max_chars);
        let bound = max_chars.max(fixed_overhead(INDEX));
        prop_assert!(block.chars().count() <= bound);
        prop_assert!(block.ends_with(INSTRUCTIONS));
    }
}
