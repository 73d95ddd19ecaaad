use std::fs;
use std::io;
use std::path::PathBuf;

use proptest::prelude::*;
use pwsmith_core::Pattern;
use pwsmith_generate::{
    Estimate, GateOutcome, GenerateOptions, GenerationError, GenerationInput, SelectionBundle,
    Synthesizer, forecast, run_gated,
};
use pwsmith_select::{Category, Probability, SelectionSet};

fn set(category: Category, values: &[&str]) -> SelectionSet {
    SelectionSet::new(
        category,
        Probability::ONE,
        values.iter().map(|value| value.to_string()).collect(),
    )
}

fn bundle(patterns: &[&str], letters: &[&str], digits: &[&str], specials: &[&str]) -> SelectionBundle {
    SelectionBundle {
        patterns: Some(set(Category::Condensed, patterns)),
        letters: Some(set(Category::Letters, letters)),
        digits: Some(set(Category::Digits, digits)),
        specials: Some(set(Category::Specials, specials)),
    }
}

fn generate(bundle: &SelectionBundle) -> Vec<String> {
    let input = bundle.to_input().expect("complete bundle");
    Synthesizer::new(&input).records().collect()
}

fn temp_out_dir(label: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("pwsmith_generate_{label}_{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp out dir");
    dir
}

#[test]
fn worked_example_generates_one_record() {
    let bundle = bundle(&["A1$"], &["rose"], &["1982"], &["!"]);
    let input = bundle.to_input().expect("complete bundle");
    let result = forecast(&input.patterns, 1, 1, 1);
    assert_eq!(result.records, 1);
    assert_eq!(generate(&bundle), vec!["rose1982!"]);
}

#[test]
fn iteration_nests_letters_then_digits_then_specials() {
    let bundle = bundle(&["A1$"], &["a", "b"], &["1", "2"], &["!", "?"]);
    assert_eq!(
        generate(&bundle),
        vec![
            "a1!", "a1?", "a2!", "a2?", "b1!", "b1?", "b2!", "b2?",
        ]
    );
}

#[test]
fn absent_classes_do_not_multiply() {
    let bundle = bundle(&["A1", "$"], &["x", "y"], &["7"], &["#", "%"]);
    assert_eq!(generate(&bundle), vec!["x7", "y7", "#", "%"]);
}

#[test]
fn repeated_class_reuses_one_value_per_record() {
    let bundle = bundle(&["A1A"], &["ab", "cd"], &["9"], &["!"]);
    assert_eq!(generate(&bundle), vec!["ab9ab", "cd9cd"]);
}

#[test]
fn empty_category_skips_only_patterns_that_use_it() {
    let bundle = bundle(&["A1$", "A1"], &["love"], &["55"], &[]);
    let input = bundle.to_input().expect("complete bundle");
    let estimate = Estimate::of_input(&input, 15);
    assert_eq!(estimate.records(), Some(1));
    assert_eq!(generate(&bundle), vec!["love55"]);
}

#[test]
fn duplicates_are_not_removed() {
    let bundle = bundle(&["A", "A"], &["same"], &[], &[]);
    assert_eq!(generate(&bundle), vec!["same", "same"]);
}

#[test]
fn missing_selection_degrades_forecast_and_fails_generation() {
    let mut bundle = bundle(&["A1$"], &["rose"], &["1982"], &["!"]);
    bundle.clear(Category::Digits);

    let estimate = Estimate::of_bundle(&bundle, 15);
    assert!(matches!(estimate, Estimate::Unknown { .. }));
    assert!(estimate.to_string().contains("cannot be computed"));

    let dir = temp_out_dir("missing");
    let output = dir.join("generated.txt");
    let mut asked = false;
    let mut approve = |_: &Estimate| -> io::Result<bool> {
        asked = true;
        Ok(true)
    };
    let result = run_gated(&bundle, &output, &mut approve, &GenerateOptions::default());

    assert!(asked, "confirmation is requested even without a forecast");
    assert!(matches!(result, Err(GenerationError::MissingPrerequisite(_))));
    assert!(!output.exists());
}

#[test]
fn declining_writes_nothing() {
    let bundle = bundle(&["A1$"], &["rose", "love"], &["1982"], &["!"]);
    let dir = temp_out_dir("declined");
    let output = dir.join("generated.txt");

    let mut decline = |estimate: &Estimate| -> io::Result<bool> {
        assert_eq!(estimate.records(), Some(2));
        Ok(false)
    };
    let outcome =
        run_gated(&bundle, &output, &mut decline, &GenerateOptions::default()).expect("gate runs");

    assert!(matches!(outcome, GateOutcome::Declined { .. }));
    assert!(!output.exists());
}

#[test]
fn approved_generation_streams_to_file_and_reports() {
    let bundle = bundle(&["A1$", "A1"], &["rose", "love"], &["1982"], &["!"]);
    let dir = temp_out_dir("approved");
    let output = dir.join("generated.txt");

    let mut approve = |_: &Estimate| -> io::Result<bool> { Ok(true) };
    let outcome =
        run_gated(&bundle, &output, &mut approve, &GenerateOptions::default()).expect("gate runs");

    let GateOutcome::Generated { estimate, report } = outcome else {
        panic!("expected generation");
    };
    let written = fs::read_to_string(&output).expect("read output");
    assert_eq!(written, "rose1982!\nlove1982!\nrose1982\nlove1982\n");
    assert_eq!(estimate.records(), Some(4));
    assert_eq!(report.records_written, 4);
    assert_eq!(report.bytes_written, written.len() as u64);
    assert_eq!(report.patterns.len(), 2);

    let json = serde_json::to_value(&report).expect("serialize report");
    assert_eq!(json["patterns"][0]["pattern"], "A1$");
    assert_eq!(json["patterns"][0]["records"], 2);
}

#[test]
fn selections_under_the_wrong_category_are_rejected() {
    let mut bundle = bundle(&["A"], &["a"], &["1"], &["!"]);
    bundle.digits = Some(set(Category::Letters, &["1"]));
    assert!(matches!(
        bundle.to_input(),
        Err(GenerationError::InvalidSelection(_))
    ));
}

fn selection_values(prefix: &'static str) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(0..1000u32, 0..4)
        .prop_map(move |ids| ids.into_iter().map(|id| format!("{prefix}{id}")).collect())
}

proptest! {
    #[test]
    fn forecast_matches_generated_count(
        patterns in prop::collection::vec("[A1$]{1,5}", 0..5),
        letters in selection_values("l"),
        digits in selection_values("d"),
        specials in selection_values("s"),
    ) {
        let input = GenerationInput {
            patterns: patterns
                .iter()
                .map(|tags| {
                    tags.parse::<Pattern>().expect("generated tags parse").condense()
                })
                .collect(),
            letters,
            digits,
            specials,
        };
        let expected = forecast(
            &input.patterns,
            input.letters.len(),
            input.digits.len(),
            input.specials.len(),
        );
        let produced = Synthesizer::new(&input).records().count() as u128;
        prop_assert_eq!(expected.records, produced);
    }
}
