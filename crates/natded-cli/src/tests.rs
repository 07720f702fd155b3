use super::*;
use std::fs;

fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write should succeed");
    path
}

// ========== parse tests ==========

#[test]
fn parse_formulas_prints_canonical_text() {
    let out = parse_formulas(&["P -> Q -> R".to_string(), "((P & Q))".to_string()], false)
        .expect("formulas should parse");
    assert_eq!(out, vec!["P → (Q → R)", "P ∧ Q"]);
}

#[test]
fn parse_formulas_json_tree() {
    let out = parse_formulas(&["~P".to_string()], true).expect("formula should parse");
    let value: serde_json::Value = serde_json::from_str(&out[0]).expect("output should be JSON");
    assert!(value.get("Not").is_some(), "unexpected tree {value}");
}

#[test]
fn parse_formulas_reports_bad_input() {
    let err = parse_formulas(&["P ∧".to_string()], false).unwrap_err();
    assert!(err.to_string().contains("cannot parse"));
}

// ========== rules tests ==========

#[test]
fn list_rules_respects_system() {
    let propositional = list_rules(LogicSystem::Propositional);
    assert!(propositional.iter().any(|l| l.starts_with("MP")));
    assert!(!propositional.iter().any(|l| l.starts_with("Strict")));

    let modal = list_rules(parse_system("modal").expect("modal is a system"));
    assert!(modal.iter().any(|l| l.starts_with("Strict") && l.ends_with("(subproof)")));
}

#[test]
fn parse_system_rejects_unknown_names() {
    assert_eq!(parse_system("fol").expect("alias"), LogicSystem::FirstOrder);
    assert!(parse_system("quantum").is_err());
}

// ========== run tests ==========

#[test]
fn run_modus_ponens_script() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let problem = write(
        &dir,
        "problem.json",
        r#"{"system": "propositional", "premises": ["P → Q", "P"], "goal": {"formula": "Q"}}"#,
    );
    let script = write(
        &dir,
        "script.jsonl",
        "# modus ponens\n\n{\"command\": \"apply_rule\", \"rule\": \"MP\", \"premises\": [1, 2]}\n",
    );

    let report = run_proof(&problem, Some(&script), RunOptions::default()).expect("run should succeed");
    assert!(report.engine.is_complete());
    assert_eq!(report.errors(), 0);
    assert!(report.events.contains(&ProofEvent::GoalReached));
}

#[test]
fn run_counts_rejected_commands() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let problem = write(
        &dir,
        "problem.json",
        r#"{"premises": ["P → Q", "R"], "goal": {"formula": "Q"}}"#,
    );
    let script = write(
        &dir,
        "script.jsonl",
        "{\"command\": \"apply_rule\", \"rule\": \"MP\", \"premises\": [1, 2]}\n",
    );

    let report = run_proof(&problem, Some(&script), RunOptions::default()).expect("run should succeed");
    assert!(!report.engine.is_complete());
    assert_eq!(report.errors(), 1);
}

#[test]
fn run_without_manual_lines() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let problem = write(&dir, "problem.json", r#"{"premises": [], "goal": {"formula": "P"}}"#);
    let script = write(&dir, "script.jsonl", "{\"command\": \"add_line\", \"text\": \"P\"}\n");

    let options = RunOptions {
        no_manual_lines: true,
        ..RunOptions::default()
    };
    let report = run_proof(&problem, Some(&script), options).expect("run should succeed");
    assert_eq!(report.errors(), 1);
    assert!(!report.engine.is_goal_reached());
}

#[test]
fn run_strict_subproof_script() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let problem = write(
        &dir,
        "problem.json",
        r#"{"system": "modal", "premises": ["□(P → Q)", "□P"], "goal": {"formula": "□Q"}}"#,
    );
    let script = write(
        &dir,
        "script.jsonl",
        concat!(
            "{\"command\": \"start_subproof\", \"rule\": \"Strict\", \"formula\": \"□Q\"}\n",
            "{\"command\": \"apply_rule\", \"rule\": \"□Imp\", \"premises\": [1]}\n",
            "{\"command\": \"apply_rule\", \"rule\": \"□Imp\", \"premises\": [2]}\n",
            "{\"command\": \"apply_rule\", \"rule\": \"MP\", \"premises\": [3, 4]}\n",
        ),
    );

    let report = run_proof(&problem, Some(&script), RunOptions::default()).expect("run should succeed");
    assert_eq!(report.errors(), 0);
    assert!(report.engine.is_complete());
}

#[test]
fn run_rejects_malformed_script_line() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let problem = write(&dir, "problem.json", r#"{"goal": {"formula": "P → P"}}"#);
    let script = write(&dir, "script.jsonl", "{\"command\": \"levitate\"}\n");

    let err = run_proof(&problem, Some(&script), RunOptions::default()).unwrap_err();
    assert!(err.to_string().contains(":1: invalid command"), "got {err}");
}

#[test]
fn run_missing_problem_fails() {
    let path = PathBuf::from("/nonexistent/problem.json");
    assert!(run_proof(&path, None, RunOptions::default()).is_err());
}
