mod common;

use serde_json::Value;
use texgloss_core::AnyEmptyResult;

const CORPUS: &str = "% glossary sources\n\
	\\newcommand{\\ml}{machine learning}\n\
	\\newglossaryentry{ml}{\n\
	  name={machine learning},\n\
	  description={Learning from data.}\n\
	}\n\
	\\newglossaryentry{model}{\n\
	  name={model},\n\
	  description={A \\gls{ml} artifact.}\n\
	}\n\
	A \\gls{model} is produced by \\ml training.\n";

#[test]
fn build_writes_flattened_sources() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	std::fs::write(tmp.path().join("main.tex"), CORPUS)?;

	let mut cmd = common::texgloss_cmd();
	cmd.arg("build")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("2 entries"));

	let flattened = std::fs::read_to_string(tmp.path().join("flattened").join("main.tex"))?;
	assert!(flattened.contains("A model is produced by machine learning training."));
	assert!(!flattened.contains("% glossary sources"));

	Ok(())
}

#[test]
fn build_writes_entries_artifact() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	std::fs::write(tmp.path().join("main.tex"), CORPUS)?;

	let mut cmd = common::texgloss_cmd();
	cmd.arg("build").arg("--path").arg(tmp.path()).assert().success();

	let raw = std::fs::read_to_string(tmp.path().join("flattened").join("entries.json"))?;
	let records: Value = serde_json::from_str(&raw)?;
	let records = records.as_array().expect("entries.json should be an array");

	assert_eq!(records.len(), 2);
	// Records are sorted by key.
	assert_eq!(records[0]["key"], Value::String("ml".into()));
	assert_eq!(records[1]["key"], Value::String("model".into()));
	assert_eq!(
		records[1]["description"],
		Value::String("A machine learning artifact.".into())
	);
	assert_eq!(records[1]["references"][0], Value::String("ml".into()));

	Ok(())
}

#[test]
fn build_writes_graph_artifact() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	std::fs::write(tmp.path().join("main.tex"), CORPUS)?;

	let mut cmd = common::texgloss_cmd();
	cmd.arg("build").arg("--path").arg(tmp.path()).assert().success();

	let raw = std::fs::read_to_string(tmp.path().join("flattened").join("graph.json"))?;
	let graph: Value = serde_json::from_str(&raw)?;

	let edges = graph["edges"].as_array().expect("graph.json should list edges");
	assert_eq!(edges.len(), 1);
	assert_eq!(edges[0]["source"], Value::String("model".into()));
	assert_eq!(edges[0]["target"], Value::String("ml".into()));

	Ok(())
}

#[test]
fn build_on_empty_corpus_still_writes_artifacts() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	let mut cmd = common::texgloss_cmd();
	cmd.arg("build")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Flattened 0 source(s)"));

	let raw = std::fs::read_to_string(tmp.path().join("flattened").join("entries.json"))?;
	let records: Value = serde_json::from_str(&raw)?;
	assert_eq!(records.as_array().map(Vec::len), Some(0));

	Ok(())
}

#[test]
fn build_dry_run_writes_nothing() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	std::fs::write(tmp.path().join("main.tex"), CORPUS)?;

	let mut cmd = common::texgloss_cmd();
	cmd.arg("build")
		.arg("--dry-run")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Dry run"));

	assert!(!tmp.path().join("flattened").exists());

	Ok(())
}

#[test]
fn build_honors_config_output_dir() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	std::fs::write(tmp.path().join("texgloss.toml"), "[output]\ndir = \"out\"\n")?;
	std::fs::write(tmp.path().join("main.tex"), CORPUS)?;

	let mut cmd = common::texgloss_cmd();
	cmd.arg("build").arg("--path").arg(tmp.path()).assert().success();

	assert!(tmp.path().join("out").join("main.tex").is_file());
	assert!(!tmp.path().join("flattened").exists());

	Ok(())
}

#[test]
fn build_skips_excluded_patterns() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	std::fs::write(
		tmp.path().join("texgloss.toml"),
		"[exclude]\npatterns = [\"draft*.tex\"]\n",
	)?;
	std::fs::write(tmp.path().join("main.tex"), CORPUS)?;
	std::fs::write(tmp.path().join("draft-notes.tex"), "\\gls{nowhere}\n")?;

	let mut cmd = common::texgloss_cmd();
	cmd.arg("build")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Flattened 1 source(s)"));

	assert!(!tmp.path().join("flattened").join("draft-notes.tex").exists());

	Ok(())
}

#[test]
fn invalid_config_renders_diagnostic_code() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	std::fs::write(tmp.path().join("texgloss.toml"), "not valid = [toml\n")?;

	let mut cmd = common::texgloss_cmd();
	cmd.arg("build")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.failure()
		.stderr(predicates::str::contains("texgloss::config_parse"))
		.stderr(predicates::str::contains("failed to parse config"));

	Ok(())
}

#[test]
fn build_reports_warnings_on_dangling_reference() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	std::fs::write(
		tmp.path().join("main.tex"),
		"\\newglossaryentry{a}{name={a},description={See \\gls{ghost}.}}\n",
	)?;

	let mut cmd = common::texgloss_cmd();
	cmd.arg("build")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stderr(predicates::str::contains("1 dangling references"));

	Ok(())
}

#[test]
fn build_verbose_lists_each_diagnostic() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	std::fs::write(
		tmp.path().join("main.tex"),
		"\\newglossaryentry{a}{name={a},description={See \\gls{ghost}.}}\n",
	)?;

	let mut cmd = common::texgloss_cmd();
	cmd.arg("build")
		.arg("--verbose")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stderr(predicates::str::contains("unknown key `ghost`"));

	Ok(())
}
