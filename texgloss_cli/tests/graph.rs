mod common;

use texgloss_core::AnyEmptyResult;

const CORPUS: &str = "\\newglossaryentry{data}{name={data},description={Raw observations.}}\n\
	\\newglossaryentry{model}{name={model},description={Fit to \\gls{data}.}}\n\
	\\newglossaryentry{loss}{name={loss function},description={Scores a \\gls{model} on \\gls{data}.}}\n";

#[test]
fn graph_lists_most_referenced_entries_first() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	std::fs::write(tmp.path().join("main.tex"), CORPUS)?;

	let mut cmd = common::texgloss_cmd();
	let output = cmd
		.arg("graph")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.get_output()
		.stdout
		.clone();

	let stdout = String::from_utf8(output)?;
	let lines: Vec<&str> = stdout.lines().collect();

	// data has two inbound references, model one, loss none.
	assert_eq!(lines.len(), 3);
	assert!(lines[0].contains("2") && lines[0].contains("data"));
	assert!(lines[1].contains("1") && lines[1].contains("model"));
	assert!(lines[2].contains("0") && lines[2].contains("loss"));

	Ok(())
}

#[test]
fn graph_shows_display_names() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	std::fs::write(tmp.path().join("main.tex"), CORPUS)?;

	let mut cmd = common::texgloss_cmd();
	cmd.arg("graph")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("(loss function)"));

	Ok(())
}

#[test]
fn graph_top_limits_output() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	std::fs::write(tmp.path().join("main.tex"), CORPUS)?;

	let mut cmd = common::texgloss_cmd();
	let output = cmd
		.arg("graph")
		.arg("--top")
		.arg("1")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.get_output()
		.stdout
		.clone();

	let stdout = String::from_utf8(output)?;
	assert_eq!(stdout.lines().count(), 1);
	assert!(stdout.contains("data"));

	Ok(())
}

#[test]
fn graph_heuristic_links_from_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	std::fs::write(
		tmp.path().join("texgloss.toml"),
		"[build]\nheuristic_links = true\n",
	)?;
	// No \gls call; "data" appears only as a plain-text mention.
	std::fs::write(
		tmp.path().join("main.tex"),
		"\\newglossaryentry{data}{name={data},description={Raw observations.}}\n\
		 \\newglossaryentry{model}{name={model},description={Fit to data.}}\n",
	)?;

	let mut cmd = common::texgloss_cmd();
	let output = cmd
		.arg("graph")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.get_output()
		.stdout
		.clone();

	let stdout = String::from_utf8(output)?;
	let first = stdout.lines().next().unwrap_or_default();
	assert!(first.contains("1") && first.contains("data"));

	Ok(())
}
