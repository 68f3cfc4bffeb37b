mod common;

use texgloss_core::AnyEmptyResult;

#[test]
fn check_passes_on_clean_corpus() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	std::fs::write(
		tmp.path().join("main.tex"),
		"\\newglossaryentry{ml}{name={machine learning},description={Learning from data.}}\n\
		 \\newglossaryentry{model}{name={model},description={A \\gls{ml} artifact.}}\n",
	)?;

	let mut cmd = common::texgloss_cmd();
	cmd.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("clean"));

	Ok(())
}

#[test]
fn check_writes_no_files() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	std::fs::write(
		tmp.path().join("main.tex"),
		"\\newglossaryentry{ml}{name={machine learning},description={Learning from data.}}\n",
	)?;

	let mut cmd = common::texgloss_cmd();
	cmd.arg("check").arg("--path").arg(tmp.path()).assert().success();

	assert!(!tmp.path().join("flattened").exists());

	Ok(())
}

#[test]
fn check_fails_on_dangling_reference() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	std::fs::write(
		tmp.path().join("main.tex"),
		"\\newglossaryentry{a}{name={a},description={See \\gls{ghost}.}}\n",
	)?;

	let mut cmd = common::texgloss_cmd();
	cmd.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.failure()
		.stderr(predicates::str::contains("unknown key `ghost`"))
		.stderr(predicates::str::contains("1 diagnostic(s) found"));

	Ok(())
}

#[test]
fn check_fails_on_missing_description() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	std::fs::write(
		tmp.path().join("main.tex"),
		"\\newglossaryentry{bare}{name={bare}}\n",
	)?;

	let mut cmd = common::texgloss_cmd();
	cmd.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.failure()
		.stderr(predicates::str::contains("no description field"));

	Ok(())
}

#[test]
fn check_reports_missing_macro_argument() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	std::fs::write(
		tmp.path().join("main.tex"),
		"\\newcommand{\\pair}[2]{(#1,#2)}\n\
		 \\newglossaryentry{a}{name={a},description={ok}}\n\
		 A lone \\pair{x} call.\n",
	)?;

	let mut cmd = common::texgloss_cmd();
	cmd.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.failure()
		.stderr(predicates::str::contains("missing a required argument"));

	Ok(())
}

#[test]
fn check_names_the_offending_source() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	std::fs::write(
		tmp.path().join("good.tex"),
		"\\newglossaryentry{ml}{name={machine learning},description={Learning from data.}}\n",
	)?;
	std::fs::write(
		tmp.path().join("bad.tex"),
		"\\newglossaryentry{stray}{name={stray},description={See \\gls{nowhere}.}}\n",
	)?;

	let mut cmd = common::texgloss_cmd();
	cmd.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.failure()
		.stderr(predicates::str::contains("bad.tex"))
		.stderr(predicates::str::contains("unknown key `nowhere`"));

	Ok(())
}
