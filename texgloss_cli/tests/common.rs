use assert_cmd::Command;

pub fn texgloss_cmd() -> Command {
	let mut cmd = Command::cargo_bin("texgloss").expect("texgloss binary should build");
	cmd.env("NO_COLOR", "1");
	cmd
}
