//! Black-box behavior of the `minishell` binary with piped stdin.
//!
//! Stdin is not a terminal here, so no prompt is printed and every line is read as typed.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use assert_cmd::Command;
use std::fs;

fn shell() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_minishell"));
    cmd.env("TERM", "xterm").env_remove("RUST_LOG");
    cmd
}

fn stdout_of(input: &str) -> String {
    let output = shell().write_stdin(input).output().unwrap();
    String::from_utf8(output.stdout).unwrap()
}

#[test]
fn echo_prints_arguments() {
    shell()
        .write_stdin("echo hello   world\n")
        .assert()
        .success()
        .stdout("hello world\n\n");
}

#[test]
fn end_of_input_exits_cleanly() {
    shell().write_stdin("").assert().success().stdout("\n");
}

#[test]
fn exit_stops_reading() {
    shell()
        .write_stdin("echo before\nexit\necho after\n")
        .assert()
        .success()
        .stdout("before\n");
}

#[test]
fn unknown_command_is_reported_on_stdout() {
    let out = stdout_of("nonexistent_cmd_xyz\n");
    assert!(out.contains("nonexistent_cmd_xyz: command not found"), "{out}");
}

#[test]
fn missing_redirect_target_is_a_syntax_error() {
    let out = stdout_of("ls >\n");
    assert!(out.contains("parse error near `\\n'"), "{out}");
}

#[test]
fn quoting_and_expansion() {
    let mut cmd = shell();
    cmd.env("MINISHELL_TEST_VAR", "value");
    cmd.write_stdin("echo $MINISHELL_TEST_VAR '$MINISHELL_TEST_VAR' \"a  b\" c\\ d\n")
        .assert()
        .success()
        .stdout("value $MINISHELL_TEST_VAR a  b c d\n\n");
}

#[test]
fn trailing_backslash_continues_the_line() {
    shell()
        .write_stdin("echo foo\\\nbar\n")
        .assert()
        .success()
        .stdout("foobar\n\n");
}

#[test]
fn open_quote_continues_the_line() {
    shell()
        .write_stdin("echo 'first\nsecond'\n")
        .assert()
        .success()
        .stdout("first\nsecond\n\n");
}

#[test]
fn redirect_writes_and_appends() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.txt");
    let script = format!(
        "echo one > '{p}'\necho two >> '{p}'\n",
        p = path.display()
    );

    shell().write_stdin(script).assert().success().stdout("\n");

    assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");
}

#[cfg(unix)]
#[test]
fn external_command_stderr_redirect() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("err.txt");
    let script = format!("ls /definitely/not/here 2> '{}'\n", path.display());

    shell().write_stdin(script).assert().success().stdout("\n");

    assert!(!fs::read_to_string(&path).unwrap().is_empty());
}

#[test]
fn cd_and_pwd() {
    let dir = tempfile::tempdir().unwrap();
    let canonical = fs::canonicalize(dir.path()).unwrap();
    let script = format!("cd '{}'\npwd\n", canonical.display());

    shell()
        .write_stdin(script)
        .assert()
        .success()
        .stdout(format!("{}\n\n", canonical.display()));
}

#[cfg(unix)]
#[test]
fn cd_lists_new_directory_when_asked() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("marker_file.txt"), "").unwrap();
    let script = format!("cd '{}'\n", dir.path().display());

    let output = shell()
        .arg("--list-after-cd")
        .write_stdin(script)
        .output()
        .unwrap();

    assert!(output.status.success());
    let out = String::from_utf8(output.stdout).unwrap();
    assert!(out.contains("marker_file.txt"), "{out}");
}

#[cfg(unix)]
#[test]
fn cd_is_silent_by_default() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("marker_file.txt"), "").unwrap();
    let script = format!("cd '{}'\npwd\nexit\n", dir.path().display());
    let canonical = fs::canonicalize(dir.path()).unwrap();

    shell()
        .write_stdin(script)
        .assert()
        .success()
        .stdout(format!("{}\n", canonical.display()));
}

#[test]
fn type_distinguishes_builtins() {
    let out = stdout_of("type echo\ntype nonexistent_cmd_xyz\n");
    assert_eq!(
        out,
        "echo is a shell builtin\nnonexistent_cmd_xyz: not found\n\n"
    );
}

#[test]
fn unknown_flag_is_rejected() {
    shell().arg("--bogus").assert().failure();
}
