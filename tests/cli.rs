//! Runs the `step` binary and checks its exit status and usage output.

use std::process::{Command, Output};

fn step(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_step"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("couldn't run step")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn no_arguments_prints_usage_and_exits_1() {
    let output = step(&[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Examples"));
}

#[test]
fn zero_degrees_is_a_usage_error() {
    let output = step(&["-d", "0"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Examples"));
}

#[test]
fn oversized_delay_is_a_usage_error() {
    let output = step(&["-d", "90", "-t", "1e300", "-n"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Examples"));
}

#[test]
fn simulated_turn_exits_0() {
    let output = step(&["-d", "10", "-n", "-t", "0"]);
    assert_eq!(output.status.code(), Some(0));
    let log = stderr(&output);
    assert!(log.contains("turn 10 degrees 14 steps"));
    assert!(log.contains("14 steps using 4 step sequence"));
}

#[test]
fn version_exits_0() {
    let output = step(&["--version"]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("step "));
}
