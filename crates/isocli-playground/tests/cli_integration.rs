use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn make_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before UNIX_EPOCH")
        .as_nanos();
    let pid = std::process::id();
    let dir = std::env::temp_dir().join(format!("isocli-integ-{prefix}-{pid}-{nanos}"));
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

fn playground() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_isocli-playground"));
    cmd.env_remove("ISOCLI_TEMPLATE").env_remove("RUST_LOG");
    cmd
}

fn run(args: &[&str]) -> Output {
    playground()
        .args(args)
        .output()
        .expect("failed to run isocli-playground")
}

fn assert_success(out: &Output) -> String {
    assert!(
        out.status.success(),
        "isocli-playground failed:\nstatus: {}\nstderr:\n{}",
        out.status,
        String::from_utf8_lossy(&out.stderr),
    );
    String::from_utf8_lossy(&out.stdout).into_owned()
}

#[test]
fn hello_greets_with_every_argument() {
    let out = run(&["hello", "--name", "Ada", "--year", "1815", "--verbose"]);
    let stdout = assert_success(&out);
    assert!(stdout.contains("Hello, Ada!"), "unexpected output:\n{stdout}");
    assert!(stdout.contains("Ada was born in 1815."), "unexpected output:\n{stdout}");
    assert!(
        stdout.contains("canonical form: hello --name Ada --year 1815 --verbose"),
        "unexpected output:\n{stdout}"
    );
}

#[test]
fn hello_without_optional_arguments() {
    let stdout = assert_success(&run(&["hello", "-n", "Grace"]));
    assert_eq!(stdout, "Hello, Grace!\n");
}

#[test]
fn help_is_scoped_and_runs_nothing() {
    let stdout = assert_success(&run(&["hello", "--help"]));
    assert!(stdout.contains("hello: greeting"), "unexpected help:\n{stdout}");
    assert!(stdout.contains("Example:"), "unexpected help:\n{stdout}");
    assert!(!stdout.contains("print:"), "help not scoped:\n{stdout}");
    assert!(!stdout.contains("Hello,"), "command ran during help:\n{stdout}");
}

#[test]
fn no_arguments_prints_full_help() {
    let stdout = assert_success(&run(&[]));
    for heading in ["hello: greeting", "print: list every command form", "/fastlane: run lane"] {
        assert!(stdout.contains(heading), "missing {heading}:\n{stdout}");
    }
}

#[test]
fn unknown_command_fails_without_action() {
    let out = run(&["goodbye"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("unrecognized arguments: goodbye"), "stderr:\n{stderr}");
    assert!(String::from_utf8_lossy(&out.stdout).is_empty());
}

#[test]
fn fastlane_passes_remaining_tokens_to_the_lane() {
    let stdout = assert_success(&run(&[
        "/fastlane",
        "test",
        "branch:develop",
        "device:iPhone5",
    ]));
    assert_eq!(
        stdout,
        "Running lane test\n  branch = develop\n  device = iPhone5\n"
    );
}

#[test]
fn fastlane_rejects_malformed_option() {
    let out = run(&["/fastlane", "test", "nocolon"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("key:value"));
}

#[test]
fn print_lists_command_templates() {
    let stdout = assert_success(&run(&["print", "-v"]));
    assert!(stdout.contains("hello --name String --year i32 --verbose"), "{stdout}");
    assert!(stdout.contains("/fastlane String String..."), "{stdout}");
    assert!(stdout.contains("  e.g. print --verbose"), "{stdout}");
}

#[test]
fn template_config_from_env_restyles_names() {
    let dir = make_temp_dir("template");
    let config = dir.join("template.json");
    fs::write(
        &config,
        r#"{ "long-prefix": "", "long-suffix": ":", "short-prefix": "", "short-suffix": ":", "bare-options": true }"#,
    )
    .expect("failed to write template config");

    let out = playground()
        .env("ISOCLI_TEMPLATE", &config)
        .args(["hello", "name:", "Ada", "verbose"])
        .output()
        .expect("failed to run isocli-playground");
    let stdout = assert_success(&out);
    assert!(
        stdout.contains("canonical form: hello name: Ada verbose"),
        "unexpected output:\n{stdout}"
    );

    let help = playground()
        .env("ISOCLI_TEMPLATE", &config)
        .args(["print", "help"])
        .output()
        .expect("failed to run isocli-playground");
    let help = assert_success(&help);
    assert!(help.contains("print verbose"), "unexpected help:\n{help}");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn missing_template_config_is_reported() {
    let dir = make_temp_dir("missing-template");
    let config = dir.join("absent.json");
    let out = playground()
        .env("ISOCLI_TEMPLATE", &config)
        .arg("print")
        .output()
        .expect("failed to run isocli-playground");
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("ISOCLI_TEMPLATE"), "stderr:\n{stderr}");
    assert!(stderr.contains("absent.json"), "stderr:\n{stderr}");
    let _ = fs::remove_dir_all(&dir);
}
