// Test code uses unwrap/expect for clarity - panics provide good test failure messages
#![allow(clippy::unwrap_used, clippy::expect_used)]

//! End-to-end tests for the `starlight` commands.
//!
//! Most tests call [`starlightc::commands::run`] with a buffer for standard
//! output. The last group runs the built binary to check exit codes.

use std::path::{Path, PathBuf};
use std::process::Command as Process;

use pretty_assertions::assert_eq;
use starlight_codegen::CodegenConfig;
use starlight_diagnostic::emitter::ColorMode;
use starlightc::commands::{self, CommandError};
use starlightc::{CliOptions, Command, CompileError};
use tempfile::TempDir;

fn source_file(dir: &TempDir, name: &str, text: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, text).unwrap();
    path
}

fn options(command: Command, input: &Path) -> CliOptions {
    CliOptions {
        command,
        input: input.to_path_buf(),
        output: None,
        color: ColorMode::Never,
        codegen: CodegenConfig::default(),
    }
}

fn run(options: &CliOptions) -> Result<String, CommandError> {
    let mut out = Vec::new();
    commands::run(options, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn compile_writes_to_stdout() {
    let dir = TempDir::new().unwrap();
    let input = source_file(&dir, "app.sl", "nova double(n) {\n  emit n * 2\n}\nshow(double(21))\n");

    let out = run(&options(Command::Compile, &input)).unwrap();
    assert_eq!(
        out,
        "function double(n) {\n  return n * 2;\n}\nconsole.log(double(21));\n"
    );
}

#[test]
fn compile_writes_to_output_file() {
    let dir = TempDir::new().unwrap();
    let input = source_file(&dir, "app.sl", "show('hi')");
    let output = dir.path().join("app.js");

    let mut opts = options(Command::Compile, &input);
    opts.output = Some(output.clone());
    opts.codegen.print_binding = "print".to_string();

    assert_eq!(run(&opts).unwrap(), "");
    assert_eq!(std::fs::read_to_string(output).unwrap(), "print(\"hi\");\n");
}

#[test]
fn tokens_lists_positions_kinds_and_text() {
    let dir = TempDir::new().unwrap();
    let input = source_file(&dir, "a.sl", "star a = 1\nshow(a)");

    let out = run(&options(Command::Tokens, &input)).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines,
        vec![
            "1:1\tkeyword `star`\t\"star\"",
            "1:6\tidentifier\t\"a\"",
            "1:8\t`=`\t\"=\"",
            "1:10\tnumber\t\"1\"",
            "2:1\tkeyword `show`\t\"show\"",
            "2:5\t`(`\t\"(\"",
            "2:6\tidentifier\t\"a\"",
            "2:7\t`)`\t\")\"",
            "2:8\tend of file\t\"\"",
        ]
    );
}

#[test]
fn ast_dumps_the_program() {
    let dir = TempDir::new().unwrap();
    let input = source_file(&dir, "a.sl", "star a = 1");

    let out = run(&options(Command::Ast, &input)).unwrap();
    assert!(out.starts_with("Program {"), "{out}");
    assert!(out.contains("VariableDeclaration"), "{out}");
}

#[test]
fn check_reports_statement_count() {
    let dir = TempDir::new().unwrap();
    let input = source_file(&dir, "a.sl", "star a = 1\nshow(a)");

    let out = run(&options(Command::Check, &input)).unwrap();
    assert_eq!(out, format!("OK: {} (2 statements)\n", input.display()));
}

#[test]
fn check_catches_codegen_errors() {
    let dir = TempDir::new().unwrap();
    let input = source_file(&dir, "a.sl", "f() = 1");

    let err = run(&options(Command::Check, &input)).unwrap_err();
    assert!(matches!(
        err,
        CommandError::Compile {
            error: CompileError::Codegen(_),
            ..
        }
    ));
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("nope.sl");

    let err = run(&options(Command::Compile, &input)).unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("cannot find file '{}'", input.display())
    );
    assert_eq!(
        err.render("nope.sl", ColorMode::Never),
        format!("error: cannot find file '{}'\n", input.display())
    );
}

#[test]
fn compile_errors_render_with_code_and_snippet() {
    let dir = TempDir::new().unwrap();
    let input = source_file(&dir, "broken.sl", "star x = 1\nshow(x, 2");

    let err = run(&options(Command::Compile, &input)).unwrap_err();
    let rendered = err.render("broken.sl", ColorMode::Never);
    assert!(rendered.contains("E2001"), "{rendered}");
    assert!(rendered.contains("broken.sl"), "{rendered}");
    assert!(rendered.contains("expected `)`"), "{rendered}");
    assert!(rendered.contains("show(x, 2"), "{rendered}");
}

#[test]
fn errors_after_non_ascii_text_keep_their_location() {
    let dir = TempDir::new().unwrap();
    let input = source_file(&dir, "t.sl", "star s = \"éééééééééé\" #\n");

    let err = run(&options(Command::Compile, &input)).unwrap_err();
    let rendered = err.render("t.sl", ColorMode::Never);
    assert!(rendered.contains("E1003"), "{rendered}");
    assert!(rendered.contains("t.sl:1:"), "{rendered}");
    assert!(rendered.contains("not valid here"), "{rendered}");
}

#[test]
fn unclosed_call_points_at_the_open_paren() {
    let dir = TempDir::new().unwrap();
    let input = source_file(&dir, "a.sl", "show(1,\n  2\n");

    let err = run(&options(Command::Check, &input)).unwrap_err();
    let rendered = err.render("a.sl", ColorMode::Never);
    assert!(rendered.contains("expected `)`"), "{rendered}");
    assert!(rendered.contains("unclosed delimiter opened here"), "{rendered}");
}

// === Binary ===

fn starlight() -> Process {
    Process::new(env!("CARGO_BIN_EXE_starlight"))
}

#[test]
fn binary_compiles_and_exits_zero() {
    let dir = TempDir::new().unwrap();
    let input = source_file(&dir, "a.sl", "show(1 + 2)");

    let output = starlight().arg("compile").arg(&input).output().unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "console.log(1 + 2);\n");
}

#[test]
fn binary_exits_one_on_errors() {
    let dir = TempDir::new().unwrap();
    let input = source_file(&dir, "a.sl", "star = 1");

    let output = starlight()
        .args(["check", "--color=never"])
        .arg(&input)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("E2001"), "{stderr}");
    assert!(stderr.ends_with("error: aborting due to 1 previous error\n"), "{stderr}");
}

#[test]
fn binary_rejects_bad_usage() {
    let output = starlight().args(["frobnicate", "a.sl"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.starts_with("error: unknown command 'frobnicate'"), "{stderr}");
}
