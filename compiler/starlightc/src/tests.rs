#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::PathBuf;

use pretty_assertions::assert_eq;
use starlight_codegen::CodegenConfig;
use starlight_diagnostic::emitter::ColorMode;
use starlight_diagnostic::ErrorCode;
use starlight_ir::Span;

use super::*;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

// === Driver ===

#[test]
fn compiles_a_small_program() {
    let js = compile("star total = 1 + 2 * 3\nshow(total)").unwrap();
    assert_eq!(js, "let total = 1 + 2 * 3;\nconsole.log(total);\n");
}

#[test]
fn options_reach_the_code_generator() {
    let options = CompileOptions {
        codegen: CodegenConfig {
            print_binding: "print".to_string(),
            indent_width: 4,
        },
    };
    let js = compile_with("nova f() { show(1) }", &options).unwrap();
    assert_eq!(js, "function f() {\n    print(1);\n}\n");
}

#[test]
fn each_stage_reports_its_own_error() {
    let err = compile("show(\"abc").unwrap_err();
    assert!(matches!(err, CompileError::Lex(_)));
    assert_eq!(err.span(), Span::new(5, 6));
    assert_eq!(err.to_diagnostic().code, ErrorCode::E1001);

    let err = compile("show(1, 2").unwrap_err();
    assert!(matches!(err, CompileError::Parse(_)));
    assert_eq!(err.span(), Span::point(9));
    assert_eq!(err.to_diagnostic().code, ErrorCode::E2001);

    let err = compile("f() = 1").unwrap_err();
    assert!(matches!(err, CompileError::Codegen(_)));
    assert_eq!(err.span(), Span::new(0, 3));
    assert_eq!(err.to_diagnostic().code, ErrorCode::E3001);
}

#[test]
fn error_display_names_the_stage() {
    let err = compile("show(1, 2").unwrap_err();
    assert_eq!(
        err.to_string(),
        "parse error: expected `)`, found end of file at 9..9"
    );
}

#[test]
fn init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
}

// === Command-line options ===

#[test]
fn parses_compile_options() {
    let options = CliOptions::parse(&args(&[
        "compile",
        "app.sl",
        "-o",
        "out.js",
        "--print-binding=log",
        "--indent=4",
        "--color=never",
    ]))
    .unwrap();
    assert_eq!(
        options,
        CliOptions {
            command: Command::Compile,
            input: PathBuf::from("app.sl"),
            output: Some(PathBuf::from("out.js")),
            color: ColorMode::Never,
            codegen: CodegenConfig {
                print_binding: "log".to_string(),
                indent_width: 4,
            },
        }
    );
}

#[test]
fn defaults_apply_when_options_are_absent() {
    let options = CliOptions::parse(&args(&["tokens", "app.sl"])).unwrap();
    assert_eq!(options.command, Command::Tokens);
    assert_eq!(options.output, None);
    assert_eq!(options.color, ColorMode::Auto);
    assert_eq!(options.codegen, CodegenConfig::default());
}

#[test]
fn usage_errors() {
    assert_eq!(CliOptions::parse(&[]), Err(UsageError::MissingCommand));
    assert_eq!(
        CliOptions::parse(&args(&["build", "a.sl"])),
        Err(UsageError::UnknownCommand("build".to_string()))
    );
    assert_eq!(
        CliOptions::parse(&args(&["check"])),
        Err(UsageError::MissingInput)
    );
    assert_eq!(
        CliOptions::parse(&args(&["check", "a.sl", "b.sl"])),
        Err(UsageError::UnexpectedArgument("b.sl".to_string()))
    );
    assert_eq!(
        CliOptions::parse(&args(&["compile", "a.sl", "-o"])),
        Err(UsageError::MissingValue {
            flag: "-o".to_string()
        })
    );
    assert_eq!(
        CliOptions::parse(&args(&["compile", "a.sl", "--indent=wide"])),
        Err(UsageError::InvalidValue {
            flag: "--indent".to_string(),
            value: "wide".to_string(),
        })
    );
    assert_eq!(
        CliOptions::parse(&args(&["compile", "a.sl", "--color=sometimes"])),
        Err(UsageError::InvalidValue {
            flag: "--color".to_string(),
            value: "sometimes".to_string(),
        })
    );
    assert_eq!(
        CliOptions::parse(&args(&["ast", "a.sl", "-o", "x"])),
        Err(UsageError::NotForCommand {
            flag: "-o".to_string()
        })
    );
}
