#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use pretty_assertions::assert_eq;
use starlight_ir::{BinaryOp, Expr, ExprKind, Literal, Program, Stmt, StmtKind, UnaryOp};

fn program(source: &str) -> Program {
    let tokens = starlight_lexer::tokenize(source).unwrap();
    starlight_parse::parse(&tokens).unwrap()
}

fn compile(source: &str) -> String {
    generate(&program(source)).unwrap()
}

fn num(n: f64) -> Expr {
    Expr::new(ExprKind::Literal(Literal::Number(n)), Span::DUMMY)
}

fn var(name: &str) -> Expr {
    Expr::new(ExprKind::Identifier(name.to_string()), Span::DUMMY)
}

fn bin(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::new(
        ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
        Span::DUMMY,
    )
}

#[test]
fn declarations() {
    assert_eq!(
        compile("star a = 1\nconstel b = \"x\"\nstar c\nconstel d"),
        "let a = 1;\nconst b = \"x\";\nlet c;\nconst d = undefined;\n"
    );
}

#[test]
fn show_becomes_print_binding() {
    assert_eq!(compile("show(1 + 2)"), "console.log(1 + 2);\n");

    let config = CodegenConfig {
        print_binding: "__starlight.print".to_string(),
        ..CodegenConfig::default()
    };
    let out = generate_with(&program("show(\"hi\")"), &config).unwrap();
    assert_eq!(out, "__starlight.print(\"hi\");\n");
}

#[test]
fn precedence_is_preserved() {
    assert_eq!(compile("1 + 2 * 3"), "1 + 2 * 3;\n");
    assert_eq!(compile("(1 + 2) * 3"), "(1 + 2) * 3;\n");
    assert_eq!(compile("a - (b - c)"), "a - (b - c);\n");
    assert_eq!(compile("(a - b) - c"), "a - b - c;\n");
    assert_eq!(compile("!(a && b)"), "!(a && b);\n");
    assert_eq!(compile("a = b = 2"), "a = b = 2;\n");
}

#[test]
fn double_negation_does_not_fuse() {
    let expr = Expr::new(
        ExprKind::Unary {
            op: UnaryOp::Neg,
            argument: Box::new(Expr::new(
                ExprKind::Unary {
                    op: UnaryOp::Neg,
                    argument: Box::new(var("x")),
                },
                Span::DUMMY,
            )),
        },
        Span::DUMMY,
    );
    assert_eq!(generate(&expr).unwrap(), "-(-x)");
}

#[test]
fn hand_built_tree_gets_parentheses() {
    let expr = bin(BinaryOp::Mul, bin(BinaryOp::Add, num(1.0), num(2.0)), num(3.0));
    assert_eq!(generate(&expr).unwrap(), "(1 + 2) * 3");
}

#[test]
fn string_literals_are_requoted() {
    assert_eq!(compile("show('it\"s')"), "console.log(\"it\\\"s\");\n");
    // Escapes stay literal text: the backslash itself is escaped.
    assert_eq!(compile(r#"show("a\nb")"#), "console.log(\"a\\\\nb\");\n");
}

#[test]
fn raw_control_characters_cannot_escape_the_literal() {
    let source = "show(\"line1\nline2\u{2028}\")";
    assert_eq!(
        compile(source),
        "console.log(\"line1\\nline2\\u2028\");\n"
    );
}

#[test]
fn functions_and_blocks_nest() {
    let out = compile("nova add(a, b) {\n  emit a + b\n}\nnova empty() {}");
    assert_eq!(
        out,
        "function add(a, b) {\n  return a + b;\n}\nfunction empty() {}\n"
    );
}

#[test]
fn control_flow() {
    let out = compile(
        "when (x > 1) { show(x) } otherwise show(0)\n\
         loop (x < 10) { x = x + 1 }\n\
         repeat (i = 0; i < 3; i = i + 1) { stop }\n\
         nova f() { emit }",
    );
    assert_eq!(
        out,
        "if (x > 1) {\n  console.log(x);\n} else console.log(0);\n\
         while (x < 10) {\n  x = x + 1;\n}\n\
         for (i = 0; i < 3; i = i + 1) {\n  break;\n}\n\
         function f() {\n  return;\n}\n"
    );
}

#[test]
fn nested_blocks_indent() {
    let config = CodegenConfig {
        indent_width: 4,
        ..CodegenConfig::default()
    };
    let out = generate_with(&program("nova f() { loop (yes) { skip } }"), &config).unwrap();
    assert_eq!(
        out,
        "function f() {\n    while (true) {\n        continue;\n    }\n}\n"
    );
}

#[test]
fn js_reserved_identifiers_are_mangled() {
    assert_eq!(compile("star var = new(class)"), "let var$ = new$(class$);\n");
}

#[test]
fn mangled_names_never_collide_with_dollar_names() {
    assert_eq!(
        compile("star var = 1\nstar var$ = 2\nshow(var, var$, $, a$b)"),
        "let var$ = 1;\nlet var$$ = 2;\nconsole.log(var$, var$$, $$, a$b);\n"
    );
}

#[test]
fn literals() {
    assert_eq!(compile("show(yes, no, voidstar, 2.50, 7.)"), "console.log(true, false, null, 2.5, 7);\n");
}

#[test]
fn invalid_assignment_target() {
    let err = generate(&program("f() = 1")).unwrap_err();
    assert!(matches!(err, CodegenError::InvalidAssignmentTarget { .. }));
    assert_eq!(err.span(), Span::new(0, 3));
    assert_eq!(err.code(), starlight_diagnostic::ErrorCode::E3001);

    let err = generate(&program("show = 1")).unwrap_err();
    assert!(matches!(err, CodegenError::InvalidAssignmentTarget { .. }));
}

#[test]
fn dangling_else_is_braced() {
    let inner = Stmt::new(
        StmtKind::If {
            test: var("b"),
            consequent: Box::new(Stmt::new(StmtKind::Break, Span::DUMMY)),
            alternate: None,
        },
        Span::DUMMY,
    );
    let outer = Stmt::new(
        StmtKind::If {
            test: var("a"),
            consequent: Box::new(inner),
            alternate: Some(Box::new(Stmt::new(StmtKind::Continue, Span::DUMMY))),
        },
        Span::DUMMY,
    );
    assert_eq!(
        generate(&outer).unwrap(),
        "if (a) {\n  if (b) break;\n} else continue;\n"
    );
}

#[test]
fn generation_is_deterministic() {
    let source = "star total = 0\nrepeat (i = 0; i < 10; i = i + 1) { total = total + i * 2 }\nshow(total)";
    let tree = program(source);
    let first = generate(&tree).unwrap();
    let second = generate(&tree).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, compile(source));
}
