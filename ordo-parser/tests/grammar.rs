use ordo_parser::ast::{BinOp, Expr, Stmt};
use ordo_parser::parse_program;

#[test]
fn single_function() {
    let prog = parse_program("FUNCTION F(n) BEGIN x <- 1 END").unwrap();
    assert_eq!(prog.functions.len(), 1);
    let f = &prog.functions[0];
    assert_eq!(f.name, "F");
    assert_eq!(f.params, vec!["n"]);
    assert_eq!(f.body.stmts.len(), 1);
}

#[test]
fn multiple_functions() {
    let src = "FUNCTION A() BEGIN x <- 1 END FUNCTION B(n, m) BEGIN y <- 2 END";
    let prog = parse_program(src).unwrap();
    assert_eq!(prog.functions.len(), 2);
    assert_eq!(prog.functions[1].params, vec!["n", "m"]);
}

#[test]
fn keywords_are_case_insensitive() {
    let prog = parse_program("function F(n) begin x <- 1 end").unwrap();
    assert_eq!(prog.functions[0].name, "F");
}

#[test]
fn for_loop_body_is_normalized() {
    let src = "FUNCTION F(n) BEGIN FOR i <- 1 TO n DO x <- 1 END";
    let prog = parse_program(src).unwrap();
    match &prog.functions[0].body.stmts[0] {
        Stmt::For { var, body, .. } => {
            assert_eq!(var, "i");
            assert_eq!(body.stmts.len(), 1);
            assert!(matches!(body.stmts[0], Stmt::Assign { .. }));
        }
        other => panic!("expected For, got {other:?}"),
    }
}

#[test]
fn nested_blocks_are_flattened() {
    let src = "FUNCTION F(n) BEGIN BEGIN x <- 1 BEGIN y <- 2 END END z <- 3 END";
    let prog = parse_program(src).unwrap();
    let body = &prog.functions[0].body;
    assert_eq!(body.stmts.len(), 3);
    assert!(body
        .stmts
        .iter()
        .all(|s| matches!(s, Stmt::Assign { .. })));
}

#[test]
fn if_with_else() {
    let src = "FUNCTION F(n) BEGIN IF n > 0 THEN x <- 1 ELSE y <- 2 END";
    let prog = parse_program(src).unwrap();
    match &prog.functions[0].body.stmts[0] {
        Stmt::If {
            then_branch,
            else_branch,
            ..
        } => {
            assert_eq!(then_branch.stmts.len(), 1);
            assert!(else_branch.is_some());
        }
        other => panic!("expected If, got {other:?}"),
    }
}

#[test]
fn if_without_else() {
    let src = "FUNCTION F(n) BEGIN IF (n > 0) THEN x <- 1 END";
    let prog = parse_program(src).unwrap();
    match &prog.functions[0].body.stmts[0] {
        Stmt::If { else_branch, .. } => assert!(else_branch.is_none()),
        other => panic!("expected If, got {other:?}"),
    }
}

#[test]
fn call_statement_with_and_without_keyword() {
    let src = "FUNCTION F(n) BEGIN CALL G(n) G(n, 1) END";
    let prog = parse_program(src).unwrap();
    let body = &prog.functions[0].body;
    match (&body.stmts[0], &body.stmts[1]) {
        (Stmt::Call { name: a, .. }, Stmt::Call { name: b, args, .. }) => {
            assert_eq!(a, "G");
            assert_eq!(b, "G");
            assert_eq!(args.len(), 2);
        }
        other => panic!("expected two calls, got {other:?}"),
    }
}

#[test]
fn call_in_expression_position() {
    let src = "FUNCTION F(n) BEGIN x <- G(n) + 1 END";
    let prog = parse_program(src).unwrap();
    match &prog.functions[0].body.stmts[0] {
        Stmt::Assign { value, .. } => match value {
            Expr::BinOp { op: BinOp::Add, lhs, .. } => {
                assert!(matches!(lhs.as_ref(), Expr::Call { .. }));
            }
            other => panic!("expected Add, got {other:?}"),
        },
        other => panic!("expected Assign, got {other:?}"),
    }
}

#[test]
fn array_access_folds_to_synthetic_name() {
    let src = "FUNCTION F(n) BEGIN A[i] <- A[j] + 1 END";
    let prog = parse_program(src).unwrap();
    match &prog.functions[0].body.stmts[0] {
        Stmt::Assign { target, value, .. } => {
            assert_eq!(target, "A[]");
            match value {
                Expr::BinOp { lhs, .. } => match lhs.as_ref() {
                    Expr::Var { name } => assert_eq!(name, "A[]"),
                    other => panic!("expected folded var, got {other:?}"),
                },
                other => panic!("expected BinOp, got {other:?}"),
            }
        }
        other => panic!("expected Assign, got {other:?}"),
    }
}

#[test]
fn operator_precedence() {
    // 1 + 2 * 3 parses as 1 + (2 * 3)
    let prog = parse_program("FUNCTION F(n) BEGIN x <- 1 + 2 * 3 END").unwrap();
    match &prog.functions[0].body.stmts[0] {
        Stmt::Assign { value, .. } => match value {
            Expr::BinOp { op: BinOp::Add, rhs, .. } => {
                assert!(matches!(
                    rhs.as_ref(),
                    Expr::BinOp { op: BinOp::Mul, .. }
                ));
            }
            other => panic!("expected Add at top, got {other:?}"),
        },
        other => panic!("expected Assign, got {other:?}"),
    }
}

#[test]
fn boolean_precedence() {
    // a < b AND c < d OR e parses as ((a<b) AND (c<d)) OR e
    let prog =
        parse_program("FUNCTION F(n) BEGIN WHILE a < b AND c < d OR e DO x <- 1 END").unwrap();
    match &prog.functions[0].body.stmts[0] {
        Stmt::While { condition, .. } => match condition {
            Expr::BinOp { op: BinOp::Or, lhs, .. } => {
                assert!(matches!(
                    lhs.as_ref(),
                    Expr::BinOp { op: BinOp::And, .. }
                ));
            }
            other => panic!("expected Or at top, got {other:?}"),
        },
        other => panic!("expected While, got {other:?}"),
    }
}

#[test]
fn mod_and_div_operators() {
    let prog = parse_program("FUNCTION F(n) BEGIN x <- n MOD 2 y <- n DIV 2 END").unwrap();
    let body = &prog.functions[0].body;
    match &body.stmts[0] {
        Stmt::Assign { value, .. } => {
            assert!(matches!(value, Expr::BinOp { op: BinOp::Mod, .. }));
        }
        other => panic!("expected Assign, got {other:?}"),
    }
    match &body.stmts[1] {
        Stmt::Assign { value, .. } => {
            assert!(matches!(value, Expr::BinOp { op: BinOp::IntDiv, .. }));
        }
        other => panic!("expected Assign, got {other:?}"),
    }
}

#[test]
fn line_stamps() {
    let src = "FUNCTION F(n) BEGIN\n  x <- 1\n  FOR i <- 1 TO n DO\n    y <- 2\nEND";
    let prog = parse_program(src).unwrap();
    let body = &prog.functions[0].body;
    assert_eq!(body.stmts[0].line(), Some(2));
    assert_eq!(body.stmts[1].line(), Some(3));
    match &body.stmts[1] {
        Stmt::For { body, .. } => assert_eq!(body.stmts[0].line(), Some(4)),
        other => panic!("expected For, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Failure cases: parsing is atomic, errors name the offending token
// ---------------------------------------------------------------------------

#[test]
fn missing_end() {
    let err = parse_program("FUNCTION F(n) BEGIN x <- 1").unwrap_err();
    assert!(err.message.contains("END") || err.message.contains("end of input"));
}

#[test]
fn if_without_then() {
    let err = parse_program("FUNCTION F(n) BEGIN IF n > 0 x <- 1 END").unwrap_err();
    assert!(err.message.contains("THEN"), "message: {}", err.message);
    assert!(err.message.contains('x'), "message: {}", err.message);
}

#[test]
fn empty_input_is_an_error() {
    assert!(parse_program("").is_err());
}

#[test]
fn error_carries_position() {
    let err = parse_program("FUNCTION F(n) BEGIN\n  x 1\nEND").unwrap_err();
    assert_eq!(err.line, 2);
    assert!(err.message.contains("<-"), "message: {}", err.message);
}

#[test]
fn stray_token_after_functions() {
    let err = parse_program("FUNCTION F(n) BEGIN x <- 1 END garbage").unwrap_err();
    assert!(err.message.contains("FUNCTION"), "message: {}", err.message);
}
