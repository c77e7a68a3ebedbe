use lambdac::{
    CompileError, CompileOptions, Expr, Parser, Runtime, RuntimeError, ScopeChain, Term, Value,
    compile, compile_source, compile_with, render, render_source, reverse, reverse_then_recompile,
    runtime::DEFAULT_STEP_LIMIT,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn lc(src: &str) -> String {
    init_logger();
    let Ok(rendered) = render_source(src) else {
        panic!("Failed to compile source: {src}");
    };
    rendered
}

fn term(src: &str) -> Term {
    init_logger();
    let Ok(term) = compile_source(src) else {
        panic!("Failed to compile source: {src}");
    };
    term
}

/// Compiles `src`, reverse compiles the term and binds the resulting value
/// as a global, the way a presenter names each encoding before using it.
fn define(runtime: &mut Runtime, name: &str, src: &str) {
    let Ok(tree) = reverse(&term(src)) else {
        panic!("Failed to reverse compile: {src}");
    };
    let Ok(value) = runtime.evaluate(&tree) else {
        panic!("Failed to evaluate: {tree}");
    };
    runtime.define(name, value);
}

fn run(runtime: &Runtime, src: &str) -> Value {
    let Ok(value) = lambdac::run_source(src, runtime) else {
        panic!("Failed to run source: {src}");
    };
    value
}

#[test]
fn test_single_parameter_identity() {
    assert_eq!(lc("x -> x"), "λx0.(x0)");
    assert_eq!(lc("lambda anything: anything"), "λx0.(x0)");
}

#[test]
fn test_curry_law() {
    assert_eq!(lc("(a, b) -> a(b)"), "λx0.(λx1.(x0(x1)))");
    assert_eq!(lc("(a, b) -> a(b)"), lc("a -> b -> a(b)"));
}

#[test]
fn test_multi_argument_call_law() {
    assert_eq!(lc("(f, a, b) -> f(a, b)"), lc("(f, a, b) -> f(a)(b)"));
    assert_eq!(lc("(f, a, b, c) -> f(a, b)(c)"), lc("(f, a, b, c) -> f(a)(b, c)"));
}

#[test]
fn test_end_to_end_scenarios() {
    assert_eq!(lc("x -> y -> x(y)"), "λx0.(λx1.(x0(x1)))");

    let t = term("lambda x, y, z: x(y, z)");
    assert_eq!(render(&t), "λx0.(λx1.(λx2.(x0(x1)(x2))))");

    let Ok(tree) = reverse(&t) else {
        panic!("Failed to reverse compile {t}");
    };
    assert_eq!(tree.to_string(), "x0 -> x1 -> x2 -> x0(x1)(x2)");
}

#[test]
fn test_round_trip_through_host_source() {
    for src in [
        "x -> x",
        "x -> y -> x",
        "(f, x) -> f(f(f(x)))",
        "n -> f -> x -> f(n(f)(x))",
        "(a, b) -> a(b)(a)",
        "p -> p(a -> b -> a)",
        "f -> x -> f(d(x))",
    ] {
        let t = term(src);
        let Ok(tree) = reverse(&t) else {
            panic!("Failed to reverse compile {t}");
        };
        // The host parses the printed source again, allocating from 0.
        let Ok(reparsed) = Parser::parse(&tree.to_string()) else {
            panic!("Failed to reparse {tree}");
        };
        let Ok(again) = compile(&reparsed) else {
            panic!("Failed to recompile {reparsed}");
        };
        assert_eq!(render(&again.term), render(&t), "Failed for: {src}");

        let Ok(direct) = reverse_then_recompile(&t) else {
            panic!("Failed to round trip {t}");
        };
        assert_eq!(direct.term, again.term);
    }
}

#[test]
fn test_scope_chain_shadowing() {
    let mut scope = ScopeChain::new();
    scope.enter();
    scope.define("x".to_string(), 0);
    scope.enter();
    scope.define("x".to_string(), 1);
    assert_eq!(scope.lookup("x"), Ok(1));
    assert_eq!(scope.exit(), Ok(()));
    assert_eq!(scope.lookup("x"), Ok(0));
    assert_eq!(scope.exit(), Ok(()));
    assert_eq!(scope.exit(), Err(CompileError::ScopeUnderflow));
    assert_eq!(scope.depth(), 1);
}

#[test]
fn test_free_name_policies() {
    assert_eq!(lc("f -> x -> f(d(x))"), "λx0.(λx1.(x0(d(x1))))");

    let Ok(expr) = Parser::parse("f -> x -> f(d(x))") else {
        panic!("Failed to parse");
    };
    assert_eq!(
        compile_with(&expr, CompileOptions::strict()),
        Err(CompileError::UnboundName {
            name: "d".to_string()
        })
    );
}

#[test]
fn test_structural_errors_abort_compilation() {
    for (src, construct) in [
        ("() -> x", "lambda with no parameters"),
        ("f -> g -> f(g())", "call with no arguments"),
        ("f -> f(1)", "integer literal 1"),
    ] {
        let result = compile_source(src);
        let Err(err) = result else {
            panic!("Expected {src} to be rejected");
        };
        assert_eq!(
            err.downcast_ref::<CompileError>(),
            Some(&CompileError::Structural {
                construct: construct.to_string()
            }),
            "Failed for: {src}"
        );
    }
}

#[test]
fn test_parse_errors_surface_through_anyhow() {
    let Err(err) = compile_source("x -> ") else {
        panic!("Expected a parse error");
    };
    assert!(err.downcast_ref::<lambdac::ParseError>().is_some());
}

#[test]
fn test_hand_built_terms_are_checked_when_reversed() {
    let x0 = lambdac::Identifier::new(0);
    let x1 = lambdac::Identifier::new(1);
    let bad = Term::abs(x0, Term::var(x1));
    assert!(matches!(
        reverse(&bad),
        Err(CompileError::InvariantViolation { .. })
    ));

    let good = Term::abs(x0, Term::abs(x1, Term::app(Term::var(x1), Term::var(x0))));
    let Ok(tree) = reverse(&good) else {
        panic!("Failed to reverse compile {good}");
    };
    assert_eq!(
        tree,
        Expr::lambda(
            ["x0"],
            Expr::lambda(["x1"], Expr::call(Expr::name("x1"), [Expr::name("x0")]))
        )
    );
}

fn church_runtime() -> Runtime {
    let mut runtime = Runtime::with_prelude();
    define(&mut runtime, "TRUE", "a -> b -> a");
    define(&mut runtime, "FALSE", "a -> b -> b");
    define(&mut runtime, "ZERO", "f -> x -> x");
    define(&mut runtime, "SUCC", "n -> f -> x -> f(n(f)(x))");
    define(&mut runtime, "ONE", "SUCC(ZERO)");
    define(&mut runtime, "TWO", "SUCC(ONE)");
    define(&mut runtime, "THREE", "SUCC(TWO)");
    runtime
}

#[test]
fn test_church_booleans() {
    let mut runtime = church_runtime();
    define(&mut runtime, "NOT", "a -> a(FALSE)(TRUE)");
    define(&mut runtime, "AND", "a -> b -> a(b)(a)");
    define(&mut runtime, "OR", "a -> b -> a(a)(b)");

    assert_eq!(lc("a -> a(FALSE)(TRUE)"), "λx0.(x0(FALSE)(TRUE))");
    assert_eq!(lc("a -> b -> a(b)(a)"), "λx0.(λx1.(x0(x1)(x0)))");

    let truth = |src: &str| {
        let value = run(&runtime, src);
        let Ok(b) = runtime.church_to_bool(&value) else {
            panic!("Not a Church boolean: {src}");
        };
        b
    };

    assert!(truth("NOT(FALSE)"));
    assert!(!truth("NOT(TRUE)"));
    assert!(!truth("AND(TRUE, FALSE)"));
    assert!(truth("AND(TRUE, TRUE)"));
    assert!(truth("OR(FALSE, TRUE)"));
    assert!(!truth("OR(FALSE, FALSE)"));
}

#[test]
fn test_church_numerals() {
    let mut runtime = church_runtime();
    define(&mut runtime, "ADD", "a -> b -> a(SUCC)(b)");
    define(&mut runtime, "MUL", "a -> b -> f -> b(a(f))");
    define(&mut runtime, "EXP", "a -> b -> b(a)");

    assert_eq!(lc("n -> f -> x -> f(n(f)(x))"), "λx0.(λx1.(λx2.(x1(x0(x1)(x2)))))");

    let number = |src: &str| {
        let value = run(&runtime, src);
        let Ok(n) = runtime.church_to_int(&value) else {
            panic!("Not a Church numeral: {src}");
        };
        n
    };

    assert_eq!(number("ZERO"), 0);
    assert_eq!(number("THREE"), 3);
    assert_eq!(number("ADD(THREE, TWO)"), 5);
    assert_eq!(number("MUL(THREE)(THREE)"), 9);
    assert_eq!(number("EXP(TWO, THREE)"), 8);
}

#[test]
fn test_church_pairs_and_predecessor() {
    let mut runtime = church_runtime();
    define(&mut runtime, "PAIR", "a -> b -> f -> f(a)(b)");
    define(&mut runtime, "FIRST", "p -> p(TRUE)");
    define(&mut runtime, "SECOND", "p -> p(FALSE)");
    define(&mut runtime, "PREV", "p -> PAIR(SUCC(FIRST(p)))(FIRST(p))");
    define(&mut runtime, "PRED", "n -> SECOND(n(PREV)(PAIR(ZERO)(ZERO)))");
    define(&mut runtime, "SUB", "a -> b -> b(PRED)(a)");

    let number = |src: &str| {
        let value = run(&runtime, src);
        let Ok(n) = runtime.church_to_int(&value) else {
            panic!("Not a Church numeral: {src}");
        };
        n
    };

    assert_eq!(number("FIRST(PAIR(THREE, TWO))"), 3);
    assert_eq!(number("SECOND(PAIR(THREE, TWO))"), 2);
    assert_eq!(number("PRED(THREE)"), 2);
    assert_eq!(number("PRED(ZERO)"), 0);
    assert_eq!(number("SUB(THREE, TWO)"), 1);
}

#[test]
fn test_free_names_resolve_to_native_globals() {
    let runtime = Runtime::with_prelude();
    let value = run(&runtime, "x -> add(x, x)");
    let Ok(result) = runtime.apply(&value, vec![Value::Int(21)]) else {
        panic!("Failed to apply {value}");
    };
    assert_eq!(result.as_int(), Some(42));
}

#[test]
fn test_divergent_program_hits_default_step_limit() {
    let runtime = Runtime::new();
    let Err(err) = lambdac::run_source("(x -> x(x))(x -> x(x))", &runtime) else {
        panic!("Expected omega to diverge");
    };
    assert_eq!(
        err.downcast_ref::<RuntimeError>(),
        Some(&RuntimeError::StepLimitExceeded(DEFAULT_STEP_LIMIT))
    );
}

#[test]
fn test_large_church_numeral_reads_back() {
    let mut runtime = church_runtime().with_step_limit(1_000_000);
    define(&mut runtime, "ADD", "a -> b -> a(SUCC)(b)");
    define(&mut runtime, "MUL", "a -> b -> f -> b(a(f))");
    define(&mut runtime, "EXP", "a -> b -> b(a)");
    define(&mut runtime, "FIVE", "ADD(TWO, THREE)");
    define(&mut runtime, "TEN", "MUL(TWO, FIVE)");
    define(&mut runtime, "THOUSAND", "EXP(TEN, THREE)");
    define(&mut runtime, "FIVE_THOUSAND", "MUL(FIVE, THOUSAND)");

    // Rebuilt by counting with SUCC, so readback nests 5000 calls deep.
    let value = run(&runtime, "FIVE_THOUSAND(SUCC)(ZERO)");
    let Ok(n) = runtime.church_to_int(&value) else {
        panic!("Not a Church numeral: {value}");
    };
    assert_eq!(n, 5_000);
}
