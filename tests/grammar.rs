//! Behavioral grammar tests: literal typing, numeric promotion, string
//! coercion, strict operand rejection, short-circuiting, and path lookups.

#[cfg(test)]
mod grammar_tests {
    use verdict::{Environment, EvalError, Value, ValueMap};

    fn eval(source: &str) -> Value {
        verdict::execute_simple(source).expect(source)
    }

    fn eval_env(source: &str, env: &Environment) -> Value {
        verdict::execute(source, env).expect(source)
    }

    fn eval_err(source: &str) -> EvalError {
        match verdict::execute_simple(source) {
            Ok(value) => panic!("expected error for {:?}, got {}", source, value),
            Err(e) => e,
        }
    }

    fn eval_env_err(source: &str, env: &Environment) -> EvalError {
        match verdict::execute(source, env) {
            Ok(value) => panic!("expected error for {:?}, got {}", source, value),
            Err(e) => e,
        }
    }

    fn assert_float(value: Value, expected: f64) {
        match value {
            Value::Float(n) => assert!((n - expected).abs() < 0.001, "{} != {}", n, expected),
            other => panic!("expected double, got {:?}", other),
        }
    }

    /// The environment used by the conversion tests: two "objects", a map,
    /// and a boolean.
    fn conversion_env() -> Environment {
        let mut env = Environment::new();

        env.define("foo", ValueMap::from([("a", Value::Int(100))]).into());
        env.define(
            "bar",
            ValueMap::from([("a", Value::Int(99)), ("b", Value::Int(999))]).into(),
        );
        env.define("map", ValueMap::from([("key", Value::from("aviator"))]).into());
        env.define("bool", Value::Bool(false));

        env
    }

    // ───────────────────────── literal typing ──────────────────────────

    #[test]
    fn test_literal_types() {
        assert_eq!(eval("1"), Value::Int(1));
        assert!(matches!(eval("3.2"), Value::Float(_)));
        assert_eq!(eval("9223372036854775807"), Value::Int(i64::MAX));
        assert!(matches!(eval("3.14159265"), Value::Float(_)));

        assert_eq!(eval("'hello world'"), Value::from("hello world"));
        assert_eq!(eval("\"hello world\""), Value::from("hello world"));
        assert_eq!(eval(r#"'hello " world'"#), Value::from(r#"hello " world"#));
        assert_eq!(eval(r#""hello 'world'""#), Value::from("hello 'world'"));
        assert_eq!(
            eval(r#""hello 'world' 'dennis'""#),
            Value::from("hello 'world' 'dennis'")
        );

        assert_eq!(eval("true"), Value::Bool(true));
        assert_eq!(eval("false"), Value::Bool(false));
        assert_eq!(eval("nil"), Value::Nil);
    }

    #[test]
    fn test_pattern_literal_fidelity() {
        match eval(r"/\w+\d?\..*/") {
            Value::Pattern(p) => assert_eq!(p.text(), r"\w+\d?\..*"),
            other => panic!("expected pattern, got {:?}", other),
        }
    }

    #[test]
    fn test_identifier_scoping() {
        let mut env = Environment::new();
        env.define("_a", Value::Int(3));
        env.define("currentTime", Value::Int(1_199_999_999_999));

        assert_eq!(eval_env("_a", &env), Value::Int(3));
        assert_eq!(eval_env("currentTime", &env), Value::Int(1_199_999_999_999));

        assert!(matches!(
            eval_env_err("missing", &env),
            EvalError::Unresolved { .. }
        ));
    }

    // ───────────────────────── numeric promotion ───────────────────────

    #[test]
    fn test_long_op_long_is_long() {
        let env = conversion_env();

        assert_eq!(eval("3+3"), Value::Int(6));
        assert_eq!(eval("3+3/2"), Value::Int(4)); // truncating division first
        assert_eq!(eval_env("foo.a+bar.a", &env), Value::Int(199));
        assert_eq!(eval_env("bar.a+bar.b", &env), Value::Int(1098));
    }

    #[test]
    fn test_double_op_double_is_double() {
        assert_float(eval("3.2+3.3"), 6.5);
        assert!(matches!(eval("3.01+3.1/2.1"), Value::Float(_)));
        assert!(matches!(
            eval("3.19+3.1/2.9-1.0/(6.0002*7.7+8.9)"),
            Value::Float(_)
        ));
    }

    #[test]
    fn test_long_plus_double_promotes() {
        let env = conversion_env();

        assert_float(eval("3+0.02"), 3.02);
        assert!(matches!(eval("3+0.02-100"), Value::Float(_)));
        assert!(matches!(eval("3+3/2-1/(6*7+8.0)"), Value::Float(_)));
        assert_float(eval_env("foo.a+3.2-1000", &env), -896.8);
    }

    #[test]
    fn test_truncating_division_and_remainder() {
        assert_eq!(eval("7/2"), Value::Int(3));
        assert_eq!(eval("7%2"), Value::Int(1));
        assert_eq!(eval("-7/2"), Value::Int(-3));

        assert!(matches!(eval_err("1/0"), EvalError::Arithmetic { .. }));
        assert!(matches!(eval_err("1%0"), EvalError::Arithmetic { .. }));

        // IEEE handles the float case.
        match eval("1.0/0.0") {
            Value::Float(n) => assert!(n.is_infinite()),
            other => panic!("expected double, got {:?}", other),
        }
    }

    // ───────────────────────── string coercion ─────────────────────────

    #[test]
    fn test_string_concatenation() {
        let env = conversion_env();

        assert_eq!(eval("'hello '+ 'world'"), Value::from("hello world"));
        assert_eq!(eval_env("'hello '+map.key", &env), Value::from("hello aviator"));
        assert_eq!(eval_env("true+' '+map.key", &env), Value::from("true aviator"));
        assert_eq!(eval_env("foo.a+map.key", &env), Value::from("100aviator"));
        assert_eq!(eval(r"/\d+/+'hello'"), Value::from(r"\d+hello"));
        assert_eq!(eval_env("3.2+map.key", &env), Value::from("3.2aviator"));
        assert_eq!(
            eval_env("bool+' is false'", &env),
            Value::from("false is false")
        );
    }

    #[test]
    fn test_add_operand_limits() {
        let mut env = Environment::new();
        env.define("d", Value::Float(-3.3));
        env.define("s", Value::from("aviator"));
        env.define("bool", Value::Bool(true));
        env.define("foo", ValueMap::from([("a", Value::Int(2))]).into());

        assert_eq!(eval("1+2+3"), Value::Int(6));
        assert_float(eval_env("6+d", &env), 2.7);
        assert_eq!(eval_env("'hello '+s", &env), Value::from("hello aviator"));
        assert_eq!(eval_env("d+s", &env), Value::from("-3.3aviator"));
        assert_eq!(eval_env("bool+s", &env), Value::from("trueaviator"));
        assert_eq!(eval_env("1+s+3", &env), Value::from("1aviator3"));
        assert_eq!(eval_env("1+foo.a+3", &env), Value::Int(6));

        // Objects have no canonical text, even against a string.
        assert!(matches!(eval_env_err("foo+s", &env), EvalError::Type(_)));

        assert!(matches!(eval_env_err("d+bool", &env), EvalError::Type(_)));
        assert!(matches!(eval_env_err("1+bool+3", &env), EvalError::Type(_)));
        assert!(matches!(eval_err(r"/\d+/+100"), EvalError::Type(_)));
    }

    // ───────────────────────── strict rejection ────────────────────────

    #[test]
    fn test_not_operand_limits() {
        let mut env = Environment::new();
        env.define("bool", Value::Bool(false));

        assert_eq!(eval("!true"), Value::Bool(false));
        assert_eq!(eval_env("!bool", &env), Value::Bool(true));

        for source in ["!3", "!3.3", r"!/\d+/", "!'hello'"] {
            assert!(matches!(eval_err(source), EvalError::Type(_)), "{}", source);
        }
    }

    #[test]
    fn test_neg_operand_limits() {
        let mut env = Environment::new();
        env.define("d", Value::Float(-3.3));

        assert_eq!(eval("-3"), Value::Int(-3));
        assert_float(eval_env("-d", &env), 3.3);

        for source in ["-true", "-'hello'", r"-/\d+/"] {
            assert!(matches!(eval_err(source), EvalError::Type(_)), "{}", source);
        }
    }

    // ───────────────────────── comparisons ─────────────────────────────

    #[test]
    fn test_comparisons() {
        assert_eq!(eval("3 > 2"), Value::Bool(true));
        assert_eq!(eval("3 >= 3.0"), Value::Bool(true));
        assert_eq!(eval("2 < 1.5"), Value::Bool(false));
        assert_eq!(eval("'a' < 'b'"), Value::Bool(true));
        assert_eq!(eval("3 == 3.0"), Value::Bool(true));
        assert_eq!(eval("3 != 4"), Value::Bool(true));
        assert_eq!(eval("'a' == 'a'"), Value::Bool(true));
        assert_eq!(eval("true == true"), Value::Bool(true));

        assert_eq!(eval("nil == nil"), Value::Bool(true));
        assert_eq!(eval("nil == 1"), Value::Bool(false));
        assert_eq!(eval("nil != 1"), Value::Bool(true));

        assert!(matches!(eval_err("1 < 'a'"), EvalError::Type(_)));
        assert!(matches!(eval_err("nil < 1"), EvalError::Type(_)));
        assert!(matches!(eval_err("true == 1"), EvalError::Type(_)));
        assert!(matches!(eval_err("true > false"), EvalError::Type(_)));
    }

    // ───────────────────────── logic & ternary ─────────────────────────

    #[test]
    fn test_logical_operators() {
        assert_eq!(eval("true && false"), Value::Bool(false));
        assert_eq!(eval("true && true"), Value::Bool(true));
        assert_eq!(eval("false || true"), Value::Bool(true));
        assert_eq!(eval("false || false"), Value::Bool(false));

        // && binds tighter than ||.
        assert_eq!(eval("true || false && false"), Value::Bool(true));

        assert!(matches!(eval_err("1 && true"), EvalError::Type(_)));
        assert!(matches!(eval_err("true || 1"), EvalError::Type(_)));
    }

    #[test]
    fn test_short_circuit_skips_errors_on_the_right() {
        // The right side would fail to resolve; it must never be evaluated.
        assert_eq!(eval("false && missing"), Value::Bool(false));
        assert_eq!(eval("true || missing"), Value::Bool(true));
    }

    #[test]
    fn test_ternary() {
        assert_eq!(eval("true ? 1 : 2"), Value::Int(1));
        assert_eq!(eval("false ? 1 : 2"), Value::Int(2));

        // Right-associative chaining.
        assert_eq!(eval("false ? 1 : true ? 2 : 3"), Value::Int(2));

        // The unchosen branch never evaluates, so its unbound identifier
        // cannot fail.
        assert_eq!(eval("true ? 1 : missing"), Value::Int(1));
        assert_eq!(eval("false ? missing : 2"), Value::Int(2));

        assert!(matches!(eval_err("1 ? 2 : 3"), EvalError::Type(_)));
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("1+2*3"), Value::Int(7));
        assert_eq!(eval("(1+2)*3"), Value::Int(9));
        assert_eq!(eval("1+2 < 4 == true"), Value::Bool(true));
        assert_eq!(eval("-3+5"), Value::Int(2));
        assert_eq!(eval("!true == false"), Value::Bool(true));
        assert_eq!(eval("1 < 2 && 3 < 4"), Value::Bool(true));
    }

    // ───────────────────────── property paths ──────────────────────────

    #[test]
    fn test_nested_property_path() {
        let mut inner = ValueMap::new();
        inner.insert("key", Value::from("deep"));

        let mut env = Environment::new();
        env.define("outer", ValueMap::from([("inner", inner.into())]).into());

        assert_eq!(eval_env("outer.inner.key", &env), Value::from("deep"));
    }

    #[test]
    fn test_property_errors() {
        let env = conversion_env();

        assert!(matches!(
            eval_env_err("map.missing", &env),
            EvalError::Property(_)
        ));

        // Property access on a non-object value.
        assert!(matches!(
            eval_env_err("bool.field", &env),
            EvalError::Property(_)
        ));
    }

    // ───────────────────────── function calls ──────────────────────────

    #[test]
    fn test_string_contains_builtin() {
        assert_eq!(
            eval("string.contains('hello world', 'o w')"),
            Value::Bool(true)
        );
        assert_eq!(eval("string.contains('hello', 'xyz')"), Value::Bool(false));

        assert!(matches!(
            eval_err("string.contains('only one')"),
            EvalError::Arity { .. }
        ));
        assert!(matches!(
            eval_err("string.contains(1, 'a')"),
            EvalError::Type(_)
        ));
    }

    #[test]
    fn test_unknown_function() {
        assert!(matches!(
            eval_err("no.such.fn()"),
            EvalError::UnknownFunction { .. }
        ));
    }

    // ───────────────────────── syntax errors ───────────────────────────

    #[test]
    fn test_syntax_errors() {
        for source in [
            "a = 3",       // no assignment in the language
            "(1+2",        // unmatched paren
            "1 2",         // trailing token
            "1 +",         // missing operand
            "? 1 : 2",     // ternary without condition
            "true ? 1",    // missing ':'
            "f(1,)",       // dangling comma
            "",            // empty input
        ] {
            assert!(
                matches!(
                    verdict::execute_simple(source),
                    Err(EvalError::Syntax { .. })
                ),
                "expected syntax error for {:?}",
                source
            );
        }
    }
}
