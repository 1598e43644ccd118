#[cfg(test)]
mod scanner_tests {
    use verdict::scanner::Scanner;
    use verdict::token::{Token, TokenType};

    fn scan(source: &str) -> Vec<Token<'_>> {
        Scanner::new(source.as_bytes())
            .collect::<Result<Vec<_>, _>>()
            .expect("scan failed")
    }

    fn assert_token_sequence(source: &str, expected: &[(TokenType, &str)]) {
        let tokens = scan(source);

        assert_eq!(tokens.len(), expected.len(), "token count for {:?}", source);

        for (actual, (expected_type, expected_lexeme)) in tokens.iter().zip(expected.iter()) {
            assert_eq!(actual.token_type, *expected_type);
            assert_eq!(actual.lexeme, *expected_lexeme);
        }
    }

    #[test]
    fn test_punctuation_and_operators() {
        assert_token_sequence(
            "( ) , . ? : + - * %",
            &[
                (TokenType::LEFT_PAREN, "("),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::COMMA, ","),
                (TokenType::DOT, "."),
                (TokenType::QUESTION, "?"),
                (TokenType::COLON, ":"),
                (TokenType::PLUS, "+"),
                (TokenType::MINUS, "-"),
                (TokenType::STAR, "*"),
                (TokenType::PERCENT, "%"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_comparison_and_logical_operators() {
        assert_token_sequence(
            "! != = == < <= > >= && ||",
            &[
                (TokenType::BANG, "!"),
                (TokenType::BANG_EQUAL, "!="),
                (TokenType::EQUAL, "="),
                (TokenType::EQUAL_EQUAL, "=="),
                (TokenType::LESS, "<"),
                (TokenType::LESS_EQUAL, "<="),
                (TokenType::GREATER, ">"),
                (TokenType::GREATER_EQUAL, ">="),
                (TokenType::AND_AND, "&&"),
                (TokenType::OR_OR, "||"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_integer_literals() {
        let tokens = scan("42 0x2A 0");

        match tokens[0].token_type {
            TokenType::NUMBER_INT(n) => assert_eq!(n, 42),
            ref other => panic!("expected NUMBER_INT, got {:?}", other),
        }

        match tokens[1].token_type {
            TokenType::NUMBER_INT(n) => assert_eq!(n, 42),
            ref other => panic!("expected NUMBER_INT, got {:?}", other),
        }

        assert_eq!(tokens[1].lexeme, "0x2A");

        match tokens[2].token_type {
            TokenType::NUMBER_INT(n) => assert_eq!(n, 0),
            ref other => panic!("expected NUMBER_INT, got {:?}", other),
        }
    }

    #[test]
    fn test_float_literals() {
        let tokens = scan("3.14 10.5e3 1.5e-2 2.0E+1");

        let expected: [f64; 4] = [3.14, 10500.0, 0.015, 20.0];

        for (token, want) in tokens.iter().zip(expected.iter()) {
            match token.token_type {
                TokenType::NUMBER_FLOAT(n) => assert!((n - want).abs() < 1e-12),
                ref other => panic!("expected NUMBER_FLOAT, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_integer_without_fraction_stays_integer() {
        // "3." is an integer followed by DOT, not a float.
        assert_token_sequence(
            "3.a",
            &[
                (TokenType::NUMBER_INT(0), "3"),
                (TokenType::DOT, "."),
                (TokenType::IDENTIFIER, "a"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_int_literal_out_of_range() {
        // One past i64::MAX.
        let result: Result<Vec<_>, _> = Scanner::new(b"9223372036854775808").collect();

        assert!(result.is_err());

        // i64::MAX itself is fine.
        let tokens = scan("9223372036854775807");

        match tokens[0].token_type {
            TokenType::NUMBER_INT(n) => assert_eq!(n, i64::MAX),
            ref other => panic!("expected NUMBER_INT, got {:?}", other),
        }
    }

    #[test]
    fn test_string_literals_keep_the_other_quote() {
        let tokens = scan(r#"'he said "hi"' "it's ok""#);

        match tokens[0].token_type {
            TokenType::STRING(ref s) => assert_eq!(s, r#"he said "hi""#),
            ref other => panic!("expected STRING, got {:?}", other),
        }

        match tokens[1].token_type {
            TokenType::STRING(ref s) => assert_eq!(s, "it's ok"),
            ref other => panic!("expected STRING, got {:?}", other),
        }
    }

    #[test]
    fn test_unterminated_string() {
        let result: Result<Vec<_>, _> = Scanner::new(b"'no closing quote").collect();

        assert!(result.is_err());
    }

    #[test]
    fn test_pattern_literal_round_trip() {
        // Raw text must be preserved verbatim, backslashes included.
        let tokens = scan(r"/\w+\d?\..*/");

        match tokens[0].token_type {
            TokenType::REGEX(ref text) => assert_eq!(text, r"\w+\d?\..*"),
            ref other => panic!("expected REGEX, got {:?}", other),
        }

        assert_eq!(tokens[0].lexeme, r"/\w+\d?\..*/");
    }

    #[test]
    fn test_pattern_with_escaped_slash() {
        let tokens = scan(r"/a\/b/");

        match tokens[0].token_type {
            TokenType::REGEX(ref text) => assert_eq!(text, r"a\/b"),
            ref other => panic!("expected REGEX, got {:?}", other),
        }
    }

    #[test]
    fn test_slash_after_operand_is_division() {
        assert_token_sequence(
            "6/2/3",
            &[
                (TokenType::NUMBER_INT(0), "6"),
                (TokenType::SLASH, "/"),
                (TokenType::NUMBER_INT(0), "2"),
                (TokenType::SLASH, "/"),
                (TokenType::NUMBER_INT(0), "3"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_slash_in_operand_position_is_pattern() {
        // After '(' an operand may start, so '/' opens a pattern literal.
        let tokens = scan(r"(/\d+/)");

        assert_eq!(tokens[0].token_type, TokenType::LEFT_PAREN);

        match tokens[1].token_type {
            TokenType::REGEX(ref text) => assert_eq!(text, r"\d+"),
            ref other => panic!("expected REGEX, got {:?}", other),
        }

        assert_eq!(tokens[2].token_type, TokenType::RIGHT_PAREN);
    }

    #[test]
    fn test_unterminated_pattern() {
        let result: Result<Vec<_>, _> = Scanner::new(br"/\d+").collect();

        assert!(result.is_err());
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_token_sequence(
            "1 # the rest of this line vanishes\n2",
            &[
                (TokenType::NUMBER_INT(0), "1"),
                (TokenType::NUMBER_INT(0), "2"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_identifiers_and_keywords() {
        assert_token_sequence(
            "_a foo_bar Ab1 true false nil trueish",
            &[
                (TokenType::IDENTIFIER, "_a"),
                (TokenType::IDENTIFIER, "foo_bar"),
                (TokenType::IDENTIFIER, "Ab1"),
                (TokenType::TRUE, "true"),
                (TokenType::FALSE, "false"),
                (TokenType::NIL, "nil"),
                (TokenType::IDENTIFIER, "trueish"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_unexpected_characters() {
        for source in ["$", "&", "|", "@"] {
            let result: Result<Vec<_>, _> = Scanner::new(source.as_bytes()).collect();

            assert!(result.is_err(), "expected lex error for {:?}", source);
        }
    }

    #[test]
    fn test_line_tracking() {
        let tokens = scan("1 +\n2");

        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[1].line, 1);
        assert_eq!(tokens[2].line, 2);
    }

    #[test]
    fn test_eof_is_emitted_once() {
        let mut scanner = Scanner::new(b"1");

        let first = scanner.next().expect("token").expect("ok");
        assert_eq!(first.token_type, TokenType::NUMBER_INT(0));

        let eof = scanner.next().expect("token").expect("ok");
        assert_eq!(eof.token_type, TokenType::EOF);

        assert!(scanner.next().is_none());
        assert!(scanner.next().is_none()); // fused
    }
}
