pub mod token;
pub mod lexer;

pub use token::*;
pub use lexer::*;

#[cfg(test)]
mod tests {
    use crate::lexer::{lex, TokenKind};

    fn kinds(input: &str) -> Vec<TokenKind> {
        lex(input).unwrap().iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_lex_member_chain() {
        assert_eq!(
            kinds("this.items.get(_param_1)[0]"),
            vec![
                TokenKind::This,
                TokenKind::Dot,
                TokenKind::Ident,
                TokenKind::Dot,
                TokenKind::Ident,
                TokenKind::LParen,
                TokenKind::Ident,
                TokenKind::RParen,
                TokenKind::LBracket,
                TokenKind::IntLiteral,
                TokenKind::RBracket,
            ]
        );
    }

    #[test]
    fn test_lex_literals() {
        assert_eq!(
            kinds(r#"null 42 0x1F 7L 1.5 .5 2e10 3f "a\"b" 'c' '\n' '\u0041' true false"#),
            vec![
                TokenKind::Null,
                TokenKind::IntLiteral,
                TokenKind::IntLiteral,
                TokenKind::LongLiteral,
                TokenKind::DoubleLiteral,
                TokenKind::DoubleLiteral,
                TokenKind::DoubleLiteral,
                TokenKind::DoubleLiteral,
                TokenKind::StringLiteral,
                TokenKind::CharLiteral,
                TokenKind::CharLiteral,
                TokenKind::CharLiteral,
                TokenKind::True,
                TokenKind::False,
            ]
        );
    }

    #[test]
    fn test_lex_keywords_are_not_prefixes() {
        assert_eq!(kinds("thisValue superclass classes"), vec![TokenKind::Ident; 3]);
        assert_eq!(kinds("String.class"), vec![TokenKind::Ident, TokenKind::Dot, TokenKind::Class]);
    }

    #[test]
    fn test_lex_operators() {
        assert_eq!(
            kinds("a + b * c == d && !e || f <= g"),
            vec![
                TokenKind::Ident,
                TokenKind::Plus,
                TokenKind::Ident,
                TokenKind::Star,
                TokenKind::Ident,
                TokenKind::EqEq,
                TokenKind::Ident,
                TokenKind::AndAnd,
                TokenKind::Bang,
                TokenKind::Ident,
                TokenKind::OrOr,
                TokenKind::Ident,
                TokenKind::LtEq,
                TokenKind::Ident,
            ]
        );
    }

    #[test]
    fn test_lex_leftover_parameter_marker() {
        let tokens = lex("#0").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::ParamRef);
        assert_eq!(tokens[0].lexeme, "#0");
    }

    #[test]
    fn test_lex_spans() {
        let tokens = lex("  a.b").unwrap();
        assert_eq!(tokens[0].span.offset(), 2);
        assert_eq!(tokens[2].span.offset(), 4);
        assert_eq!(tokens[2].span.len(), 1);
    }

    #[test]
    fn test_lex_invalid_token() {
        let result = lex("a ? b : c");
        assert!(result.is_err());
    }

    #[test]
    fn test_lex_empty_input() {
        assert!(lex("").unwrap().is_empty());
        assert!(lex("   ").unwrap().is_empty());
    }
}
