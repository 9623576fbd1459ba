//! Lexer for circuit-construction scripts.

use logos::Logos;

/// Tokens for the script language.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t]+")]
#[logos(skip r"#[^\n]*")]
#[logos(skip r"\\\r?\n")]
pub enum Token {
    // Keywords
    #[token("import")]
    Import,

    #[token("from")]
    From,

    #[token("as")]
    As,

    // Literals
    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    FloatLiteral(f64),

    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    IntLiteral(i64),

    #[regex(r#""[^"\n]*""#, |lex| {
        let s = lex.slice();
        Some(s[1..s.len()-1].to_string())
    })]
    #[regex(r"'[^'\n]*'", |lex| {
        let s = lex.slice();
        Some(s[1..s.len()-1].to_string())
    })]
    StringLiteral(String),

    // Identifiers
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    // Punctuation
    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token(",")]
    Comma,

    #[token(":")]
    Colon,

    #[token(".")]
    Dot,

    #[token("=")]
    Assign,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[regex(r"\r?\n")]
    Newline,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Import => write!(f, "import"),
            Token::From => write!(f, "from"),
            Token::As => write!(f, "as"),
            Token::FloatLiteral(v) => write!(f, "{v}"),
            Token::IntLiteral(v) => write!(f, "{v}"),
            Token::StringLiteral(s) => write!(f, "\"{s}\""),
            Token::Identifier(s) => write!(f, "{s}"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::Comma => write!(f, ","),
            Token::Colon => write!(f, ":"),
            Token::Dot => write!(f, "."),
            Token::Assign => write!(f, "="),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Newline => write!(f, "newline"),
        }
    }
}

/// A token together with the 1-based source line it starts on.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub line: u32,
}

/// Tokenize a source string.
///
/// Newline tokens are kept only at bracket depth zero, so expressions may
/// continue across lines inside `()`, `[]` and `{}` the way the scripts
/// being analyzed expect. Returns the token stream or the first lexical
/// error as `(line, offending slice)`.
pub fn tokenize(source: &str) -> Result<Vec<SpannedToken>, (u32, String)> {
    let mut tokens = Vec::new();
    let mut line: u32 = 1;
    let mut scanned: usize = 0;
    let mut depth: usize = 0;

    for (result, span) in Token::lexer(source).spanned() {
        // Count the newlines in everything (tokens and skipped trivia)
        // between the previous token start and this one.
        line += source[scanned..span.start]
            .bytes()
            .filter(|&b| b == b'\n')
            .count() as u32;
        scanned = span.start;

        let token = match result {
            Ok(t) => t,
            Err(()) => return Err((line, source[span].to_string())),
        };

        match &token {
            Token::Newline if depth > 0 => continue,
            Token::LParen | Token::LBracket | Token::LBrace => depth += 1,
            Token::RParen | Token::RBracket | Token::RBrace => {
                depth = depth.saturating_sub(1);
            }
            _ => {}
        }

        tokens.push(SpannedToken { token, line });
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            kinds("42 2.5 \"mqvector\" 'x'"),
            vec![
                Token::IntLiteral(42),
                Token::FloatLiteral(2.5),
                Token::StringLiteral("mqvector".into()),
                Token::StringLiteral("x".into()),
            ]
        );
    }

    #[test]
    fn test_comments_skipped() {
        assert_eq!(
            kinds("x = 1  # trailing comment"),
            vec![
                Token::Identifier("x".into()),
                Token::Assign,
                Token::IntLiteral(1),
            ]
        );
    }

    #[test]
    fn test_newlines_tracked() {
        let tokens = tokenize("a\nb\n").unwrap();
        let a = &tokens[0];
        let b = &tokens[2];
        assert_eq!(a.line, 1);
        assert_eq!(b.line, 2);
    }

    #[test]
    fn test_newlines_swallowed_inside_brackets() {
        let tokens = kinds("f(\n1,\n2)");
        assert!(!tokens.contains(&Token::Newline));
        assert_eq!(tokens.len(), 6);
    }

    #[test]
    fn test_lexer_error_reports_line() {
        let err = tokenize("ok\nbad ?").unwrap_err();
        assert_eq!(err.0, 2);
        assert_eq!(err.1, "?");
    }

    #[test]
    fn test_chain_tokens() {
        let tokens = kinds("Circuit().h(0).x(1)");
        assert_eq!(tokens[0], Token::Identifier("Circuit".into()));
        assert_eq!(tokens[3], Token::Dot);
        assert_eq!(tokens[4], Token::Identifier("h".into()));
    }
}
