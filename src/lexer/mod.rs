//! Scanner for the language. Converts source text into a flat token
//! vector; the [`Tokens`] stream then gives the parser its lookahead
//! window.

mod lexmap;
mod token;
mod tokens;

pub use lexmap::*;
pub use token::*;
pub use tokens::*;

use once_cell::sync::Lazy;
use std::{error::Error, fmt::Display, iter::Peekable, str::Chars};

macro_rules! terminal {
    ($map:ident, $name:ident, $value:expr) => {
        $map.insert($value, TokenKind::$name);
    };
}

static LEX_MAP: Lazy<LexMap> = Lazy::new(|| {
    let mut m = LexMap::default();

    terminal!(m, Semicolon, ";");
    terminal!(m, Comma, ",");
    terminal!(m, LParen, "(");
    terminal!(m, RParen, ")");
    terminal!(m, LBrace, "{");
    terminal!(m, RBrace, "}");
    terminal!(m, LBracket, "[");
    terminal!(m, RBracket, "]");
    terminal!(m, Assign, "=");
    terminal!(m, Star, "*");
    terminal!(m, Ampersand, "&");
    terminal!(m, Plus, "+");
    terminal!(m, Minus, "-");
    terminal!(m, Slash, "/");
    terminal!(m, GreaterThan, ">");
    terminal!(m, GreaterOrEqual, ">=");
    terminal!(m, LessThan, "<");
    terminal!(m, LessOrEqual, "<=");
    terminal!(m, Equal, "==");
    terminal!(m, NotEqual, "!=");
    terminal!(m, IntKeyword, "int");
    terminal!(m, CharKeyword, "char");
    terminal!(m, VoidKeyword, "void");
    terminal!(m, LongKeyword, "long");
    terminal!(m, IfKeyword, "if");
    terminal!(m, ElseKeyword, "else");
    terminal!(m, WhileKeyword, "while");
    terminal!(m, DoKeyword, "do");
    terminal!(m, ForKeyword, "for");
    terminal!(m, BreakKeyword, "break");
    terminal!(m, ReturnKeyword, "return");

    m
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub message: String,
    pub line: usize,
}

impl LexError {
    fn new(message: impl ToString, line: usize) -> Self {
        Self {
            message: message.to_string(),
            line,
        }
    }
}

impl Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[SCANNER] line {}: {}", self.line, self.message)
    }
}

impl Error for LexError {}

pub type LexResult<T> = Result<T, LexError>;

#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    tokens: Vec<Token>,
    iterator: Peekable<Chars<'a>>,
    line: usize,
    col: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        let iterator = input.chars().peekable();

        Self {
            tokens: vec![],
            iterator,
            line: 1,
            col: 1,
        }
    }

    fn peek(&mut self) -> Option<&char> {
        self.iterator.peek()
    }

    fn next(&mut self) -> Option<char> {
        let next = self.iterator.next();
        match next {
            Some('\n') => {
                self.col = 1;
                self.line += 1;
            }
            Some(_) => self.col += 1,
            None => {}
        }
        next
    }

    fn next_if(&mut self, func: impl FnOnce(&char) -> bool) -> Option<char> {
        if self.iterator.peek().is_some_and(|item| func(item)) {
            self.next()
        } else {
            None
        }
    }

    fn eat_whitespace(&mut self) {
        while self.next_if(|item| item.is_whitespace()).is_some() {}
    }

    pub fn lex(mut self) -> LexResult<Vec<Token>> {
        loop {
            self.eat_whitespace();

            let Some(next) = self.peek() else {
                return Ok(self.tokens);
            };

            match next {
                'a'..='z' | 'A'..='Z' | '_' => self.lex_alphanumeric()?,
                '0'..='9' => self.lex_numeric()?,
                '"' => self.lex_string()?,
                _ => self.lex_special()?,
            };
        }
    }

    fn lex_special(&mut self) -> LexResult<()> {
        let mut stack = vec![];

        let position = (self.line, self.col);

        while let Some(next) = self.next() {
            stack.push(next);

            let read = stack.iter().collect::<String>();

            let can_read_next = self
                .peek()
                .map(|item| {
                    let mut probe = stack.clone();
                    probe.push(*item);
                    let probe = probe.iter().collect::<String>();
                    LEX_MAP.can_match(probe.as_str())
                })
                .unwrap_or(false);

            if can_read_next {
                continue;
            }

            let Some(kind) = LEX_MAP.get(read.as_str()) else {
                return Err(LexError::new(
                    format!("unknown or truncated token '{read}'"),
                    position.0,
                ));
            };

            self.tokens.push(kind.to_token(position));
            return Ok(());
        }

        Ok(())
    }

    fn lex_alphanumeric(&mut self) -> LexResult<()> {
        let mut stack = vec![];

        let position = (self.line, self.col);

        while let Some(next) = self.next_if(|item| item.is_ascii_alphanumeric() || *item == '_') {
            stack.push(next);
        }

        let read = stack.iter().collect::<String>();

        if let Some(kind) = LEX_MAP.get(read.as_str()) {
            self.tokens.push(kind.to_token(position));
        } else {
            self.tokens.push(Token::Id {
                value: read,
                position,
            });
        }

        Ok(())
    }

    fn lex_numeric(&mut self) -> LexResult<()> {
        let mut stack = vec![];

        let position = (self.line, self.col);

        while let Some(next) = self.next_if(|item| item.is_ascii_digit()) {
            stack.push(next);
        }

        let read = stack.iter().collect::<String>();

        let value = read
            .parse::<u64>()
            .map_err(|_| LexError::new(format!("integer literal '{read}' out of range"), position.0))?;

        self.tokens.push(Token::Num { value, position });

        Ok(())
    }

    /// Scan a double-quoted string literal. Escapes are decoded here and
    /// the stored payload carries a terminating NUL.
    fn lex_string(&mut self) -> LexResult<()> {
        let position = (self.line, self.col);

        self.next();

        let mut value = String::new();

        loop {
            let Some(next) = self.next() else {
                return Err(LexError::new("unterminated string literal", position.0));
            };

            match next {
                '"' => break,
                '\n' => {
                    return Err(LexError::new("unterminated string literal", position.0));
                }
                '\\' => {
                    let Some(escaped) = self.next() else {
                        return Err(LexError::new("unterminated string literal", position.0));
                    };
                    match escaped {
                        '\\' => value.push('\\'),
                        '"' => value.push('"'),
                        'n' => value.push('\n'),
                        't' => value.push('\t'),
                        '0' => value.push('\0'),
                        other => {
                            return Err(LexError::new(
                                format!("unknown escape sequence '\\{other}'"),
                                position.0,
                            ));
                        }
                    }
                }
                other => value.push(other),
            }
        }

        value.push('\0');
        self.tokens.push(Token::Str { value, position });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input)
            .lex()
            .unwrap()
            .iter()
            .map(|token| token.kind())
            .collect()
    }

    #[test]
    fn test_lex_identifier() {
        let tokens = Lexer::new("counter").lex().unwrap();

        assert_eq!(
            tokens,
            vec![Token::Id {
                value: "counter".into(),
                position: (1, 1),
            }]
        );
    }

    #[test]
    fn test_lex_numeric() {
        let tokens = Lexer::new("1337").lex().unwrap();

        assert_eq!(
            tokens,
            vec![Token::Num {
                value: 1337,
                position: (1, 1),
            }]
        );
    }

    #[test]
    fn test_lex_keywords() {
        assert_eq!(
            kinds("int char void long if else while do for break return"),
            vec![
                TokenKind::IntKeyword,
                TokenKind::CharKeyword,
                TokenKind::VoidKeyword,
                TokenKind::LongKeyword,
                TokenKind::IfKeyword,
                TokenKind::ElseKeyword,
                TokenKind::WhileKeyword,
                TokenKind::DoKeyword,
                TokenKind::ForKeyword,
                TokenKind::BreakKeyword,
                TokenKind::ReturnKeyword,
            ]
        );
    }

    #[test]
    fn test_lex_declaration() {
        assert_eq!(
            kinds("int* p;"),
            vec![
                TokenKind::IntKeyword,
                TokenKind::Star,
                TokenKind::Id,
                TokenKind::Semicolon,
            ]
        );
    }

    #[test]
    fn test_lex_multi_char_operators() {
        assert_eq!(
            kinds("a >= b <= c == d != e > f < g"),
            vec![
                TokenKind::Id,
                TokenKind::GreaterOrEqual,
                TokenKind::Id,
                TokenKind::LessOrEqual,
                TokenKind::Id,
                TokenKind::Equal,
                TokenKind::Id,
                TokenKind::NotEqual,
                TokenKind::Id,
                TokenKind::GreaterThan,
                TokenKind::Id,
                TokenKind::LessThan,
                TokenKind::Id,
            ]
        );
    }

    #[test]
    fn test_assignment_vs_equality() {
        assert_eq!(
            kinds("x = y == z"),
            vec![
                TokenKind::Id,
                TokenKind::Assign,
                TokenKind::Id,
                TokenKind::Equal,
                TokenKind::Id,
            ]
        );
    }

    #[test]
    fn test_lone_bang_is_fatal() {
        let err = Lexer::new("a ! b").lex().unwrap_err();
        assert!(err.to_string().starts_with("[SCANNER] line 1"));
    }

    #[test]
    fn test_unknown_character_is_fatal() {
        assert!(Lexer::new("a ~ b").lex().is_err());
    }

    #[test]
    fn test_line_tracking() {
        let tokens = Lexer::new("int x;\nint y;").lex().unwrap();
        assert_eq!(tokens[0].position(), (1, 1));
        assert_eq!(tokens[3].position(), (2, 1));
        assert_eq!(tokens[4].position(), (2, 5));
    }

    #[test]
    fn test_string_escapes() {
        let tokens = Lexer::new(r#""AB\n\t\"\\\0C""#).lex().unwrap();
        assert_eq!(
            tokens,
            vec![Token::Str {
                value: "AB\n\t\"\\\0C\0".into(),
                position: (1, 1),
            }]
        );
    }

    #[test]
    fn test_string_carries_terminating_nul() {
        let tokens = Lexer::new("\"hi\"").lex().unwrap();
        let Token::Str { value, .. } = &tokens[0] else {
            panic!("expected a string token");
        };
        assert_eq!(value.as_bytes(), b"hi\0");
    }

    #[test]
    fn test_unterminated_string_is_fatal() {
        assert!(Lexer::new("\"abc").lex().is_err());
        assert!(Lexer::new("\"abc\ndef\"").lex().is_err());
    }

    #[test]
    fn test_negative_literal_not_lexed_as_number() {
        assert_eq!(
            kinds("0 - 5"),
            vec![TokenKind::Num, TokenKind::Minus, TokenKind::Num]
        );
    }

    #[test]
    fn test_pretty_printed_stream_relexes_to_same_kinds() {
        let source =
            "int add(int a) { return a + 1; } void main() { char s[4]; print_str(\"a\\nb\"); }";
        let tokens = Lexer::new(source).lex().unwrap();

        let printed = tokens
            .iter()
            .map(|token| token.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        let relexed = Lexer::new(&printed).lex().unwrap();

        assert_eq!(
            tokens.iter().map(|t| t.kind()).collect::<Vec<_>>(),
            relexed.iter().map(|t| t.kind()).collect::<Vec<_>>()
        );
    }
}
