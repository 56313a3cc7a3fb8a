use std::fmt::Display;

/// A position within the source text (line, column).
pub type Position = (usize, usize);

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Semicolon { position: Position },
    Comma { position: Position },
    LParen { position: Position },
    RParen { position: Position },
    LBrace { position: Position },
    RBrace { position: Position },
    LBracket { position: Position },
    RBracket { position: Position },
    Assign { position: Position },
    Star { position: Position },
    Ampersand { position: Position },
    Plus { position: Position },
    Minus { position: Position },
    Slash { position: Position },
    GreaterThan { position: Position },
    GreaterOrEqual { position: Position },
    LessThan { position: Position },
    LessOrEqual { position: Position },
    Equal { position: Position },
    NotEqual { position: Position },
    Num { value: u64, position: Position },
    Str { value: String, position: Position },
    Id { value: String, position: Position },
    IntKeyword { position: Position },
    CharKeyword { position: Position },
    VoidKeyword { position: Position },
    LongKeyword { position: Position },
    IfKeyword { position: Position },
    ElseKeyword { position: Position },
    WhileKeyword { position: Position },
    DoKeyword { position: Position },
    ForKeyword { position: Position },
    BreakKeyword { position: Position },
    ReturnKeyword { position: Position },
}

/// The bare kind of a token, without payload or position. Used for
/// lookahead decisions and expected-token diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Semicolon,
    Comma,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Assign,
    Star,
    Ampersand,
    Plus,
    Minus,
    Slash,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    Equal,
    NotEqual,
    Num,
    Str,
    Id,
    IntKeyword,
    CharKeyword,
    VoidKeyword,
    LongKeyword,
    IfKeyword,
    ElseKeyword,
    WhileKeyword,
    DoKeyword,
    ForKeyword,
    BreakKeyword,
    ReturnKeyword,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TokenKind::Semicolon => "';'",
            TokenKind::Comma => "','",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Assign => "'='",
            TokenKind::Star => "'*'",
            TokenKind::Ampersand => "'&'",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Slash => "'/'",
            TokenKind::GreaterThan => "'>'",
            TokenKind::GreaterOrEqual => "'>='",
            TokenKind::LessThan => "'<'",
            TokenKind::LessOrEqual => "'<='",
            TokenKind::Equal => "'=='",
            TokenKind::NotEqual => "'!='",
            TokenKind::Num => "integer literal",
            TokenKind::Str => "string literal",
            TokenKind::Id => "identifier",
            TokenKind::IntKeyword => "'int'",
            TokenKind::CharKeyword => "'char'",
            TokenKind::VoidKeyword => "'void'",
            TokenKind::LongKeyword => "'long'",
            TokenKind::IfKeyword => "'if'",
            TokenKind::ElseKeyword => "'else'",
            TokenKind::WhileKeyword => "'while'",
            TokenKind::DoKeyword => "'do'",
            TokenKind::ForKeyword => "'for'",
            TokenKind::BreakKeyword => "'break'",
            TokenKind::ReturnKeyword => "'return'",
        })
    }
}

impl TokenKind {
    /// Build the token for a payload-free terminal of this kind.
    pub fn to_token(self, position: Position) -> Token {
        match self {
            TokenKind::Semicolon => Token::Semicolon { position },
            TokenKind::Comma => Token::Comma { position },
            TokenKind::LParen => Token::LParen { position },
            TokenKind::RParen => Token::RParen { position },
            TokenKind::LBrace => Token::LBrace { position },
            TokenKind::RBrace => Token::RBrace { position },
            TokenKind::LBracket => Token::LBracket { position },
            TokenKind::RBracket => Token::RBracket { position },
            TokenKind::Assign => Token::Assign { position },
            TokenKind::Star => Token::Star { position },
            TokenKind::Ampersand => Token::Ampersand { position },
            TokenKind::Plus => Token::Plus { position },
            TokenKind::Minus => Token::Minus { position },
            TokenKind::Slash => Token::Slash { position },
            TokenKind::GreaterThan => Token::GreaterThan { position },
            TokenKind::GreaterOrEqual => Token::GreaterOrEqual { position },
            TokenKind::LessThan => Token::LessThan { position },
            TokenKind::LessOrEqual => Token::LessOrEqual { position },
            TokenKind::Equal => Token::Equal { position },
            TokenKind::NotEqual => Token::NotEqual { position },
            TokenKind::IntKeyword => Token::IntKeyword { position },
            TokenKind::CharKeyword => Token::CharKeyword { position },
            TokenKind::VoidKeyword => Token::VoidKeyword { position },
            TokenKind::LongKeyword => Token::LongKeyword { position },
            TokenKind::IfKeyword => Token::IfKeyword { position },
            TokenKind::ElseKeyword => Token::ElseKeyword { position },
            TokenKind::WhileKeyword => Token::WhileKeyword { position },
            TokenKind::DoKeyword => Token::DoKeyword { position },
            TokenKind::ForKeyword => Token::ForKeyword { position },
            TokenKind::BreakKeyword => Token::BreakKeyword { position },
            TokenKind::ReturnKeyword => Token::ReturnKeyword { position },
            TokenKind::Num | TokenKind::Str | TokenKind::Id => {
                unreachable!("token kind {self:?} carries a payload")
            }
        }
    }

    /// Whether this kind starts a type in a declaration.
    pub fn is_type_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::IntKeyword
                | TokenKind::CharKeyword
                | TokenKind::VoidKeyword
                | TokenKind::LongKeyword
        )
    }
}

impl Display for Token {
    /// The source spelling of this token. Lexing the printed form of a
    /// token stream yields the same kinds in the same order.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Semicolon { .. } => f.write_str(";"),
            Token::Comma { .. } => f.write_str(","),
            Token::LParen { .. } => f.write_str("("),
            Token::RParen { .. } => f.write_str(")"),
            Token::LBrace { .. } => f.write_str("{"),
            Token::RBrace { .. } => f.write_str("}"),
            Token::LBracket { .. } => f.write_str("["),
            Token::RBracket { .. } => f.write_str("]"),
            Token::Assign { .. } => f.write_str("="),
            Token::Star { .. } => f.write_str("*"),
            Token::Ampersand { .. } => f.write_str("&"),
            Token::Plus { .. } => f.write_str("+"),
            Token::Minus { .. } => f.write_str("-"),
            Token::Slash { .. } => f.write_str("/"),
            Token::GreaterThan { .. } => f.write_str(">"),
            Token::GreaterOrEqual { .. } => f.write_str(">="),
            Token::LessThan { .. } => f.write_str("<"),
            Token::LessOrEqual { .. } => f.write_str("<="),
            Token::Equal { .. } => f.write_str("=="),
            Token::NotEqual { .. } => f.write_str("!="),
            Token::Num { value, .. } => write!(f, "{value}"),
            Token::Str { value, .. } => {
                f.write_str("\"")?;
                for c in value.trim_end_matches('\0').chars() {
                    match c {
                        '\\' => f.write_str("\\\\")?,
                        '"' => f.write_str("\\\"")?,
                        '\n' => f.write_str("\\n")?,
                        '\t' => f.write_str("\\t")?,
                        '\0' => f.write_str("\\0")?,
                        other => write!(f, "{other}")?,
                    }
                }
                f.write_str("\"")
            }
            Token::Id { value, .. } => f.write_str(value),
            Token::IntKeyword { .. } => f.write_str("int"),
            Token::CharKeyword { .. } => f.write_str("char"),
            Token::VoidKeyword { .. } => f.write_str("void"),
            Token::LongKeyword { .. } => f.write_str("long"),
            Token::IfKeyword { .. } => f.write_str("if"),
            Token::ElseKeyword { .. } => f.write_str("else"),
            Token::WhileKeyword { .. } => f.write_str("while"),
            Token::DoKeyword { .. } => f.write_str("do"),
            Token::ForKeyword { .. } => f.write_str("for"),
            Token::BreakKeyword { .. } => f.write_str("break"),
            Token::ReturnKeyword { .. } => f.write_str("return"),
        }
    }
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Semicolon { .. } => TokenKind::Semicolon,
            Token::Comma { .. } => TokenKind::Comma,
            Token::LParen { .. } => TokenKind::LParen,
            Token::RParen { .. } => TokenKind::RParen,
            Token::LBrace { .. } => TokenKind::LBrace,
            Token::RBrace { .. } => TokenKind::RBrace,
            Token::LBracket { .. } => TokenKind::LBracket,
            Token::RBracket { .. } => TokenKind::RBracket,
            Token::Assign { .. } => TokenKind::Assign,
            Token::Star { .. } => TokenKind::Star,
            Token::Ampersand { .. } => TokenKind::Ampersand,
            Token::Plus { .. } => TokenKind::Plus,
            Token::Minus { .. } => TokenKind::Minus,
            Token::Slash { .. } => TokenKind::Slash,
            Token::GreaterThan { .. } => TokenKind::GreaterThan,
            Token::GreaterOrEqual { .. } => TokenKind::GreaterOrEqual,
            Token::LessThan { .. } => TokenKind::LessThan,
            Token::LessOrEqual { .. } => TokenKind::LessOrEqual,
            Token::Equal { .. } => TokenKind::Equal,
            Token::NotEqual { .. } => TokenKind::NotEqual,
            Token::Num { .. } => TokenKind::Num,
            Token::Str { .. } => TokenKind::Str,
            Token::Id { .. } => TokenKind::Id,
            Token::IntKeyword { .. } => TokenKind::IntKeyword,
            Token::CharKeyword { .. } => TokenKind::CharKeyword,
            Token::VoidKeyword { .. } => TokenKind::VoidKeyword,
            Token::LongKeyword { .. } => TokenKind::LongKeyword,
            Token::IfKeyword { .. } => TokenKind::IfKeyword,
            Token::ElseKeyword { .. } => TokenKind::ElseKeyword,
            Token::WhileKeyword { .. } => TokenKind::WhileKeyword,
            Token::DoKeyword { .. } => TokenKind::DoKeyword,
            Token::ForKeyword { .. } => TokenKind::ForKeyword,
            Token::BreakKeyword { .. } => TokenKind::BreakKeyword,
            Token::ReturnKeyword { .. } => TokenKind::ReturnKeyword,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Token::Semicolon { position } => *position,
            Token::Comma { position } => *position,
            Token::LParen { position } => *position,
            Token::RParen { position } => *position,
            Token::LBrace { position } => *position,
            Token::RBrace { position } => *position,
            Token::LBracket { position } => *position,
            Token::RBracket { position } => *position,
            Token::Assign { position } => *position,
            Token::Star { position } => *position,
            Token::Ampersand { position } => *position,
            Token::Plus { position } => *position,
            Token::Minus { position } => *position,
            Token::Slash { position } => *position,
            Token::GreaterThan { position } => *position,
            Token::GreaterOrEqual { position } => *position,
            Token::LessThan { position } => *position,
            Token::LessOrEqual { position } => *position,
            Token::Equal { position } => *position,
            Token::NotEqual { position } => *position,
            Token::Num { position, .. } => *position,
            Token::Str { position, .. } => *position,
            Token::Id { position, .. } => *position,
            Token::IntKeyword { position } => *position,
            Token::CharKeyword { position } => *position,
            Token::VoidKeyword { position } => *position,
            Token::LongKeyword { position } => *position,
            Token::IfKeyword { position } => *position,
            Token::ElseKeyword { position } => *position,
            Token::WhileKeyword { position } => *position,
            Token::DoKeyword { position } => *position,
            Token::ForKeyword { position } => *position,
            Token::BreakKeyword { position } => *position,
            Token::ReturnKeyword { position } => *position,
        }
    }

    pub fn line(&self) -> usize {
        self.position().0
    }
}
