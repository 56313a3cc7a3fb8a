use crate::{
    lexer::{Position, Token, TokenKind},
    parser::{ParseError, Parser},
    types::DataType,
};

/// A string literal. The payload has its escapes decoded and carries a
/// terminating NUL; the literal's type is `char*`.
#[derive(Debug, Clone, PartialEq)]
pub struct StrLit {
    pub value: String,
    pub info: DataType,
    pub position: Position,
}

impl StrLit {
    pub(crate) fn parse(p: &mut Parser) -> Result<StrLit, ParseError> {
        let token = p.expect(TokenKind::Str, "EXPR")?;
        let Token::Str { value, position } = token else {
            unreachable!()
        };

        Ok(StrLit {
            value,
            info: DataType::CHAR.pointer_to(),
            position,
        })
    }
}
