use crate::{
    lexer::{Position, Token, TokenKind},
    parser::{ParseError, Parser},
    types::DataType,
};

/// An unsigned decimal integer literal. Literals below 256 fit a
/// `char`; everything else is an `int`.
#[derive(Debug, Clone, PartialEq)]
pub struct Integer {
    pub value: u64,
    pub info: DataType,
    pub position: Position,
}

impl Integer {
    pub(crate) fn parse(p: &mut Parser) -> Result<Integer, ParseError> {
        let token = p.expect(TokenKind::Num, "EXPR")?;
        let Token::Num { value, position } = token else {
            unreachable!()
        };

        Ok(Integer {
            value,
            info: if value < 256 {
                DataType::CHAR
            } else {
                DataType::INT
            },
            position,
        })
    }
}
