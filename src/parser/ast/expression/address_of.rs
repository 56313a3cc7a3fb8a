use crate::{
    lexer::{Position, TokenKind},
    parser::{ParseError, Parser},
    types::DataType,
};

/// `&x`: the address of a variable. Its type is the pointer to the
/// variable's type.
#[derive(Debug, Clone, PartialEq)]
pub struct AddressOf {
    pub name: String,
    pub symbol: usize,
    pub info: DataType,
    pub position: Position,
}

impl AddressOf {
    pub(crate) fn parse(p: &mut Parser) -> Result<AddressOf, ParseError> {
        let position = p.position();
        p.expect(TokenKind::Ampersand, "EXPR")?;

        let name = p.expect_identifier("EXPR")?;

        let Some(symbol) = p.symbols.find(&name) else {
            return Err(ParseError::expr(
                format!("undefined identifier '{name}'"),
                position.0,
            ));
        };

        if p.symbols.get(symbol).is_function() {
            return Err(ParseError::expr(
                format!("cannot take the address of function '{name}'"),
                position.0,
            ));
        }

        Ok(AddressOf {
            name,
            symbol,
            info: p.symbols.get(symbol).data_type().pointer_to(),
            position,
        })
    }
}
