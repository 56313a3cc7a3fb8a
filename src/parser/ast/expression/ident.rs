use crate::{
    lexer::Position,
    parser::{ParseError, Parser},
    types::DataType,
};

/// A use of a variable. Resolved against the symbol table at parse
/// time; `symbol` is the variable's table index.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub symbol: usize,
    pub info: DataType,
    pub position: Position,
}

impl Ident {
    pub(crate) fn parse(p: &mut Parser) -> Result<Ident, ParseError> {
        let position = p.position();
        let name = p.expect_identifier("EXPR")?;

        let Some(symbol) = p.symbols.find(&name) else {
            return Err(ParseError::expr(
                format!("undefined identifier '{name}'"),
                position.0,
            ));
        };

        if p.symbols.get(symbol).is_function() {
            return Err(ParseError::expr(
                format!("function '{name}' used as a variable"),
                position.0,
            ));
        }

        Ok(Ident {
            name,
            symbol,
            info: p.symbols.get(symbol).data_type(),
            position,
        })
    }
}
