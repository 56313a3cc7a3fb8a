use super::{Expression, Ident};
use crate::{
    error::CompileError,
    lexer::{Position, TokenKind},
    parser::{ParseError, Parser},
    types::DataType,
};

/// `a[i]`: indexing into an array or pointer variable. The node's
/// type is the element type; code generation scales the index by the
/// element size and adds it to the variable's address.
#[derive(Debug, Clone, PartialEq)]
pub struct Indexing {
    pub ident: Ident,
    pub index: Expression,
    pub info: DataType,
    pub position: Position,
}

impl Indexing {
    pub(crate) fn parse(p: &mut Parser) -> Result<Indexing, CompileError> {
        let position = p.position();
        let ident = Ident::parse(p)?;

        if !ident.info.is_pointer() {
            return Err(ParseError::expr(
                format!("cannot index a value of type '{}'", ident.info),
                position.0,
            )
            .into());
        }

        p.expect(TokenKind::LBracket, "EXPR")?;
        let index = Expression::parse(p)?;
        p.expect(TokenKind::RBracket, "EXPR")?;

        if index.info().is_pointer() || index.info().is_void() {
            return Err(ParseError::expr(
                format!("invalid index of type '{}'", index.info()),
                position.0,
            )
            .into());
        }

        let info = ident.info.deref(1, position.0)?;

        Ok(Indexing {
            ident,
            index,
            info,
            position,
        })
    }
}
