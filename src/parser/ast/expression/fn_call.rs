use super::Expression;
use crate::{
    error::CompileError,
    lexer::{Position, TokenKind},
    parser::{ParseError, Parser},
    symbols::Symbol,
    types::DataType,
};

/// A call to a declared function. Arity and argument types are checked
/// against the callee's formals at parse time.
#[derive(Debug, Clone, PartialEq)]
pub struct FnCall {
    pub name: String,
    pub symbol: usize,
    pub args: Vec<Expression>,
    pub info: DataType,
    pub position: Position,
}

impl FnCall {
    pub(crate) fn parse(p: &mut Parser) -> Result<FnCall, CompileError> {
        let position = p.position();
        let name = p.expect_identifier("EXPR")?;

        let Some(symbol) = p.symbols.find(&name) else {
            return Err(ParseError::expr(
                format!("call to undefined function '{name}'"),
                position.0,
            )
            .into());
        };

        let Symbol::Function {
            return_type, args: formals, ..
        } = p.symbols.get(symbol).clone()
        else {
            return Err(ParseError::expr(
                format!("'{name}' is not a function"),
                position.0,
            )
            .into());
        };

        p.expect(TokenKind::LParen, "EXPR")?;

        let mut args = vec![];
        if p.peek_kind() != Some(TokenKind::RParen) {
            loop {
                args.push(Expression::parse(p)?);
                if p.peek_kind() != Some(TokenKind::Comma) {
                    break;
                }
                p.next();
            }
        }

        p.expect(TokenKind::RParen, "EXPR")?;

        if args.len() != formals.len() {
            return Err(ParseError::expr(
                format!(
                    "'{name}' expects {} argument(s) but got {}",
                    formals.len(),
                    args.len()
                ),
                position.0,
            )
            .into());
        }

        for (arg, formal) in args.iter().zip(formals.iter()) {
            DataType::check_assign(&formal.data_type, &arg.info(), position.0)?;
        }

        Ok(FnCall {
            name,
            symbol,
            args,
            info: return_type,
            position,
        })
    }
}
