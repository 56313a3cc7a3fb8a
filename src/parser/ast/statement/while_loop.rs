use super::{parse_block, Statement};
use crate::{
    error::CompileError,
    lexer::{Position, TokenKind},
    parser::{ast::Expression, ParseError, Parser},
};

/// `while '(' expr ')' block`
#[derive(Debug, Clone, PartialEq)]
pub struct WhileLoop {
    pub condition: Expression,
    pub block: Vec<Statement>,
    pub position: Position,
}

impl WhileLoop {
    pub(crate) fn parse(p: &mut Parser) -> Result<WhileLoop, CompileError> {
        let position = p.position();

        p.expect(TokenKind::WhileKeyword, "STMT")?;
        p.expect(TokenKind::LParen, "STMT")?;
        let condition = Expression::parse(p)?;
        if condition.info().is_void() {
            return Err(ParseError::stmt("condition cannot be 'void'", position.0).into());
        }
        p.expect(TokenKind::RParen, "STMT")?;

        p.enter_loop();
        let block = parse_block(p);
        p.exit_loop();

        Ok(WhileLoop {
            condition,
            block: block?,
            position,
        })
    }
}
