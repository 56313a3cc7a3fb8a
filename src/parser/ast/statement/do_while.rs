use super::{parse_block, Statement};
use crate::{
    error::CompileError,
    lexer::{Position, TokenKind},
    parser::{ast::Expression, ParseError, Parser},
};

/// `do block while '(' expr ')' ';'`
#[derive(Debug, Clone, PartialEq)]
pub struct DoWhileLoop {
    pub block: Vec<Statement>,
    pub condition: Expression,
    pub position: Position,
}

impl DoWhileLoop {
    pub(crate) fn parse(p: &mut Parser) -> Result<DoWhileLoop, CompileError> {
        let position = p.position();

        p.expect(TokenKind::DoKeyword, "STMT")?;

        p.enter_loop();
        let block = parse_block(p);
        p.exit_loop();

        p.expect(TokenKind::WhileKeyword, "STMT")?;
        p.expect(TokenKind::LParen, "STMT")?;
        let condition = Expression::parse(p)?;
        if condition.info().is_void() {
            return Err(ParseError::stmt("condition cannot be 'void'", position.0).into());
        }
        p.expect(TokenKind::RParen, "STMT")?;
        p.expect(TokenKind::Semicolon, "STMT")?;

        Ok(DoWhileLoop {
            block: block?,
            condition,
            position,
        })
    }
}
