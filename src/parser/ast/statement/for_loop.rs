use super::{parse_block, Statement};
use crate::{
    error::CompileError,
    lexer::{Position, TokenKind},
    parser::{
        ast::{Assignment, Expression},
        ParseError, Parser,
    },
};

/// `for '(' stmt expr ';' assign? ')' block`. The init clause is a
/// full statement (it consumes its own `;`), the update clause is an
/// optional assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct ForLoop {
    pub init: Box<Statement>,
    pub condition: Expression,
    pub update: Option<Assignment>,
    pub block: Vec<Statement>,
    pub position: Position,
}

impl ForLoop {
    pub(crate) fn parse(p: &mut Parser) -> Result<ForLoop, CompileError> {
        let position = p.position();

        p.expect(TokenKind::ForKeyword, "STMT")?;
        p.expect(TokenKind::LParen, "STMT")?;

        let init = Statement::parse(p)?;

        let condition = Expression::parse(p)?;
        if condition.info().is_void() {
            return Err(ParseError::stmt("condition cannot be 'void'", position.0).into());
        }
        p.expect(TokenKind::Semicolon, "STMT")?;

        let update = if p.peek_kind() == Some(TokenKind::RParen) {
            None
        } else {
            Some(Assignment::parse(p)?)
        };

        p.expect(TokenKind::RParen, "STMT")?;

        p.enter_loop();
        let block = parse_block(p);
        p.exit_loop();

        Ok(ForLoop {
            init: Box::new(init),
            condition,
            update,
            block: block?,
            position,
        })
    }
}
