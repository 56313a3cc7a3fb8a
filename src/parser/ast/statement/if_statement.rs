use super::{parse_block, Statement};
use crate::{
    error::CompileError,
    lexer::{Position, TokenKind},
    parser::{ast::Expression, ParseError, Parser},
};

/// `if '(' expr ')' block ('else' block)?`
#[derive(Debug, Clone, PartialEq)]
pub struct If {
    pub condition: Expression,
    pub if_block: Vec<Statement>,
    pub else_block: Option<Vec<Statement>>,
    pub position: Position,
}

impl If {
    pub(crate) fn parse(p: &mut Parser) -> Result<If, CompileError> {
        let position = p.position();

        p.expect(TokenKind::IfKeyword, "STMT")?;
        p.expect(TokenKind::LParen, "STMT")?;
        let condition = Expression::parse(p)?;
        if condition.info().is_void() {
            return Err(ParseError::stmt("condition cannot be 'void'", position.0).into());
        }
        p.expect(TokenKind::RParen, "STMT")?;

        let if_block = parse_block(p)?;

        let else_block = if p.peek_kind() == Some(TokenKind::ElseKeyword) {
            p.next();
            Some(parse_block(p)?)
        } else {
            None
        };

        Ok(If {
            condition,
            if_block,
            else_block,
            position,
        })
    }
}
