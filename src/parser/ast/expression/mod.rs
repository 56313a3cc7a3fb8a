mod address_of;
mod assignment;
mod binary;
mod deref;
mod fn_call;
mod ident;
mod indexing;
mod integer;
mod scaled_offset;
mod string;

pub use self::address_of::*;
pub use self::assignment::*;
pub use self::binary::*;
pub use self::deref::*;
pub use self::fn_call::*;
pub use self::ident::*;
pub use self::indexing::*;
pub use self::integer::*;
pub use self::scaled_offset::*;
pub use self::string::*;

use crate::{
    error::CompileError,
    lexer::{Position, TokenKind},
    parser::{ParseError, Parser},
    types::DataType,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Integer(Integer),
    Str(StrLit),
    Ident(Ident),
    AddressOf(AddressOf),
    Deref(Box<Deref>),
    ScaledOffset(Box<ScaledOffset>),
    Indexing(Box<Indexing>),
    Binary(Box<BinaryExpr>),
    Assignment(Box<Assignment>),
    Call(FnCall),
}

impl Expression {
    /// The type this expression computes to.
    pub fn info(&self) -> DataType {
        match self {
            Expression::Integer(node) => node.info,
            Expression::Str(node) => node.info,
            Expression::Ident(node) => node.info,
            Expression::AddressOf(node) => node.info,
            Expression::Deref(node) => node.info,
            Expression::ScaledOffset(node) => node.info,
            Expression::Indexing(node) => node.info,
            Expression::Binary(node) => node.info,
            Expression::Assignment(node) => node.info,
            Expression::Call(node) => node.info,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Expression::Integer(node) => node.position,
            Expression::Str(node) => node.position,
            Expression::Ident(node) => node.position,
            Expression::AddressOf(node) => node.position,
            Expression::Deref(node) => node.position,
            Expression::ScaledOffset(node) => node.position,
            Expression::Indexing(node) => node.position,
            Expression::Binary(node) => node.position,
            Expression::Assignment(node) => node.position,
            Expression::Call(node) => node.position,
        }
    }

    /// Parse one expression. A bounded peek decides between an
    /// assignment and a comparison chain: an `=` seen before any
    /// terminator (`;`, `,`, `)`, end of input) means assignment.
    pub(crate) fn parse(p: &mut Parser) -> Result<Expression, CompileError> {
        let mut n = 0;
        loop {
            match p.peek_kind_at(n) {
                Some(TokenKind::Assign) => {
                    return Ok(Expression::Assignment(Box::new(Assignment::parse(p)?)));
                }
                Some(TokenKind::Semicolon)
                | Some(TokenKind::Comma)
                | Some(TokenKind::RParen)
                | None => return Self::parse_comparison(p),
                _ => n += 1,
            }
        }
    }

    /// `compare := additive (cmp-op additive)?`. The result of a
    /// comparison is a `char` holding 0 or 1.
    pub(crate) fn parse_comparison(p: &mut Parser) -> Result<Expression, CompileError> {
        let lhs = Self::parse_additive(p)?;

        let op = match p.peek_kind() {
            Some(TokenKind::Equal) => BinaryOp::Equal,
            Some(TokenKind::NotEqual) => BinaryOp::NotEqual,
            Some(TokenKind::GreaterThan) => BinaryOp::GreaterThan,
            Some(TokenKind::GreaterOrEqual) => BinaryOp::GreaterOrEqual,
            Some(TokenKind::LessThan) => BinaryOp::LessThan,
            Some(TokenKind::LessOrEqual) => BinaryOp::LessOrEqual,
            _ => return Ok(lhs),
        };

        let position = lhs.position();
        let line = p.line();
        p.next();

        let rhs = Self::parse_additive(p)?;
        DataType::unify_expr(&lhs.info(), &rhs.info(), line)?;

        Ok(Expression::Binary(Box::new(BinaryExpr {
            op,
            lhs,
            rhs,
            info: DataType::CHAR,
            position,
        })))
    }

    /// `additive := mult (('+'|'-') mult)*`, left-associative. When
    /// exactly one operand is a pointer, the other is scaled by the
    /// pointee size before the addition.
    pub(crate) fn parse_additive(p: &mut Parser) -> Result<Expression, CompileError> {
        let mut lhs = Self::parse_mult(p)?;

        loop {
            let op = match p.peek_kind() {
                Some(TokenKind::Plus) => BinaryOp::Add,
                Some(TokenKind::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };

            let position = lhs.position();
            let line = p.line();
            p.next();

            let rhs = Self::parse_mult(p)?;
            let (lhs_scaled, rhs_scaled, info) = ScaledOffset::rewrite(lhs, rhs, line)?;

            lhs = Expression::Binary(Box::new(BinaryExpr {
                op,
                lhs: lhs_scaled,
                rhs: rhs_scaled,
                info,
                position,
            }));
        }
    }

    /// `mult := val (('*'|'/') val)*`, left-associative. Pointers take
    /// no part in multiplication.
    pub(crate) fn parse_mult(p: &mut Parser) -> Result<Expression, CompileError> {
        let mut lhs = Self::parse_val(p)?;

        loop {
            let op = match p.peek_kind() {
                Some(TokenKind::Star) => BinaryOp::Mul,
                Some(TokenKind::Slash) => BinaryOp::Div,
                _ => return Ok(lhs),
            };

            let position = lhs.position();
            let line = p.line();
            p.next();

            let rhs = Self::parse_val(p)?;

            if lhs.info().is_pointer() || rhs.info().is_pointer() {
                return Err(ParseError::expr(
                    "pointers cannot be multiplied or divided",
                    line,
                )
                .into());
            }

            let info = DataType::unify_expr(&lhs.info(), &rhs.info(), line)?;

            lhs = Expression::Binary(Box::new(BinaryExpr {
                op,
                lhs,
                rhs,
                info,
                position,
            }));
        }
    }

    /// The value level of the grammar: literals, parenthesised
    /// expressions, address-of, dereference, identifiers, calls and
    /// indexing.
    pub(crate) fn parse_val(p: &mut Parser) -> Result<Expression, CompileError> {
        let line = p.line();

        match p.peek_kind() {
            Some(TokenKind::Num) => Ok(Expression::Integer(Integer::parse(p)?)),
            Some(TokenKind::Str) => Ok(Expression::Str(StrLit::parse(p)?)),
            Some(TokenKind::LParen) => {
                p.next();
                let inner = Expression::parse(p)?;
                p.expect(TokenKind::RParen, "EXPR")?;
                Ok(inner)
            }
            Some(TokenKind::Ampersand) => Ok(Expression::AddressOf(AddressOf::parse(p)?)),
            Some(TokenKind::Star) => Deref::parse(p),
            Some(TokenKind::Id) => match p.peek_kind_at(1) {
                Some(TokenKind::LParen) => Ok(Expression::Call(FnCall::parse(p)?)),
                Some(TokenKind::LBracket) => {
                    Ok(Expression::Indexing(Box::new(Indexing::parse(p)?)))
                }
                _ => Ok(Expression::Ident(Ident::parse(p)?)),
            },
            Some(kind) => Err(ParseError::expr(
                format!("unexpected {kind} in an expression"),
                line,
            )
            .into()),
            None => Err(ParseError::expr("unexpected end of input in an expression", line).into()),
        }
    }
}
