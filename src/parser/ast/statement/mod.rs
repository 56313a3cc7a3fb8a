mod break_stmt;
mod do_while;
mod for_loop;
mod func_decl;
mod if_statement;
mod return_stmt;
mod var_decl;
mod while_loop;

pub use self::break_stmt::*;
pub use self::do_while::*;
pub use self::for_loop::*;
pub use self::func_decl::*;
pub use self::if_statement::*;
pub use self::return_stmt::*;
pub use self::var_decl::*;
pub use self::while_loop::*;

use super::Expression;
use crate::{
    error::CompileError,
    lexer::TokenKind,
    parser::{ParseError, Parser},
};

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    VarDecl(VarDecl),
    FuncDecl(FuncDecl),
    Expression(Expression),
    If(If),
    While(WhileLoop),
    DoWhile(DoWhileLoop),
    For(ForLoop),
    Break(Break),
    Return(Return),
    Empty,
}

impl Statement {
    /// Parse one statement. A single-token peek selects the production.
    pub(crate) fn parse(p: &mut Parser) -> Result<Statement, CompileError> {
        let line = p.line();

        match p.peek_kind() {
            Some(TokenKind::Semicolon) => {
                p.next();
                Ok(Statement::Empty)
            }
            Some(TokenKind::IfKeyword) => Ok(Statement::If(If::parse(p)?)),
            Some(TokenKind::WhileKeyword) => Ok(Statement::While(WhileLoop::parse(p)?)),
            Some(TokenKind::DoKeyword) => Ok(Statement::DoWhile(DoWhileLoop::parse(p)?)),
            Some(TokenKind::ForKeyword) => Ok(Statement::For(ForLoop::parse(p)?)),
            Some(TokenKind::BreakKeyword) => Ok(Statement::Break(Break::parse(p)?)),
            Some(TokenKind::ReturnKeyword) => Ok(Statement::Return(Return::parse(p)?)),
            Some(TokenKind::Star) | Some(TokenKind::Id) => {
                let expression = Expression::parse(p)?;
                p.expect(TokenKind::Semicolon, "STMT")?;
                Ok(Statement::Expression(expression))
            }
            Some(kind) if kind.is_type_keyword() => {
                let position = p.position();
                let declared = p.parse_type("DECL")?;
                let name = p.expect_identifier("DECL")?;
                Ok(Statement::VarDecl(VarDecl::parse(
                    p, declared, name, position, false,
                )?))
            }
            Some(kind) => {
                Err(ParseError::stmt(format!("unexpected {kind} in a statement"), line).into())
            }
            None => Err(ParseError::stmt("unexpected end of input in a statement", line).into()),
        }
    }
}

/// `block := '{' stmt* '}' | stmt`: a braced statement sequence, or a
/// single statement.
pub(crate) fn parse_block(p: &mut Parser) -> Result<Vec<Statement>, CompileError> {
    if p.peek_kind() != Some(TokenKind::LBrace) {
        return Ok(vec![Statement::parse(p)?]);
    }

    p.next();

    let mut statements = vec![];
    loop {
        match p.peek_kind() {
            Some(TokenKind::RBrace) => {
                p.next();
                return Ok(statements);
            }
            Some(_) => statements.push(Statement::parse(p)?),
            None => {
                return Err(
                    ParseError::stmt("unterminated block, expected '}'", p.line()).into(),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexer::Lexer, symbols::SymbolTable};

    fn parse_block_source(source: &str) -> Result<Vec<Statement>, CompileError> {
        let tokens = Lexer::new(source).lex().unwrap();
        let mut symbols = SymbolTable::with_builtins();
        let mut parser = Parser::new(tokens, &mut symbols);
        parse_block(&mut parser)
    }

    #[test]
    fn test_braced_block_wraps_statement() {
        let block = parse_block_source("{ print(1); }").unwrap();
        assert_eq!(block.len(), 1);
        assert!(matches!(block[0], Statement::Expression(_)));
    }

    #[test]
    fn test_unbraced_block_is_single_statement() {
        let block = parse_block_source("print(1);").unwrap();
        assert_eq!(block.len(), 1);
    }

    #[test]
    fn test_empty_block() {
        assert!(parse_block_source("{ }").unwrap().is_empty());
    }

    #[test]
    fn test_empty_statement() {
        let block = parse_block_source("{ ; }").unwrap();
        assert_eq!(block, vec![Statement::Empty]);
    }

    #[test]
    fn test_unterminated_block_is_fatal() {
        let err = parse_block_source("{ print(1); ").unwrap_err();
        assert!(err.to_string().contains("unterminated block"));
    }
}
