use super::{parse_block, Statement};
use crate::{
    error::CompileError,
    lexer::{Position, TokenKind},
    parser::{ParseError, Parser},
    symbols::{FormalArg, Symbol},
    types::DataType,
};

/// `type ID '(' (type ID)? ')' block`: a function definition. The
/// formal argument, when present, gets static storage like every other
/// variable; the prologue stores the incoming `rdi` into it.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub name: String,
    pub symbol: usize,
    pub body: Vec<Statement>,
    pub position: Position,
}

impl FuncDecl {
    pub(crate) fn parse(
        p: &mut Parser,
        return_type: DataType,
        name: String,
        position: Position,
    ) -> Result<FuncDecl, CompileError> {
        let line = position.0;

        let symbol = p.symbols.add(
            Symbol::Function {
                name: name.clone(),
                return_type,
                args: vec![],
            },
            line,
        )?;

        p.expect(TokenKind::LParen, "DECL")?;

        if p.peek_kind() != Some(TokenKind::RParen) {
            let arg_type = p.parse_type("DECL")?;
            let arg_name = p.expect_identifier("DECL")?;

            if arg_type.is_void() {
                return Err(ParseError::decl(
                    format!("argument '{arg_name}' declared 'void'"),
                    line,
                )
                .into());
            }

            p.symbols.add(
                Symbol::Variable {
                    name: arg_name.clone(),
                    data_type: arg_type,
                },
                line,
            )?;
            p.symbols.add_formal(
                symbol,
                FormalArg {
                    name: arg_name,
                    data_type: arg_type,
                },
            );

            if p.peek_kind() == Some(TokenKind::Comma) {
                return Err(ParseError::decl(
                    format!("function '{name}' may take at most one argument"),
                    line,
                )
                .into());
            }
        }

        p.expect(TokenKind::RParen, "DECL")?;

        p.set_current_function(Some(symbol));
        let body = parse_block(p)?;
        p.set_current_function(None);

        Ok(FuncDecl {
            name,
            symbol,
            body,
            position,
        })
    }
}
