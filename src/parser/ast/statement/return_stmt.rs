use crate::{
    error::CompileError,
    lexer::{Position, TokenKind},
    parser::{ast::Expression, ParseError, Parser},
    types::DataType,
};

/// `return expr? ';'`. The operand must be assignable to the
/// enclosing function's return type; a `void` function returns bare.
#[derive(Debug, Clone, PartialEq)]
pub struct Return {
    pub value: Option<Expression>,
    pub function: usize,
    pub position: Position,
}

impl Return {
    pub(crate) fn parse(p: &mut Parser) -> Result<Return, CompileError> {
        let position = p.position();
        let line = position.0;

        p.expect(TokenKind::ReturnKeyword, "STMT")?;

        let Some(function) = p.current_function() else {
            return Err(ParseError::stmt("'return' outside of a function", line).into());
        };
        let return_type = p.symbols.get(function).data_type();

        if p.peek_kind() == Some(TokenKind::Semicolon) {
            p.next();

            if !return_type.is_void() {
                return Err(ParseError::stmt(
                    format!(
                        "function '{}' must return a value of type '{return_type}'",
                        p.symbols.get(function).name()
                    ),
                    line,
                )
                .into());
            }

            return Ok(Return {
                value: None,
                function,
                position,
            });
        }

        if return_type.is_void() {
            return Err(ParseError::stmt(
                format!(
                    "void function '{}' cannot return a value",
                    p.symbols.get(function).name()
                ),
                line,
            )
            .into());
        }

        let value = Expression::parse(p)?;
        DataType::check_assign(&return_type, &value.info(), line)?;
        p.expect(TokenKind::Semicolon, "STMT")?;

        Ok(Return {
            value: Some(value),
            function,
            position,
        })
    }
}
