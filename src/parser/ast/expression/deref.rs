use super::Expression;
use crate::{
    error::CompileError,
    lexer::{Position, TokenKind},
    parser::Parser,
    types::DataType,
};

/// One level of pointer dereference. `*`s stack: every star in the
/// source becomes one node, each peeling one pointer level off the
/// inner expression's type.
#[derive(Debug, Clone, PartialEq)]
pub struct Deref {
    pub expr: Expression,
    pub info: DataType,
    pub position: Position,
}

impl Deref {
    /// Parse `'*'+ val`, wrapping the value in one node per star.
    pub(crate) fn parse(p: &mut Parser) -> Result<Expression, CompileError> {
        let position = p.position();

        let mut stars = 0;
        while p.peek_kind() == Some(TokenKind::Star) {
            p.next();
            stars += 1;
        }

        let mut expr = Expression::parse_val(p)?;

        for _ in 0..stars {
            let info = expr.info().deref(1, position.0)?;
            expr = Expression::Deref(Box::new(Deref {
                expr,
                info,
                position,
            }));
        }

        Ok(expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        lexer::Lexer,
        symbols::{Symbol, SymbolTable},
    };

    fn parse_deref(source: &str, pointer_level: usize) -> Expression {
        let tokens = Lexer::new(source).lex().unwrap();
        let mut symbols = SymbolTable::with_builtins();
        let mut data_type = DataType::INT;
        for _ in 0..pointer_level {
            data_type = data_type.pointer_to();
        }
        symbols
            .add(
                Symbol::Variable {
                    name: "p".to_string(),
                    data_type,
                },
                1,
            )
            .unwrap();
        let mut parser = Parser::new(tokens, &mut symbols);
        Deref::parse(&mut parser).unwrap()
    }

    #[test]
    fn test_single_deref_peels_one_level() {
        let expr = parse_deref("*p", 1);
        assert_eq!(expr.info(), DataType::INT);
    }

    #[test]
    fn test_full_deref_of_nested_pointer_is_primitive() {
        let expr = parse_deref("**p", 2);
        assert_eq!(expr.info(), DataType::INT);

        let Expression::Deref(outer) = expr else {
            panic!("expected a dereference node");
        };
        assert_eq!(outer.expr.info(), DataType::INT.pointer_to());
    }

    #[test]
    fn test_over_deref_is_fatal() {
        let tokens = Lexer::new("**p").lex().unwrap();
        let mut symbols = SymbolTable::with_builtins();
        symbols
            .add(
                Symbol::Variable {
                    name: "p".to_string(),
                    data_type: DataType::INT.pointer_to(),
                },
                1,
            )
            .unwrap();
        let mut parser = Parser::new(tokens, &mut symbols);
        assert!(Deref::parse(&mut parser).is_err());
    }
}
