use super::{Deref, Expression, Ident, Indexing};
use crate::{
    error::CompileError,
    lexer::{Position, TokenKind},
    parser::{ParseError, Parser},
    types::DataType,
};

/// A storage location an assignment can write to: a variable, a
/// dereferenced pointer, or an indexed element.
#[derive(Debug, Clone, PartialEq)]
pub enum Lvalue {
    Variable(Ident),
    Deref(Deref),
    Indexing(Indexing),
}

impl Lvalue {
    /// The type of the location, which is also the assignment's type.
    pub fn info(&self) -> DataType {
        match self {
            Lvalue::Variable(ident) => ident.info,
            Lvalue::Deref(deref) => deref.info,
            Lvalue::Indexing(indexing) => indexing.info,
        }
    }

    fn parse(p: &mut Parser) -> Result<Lvalue, CompileError> {
        let position = p.position();

        match p.peek_kind() {
            Some(TokenKind::Star) => {
                let mut stars = 0;
                while p.peek_kind() == Some(TokenKind::Star) {
                    p.next();
                    stars += 1;
                }

                // All but the innermost star are ordinary value-level
                // dereferences; the last one names the written location.
                let mut address = Expression::parse_val(p)?;
                for _ in 0..stars - 1 {
                    let info = address.info().deref(1, position.0)?;
                    address = Expression::Deref(Box::new(Deref {
                        expr: address,
                        info,
                        position,
                    }));
                }

                let info = address.info().deref(1, position.0)?;
                Ok(Lvalue::Deref(Deref {
                    expr: address,
                    info,
                    position,
                }))
            }
            Some(TokenKind::Id) => {
                if p.peek_kind_at(1) == Some(TokenKind::LBracket) {
                    return Ok(Lvalue::Indexing(Indexing::parse(p)?));
                }

                let ident = Ident::parse(p)?;
                if ident.info.is_array() {
                    return Err(ParseError::expr(
                        format!("cannot assign to array '{}'", ident.name),
                        position.0,
                    )
                    .into());
                }

                Ok(Lvalue::Variable(ident))
            }
            _ => Err(ParseError::expr("invalid assignment target", position.0).into()),
        }
    }
}

/// `lvalue = expr`. The assignment's type is the lvalue's type, and
/// the value must be assignable to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub lvalue: Lvalue,
    pub value: Expression,
    pub info: DataType,
    pub position: Position,
}

impl Assignment {
    pub(crate) fn parse(p: &mut Parser) -> Result<Assignment, CompileError> {
        let position = p.position();

        let lvalue = Lvalue::parse(p)?;
        p.expect(TokenKind::Assign, "EXPR")?;
        let value = Expression::parse(p)?;

        DataType::check_assign(&lvalue.info(), &value.info(), position.0)?;

        Ok(Assignment {
            info: lvalue.info(),
            lvalue,
            value,
            position,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        lexer::Lexer,
        symbols::{Symbol, SymbolTable},
    };

    fn symbols_with(vars: &[(&str, DataType)]) -> SymbolTable {
        let mut symbols = SymbolTable::with_builtins();
        for (name, data_type) in vars {
            symbols
                .add(
                    Symbol::Variable {
                        name: name.to_string(),
                        data_type: *data_type,
                    },
                    1,
                )
                .unwrap();
        }
        symbols
    }

    fn parse_assignment(
        source: &str,
        vars: &[(&str, DataType)],
    ) -> Result<Assignment, CompileError> {
        let tokens = Lexer::new(source).lex().unwrap();
        let mut symbols = symbols_with(vars);
        let mut parser = Parser::new(tokens, &mut symbols);
        Assignment::parse(&mut parser)
    }

    #[test]
    fn test_variable_assignment() {
        let assignment = parse_assignment("x = 1", &[("x", DataType::INT)]).unwrap();
        assert!(matches!(assignment.lvalue, Lvalue::Variable(_)));
        assert_eq!(assignment.info, DataType::INT);
    }

    #[test]
    fn test_deref_assignment() {
        let assignment =
            parse_assignment("*p = 3", &[("p", DataType::INT.pointer_to())]).unwrap();
        let Lvalue::Deref(deref) = &assignment.lvalue else {
            panic!("expected a dereference lvalue");
        };
        assert_eq!(deref.info, DataType::INT);
    }

    #[test]
    fn test_indexed_assignment() {
        let assignment =
            parse_assignment("a[0] = 65", &[("a", DataType::CHAR.array_of(4))]).unwrap();
        assert!(matches!(assignment.lvalue, Lvalue::Indexing(_)));
        assert_eq!(assignment.info, DataType::CHAR);
    }

    #[test]
    fn test_array_is_not_an_lvalue() {
        let err = parse_assignment("a = 1", &[("a", DataType::CHAR.array_of(4))]).unwrap_err();
        assert!(err.to_string().contains("cannot assign to array"));
    }

    #[test]
    fn test_narrowing_assignment_is_fatal() {
        let err = parse_assignment("c = 1000", &[("c", DataType::CHAR)]).unwrap_err();
        assert!(err.to_string().contains("[DATATYPE]"));
    }

    #[test]
    fn test_chained_assignment() {
        let assignment =
            parse_assignment("x = y = 1", &[("x", DataType::INT), ("y", DataType::INT)]).unwrap();
        assert!(matches!(assignment.value, Expression::Assignment(_)));
    }
}
