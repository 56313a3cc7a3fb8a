use super::super::Expression;
use crate::{
    error::CompileError,
    lexer::{Position, Token, TokenKind},
    parser::{ParseError, Parser},
    symbols::Symbol,
    types::DataType,
};

/// One declarator of a variable declaration: its resolved symbol, its
/// final type (arrays included), and an optional initializer.
#[derive(Debug, Clone, PartialEq)]
pub struct Declarator {
    pub name: String,
    pub symbol: usize,
    pub data_type: DataType,
    pub init: Option<Expression>,
    pub position: Position,
}

/// `type ID init? (',' ID init?)* ';'`: a variable declaration with
/// one or more declarators. All variables have static storage; an
/// in-function initializer compiles to a store, a top-level one to a
/// `.data` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub declarators: Vec<Declarator>,
    pub position: Position,
}

impl VarDecl {
    pub(crate) fn parse(
        p: &mut Parser,
        declared: DataType,
        first_name: String,
        position: Position,
        top_level: bool,
    ) -> Result<VarDecl, CompileError> {
        let mut declarators = vec![];
        let mut name = first_name;

        loop {
            declarators.push(Declarator::parse(p, declared, name, top_level)?);

            match p.peek_kind() {
                Some(TokenKind::Comma) => {
                    p.next();
                    name = p.expect_identifier("DECL")?;
                }
                Some(TokenKind::Semicolon) => {
                    p.next();
                    return Ok(VarDecl {
                        declarators,
                        position,
                    });
                }
                _ => {
                    return Err(ParseError::decl(
                        "expected ';' or ',' in a declaration",
                        p.line(),
                    )
                    .into())
                }
            }
        }
    }
}

impl Declarator {
    fn parse(
        p: &mut Parser,
        declared: DataType,
        name: String,
        top_level: bool,
    ) -> Result<Declarator, CompileError> {
        let position = p.position();
        let line = position.0;

        if declared.is_void() {
            return Err(
                ParseError::decl(format!("variable '{name}' declared 'void'"), line).into(),
            );
        }

        match p.peek_kind() {
            Some(TokenKind::LBracket) => {
                p.next();
                let length_token = p.expect(TokenKind::Num, "DECL")?;
                let Token::Num { value: length, .. } = length_token else {
                    unreachable!()
                };
                p.expect(TokenKind::RBracket, "DECL")?;

                if length == 0 {
                    return Err(ParseError::decl(
                        format!("array '{name}' must have a positive length"),
                        line,
                    )
                    .into());
                }

                let data_type = declared.array_of(length as usize);
                let symbol = p.symbols.add(
                    Symbol::Variable {
                        name: name.clone(),
                        data_type,
                    },
                    line,
                )?;

                Ok(Declarator {
                    name,
                    symbol,
                    data_type,
                    init: None,
                    position,
                })
            }
            Some(TokenKind::Assign) => {
                p.next();

                let symbol = p.symbols.add(
                    Symbol::Variable {
                        name: name.clone(),
                        data_type: declared,
                    },
                    line,
                )?;

                let init = Expression::parse(p)?;
                DataType::check_assign(&declared, &init.info(), line)?;

                if top_level && !matches!(init, Expression::Integer(_)) {
                    return Err(ParseError::decl(
                        format!("initializer of global '{name}' must be an integer literal"),
                        line,
                    )
                    .into());
                }

                Ok(Declarator {
                    name,
                    symbol,
                    data_type: declared,
                    init: Some(init),
                    position,
                })
            }
            _ => {
                let symbol = p.symbols.add(
                    Symbol::Variable {
                        name: name.clone(),
                        data_type: declared,
                    },
                    line,
                )?;

                Ok(Declarator {
                    name,
                    symbol,
                    data_type: declared,
                    init: None,
                    position,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexer::Lexer, parser::ast::Statement, symbols::SymbolTable};

    fn parse_program(source: &str) -> Result<(Vec<Statement>, SymbolTable), CompileError> {
        let tokens = Lexer::new(source).lex().unwrap();
        let mut symbols = SymbolTable::with_builtins();
        let program = Parser::new(tokens, &mut symbols).parse_program()?;
        Ok((program, symbols))
    }

    #[test]
    fn test_multiple_declarators() {
        let (program, symbols) = parse_program("int x, y, z;").unwrap();
        let Statement::VarDecl(decl) = &program[0] else {
            panic!("expected a variable declaration");
        };
        assert_eq!(decl.declarators.len(), 3);
        assert!(symbols.find("x").is_some());
        assert!(symbols.find("z").is_some());
    }

    #[test]
    fn test_array_declarator_updates_type() {
        let (program, symbols) = parse_program("char a[4];").unwrap();
        let Statement::VarDecl(decl) = &program[0] else {
            panic!("expected a variable declaration");
        };
        let declarator = &decl.declarators[0];
        assert_eq!(declarator.data_type, DataType::CHAR.array_of(4));
        assert_eq!(
            symbols.get(declarator.symbol).data_type(),
            DataType::CHAR.array_of(4)
        );
    }

    #[test]
    fn test_zero_length_array_is_fatal() {
        assert!(parse_program("char a[0];").is_err());
    }

    #[test]
    fn test_void_variable_is_fatal() {
        let err = parse_program("void x;").unwrap_err();
        assert!(err.to_string().contains("declared 'void'"));
    }

    #[test]
    fn test_void_pointer_is_allowed() {
        assert!(parse_program("void* p;").is_ok());
    }

    #[test]
    fn test_global_initializer_must_be_literal() {
        assert!(parse_program("int x = 42;").is_ok());
        assert!(parse_program("int x = 1 + 2;").is_err());
    }

    #[test]
    fn test_local_initializer_may_be_expression() {
        assert!(parse_program("void main() { int x = 1 + 2; }").is_ok());
    }
}
