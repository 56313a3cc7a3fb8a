use crate::{
    lexer::{Position, TokenKind},
    parser::{ParseError, Parser},
};

/// `break ';'`, only valid inside a loop; the parser tracks the loop
/// nesting depth, the code generator resolves the jump target from its
/// stack of open loop end labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Break {
    pub position: Position,
}

impl Break {
    pub(crate) fn parse(p: &mut Parser) -> Result<Break, ParseError> {
        let position = p.position();

        p.expect(TokenKind::BreakKeyword, "STMT")?;

        if !p.in_loop() {
            return Err(ParseError::stmt("'break' outside of a loop", position.0));
        }

        p.expect(TokenKind::Semicolon, "STMT")?;

        Ok(Break { position })
    }
}

#[cfg(test)]
mod tests {
    use crate::{lexer::Lexer, parser::Parser, symbols::SymbolTable};

    #[test]
    fn test_break_outside_loop_is_fatal() {
        let tokens = Lexer::new("void main() { break; }").lex().unwrap();
        let mut symbols = SymbolTable::with_builtins();
        let err = Parser::new(tokens, &mut symbols)
            .parse_program()
            .unwrap_err();
        assert!(err.to_string().contains("'break' outside of a loop"));
    }

    #[test]
    fn test_break_inside_loop_parses() {
        let tokens = Lexer::new("void main() { while (1) { break; } }")
            .lex()
            .unwrap();
        let mut symbols = SymbolTable::with_builtins();
        assert!(Parser::new(tokens, &mut symbols).parse_program().is_ok());
    }
}
