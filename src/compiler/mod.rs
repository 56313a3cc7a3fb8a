//! Code generator. A post-order walk of the AST emits one instruction
//! buffer per function; `wrapup` renders the buffers, the `.bss` and
//! `.data` layout and the trailing declarations into the final NASM
//! text.

mod registers;

use std::{error::Error, fmt::Display, fmt::Write};

use log::{debug, info};

use Instruction::*;
use InstructionOperand::*;

use crate::{
    asm::{Instruction, InstructionOperand, InstructionSize, Reg},
    parser::ast::{
        Assignment, BinaryExpr, BinaryOp, Declarator, DoWhileLoop, Expression, FnCall, ForLoop,
        FuncDecl, If, Indexing, Lvalue, Return, Statement, VarDecl, WhileLoop,
    },
    symbols::{Symbol, SymbolTable},
};

pub use self::registers::{RegHandle, RegisterPool};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodegenError {
    pub message: String,
}

impl CodegenError {
    pub fn new(message: impl ToString) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

impl Display for CodegenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[CG] {}", self.message)
    }
}

impl Error for CodegenError {}

/// The four runtime entry points every object links against.
const RUNTIME_FUNCTIONS: [&str; 4] = ["print", "print_char", "print_str", "print_ln"];

#[derive(Debug, Clone)]
struct GlobalVar {
    name: String,
    size: InstructionSize,
    nelem: usize,
}

#[derive(Debug, Clone)]
struct InitedGlobal {
    name: String,
    size: InstructionSize,
    value: i64,
}

#[derive(Debug, Clone)]
struct StringData {
    name: String,
    bytes: Vec<u8>,
}

pub struct Compiler<'a> {
    symbols: &'a SymbolTable,
    registers: RegisterPool,
    label_count: usize,
    string_count: usize,
    instructions: Vec<Instruction>,
    functions: Vec<(String, Vec<Instruction>)>,
    globals: Vec<GlobalVar>,
    inited: Vec<InitedGlobal>,
    strings: Vec<StringData>,
    loop_end_labels: Vec<usize>,
    end_label: usize,
    saw_return: bool,
}

impl<'a> Compiler<'a> {
    pub fn new(symbols: &'a SymbolTable) -> Self {
        Self {
            symbols,
            registers: RegisterPool::default(),
            label_count: 0,
            string_count: 0,
            instructions: vec![],
            functions: vec![],
            globals: vec![],
            inited: vec![],
            strings: vec![],
            loop_end_labels: vec![],
            end_label: 0,
            saw_return: false,
        }
    }

    /// Generate the assembly text for a parsed compilation unit.
    pub fn compile(mut self, program: &[Statement]) -> Result<String, CodegenError> {
        for statement in program {
            match statement {
                Statement::VarDecl(decl) => self.compile_var_decl(decl, true)?,
                Statement::FuncDecl(decl) => self.compile_function(decl)?,
                _ => unreachable!("only declarations occur at top level"),
            }
        }

        Ok(self.wrapup())
    }

    fn mint_label(&mut self) -> usize {
        let label = self.label_count;
        self.label_count += 1;
        label
    }

    fn label_name(id: usize) -> String {
        format!("__label__{id}")
    }

    fn emit(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    /// Reserve static storage for a declarator: elements-of-size for an
    /// array, one slot otherwise.
    fn add_global_var(&mut self, declarator: &Declarator) {
        let data_type = &declarator.data_type;

        let (size, nelem) = if data_type.is_array() {
            let size = match data_type.element_size() {
                1 => InstructionSize::Byte,
                2 => InstructionSize::Word,
                4 => InstructionSize::Dword,
                _ => InstructionSize::Qword,
            };
            (size, data_type.array_length())
        } else {
            (InstructionSize::from(data_type), 1)
        };

        self.globals.push(GlobalVar {
            name: declarator.name.clone(),
            size,
            nelem,
        });
    }

    fn compile_var_decl(&mut self, decl: &VarDecl, top_level: bool) -> Result<(), CodegenError> {
        for declarator in &decl.declarators {
            match (&declarator.init, top_level) {
                (Some(Expression::Integer(literal)), true) => {
                    self.inited.push(InitedGlobal {
                        name: declarator.name.clone(),
                        size: InstructionSize::from(&declarator.data_type),
                        value: literal.value as i64,
                    });
                }
                (Some(init), false) => {
                    self.add_global_var(declarator);

                    let size = InstructionSize::from(&declarator.data_type);
                    let value = self.compile_expression(init)?;
                    self.emit(Mov(
                        Memory(size, declarator.name.clone()),
                        Register(self.registers.reg(value).to_sized(size)),
                    ));
                    self.registers.free(value)?;
                }
                _ => self.add_global_var(declarator),
            }
        }

        Ok(())
    }

    fn compile_function(&mut self, decl: &FuncDecl) -> Result<(), CodegenError> {
        self.instructions = vec![];
        self.saw_return = false;
        self.end_label = self.mint_label();

        self.emit(Push(Reg::Rbp));
        self.emit(Mov(Register(Reg::Rbp), Register(Reg::Rsp)));

        let Symbol::Function { args, .. } = self.symbols.get(decl.symbol) else {
            unreachable!("function declaration resolves to a function symbol");
        };

        // The formal argument lives in static storage like any other
        // variable; pull it out of rdi on entry.
        for formal in args {
            let size = InstructionSize::from(&formal.data_type);
            self.globals.push(GlobalVar {
                name: formal.name.clone(),
                size,
                nelem: 1,
            });
            self.emit(Mov(
                Memory(size, formal.name.clone()),
                Register(Reg::Rdi.to_sized(size)),
            ));
        }

        self.compile_statements(&decl.body)?;

        self.emit(Label(Self::label_name(self.end_label)));
        if !self.saw_return {
            self.emit(Mov(Register(Reg::Al), Immediate(0)));
        }

        if !self.registers.all_free() {
            return Err(CodegenError::new(format!(
                "register pool not empty at the end of function '{}'",
                decl.name
            )));
        }

        self.emit(Pop(Reg::Rbp));
        self.emit(Ret);

        debug!(
            "generated function '{}' ({} instructions)",
            decl.name,
            self.instructions.len()
        );

        let instructions = std::mem::take(&mut self.instructions);
        self.functions.push((decl.name.clone(), instructions));

        Ok(())
    }

    fn compile_statements(&mut self, statements: &[Statement]) -> Result<(), CodegenError> {
        for statement in statements {
            self.compile_statement(statement)?;

            if !self.registers.all_free() {
                return Err(CodegenError::new(
                    "scratch register still allocated at a statement boundary",
                ));
            }
        }

        Ok(())
    }

    fn compile_statement(&mut self, statement: &Statement) -> Result<(), CodegenError> {
        match statement {
            Statement::Empty => Ok(()),
            Statement::VarDecl(decl) => self.compile_var_decl(decl, false),
            Statement::Expression(expression) => {
                let result = self.compile_expression(expression)?;
                self.registers.free(result)
            }
            Statement::If(if_statement) => self.compile_if(if_statement),
            Statement::While(while_loop) => self.compile_while(while_loop),
            Statement::DoWhile(do_while) => self.compile_do_while(do_while),
            Statement::For(for_loop) => self.compile_for(for_loop),
            Statement::Break(_) => self.compile_break(),
            Statement::Return(return_statement) => self.compile_return(return_statement),
            Statement::FuncDecl(_) => {
                unreachable!("function declarations only occur at top level")
            }
        }
    }

    fn compile_if(&mut self, if_statement: &If) -> Result<(), CodegenError> {
        let else_label = self.mint_label();
        let end_label = self.mint_label();

        let condition = self.compile_expression(&if_statement.condition)?;
        self.emit(Cmp(
            Register(self.registers.reg(condition)),
            Immediate(1),
        ));
        self.emit(Jne(Self::label_name(else_label)));
        self.registers.free(condition)?;

        self.compile_statements(&if_statement.if_block)?;
        self.emit(Jmp(Self::label_name(end_label)));

        self.emit(Label(Self::label_name(else_label)));
        if let Some(else_block) = &if_statement.else_block {
            self.compile_statements(else_block)?;
            self.emit(Jmp(Self::label_name(end_label)));
        }

        self.emit(Label(Self::label_name(end_label)));
        Ok(())
    }

    fn compile_while(&mut self, while_loop: &WhileLoop) -> Result<(), CodegenError> {
        let start_label = self.mint_label();
        let end_label = self.mint_label();

        self.emit(Label(Self::label_name(start_label)));

        let condition = self.compile_expression(&while_loop.condition)?;
        self.emit(Cmp(
            Register(self.registers.reg(condition)),
            Immediate(1),
        ));
        self.emit(Jne(Self::label_name(end_label)));
        self.registers.free(condition)?;

        self.loop_end_labels.push(end_label);
        let body = self.compile_statements(&while_loop.block);
        self.loop_end_labels.pop();
        body?;

        self.emit(Jmp(Self::label_name(start_label)));
        self.emit(Label(Self::label_name(end_label)));
        Ok(())
    }

    fn compile_do_while(&mut self, do_while: &DoWhileLoop) -> Result<(), CodegenError> {
        let start_label = self.mint_label();
        let end_label = self.mint_label();

        self.emit(Label(Self::label_name(start_label)));

        self.loop_end_labels.push(end_label);
        let body = self.compile_statements(&do_while.block);
        self.loop_end_labels.pop();
        body?;

        let condition = self.compile_expression(&do_while.condition)?;
        self.emit(Cmp(
            Register(self.registers.reg(condition)),
            Immediate(1),
        ));
        self.emit(Je(Self::label_name(start_label)));
        self.registers.free(condition)?;

        self.emit(Label(Self::label_name(end_label)));
        Ok(())
    }

    fn compile_for(&mut self, for_loop: &ForLoop) -> Result<(), CodegenError> {
        self.compile_statement(&for_loop.init)?;

        let start_label = self.mint_label();
        let end_label = self.mint_label();

        self.emit(Label(Self::label_name(start_label)));

        let condition = self.compile_expression(&for_loop.condition)?;
        self.emit(Cmp(
            Register(self.registers.reg(condition)),
            Immediate(1),
        ));
        self.emit(Jne(Self::label_name(end_label)));
        self.registers.free(condition)?;

        self.loop_end_labels.push(end_label);
        let body = self.compile_statements(&for_loop.block);
        self.loop_end_labels.pop();
        body?;

        if let Some(update) = &for_loop.update {
            let result = self.compile_assignment(update)?;
            self.registers.free(result)?;
        }

        self.emit(Jmp(Self::label_name(start_label)));
        self.emit(Label(Self::label_name(end_label)));
        Ok(())
    }

    fn compile_break(&mut self) -> Result<(), CodegenError> {
        let Some(end_label) = self.loop_end_labels.last().copied() else {
            unreachable!("the parser rejects 'break' outside of a loop");
        };

        self.emit(Jmp(Self::label_name(end_label)));
        Ok(())
    }

    fn compile_return(&mut self, return_statement: &Return) -> Result<(), CodegenError> {
        if let Some(value) = &return_statement.value {
            let return_type = self.symbols.get(return_statement.function).data_type();
            let size = InstructionSize::from(&return_type);

            let result = self.compile_expression(value)?;
            self.emit(Mov(
                Register(Reg::Rax.to_sized(size)),
                Register(self.registers.reg(result).to_sized(size)),
            ));
            self.registers.free(result)?;
        }

        self.emit(Jmp(Self::label_name(self.end_label)));
        self.saw_return = true;
        Ok(())
    }

    fn compile_expression(&mut self, expression: &Expression) -> Result<RegHandle, CodegenError> {
        match expression {
            Expression::Integer(literal) => {
                let result = self.registers.allocate()?;
                self.emit(Mov(
                    Register(self.registers.reg(result)),
                    Immediate(literal.value as i64),
                ));
                Ok(result)
            }
            Expression::Str(literal) => {
                let name = self.generate_string_literal(literal.value.as_bytes());
                let result = self.registers.allocate()?;
                self.emit(Lea(Register(self.registers.reg(result)), Address(name)));
                Ok(result)
            }
            Expression::Ident(ident) => {
                let result = self.registers.allocate()?;
                let reg = self.registers.reg(result);

                if ident.info.is_array() {
                    self.emit(Lea(Register(reg), Address(ident.name.clone())));
                } else {
                    let size = InstructionSize::from(&ident.info);
                    self.emit(Xor(Register(reg), Register(reg)));
                    self.emit(Mov(
                        Register(reg.to_sized(size)),
                        Memory(size, ident.name.clone()),
                    ));
                }

                Ok(result)
            }
            Expression::AddressOf(address_of) => {
                let result = self.registers.allocate()?;
                self.emit(Lea(
                    Register(self.registers.reg(result)),
                    Address(address_of.name.clone()),
                ));
                Ok(result)
            }
            Expression::Deref(deref) => {
                let inner = self.compile_expression(&deref.expr)?;

                if deref.info.is_pointer() {
                    return Ok(inner);
                }

                let size = InstructionSize::from(&deref.info);
                self.load_mem(inner, size)
            }
            Expression::ScaledOffset(scaled) => {
                let result = self.compile_expression(&scaled.expr)?;
                let reg = self.registers.reg(result);

                match scaled.scale {
                    0 | 1 => {}
                    scale if scale.is_power_of_two() => {
                        self.emit(Shl(Register(reg), scale.trailing_zeros()));
                    }
                    scale => {
                        self.emit(Imul(Register(reg), Immediate(scale as i64)));
                    }
                }

                Ok(result)
            }
            Expression::Indexing(indexing) => {
                let address = self.compile_indexing_address(indexing)?;

                if indexing.info.is_pointer() {
                    return Ok(address);
                }

                let size = InstructionSize::from(&indexing.info);
                self.load_mem(address, size)
            }
            Expression::Binary(binary) => self.compile_binary(binary),
            Expression::Assignment(assignment) => self.compile_assignment(assignment),
            Expression::Call(call) => self.compile_call(call),
        }
    }

    /// Load the value a register points at, with the given width. The
    /// address register is consumed.
    fn load_mem(
        &mut self,
        address: RegHandle,
        size: InstructionSize,
    ) -> Result<RegHandle, CodegenError> {
        let result = self.registers.allocate()?;
        let reg = self.registers.reg(result);

        self.emit(Xor(Register(reg), Register(reg)));
        self.emit(Mov(
            Register(reg.to_sized(size)),
            Memory(size, self.registers.reg(address).to_string()),
        ));

        self.registers.free(address)?;
        Ok(result)
    }

    /// Compute the address of an indexed element: the index scaled by
    /// the element size, added to the variable's base address.
    fn compile_indexing_address(&mut self, indexing: &Indexing) -> Result<RegHandle, CodegenError> {
        let index = self.compile_expression(&indexing.index)?;
        let index_reg = self.registers.reg(index);

        let shift = indexing.ident.info.element_size().trailing_zeros();
        if shift > 0 {
            self.emit(Shl(Register(index_reg), shift));
        }

        let base = self.registers.allocate()?;
        let base_reg = self.registers.reg(base);
        self.emit(Lea(Register(base_reg), Address(indexing.ident.name.clone())));
        self.emit(Add(Register(base_reg), Register(index_reg)));
        self.registers.free(index)?;

        Ok(base)
    }

    fn compile_binary(&mut self, binary: &BinaryExpr) -> Result<RegHandle, CodegenError> {
        let lhs = self.compile_expression(&binary.lhs)?;
        let rhs = self.compile_expression(&binary.rhs)?;

        let lhs_reg = self.registers.reg(lhs);
        let rhs_reg = self.registers.reg(rhs);

        match binary.op {
            BinaryOp::Add => self.emit(Add(Register(lhs_reg), Register(rhs_reg))),
            BinaryOp::Sub => self.emit(Sub(Register(lhs_reg), Register(rhs_reg))),
            BinaryOp::Mul => self.emit(Imul(Register(lhs_reg), Register(rhs_reg))),
            BinaryOp::Div => {
                // idiv takes the dividend in rdx:rax.
                self.emit(Mov(Register(Reg::Rax), Register(lhs_reg)));
                self.emit(Cqo);
                self.emit(Idiv(Register(rhs_reg)));
                self.emit(Mov(Register(lhs_reg), Register(Reg::Rax)));
            }
            op => {
                self.emit(Cmp(Register(lhs_reg), Register(rhs_reg)));
                let byte = Register(lhs_reg.to_byte());
                match op {
                    BinaryOp::Equal => self.emit(Sete(byte)),
                    BinaryOp::NotEqual => self.emit(Setne(byte)),
                    BinaryOp::GreaterThan => self.emit(Setg(byte)),
                    BinaryOp::GreaterOrEqual => self.emit(Setge(byte)),
                    BinaryOp::LessThan => self.emit(Setl(byte)),
                    BinaryOp::LessOrEqual => self.emit(Setle(byte)),
                    _ => unreachable!(),
                }
                self.emit(Movzx(Register(lhs_reg), Register(lhs_reg.to_byte())));
            }
        }

        self.registers.free(rhs)?;
        Ok(lhs)
    }

    fn compile_assignment(&mut self, assignment: &Assignment) -> Result<RegHandle, CodegenError> {
        let value = self.compile_expression(&assignment.value)?;
        let size = InstructionSize::from(&assignment.info);
        let value_reg = self.registers.reg(value).to_sized(size);

        match &assignment.lvalue {
            Lvalue::Variable(ident) => {
                self.emit(Mov(Memory(size, ident.name.clone()), Register(value_reg)));
            }
            Lvalue::Deref(deref) => {
                let address = self.compile_expression(&deref.expr)?;
                self.emit(Mov(
                    Memory(size, self.registers.reg(address).to_string()),
                    Register(value_reg),
                ));
                self.registers.free(address)?;
            }
            Lvalue::Indexing(indexing) => {
                let address = self.compile_indexing_address(indexing)?;
                self.emit(Mov(
                    Memory(size, self.registers.reg(address).to_string()),
                    Register(value_reg),
                ));
                self.registers.free(address)?;
            }
        }

        Ok(value)
    }

    fn compile_call(&mut self, call: &FnCall) -> Result<RegHandle, CodegenError> {
        if let Some(argument) = call.args.first() {
            let arg = self.compile_expression(argument)?;
            self.emit(Mov(Register(Reg::Rdi), Register(self.registers.reg(arg))));
            self.registers.free(arg)?;
        }

        self.emit(Call(call.name.clone()));

        let result = self.registers.allocate()?;
        if !call.info.is_void() {
            let size = InstructionSize::from(&call.info);
            let reg = self.registers.reg(result);
            self.emit(Xor(Register(reg), Register(reg)));
            self.emit(Mov(
                Register(reg.to_sized(size)),
                Register(Reg::Rax.to_sized(size)),
            ));
        }

        Ok(result)
    }

    /// Mint a fresh `.data` entry for an anonymous byte string and
    /// return its name.
    fn generate_string_literal(&mut self, bytes: &[u8]) -> String {
        let name = format!("__str__{}", self.string_count);
        self.string_count += 1;

        self.strings.push(StringData {
            name: name.clone(),
            bytes: bytes.to_vec(),
        });

        name
    }

    /// Render everything: the functions in source order, then `.bss`
    /// reservations, `.data` entries and string literals, the runtime
    /// externs, and the GNU stack note.
    fn wrapup(self) -> String {
        let mut out = String::new();

        for (name, instructions) in &self.functions {
            let _ = writeln!(out, "section .text");
            let _ = writeln!(out, "global {name}");
            let _ = writeln!(out, "{name}:");
            for instruction in instructions {
                let _ = writeln!(out, "{instruction}");
            }
            let _ = writeln!(out);
        }

        if !self.globals.is_empty() {
            let _ = writeln!(out, "section .bss");
            for global in &self.globals {
                let _ = writeln!(
                    out,
                    "\t{} {} {}",
                    global.name,
                    global.size.reserve_directive(),
                    global.nelem
                );
            }
            let _ = writeln!(out);
        }

        if !self.inited.is_empty() || !self.strings.is_empty() {
            let _ = writeln!(out, "section .data");
            for inited in &self.inited {
                let _ = writeln!(
                    out,
                    "\t{} {} {}",
                    inited.name,
                    inited.size.data_directive(),
                    inited.value
                );
            }
            for string in &self.strings {
                let _ = writeln!(out, "\t{} db {}", string.name, format_bytes(&string.bytes));
            }
            let _ = writeln!(out);
        }

        for name in RUNTIME_FUNCTIONS {
            let _ = writeln!(out, "extern {name}");
        }
        let _ = writeln!(out, "section .note.GNU-stack noalloc noexec nowrite progbits");

        info!(
            "generated {} function(s), {} global(s), {} string literal(s)",
            self.functions.len(),
            self.globals.len(),
            self.strings.len()
        );

        out
    }
}

/// Format a byte string as a NASM `db` operand list: printable runs
/// quoted, everything else numeric.
fn format_bytes(bytes: &[u8]) -> String {
    let mut parts: Vec<String> = vec![];
    let mut run = String::new();

    for byte in bytes {
        if (0x20..0x7f).contains(byte) && *byte != b'"' {
            run.push(*byte as char);
        } else {
            if !run.is_empty() {
                parts.push(format!("\"{run}\""));
                run.clear();
            }
            parts.push(byte.to_string());
        }
    }

    if !run.is_empty() {
        parts.push(format!("\"{run}\""));
    }

    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_printable_bytes() {
        assert_eq!(format_bytes(b"ABC\0"), "\"ABC\", 0");
    }

    #[test]
    fn test_format_mixed_bytes() {
        assert_eq!(format_bytes(b"a\nb\0"), "\"a\", 10, \"b\", 0");
    }

    #[test]
    fn test_format_quote_is_numeric() {
        assert_eq!(format_bytes(b"\"\0"), "34, 0");
    }
}
