mod instructionsize;
mod reg;

use std::fmt::Display;

pub use self::instructionsize::InstructionSize;
pub use self::reg::*;

#[derive(Debug, Clone)]
pub enum InstructionOperand {
    Register(Reg),
    Immediate(i64),
    /// A sized memory operand, e.g. `dword [x]` or `byte [r13]`.
    Memory(InstructionSize, String),
    /// A bare address operand, e.g. `[x]` for `lea`.
    Address(String),
}

impl Display for InstructionOperand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&match self {
            InstructionOperand::Register(reg) => reg.to_string(),
            InstructionOperand::Immediate(val) => format!("{val}"),
            InstructionOperand::Memory(size, location) => format!("{size} [{location}]"),
            InstructionOperand::Address(location) => format!("[{location}]"),
        })
    }
}

#[derive(Debug, Clone)]
pub enum Instruction {
    Comment(String),
    Label(String),
    Lea(InstructionOperand, InstructionOperand),
    Mov(InstructionOperand, InstructionOperand),
    Movzx(InstructionOperand, InstructionOperand),
    Add(InstructionOperand, InstructionOperand),
    Sub(InstructionOperand, InstructionOperand),
    Imul(InstructionOperand, InstructionOperand),
    Idiv(InstructionOperand),
    Cqo,
    Shl(InstructionOperand, u32),
    Xor(InstructionOperand, InstructionOperand),
    Cmp(InstructionOperand, InstructionOperand),
    Sete(InstructionOperand),
    Setne(InstructionOperand),
    Setg(InstructionOperand),
    Setge(InstructionOperand),
    Setl(InstructionOperand),
    Setle(InstructionOperand),
    Je(String),
    Jne(String),
    Jmp(String),
    Ret,
    Call(String),
    Push(Reg),
    Pop(Reg),
}

impl Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match self {
            Instruction::Comment(comment) => format!("\t; {comment}"),
            Instruction::Label(label) => format!("{label}:"),
            Instruction::Lea(target, source) => format!("\tlea\t{target}, {source}"),
            Instruction::Mov(target, source) => format!("\tmov\t{target}, {source}"),
            Instruction::Movzx(target, source) => format!("\tmovzx\t{target}, {source}"),
            Instruction::Add(target, source) => format!("\tadd\t{target}, {source}"),
            Instruction::Sub(target, source) => format!("\tsub\t{target}, {source}"),
            Instruction::Imul(target, source) => format!("\timul\t{target}, {source}"),
            Instruction::Idiv(source) => format!("\tidiv\t{source}"),
            Instruction::Cqo => "\tcqo".to_string(),
            Instruction::Shl(target, count) => format!("\tshl\t{target}, {count}"),
            Instruction::Xor(target, source) => format!("\txor\t{target}, {source}"),
            Instruction::Cmp(target, source) => format!("\tcmp\t{target}, {source}"),
            Instruction::Sete(target) => format!("\tsete\t{target}"),
            Instruction::Setne(target) => format!("\tsetne\t{target}"),
            Instruction::Setg(target) => format!("\tsetg\t{target}"),
            Instruction::Setge(target) => format!("\tsetge\t{target}"),
            Instruction::Setl(target) => format!("\tsetl\t{target}"),
            Instruction::Setle(target) => format!("\tsetle\t{target}"),
            Instruction::Je(target) => format!("\tje\t{target}"),
            Instruction::Jne(target) => format!("\tjne\t{target}"),
            Instruction::Jmp(target) => format!("\tjmp\t{target}"),
            Instruction::Ret => "\tret".to_string(),
            Instruction::Call(name) => format!("\tcall\t{name}"),
            Instruction::Push(source) => format!("\tpush\t{source}"),
            Instruction::Pop(target) => format!("\tpop\t{target}"),
        };
        f.write_str(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_operand() {
        let op = InstructionOperand::Memory(InstructionSize::Dword, "x".to_string());
        assert_eq!(op.to_string(), "dword [x]");
    }

    #[test]
    fn test_load_rendering() {
        let load = Instruction::Mov(
            InstructionOperand::Register(Reg::R12D),
            InstructionOperand::Memory(InstructionSize::Dword, "x".to_string()),
        );
        assert_eq!(load.to_string(), "\tmov\tr12d, dword [x]");
    }

    #[test]
    fn test_lea_rendering() {
        let lea = Instruction::Lea(
            InstructionOperand::Register(Reg::R12),
            InstructionOperand::Address("buffer".to_string()),
        );
        assert_eq!(lea.to_string(), "\tlea\tr12, [buffer]");
    }

    #[test]
    fn test_label_and_jump() {
        assert_eq!(
            Instruction::Label("__label__3".to_string()).to_string(),
            "__label__3:"
        );
        assert_eq!(
            Instruction::Jne("__label__3".to_string()).to_string(),
            "\tjne\t__label__3"
        );
    }
}
