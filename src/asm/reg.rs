use std::fmt::Display;

use super::InstructionSize;

/// x86-64 registers, including the sub-register aliases used for narrow
/// loads and stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reg {
    Rax,
    Eax,
    Ax,
    Al,
    Rdi,
    Edi,
    Di,
    Dil,
    Rdx,
    Rbp,
    Rsp,
    R12,
    R12D,
    R12W,
    R12B,
    R13,
    R13D,
    R13W,
    R13B,
    R14,
    R14D,
    R14W,
    R14B,
    R15,
    R15D,
    R15W,
    R15B,
}

impl Display for Reg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Reg::Rax => "rax",
            Reg::Eax => "eax",
            Reg::Ax => "ax",
            Reg::Al => "al",
            Reg::Rdi => "rdi",
            Reg::Edi => "edi",
            Reg::Di => "di",
            Reg::Dil => "dil",
            Reg::Rdx => "rdx",
            Reg::Rbp => "rbp",
            Reg::Rsp => "rsp",
            Reg::R12 => "r12",
            Reg::R12D => "r12d",
            Reg::R12W => "r12w",
            Reg::R12B => "r12b",
            Reg::R13 => "r13",
            Reg::R13D => "r13d",
            Reg::R13W => "r13w",
            Reg::R13B => "r13b",
            Reg::R14 => "r14",
            Reg::R14D => "r14d",
            Reg::R14W => "r14w",
            Reg::R14B => "r14b",
            Reg::R15 => "r15",
            Reg::R15D => "r15d",
            Reg::R15W => "r15w",
            Reg::R15B => "r15b",
        })
    }
}

impl Reg {
    /// The 64-bit register this alias belongs to.
    pub fn family(&self) -> Reg {
        use Reg::*;

        match self {
            Rax | Eax | Ax | Al => Rax,
            Rdi | Edi | Di | Dil => Rdi,
            R12 | R12D | R12W | R12B => R12,
            R13 | R13D | R13W | R13B => R13,
            R14 | R14D | R14W | R14B => R14,
            R15 | R15D | R15W | R15B => R15,
            Rdx => Rdx,
            Rbp => Rbp,
            Rsp => Rsp,
        }
    }

    /// Select the alias of this register matching the given operand size.
    pub fn to_sized(self, size: InstructionSize) -> Reg {
        use InstructionSize::*;
        use Reg::*;

        match (self.family(), size) {
            (Rax, Byte) => Al,
            (Rax, Word) => Ax,
            (Rax, Dword) => Eax,
            (Rax, _) => Rax,
            (Rdi, Byte) => Dil,
            (Rdi, Word) => Di,
            (Rdi, Dword) => Edi,
            (Rdi, _) => Rdi,
            (R12, Byte) => R12B,
            (R12, Word) => R12W,
            (R12, Dword) => R12D,
            (R12, _) => R12,
            (R13, Byte) => R13B,
            (R13, Word) => R13W,
            (R13, Dword) => R13D,
            (R13, _) => R13,
            (R14, Byte) => R14B,
            (R14, Word) => R14W,
            (R14, Dword) => R14D,
            (R14, _) => R14,
            (R15, Byte) => R15B,
            (R15, Word) => R15W,
            (R15, Dword) => R15D,
            (R15, _) => R15,
            (other, _) => other,
        }
    }

    /// The 8-bit alias, used as the target of `setcc`.
    pub fn to_byte(self) -> Reg {
        self.to_sized(InstructionSize::Byte)
    }
}

#[cfg(test)]
mod tests {
    use super::super::InstructionSize;
    use super::Reg;

    #[test]
    fn test_sized_aliases() {
        assert_eq!(Reg::R12.to_sized(InstructionSize::Byte), Reg::R12B);
        assert_eq!(Reg::R13.to_sized(InstructionSize::Word), Reg::R13W);
        assert_eq!(Reg::R14.to_sized(InstructionSize::Dword), Reg::R14D);
        assert_eq!(Reg::R15.to_sized(InstructionSize::Qword), Reg::R15);
        assert_eq!(Reg::Rax.to_sized(InstructionSize::Byte), Reg::Al);
        assert_eq!(Reg::Rdi.to_sized(InstructionSize::Dword), Reg::Edi);
    }

    #[test]
    fn test_family_of_alias() {
        assert_eq!(Reg::R14B.family(), Reg::R14);
        assert_eq!(Reg::Eax.family(), Reg::Rax);
    }

    #[test]
    fn test_display() {
        assert_eq!(Reg::R12D.to_string(), "r12d");
        assert_eq!(Reg::Dil.to_string(), "dil");
    }
}
