use super::CodegenError;
use crate::asm::Reg;

/// The fixed scratch set expression evaluation runs in. Callee-saved,
/// so calls into the runtime do not disturb live values.
const SCRATCH: [Reg; 4] = [Reg::R12, Reg::R13, Reg::R14, Reg::R15];

/// An allocated scratch register, identified by its slot index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegHandle(usize);

/// The four-slot register allocator. Allocation takes the lowest free
/// slot; every consuming instruction frees its operand explicitly.
/// Running out of slots means the expression is too deep for this
/// compiler; freeing a free slot is a compiler bug. Both are fatal.
#[derive(Debug, Clone)]
pub struct RegisterPool {
    free: [bool; 4],
}

impl Default for RegisterPool {
    fn default() -> Self {
        Self { free: [true; 4] }
    }
}

impl RegisterPool {
    pub fn allocate(&mut self) -> Result<RegHandle, CodegenError> {
        for (slot, free) in self.free.iter_mut().enumerate() {
            if *free {
                *free = false;
                return Ok(RegHandle(slot));
            }
        }

        Err(CodegenError::new(
            "expression too complex, out of scratch registers",
        ))
    }

    pub fn free(&mut self, handle: RegHandle) -> Result<(), CodegenError> {
        if self.free[handle.0] {
            return Err(CodegenError::new(format!(
                "double free of scratch register '{}'",
                SCRATCH[handle.0]
            )));
        }

        self.free[handle.0] = true;
        Ok(())
    }

    pub fn reg(&self, handle: RegHandle) -> Reg {
        SCRATCH[handle.0]
    }

    pub fn all_free(&self) -> bool {
        self.free.iter().all(|free| *free)
    }
}
