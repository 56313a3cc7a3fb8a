//! The type model of the language: the four primitives plus derived
//! pointer and array types, and the combination rules used by the parser.

use std::{error::Error, fmt::Display};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeError {
    pub message: String,
    pub line: usize,
}

impl TypeError {
    pub fn new(message: impl ToString, line: usize) -> Self {
        Self {
            message: message.to_string(),
            line,
        }
    }
}

impl Display for TypeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[DATATYPE] line {}: {}", self.line, self.message)
    }
}

impl Error for TypeError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Void,
    Char,
    Int,
    Long,
}

impl Primitive {
    pub fn width_bits(&self) -> u32 {
        match self {
            Primitive::Void => 0,
            Primitive::Char => 8,
            Primitive::Int => 32,
            Primitive::Long => 64,
        }
    }
}

impl Display for Primitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Primitive::Void => "void",
            Primitive::Char => "char",
            Primitive::Int => "int",
            Primitive::Long => "long",
        })
    }
}

/// A type of the language. `pointer_level == 0` is the primitive itself;
/// an array of `T` has `pointer_level(T) + 1` and a non-zero
/// `array_length`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataType {
    base: Primitive,
    pointer_level: usize,
    array_length: usize,
}

impl Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.array_length > 0 {
            let element = DataType {
                base: self.base,
                pointer_level: self.pointer_level - 1,
                array_length: 0,
            };
            return write!(f, "{element}[{}]", self.array_length);
        }

        write!(f, "{}", self.base)?;
        for _ in 0..self.pointer_level {
            write!(f, "*")?;
        }
        Ok(())
    }
}

impl DataType {
    pub const VOID: DataType = DataType::primitive(Primitive::Void);
    pub const CHAR: DataType = DataType::primitive(Primitive::Char);
    pub const INT: DataType = DataType::primitive(Primitive::Int);
    pub const LONG: DataType = DataType::primitive(Primitive::Long);

    pub const fn primitive(base: Primitive) -> Self {
        Self {
            base,
            pointer_level: 0,
            array_length: 0,
        }
    }

    pub fn base(&self) -> Primitive {
        self.base
    }

    pub fn pointer_level(&self) -> usize {
        self.pointer_level
    }

    pub fn array_length(&self) -> usize {
        self.array_length
    }

    pub fn is_pointer(&self) -> bool {
        self.pointer_level > 0
    }

    pub fn is_array(&self) -> bool {
        self.array_length > 0
    }

    pub fn is_void(&self) -> bool {
        self.base == Primitive::Void && self.pointer_level == 0
    }

    /// Width of a value of this type. Pointers and arrays are addresses,
    /// 64 bits regardless of their base.
    pub fn width_bits(&self) -> u32 {
        if self.pointer_level > 0 {
            64
        } else {
            self.base.width_bits()
        }
    }

    /// Storage size in bytes of one value of this type.
    pub fn var_size(&self) -> usize {
        self.width_bits() as usize / 8
    }

    /// Size in bytes of the value this pointer (or array) refers to.
    pub fn element_size(&self) -> usize {
        if self.pointer_level > 1 {
            8
        } else {
            self.base.width_bits() as usize / 8
        }
    }

    /// The pointer type referring to this type.
    pub fn pointer_to(&self) -> DataType {
        DataType {
            base: self.base,
            pointer_level: self.pointer_level + 1,
            array_length: 0,
        }
    }

    /// The array type of `length` elements of this type.
    pub fn array_of(&self, length: usize) -> DataType {
        DataType {
            base: self.base,
            pointer_level: self.pointer_level + 1,
            array_length: length,
        }
    }

    /// Peel `levels` levels of indirection off this type.
    pub fn deref(&self, levels: usize, line: usize) -> Result<DataType, TypeError> {
        if levels > self.pointer_level {
            return Err(TypeError::new(
                format!("cannot dereference value of type '{self}'"),
                line,
            ));
        }

        Ok(DataType {
            base: self.base,
            pointer_level: self.pointer_level - levels,
            array_length: 0,
        })
    }

    /// Combine the operand types of an arithmetic or comparison
    /// expression. Equal types pass through; otherwise the wider of the
    /// two wins. `void` never takes part in an expression.
    pub fn unify_expr(lhs: &DataType, rhs: &DataType, line: usize) -> Result<DataType, TypeError> {
        if lhs.is_void() || rhs.is_void() {
            return Err(TypeError::new("'void' value used in an expression", line));
        }

        if lhs == rhs {
            return Ok(*lhs);
        }

        if lhs.width_bits() >= rhs.width_bits() {
            Ok(*lhs)
        } else {
            Ok(*rhs)
        }
    }

    /// Check that a value of type `value` may be assigned to a location
    /// of type `target`. `long` and pointers interchange; anything else
    /// must match in indirection and base, and must not narrow.
    pub fn check_assign(
        target: &DataType,
        value: &DataType,
        line: usize,
    ) -> Result<(), TypeError> {
        if target.is_void() || value.is_void() {
            return Err(TypeError::new("cannot assign a 'void' value", line));
        }

        if target.pointer_level != value.pointer_level {
            let long_to_pointer = target.is_pointer() && *value == DataType::LONG;
            let pointer_to_long = *target == DataType::LONG && value.is_pointer();

            if !long_to_pointer && !pointer_to_long {
                return Err(TypeError::new(
                    format!("incompatible types '{target}' and '{value}' in assignment"),
                    line,
                ));
            }

            return Ok(());
        }

        if target.is_pointer() && target.base != value.base {
            return Err(TypeError::new(
                format!("incompatible pointer types '{target}' and '{value}'"),
                line,
            ));
        }

        if value.width_bits() > target.width_bits() {
            return Err(TypeError::new(
                format!("cannot narrow a value of type '{value}' to '{target}'"),
                line,
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_widths() {
        assert_eq!(DataType::VOID.width_bits(), 0);
        assert_eq!(DataType::CHAR.width_bits(), 8);
        assert_eq!(DataType::INT.width_bits(), 32);
        assert_eq!(DataType::LONG.width_bits(), 64);
    }

    #[test]
    fn test_pointer_width_is_address_width() {
        assert_eq!(DataType::CHAR.pointer_to().width_bits(), 64);
        assert_eq!(DataType::INT.pointer_to().pointer_to().width_bits(), 64);
    }

    #[test]
    fn test_array_levels() {
        let a = DataType::CHAR.array_of(4);
        assert_eq!(a.pointer_level(), 1);
        assert_eq!(a.array_length(), 4);
        assert_eq!(a.to_string(), "char[4]");
    }

    #[test]
    fn test_deref_peels_levels() {
        let pp = DataType::INT.pointer_to().pointer_to();
        let p = pp.deref(1, 1).unwrap();
        assert_eq!(p, DataType::INT.pointer_to());
        assert_eq!(pp.deref(2, 1).unwrap(), DataType::INT);
        assert!(DataType::INT.deref(1, 1).is_err());
    }

    #[test]
    fn test_element_size() {
        assert_eq!(DataType::CHAR.pointer_to().element_size(), 1);
        assert_eq!(DataType::INT.pointer_to().element_size(), 4);
        assert_eq!(DataType::LONG.pointer_to().element_size(), 8);
        assert_eq!(DataType::INT.pointer_to().pointer_to().element_size(), 8);
    }

    #[test]
    fn test_unify_prefers_wider() {
        let t = DataType::unify_expr(&DataType::CHAR, &DataType::INT, 1).unwrap();
        assert_eq!(t, DataType::INT);
        assert!(DataType::unify_expr(&DataType::VOID, &DataType::INT, 1).is_err());
    }

    #[test]
    fn test_assign_widening_allowed() {
        assert!(DataType::check_assign(&DataType::LONG, &DataType::INT, 1).is_ok());
        assert!(DataType::check_assign(&DataType::CHAR, &DataType::INT, 1).is_err());
    }

    #[test]
    fn test_assign_long_and_pointer_interchange() {
        let p = DataType::INT.pointer_to();
        assert!(DataType::check_assign(&p, &DataType::LONG, 1).is_ok());
        assert!(DataType::check_assign(&DataType::LONG, &p, 1).is_ok());
        assert!(DataType::check_assign(&p, &DataType::INT, 1).is_err());
    }

    #[test]
    fn test_assign_pointer_base_mismatch() {
        let pi = DataType::INT.pointer_to();
        let pc = DataType::CHAR.pointer_to();
        assert!(DataType::check_assign(&pi, &pc, 1).is_err());
        assert!(DataType::check_assign(&pi, &pi, 1).is_ok());
    }

    #[test]
    fn test_array_assignable_to_pointer() {
        let a = DataType::CHAR.array_of(4);
        let p = DataType::CHAR.pointer_to();
        assert!(DataType::check_assign(&p, &a, 1).is_ok());
    }
}
