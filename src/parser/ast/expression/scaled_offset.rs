use super::Expression;
use crate::{
    lexer::Position,
    types::{DataType, TypeError},
};

/// Scales an index expression by the size of a pointer's element. The
/// parser inserts this node when an additive expression mixes a pointer
/// with an integer, turning `p + i` into `p + i*sizeof(*p)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledOffset {
    pub expr: Expression,
    pub scale: usize,
    pub info: DataType,
    pub position: Position,
}

impl ScaledOffset {
    fn wrap(expr: Expression, scale: usize) -> Expression {
        let info = expr.info();
        let position = expr.position();

        Expression::ScaledOffset(Box::new(ScaledOffset {
            expr,
            scale,
            info,
            position,
        }))
    }

    /// Rewrite the operands of an additive expression. When exactly one
    /// side is a pointer, the other side is wrapped in a scaling node
    /// and the result takes the pointer's type; otherwise the operands
    /// unify as usual.
    pub(crate) fn rewrite(
        lhs: Expression,
        rhs: Expression,
        line: usize,
    ) -> Result<(Expression, Expression, DataType), TypeError> {
        match (lhs.info().is_pointer(), rhs.info().is_pointer()) {
            (true, false) => {
                let info = lhs.info();
                let scale = info.element_size();
                Ok((lhs, Self::wrap(rhs, scale), info))
            }
            (false, true) => {
                let info = rhs.info();
                let scale = info.element_size();
                Ok((Self::wrap(lhs, scale), rhs, info))
            }
            _ => {
                let info = DataType::unify_expr(&lhs.info(), &rhs.info(), line)?;
                Ok((lhs, rhs, info))
            }
        }
    }
}
