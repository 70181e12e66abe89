//! Single-case assertions: `Expect<T extends true>` and `ExpectFalse<T extends false>`
//!
//! The argument must be provably the target literal. `never` satisfies any
//! constraint and passes through, returning `false`; `any` is rejected.

use tracing::debug;

use crate::assignability::AssignabilityContext;
use crate::context::TypeContext;
use crate::error::TypeError;
use crate::outcome::Outcome;
use crate::relations::equal::equal;
use crate::ty::TypeId;

/// `Expect<T>`: fails unless `T` is the literal `true` (or `never`)
pub fn expect(ctx: &mut TypeContext, ty: TypeId) -> Result<Outcome, TypeError> {
    assert_literal(ctx, ty, true)
}

/// `ExpectFalse<T>`: fails unless `T` is the literal `false` (or `never`)
pub fn expect_false(ctx: &mut TypeContext, ty: TypeId) -> Result<Outcome, TypeError> {
    assert_literal(ctx, ty, false)
}

fn assert_literal(ctx: &mut TypeContext, ty: TypeId, target: bool) -> Result<Outcome, TypeError> {
    assertion_constraint(ctx, ty, target)?;
    let literal = ctx.boolean_literal(target);
    equal(ctx, ty, literal)
}

/// Check `T extends <target>` without evaluating the assertion
///
/// A checker that keeps going after a violation reports this error and
/// still evaluates `Equal<T, target>` as the result.
pub fn assertion_constraint(ctx: &TypeContext, ty: TypeId, target: bool) -> Result<(), TypeError> {
    let literal = ctx.boolean_literal(target);
    let satisfied =
        ty != TypeContext::ANY && AssignabilityContext::new(ctx).is_assignable(ty, literal);

    if satisfied {
        return Ok(());
    }

    debug!(ty = %ctx.display(ty), target, "assertion constraint violated");
    Err(TypeError::AssertionFailed {
        expected: ctx.display(literal),
        actual: ctx.display(ty),
    })
}
