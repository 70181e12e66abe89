//! `Extends<A, B>`: raw directional assignability with its hazards visible
//!
//! `A extends B ? true : false` with `A` in naked position. The answer
//! distributes over the alternatives of `A`, so it can reach both branches
//! (`boolean`) or none (`never`). Callers that need a strict answer use
//! [`equal`](super::equal::equal).

use tracing::debug;

use crate::assignability::AssignabilityContext;
use crate::context::TypeContext;
use crate::outcome::Outcome;
use crate::ty::{Type, TypeId};

/// Evaluate `Extends<A, B>`
///
/// ```text
/// Extends<never, 1>     //=> never
/// Extends<1 | 2, 1>     //=> boolean
/// Extends<any, 1>       //=> boolean
/// Extends<[], unknown[]> //=> true
/// Extends<unknown[], []> //=> false
/// ```
pub fn extends(ctx: &TypeContext, a: TypeId, b: TypeId) -> Outcome {
    let assign = AssignabilityContext::new(ctx);
    let result = distribute(ctx, &assign, a, b);
    debug!(a = %ctx.display(a), b = %ctx.display(b), %result, "Extends");
    result
}

fn distribute(ctx: &TypeContext, assign: &AssignabilityContext<'_>, a: TypeId, b: TypeId) -> Outcome {
    match ctx.get(a) {
        // The empty union: no alternative to test
        Some(Type::Never) => Outcome::Never,
        Some(Type::Union(union)) => union
            .members
            .iter()
            .map(|&member| alternative(ctx, assign, member, b))
            .collect(),
        _ => alternative(ctx, assign, a, b),
    }
}

fn alternative(ctx: &TypeContext, assign: &AssignabilityContext<'_>, a: TypeId, b: TypeId) -> Outcome {
    match ctx.get(a) {
        // `any` in check position takes both branches unless the target is a top type
        Some(Type::Any) => match ctx.get(b) {
            Some(Type::Any | Type::Unknown) => Outcome::True,
            _ => Outcome::Boolean,
        },
        _ => Outcome::from_bool(assign.is_assignable(a, b)),
    }
}
