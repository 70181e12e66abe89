//! Equality relations
//!
//! [`equal`] compares two types for exact identity. Both sides are first
//! lowered into an [`InvariantProbe`], a container whose only purpose is to
//! stop the comparison from distributing over unions or being absorbed by
//! `any` and `never`. Two probes match iff the resolved types are the same
//! lattice element, so the result is always strict.
//!
//! [`simple_equal`] is the naive mutual-`Extends` version, kept to show where
//! the two diverge.

use tracing::debug;

use crate::assignability::AssignabilityContext;
use crate::context::TypeContext;
use crate::error::TypeError;
use crate::normalize::normalize_type;
use crate::outcome::Outcome;
use crate::relations::extends::extends;
use crate::ty::{Type, TypeId};

/// Canonical identity of a resolved type
///
/// Holding a probe instead of the raw [`TypeId`] guarantees the type went
/// through normalization, so structurally identical types compare equal
/// regardless of how they were built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InvariantProbe(TypeId);

impl InvariantProbe {
    /// Lower `ty` into its probe
    pub fn new(ctx: &mut TypeContext, ty: TypeId) -> Result<Self, TypeError> {
        Ok(InvariantProbe(normalize_type(ctx, ty)?))
    }

    /// The canonical type behind the probe
    pub fn ty(&self) -> TypeId {
        self.0
    }
}

/// `Equal<A, B>`: true iff `A` and `B` resolve to the same type
///
/// Union order does not matter; tuple order does. `1` is not `number`,
/// `{ a: 1, b: 2 }` is not `{ a: 1 } & { b: 2 }`, and `never` equals only
/// itself.
pub fn equal(ctx: &mut TypeContext, a: TypeId, b: TypeId) -> Result<Outcome, TypeError> {
    let result = Outcome::from_bool(InvariantProbe::new(ctx, a)? == InvariantProbe::new(ctx, b)?);
    debug!(a = %ctx.display(a), b = %ctx.display(b), %result, "Equal");
    Ok(result)
}

/// `NotEqual<A, B>`: the complement of [`equal`]
pub fn not_equal(ctx: &mut TypeContext, a: TypeId, b: TypeId) -> Result<Outcome, TypeError> {
    let result = Outcome::from_bool(InvariantProbe::new(ctx, a)? != InvariantProbe::new(ctx, b)?);
    debug!(a = %ctx.display(a), b = %ctx.display(b), %result, "NotEqual");
    Ok(result)
}

/// `SimpleEqual<A, B>`: `A extends B ? (B extends A ? true : false) : false`
///
/// Both conditionals distribute over their check type, so this can yield
/// `boolean` or `never` where [`equal`] is strict:
///
/// ```text
/// SimpleEqual<1 & 2, never>    //=> never   (Equal: true)
/// SimpleEqual<never, 1>        //=> never   (Equal: false)
/// SimpleEqual<true, boolean>   //=> boolean (Equal: false)
/// SimpleEqual<1 | 2, 1>        //=> boolean (Equal: false)
/// ```
pub fn simple_equal(ctx: &TypeContext, a: TypeId, b: TypeId) -> Outcome {
    let assign = AssignabilityContext::new(ctx);

    let alternatives: Vec<TypeId> = match ctx.get(a) {
        Some(Type::Never) => Vec::new(),
        Some(Type::Union(union)) => union.members.clone(),
        _ => vec![a],
    };

    let result = alternatives
        .into_iter()
        .map(|alt| match ctx.get(alt) {
            // `any` in check position takes both outer branches
            Some(Type::Any) if !matches!(ctx.get(b), Some(Type::Any | Type::Unknown)) => {
                extends(ctx, b, alt).union(Outcome::False)
            }
            _ if assign.is_assignable(alt, b) => extends(ctx, b, alt),
            _ => Outcome::False,
        })
        .collect();

    debug!(a = %ctx.display(a), b = %ctx.display(b), %result, "SimpleEqual");
    result
}
