//! Batch aggregators: `TrueCases<T extends readonly true[]>` and
//! `FalseCases<T extends readonly false[]>`
//!
//! These fold a tuple of relation results into one pass/fail. A failing
//! element is reported once for the whole sequence, not at the element: the
//! error names the entire tuple. Use [`expect`](super::assert::expect) per
//! case when the exact failing line matters.
//!
//! The result is `Equal<T[number], target>` AND `IsTuple<T>`. The tuple
//! requirement rejects a sequence that widened into `boolean[]`, which would
//! otherwise pass the constraint check unnoticed.

use tracing::debug;

use crate::assignability::AssignabilityContext;
use crate::context::TypeContext;
use crate::error::TypeError;
use crate::outcome::Outcome;
use crate::relations::equal::equal;
use crate::relations::predicates::is_tuple;
use crate::ty::{Type, TypeId};

/// `TrueCases<T>`: every element of the tuple `T` is `true`
pub fn true_cases(ctx: &mut TypeContext, cases: TypeId) -> Result<Outcome, TypeError> {
    aggregate(ctx, cases, true)
}

/// `FalseCases<T>`: every element of the tuple `T` is `false`
pub fn false_cases(ctx: &mut TypeContext, cases: TypeId) -> Result<Outcome, TypeError> {
    aggregate(ctx, cases, false)
}

/// [`true_cases`] over outcomes computed in Rust
pub fn true_cases_of(ctx: &mut TypeContext, outcomes: &[Outcome]) -> Result<Outcome, TypeError> {
    let cases = lower_outcomes(ctx, outcomes);
    true_cases(ctx, cases)
}

/// [`false_cases`] over outcomes computed in Rust
pub fn false_cases_of(ctx: &mut TypeContext, outcomes: &[Outcome]) -> Result<Outcome, TypeError> {
    let cases = lower_outcomes(ctx, outcomes);
    false_cases(ctx, cases)
}

fn lower_outcomes(ctx: &mut TypeContext, outcomes: &[Outcome]) -> TypeId {
    let elements = outcomes.iter().map(|o| o.into_type(ctx)).collect();
    ctx.tuple_type(elements)
}

fn aggregate(ctx: &mut TypeContext, cases: TypeId, target: bool) -> Result<Outcome, TypeError> {
    cases_constraint(ctx, cases, target)?;
    fold_cases(ctx, cases, target)
}

/// Check `T extends readonly <target>[]` without folding the cases
pub fn cases_constraint(ctx: &mut TypeContext, cases: TypeId, target: bool) -> Result<(), TypeError> {
    let literal = ctx.boolean_literal(target);
    let constraint = ctx.readonly_array_type(literal);

    if AssignabilityContext::new(ctx).is_assignable(cases, constraint) {
        return Ok(());
    }

    debug!(cases = %ctx.display(cases), target, "aggregate constraint violated");
    Err(TypeError::AggregateAssertionFailed {
        expected: ctx.display(constraint),
        actual: ctx.display(cases),
    })
}

/// `Equal<T[number], target>` AND `IsTuple<T>`, whatever `T` is
pub fn fold_cases(ctx: &mut TypeContext, cases: TypeId, target: bool) -> Result<Outcome, TypeError> {
    let literal = ctx.boolean_literal(target);
    let elements = element_union(ctx, cases);
    let all_match = equal(ctx, elements, literal)?;
    let fixed_length = is_tuple(ctx, cases);

    let result = Outcome::from_bool(all_match == Outcome::True && fixed_length == Outcome::True);
    debug!(cases = %ctx.display(cases), target, %result, "aggregate");
    Ok(result)
}

/// `T[number]`: the union of every element type a sequence can hold
fn element_union(ctx: &mut TypeContext, ty: TypeId) -> TypeId {
    let members = match ctx.get(ty).cloned() {
        Some(Type::Tuple(tuple)) => tuple.elements,
        Some(Type::Array(array)) => return array.element,
        Some(Type::Union(union)) => union
            .members
            .into_iter()
            .map(|alt| element_union(ctx, alt))
            .collect(),
        Some(Type::Never) => return TypeContext::NEVER,
        Some(Type::Any) => return TypeContext::ANY,
        _ => return TypeContext::UNKNOWN,
    };
    ctx.union_type(members)
}
