//! Category predicates
//!
//! Single-type classifiers. Each one inspects the whole type as one value:
//! a union argument is never re-evaluated per alternative unless the
//! predicate says so ([`is_tuple`]).

use tracing::debug;

use crate::assignability::AssignabilityContext;
use crate::context::TypeContext;
use crate::outcome::Outcome;
use crate::ty::{Literal, Type, TypeId};

/// `IsNever<T>`: true iff `T` is the bottom type
pub fn is_never(ctx: &TypeContext, ty: TypeId) -> Outcome {
    // `[T] extends [never]`: a union argument is judged as a whole
    let result = Outcome::from_bool(matches!(ctx.get(ty), Some(Type::Never)));
    debug!(ty = %ctx.display(ty), %result, "IsNever");
    result
}

/// `IsAny<T>`: true iff `T` is the absorbing type
///
/// Unions containing `any` have already collapsed to `any`, so
/// `IsAny<string | any>` is true.
pub fn is_any(ctx: &TypeContext, ty: TypeId) -> Outcome {
    let result = Outcome::from_bool(matches!(ctx.get(ty), Some(Type::Any)));
    debug!(ty = %ctx.display(ty), %result, "IsAny");
    result
}

/// `IsUnknown<T>`: true iff `T` is exactly the unconstrained top type
///
/// `unknown` must be assignable to `T`, and `T` must be neither `any` nor
/// `never`.
pub fn is_unknown(ctx: &TypeContext, ty: TypeId) -> Outcome {
    let top_extends = AssignabilityContext::new(ctx).is_assignable(TypeContext::UNKNOWN, ty);
    let result = Outcome::from_bool(
        top_extends
            && is_any(ctx, ty) == Outcome::False
            && is_never(ctx, ty) == Outcome::False,
    );
    debug!(ty = %ctx.display(ty), %result, "IsUnknown");
    result
}

/// `IsUnion<T>`: true iff `T` resolves to two or more distinct alternatives
///
/// `boolean` is a union; `string | 'a'` is not (it resolves to `string`),
/// nor is `never` (the empty union).
pub fn is_union(ctx: &TypeContext, ty: TypeId) -> Outcome {
    let result = Outcome::from_bool(match ctx.get(ty) {
        Some(Type::Union(union)) => union.members.len() >= 2,
        _ => false,
    });
    debug!(ty = %ctx.display(ty), %result, "IsUnion");
    result
}

/// `IsTuple<T>`: true iff `T` is a fixed-length sequence
///
/// `never` is rejected up front. A union is classified per alternative, so
/// `[1] | number[]` yields `boolean`.
pub fn is_tuple(ctx: &TypeContext, ty: TypeId) -> Outcome {
    if is_never(ctx, ty) == Outcome::True {
        return Outcome::False;
    }

    let result = match ctx.get(ty) {
        Some(Type::Union(union)) => union
            .members
            .iter()
            .map(|&member| tuple_alternative(ctx, member))
            .collect(),
        _ => tuple_alternative(ctx, ty),
    };
    debug!(ty = %ctx.display(ty), %result, "IsTuple");
    result
}

/// A sequence whose `length` is a literal count
///
/// An intersection qualifies when one member makes it a sequence and some
/// member pins `length` to a literal, as in `[1] & { a: 1 }`.
fn tuple_alternative(ctx: &TypeContext, ty: TypeId) -> Outcome {
    Outcome::from_bool(match ctx.get(ty) {
        Some(Type::Tuple(_)) => true,
        Some(Type::Intersection(inter)) => {
            let members = || inter.members.iter().filter_map(|&m| ctx.get(m));
            members().any(|m| matches!(m, Type::Tuple(_) | Type::Array(_)))
                && members().any(|m| fixes_length(ctx, m))
        }
        _ => false,
    })
}

fn fixes_length(ctx: &TypeContext, member: &Type) -> bool {
    match member {
        Type::Tuple(_) => true,
        Type::Object(obj) => obj.properties.iter().any(|prop| {
            prop.name == "length"
                && !prop.optional
                && matches!(ctx.get(prop.ty), Some(Type::Literal(Literal::Number(_))))
        }),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ty::PropertySignature;

    #[test]
    fn test_is_never() {
        let mut ctx = TypeContext::new();
        let s = ctx.string_type();
        let n = ctx.number_type();
        let never = ctx.never_type();
        let both = ctx.intersection_type(vec![s, n]).unwrap();
        let either = ctx.union_type(vec![never, s]);
        let empty = ctx.tuple_type(vec![]);

        assert_eq!(is_never(&ctx, never), Outcome::True);
        assert_eq!(is_never(&ctx, both), Outcome::True);
        assert_eq!(is_never(&ctx, either), Outcome::False);
        assert_eq!(is_never(&ctx, empty), Outcome::False);
    }

    #[test]
    fn test_is_any() {
        let mut ctx = TypeContext::new();
        let any = ctx.any_type();
        let one = ctx.number_literal(1.0).unwrap();
        let absorbed = ctx.union_type(vec![any, one]);
        let undefined = ctx.undefined_type();

        assert_eq!(is_any(&ctx, any), Outcome::True);
        assert_eq!(is_any(&ctx, absorbed), Outcome::True);
        assert_eq!(is_any(&ctx, undefined), Outcome::False);
        assert_eq!(is_any(&ctx, ctx.unknown_type()), Outcome::False);
        assert_eq!(is_any(&ctx, ctx.never_type()), Outcome::False);
    }

    #[test]
    fn test_is_unknown() {
        let mut ctx = TypeContext::new();
        let unknown = ctx.unknown_type();
        let any = ctx.any_type();
        let one = ctx.number_literal(1.0).unwrap();
        let empty = ctx.object_type(vec![]).unwrap();
        let one_or_unknown = ctx.union_type(vec![one, unknown]);
        let any_or_unknown = ctx.union_type(vec![any, unknown]);
        let empty_and_unknown = ctx.intersection_type(vec![empty, unknown]).unwrap();

        assert_eq!(is_unknown(&ctx, unknown), Outcome::True);
        assert_eq!(is_unknown(&ctx, one_or_unknown), Outcome::True);
        assert_eq!(is_unknown(&ctx, any), Outcome::False);
        assert_eq!(is_unknown(&ctx, ctx.never_type()), Outcome::False);
        assert_eq!(is_unknown(&ctx, ctx.boolean_type()), Outcome::False);
        assert_eq!(is_unknown(&ctx, any_or_unknown), Outcome::False);
        assert_eq!(is_unknown(&ctx, empty_and_unknown), Outcome::False);
    }

    #[test]
    fn test_is_union() {
        let mut ctx = TypeContext::new();
        let s = ctx.string_type();
        let n = ctx.number_type();
        let a = ctx.string_literal("a");
        let string_or_number = ctx.union_type(vec![s, n]);
        let collapsed = ctx.union_type(vec![s, a]);
        let wrapped = ctx.tuple_type(vec![string_or_number]);
        let shape = ctx
            .object_type(vec![PropertySignature::new("a", string_or_number)])
            .unwrap();

        assert_eq!(is_union(&ctx, string_or_number), Outcome::True);
        assert_eq!(is_union(&ctx, ctx.boolean_type()), Outcome::True);
        assert_eq!(is_union(&ctx, collapsed), Outcome::False);
        assert_eq!(is_union(&ctx, wrapped), Outcome::False);
        assert_eq!(is_union(&ctx, shape), Outcome::False);
        assert_eq!(is_union(&ctx, ctx.never_type()), Outcome::False);
    }

    #[test]
    fn test_is_tuple() {
        let mut ctx = TypeContext::new();
        let n = ctx.number_type();
        let one = ctx.number_literal(1.0).unwrap();
        let empty = ctx.tuple_type(vec![]);
        let single = ctx.tuple_type(vec![n]);
        let readonly_one = ctx.readonly_tuple_type(vec![one]);
        let numbers = ctx.array_type(n);
        let length_one = ctx
            .object_type(vec![PropertySignature::new("length", one)])
            .unwrap();
        let mixed = ctx.union_type(vec![single, numbers]);

        assert_eq!(is_tuple(&ctx, empty), Outcome::True);
        assert_eq!(is_tuple(&ctx, single), Outcome::True);
        assert_eq!(is_tuple(&ctx, readonly_one), Outcome::True);
        assert_eq!(is_tuple(&ctx, numbers), Outcome::False);
        assert_eq!(is_tuple(&ctx, length_one), Outcome::False);
        assert_eq!(is_tuple(&ctx, ctx.never_type()), Outcome::False);
        assert_eq!(is_tuple(&ctx, ctx.any_type()), Outcome::False);
        assert_eq!(is_tuple(&ctx, mixed), Outcome::Boolean);
    }

    #[test]
    fn test_is_tuple_intersections() {
        let mut ctx = TypeContext::new();
        let n = ctx.number_type();
        let one = ctx.number_literal(1.0).unwrap();
        let a_one = ctx.object_type(vec![PropertySignature::new("a", one)]).unwrap();
        let length_one = ctx
            .object_type(vec![PropertySignature::new("length", one)])
            .unwrap();
        let single = ctx.tuple_type(vec![one]);
        let readonly_single = ctx.readonly_tuple_type(vec![one]);
        let numbers = ctx.array_type(n);

        let tagged = ctx.intersection_type(vec![single, a_one]).unwrap();
        let readonly_tagged = ctx.intersection_type(vec![readonly_single, a_one]).unwrap();
        let pinned = ctx.intersection_type(vec![numbers, length_one]).unwrap();
        let open = ctx.intersection_type(vec![numbers, a_one]).unwrap();

        assert_eq!(is_tuple(&ctx, tagged), Outcome::True);
        assert_eq!(is_tuple(&ctx, readonly_tagged), Outcome::True);
        assert_eq!(is_tuple(&ctx, pinned), Outcome::True);
        assert_eq!(is_tuple(&ctx, open), Outcome::False);
    }
}
