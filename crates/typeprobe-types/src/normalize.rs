//! Type normalization
//!
//! Brings types into the canonical form every relation expects:
//! - Flattening nested unions and intersections
//! - Removing duplicate members and sorting them
//! - Absorbing unions into `any` / `unknown`, dropping `never`
//! - Folding literals into a base primitive present in the same union
//! - Collapsing incompatible intersections to `never`
//! - Distributing intersections over unions

use crate::context::TypeContext;
use crate::error::TypeError;
use crate::ty::{IntersectionType, Literal, PrimitiveType, PropertySignature, Type, TypeId, UnionType};

/// Normalize a type to its canonical form, recursively
///
/// Types built through the [`TypeContext`] constructors are already
/// canonical; this is for values interned raw with [`TypeContext::intern`].
pub fn normalize_type(ctx: &mut TypeContext, ty: TypeId) -> Result<TypeId, TypeError> {
    let ty_data = match ctx.get(ty) {
        Some(t) => t.clone(),
        None => return Ok(ty),
    };

    match ty_data {
        Type::Union(union) => {
            let members = normalize_all(ctx, &union.members)?;
            Ok(normalize_union(ctx, &members))
        }
        Type::Intersection(inter) => {
            let members = normalize_all(ctx, &inter.members)?;
            normalize_intersection(ctx, &members)
        }
        Type::Tuple(tuple) => {
            let elements = normalize_all(ctx, &tuple.elements)?;
            Ok(if tuple.readonly {
                ctx.readonly_tuple_type(elements)
            } else {
                ctx.tuple_type(elements)
            })
        }
        Type::Array(arr) => {
            let element = normalize_type(ctx, arr.element)?;
            Ok(if arr.readonly {
                ctx.readonly_array_type(element)
            } else {
                ctx.array_type(element)
            })
        }
        Type::Object(obj) => {
            let mut properties = Vec::with_capacity(obj.properties.len());
            for prop in obj.properties {
                properties.push(PropertySignature {
                    ty: normalize_type(ctx, prop.ty)?,
                    ..prop
                });
            }
            ctx.object_type(properties)
        }
        Type::Literal(Literal::Number(n)) => ctx.number_literal(n),
        Type::Literal(Literal::BigInt(digits)) => ctx.bigint_literal(&digits),
        _ => Ok(ty),
    }
}

fn normalize_all(ctx: &mut TypeContext, members: &[TypeId]) -> Result<Vec<TypeId>, TypeError> {
    members.iter().map(|&m| normalize_type(ctx, m)).collect()
}

/// Build the canonical union of `members`
///
/// Members are expected to be canonical themselves.
pub fn normalize_union(ctx: &mut TypeContext, members: &[TypeId]) -> TypeId {
    let mut flat = Vec::with_capacity(members.len());

    // Flatten nested unions and collect all members
    for &member in members {
        match ctx.get(member) {
            Some(Type::Union(nested)) => flat.extend_from_slice(&nested.members),
            Some(Type::Any) => return TypeContext::ANY,
            _ => flat.push(member),
        }
    }

    if flat.iter().any(|&m| m == TypeContext::ANY) {
        return TypeContext::ANY;
    }
    if flat.iter().any(|&m| m == TypeContext::UNKNOWN) {
        return TypeContext::UNKNOWN;
    }

    flat.retain(|&m| m != TypeContext::NEVER);

    // A literal is subsumed by its own base primitive
    let primitives: Vec<PrimitiveType> = flat
        .iter()
        .filter_map(|&m| ctx.get(m).and_then(Type::as_primitive))
        .collect();
    if !primitives.is_empty() {
        flat.retain(|&m| {
            match ctx.get(m).and_then(Type::as_literal).and_then(Literal::base) {
                Some(base) => !primitives.contains(&base),
                None => true,
            }
        });
    }

    flat.sort_unstable();
    flat.dedup();

    match flat.len() {
        0 => TypeContext::NEVER,
        1 => flat[0],
        _ => ctx.intern(Type::Union(UnionType { members: flat })),
    }
}

/// Build the canonical intersection of `members`
///
/// Members are expected to be canonical themselves.
pub fn normalize_intersection(
    ctx: &mut TypeContext,
    members: &[TypeId],
) -> Result<TypeId, TypeError> {
    let mut flat = Vec::with_capacity(members.len());
    for &member in members {
        match ctx.get(member) {
            Some(Type::Intersection(nested)) => flat.extend_from_slice(&nested.members),
            _ => flat.push(member),
        }
    }

    // never wins over any: `never & any` is never
    if flat.iter().any(|&m| m == TypeContext::NEVER) {
        return Ok(TypeContext::NEVER);
    }
    if flat.iter().any(|&m| m == TypeContext::ANY) {
        return Ok(TypeContext::ANY);
    }
    flat.retain(|&m| m != TypeContext::UNKNOWN);
    flat.sort_unstable();
    flat.dedup();

    match flat.len() {
        0 => return Ok(TypeContext::UNKNOWN),
        1 => return Ok(flat[0]),
        _ => {}
    }

    if flat.iter().any(|&m| ctx.get(m).is_some_and(Type::is_union)) {
        return distribute(ctx, &flat);
    }

    reduce_constraints(ctx, flat)
}

/// `A & (B | C)` becomes `(A & B) | (A & C)`
fn distribute(ctx: &mut TypeContext, members: &[TypeId]) -> Result<TypeId, TypeError> {
    let limit = ctx.config().max_union_size;

    let choices: Vec<Vec<TypeId>> = members
        .iter()
        .map(|&m| match ctx.get(m) {
            Some(Type::Union(u)) => u.members.clone(),
            _ => vec![m],
        })
        .collect();

    let size = choices
        .iter()
        .try_fold(1usize, |acc, c| acc.checked_mul(c.len()))
        .unwrap_or(usize::MAX);
    if size > limit {
        return Err(TypeError::UnionTooComplex { size, limit });
    }

    tracing::trace!(size, "distributing intersection over union members");

    let mut alternatives = Vec::with_capacity(size);
    let mut cursor = vec![0usize; choices.len()];
    loop {
        let combo: Vec<TypeId> = cursor
            .iter()
            .zip(&choices)
            .map(|(&i, options)| options[i])
            .collect();
        alternatives.push(normalize_intersection(ctx, &combo)?);

        // Advance the odometer
        let mut pos = 0;
        loop {
            if pos == cursor.len() {
                return Ok(normalize_union(ctx, &alternatives));
            }
            cursor[pos] += 1;
            if cursor[pos] < choices[pos].len() {
                break;
            }
            cursor[pos] = 0;
            pos += 1;
        }
    }
}

/// Collapse scalar conflicts in a union-free intersection
fn reduce_constraints(ctx: &mut TypeContext, mut members: Vec<TypeId>) -> Result<TypeId, TypeError> {
    let mut literals: Vec<Literal> = Vec::new();
    let mut primitives: Vec<PrimitiveType> = Vec::new();
    let mut has_structure = false;

    for &m in &members {
        match ctx.get(m) {
            Some(Type::Literal(l)) => literals.push(l.clone()),
            Some(Type::Primitive(PrimitiveType::Object)) => has_structure = true,
            Some(Type::Primitive(p)) => primitives.push(*p),
            Some(Type::Object(_)) | Some(Type::Tuple(_)) | Some(Type::Array(_)) => {
                has_structure = true
            }
            _ => {}
        }
    }

    // `undefined & void` is undefined
    if primitives.contains(&PrimitiveType::Undefined) && primitives.contains(&PrimitiveType::Void) {
        primitives.retain(|&p| p != PrimitiveType::Void);
        let void = ctx.void_type();
        members.retain(|&m| m != void);
    }

    let has_object_keyword = members
        .iter()
        .any(|&m| ctx.get(m).and_then(Type::as_primitive) == Some(PrimitiveType::Object));

    let conflict = primitives.len() > 1
        || literals.len() > 1
        || literals
            .iter()
            .any(|l| primitives.iter().any(|&p| l.base() != Some(p)))
        || (has_object_keyword && (!primitives.is_empty() || !literals.is_empty()))
        || (has_structure && primitives.iter().any(PrimitiveType::is_nullish));
    if conflict {
        return Ok(TypeContext::NEVER);
    }

    // A literal refines its own base primitive
    if !literals.is_empty() && !primitives.is_empty() {
        let prims: Vec<TypeId> = primitives.iter().map(|&p| ctx.primitive(p)).collect();
        members.retain(|m| !prims.contains(m));
    }

    match members.len() {
        0 => Ok(TypeContext::UNKNOWN),
        1 => Ok(members[0]),
        _ => Ok(ctx.intern(Type::Intersection(IntersectionType { members }))),
    }
}
