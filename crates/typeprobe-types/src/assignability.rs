//! Raw assignability
//!
//! Implements the non-distributive relation S ⊑ T (a value of type S can be
//! used where T is expected), the question `[S] extends [T]` asks. Every
//! relation in [`crate::relations`] is built on this test.

use crate::context::TypeContext;
use crate::ty::{Literal, ObjectType, PrimitiveType, PropertySignature, Type, TypeId};

/// Context for checking assignability
#[derive(Debug, Clone, Copy)]
pub struct AssignabilityContext<'a> {
    /// Type context for resolving types
    type_ctx: &'a TypeContext,

    /// Whether `null`/`undefined` are kept out of other types
    strict_null_checks: bool,
}

/// A member a source exposes when matched against an object shape
#[derive(Debug, Clone, Copy)]
enum ApparentMember<'t> {
    /// A declared property
    Property(&'t PropertySignature),
    /// `length: number` of strings and arrays
    Length,
    /// `length: N` of an N-element tuple
    TupleLength(usize),
}

impl<'a> AssignabilityContext<'a> {
    /// Create a new assignability context
    pub fn new(type_ctx: &'a TypeContext) -> Self {
        AssignabilityContext {
            type_ctx,
            strict_null_checks: type_ctx.config().strict_null_checks,
        }
    }

    /// Check if `source` is assignable to `target` (source ⊑ target)
    pub fn is_assignable(&self, source: TypeId, target: TypeId) -> bool {
        // Reflexivity: T ⊑ T
        if source == target {
            return true;
        }

        let source_ty = match self.type_ctx.get(source) {
            Some(ty) => ty,
            None => return false,
        };

        let target_ty = match self.type_ctx.get(target) {
            Some(ty) => ty,
            None => return false,
        };

        match (source_ty, target_ty) {
            // Everything is assignable to the top types
            (_, Type::Any) | (_, Type::Unknown) => true,

            // Never is assignable to everything
            (Type::Never, _) => true,

            // Nothing else is assignable to never, not even any
            (_, Type::Never) => false,

            (Type::Any, _) => true,

            (Type::Unknown, _) => false,

            (Type::Primitive(PrimitiveType::Null | PrimitiveType::Undefined), _)
                if !self.strict_null_checks =>
            {
                true
            }

            // T1 | T2 | ... | Tn ⊑ U if Ti ⊑ U for all i
            (Type::Union(union), _) => union
                .members
                .iter()
                .all(|&member| self.is_assignable(member, target)),

            // T ⊑ U1 | U2 | ... | Un if T ⊑ Ui for some i
            (_, Type::Union(union)) => union
                .members
                .iter()
                .any(|&member| self.is_assignable(source, member)),

            // T ⊑ U1 & U2 & ... & Un if T ⊑ Ui for all i
            (_, Type::Intersection(inter)) => inter
                .members
                .iter()
                .all(|&member| self.is_assignable(source, member)),

            // T1 & ... & Tn ⊑ U if some Ti ⊑ U, or the members together
            // provide every property U requires
            (Type::Intersection(inter), _) => {
                inter
                    .members
                    .iter()
                    .any(|&member| self.is_assignable(member, target))
                    || match target_ty {
                        Type::Object(shape) => self.satisfies_shape(&inter.members, shape),
                        _ => false,
                    }
            }

            (Type::Literal(a), Type::Literal(b)) => a == b,

            // 'a' ⊑ string, 1 ⊑ number, 1n ⊑ bigint
            (Type::Literal(lit), Type::Primitive(prim)) => lit.base() == Some(*prim),

            (Type::Primitive(a), Type::Primitive(b)) => {
                a == b || (*a == PrimitiveType::Undefined && *b == PrimitiveType::Void)
            }

            // object accepts every structured type
            (
                Type::Object(_) | Type::Tuple(_) | Type::Array(_),
                Type::Primitive(PrimitiveType::Object),
            ) => true,

            // Array subtyping: T[] ⊑ U[] if T ⊑ U; readonly never flows into mutable
            (Type::Array(a1), Type::Array(a2)) => {
                (!a1.readonly || a2.readonly) && self.is_assignable(a1.element, a2.element)
            }

            // [T1, ..., Tn] ⊑ U[] if Ti ⊑ U for all i
            (Type::Tuple(t), Type::Array(a)) => {
                (!t.readonly || a.readonly)
                    && t.elements
                        .iter()
                        .all(|&e| self.is_assignable(e, a.element))
            }

            // [T1, ..., Tn] ⊑ [U1, ..., Um] if n = m and Ti ⊑ Ui for all i
            (Type::Tuple(t1), Type::Tuple(t2)) => {
                (!t1.readonly || t2.readonly)
                    && t1.elements.len() == t2.elements.len()
                    && t1
                        .elements
                        .iter()
                        .zip(&t2.elements)
                        .all(|(&e1, &e2)| self.is_assignable(e1, e2))
            }

            // Structural: width and depth subtyping against a shape
            (_, Type::Object(shape)) => self.satisfies_shape(&[source], shape),

            // No other assignability relationships
            _ => false,
        }
    }

    /// Check that `sources` together provide every property `shape` requires
    fn satisfies_shape(&self, sources: &[TypeId], shape: &ObjectType) -> bool {
        let mut providers = Vec::with_capacity(sources.len());
        for &source in sources {
            match self.apparent_members(source) {
                Some(members) => providers.push(members),
                None => return false,
            }
        }

        shape.properties.iter().all(|wanted| {
            let offered: Vec<ApparentMember<'_>> = providers
                .iter()
                .flatten()
                .copied()
                .filter(|member| self.member_name(member) == wanted.name)
                .collect();

            if offered.is_empty() {
                return wanted.optional;
            }

            // An intersection's property is required if any member requires it
            let required = offered.iter().any(|member| !self.member_optional(member));
            if !wanted.optional && !required {
                return false;
            }

            offered
                .iter()
                .any(|member| self.member_assignable(member, wanted.ty))
        })
    }

    /// Members a value of `source` exposes to a shape, or `None` if it
    /// cannot satisfy any shape at all
    fn apparent_members(&self, source: TypeId) -> Option<Vec<ApparentMember<'a>>> {
        match self.type_ctx.get(source)? {
            Type::Object(obj) => Some(obj.properties.iter().map(ApparentMember::Property).collect()),
            Type::Primitive(prim) if prim.is_nullish() => None,
            Type::Primitive(PrimitiveType::String) | Type::Literal(Literal::String(_)) => {
                Some(vec![ApparentMember::Length])
            }
            Type::Array(_) => Some(vec![ApparentMember::Length]),
            Type::Tuple(tuple) => Some(vec![ApparentMember::TupleLength(tuple.elements.len())]),
            Type::Primitive(_) | Type::Literal(_) => Some(Vec::new()),
            _ => None,
        }
    }

    fn member_name<'m>(&self, member: &ApparentMember<'m>) -> &'m str {
        match member {
            ApparentMember::Property(prop) => prop.name.as_str(),
            ApparentMember::Length | ApparentMember::TupleLength(_) => "length",
        }
    }

    fn member_optional(&self, member: &ApparentMember<'_>) -> bool {
        match member {
            ApparentMember::Property(prop) => prop.optional,
            ApparentMember::Length | ApparentMember::TupleLength(_) => false,
        }
    }

    fn member_assignable(&self, member: &ApparentMember<'_>, target: TypeId) -> bool {
        match member {
            ApparentMember::Property(prop) => self.is_assignable(prop.ty, target),
            ApparentMember::Length => self.number_assignable(target),
            ApparentMember::TupleLength(len) => {
                match self
                    .type_ctx
                    .lookup(&Type::Literal(Literal::Number(*len as f64)))
                {
                    Some(literal) => self.is_assignable(literal, target),
                    // A literal nobody interned cannot appear in `target`, so
                    // only targets accepting every number accept it
                    None => self.number_assignable(target),
                }
            }
        }
    }

    fn number_assignable(&self, target: TypeId) -> bool {
        match self.type_ctx.lookup(&Type::Primitive(PrimitiveType::Number)) {
            Some(number) => self.is_assignable(number, target),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProbeConfig;

    fn lit(ctx: &mut TypeContext, n: f64) -> TypeId {
        ctx.number_literal(n).unwrap()
    }

    #[test]
    fn test_reflexivity() {
        let mut ctx = TypeContext::new();
        let num = ctx.number_type();
        let assign = AssignabilityContext::new(&ctx);

        assert!(assign.is_assignable(num, num));
    }

    #[test]
    fn test_never_is_bottom() {
        let mut ctx = TypeContext::new();
        let never = ctx.never_type();
        let num = ctx.number_type();
        let assign = AssignabilityContext::new(&ctx);

        assert!(assign.is_assignable(never, num));
        assert!(assign.is_assignable(never, never));
        assert!(!assign.is_assignable(num, never));
    }

    #[test]
    fn test_unknown_is_top() {
        let mut ctx = TypeContext::new();
        let unknown = ctx.unknown_type();
        let num = ctx.number_type();
        let empty = ctx.object_type(vec![]).unwrap();
        let assign = AssignabilityContext::new(&ctx);

        assert!(assign.is_assignable(num, unknown));
        assert!(!assign.is_assignable(unknown, num));
        assert!(!assign.is_assignable(unknown, empty));
    }

    #[test]
    fn test_any_is_assignable_except_to_never() {
        let mut ctx = TypeContext::new();
        let any = ctx.any_type();
        let one = lit(&mut ctx, 1.0);
        let never = ctx.never_type();
        let assign = AssignabilityContext::new(&ctx);

        assert!(assign.is_assignable(any, one));
        assert!(assign.is_assignable(one, any));
        assert!(!assign.is_assignable(any, never));
    }

    #[test]
    fn test_literal_vs_base() {
        let mut ctx = TypeContext::new();
        let one = lit(&mut ctx, 1.0);
        let num = ctx.number_type();
        let one_n = ctx.bigint_literal("1").unwrap();
        let bigint = ctx.bigint_type();
        let t = ctx.boolean_literal(true);
        let boolean = ctx.boolean_type();
        let assign = AssignabilityContext::new(&ctx);

        assert!(assign.is_assignable(one, num));
        assert!(!assign.is_assignable(num, one));
        assert!(assign.is_assignable(one_n, bigint));
        assert!(!assign.is_assignable(one_n, one));
        assert!(assign.is_assignable(t, boolean));
        assert!(!assign.is_assignable(boolean, t));
    }

    #[test]
    fn test_union_assignability() {
        let mut ctx = TypeContext::new();
        let num = ctx.number_type();
        let s = ctx.string_type();
        let union = ctx.union_type(vec![num, s]);
        let assign = AssignabilityContext::new(&ctx);

        assert!(assign.is_assignable(num, union));
        assert!(assign.is_assignable(union, union));
        assert!(!assign.is_assignable(union, num));
    }

    #[test]
    fn test_sequences() {
        let mut ctx = TypeContext::new();
        let unknown = ctx.unknown_type();
        let one = lit(&mut ctx, 1.0);
        let a = ctx.string_literal("a");
        let empty = ctx.tuple_type(vec![]);
        let unknowns = ctx.array_type(unknown);
        let ro_unknowns = ctx.readonly_array_type(unknown);
        let one_a = ctx.tuple_type(vec![one, a]);
        let a_one = ctx.tuple_type(vec![a, one]);
        let ro_one = ctx.readonly_tuple_type(vec![one]);
        let assign = AssignabilityContext::new(&ctx);

        assert!(assign.is_assignable(empty, unknowns));
        assert!(!assign.is_assignable(unknowns, empty));
        assert!(!assign.is_assignable(one_a, a_one));
        assert!(assign.is_assignable(ro_one, ro_unknowns));
        assert!(!assign.is_assignable(ro_one, unknowns));
        assert!(assign.is_assignable(unknowns, ro_unknowns));
    }

    #[test]
    fn test_object_width_and_depth() {
        let mut ctx = TypeContext::new();
        let one = lit(&mut ctx, 1.0);
        let two = lit(&mut ctx, 2.0);
        let num = ctx.number_type();
        let a1 = ctx.object_type(vec![PropertySignature::new("a", one)]).unwrap();
        let a1b2 = ctx
            .object_type(vec![PropertySignature::new("a", one), PropertySignature::new("b", two)])
            .unwrap();
        let a_num = ctx.object_type(vec![PropertySignature::new("a", num)]).unwrap();
        let a_opt = ctx
            .object_type(vec![PropertySignature::new("a", num).optional()])
            .unwrap();
        let empty = ctx.object_type(vec![]).unwrap();
        let assign = AssignabilityContext::new(&ctx);

        assert!(assign.is_assignable(a1b2, a1));
        assert!(!assign.is_assignable(a1, a1b2));
        assert!(assign.is_assignable(a1, a_num));
        assert!(!assign.is_assignable(a_num, a1));
        assert!(assign.is_assignable(empty, a_opt));
        assert!(!assign.is_assignable(a_opt, a_num));
    }

    #[test]
    fn test_intersection_merges_properties() {
        let mut ctx = TypeContext::new();
        let one = lit(&mut ctx, 1.0);
        let two = lit(&mut ctx, 2.0);
        let a = ctx.object_type(vec![PropertySignature::new("a", one)]).unwrap();
        let b = ctx.object_type(vec![PropertySignature::new("b", two)]).unwrap();
        let ab = ctx
            .object_type(vec![PropertySignature::new("a", one), PropertySignature::new("b", two)])
            .unwrap();
        let a_and_b = ctx.intersection_type(vec![a, b]).unwrap();
        let assign = AssignabilityContext::new(&ctx);

        assert!(assign.is_assignable(ab, a_and_b));
        assert!(assign.is_assignable(a_and_b, ab));
        assert!(assign.is_assignable(a_and_b, a));
    }

    #[test]
    fn test_apparent_length() {
        let mut ctx = TypeContext::new();
        let num = ctx.number_type();
        let one = lit(&mut ctx, 1.0);
        let s = ctx.string_type();
        let len_num = ctx.object_type(vec![PropertySignature::new("length", num)]).unwrap();
        let len_one = ctx.object_type(vec![PropertySignature::new("length", one)]).unwrap();
        let single = ctx.tuple_type(vec![s]);
        let pair = ctx.tuple_type(vec![s, s]);
        let strings = ctx.array_type(s);
        let null = ctx.null_type();
        let empty = ctx.object_type(vec![]).unwrap();
        let assign = AssignabilityContext::new(&ctx);

        assert!(assign.is_assignable(s, len_num));
        assert!(assign.is_assignable(single, len_one));
        assert!(!assign.is_assignable(pair, len_one));
        assert!(assign.is_assignable(pair, len_num));
        assert!(!assign.is_assignable(strings, len_one));
        assert!(!assign.is_assignable(null, empty));
        assert!(!assign.is_assignable(len_one, single));
    }

    #[test]
    fn test_object_keyword() {
        let mut ctx = TypeContext::new();
        let object = ctx.object_keyword_type();
        let empty = ctx.object_type(vec![]).unwrap();
        let s = ctx.string_type();
        let tuple = ctx.tuple_type(vec![]);
        let assign = AssignabilityContext::new(&ctx);

        assert!(assign.is_assignable(empty, object));
        assert!(assign.is_assignable(tuple, object));
        assert!(assign.is_assignable(object, empty));
        assert!(!assign.is_assignable(s, object));
    }

    #[test]
    fn test_undefined_is_void() {
        let mut ctx = TypeContext::new();
        let undefined = ctx.undefined_type();
        let void = ctx.void_type();
        let assign = AssignabilityContext::new(&ctx);

        assert!(assign.is_assignable(undefined, void));
        assert!(!assign.is_assignable(void, undefined));
    }

    #[test]
    fn test_loose_null_checks() {
        let config = ProbeConfig {
            strict_null_checks: false,
            ..ProbeConfig::default()
        };
        let mut ctx = TypeContext::with_config(config);
        let null = ctx.null_type();
        let num = ctx.number_type();
        let never = ctx.never_type();
        let assign = AssignabilityContext::new(&ctx);

        assert!(assign.is_assignable(null, num));
        assert!(!assign.is_assignable(null, never));
    }
}
