//! Type context for managing types and type interning

use crate::config::ProbeConfig;
use crate::error::TypeError;
use crate::normalize;
use crate::ty::{
    ArrayType, Literal, ObjectType, PrimitiveType, PropertySignature, TupleType, Type, TypeId,
    UnionType,
};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Type context that owns every resolved type expression
///
/// This uses type interning so that identical resolved types share a
/// TypeId. All constructors normalize their input, so two expressions that
/// resolve to the same type always intern to the same id.
#[derive(Debug, Clone)]
pub struct TypeContext {
    /// Storage for all types, indexed by TypeId
    types: Vec<Arc<Type>>,

    /// Reverse mapping from Type to TypeId for interning
    type_to_id: FxHashMap<Type, TypeId>,

    /// Lattice options
    config: ProbeConfig,
}

impl Default for TypeContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeContext {
    /// Well-known TypeId of `any`
    pub const ANY: TypeId = TypeId(0);
    /// Well-known TypeId of `never`
    pub const NEVER: TypeId = TypeId(1);
    /// Well-known TypeId of `unknown`
    pub const UNKNOWN: TypeId = TypeId(2);
    /// Well-known TypeId of the `true` literal
    pub const TRUE: TypeId = TypeId(11);
    /// Well-known TypeId of the `false` literal
    pub const FALSE: TypeId = TypeId(12);
    /// Well-known TypeId of `boolean` (`true | false`)
    pub const BOOLEAN: TypeId = TypeId(13);

    /// Create a new type context with default options
    pub fn new() -> Self {
        Self::with_config(ProbeConfig::default())
    }

    /// Create a new type context with the given options
    pub fn with_config(config: ProbeConfig) -> Self {
        let mut ctx = TypeContext {
            types: Vec::new(),
            type_to_id: FxHashMap::default(),
            config,
        };

        // Pre-intern the sentinels and primitives in a fixed order so the
        // well-known ids above hold
        ctx.intern(Type::Any);
        ctx.intern(Type::Never);
        ctx.intern(Type::Unknown);
        for prim in [
            PrimitiveType::Number,
            PrimitiveType::String,
            PrimitiveType::BigInt,
            PrimitiveType::Symbol,
            PrimitiveType::Null,
            PrimitiveType::Undefined,
            PrimitiveType::Void,
            PrimitiveType::Object,
        ] {
            ctx.intern(Type::Primitive(prim));
        }
        ctx.intern(Type::Literal(Literal::Boolean(true)));
        ctx.intern(Type::Literal(Literal::Boolean(false)));
        ctx.intern(Type::Union(UnionType {
            members: vec![Self::TRUE, Self::FALSE],
        }));

        debug_assert_eq!(ctx.lookup(&Type::Any), Some(Self::ANY));
        debug_assert_eq!(
            ctx.lookup(&Type::Literal(Literal::Boolean(false))),
            Some(Self::FALSE)
        );

        ctx
    }

    /// Lattice options this context was created with
    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Intern a type, returning its TypeId
    ///
    /// No normalization happens here: callers building compound types should
    /// go through the typed constructors, or run
    /// [`normalize::normalize_type`] on the result.
    pub fn intern(&mut self, ty: Type) -> TypeId {
        if let Some(&id) = self.type_to_id.get(&ty) {
            return id;
        }

        let id = TypeId(self.types.len() as u32);
        self.types.push(Arc::new(ty.clone()));
        self.type_to_id.insert(ty, id);
        id
    }

    /// Get a type by its TypeId
    pub fn get(&self, id: TypeId) -> Option<&Type> {
        self.types.get(id.0 as usize).map(|arc| arc.as_ref())
    }

    /// Look up a type's ID without interning (returns None if type doesn't exist)
    pub fn lookup(&self, ty: &Type) -> Option<TypeId> {
        self.type_to_id.get(ty).copied()
    }

    // Well-known types

    /// Get the any type
    pub fn any_type(&self) -> TypeId {
        Self::ANY
    }

    /// Get the never type
    pub fn never_type(&self) -> TypeId {
        Self::NEVER
    }

    /// Get the unknown type
    pub fn unknown_type(&self) -> TypeId {
        Self::UNKNOWN
    }

    /// Get the boolean type (`true | false`)
    pub fn boolean_type(&self) -> TypeId {
        Self::BOOLEAN
    }

    /// Get a primitive type
    pub fn primitive(&mut self, prim: PrimitiveType) -> TypeId {
        self.intern(Type::Primitive(prim))
    }

    /// Get the number type
    pub fn number_type(&mut self) -> TypeId {
        self.primitive(PrimitiveType::Number)
    }

    /// Get the string type
    pub fn string_type(&mut self) -> TypeId {
        self.primitive(PrimitiveType::String)
    }

    /// Get the bigint type
    pub fn bigint_type(&mut self) -> TypeId {
        self.primitive(PrimitiveType::BigInt)
    }

    /// Get the null type
    pub fn null_type(&mut self) -> TypeId {
        self.primitive(PrimitiveType::Null)
    }

    /// Get the undefined type
    pub fn undefined_type(&mut self) -> TypeId {
        self.primitive(PrimitiveType::Undefined)
    }

    /// Get the void type
    pub fn void_type(&mut self) -> TypeId {
        self.primitive(PrimitiveType::Void)
    }

    /// Get the non-primitive object type
    pub fn object_keyword_type(&mut self) -> TypeId {
        self.primitive(PrimitiveType::Object)
    }

    // Literals

    /// Create a boolean literal type
    pub fn boolean_literal(&self, value: bool) -> TypeId {
        if value {
            Self::TRUE
        } else {
            Self::FALSE
        }
    }

    /// Create a number literal type
    ///
    /// `-0` folds into `0`; `NaN` has no literal type.
    pub fn number_literal(&mut self, value: f64) -> Result<TypeId, TypeError> {
        if value.is_nan() {
            return Err(TypeError::InvalidLiteral {
                reason: "NaN has no literal type".to_string(),
            });
        }
        let value = if value == 0.0 { 0.0 } else { value };
        Ok(self.intern(Type::Literal(Literal::Number(value))))
    }

    /// Create a string literal type
    pub fn string_literal(&mut self, value: impl Into<String>) -> TypeId {
        self.intern(Type::Literal(Literal::String(value.into())))
    }

    /// Create a bigint literal type from its decimal digits (with optional `-`)
    pub fn bigint_literal(&mut self, digits: &str) -> Result<TypeId, TypeError> {
        let (negative, body) = match digits.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, digits),
        };
        if body.is_empty() || !body.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TypeError::InvalidLiteral {
                reason: format!("'{}' is not a bigint literal", digits),
            });
        }

        let trimmed = body.trim_start_matches('0');
        let canonical = match (negative, trimmed.is_empty()) {
            (_, true) => "0".to_string(),
            (true, false) => format!("-{}", trimmed),
            (false, false) => trimmed.to_string(),
        };
        Ok(self.intern(Type::Literal(Literal::BigInt(canonical))))
    }

    // Compound types

    /// Create a union type
    ///
    /// Flattens nested unions, drops `never`, absorbs into `any`/`unknown`,
    /// folds literals into their base primitive, deduplicates and sorts.
    pub fn union_type(&mut self, members: Vec<TypeId>) -> TypeId {
        normalize::normalize_union(self, &members)
    }

    /// Create an intersection type
    ///
    /// Collapses incompatible constraints to `never` and distributes over
    /// union members. Fails when distribution exceeds `max_union_size`.
    pub fn intersection_type(&mut self, members: Vec<TypeId>) -> Result<TypeId, TypeError> {
        normalize::normalize_intersection(self, &members)
    }

    /// Create a tuple type
    pub fn tuple_type(&mut self, elements: Vec<TypeId>) -> TypeId {
        self.intern(Type::Tuple(TupleType {
            elements,
            readonly: false,
        }))
    }

    /// Create a readonly tuple type
    pub fn readonly_tuple_type(&mut self, elements: Vec<TypeId>) -> TypeId {
        self.intern(Type::Tuple(TupleType {
            elements,
            readonly: true,
        }))
    }

    /// Create an array type
    pub fn array_type(&mut self, element: TypeId) -> TypeId {
        self.intern(Type::Array(ArrayType {
            element,
            readonly: false,
        }))
    }

    /// Create a readonly array type
    pub fn readonly_array_type(&mut self, element: TypeId) -> TypeId {
        self.intern(Type::Array(ArrayType {
            element,
            readonly: true,
        }))
    }

    /// Create an object type from a list of properties
    ///
    /// Properties are sorted by name; declaring a name twice is an error.
    pub fn object_type(
        &mut self,
        mut properties: Vec<PropertySignature>,
    ) -> Result<TypeId, TypeError> {
        properties.sort_by(|a, b| a.name.cmp(&b.name));
        if let Some(dup) = properties.windows(2).find(|w| w[0].name == w[1].name) {
            return Err(TypeError::DuplicateProperty {
                name: dup[0].name.clone(),
            });
        }
        Ok(self.intern(Type::Object(ObjectType { properties })))
    }

    /// Get a display string for a type
    pub fn display(&self, id: TypeId) -> String {
        let mut out = String::new();
        self.write_type(&mut out, id, Precedence::Union);
        out
    }

    fn write_type(&self, out: &mut String, id: TypeId, prec: Precedence) {
        let ty = match self.get(id) {
            Some(ty) => ty,
            None => {
                out.push_str(&format!("InvalidType({})", id.0));
                return;
            }
        };

        match ty {
            Type::Union(union) => {
                let parens = prec > Precedence::Union;
                if parens {
                    out.push('(');
                }
                let has_boolean = union.members.contains(&Self::TRUE)
                    && union.members.contains(&Self::FALSE);
                let mut first = true;
                let mut boolean_written = false;
                for &member in &union.members {
                    if has_boolean && (member == Self::TRUE || member == Self::FALSE) {
                        if boolean_written {
                            continue;
                        }
                        boolean_written = true;
                        if !first {
                            out.push_str(" | ");
                        }
                        out.push_str("boolean");
                        first = false;
                        continue;
                    }
                    if !first {
                        out.push_str(" | ");
                    }
                    self.write_type(out, member, Precedence::Intersection);
                    first = false;
                }
                if parens {
                    out.push(')');
                }
            }
            Type::Intersection(inter) => {
                let parens = prec > Precedence::Intersection;
                if parens {
                    out.push('(');
                }
                for (i, &member) in inter.members.iter().enumerate() {
                    if i > 0 {
                        out.push_str(" & ");
                    }
                    self.write_type(out, member, Precedence::Postfix);
                }
                if parens {
                    out.push(')');
                }
            }
            Type::Array(arr) => {
                if arr.readonly {
                    out.push_str("readonly ");
                }
                self.write_type(out, arr.element, Precedence::Postfix);
                out.push_str("[]");
            }
            Type::Tuple(tuple) => {
                if tuple.readonly {
                    out.push_str("readonly ");
                }
                out.push('[');
                for (i, &elem) in tuple.elements.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write_type(out, elem, Precedence::Union);
                }
                out.push(']');
            }
            Type::Object(obj) => {
                if obj.properties.is_empty() {
                    out.push_str("{}");
                    return;
                }
                out.push_str("{ ");
                for (i, prop) in obj.properties.iter().enumerate() {
                    if i > 0 {
                        out.push_str("; ");
                    }
                    if prop.readonly {
                        out.push_str("readonly ");
                    }
                    out.push_str(&prop.name);
                    if prop.optional {
                        out.push('?');
                    }
                    out.push_str(": ");
                    self.write_type(out, prop.ty, Precedence::Union);
                }
                out.push_str(" }");
            }
            other => out.push_str(&other.to_string()),
        }
    }

    /// Get the number of types in the context
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if the context is empty
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Binding strength of the surrounding syntax when rendering a type
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Union,
    Intersection,
    Postfix,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_known_ids() {
        let ctx = TypeContext::new();
        assert_eq!(ctx.get(TypeContext::ANY), Some(&Type::Any));
        assert_eq!(ctx.get(TypeContext::NEVER), Some(&Type::Never));
        assert_eq!(ctx.get(TypeContext::UNKNOWN), Some(&Type::Unknown));
        assert_eq!(
            ctx.get(TypeContext::TRUE),
            Some(&Type::Literal(Literal::Boolean(true)))
        );
        assert!(ctx.get(TypeContext::BOOLEAN).is_some_and(Type::is_union));
    }

    #[test]
    fn test_interning_is_stable() {
        let mut ctx = TypeContext::new();
        let a = ctx.string_literal("a");
        let b = ctx.string_literal("a");
        assert_eq!(a, b);

        let one = ctx.number_literal(1.0).unwrap();
        let tuple1 = ctx.tuple_type(vec![one, a]);
        let tuple2 = ctx.tuple_type(vec![one, a]);
        assert_eq!(tuple1, tuple2);
    }

    #[test]
    fn test_negative_zero_folds() {
        let mut ctx = TypeContext::new();
        let zero = ctx.number_literal(0.0).unwrap();
        let neg_zero = ctx.number_literal(-0.0).unwrap();
        assert_eq!(zero, neg_zero);
    }

    #[test]
    fn test_nan_rejected() {
        let mut ctx = TypeContext::new();
        assert!(matches!(
            ctx.number_literal(f64::NAN),
            Err(TypeError::InvalidLiteral { .. })
        ));
    }

    #[test]
    fn test_bigint_canonical_digits() {
        let mut ctx = TypeContext::new();
        let a = ctx.bigint_literal("007").unwrap();
        let b = ctx.bigint_literal("7").unwrap();
        assert_eq!(a, b);
        assert_eq!(ctx.display(a), "7n");
        assert!(ctx.bigint_literal("1.5").is_err());
        assert!(ctx.bigint_literal("").is_err());
    }

    #[test]
    fn test_object_properties_sorted() {
        let mut ctx = TypeContext::new();
        let num = ctx.number_type();
        let ab = ctx
            .object_type(vec![
                PropertySignature::new("b", num),
                PropertySignature::new("a", num),
            ])
            .unwrap();
        let ba = ctx
            .object_type(vec![
                PropertySignature::new("a", num),
                PropertySignature::new("b", num),
            ])
            .unwrap();
        assert_eq!(ab, ba);
        assert_eq!(ctx.display(ab), "{ a: number; b: number }");
    }

    #[test]
    fn test_duplicate_property_rejected() {
        let mut ctx = TypeContext::new();
        let num = ctx.number_type();
        let err = ctx
            .object_type(vec![
                PropertySignature::new("a", num),
                PropertySignature::new("a", num),
            ])
            .unwrap_err();
        assert_eq!(err, TypeError::DuplicateProperty { name: "a".into() });
    }

    #[test]
    fn test_display_boolean_union() {
        let mut ctx = TypeContext::new();
        let boolean = ctx.boolean_type();
        assert_eq!(ctx.display(boolean), "boolean");

        let num = ctx.number_type();
        let u = ctx.union_type(vec![num, boolean]);
        let shown = ctx.display(u);
        assert!(shown.contains("boolean"));
        assert!(shown.contains("number"));
    }

    #[test]
    fn test_display_nested() {
        let mut ctx = TypeContext::new();
        let num = ctx.number_type();
        let s = ctx.string_type();
        let u = ctx.union_type(vec![num, s]);
        let arr = ctx.readonly_array_type(u);
        assert_eq!(ctx.display(arr), "readonly (number | string)[]");

        let empty = ctx.tuple_type(vec![]);
        assert_eq!(ctx.display(empty), "[]");

        let shape = ctx.object_type(vec![]).unwrap();
        assert_eq!(ctx.display(shape), "{}");
    }
}
