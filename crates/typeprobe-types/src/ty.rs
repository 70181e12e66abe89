//! Core type definitions for the typeprobe lattice

use std::fmt;
use std::hash::{Hash, Hasher};

/// Unique identifier for a type in the type context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub(crate) u32);

impl TypeId {
    /// Create a new TypeId from a raw value
    ///
    /// Note: This should generally only be used internally or for interop.
    /// Prefer using TypeContext methods to get well-known type IDs.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw value of this TypeId
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}

/// Widened base types
///
/// `boolean` is deliberately absent: it is the union `true | false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveType {
    /// The `number` type
    Number,
    /// The `string` type
    String,
    /// The `bigint` type
    BigInt,
    /// The `symbol` type
    Symbol,
    /// The `null` type
    Null,
    /// The `undefined` type
    Undefined,
    /// The `void` type
    Void,
    /// The non-primitive `object` type
    Object,
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

impl PrimitiveType {
    /// Keyword spelling of this primitive
    pub fn type_name(&self) -> &'static str {
        match self {
            PrimitiveType::Number => "number",
            PrimitiveType::String => "string",
            PrimitiveType::BigInt => "bigint",
            PrimitiveType::Symbol => "symbol",
            PrimitiveType::Null => "null",
            PrimitiveType::Undefined => "undefined",
            PrimitiveType::Void => "void",
            PrimitiveType::Object => "object",
        }
    }

    /// Look up a primitive by its keyword spelling
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "number" => PrimitiveType::Number,
            "string" => PrimitiveType::String,
            "bigint" => PrimitiveType::BigInt,
            "symbol" => PrimitiveType::Symbol,
            "null" => PrimitiveType::Null,
            "undefined" => PrimitiveType::Undefined,
            "void" => PrimitiveType::Void,
            "object" => PrimitiveType::Object,
            _ => return None,
        })
    }

    /// Whether values of this type are nullish (`null`, `undefined`, `void`)
    ///
    /// Nullish values have no apparent members and never satisfy a shape.
    pub fn is_nullish(&self) -> bool {
        matches!(
            self,
            PrimitiveType::Null | PrimitiveType::Undefined | PrimitiveType::Void
        )
    }
}

/// A literal value type
#[derive(Debug, Clone)]
pub enum Literal {
    /// Number literal: `1`, `2.5`
    Number(f64),
    /// String literal: `'a'`
    String(String),
    /// BigInt literal, stored as canonical decimal digits: `1n`
    BigInt(String),
    /// Boolean literal: `true`, `false`
    Boolean(bool),
}

impl Literal {
    /// The widened base type of this literal
    ///
    /// Boolean literals have no primitive base; their widening is the
    /// `true | false` union.
    pub fn base(&self) -> Option<PrimitiveType> {
        match self {
            Literal::Number(_) => Some(PrimitiveType::Number),
            Literal::String(_) => Some(PrimitiveType::String),
            Literal::BigInt(_) => Some(PrimitiveType::BigInt),
            Literal::Boolean(_) => None,
        }
    }
}

impl PartialEq for Literal {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            // Compare f64 by bits for exact equality
            (Literal::Number(a), Literal::Number(b)) => a.to_bits() == b.to_bits(),
            (Literal::String(a), Literal::String(b)) => a == b,
            (Literal::BigInt(a), Literal::BigInt(b)) => a == b,
            (Literal::Boolean(a), Literal::Boolean(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Literal {}

impl Hash for Literal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);

        match self {
            Literal::Number(n) => n.to_bits().hash(state),
            Literal::String(s) => s.hash(state),
            Literal::BigInt(s) => s.hash(state),
            Literal::Boolean(b) => b.hash(state),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Number(n) => write!(f, "{}", n),
            Literal::String(s) => write!(f, "'{}'", s.replace('\'', "\\'")),
            Literal::BigInt(digits) => write!(f, "{}n", digits),
            Literal::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// Union type: T1 | T2 | ... | Tn
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnionType {
    /// Members of the union, sorted and deduplicated
    pub members: Vec<TypeId>,
}

/// Intersection type: T1 & T2 & ... & Tn
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IntersectionType {
    /// Constraints that did not collapse, sorted and deduplicated
    pub members: Vec<TypeId>,
}

/// Tuple type: [T1, T2, ..., Tn]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TupleType {
    /// Element types, in order
    pub elements: Vec<TypeId>,
    /// `readonly [..]`
    pub readonly: bool,
}

/// Array type: T[]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArrayType {
    /// Element type
    pub element: TypeId,
    /// `readonly T[]`
    pub readonly: bool,
}

/// Object type property
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertySignature {
    /// Property name
    pub name: String,
    /// Property type
    pub ty: TypeId,
    /// Whether the property is optional
    pub optional: bool,
    /// Whether the property is readonly
    pub readonly: bool,
}

impl PropertySignature {
    /// A required, mutable property
    pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
            readonly: false,
        }
    }

    /// Mark the property optional
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Mark the property readonly
    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }
}

/// Object type: { prop1: T1, prop2: T2, ... }
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectType {
    /// Object properties, sorted by name
    pub properties: Vec<PropertySignature>,
}

impl ObjectType {
    /// Find a property by name
    pub fn property(&self, name: &str) -> Option<&PropertySignature> {
        self.properties
            .binary_search_by(|p| p.name.as_str().cmp(name))
            .ok()
            .map(|idx| &self.properties[idx])
    }
}

/// A resolved type expression
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Dynamic type: unifies with everything in both directions
    Any,

    /// Bottom type: the empty union
    Never,

    /// Top type: accepts everything, assignable only to itself and `any`
    Unknown,

    /// Widened base type
    Primitive(PrimitiveType),

    /// Literal value type
    Literal(Literal),

    /// Union type: T1 | T2 | ... | Tn
    Union(UnionType),

    /// Intersection type: T1 & T2 & ... & Tn
    Intersection(IntersectionType),

    /// Tuple type: [T1, T2, ..., Tn]
    Tuple(TupleType),

    /// Array type: T[]
    Array(ArrayType),

    /// Object type: { prop: T }
    Object(ObjectType),
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Any => write!(f, "any"),
            Type::Never => write!(f, "never"),
            Type::Unknown => write!(f, "unknown"),
            Type::Primitive(p) => write!(f, "{}", p),
            Type::Literal(l) => write!(f, "{}", l),
            Type::Union(u) => {
                for (i, member) in u.members.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{}", member)?;
                }
                Ok(())
            }
            Type::Intersection(i) => {
                for (idx, member) in i.members.iter().enumerate() {
                    if idx > 0 {
                        write!(f, " & ")?;
                    }
                    write!(f, "{}", member)?;
                }
                Ok(())
            }
            Type::Tuple(t) => {
                if t.readonly {
                    write!(f, "readonly ")?;
                }
                write!(f, "[")?;
                for (i, elem) in t.elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", elem)?;
                }
                write!(f, "]")
            }
            Type::Array(a) => {
                if a.readonly {
                    write!(f, "readonly ")?;
                }
                write!(f, "{}[]", a.element)
            }
            Type::Object(o) => {
                write!(f, "{{ ")?;
                for (i, prop) in o.properties.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    if prop.readonly {
                        write!(f, "readonly ")?;
                    }
                    write!(f, "{}", prop.name)?;
                    if prop.optional {
                        write!(f, "?")?;
                    }
                    write!(f, ": {}", prop.ty)?;
                }
                write!(f, " }}")
            }
        }
    }
}

impl Type {
    /// Check if this type is the any type
    pub fn is_any(&self) -> bool {
        matches!(self, Type::Any)
    }

    /// Check if this type is the never type
    pub fn is_never(&self) -> bool {
        matches!(self, Type::Never)
    }

    /// Check if this type is the unknown type
    pub fn is_unknown(&self) -> bool {
        matches!(self, Type::Unknown)
    }

    /// Check if this type is a union type
    pub fn is_union(&self) -> bool {
        matches!(self, Type::Union(_))
    }

    /// Check if this type is an array or a tuple
    pub fn is_sequence(&self) -> bool {
        matches!(self, Type::Array(_) | Type::Tuple(_))
    }

    /// Get the primitive type if this is a primitive
    pub fn as_primitive(&self) -> Option<PrimitiveType> {
        match self {
            Type::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    /// Get the literal if this is a literal type
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Type::Literal(l) => Some(l),
            _ => None,
        }
    }

    /// Get the union type if this is a union
    pub fn as_union(&self) -> Option<&UnionType> {
        match self {
            Type::Union(u) => Some(u),
            _ => None,
        }
    }

    /// Get the object type if this is an object shape
    pub fn as_object(&self) -> Option<&ObjectType> {
        match self {
            Type::Object(o) => Some(o),
            _ => None,
        }
    }
}
