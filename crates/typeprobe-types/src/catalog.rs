//! Declaration catalog
//!
//! Every public relation by name, with its arity and the description the
//! documentation generator substitutes into API docs. The checker resolves
//! invocations through [`lookup`].

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

/// What a declaration computes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    /// Single-type classifier (`IsNever`, `IsTuple`, ...)
    Predicate,
    /// Two-type comparison (`Equal`, `Extends`, ...)
    Relation,
    /// Single-case assertion (`Expect`, `ExpectFalse`)
    Assertion,
    /// Batch assertion over a tuple (`TrueCases`, `FalseCases`)
    Aggregator,
}

/// A public relation declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Declaration {
    /// Name as written in an invocation
    pub name: &'static str,
    /// Number of type arguments
    pub arity: usize,
    /// Category
    pub kind: DeclarationKind,
    /// May yield `never` or `boolean` instead of a strict answer
    pub hazardous: bool,
    /// Attached human-readable description
    pub description: &'static str,
}

const DECLARATIONS: &[Declaration] = &[
    Declaration {
        name: "Equal",
        arity: 2,
        kind: DeclarationKind::Relation,
        hazardous: false,
        description: "`true` iff both arguments resolve to exactly the same type; always a strict boolean.\n\n\
            Every other assertion is built on it.",
    },
    Declaration {
        name: "NotEqual",
        arity: 2,
        kind: DeclarationKind::Relation,
        hazardous: false,
        description: "The opposite of `Equal`: returns `false` if the two inputs are equal.",
    },
    Declaration {
        name: "SimpleEqual",
        arity: 2,
        kind: DeclarationKind::Relation,
        hazardous: true,
        description: "Mutual `Extends`: `A extends B ? (B extends A ? true : false) : false`.\n\n\
            Hazardous; prefer `Equal` for a strict answer. \
            Distribution means it can return `boolean` (both paths) or `never` (no path):\n\n\
            ```ts\n\
            SimpleEqual<1 & 2, never> //=> never (`Equal` returns `true`)\n\
            SimpleEqual<never, 1> //=> never (`Equal` returns `false`)\n\
            SimpleEqual<boolean, boolean> //=> boolean (`Equal` returns `true`)\n\
            SimpleEqual<true, boolean> //=> boolean (`Equal` returns `false`)\n\
            SimpleEqual<1 | 2, 1> //=> boolean (`Equal` returns `false`)\n\
            ```",
    },
    Declaration {
        name: "Extends",
        arity: 2,
        kind: DeclarationKind::Relation,
        hazardous: true,
        description: "`A extends B ? true : false`, with every quirk of the raw test left visible.\n\n\
            Hazardous; prefer `Equal` for a strict answer. \
            Distribution means it can return `boolean` (both paths) or `never` (no path):\n\n\
            ```ts\n\
            Extends<1 & 2, never> //=> never\n\
            Extends<never, never> //=> never\n\
            Extends<any, never> //=> boolean\n\
            Extends<1 | 2, 1> //=> boolean\n\
            Extends<boolean, true> //=> boolean\n\
            Extends<[], unknown[]> //=> true\n\
            Extends<unknown[], []> //=> false\n\
            Extends<{}, unknown> //=> true\n\
            Extends<unknown, {}> //=> false\n\
            ```",
    },
    Declaration {
        name: "IsNever",
        arity: 1,
        kind: DeclarationKind::Predicate,
        hazardous: false,
        description: "`true` for `never` (including intersections that collapse to it, such as `string & number`), \
            `false` for everything else, `never | string` included.",
    },
    Declaration {
        name: "IsAny",
        arity: 1,
        kind: DeclarationKind::Predicate,
        hazardous: false,
        description: "`true` only for `any`.\n\n\
            Unions with `any` resolve to `any`, so `IsAny<string | any>` returns `true`.",
    },
    Declaration {
        name: "IsUnknown",
        arity: 1,
        kind: DeclarationKind::Predicate,
        hazardous: false,
        description: "Returns `true` for `unknown` and for anything that resolves to it \
            (`never | unknown`, `{} | unknown`).\n\n\
            Returns `false` for everything else, including `any | unknown` (which resolves to `any`).",
    },
    Declaration {
        name: "IsUnion",
        arity: 1,
        kind: DeclarationKind::Predicate,
        hazardous: false,
        description: "`true` when the argument resolves to two or more alternatives.\n\n\
            `IsUnion<boolean>` is `true`. `string | never`, `string | unknown`, \
            `string | any`, `string | 'a'` and `never` all resolve to a non-union and return `false`.",
    },
    Declaration {
        name: "IsTuple",
        arity: 1,
        kind: DeclarationKind::Predicate,
        hazardous: false,
        description: "`true` for fixed-length sequences:\n\n\
            ```ts\n\
            IsTuple<[]>;\n\
            IsTuple<[number]>;\n\
            IsTuple<readonly [1]>;\n\
            ```\n\n\
            `{ length: 1 }`, `number[]` and `never` return `false`.",
    },
    Declaration {
        name: "Expect",
        arity: 1,
        kind: DeclarationKind::Assertion,
        hazardous: false,
        description: "Static assertion that its argument is the literal `true`.\n\n\
            `Expect<true>` does not error and returns `true`. \
            All other inputs error, except `never`, which returns `false`.",
    },
    Declaration {
        name: "ExpectFalse",
        arity: 1,
        kind: DeclarationKind::Assertion,
        hazardous: false,
        description: "Static assertion that its argument is the literal `false` (or `never`).\n\n\
            `true`, `boolean`, `1 | false`, `'false'`, `''`, `0`, `undefined`, `null` \
            and `unknown` all error.",
    },
    Declaration {
        name: "TrueCases",
        arity: 1,
        kind: DeclarationKind::Aggregator,
        hazardous: false,
        description: "Tests many cases at once: errors unless every element of the tuple is `true`.\n\n\
            ```ts\n\
            type T = TrueCases<[\n  IsUnion<string | number>,\n  IsUnion<'a' | 'b'>,\n]>;\n\
            ```\n\n\
            The error names the whole tuple rather than the failing case; \
            use `Expect` per case when that matters.",
    },
    Declaration {
        name: "FalseCases",
        arity: 1,
        kind: DeclarationKind::Aggregator,
        hazardous: false,
        description: "Tests many cases at once: errors unless every element of the tuple is `false`.\n\n\
            ```ts\n\
            type F = FalseCases<[\n  IsNever<''>,\n  IsNever<undefined>,\n]>;\n\
            ```\n\n\
            The error names the whole tuple rather than the failing case; \
            use `ExpectFalse` per case when that matters.",
    },
];

static INDEX: Lazy<FxHashMap<&'static str, &'static Declaration>> =
    Lazy::new(|| DECLARATIONS.iter().map(|d| (d.name, d)).collect());

/// All declarations, in documentation order
pub fn declarations() -> &'static [Declaration] {
    DECLARATIONS
}

/// Find a declaration by name
pub fn lookup(name: &str) -> Option<&'static Declaration> {
    INDEX.get(name).copied()
}

/// Substitute descriptions into a documentation template
///
/// A line of the form `<!-- Insert <Marker>: <Name> -->` is replaced by the
/// description of `Name`. Lines naming no known declaration are kept as-is.
pub fn render_marker(template: &str) -> String {
    template
        .split('\n')
        .map(|line| match marker_target(line).and_then(lookup) {
            Some(decl) => {
                tracing::trace!(name = decl.name, "replacing marker");
                decl.description
            }
            None => line,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Declaration name referenced by a marker line
fn marker_target(line: &str) -> Option<&str> {
    let start = line.find("<!-- Insert ")?;
    let rest = &line[start + "<!-- Insert ".len()..];
    let end = rest.find(" -->")?;
    let (marker, name) = rest[..end].split_once(": ")?;
    if marker.is_empty() || marker.contains(char::is_whitespace) {
        return None;
    }
    Some(name.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_relation_is_listed() {
        let names: Vec<&str> = declarations().iter().map(|d| d.name).collect();
        assert_eq!(names.len(), 13);
        for name in [
            "Equal", "NotEqual", "SimpleEqual", "Extends", "IsNever", "IsAny", "IsUnknown",
            "IsUnion", "IsTuple", "Expect", "ExpectFalse", "TrueCases", "FalseCases",
        ] {
            assert!(lookup(name).is_some(), "{name} missing");
        }
    }

    #[test]
    fn test_arity() {
        assert_eq!(lookup("Equal").map(|d| d.arity), Some(2));
        assert_eq!(lookup("Expect").map(|d| d.arity), Some(1));
        assert!(lookup("Extends").is_some_and(|d| d.hazardous));
        assert!(lookup("Nope").is_none());
    }

    #[test]
    fn test_render_marker() {
        let template = "# API\n<!-- Insert JSDoc: NotEqual -->\n<!-- Insert JSDoc: Missing -->\nend";
        let rendered = render_marker(template);
        assert_eq!(
            rendered,
            "# API\nThe opposite of `Equal`: returns `false` if the two inputs are equal.\n\
             <!-- Insert JSDoc: Missing -->\nend"
        );
    }

    #[test]
    fn test_marker_needs_a_marker_word() {
        assert_eq!(marker_target("<!-- Insert JSDoc: Equal -->"), Some("Equal"));
        assert_eq!(marker_target("<!-- Insert : Equal -->"), None);
        assert_eq!(marker_target("Insert JSDoc: Equal"), None);
    }
}
