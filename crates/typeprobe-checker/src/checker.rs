//! Case-file checker
//!
//! Walks the items of a [`CaseFile`] in order, resolves every type expression
//! into the lattice and evaluates relation invocations eagerly. Failures are
//! collected rather than returned so the rest of the file keeps checking.

use rustc_hash::FxHashMap;
use tracing::{debug, trace};
use typeprobe_types::catalog::{self, Declaration, DeclarationKind};
use typeprobe_types::relations;
use typeprobe_types::{
    Outcome, PrimitiveType, ProbeConfig, PropertySignature, TypeContext, TypeError, TypeId,
};

use crate::ast::*;
use crate::error::CheckError;
use crate::parser::parse_case_file;
use crate::token::Span;

/// Names that resolve to a built-in type and cannot be redeclared
const TYPE_KEYWORDS: &[&str] = &[
    "any", "never", "unknown", "boolean", "true", "false", "number", "string", "bigint",
    "symbol", "null", "undefined", "void", "object",
];

/// Check a case file with the default configuration
pub fn check_source(source: &str) -> CheckResult {
    check_source_with_config(source, ProbeConfig::default())
}

/// Check a case file
///
/// A file with syntax errors is not evaluated; the result then holds only
/// those errors.
pub fn check_source_with_config(source: &str, config: ProbeConfig) -> CheckResult {
    let checker = CaseChecker::new(TypeContext::with_config(config));

    match parse_case_file(source) {
        Ok(file) => checker.check_file(&file),
        Err(errors) => {
            debug!(count = errors.len(), "case file has syntax errors");
            let mut result = checker.finish();
            result.errors = errors.into_iter().map(CheckError::from).collect();
            result
        }
    }
}

/// Outcome of checking a case file
#[derive(Debug)]
pub struct CheckResult {
    /// Lattice every resolved type lives in
    pub ctx: TypeContext,
    /// Alias values by name
    pub aliases: FxHashMap<String, TypeId>,
    /// Every top-level bare expression with its resolved type
    pub expressions: Vec<(Span, TypeId)>,
    /// Errors in source order
    pub errors: Vec<CheckError>,
}

impl CheckResult {
    /// Whether the file checked without errors
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Resolved value of an alias
    pub fn alias(&self, name: &str) -> Option<TypeId> {
        self.aliases.get(name).copied()
    }

    /// Display string of an alias value
    pub fn display_alias(&self, name: &str) -> Option<String> {
        self.alias(name).map(|ty| self.ctx.display(ty))
    }

    /// Alias value read back as a relation outcome
    pub fn outcome(&self, name: &str) -> Option<Outcome> {
        self.alias(name).and_then(|ty| Outcome::from_type(&self.ctx, ty))
    }
}

/// Resolves type expressions and evaluates relation invocations
pub struct CaseChecker {
    ctx: TypeContext,

    /// Alias name to (value, declaration span)
    aliases: FxHashMap<String, (TypeId, Span)>,

    expressions: Vec<(Span, TypeId)>,

    /// Checking errors
    errors: Vec<CheckError>,
}

impl CaseChecker {
    /// Create a checker over the given lattice
    pub fn new(ctx: TypeContext) -> Self {
        CaseChecker {
            ctx,
            aliases: FxHashMap::default(),
            expressions: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Check every item of a file in order
    pub fn check_file(mut self, file: &CaseFile) -> CheckResult {
        for item in &file.items {
            self.check_item(item);
        }
        self.finish()
    }

    /// Get the errors collected so far
    pub fn errors(&self) -> &[CheckError] {
        &self.errors
    }

    fn finish(self) -> CheckResult {
        CheckResult {
            ctx: self.ctx,
            aliases: self
                .aliases
                .into_iter()
                .map(|(name, (ty, _))| (name, ty))
                .collect(),
            expressions: self.expressions,
            errors: self.errors,
        }
    }

    fn check_item(&mut self, item: &Item) {
        match item {
            Item::Alias(alias) => self.check_alias(alias),
            Item::Expr(expr) => {
                let ty = self.resolve(expr);
                self.expressions.push((expr.span, ty));
            }
        }
    }

    fn check_alias(&mut self, alias: &TypeAlias) {
        if TYPE_KEYWORDS.contains(&alias.name.as_str()) {
            self.errors.push(CheckError::Syntax {
                message: format!("Type alias name cannot be '{}'", alias.name),
                span: alias.name_span,
            });
            // The value is still checked for its own errors
            self.resolve(&alias.value);
            return;
        }

        let ty = self.resolve(&alias.value);
        debug!(name = %alias.name, ty = %self.ctx.display(ty), "alias");

        if let Some(&(_, original)) = self.aliases.get(&alias.name) {
            self.errors.push(CheckError::DuplicateAlias {
                name: alias.name.clone(),
                span: alias.name_span,
                original,
            });
            return;
        }
        self.aliases.insert(alias.name.clone(), (ty, alias.name_span));
    }

    /// Resolve a type expression, recording errors on the way
    ///
    /// Anything that fails to resolve becomes `any`.
    fn resolve(&mut self, expr: &TypeExpr) -> TypeId {
        match &expr.kind {
            TypeExprKind::Named { name, args } => self.resolve_named(name, args, expr.span),
            TypeExprKind::Number(value) => {
                let result = self.ctx.number_literal(*value);
                self.or_any(result, expr.span)
            }
            TypeExprKind::BigInt(digits) => {
                let result = self.ctx.bigint_literal(digits);
                self.or_any(result, expr.span)
            }
            TypeExprKind::String(value) => self.ctx.string_literal(value.as_str()),
            TypeExprKind::Union(members) => {
                let members = members.iter().map(|m| self.resolve(m)).collect();
                self.ctx.union_type(members)
            }
            TypeExprKind::Intersection(members) => {
                let members = members.iter().map(|m| self.resolve(m)).collect();
                let result = self.ctx.intersection_type(members);
                self.or_any(result, expr.span)
            }
            TypeExprKind::Array { element, readonly } => {
                let element = self.resolve(element);
                if *readonly {
                    self.ctx.readonly_array_type(element)
                } else {
                    self.ctx.array_type(element)
                }
            }
            TypeExprKind::Tuple { elements, readonly } => {
                let elements = elements.iter().map(|e| self.resolve(e)).collect();
                if *readonly {
                    self.ctx.readonly_tuple_type(elements)
                } else {
                    self.ctx.tuple_type(elements)
                }
            }
            TypeExprKind::Object(properties) => {
                let properties = properties
                    .iter()
                    .map(|prop| {
                        let mut sig = PropertySignature::new(prop.name.as_str(), self.resolve(&prop.ty));
                        if prop.optional {
                            sig = sig.optional();
                        }
                        if prop.readonly {
                            sig = sig.readonly();
                        }
                        sig
                    })
                    .collect();
                let result = self.ctx.object_type(properties);
                self.or_any(result, expr.span)
            }
        }
    }

    fn resolve_named(&mut self, name: &str, args: &[TypeExpr], span: Span) -> TypeId {
        if let Some(ty) = self.keyword(name) {
            return self.without_args(name, ty, args, span);
        }

        if let Some(&(ty, _)) = self.aliases.get(name) {
            return self.without_args(name, ty, args, span);
        }

        let Some(decl) = catalog::lookup(name) else {
            self.errors.push(CheckError::UndefinedName {
                name: name.to_string(),
                span,
            });
            // Arguments are still checked for their own errors
            for arg in args {
                self.resolve(arg);
            }
            return self.ctx.any_type();
        };

        let arg_types: Vec<TypeId> = args.iter().map(|arg| self.resolve(arg)).collect();
        if arg_types.len() != decl.arity {
            self.errors.push(CheckError::ArityMismatch {
                name: name.to_string(),
                expected: decl.arity,
                actual: arg_types.len(),
                span,
            });
            return self.ctx.any_type();
        }

        self.invoke(decl, &arg_types, args, span)
    }

    fn keyword(&mut self, name: &str) -> Option<TypeId> {
        let ty = match name {
            "any" => self.ctx.any_type(),
            "never" => self.ctx.never_type(),
            "unknown" => self.ctx.unknown_type(),
            "boolean" => self.ctx.boolean_type(),
            "true" => self.ctx.boolean_literal(true),
            "false" => self.ctx.boolean_literal(false),
            _ => self.ctx.primitive(PrimitiveType::from_keyword(name)?),
        };
        Some(ty)
    }

    /// Plain names take no type arguments
    fn without_args(&mut self, name: &str, ty: TypeId, args: &[TypeExpr], span: Span) -> TypeId {
        if args.is_empty() {
            return ty;
        }
        for arg in args {
            self.resolve(arg);
        }
        self.errors.push(CheckError::ArityMismatch {
            name: name.to_string(),
            expected: 0,
            actual: args.len(),
            span,
        });
        self.ctx.any_type()
    }

    /// Evaluate a relation whose arity has been checked
    fn invoke(
        &mut self,
        decl: &Declaration,
        types: &[TypeId],
        args: &[TypeExpr],
        span: Span,
    ) -> TypeId {
        match decl.kind {
            DeclarationKind::Assertion => {
                let target = decl.name == "Expect";
                return self.assertion(types[0], args[0].span, target, span);
            }
            DeclarationKind::Aggregator => {
                let target = decl.name == "TrueCases";
                return self.aggregate(types[0], args[0].span, target, span);
            }
            DeclarationKind::Predicate | DeclarationKind::Relation => {}
        }

        let ctx = &mut self.ctx;
        let outcome = match decl.name {
            "IsNever" => Ok(relations::is_never(ctx, types[0])),
            "IsAny" => Ok(relations::is_any(ctx, types[0])),
            "IsUnknown" => Ok(relations::is_unknown(ctx, types[0])),
            "IsUnion" => Ok(relations::is_union(ctx, types[0])),
            "IsTuple" => Ok(relations::is_tuple(ctx, types[0])),
            "Extends" => Ok(relations::extends(ctx, types[0], types[1])),
            "SimpleEqual" => Ok(relations::simple_equal(ctx, types[0], types[1])),
            "Equal" => relations::equal(ctx, types[0], types[1]),
            "NotEqual" => relations::not_equal(ctx, types[0], types[1]),
            name => {
                self.errors.push(CheckError::UndefinedName {
                    name: name.to_string(),
                    span,
                });
                return self.ctx.any_type();
            }
        };

        self.lower(decl.name, outcome, span)
    }

    /// `Expect` / `ExpectFalse`: report a constraint violation at the argument,
    /// then evaluate `Equal<T, target>` regardless
    fn assertion(&mut self, ty: TypeId, arg_span: Span, target: bool, span: Span) -> TypeId {
        if let Err(err) = relations::assertion_constraint(&self.ctx, ty, target) {
            self.errors.push(CheckError::from_type_error(err, arg_span));
        }
        let literal = self.ctx.boolean_literal(target);
        let outcome = relations::equal(&mut self.ctx, ty, literal);
        self.lower(if target { "Expect" } else { "ExpectFalse" }, outcome, span)
    }

    /// `TrueCases` / `FalseCases`: same shape as [`Self::assertion`] with the
    /// fold as the result
    fn aggregate(&mut self, cases: TypeId, arg_span: Span, target: bool, span: Span) -> TypeId {
        if let Err(err) = relations::cases_constraint(&mut self.ctx, cases, target) {
            self.errors.push(CheckError::from_type_error(err, arg_span));
        }
        let outcome = relations::fold_cases(&mut self.ctx, cases, target);
        self.lower(if target { "TrueCases" } else { "FalseCases" }, outcome, span)
    }

    fn lower(&mut self, name: &str, outcome: Result<Outcome, TypeError>, span: Span) -> TypeId {
        match outcome {
            Ok(outcome) => {
                trace!(name, %outcome, at = %span, "invocation");
                outcome.into_type(&self.ctx)
            }
            Err(err) => {
                self.errors.push(CheckError::from_type_error(err, span));
                self.ctx.any_type()
            }
        }
    }

    fn or_any(&mut self, result: Result<TypeId, TypeError>, span: Span) -> TypeId {
        match result {
            Ok(ty) => ty,
            Err(err) => {
                self.errors.push(CheckError::from_type_error(err, span));
                self.ctx.any_type()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_aliases_resolve_in_order() {
        crate::test_utils::init_test_logging();
        let result = check_source("type A = 1 | 2;\ntype B = A | 3;\ntype C = IsUnion<B>;");

        assert!(result.is_ok(), "{:?}", result.errors);
        assert_eq!(result.display_alias("B").as_deref(), Some("1 | 2 | 3"));
        assert_eq!(result.outcome("C"), Some(Outcome::True));
    }

    #[test]
    fn test_relation_results_are_outcomes() {
        let result = check_source(
            "type E = Extends<1 | 2, 1>;\n\
             type N = SimpleEqual<never, 1>;\n\
             type Q = Equal<1, number>;",
        );

        assert_eq!(result.outcome("E"), Some(Outcome::Boolean));
        assert_eq!(result.outcome("N"), Some(Outcome::Never));
        assert_eq!(result.outcome("Q"), Some(Outcome::False));
    }

    #[test]
    fn test_undefined_name_becomes_any() {
        let result = check_source("type A = Missing<1>;\ntype B = IsAny<A>;");

        assert_eq!(
            result.errors,
            vec![CheckError::UndefinedName {
                name: "Missing".to_string(),
                span: Span::new(9, 19, 1, 10),
            }]
        );
        assert_eq!(result.outcome("B"), Some(Outcome::True));
    }

    #[test]
    fn test_arity_mismatch() {
        let result = check_source("type A = Equal<1>;\ntype B = number<1>;");

        assert_eq!(result.errors.len(), 2);
        assert!(matches!(
            &result.errors[0],
            CheckError::ArityMismatch { name, expected: 2, actual: 1, .. } if name == "Equal"
        ));
        assert!(matches!(
            &result.errors[1],
            CheckError::ArityMismatch { expected: 0, actual: 1, .. }
        ));
        assert_eq!(result.alias("A"), Some(TypeContext::ANY));
    }

    #[test]
    fn test_duplicate_alias_keeps_first() {
        let result = check_source("type A = 1;\ntype A = 2;");

        assert!(matches!(
            &result.errors[..],
            [CheckError::DuplicateAlias { original, .. }] if original.line == 1
        ));
        assert_eq!(result.display_alias("A").as_deref(), Some("1"));
    }

    #[test]
    fn test_failed_assertion_still_evaluates() {
        let result = check_source("type A = Expect<boolean>;");

        assert_eq!(
            result.errors,
            vec![CheckError::Assertion {
                expected: "true".to_string(),
                actual: "boolean".to_string(),
                span: Span::new(16, 23, 1, 17),
            }]
        );
        assert_eq!(result.outcome("A"), Some(Outcome::False));
    }

    #[test]
    fn test_keyword_alias_name_rejected() {
        let result = check_source("type number = 1;");
        assert!(matches!(&result.errors[..], [CheckError::Syntax { .. }]));
        assert!(result.alias("number").is_none());
    }

    #[test]
    fn test_syntax_errors_skip_evaluation() {
        let result = check_source("type A = Expect<false>;\ntype B = [1;");
        assert_eq!(result.errors.len(), 1);
        assert!(matches!(result.errors[0], CheckError::Syntax { .. }));
        assert!(result.aliases.is_empty());
    }

    #[test]
    fn test_loose_null_checks() {
        let config = ProbeConfig::from_str("strict-null-checks = false").unwrap();
        let result = check_source_with_config("type A = Extends<null, number>;", config);
        assert_eq!(result.outcome("A"), Some(Outcome::True));
    }
}
