//! Integration tests for diagnostic output
//!
//! Tests the complete diagnostic workflow with actual case files

use typeprobe_checker::{
    check_source, check_source_with_config, create_files, render_errors, CheckError, Diagnostic,
    ErrorCode,
};
use typeprobe_types::ProbeConfig;

#[test]
fn test_assertion_diagnostic() {
    let source = "type A = Expect<boolean>;\n";
    let result = check_source(source);
    assert_eq!(result.errors.len(), 1, "Expected exactly one error");

    let files = create_files("cases.ts", source);
    let diag = Diagnostic::from_check_error(&result.errors[0], 0);
    assert_eq!(diag.code(), Some(&ErrorCode("E2344")));

    let text = diag.render(&files).unwrap();
    assert!(text.contains("error[E2344]: Type 'boolean' does not satisfy the constraint 'true'"));
    assert!(text.contains("cases.ts:1:17"));
    assert!(text.contains("^^^^^^^ not provably 'true'"));
    assert!(text.contains("help: Use ExpectFalse"));

    // Emitting to stderr must not fail either
    let _ = diag.emit(&files);
}

#[test]
fn test_aggregate_diagnostic_names_whole_tuple() {
    let source = "type T = TrueCases<[\n  IsNever<never>,\n  IsNever<1>,\n]>;\n";
    let result = check_source(source);

    let text = render_errors("cases.ts", source, &result.errors).unwrap();
    assert!(text.contains("error[E2345]"));
    assert!(text.contains("Type '[true, false]' does not satisfy the constraint 'readonly true[]'"));
    assert!(text.contains("cases.ts:1:20"));
}

#[test]
fn test_undefined_name_diagnostic() {
    let source = "type A = 1;\ntype B = Equal<A, C>;\n";
    let result = check_source(source);

    let json = Diagnostic::from_check_error(&result.errors[0], 0)
        .to_json(&create_files("cases.ts", source))
        .unwrap();
    assert!(json.contains("\"E2304\""));
    assert!(json.contains("\"start_line\": 2"));
    assert!(json.contains("Cannot find name 'C'"));
}

#[test]
fn test_duplicate_alias_points_at_both() {
    let source = "type A = 1;\ntype A = 2;\n";
    let result = check_source(source);

    let text = render_errors("cases.ts", source, &result.errors).unwrap();
    assert!(text.contains("error[E2300]: Duplicate identifier 'A'"));
    assert!(text.contains("duplicate declaration"));
    assert!(text.contains("first declaration here"));
}

#[test]
fn test_syntax_error_diagnostic() {
    let source = "type A = Expect<;\n";
    let result = check_source(source);

    assert!(matches!(result.errors[..], [CheckError::Syntax { .. }]));
    let text = render_errors("cases.ts", source, &result.errors).unwrap();
    assert!(text.contains("error[E1001]"));
    assert!(text.contains("Expected type, found ';'"));
}

#[test]
fn test_union_limit_diagnostic() {
    let config = ProbeConfig::from_str("[probe]\nmax-union-size = 4\n").unwrap();
    let source = "type A = (1 | 2 | 3) & (4 | 5 | 6);\ntype B = IsAny<A>;\n";
    let result = check_source_with_config(source, config);

    assert_eq!(result.errors.len(), 1);
    let text = render_errors("cases.ts", source, &result.errors).unwrap();
    assert!(text.contains("error[E2590]"));
    assert!(text.contains("(9 > 4)"));
    // The failed intersection continues as `any`
    assert_eq!(result.display_alias("B").as_deref(), Some("true"));
}

#[test]
fn test_every_error_rendered_in_order() {
    let source = "type A = Expect<false>;\ntype B = ExpectFalse<true>;\ntype C = IsTuple<1, 2>;\n";
    let result = check_source(source);

    let lines: Vec<u32> = result.errors.iter().map(|e| e.span().line).collect();
    assert_eq!(lines, vec![1, 2, 3]);

    let text = render_errors("cases.ts", source, &result.errors).unwrap();
    let first = text.find("E2344").unwrap();
    let last = text.find("E2314").unwrap();
    assert!(first < last);
}
