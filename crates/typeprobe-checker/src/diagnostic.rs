//! Diagnostic infrastructure for error reporting
//!
//! Turns [`CheckError`]s into codespan diagnostics with stable error codes,
//! rendered to a terminal, to plain text or to JSON.

use codespan_reporting::diagnostic::{Diagnostic as CsDiagnostic, Label, LabelStyle, Severity};
use codespan_reporting::files::{Files, SimpleFiles};
use codespan_reporting::term;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use termcolor::{Buffer, ColorChoice, StandardStream};
use typeprobe_types::TypeError;

use crate::error::CheckError;
use crate::token::Span;

/// Error code for a diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorCode(pub &'static str);

impl ErrorCode {
    /// The code as printed, e.g. "E2344"
    pub fn as_str(&self) -> &str {
        self.0
    }
}

/// A diagnostic message with source code context
pub struct Diagnostic {
    /// The underlying codespan diagnostic
    inner: CsDiagnostic<usize>,
    /// Error code (e.g., "E2344")
    code: Option<ErrorCode>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            inner: CsDiagnostic::new(severity).with_message(message),
            code: None,
        }
    }

    /// Create an error diagnostic
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a note diagnostic
    pub fn note(message: impl Into<String>) -> Self {
        Self::new(Severity::Note, message)
    }

    /// Set the error code
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.inner = self.inner.with_code(code.0);
        self.code = Some(code);
        self
    }

    /// Add a primary label (main error location)
    pub fn with_primary_label(mut self, file_id: usize, span: Span, message: impl Into<String>) -> Self {
        let label = Label::primary(file_id, span.start..span.end).with_message(message);
        self.inner.labels.push(label);
        self
    }

    /// Add a secondary label (related location)
    pub fn with_secondary_label(mut self, file_id: usize, span: Span, message: impl Into<String>) -> Self {
        let label = Label::secondary(file_id, span.start..span.end).with_message(message);
        self.inner.labels.push(label);
        self
    }

    /// Add a note (additional context)
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.inner.notes.push(note.into());
        self
    }

    /// Add a help suggestion
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.inner.notes.push(format!("help: {}", help.into()));
        self
    }

    /// Create diagnostic from a CheckError
    pub fn from_check_error(error: &CheckError, file_id: usize) -> Self {
        use CheckError::*;

        let diag = Diagnostic::error(error.to_string()).with_code(error_code(error));

        match error {
            Syntax { span, .. } => diag.with_primary_label(file_id, *span, "syntax error"),

            ArityMismatch { expected, span, .. } => {
                let label = if *expected == 0 {
                    "takes no type arguments".to_string()
                } else {
                    format!("expected {} type argument(s)", expected)
                };
                diag.with_primary_label(file_id, *span, label)
            }

            UndefinedName { span, .. } => {
                diag.with_primary_label(file_id, *span, "not found in this file")
                    .with_note("Aliases must be declared before they are used")
            }

            DuplicateAlias { span, original, .. } => diag
                .with_primary_label(file_id, *span, "duplicate declaration")
                .with_secondary_label(file_id, *original, "first declaration here"),

            Assertion { expected, span, .. } => {
                let diag = diag.with_primary_label(file_id, *span, format!("not provably '{}'", expected));
                if expected == "true" {
                    diag.with_help("Use ExpectFalse if this case should be false")
                } else {
                    diag
                }
            }

            AggregateAssertion { span, .. } => diag
                .with_primary_label(file_id, *span, "a case in this tuple failed")
                .with_note("Batch assertions name the whole tuple, not the failing case")
                .with_help("Use Expect or ExpectFalse per case to locate it"),

            Type { span, .. } => diag.with_primary_label(file_id, *span, "in this type"),
        }
    }

    /// Emit the diagnostic to stderr with colors
    pub fn emit(&self, files: &SimpleFiles<String, String>) -> Result<(), codespan_reporting::files::Error> {
        let mut writer = StandardStream::stderr(ColorChoice::Auto);
        let config = term::Config::default();
        term::emit(&mut writer, &config, files, &self.inner)
    }

    /// Render the diagnostic as plain text
    pub fn render(&self, files: &SimpleFiles<String, String>) -> Result<String, codespan_reporting::files::Error> {
        let mut buffer = Buffer::no_color();
        let config = term::Config::default();
        term::emit(&mut buffer, &config, files, &self.inner)?;
        Ok(String::from_utf8_lossy(buffer.as_slice()).into_owned())
    }

    /// Get the error code, if set
    pub fn code(&self) -> Option<&ErrorCode> {
        self.code.as_ref()
    }

    /// Get the underlying codespan diagnostic (for testing/custom rendering)
    pub fn inner(&self) -> &CsDiagnostic<usize> {
        &self.inner
    }

    /// Convert to JSON representation for IDE integration
    pub fn to_json(&self, files: &SimpleFiles<String, String>) -> Result<String, serde_json::Error> {
        let json_diag = JsonDiagnostic::from_diagnostic(self, files);
        serde_json::to_string_pretty(&json_diag)
    }
}

/// JSON representation of a diagnostic for IDE integration
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonDiagnostic {
    /// Error code (e.g., "E2344")
    pub code: Option<String>,
    /// Severity level
    pub severity: String,
    /// Main error message
    pub message: String,
    /// Source locations with labels
    pub labels: Vec<JsonLabel>,
    /// Additional notes and help
    pub notes: Vec<String>,
}

/// JSON representation of a diagnostic label
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonLabel {
    /// File path
    pub file: String,
    /// Start line (1-indexed)
    pub start_line: usize,
    /// Start column (1-indexed)
    pub start_column: usize,
    /// End line (1-indexed)
    pub end_line: usize,
    /// End column (1-indexed)
    pub end_column: usize,
    /// Label message
    pub message: Option<String>,
    /// Label style (primary or secondary)
    pub style: String,
}

impl JsonDiagnostic {
    /// Convert a Diagnostic to JSON representation
    pub fn from_diagnostic(diag: &Diagnostic, files: &SimpleFiles<String, String>) -> Self {
        let severity = match diag.inner.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
            Severity::Help => "help",
            Severity::Bug => "bug",
        };

        let labels = diag
            .inner
            .labels
            .iter()
            .filter_map(|label| {
                let file = files.get(label.file_id).ok()?;
                let start = file.location((), label.range.start).ok()?;
                let end = file.location((), label.range.end).ok()?;

                Some(JsonLabel {
                    file: file.name().to_string(),
                    start_line: start.line_number,
                    start_column: start.column_number,
                    end_line: end.line_number,
                    end_column: end.column_number,
                    message: Some(label.message.clone()),
                    style: match label.style {
                        LabelStyle::Primary => "primary",
                        LabelStyle::Secondary => "secondary",
                    }
                    .to_string(),
                })
            })
            .collect();

        JsonDiagnostic {
            code: diag.code.as_ref().map(|c| c.0.to_string()),
            severity: severity.to_string(),
            message: diag.inner.message.clone(),
            labels,
            notes: diag.inner.notes.clone(),
        }
    }
}

/// Get error code for a CheckError
pub fn error_code(error: &CheckError) -> ErrorCode {
    use CheckError::*;

    match error {
        Syntax { .. } => ErrorCode("E1001"),
        DuplicateAlias { .. } => ErrorCode("E2300"),
        UndefinedName { .. } => ErrorCode("E2304"),
        ArityMismatch { .. } => ErrorCode("E2314"),
        Assertion { .. } => ErrorCode("E2344"),
        AggregateAssertion { .. } => ErrorCode("E2345"),
        Type {
            error: TypeError::UnionTooComplex { .. },
            ..
        } => ErrorCode("E2590"),
        Type { .. } => ErrorCode("E2000"),
    }
}

/// Helper to create a SimpleFiles instance from source code
pub fn create_files(path: impl Into<PathBuf>, source: impl Into<String>) -> SimpleFiles<String, String> {
    let mut files = SimpleFiles::new();
    files.add(path.into().display().to_string(), source.into());
    files
}

/// Render every error of a checked file as plain text, in order
pub fn render_errors(
    path: impl Into<PathBuf>,
    source: &str,
    errors: &[CheckError],
) -> Result<String, codespan_reporting::files::Error> {
    let files = create_files(path, source);
    let mut out = String::new();
    for error in errors {
        out.push_str(&Diagnostic::from_check_error(error, 0).render(&files)?);
    }
    Ok(out)
}
