//! # Findings and Outcomes
//!
//! Every serialize, validate and extract step reports what it noticed as
//! classified [`Finding`]s. An [`Outcome`] collects the findings of one
//! logical call and decides whether that call succeeded.
//!
//! ## Severity Policy
//!
//! | Severity  | Meaning                                               |
//! |-----------|-------------------------------------------------------|
//! | `Info`    | Non-blocking note                                     |
//! | `Warning` | Content accepted but non-canonical                    |
//! | `Error`   | No usable entity or note was produced                 |
//! | `Fatal`   | Internal fault (collaborator failure, broken schema)  |
//!
//! A call succeeds iff it recorded nothing at `Error` or above.
//!
//! ## Ownership
//!
//! Outcomes are never shared between calls. A component returns its own
//! `Outcome` and the caller folds it in with [`Outcome::merge`].

use serde::{Deserialize, Serialize};

/// Finding severity, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
    Fatal,
}

impl Severity {
    /// Upper-case label used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    /// Returns true if this severity fails the call.
    pub fn is_blocking(&self) -> bool {
        *self >= Severity::Error
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable code identifying what a finding is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FindingCode {
    /// Serialize was asked to encode no entity.
    NullEntity,
    /// Content text does not parse.
    NotWellFormed,
    /// Content parses but is not shaped like an envelope.
    MalformedEnvelope,
    /// Envelope namespace differs from the catalog namespace.
    NamespaceMismatch,
    /// A required element is absent.
    MissingElement,
    /// An element is not declared by the schema.
    UnexpectedElement,
    /// Content shape makes extraction impossible.
    StructuralViolation,
    /// An element's text does not parse as its type.
    InvalidValue,
    /// A referenced record could not be found.
    UnresolvedReference,
    /// A lookup collaborator failed.
    LookupFailed,
    /// The catalog schema cannot be used.
    SchemaUnavailable,
    /// A date was read from one of the legacy text forms.
    LegacyDate,
}

impl FindingCode {
    /// Returns the string code used in reports and logs.
    pub fn code(&self) -> &'static str {
        match self {
            FindingCode::NullEntity => "HMM_NULL_ENTITY",
            FindingCode::NotWellFormed => "HMM_NOT_WELL_FORMED",
            FindingCode::MalformedEnvelope => "HMM_MALFORMED_ENVELOPE",
            FindingCode::NamespaceMismatch => "HMM_NAMESPACE_MISMATCH",
            FindingCode::MissingElement => "HMM_MISSING_ELEMENT",
            FindingCode::UnexpectedElement => "HMM_UNEXPECTED_ELEMENT",
            FindingCode::StructuralViolation => "HMM_STRUCTURAL_VIOLATION",
            FindingCode::InvalidValue => "HMM_INVALID_VALUE",
            FindingCode::UnresolvedReference => "HMM_UNRESOLVED_REFERENCE",
            FindingCode::LookupFailed => "HMM_LOOKUP_FAILED",
            FindingCode::SchemaUnavailable => "HMM_SCHEMA_UNAVAILABLE",
            FindingCode::LegacyDate => "HMM_LEGACY_DATE",
        }
    }

    /// Severity a finding with this code carries unless overridden.
    pub fn default_severity(&self) -> Severity {
        match self {
            FindingCode::LegacyDate => Severity::Info,
            FindingCode::NullEntity
            | FindingCode::NamespaceMismatch
            | FindingCode::MissingElement
            | FindingCode::UnexpectedElement => Severity::Warning,
            FindingCode::NotWellFormed
            | FindingCode::MalformedEnvelope
            | FindingCode::StructuralViolation
            | FindingCode::InvalidValue
            | FindingCode::UnresolvedReference => Severity::Error,
            FindingCode::LookupFailed | FindingCode::SchemaUnavailable => Severity::Fatal,
        }
    }
}

impl std::fmt::Display for FindingCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// One classified diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub code: FindingCode,
    pub message: String,
    /// Location in the content (e.g., `/GasLog/Discounts`), when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Finding {
    /// Create a finding with the code's default severity.
    pub fn new(code: FindingCode, message: impl Into<String>) -> Self {
        Self {
            severity: code.default_severity(),
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Attach a content location.
    pub fn at(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Override the severity.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.code, self.message)?;
        if let Some(path) = &self.path {
            write!(f, " (at {path})")?;
        }
        Ok(())
    }
}

/// Overall verdict of one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Success,
    Warning,
    Error,
    Fatal,
}

/// Ordered findings for one logical operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    findings: Vec<Finding>,
}

impl Outcome {
    /// A fresh, empty outcome.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finding.
    pub fn record(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    /// Record a finding with the code's default severity.
    pub fn report(&mut self, code: FindingCode, message: impl Into<String>) {
        self.record(Finding::new(code, message));
    }

    /// Append another outcome's findings after this one's.
    pub fn merge(&mut self, other: Outcome) {
        self.findings.extend(other.findings);
    }

    /// Append findings produced elsewhere.
    pub fn extend(&mut self, findings: impl IntoIterator<Item = Finding>) {
        self.findings.extend(findings);
    }

    /// True iff nothing at `Error` or above was recorded.
    pub fn success(&self) -> bool {
        !self.findings.iter().any(|f| f.severity.is_blocking())
    }

    /// True if any `Warning` was recorded.
    pub fn has_warning(&self) -> bool {
        self.has(Severity::Warning)
    }

    /// True if any finding at `Error` or above was recorded.
    pub fn has_error(&self) -> bool {
        !self.success()
    }

    /// True if any `Fatal` finding was recorded.
    pub fn has_fatal(&self) -> bool {
        self.has(Severity::Fatal)
    }

    /// True if any finding carries `code`.
    pub fn has_code(&self, code: FindingCode) -> bool {
        self.findings.iter().any(|f| f.code == code)
    }

    /// The most severe recorded severity.
    pub fn highest(&self) -> Option<Severity> {
        self.findings.iter().map(|f| f.severity).max()
    }

    /// Collapse the findings into one verdict.
    pub fn verdict(&self) -> Verdict {
        match self.highest() {
            None | Some(Severity::Info) => Verdict::Success,
            Some(Severity::Warning) => Verdict::Warning,
            Some(Severity::Error) => Verdict::Error,
            Some(Severity::Fatal) => Verdict::Fatal,
        }
    }

    /// Recorded findings in order.
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Consume the outcome, returning its findings.
    pub fn into_findings(self) -> Vec<Finding> {
        self.findings
    }

    /// Number of findings.
    pub fn len(&self) -> usize {
        self.findings.len()
    }

    /// True if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    fn has(&self, severity: Severity) -> bool {
        self.findings.iter().any(|f| f.severity == severity)
    }
}

impl FromIterator<Finding> for Outcome {
    fn from_iter<I: IntoIterator<Item = Finding>>(iter: I) -> Self {
        Self {
            findings: iter.into_iter().collect(),
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, finding) in self.findings.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{finding}")?;
        }
        Ok(())
    }
}

/// A value (possibly absent) together with the outcome that produced it.
///
/// Callers must check [`Reported::success`] before trusting `value`.
#[derive(Debug, Clone)]
pub struct Reported<T> {
    pub value: Option<T>,
    pub outcome: Outcome,
}

impl<T> Reported<T> {
    /// Pair a value with its outcome.
    pub fn new(value: Option<T>, outcome: Outcome) -> Self {
        Self { value, outcome }
    }

    /// No value, with the findings explaining why.
    pub fn rejected(outcome: Outcome) -> Self {
        Self {
            value: None,
            outcome,
        }
    }

    /// True iff the outcome recorded nothing blocking.
    pub fn success(&self) -> bool {
        self.outcome.success()
    }

    /// The value if the call succeeded, otherwise the outcome.
    pub fn into_result(self) -> Result<Option<T>, Outcome> {
        if self.outcome.success() {
            Ok(self.value)
        } else {
            Err(self.outcome)
        }
    }

    /// Transform the value, keeping the outcome.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reported<U> {
        Reported {
            value: self.value.map(f),
            outcome: self.outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_outcome_is_success() {
        let outcome = Outcome::new();
        assert!(outcome.success());
        assert!(!outcome.has_warning());
        assert!(!outcome.has_error());
        assert_eq!(outcome.verdict(), Verdict::Success);
    }

    #[test]
    fn warnings_do_not_block() {
        let mut outcome = Outcome::new();
        outcome.report(FindingCode::MissingElement, "missing <Maker>");
        assert!(outcome.success());
        assert!(outcome.has_warning());
        assert_eq!(outcome.verdict(), Verdict::Warning);
    }

    #[test]
    fn errors_and_fatals_block() {
        let mut outcome = Outcome::new();
        outcome.report(FindingCode::NotWellFormed, "bad");
        assert!(!outcome.success());
        assert!(outcome.has_error());
        assert!(!outcome.has_fatal());

        outcome.report(FindingCode::LookupFailed, "store offline");
        assert!(outcome.has_fatal());
        assert_eq!(outcome.verdict(), Verdict::Fatal);
    }

    #[test]
    fn merge_appends_in_order_and_recomputes() {
        let mut caller = Outcome::new();
        caller.report(FindingCode::LegacyDate, "<Date> uses legacy-us form");

        let mut callee = Outcome::new();
        callee.report(FindingCode::UnexpectedElement, "extra <Trim>");
        callee.report(FindingCode::UnresolvedReference, "no discount 9");

        assert!(caller.success());
        caller.merge(callee);
        assert_eq!(caller.len(), 3);
        assert_eq!(caller.findings()[1].code, FindingCode::UnexpectedElement);
        assert!(!caller.success());
        assert_eq!(caller.highest(), Some(Severity::Error));
    }

    #[test]
    fn default_severities() {
        assert_eq!(FindingCode::NullEntity.default_severity(), Severity::Warning);
        assert_eq!(FindingCode::StructuralViolation.default_severity(), Severity::Error);
        assert_eq!(FindingCode::LookupFailed.default_severity(), Severity::Fatal);
        assert_eq!(FindingCode::LegacyDate.default_severity(), Severity::Info);
        assert!(Severity::Fatal > Severity::Error);
    }

    #[test]
    fn finding_display_includes_code_and_path() {
        let finding = Finding::new(FindingCode::MissingElement, "missing <Maker>").at("/Automobile");
        let display = finding.to_string();
        assert!(display.starts_with("[WARNING] HMM_MISSING_ELEMENT"));
        assert!(display.contains("(at /Automobile)"));
    }

    #[test]
    fn reported_into_result() {
        let ok: Reported<u8> = Reported::new(Some(1), Outcome::new());
        assert_eq!(ok.into_result().unwrap(), Some(1));

        let mut outcome = Outcome::new();
        outcome.report(FindingCode::InvalidValue, "nope");
        let failed: Reported<u8> = Reported::new(Some(1), outcome);
        assert!(failed.into_result().is_err());
    }
}
