//! Formula engine error types

use crate::{ErrorCode, SourceLocation, Span};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Error - the formula cannot be saved or evaluated
    Error,
    /// Warning - potential issue but can continue
    Warning,
    /// Information - informational message
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// A diagnostic message with location and context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity level
    pub severity: Severity,
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Source location within the formula text
    pub location: Option<SourceLocation>,
    /// Additional context or help
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            location: None,
            help: None,
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Set the span (converts to location using provided source)
    pub fn with_span(mut self, span: Span, source: &str) -> Self {
        self.location = Some(SourceLocation::from_span(span, source));
        self
    }

    /// Set help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Render with terminal colors
    #[cfg(feature = "colored")]
    pub fn render_colored(&self) -> String {
        use colored::Colorize;

        let severity = match self.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
            Severity::Info => "info".cyan().bold(),
        };
        let mut out = format!("{severity}[{}]: {}", self.code, self.message);
        if let Some(loc) = &self.location {
            out.push_str(&format!(" at {loc}"));
        }
        if let Some(help) = &self.help {
            out.push_str(&format!("\n  {} {help}", "help:".green()));
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} - {}", self.severity, self.code, self.message)?;
        if let Some(loc) = &self.location {
            write!(f, " at {}", loc)?;
        }
        Ok(())
    }
}

/// Main formula engine error type for authoring-time failures
///
/// Runtime per-formula failures use the eval crate's `EvalError` instead;
/// they are captured per field and never abort a recalculation pass.
#[derive(Debug, Clone, Error)]
pub enum FormulaError {
    /// Parse error (malformed formula text)
    #[error("{code}: {message}")]
    Parse {
        code: ErrorCode,
        message: String,
        expression: String,
        location: Option<SourceLocation>,
    },

    /// Validation error (self-reference, cycles, limits)
    #[error("{code}: {message}")]
    Validation {
        code: ErrorCode,
        message: String,
        /// Ordered variable names forming the cycle, when the error is a cycle
        cycle: Option<Vec<String>>,
    },
}

impl FormulaError {
    /// Create a parse error
    pub fn parse(
        code: ErrorCode,
        message: impl Into<String>,
        expression: impl Into<String>,
    ) -> Self {
        Self::Parse {
            code,
            message: message.into(),
            expression: expression.into(),
            location: None,
        }
    }

    /// Create a parse error with location
    pub fn parse_at(
        code: ErrorCode,
        message: impl Into<String>,
        expression: impl Into<String>,
        location: SourceLocation,
    ) -> Self {
        Self::Parse {
            code,
            message: message.into(),
            expression: expression.into(),
            location: Some(location),
        }
    }

    /// Create a validation error
    pub fn validation(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Validation {
            code,
            message: message.into(),
            cycle: None,
        }
    }

    /// Create a cycle validation error carrying the cycle path
    pub fn cycle(code: ErrorCode, message: impl Into<String>, path: Vec<String>) -> Self {
        Self::Validation {
            code,
            message: message.into(),
            cycle: Some(path),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Parse { code, .. } => *code,
            Self::Validation { code, .. } => *code,
        }
    }

    /// Get the location if available
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            Self::Parse { location, .. } => location.as_ref(),
            Self::Validation { .. } => None,
        }
    }

    /// Get the cycle path if the error is a dependency cycle
    pub fn cycle_path(&self) -> Option<&[String]> {
        match self {
            Self::Validation { cycle, .. } => cycle.as_deref(),
            Self::Parse { .. } => None,
        }
    }

    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::Parse {
                code,
                message,
                location,
                ..
            } => {
                let mut diag = Diagnostic::error(*code, message.clone());
                if let Some(loc) = location {
                    diag = diag.with_location(loc.clone());
                }
                diag
            }
            Self::Validation {
                code,
                message,
                cycle,
            } => {
                let mut diag = Diagnostic::error(*code, message.clone());
                if let Some(path) = cycle {
                    diag = diag.with_help(format!("cycle: {}", path.join(" -> ")));
                }
                diag
            }
        }
    }
}
