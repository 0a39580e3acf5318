use colored::Colorize;
use std::fmt;

/// The underlying cause carried by a [`FieldError`]
#[derive(Debug)]
pub enum BindFailure {
    /// The configuration file could not be read
    Read(std::io::Error),
    /// A value could not be decoded into the field's type
    Decode(serde_json::Error),
}

impl fmt::Display for BindFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindFailure::Read(err) => write!(f, "failed to read file: {}", err),
            BindFailure::Decode(err) => write!(f, "invalid value: {}", err),
        }
    }
}

impl std::error::Error for BindFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BindFailure::Read(err) => Some(err),
            BindFailure::Decode(err) => Some(err),
        }
    }
}

/// A single named failure during a load
///
/// `field` is the field name for environment failures and the file path
/// for file-phase failures.
#[derive(Debug)]
pub struct FieldError {
    pub field: String,
    pub failure: BindFailure,
}

impl FieldError {
    pub fn new(field: impl Into<String>, failure: BindFailure) -> Self {
        Self {
            field: field.into(),
            failure,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field.magenta().bold(), self.failure)
    }
}

impl std::error::Error for FieldError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.failure)
    }
}

/// Every failure collected during one load, in discovery order
///
/// Never constructed empty: a load with no failures returns `Ok(())`
/// instead.
#[derive(Debug)]
pub struct ConfigError {
    pub fields: Vec<FieldError>,
}

impl ConfigError {
    pub(crate) fn new(fields: Vec<FieldError>) -> Self {
        debug_assert!(!fields.is_empty());
        Self { fields }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "configuration failed with {} error(s):",
            self.fields.len().to_string().yellow().bold()
        )?;
        for field in &self.fields {
            writeln!(f, "  - {}", field)?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigError {}
