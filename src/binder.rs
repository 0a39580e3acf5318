use crate::Bindable;
use crate::error::{BindFailure, ConfigError, FieldError};
use crate::sink::{DiagnosticSink, StderrSink};
use serde::de::DeserializeOwned;
use std::{env, fs};

/// Where to load from: a JSON file, prefixed environment variables, or both
///
/// A `Source` is built per load call and consumed by [`Source::load`].
/// Defaults are all-empty: no file, no prefix, notes to stderr.
///
/// # Example
/// ```no_run
/// use config_bindr::{Bindable, Source};
///
/// #[derive(Default, Bindable)]
/// struct AppConfig {
///     host: String,
///     port: u16,
/// }
///
/// let mut config = AppConfig::default();
/// Source {
///     env_prefix: "APP_".to_string(),
///     file_path: "config.json".to_string(),
///     ..Source::default()
/// }
/// .load(&mut config)
/// .unwrap();
/// ```
pub struct Source {
    /// Prepended verbatim to each field name to form the lookup key
    pub env_prefix: String,
    /// Path of the JSON file; empty means no file phase
    pub file_path: String,
    /// Destination for progress notes; stderr when unset
    pub sink: Option<Box<dyn DiagnosticSink>>,
}

impl Default for Source {
    fn default() -> Self {
        Self {
            env_prefix: String::new(),
            file_path: String::new(),
            sink: None,
        }
    }
}

impl Source {
    /// Populate `target` from the file, then overlay environment values
    ///
    /// Runs both phases to completion regardless of failures: every field
    /// that can bind does bind, and every failure is collected. Returns
    /// `Err` exactly when at least one [`FieldError`] was recorded.
    pub fn load<T: Bindable>(mut self, target: &mut T) -> Result<(), ConfigError> {
        let _ = dotenvy::dotenv();

        let mut default_sink = StderrSink;
        let sink: &mut dyn DiagnosticSink = match self.sink.as_deref_mut() {
            Some(sink) => sink,
            None => &mut default_sink,
        };

        let mut errors = Vec::new();

        // File phase. An empty path skips this silently; a path that does
        // not resolve is an error.
        if !self.file_path.is_empty() {
            match fs::read(&self.file_path) {
                Ok(bytes) => match serde_json::from_slice(&bytes) {
                    Ok(doc) => match target.merge_document(doc) {
                        Ok(()) => sink.note(&format!("config-bindr: {}", self.file_path)),
                        Err(err) => {
                            sink.note(&format!(
                                "config-bindr: failed to decode file: {}",
                                self.file_path
                            ));
                            errors.push(FieldError::new(
                                self.file_path.as_str(),
                                BindFailure::Decode(err),
                            ));
                        }
                    },
                    Err(err) => {
                        sink.note(&format!(
                            "config-bindr: failed to parse file: {}",
                            self.file_path
                        ));
                        errors.push(FieldError::new(self.file_path.as_str(), BindFailure::Decode(err)));
                    }
                },
                Err(err) => {
                    sink.note(&format!(
                        "config-bindr: {} (not readable)",
                        self.file_path
                    ));
                    errors.push(FieldError::new(self.file_path.as_str(), BindFailure::Read(err)));
                }
            }
        }

        // Environment phase, overwriting file values field by field
        let mut overlay = EnvOverlay {
            prefix: &self.env_prefix,
            sink,
            errors: &mut errors,
        };
        target.overlay_env(&mut overlay);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::new(errors))
        }
    }
}

/// Load with default options: environment only, no prefix
pub fn load<T: Bindable>(target: &mut T) -> Result<(), ConfigError> {
    Source::default().load(target)
}

/// Per-field environment binder handed to [`Bindable::overlay_env`]
///
/// Derived implementations call [`bind_text`](EnvOverlay::bind_text) or
/// [`bind_decoded`](EnvOverlay::bind_decoded) once per field, in
/// declaration order.
pub struct EnvOverlay<'a> {
    prefix: &'a str,
    sink: &'a mut dyn DiagnosticSink,
    errors: &'a mut Vec<FieldError>,
}

impl EnvOverlay<'_> {
    /// Bind a string field: the raw environment value, verbatim
    pub fn bind_text(&mut self, name: &str, slot: &mut String) {
        let key = self.key(name);
        if let Some(raw) = lookup(&key) {
            *slot = raw;
            self.sink.note(&format!("config-bindr: {}", key));
        }
    }

    /// Bind any other field: the environment value as a JSON literal
    ///
    /// A decode failure records one error and leaves the prior value in
    /// place; the overlay moves on to the next field.
    pub fn bind_decoded<T: DeserializeOwned>(&mut self, name: &str, slot: &mut T) {
        let key = self.key(name);
        if let Some(raw) = lookup(&key) {
            match serde_json::from_str(&raw) {
                Ok(decoded) => {
                    *slot = decoded;
                    self.sink.note(&format!("config-bindr: {}", key));
                }
                Err(err) => {
                    self.sink
                        .note(&format!("config-bindr: failed to parse env {}", name));
                    self.errors.push(FieldError::new(name, BindFailure::Decode(err)));
                }
            }
        }
    }

    fn key(&self, name: &str) -> String {
        // Exact concatenation, no separator, no case transformation
        format!("{}{}", self.prefix, name)
    }
}

/// An unset, empty, or non-unicode variable counts as absent
fn lookup(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(raw) if !raw.is_empty() => Some(raw),
        _ => None,
    }
}
