pub mod binder;
pub mod error;
pub mod sink;

// Re-export main types
pub use binder::{EnvOverlay, Source, load};
pub use error::{BindFailure, ConfigError, FieldError};
pub use sink::{DiagnosticSink, MemorySink, NullSink, StderrSink};

// Re-export derive macro
pub use config_bindr_macros::Bindable;

// Generated code decodes through this path; callers may use it too
pub use serde_json;

/// Trait for records whose fields can be populated from a JSON document
/// and from environment variables
///
/// Implemented via `#[derive(Bindable)]`. Both methods walk the fields in
/// declaration order; `#[bind(skip)]` fields are excluded from both.
pub trait Bindable {
    /// Merge the top-level keys of a decoded JSON object into matching
    /// fields. Keys with no matching field are ignored; fields absent from
    /// the document keep their prior value. Returns the first per-key
    /// decode failure, but later keys are still applied.
    fn merge_document(
        &mut self,
        doc: serde_json::Map<String, serde_json::Value>,
    ) -> Result<(), serde_json::Error>;

    /// Overlay environment values onto fields, one lookup per field.
    /// Failures are collected on the overlay, never propagated.
    fn overlay_env(&mut self, overlay: &mut EnvOverlay<'_>);
}
