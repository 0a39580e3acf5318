use config_bindr::{Bindable, ConfigError, MemorySink, NullSink, Source};
use std::env;
use std::error::Error;
use std::fs;

#[derive(Default, Bindable)]
struct RenderConfig {
    #[bind(rename = "RENDER_EnvInt")]
    env_int: i64,
    #[bind(rename = "RENDER_EnvFloat")]
    env_float: f32,
}

#[derive(Default, Bindable)]
struct NoteConfig {
    #[bind(rename = "NOTE_PORT")]
    port: u16,
    #[bind(rename = "NOTE_BAD")]
    bad: i64,
}

fn render_failure() -> ConfigError {
    env::set_var("RENDER_EnvInt", "42.42");
    env::set_var("RENDER_EnvFloat", "hello");

    let mut config = RenderConfig::default();
    Source {
        sink: Some(Box::new(NullSink)),
        ..Source::default()
    }
    .load(&mut config)
    .unwrap_err()
}

#[test]
fn test_display_names_every_failed_field_in_discovery_order() {
    colored::control::set_override(false);

    let output = render_failure().to_string();
    assert!(output.contains("configuration failed with 2 error(s):"));

    let int_pos = output.find("RENDER_EnvInt").unwrap();
    let float_pos = output.find("RENDER_EnvFloat").unwrap();
    assert!(int_pos < float_pos);
}

#[test]
fn test_display_is_deterministic() {
    colored::control::set_override(false);

    assert_eq!(render_failure().to_string(), render_failure().to_string());
}

#[test]
fn test_field_error_chains_to_underlying_cause() {
    let err = render_failure();
    let field = &err.fields[0];

    let failure = field.source().expect("FieldError exposes its cause");
    let decode = failure.source().expect("BindFailure exposes the decoder error");
    assert!(decode.is::<serde_json::Error>());
}

#[test]
fn test_config_error_is_a_std_error() {
    let err: Box<dyn Error> = Box::new(render_failure());
    assert!(!err.to_string().is_empty());
}

#[test]
fn test_memory_sink_sees_one_note_per_event() {
    env::set_var("NOTE_PORT", "8080");
    env::set_var("NOTE_BAD", "nope");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"NOTE_PORT": 1}"#).unwrap();

    // A clone shares the buffer, so the notes survive the consumed Source
    let sink = MemorySink::default();
    let mut config = NoteConfig::default();
    let result = Source {
        file_path: path.to_str().unwrap().to_string(),
        sink: Some(Box::new(sink.clone())),
        ..Source::default()
    }
    .load(&mut config);

    assert!(result.is_err());
    assert_eq!(config.port, 8080);

    let lines = sink.lines();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains(path.to_str().unwrap()));
    assert!(lines[1].contains("NOTE_PORT"));
    assert!(lines[2].contains("failed to parse env NOTE_BAD"));
}
