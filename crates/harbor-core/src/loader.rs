//! Turning a [`SourceId`] into a decoded mapping.
//!
//! Plain sources are read from disk and parsed as YAML. Sources carrying a
//! lookup key, and every secrets source, go through a [`SecretDecoder`]
//! instead; the stock decoder shells out to an external tool that prints JSON.

use crate::error::{HarborError, Result};
use crate::resolve::SourceId;
use crate::tool_runner::ToolRunner;
use crate::value::Mapping;
use serde_json::Value;
use std::path::{Path, PathBuf};

pub const DEFAULT_DECODER: &str = "harbor-decoder";

pub trait SecretDecoder {
    fn decode(&self, path: &Path, lookup_key: Option<&str>) -> Result<Mapping>;
}

/// Decodes by running `<program> -f <path> [-e <lookup_key>]`.
pub struct CommandDecoder<'a> {
    program: PathBuf,
    runner: &'a dyn ToolRunner,
}

impl<'a> CommandDecoder<'a> {
    pub fn new(program: impl Into<PathBuf>, runner: &'a dyn ToolRunner) -> Self {
        Self {
            program: program.into(),
            runner,
        }
    }
}

impl SecretDecoder for CommandDecoder<'_> {
    fn decode(&self, path: &Path, lookup_key: Option<&str>) -> Result<Mapping> {
        let mut args = vec!["-f".to_string(), path.display().to_string()];
        if let Some(key) = lookup_key {
            args.push("-e".to_string());
            args.push(key.to_string());
        }
        let output = self.runner.run(&self.program, &args)?;
        let text = output.stdout_lossy();
        let value: Value = serde_json::from_str(&text).map_err(|e| HarborError::Decode {
            source_id: source_label(path, lookup_key),
            reason: e.to_string(),
        })?;
        into_mapping(value, &source_label(path, lookup_key))
    }
}

pub struct SourceLoader<'a> {
    decoder: &'a dyn SecretDecoder,
}

impl<'a> SourceLoader<'a> {
    pub fn new(decoder: &'a dyn SecretDecoder) -> Self {
        Self { decoder }
    }

    pub fn load(&self, id: &SourceId, force_secret: bool) -> Result<Mapping> {
        if id.lookup_key.is_some() || force_secret {
            return self.decoder.decode(&id.path, id.lookup_key.as_deref());
        }
        let content = std::fs::read_to_string(&id.path)?;
        parse_yaml(&content, &id.to_string())
    }
}

/// Parse a YAML document into a mapping. An empty document is an empty mapping.
pub fn parse_yaml(content: &str, source_id: &str) -> Result<Mapping> {
    let value: Value = serde_yaml::from_str(content).map_err(|e| HarborError::Decode {
        source_id: source_id.to_string(),
        reason: e.to_string(),
    })?;
    into_mapping(value, source_id)
}

fn into_mapping(value: Value, source_id: &str) -> Result<Mapping> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Mapping::new()),
        other => Err(HarborError::Decode {
            source_id: source_id.to_string(),
            reason: format!("expected a mapping at the top level, found {}", kind(&other)),
        }),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

fn source_label(path: &Path, lookup_key: Option<&str>) -> String {
    match lookup_key {
        Some(key) => format!("{}:{key}", path.display()),
        None => path.display().to_string(),
    }
}


#[cfg(test)]
mod tests {
    use super::fake::TableDecoder;
    use super::*;
    use crate::tool_runner::fake::RecordingRunner;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn plain_file_is_parsed_as_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bot.yaml");
        std::fs::write(&path, "tz: UTC\nssh:\n  create_at: /tmp/x\n").unwrap();
        let decoder = TableDecoder::default();
        let loader = SourceLoader::new(&decoder);
        let id = SourceId {
            path,
            lookup_key: None,
        };
        let map = loader.load(&id, false).unwrap();
        assert_eq!(map["ssh"]["create_at"], json!("/tmp/x"));
        assert!(decoder.calls.borrow().is_empty());
    }

    #[test]
    fn empty_file_is_empty_mapping() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.yaml");
        std::fs::write(&path, "").unwrap();
        let decoder = TableDecoder::default();
        let id = SourceId {
            path,
            lookup_key: None,
        };
        assert!(SourceLoader::new(&decoder).load(&id, false).unwrap().is_empty());
    }

    #[test]
    fn malformed_yaml_is_decode_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "a: [unterminated").unwrap();
        let decoder = TableDecoder::default();
        let id = SourceId {
            path,
            lookup_key: None,
        };
        assert!(matches!(
            SourceLoader::new(&decoder).load(&id, false),
            Err(HarborError::Decode { .. })
        ));
    }

    #[test]
    fn top_level_sequence_is_rejected() {
        assert!(matches!(
            parse_yaml("- a\n- b\n", "list.yaml"),
            Err(HarborError::Decode { .. })
        ));
    }

    #[test]
    fn lookup_key_routes_through_decoder() {
        let decoder = TableDecoder::default().with("s.yaml:prod", json!({"token": "t"}));
        let id = SourceId {
            path: PathBuf::from("s.yaml"),
            lookup_key: Some("prod".to_string()),
        };
        let map = SourceLoader::new(&decoder).load(&id, false).unwrap();
        assert_eq!(map["token"], json!("t"));
    }

    #[test]
    fn forced_secret_routes_through_decoder() {
        let decoder = TableDecoder::default().with("s.yaml", json!({"k": 1}));
        let id = SourceId {
            path: PathBuf::from("s.yaml"),
            lookup_key: None,
        };
        SourceLoader::new(&decoder).load(&id, true).unwrap();
        assert_eq!(decoder.calls.borrow().as_slice(), ["s.yaml"]);
    }

    #[test]
    fn command_decoder_passes_flags_and_parses_json() {
        let runner = RecordingRunner::default().respond("harbor-decoder", r#"{"a": {"b": 2}}"#);
        let decoder = CommandDecoder::new(DEFAULT_DECODER, &runner);
        let map = decoder.decode(Path::new("/s/x.yaml"), Some("prod")).unwrap();
        assert_eq!(map["a"]["b"], json!(2));
        assert_eq!(
            runner.calls(),
            vec![(
                "harbor-decoder".to_string(),
                ["-f", "/s/x.yaml", "-e", "prod"].map(str::to_string).to_vec()
            )]
        );
    }

    #[test]
    fn command_decoder_failure_propagates() {
        let runner = RecordingRunner::default().fail("harbor-decoder");
        let decoder = CommandDecoder::new(DEFAULT_DECODER, &runner);
        assert!(matches!(
            decoder.decode(Path::new("x.yaml"), None),
            Err(HarborError::ToolFailed { .. })
        ));
    }

    #[test]
    fn command_decoder_rejects_non_json() {
        let runner = RecordingRunner::default().respond("harbor-decoder", "not json");
        let decoder = CommandDecoder::new(DEFAULT_DECODER, &runner);
        assert!(matches!(
            decoder.decode(Path::new("x.yaml"), None),
            Err(HarborError::Decode { .. })
        ));
    }
}
