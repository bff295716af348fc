//! Tests for value resolution
//!
//! These tests verify:
//! - ValueSpec parsing (literal, @file, stdin)
//! - to_bytes / to_text through codecs
//! - Line patterns and line formats

use std::fs;
use std::io::{Cursor, Write};

use tempfile::{NamedTempFile, TempDir};
use zenoh_cli::codec::{Base64Codec, JsonCodec, TextCodec};
use zenoh_cli::error::CliError;
use zenoh_cli::value::{to_bytes, to_text, LineFormat, LinePattern, ValueSpec};

const KEY: &str = "demo/value";

fn no_stdin() -> Cursor<Vec<u8>> {
    Cursor::new(Vec::new())
}

// =============================================================================
// ValueSpec Tests
// =============================================================================

#[test]
fn test_parse_value_spec() {
    assert_eq!(ValueSpec::parse("hello"), ValueSpec::Literal("hello".to_string()));
    assert_eq!(ValueSpec::parse("-"), ValueSpec::Stdin);
    assert_eq!(
        ValueSpec::parse("@data/payload.json"),
        ValueSpec::File("data/payload.json".into())
    );
    assert_eq!(ValueSpec::parse("--"), ValueSpec::Literal("--".to_string()));
    assert_eq!(ValueSpec::parse(""), ValueSpec::Literal(String::new()));
}

#[test]
fn test_literal_to_bytes() {
    let bytes = to_bytes(&ValueSpec::parse("hello"), KEY, &TextCodec, &mut no_stdin()).unwrap();
    assert_eq!(&bytes[..], b"hello");
}

#[test]
fn test_file_to_bytes() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{{\"a\": 1}}").unwrap();

    let spec = ValueSpec::File(file.path().to_path_buf());
    let bytes = to_bytes(&spec, KEY, &JsonCodec, &mut no_stdin()).unwrap();

    assert_eq!(&bytes[..], b"{\"a\": 1}");
}

#[test]
fn test_read_literal_and_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "from disk").unwrap();

    assert_eq!(ValueSpec::parse("plain").read().unwrap(), "plain");
    assert_eq!(ValueSpec::File(file.path().to_path_buf()).read().unwrap(), "from disk");
}

#[test]
fn test_stdin_to_bytes_reads_everything() {
    let mut stdin = Cursor::new(b"line one\nline two\n".to_vec());
    let bytes = to_bytes(&ValueSpec::Stdin, KEY, &TextCodec, &mut stdin).unwrap();
    assert_eq!(&bytes[..], b"line one\nline two\n");
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let spec = ValueSpec::File(dir.path().join("missing.txt"));

    let err = to_bytes(&spec, KEY, &TextCodec, &mut no_stdin()).unwrap_err();
    assert!(matches!(err, CliError::Io(_)));
}

#[test]
fn test_codec_failure_is_reported() {
    let err = to_bytes(&ValueSpec::parse("{broken"), KEY, &JsonCodec, &mut no_stdin()).unwrap_err();
    assert!(matches!(err, CliError::Codec { ref codec, .. } if codec == "json"));
}

#[test]
fn test_file_with_base64_codec() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("blob.b64");
    fs::write(&path, "AAECAw==\n").unwrap();

    let bytes = to_bytes(&ValueSpec::File(path), KEY, &Base64Codec, &mut no_stdin()).unwrap();
    assert_eq!(&bytes[..], [0, 1, 2, 3]);
}

#[test]
fn test_to_text() {
    assert_eq!(to_text(KEY, b"hi", &TextCodec).unwrap(), "hi");
    assert_eq!(to_text(KEY, b"hi", &Base64Codec).unwrap(), "aGk=");
    assert!(to_text(KEY, b"hi", &JsonCodec).is_err());
}

// =============================================================================
// LinePattern Tests
// =============================================================================

#[test]
fn test_pattern_extracts_key_and_value() {
    let pattern = LinePattern::compile("{key}: {value}").unwrap();
    let fields = pattern.parse("test/line: test_line_value").unwrap();

    assert_eq!(fields.get("key"), Some("test/line"));
    assert_eq!(fields.get("value"), Some("test_line_value"));
}

#[test]
fn test_pattern_ignores_line_endings() {
    let pattern = LinePattern::compile("{key} {value}").unwrap();

    let fields = pattern.parse("a/b 42\n").unwrap();
    assert_eq!(fields.get("value"), Some("42"));

    let fields = pattern.parse("a/b 42\r\n").unwrap();
    assert_eq!(fields.get("value"), Some("42"));
}

#[test]
fn test_pattern_must_match_whole_line() {
    let pattern = LinePattern::compile("[{key}] {value}").unwrap();

    assert!(pattern.parse("no brackets here").is_none());
    assert!(pattern.parse("x [a] b").is_none());

    let fields = pattern.parse("[sensor/1] 21.5 C").unwrap();
    assert_eq!(fields.get("key"), Some("sensor/1"));
    assert_eq!(fields.get("value"), Some("21.5 C"));
}

#[test]
fn test_pattern_first_field_is_lazy() {
    let pattern = LinePattern::compile("{key}:{value}").unwrap();
    let fields = pattern.parse("a:b:c").unwrap();

    assert_eq!(fields.get("key"), Some("a"));
    assert_eq!(fields.get("value"), Some("b:c"));
}

#[test]
fn test_pattern_anonymous_and_escaped_fields() {
    let pattern = LinePattern::compile("{} {{{value}}}").unwrap();

    assert!(!pattern.has_field("key"));
    assert!(pattern.has_field("value"));

    let fields = pattern.parse("12:00:01 {payload}").unwrap();
    assert_eq!(fields.get("value"), Some("payload"));
}

#[test]
fn test_pattern_literals_ignore_case() {
    let pattern = LinePattern::compile("Key={key} VALUE={value}").unwrap();

    let fields = pattern.parse("key=Room/1 value=Warm").unwrap();

    assert_eq!(fields.get("key"), Some("Room/1"));
    assert_eq!(fields.get("value"), Some("Warm"));
}

#[test]
fn test_pattern_escapes_regex_metacharacters() {
    let pattern = LinePattern::compile("{key}.*{value}").unwrap();

    assert!(pattern.parse("a/bXXc").is_none());
    let fields = pattern.parse("a/b.*c").unwrap();
    assert_eq!(fields.get("key"), Some("a/b"));
}

#[test]
fn test_invalid_patterns_are_rejected() {
    for bad in ["{key", "key}", "{1st}", "{key}{key}", "{a b}"] {
        assert!(
            matches!(LinePattern::compile(bad), Err(CliError::Pattern(_))),
            "pattern {:?} should be rejected",
            bad
        );
    }
}

// =============================================================================
// LineFormat Tests
// =============================================================================

#[test]
fn test_format_renders_key_and_value() {
    let format = LineFormat::parse("{key}: {value}").unwrap();
    assert_eq!(format.render("test/topic", "hello world"), "test/topic: hello world");
}

#[test]
fn test_format_strips_trailing_whitespace() {
    let format = LineFormat::parse("{value}").unwrap();
    assert_eq!(format.render("k", "value \n\n"), "value");
}

#[test]
fn test_format_literal_braces() {
    let format = LineFormat::parse("{{{key}}} = {value}").unwrap();
    assert_eq!(format.render("a/b", "1"), "{a/b} = 1");
}

#[test]
fn test_format_rejects_unknown_fields() {
    assert!(matches!(LineFormat::parse("{timestamp} {value}"), Err(CliError::Pattern(_))));
    assert!(LineFormat::parse("{}").is_err());
}

#[test]
fn test_default_format_is_value() {
    assert_eq!(LineFormat::default(), LineFormat::parse("{value}").unwrap());
}
