//! Parsing of line-delimited JSON observation records into [`Record`].
//!
//! The upstream monitor emits one JSON object per line with a flat key
//! space (`id.orig_h` is a literal field name, not a nested object -
//! this matches the Zeek JSON log convention the original system was
//! built against).

use serde_json::Value;
use thiserror::Error;

/// Recognized log-kind tags from the `_path` field.
///
/// Any `_path` value outside this set causes the record to be silently
/// ignored by the classifier - that is not a parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogKind {
    Conn,
    Ntlm,
    SmbFiles,
    SmbMapping,
    DceRpc,
    Rdp,
    Ssl,
}

impl LogKind {
    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            "conn" => Some(LogKind::Conn),
            "ntlm" => Some(LogKind::Ntlm),
            "smb_files" => Some(LogKind::SmbFiles),
            "smb_mapping" => Some(LogKind::SmbMapping),
            "dce_rpc" => Some(LogKind::DceRpc),
            "rdp" => Some(LogKind::Rdp),
            "ssl" => Some(LogKind::Ssl),
            _ => None,
        }
    }
}

/// A parsed observation record, addresses normalized to one canonical
/// `source`/`destination` pair regardless of which upstream field they
/// arrived on (see SPEC_FULL.md Open Question resolution in C1).
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub log_kind: LogKind,
    pub ts: f64,
    pub source: String,
    pub destination: String,
    pub source_port: u16,
    pub destination_port: u16,
    pub service: Option<String>,
    pub ntlm_response: Option<String>,
    pub path: Option<String>,
    pub status: Option<String>,
    pub endpoint: Option<String>,
    pub cookie: Option<String>,
    pub action: Option<String>,
    pub orig_bytes: Option<u64>,
    pub duration: Option<f64>,
}

/// Outcome of classifying one input line.
pub enum Classification {
    /// Recognized `_path`, all required fields present and well-typed.
    Recognized(Record),
    /// `_path` absent from the recognized set - not an error.
    Ignored,
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("field `{field}` has the wrong type: {reason}")]
    InvalidField {
        field: &'static str,
        reason: &'static str,
    },
}

fn required_str<'a>(v: &'a Value, field: &'static str) -> Result<&'a str, ParseError> {
    v.get(field)
        .ok_or(ParseError::MissingField(field))?
        .as_str()
        .ok_or(ParseError::InvalidField {
            field,
            reason: "expected a string",
        })
}

fn required_f64(v: &Value, field: &'static str) -> Result<f64, ParseError> {
    v.get(field)
        .ok_or(ParseError::MissingField(field))?
        .as_f64()
        .ok_or(ParseError::InvalidField {
            field,
            reason: "expected a number",
        })
}

fn required_port(v: &Value, field: &'static str) -> Result<u16, ParseError> {
    let n = v.get(field).ok_or(ParseError::MissingField(field))?;
    n.as_u64()
        .and_then(|p| u16::try_from(p).ok())
        .ok_or(ParseError::InvalidField {
            field,
            reason: "expected a port number in range 0..65535",
        })
}

fn opt_str(v: &Value, field: &str) -> Option<String> {
    v.get(field).and_then(Value::as_str).map(str::to_owned)
}

fn opt_u64(v: &Value, field: &str) -> Option<u64> {
    v.get(field).and_then(Value::as_u64)
}

fn opt_f64(v: &Value, field: &str) -> Option<f64> {
    v.get(field).and_then(Value::as_f64)
}

/// Parse one line of the input stream.
///
/// Returns `Ok(Classification::Ignored)` for an unrecognized `_path`
/// (no counter, no error - see SPEC_FULL.md C1), `Ok(Classification::Recognized)`
/// for a well-formed recognized record, and `Err(ParseError)` for a
/// malformed recognized-or-unrecognizable line.
pub fn parse_record(line: &str) -> Result<Classification, ParseError> {
    let value: Value = serde_json::from_str(line)?;

    let path = match value.get("_path").and_then(Value::as_str) {
        Some(p) => p,
        None => return Err(ParseError::MissingField("_path")),
    };

    let log_kind = match LogKind::from_path(path) {
        Some(k) => k,
        None => return Ok(Classification::Ignored),
    };

    let ts = required_f64(&value, "ts")?;
    let source = required_str(&value, "id.orig_h")?.to_owned();
    let destination = required_str(&value, "id.resp_h")?.to_owned();
    let source_port = required_port(&value, "id.orig_p")?;
    let destination_port = required_port(&value, "id.resp_p")?;

    Ok(Classification::Recognized(Record {
        log_kind,
        ts,
        source,
        destination,
        source_port,
        destination_port,
        service: opt_str(&value, "service"),
        ntlm_response: opt_str(&value, "ntlm_response"),
        path: opt_str(&value, "path"),
        status: opt_str(&value, "status"),
        endpoint: opt_str(&value, "endpoint"),
        cookie: opt_str(&value, "cookie"),
        action: opt_str(&value, "action"),
        orig_bytes: opt_u64(&value, "orig_bytes"),
        duration: opt_f64(&value, "duration"),
    }))
}
