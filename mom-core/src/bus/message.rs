//! Message type carried by the bus

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{self, Write};

/// Key/value payload attached to a message. Keys keep insertion order.
pub type Payload = Map<String, Value>;

/// A single published event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Topic the message is published on
    pub topic: String,
    /// Arbitrary payload
    pub payload: Payload,
    /// Creation time, unset unless stamping is enabled on the bus
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Message {
    /// Create a new message
    pub fn new(topic: impl Into<String>, payload: Payload) -> Self {
        Self {
            topic: topic.into(),
            payload,
            timestamp: None,
        }
    }

    /// Add a payload entry
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    /// Set the timestamp
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The topic is interpolated verbatim; only the payload is repr'd.
        write!(f, "Message(topic='{}', data=", self.topic)?;
        write_py_dict(f, &self.payload)?;
        f.write_char(')')
    }
}

/// Render a payload the way Python's `repr` renders a dict.
pub fn payload_repr(payload: &Payload) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_py_dict(&mut out, payload);
    out
}

fn write_py_dict<W: Write>(w: &mut W, map: &Payload) -> fmt::Result {
    w.write_char('{')?;
    for (i, (key, value)) in map.iter().enumerate() {
        if i > 0 {
            w.write_str(", ")?;
        }
        write_py_str(w, key)?;
        w.write_str(": ")?;
        write_py_value(w, value)?;
    }
    w.write_char('}')
}

fn write_py_value<W: Write>(w: &mut W, value: &Value) -> fmt::Result {
    match value {
        Value::Null => w.write_str("None"),
        Value::Bool(true) => w.write_str("True"),
        Value::Bool(false) => w.write_str("False"),
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                write!(w, "{}", n)
            } else {
                write_py_float(w, n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::String(s) => write_py_str(w, s),
        Value::Array(items) => {
            w.write_char('[')?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    w.write_str(", ")?;
                }
                write_py_value(w, item)?;
            }
            w.write_char(']')
        }
        Value::Object(map) => write_py_dict(w, map),
    }
}

fn write_py_float<W: Write>(w: &mut W, v: f64) -> fmt::Result {
    // Debug keeps the trailing ".0" and switches to exponent form at the
    // same magnitudes Python does. Python signs the exponent and pads it to
    // two digits.
    let rendered = format!("{:?}", v);
    let Some((mantissa, exponent)) = rendered.split_once('e') else {
        return w.write_str(&rendered);
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    write!(w, "{}e{}{:0>2}", mantissa, sign, digits)
}

fn write_py_str<W: Write>(w: &mut W, s: &str) -> fmt::Result {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };

    w.write_char(quote)?;
    for c in s.chars() {
        match c {
            '\\' => w.write_str("\\\\")?,
            '\n' => w.write_str("\\n")?,
            '\r' => w.write_str("\\r")?,
            '\t' => w.write_str("\\t")?,
            c if c == quote => {
                w.write_char('\\')?;
                w.write_char(c)?;
            }
            c if (c as u32) < 0x20 || c as u32 == 0x7f => write!(w, "\\x{:02x}", c as u32)?,
            c => w.write_char(c)?,
        }
    }
    w.write_char(quote)
}
