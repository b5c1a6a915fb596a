use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use serde_json::Value;
use std::borrow::Cow;

pub mod reconcile;

pub use reconcile::{apply, coerce_score, normalize_score, rank, reconcile, Coerced, Outcome};

pub const DEFAULT_USERNAME: &str = "Unknown";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;

/// A player's best score as stored and served.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ScoreRecord {
    pub username: String,
    pub score: f64,
}

impl ScoreRecord {
    pub fn new(username: impl Into<String>, score: f64) -> Self {
        Self {
            username: username.into(),
            score,
        }
    }
}

/// Every player's best score, at most one record per username.
///
/// Records keep their insertion order. Mutation goes through
/// [`reconcile`] so the uniqueness invariant cannot be bypassed.
#[derive(Debug, Serialize, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct Leaderboard {
    records: Vec<ScoreRecord>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    pub fn get(&self, username: &str) -> Option<&ScoreRecord> {
        self.records.iter().find(|r| r.username == username)
    }

    fn find_mut(&mut self, username: &str) -> Option<&mut ScoreRecord> {
        self.records.iter_mut().find(|r| r.username == username)
    }

    fn push(&mut self, record: ScoreRecord) {
        self.records.push(record);
    }
}

/// A decoded score submission from a game client.
///
/// Both fields are optional; `score` keeps the raw JSON value so that
/// numeric strings and garbage alike reach [`normalize_score`].
#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct Submission {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<Value>,
}

impl Submission {
    pub fn new(username: impl Into<String>, score: impl Into<Value>) -> Self {
        Self {
            username: Some(username.into()),
            score: Some(score.into()),
        }
    }

    /// Extracts the known fields from an arbitrary JSON value.
    ///
    /// Anything that is not an object yields an empty submission, and a
    /// `username` that is not a string is treated as missing.
    pub fn from_json(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };

        Self {
            username: object
                .get("username")
                .and_then(Value::as_str)
                .map(str::to_owned),
            score: object.get("score").cloned(),
        }
    }

    /// Decodes a raw request body. Unparseable bodies become an empty submission.
    ///
    /// A body that only fails because of an unrepresentable number
    /// (`1e400`, `NaN`, `Infinity`) still keeps its username; the bad
    /// value is dropped and later counts as `0.0`.
    pub fn from_body(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(value) => Self::from_json(&value),
            Err(_) => Self::from_lenient_body(body).unwrap_or_default(),
        }
    }

    fn from_lenient_body(body: &[u8]) -> Option<Self> {
        let text = std::str::from_utf8(body).ok()?;
        let text = null_out_non_finite_literals(text);
        let fields: LenientFields = serde_json::from_str(&text).ok()?;

        Some(Self {
            username: fields
                .username
                .and_then(|raw| serde_json::from_str::<String>(raw.get()).ok()),
            score: fields
                .score
                .and_then(|raw| serde_json::from_str::<Value>(raw.get()).ok()),
        })
    }

    /// The username this submission is filed under.
    pub fn resolved_username(&self) -> &str {
        match self.username.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => DEFAULT_USERNAME,
        }
    }
}

/// Top-level fields kept as raw text, so a number serde_json cannot hold
/// only costs that one field.
#[derive(Deserialize)]
struct LenientFields {
    #[serde(default)]
    username: Option<Box<RawValue>>,
    #[serde(default)]
    score: Option<Box<RawValue>>,
}

/// Replaces bare `NaN`, `Infinity` and `-Infinity` tokens outside strings
/// with `null`.
fn null_out_non_finite_literals(text: &str) -> Cow<'_, str> {
    const LITERALS: [&str; 3] = ["-Infinity", "Infinity", "NaN"];

    if !LITERALS.iter().any(|literal| text.contains(literal)) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
        } else if c == '"' {
            in_string = true;
        } else if let Some(literal) = LITERALS.iter().find(|l| rest.starts_with(**l)) {
            out.push_str("null");
            rest = &rest[literal.len()..];
            continue;
        }

        out.push(c);
        rest = &rest[c.len_utf8()..];
    }

    Cow::Owned(out)
}
