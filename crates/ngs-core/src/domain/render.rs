//! Placeholder expansion for template bodies.
//!
//! Grammar, inside otherwise opaque bytes:
//!
//! ```text
//! action  := "{{" ws "." field ( ws "|" ws helper )* ws "}}"
//! field   := [A-Za-z_][A-Za-z0-9_]*
//! helper  := [A-Za-z_][A-Za-z0-9_]*
//! ```
//!
//! Parsing and execution are separate passes: malformed syntax is reported by
//! [`Template::parse`], unknown fields and helpers by [`Template::execute`].
//! Bytes outside actions are copied verbatim, so bodies need not be UTF-8.

use std::ops::Range;

use crate::domain::{entities::parameters::ParameterSet, error::TemplateError};

const OPEN: &[u8] = b"{{";
const CLOSE: &[u8] = b"}}";

type Helper = fn(&str) -> String;

/// The closed set of helpers available to `{{.Field | helper}}`.
const HELPERS: &[(&str, Helper)] = &[("upper", upper)];

fn upper(input: &str) -> String {
    input.to_uppercase()
}

fn lookup_helper(name: &str) -> Option<Helper> {
    HELPERS
        .iter()
        .find(|(helper, _)| *helper == name)
        .map(|(_, f)| *f)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(Range<usize>),
    Action(Action),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Action {
    field: String,
    helpers: Vec<String>,
    line: usize,
}

/// A parsed template body borrowing its source bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template<'a> {
    body: &'a [u8],
    segments: Vec<Segment>,
}

impl<'a> Template<'a> {
    pub fn parse(body: &'a [u8]) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut cursor = 0;

        while let Some(offset) = find(&body[cursor..], OPEN) {
            let open = cursor + offset;
            let line = line_of(body, open);
            if open > cursor {
                segments.push(Segment::Text(cursor..open));
            }

            let inner_start = open + OPEN.len();
            let close = find(&body[inner_start..], CLOSE)
                .map(|o| inner_start + o)
                .ok_or_else(|| TemplateError::Parse {
                    line,
                    message: "unterminated action: missing '}}'".into(),
                })?;

            let inner = std::str::from_utf8(&body[inner_start..close]).map_err(|_| {
                TemplateError::Parse {
                    line,
                    message: "action is not valid UTF-8".into(),
                }
            })?;
            segments.push(Segment::Action(parse_action(inner, line)?));
            cursor = close + CLOSE.len();
        }

        if cursor < body.len() {
            segments.push(Segment::Text(cursor..body.len()));
        }

        Ok(Self { body, segments })
    }

    /// Expand every action against `params`.
    pub fn execute(&self, params: &ParameterSet) -> Result<Vec<u8>, TemplateError> {
        let mut out = Vec::with_capacity(self.body.len());
        for segment in &self.segments {
            match segment {
                Segment::Text(range) => out.extend_from_slice(&self.body[range.clone()]),
                Segment::Action(action) => {
                    let value = evaluate(action, params)?;
                    out.extend_from_slice(value.as_bytes());
                }
            }
        }
        Ok(out)
    }

    /// Field names referenced by the body, in order of appearance.
    pub fn referenced_fields(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Action(a) => Some(a.field.as_str()),
                Segment::Text(_) => None,
            })
            .collect()
    }
}

/// Parse and execute `body` in one step.
pub fn render(body: &[u8], params: &ParameterSet) -> Result<Vec<u8>, TemplateError> {
    Template::parse(body)?.execute(params)
}

fn parse_action(inner: &str, line: usize) -> Result<Action, TemplateError> {
    let parse_err = |message: String| TemplateError::Parse { line, message };

    let mut parts = inner.split('|').map(str::trim);
    let head = parts.next().unwrap_or_default();
    if head.is_empty() {
        return Err(parse_err("empty action".into()));
    }
    let field = head
        .strip_prefix('.')
        .ok_or_else(|| parse_err(format!("expected a field reference like '.Name', found '{head}'")))?;
    if !is_identifier(field) {
        return Err(parse_err(format!("invalid field name '{field}'")));
    }

    let helpers = parts
        .map(|helper| {
            if helper.is_empty() {
                Err(parse_err("missing helper name after '|'".into()))
            } else if !is_identifier(helper) {
                Err(parse_err(format!("invalid helper name '{helper}'")))
            } else {
                Ok(helper.to_string())
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Action {
        field: field.to_string(),
        helpers,
        line,
    })
}

fn evaluate(action: &Action, params: &ParameterSet) -> Result<String, TemplateError> {
    let mut value = params
        .field(&action.field)
        .ok_or_else(|| TemplateError::Execute {
            line: action.line,
            message: format!("unknown field '{}'", action.field),
        })?
        .to_string();

    for name in &action.helpers {
        let helper = lookup_helper(name).ok_or_else(|| TemplateError::Execute {
            line: action.line,
            message: format!("unknown helper '{name}'"),
        })?;
        value = helper(&value);
    }
    Ok(value)
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn line_of(body: &[u8], offset: usize) -> usize {
    1 + body[..offset].iter().filter(|&&b| b == b'\n').count()
}
