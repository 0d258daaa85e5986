//! Path expressions into order records.
//!
//! A path is a dotted list of field names where any name may carry bracket
//! suffixes: `items[0].name` reads one member, `items[].name` projects every
//! member. Paths are parsed once into [`Segment`]s and walked many times.

use super::BindingError;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// One step of a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Object key. A numeric key also indexes into arrays (`items.0`).
    Field(String),
    /// Array index from `[n]`.
    Index(usize),
    /// Array projection from `[]`.
    Wildcard,
}

impl Segment {
    /// Step into `value`. Null counts as missing.
    fn step<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        let next = match (self, value) {
            (Segment::Field(name), Value::Object(map)) => map.get(name),
            (Segment::Field(name), Value::Array(items)) => name.parse::<usize>().ok().and_then(|i| items.get(i)),
            (Segment::Index(index), Value::Array(items)) => items.get(*index),
            _ => None,
        };
        next.filter(|v| !v.is_null())
    }
}

/// A parsed path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpr {
    source: String,
    segments: Vec<Segment>,
}

impl PathExpr {
    /// Parse a path such as `shippingAddress.city` or `items[].price`.
    pub fn parse(path: &str) -> Result<Self, BindingError> {
        let source = path.trim();
        let malformed = |reason: &str| BindingError::MalformedPath {
            path: path.to_string(),
            reason: reason.to_string(),
        };

        let mut segments = Vec::new();
        for part in source.split('.') {
            let (name, mut rest) = part.split_at(part.find('[').unwrap_or(part.len()));
            if name.contains(']') {
                return Err(malformed("unexpected `]`"));
            }
            if name.is_empty() && rest.is_empty() {
                return Err(malformed("empty segment"));
            }
            if !name.is_empty() {
                segments.push(Segment::Field(name.to_string()));
            }
            while !rest.is_empty() {
                let Some(bracketed) = rest.strip_prefix('[') else {
                    return Err(malformed("text after `]`"));
                };
                let Some(close) = bracketed.find(']') else {
                    return Err(malformed("unclosed `[`"));
                };
                let inner = bracketed[..close].trim();
                if inner.is_empty() {
                    segments.push(Segment::Wildcard);
                } else {
                    let index = inner.parse::<usize>().map_err(|_| malformed("index is not a number"))?;
                    segments.push(Segment::Index(index));
                }
                rest = &bracketed[close + 1..];
            }
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// The normalized source text.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Check if the path projects over an array.
    pub fn has_wildcard(&self) -> bool {
        self.segments.contains(&Segment::Wildcard)
    }

    /// Evaluate against `record`.
    ///
    /// Returns `None` as soon as any step is missing or null. A wildcard
    /// yields an array with one entry per member of the projected array
    /// (`null` where the suffix is missing); a base that is not an array
    /// projects to an empty array.
    pub fn evaluate(&self, record: &Value) -> Option<Value> {
        evaluate_segments(record, &self.segments)
    }

    /// Evaluate per array member: the base before the first `[]` must be an
    /// array, and the rest of the path is applied to each member.
    ///
    /// Without a wildcard the whole path is the base.
    pub fn project(&self, record: &Value) -> Vec<Value> {
        let wildcard = self.segments.iter().position(|s| *s == Segment::Wildcard);
        let (base, suffix) = match wildcard {
            Some(at) => (&self.segments[..at], &self.segments[at + 1..]),
            None => (&self.segments[..], &[][..]),
        };
        match walk(record, base) {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| evaluate_segments(item, suffix).unwrap_or(Value::Null))
                .collect(),
            Some(value) if wildcard.is_none() => vec![value.clone()],
            _ => Vec::new(),
        }
    }
}

/// Walk plain segments, stopping at the first wildcard.
fn walk<'a>(record: &'a Value, segments: &[Segment]) -> Option<&'a Value> {
    if record.is_null() {
        return None;
    }
    segments.iter().try_fold(record, |value, segment| segment.step(value))
}

fn evaluate_segments(record: &Value, segments: &[Segment]) -> Option<Value> {
    match segments.iter().position(|s| *s == Segment::Wildcard) {
        None => walk(record, segments).cloned(),
        Some(at) => {
            let projected = match walk(record, &segments[..at]) {
                Some(Value::Array(items)) => items
                    .iter()
                    .map(|item| evaluate_segments(item, &segments[at + 1..]).unwrap_or(Value::Null))
                    .collect(),
                Some(_) => Vec::new(),
                None => return None,
            };
            Some(Value::Array(projected))
        }
    }
}

impl FromStr for PathExpr {
    type Err = BindingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PathExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn segments(path: &str) -> Vec<Segment> {
        PathExpr::parse(path).unwrap().segments().to_vec()
    }

    #[test]
    fn test_parse_dotted() {
        assert_eq!(
            segments("shippingAddress.city"),
            vec![Segment::Field("shippingAddress".into()), Segment::Field("city".into())]
        );
    }

    #[test]
    fn test_parse_brackets() {
        assert_eq!(
            segments("items[0].name"),
            vec![Segment::Field("items".into()), Segment::Index(0), Segment::Field("name".into())]
        );
        assert_eq!(
            segments("items[].name"),
            vec![Segment::Field("items".into()), Segment::Wildcard, Segment::Field("name".into())]
        );
        assert_eq!(segments("[1]"), vec![Segment::Index(1)]);
        assert_eq!(
            segments("grid[2][3]"),
            vec![Segment::Field("grid".into()), Segment::Index(2), Segment::Index(3)]
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for path in ["", "a..b", "a.", "items[0", "items[x]", "items[-1]", "a]b", "items[0]x"] {
            assert!(
                matches!(PathExpr::parse(path), Err(BindingError::MalformedPath { .. })),
                "{path:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_evaluate_null_is_missing() {
        let record = json!({ "customer": { "name": null } });
        let path = PathExpr::parse("customer.name").unwrap();
        assert_eq!(path.evaluate(&record), None);
        assert_eq!(path.evaluate(&Value::Null), None);
    }

    #[test]
    fn test_numeric_field_indexes_arrays() {
        let record = json!({ "items": ["a", "b"] });
        assert_eq!(PathExpr::parse("items.1").unwrap().evaluate(&record), Some(json!("b")));
        assert_eq!(PathExpr::parse("items[1]").unwrap().evaluate(&record), Some(json!("b")));
        assert_eq!(PathExpr::parse("items[5]").unwrap().evaluate(&record), None);
    }

    #[test]
    fn test_project_keeps_length() {
        let record = json!({ "items": [{ "sku": "A" }, {}, { "sku": "C" }] });
        let path = PathExpr::parse("items[].sku").unwrap();
        assert_eq!(path.project(&record), vec![json!("A"), Value::Null, json!("C")]);
        // restartable: a second pass gives the same sequence
        assert_eq!(path.project(&record).len(), 3);
        assert_eq!(path.evaluate(&record), Some(json!(["A", null, "C"])));
    }

    #[test]
    fn test_project_non_array_base_is_empty() {
        let record = json!({ "items": { "sku": "A" } });
        assert!(PathExpr::parse("items[].sku").unwrap().project(&record).is_empty());
        assert!(PathExpr::parse("missing[].sku").unwrap().project(&record).is_empty());
    }
}
