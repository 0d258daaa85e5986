//! Resolving element content against an order record.

use super::{BindingError, PathExpr};
use crate::document::Document;
use crate::elements::{DataMapping, Element, ElementCategory, ElementId};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Read `path` from `record`, or `fallback` when any step is missing or null.
///
/// A malformed path also yields `fallback`.
pub fn get_value(record: &Value, path: &str, fallback: Value) -> Value {
    match PathExpr::parse(path) {
        Ok(expr) => expr.evaluate(record).unwrap_or(fallback),
        Err(err) => {
            log::debug!("{err}");
            fallback
        }
    }
}

/// Resolve every mapping entry; unresolved fields map to `null`.
pub fn map_fields(record: &Value, paths_by_field: &DataMapping) -> BTreeMap<String, Value> {
    paths_by_field
        .iter()
        .map(|(field, path)| (field.clone(), get_value(record, path, Value::Null)))
        .collect()
}

/// Resolve `path` once per member of the array it projects over.
///
/// The result has one entry per source member (`null` where a member lacks
/// the suffix). A missing or non-array base gives an empty list.
pub fn resolve_array_path(path: &str, record: &Value) -> Vec<Value> {
    match PathExpr::parse(path) {
        Ok(expr) => expr.project(record),
        Err(err) => {
            log::warn!("{err}");
            Vec::new()
        }
    }
}

/// Render a resolved value as label text.
///
/// Null is empty, strings are unquoted and arrays are comma-joined.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items.iter().map(stringify).collect::<Vec<_>>().join(", "),
        Value::Object(_) => value.to_string(),
    }
}

/// Resolved content handed to the render surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResolvedContent {
    /// Literal text to print.
    Text(String),
    /// Field name -> value, for composite blocks the renderer lays out itself.
    Fields(BTreeMap<String, Value>),
}

impl ResolvedContent {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResolvedContent::Text(text) => Some(text),
            ResolvedContent::Fields(_) => None,
        }
    }

    pub fn as_fields(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            ResolvedContent::Fields(fields) => Some(fields),
            ResolvedContent::Text(_) => None,
        }
    }
}

/// An element's data mapping with every path parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementBinding {
    /// (field, path) in mapping key order.
    paths: Vec<(String, PathExpr)>,
}

impl ElementBinding {
    /// Parse every path of `element`'s mapping.
    pub fn compile(element: &Element) -> Result<Self, BindingError> {
        let paths = element
            .data_mapping
            .iter()
            .flat_map(|mapping| mapping.iter())
            .map(|(field, path)| PathExpr::parse(path).map(|expr| (field.clone(), expr)))
            .collect::<Result<Vec<_>, BindingError>>()?;
        Ok(Self { paths })
    }

    /// Check if the element has no mapped fields.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    fn values(&self, record: &Value) -> BTreeMap<String, Value> {
        self.paths
            .iter()
            .map(|(field, path)| (field.clone(), path.evaluate(record).unwrap_or(Value::Null)))
            .collect()
    }

    /// Resolve `element` against `record`, by the element's category.
    pub fn resolve(&self, element: &Element, record: &Value) -> ResolvedContent {
        match element.kind.category() {
            ElementCategory::TextLike => ResolvedContent::Text(substitute(&element.content, &self.values(record))),
            ElementCategory::Code => {
                let first = self
                    .paths
                    .iter()
                    .find_map(|(_, path)| path.evaluate(record))
                    .map(|value| stringify(&value));
                ResolvedContent::Text(first.unwrap_or_else(|| element.content.clone()))
            }
            ElementCategory::Composite => {
                let mut values = self.values(record);
                values.retain(|field, _| element.field_enabled(field));
                ResolvedContent::Fields(values)
            }
            ElementCategory::Plain => {
                if !element.content.is_empty() || self.is_empty() {
                    return ResolvedContent::Text(element.content.clone());
                }
                let joined = self
                    .paths
                    .iter()
                    .filter_map(|(_, path)| path.evaluate(record))
                    .map(|value| stringify(&value))
                    .collect::<Vec<_>>()
                    .join(" ");
                ResolvedContent::Text(joined)
            }
        }
    }
}

/// Replace each `{field}` whose field is mapped, in a single left-to-right scan.
///
/// Substituted values are never rescanned; unmapped placeholders stay as written.
fn substitute(template: &str, values: &BTreeMap<String, Value>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };
        let name = &after[..close];
        if name.contains('{') {
            // `{{name}`: the outer brace is literal
            out.push('{');
            rest = after;
            continue;
        }
        match values.get(name) {
            Some(value) => out.push_str(&stringify(value)),
            None => out.push_str(&rest[open..open + close + 2]),
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    out
}

/// Resolve one element's content; a malformed mapping degrades to the
/// literal content.
pub fn resolve_element_content(element: &Element, record: &Value) -> ResolvedContent {
    match ElementBinding::compile(element) {
        Ok(binding) => binding.resolve(element, record),
        Err(err) => {
            log::warn!("Element {}: {err}; using literal content", element.id);
            ResolvedContent::Text(element.content.clone())
        }
    }
}

/// An element paired with its resolved content.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedElement<'a> {
    pub element: &'a Element,
    pub content: ResolvedContent,
}

/// Every binding of a document, parsed once for resolving many records.
#[derive(Debug, Clone)]
pub struct DocumentBindings<'a> {
    entries: Vec<(&'a Element, Result<ElementBinding, BindingError>)>,
}

impl<'a> DocumentBindings<'a> {
    /// Parse the bindings of every element, in paint order.
    pub fn compile(document: &'a Document) -> Self {
        let entries = document
            .paint_order()
            .into_iter()
            .map(|element| {
                let binding = ElementBinding::compile(element);
                if let Err(err) = &binding {
                    log::warn!("Element {}: {err}; it will print its literal content", element.id);
                }
                (element, binding)
            })
            .collect();
        Self { entries }
    }

    /// Resolve the whole document against one record.
    pub fn resolve(&self, record: &Value) -> Vec<ResolvedElement<'a>> {
        self.entries
            .iter()
            .map(|(element, binding)| {
                let content = match binding {
                    Ok(binding) => binding.resolve(element, record),
                    Err(_) => ResolvedContent::Text(element.content.clone()),
                };
                ResolvedElement {
                    element: *element,
                    content,
                }
            })
            .collect()
    }

    /// Elements whose mapping failed to parse.
    pub fn errors(&self) -> impl Iterator<Item = (&ElementId, &BindingError)> {
        self.entries
            .iter()
            .filter_map(|(element, binding)| binding.as_ref().err().map(|err| (&element.id, err)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
