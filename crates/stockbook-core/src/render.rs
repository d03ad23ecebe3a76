//! # Confirmation Renderer
//!
//! Projects a [`StructuredRecord`] into an ordered tree of label/value
//! [`DisplayNode`]s. The confirmation view shows this tree before a purchase
//! or order is saved.
//!
//! ## Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  field value        │  emitted node                                    │
//! │  ───────────────────┼───────────────────────────────────────────────── │
//! │  Primitive          │  Leaf  { start_case_ignore_parens(field), value }│
//! │  Record             │  Group { start_case(field), render(record) }     │
//! │  List               │  Group { start_case(field), elements... }        │
//! │    └ element Record │    Group { "#n", render(element) }               │
//! │    └ element List   │    Group { "#n", elements... }                   │
//! │    └ element Prim.  │    Value { value }   (no label of its own)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rendering is a pure function of its input: same record, same nodes, in
//! the record's field order.
//!
//! The `#n` labels on list elements are display-only. They are the element's
//! 1-based position at render time, are not stored in the record, and change
//! when rows are inserted or deleted, so screens must not use them as keys.
//!
//! ## Example
//! ```rust
//! use stockbook_core::render::{render, DisplayNode};
//! use stockbook_core::structured::StructuredRecord;
//!
//! let record = StructuredRecord::new().with("unitPrice(IDR)", "15.000");
//! assert_eq!(
//!     render(&record),
//!     vec![DisplayNode::leaf("Unit Price(IDR)", "15.000")]
//! );
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::structured::{StructuredRecord, StructuredValue};

// =============================================================================
// Display Node
// =============================================================================

/// One line (or group of lines) of a rendered confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum DisplayNode {
    /// `Label: value`
    Leaf { label: String, value: String },
    /// A primitive list element, identified only by its position.
    Value { value: String },
    /// A labelled block whose children are indented beneath it.
    Group {
        label: String,
        children: Vec<DisplayNode>,
    },
}

impl DisplayNode {
    pub fn leaf(label: impl Into<String>, value: impl Into<String>) -> Self {
        DisplayNode::Leaf {
            label: label.into(),
            value: value.into(),
        }
    }

    pub fn value(value: impl Into<String>) -> Self {
        DisplayNode::Value {
            value: value.into(),
        }
    }

    pub fn group(label: impl Into<String>, children: Vec<DisplayNode>) -> Self {
        DisplayNode::Group {
            label: label.into(),
            children,
        }
    }

    /// Label of the node, if it has one.
    pub fn label(&self) -> Option<&str> {
        match self {
            DisplayNode::Leaf { label, .. } | DisplayNode::Group { label, .. } => Some(label),
            DisplayNode::Value { .. } => None,
        }
    }
}

// =============================================================================
// Rendering
// =============================================================================

/// Renders a record into display nodes, one top-level node per field.
pub fn render(record: &StructuredRecord) -> Vec<DisplayNode> {
    record
        .iter()
        .map(|(field, value)| render_field(field, value))
        .collect()
}

fn render_field(field: &str, value: &StructuredValue) -> DisplayNode {
    match value {
        StructuredValue::Primitive(p) => DisplayNode::leaf(start_case_ignore_parens(field), p.to_string()),
        StructuredValue::Record(record) => DisplayNode::group(start_case(field), render(record)),
        StructuredValue::List(items) => DisplayNode::group(start_case(field), render_elements(items)),
    }
}

fn render_elements(items: &[StructuredValue]) -> Vec<DisplayNode> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| match item {
            StructuredValue::Primitive(p) => DisplayNode::value(p.to_string()),
            StructuredValue::Record(record) => DisplayNode::group(position_label(i), render(record)),
            StructuredValue::List(inner) => DisplayNode::group(position_label(i), render_elements(inner)),
        })
        .collect()
}

fn position_label(index: usize) -> String {
    format!("#{}", index + 1)
}

/// Lays nodes out as indented plain text.
///
/// ## Example
/// ```text
/// Items:
///   #1:
///     Product Code: A1
///     Qty: 2
/// Total (IDR): 30.000
/// ```
pub fn render_text(nodes: &[DisplayNode]) -> String {
    let mut out = String::new();
    write_nodes(&mut out, nodes, 0);
    out
}

fn write_nodes(out: &mut String, nodes: &[DisplayNode], depth: usize) {
    for node in nodes {
        let indent = "  ".repeat(depth);
        match node {
            DisplayNode::Leaf { label, value } => {
                out.push_str(&format!("{indent}{label}: {value}\n"));
            }
            DisplayNode::Value { value } => {
                out.push_str(&format!("{indent}{value}\n"));
            }
            DisplayNode::Group { label, children } => {
                out.push_str(&format!("{indent}{label}:\n"));
                write_nodes(out, children, depth + 1);
            }
        }
    }
}

// =============================================================================
// Label Transforms
// =============================================================================

/// Converts an identifier-like string into space separated, capitalised
/// words.
///
/// Word boundaries: any non-alphanumeric character, a lower-to-upper case
/// change (`unitPrice`), the end of an acronym (`XMLHttp` → `XML Http`) and
/// letter/digit changes (`item2` → `Item 2`). Only the first character of each
/// word is changed.
///
/// ```rust
/// use stockbook_core::render::start_case;
///
/// assert_eq!(start_case("productCode"), "Product Code");
/// assert_eq!(start_case("created_at"), "Created At");
/// assert_eq!(start_case("IDR"), "IDR");
/// ```
pub fn start_case(input: &str) -> String {
    split_words(input)
        .iter()
        .map(|word| upper_first(word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Like [`start_case`], but applied to each run of word characters on its
/// own, leaving other characters and any `(...)` group exactly as written.
///
/// ```rust
/// use stockbook_core::render::start_case_ignore_parens;
///
/// assert_eq!(start_case_ignore_parens("unitPrice(IDR)"), "Unit Price(IDR)");
/// assert_eq!(start_case_ignore_parens("Total (idr)"), "Total (idr)");
/// ```
pub fn start_case_ignore_parens(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len() + 4);
    let mut word = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '(' {
            if let Some(close) = closing_paren(&chars, i) {
                flush_word(&mut out, &mut word);
                out.extend(&chars[i..=close]);
                i = close + 1;
                continue;
            }
        }

        if is_word_char(c) {
            word.push(c);
        } else {
            flush_word(&mut out, &mut word);
            out.push(c);
        }
        i += 1;
    }

    flush_word(&mut out, &mut word);
    out
}

/// Index of the `)` closing the group opened at `open`, if the group holds
/// at least one character.
fn closing_paren(chars: &[char], open: usize) -> Option<usize> {
    let offset = chars[open + 1..].iter().position(|&c| c == ')')?;
    (offset > 0).then_some(open + 1 + offset)
}

fn flush_word(out: &mut String, word: &mut String) {
    if !word.is_empty() {
        out.push_str(&start_case(word));
        word.clear();
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn upper_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn split_words(input: &str) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if let Some(prev) = current.chars().last() {
            let next = chars.get(i + 1).copied();
            if is_boundary(prev, c, next) {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn is_boundary(prev: char, c: char, next: Option<char>) -> bool {
    let camel = prev.is_lowercase() && c.is_uppercase();
    let acronym_end =
        prev.is_uppercase() && c.is_uppercase() && next.is_some_and(|n| n.is_lowercase());
    let digit_change = prev.is_numeric() != c.is_numeric();
    camel || acronym_end || digit_change
}

// =============================================================================
// Unit Tests
// =============================================================================
