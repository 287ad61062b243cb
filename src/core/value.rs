//! Loggable values and the inspector that renders them
//!
//! A [`LogValue`] is anything a caller can hand to the logger: primitives,
//! strings, and shared containers. Containers are reference-counted handles,
//! so a value graph may contain itself; the inspector detects such cycles by
//! container identity and renders them with `<ref *N>` / `[Circular *N]`
//! markers instead of recursing forever. Output stays bounded for any
//! input: containers nested more than two levels deep are summarised as
//! `[Array]` / `[Object]`, and arrays show at most 100 items.

use super::error::Result;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Column budget for keeping a container on a single line
const BREAK_LENGTH: usize = 80;

/// Containers whose last nested descendant sits this many levels deeper are
/// always broken over multiple lines
const COMPACT_DEPTH: usize = 3;

/// Containers nested deeper than this render as `[Array]` / `[Object]`
const DEPTH: usize = 2;

/// Array items shown before the rest collapse into `... N more items`
const MAX_ARRAY_LENGTH: usize = 100;

/// Arrays with more entries than this are grouped into columns
const GROUP_THRESHOLD: usize = 6;

const MAX_COLUMNS: usize = 15;

pub type SharedArray = Arc<RwLock<Vec<LogValue>>>;
pub type SharedObject = Arc<RwLock<Vec<(String, LogValue)>>>;

/// Value accepted by the logger entry points
///
/// Cloning a container clones the handle, not the contents: both clones
/// refer to the same container and compare equal by identity.
#[derive(Clone, Default)]
pub enum LogValue {
    /// Absent value, rendered as `undefined`
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(SharedArray),
    /// Insertion-ordered key/value entries
    Object(SharedObject),
}

impl LogValue {
    /// Build an array from any iterator of convertible items
    pub fn array<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<LogValue>,
    {
        let items = items.into_iter().map(Into::into).collect();
        LogValue::Array(Arc::new(RwLock::new(items)))
    }

    /// Build an object from key/value pairs, keeping their order
    pub fn object<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<LogValue>,
    {
        let value = LogValue::Object(Arc::new(RwLock::new(Vec::new())));
        for (key, item) in entries {
            value.insert(key, item);
        }
        value
    }

    /// Append an item to an array; returns `false` for non-arrays
    pub fn push(&self, item: impl Into<LogValue>) -> bool {
        match self {
            LogValue::Array(items) => {
                items.write().push(item.into());
                true
            }
            _ => false,
        }
    }

    /// Set a key on an object; an existing key keeps its position.
    /// Returns `false` for non-objects.
    pub fn insert(&self, key: impl Into<String>, item: impl Into<LogValue>) -> bool {
        let LogValue::Object(entries) = self else {
            return false;
        };
        let key = key.into();
        let item = item.into();
        let mut entries = entries.write();
        match entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = item,
            None => entries.push((key, item)),
        }
        true
    }

    /// Convert any serializable value through its JSON representation
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(serde_json::to_value(value)?.into())
    }

    pub fn is_container(&self) -> bool {
        matches!(self, LogValue::Array(_) | LogValue::Object(_))
    }

    /// Identity of the underlying container, if any
    fn container_id(&self) -> Option<usize> {
        match self {
            LogValue::Array(items) => Some(Arc::as_ptr(items) as *const () as usize),
            LogValue::Object(entries) => Some(Arc::as_ptr(entries) as *const () as usize),
            _ => None,
        }
    }
}

/// Convert a value into its log message text
///
/// Strings pass through untouched, containers go through the inspector and
/// every other value uses its canonical spelling. Never fails, including on
/// cyclic containers.
pub fn format_value(value: &LogValue) -> String {
    match value {
        LogValue::String(s) => s.clone(),
        LogValue::Array(_) | LogValue::Object(_) => Inspector::default().format(value),
        other => format_primitive(other),
    }
}

/// Render a value the way it appears nested inside a container
pub fn inspect(value: &LogValue) -> String {
    Inspector::default().format(value)
}

fn format_primitive(value: &LogValue) -> String {
    match value {
        LogValue::Undefined => "undefined".to_string(),
        LogValue::Null => "null".to_string(),
        LogValue::Bool(b) => b.to_string(),
        LogValue::Int(i) => i.to_string(),
        LogValue::Float(f) => format_float(*f),
        LogValue::String(s) => quote_string(s),
        LogValue::Array(_) | LogValue::Object(_) => String::new(),
    }
}

fn format_float(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        let label = if f > 0.0 { "Infinity" } else { "-Infinity" };
        label.to_string()
    } else if f == 0.0 && f.is_sign_negative() {
        "-0".to_string()
    } else if f != 0.0 && (f.abs() >= 1e21 || f.abs() < 1e-6) {
        // Exponent notation with an explicit sign: 1e+21, 1.5e-7
        let exponential = format!("{:e}", f);
        match exponential.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => exponential,
        }
    } else {
        f.to_string()
    }
}

/// Quote a string, preferring single quotes and switching to another quote
/// character when that avoids escaping
fn quote_string(s: &str) -> String {
    let quote = if !s.contains('\'') {
        '\''
    } else if !s.contains('"') {
        '"'
    } else if !s.contains('`') && !s.contains("${") {
        '`'
    } else {
        '\''
    };

    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            c if c.is_control() => {
                out.push_str(&format!("\\x{:02X}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

fn format_key(key: &str) -> String {
    let mut chars = key.chars();
    let is_identifier = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if is_identifier {
        key.to_string()
    } else {
        quote_string(key)
    }
}

/// Depth-first pretty printer with cycle detection
#[derive(Default)]
struct Inspector {
    /// Identities of the containers currently being rendered
    ancestors: Vec<usize>,
    /// Reference numbers handed out to containers found inside themselves
    circular: HashMap<usize, usize>,
    indentation: usize,
    current_depth: usize,
}

enum Entries {
    Items(Vec<LogValue>),
    Fields(Vec<(String, LogValue)>),
}

impl Entries {
    fn is_empty(&self) -> bool {
        match self {
            Entries::Items(items) => items.is_empty(),
            Entries::Fields(fields) => fields.is_empty(),
        }
    }
}

/// Display width, counted in UTF-16 units like the layout rules it follows
fn text_len(text: &str) -> usize {
    text.encode_utf16().count()
}

fn pad(text: &str, width: usize, at_start: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(text_len(text)));
    if at_start {
        format!("{}{}", fill, text)
    } else {
        format!("{}{}", text, fill)
    }
}

impl Inspector {
    fn format(&mut self, value: &LogValue) -> String {
        // Snapshot the children so no lock is held while recursing
        let (id, entries) = match (value.container_id(), value) {
            (Some(id), LogValue::Array(items)) => (id, Entries::Items(items.read().clone())),
            (Some(id), LogValue::Object(fields)) => (id, Entries::Fields(fields.read().clone())),
            _ => return format_primitive(value),
        };

        if self.ancestors.contains(&id) {
            let next = self.circular.len() + 1;
            let index = *self.circular.entry(id).or_insert(next);
            return format!("[Circular *{}]", index);
        }

        let braces = match entries {
            Entries::Items(_) => ("[", "]"),
            Entries::Fields(_) => ("{", "}"),
        };
        if entries.is_empty() {
            return format!("{}{}", braces.0, braces.1);
        }

        let depth = self.ancestors.len();
        if depth > DEPTH {
            self.current_depth = depth;
            return match entries {
                Entries::Items(_) => "[Array]".to_string(),
                Entries::Fields(_) => "[Object]".to_string(),
            };
        }

        self.current_depth = depth;
        self.ancestors.push(id);
        self.indentation += 2;

        let mut output = Vec::new();
        let mut numeric_array = None;
        match &entries {
            Entries::Items(items) => {
                let shown = items.len().min(MAX_ARRAY_LENGTH);
                for item in &items[..shown] {
                    output.push(self.format(item));
                }
                let remaining = items.len() - shown;
                if remaining > 0 {
                    let plural = if remaining > 1 { "s" } else { "" };
                    output.push(format!("... {} more item{}", remaining, plural));
                }
                numeric_array = Some(
                    items
                        .iter()
                        .take(output.len())
                        .all(|item| matches!(item, LogValue::Int(_) | LogValue::Float(_))),
                );
            }
            Entries::Fields(fields) => {
                for (key, item) in fields {
                    output.push(format!("{}: {}", format_key(key), self.format(item)));
                }
            }
        }

        self.indentation -= 2;
        self.ancestors.pop();

        let base = match self.circular.get(&id) {
            Some(index) => format!("<ref *{}>", index),
            None => String::new(),
        };
        self.reduce_to_single_string(output, braces, depth, &base, numeric_array)
    }

    fn reduce_to_single_string(
        &self,
        mut output: Vec<String>,
        (open, close): (&str, &str),
        depth: usize,
        base: &str,
        numeric_array: Option<bool>,
    ) -> String {
        let prefix = if base.is_empty() {
            String::new()
        } else {
            format!("{} ", base)
        };

        // Grouping changes the entry count, which rules out a single line
        let entries = output.len();
        if let Some(numeric) = numeric_array {
            if entries > GROUP_THRESHOLD {
                output = self.group_array_elements(output, numeric);
            }
        }

        if self.current_depth.saturating_sub(depth) < COMPACT_DEPTH && entries == output.len() {
            let start = output.len() + self.indentation + open.len() + text_len(base) + 10;
            if Self::is_below_break_length(&output, start) {
                let joined = output.join(", ");
                if !joined.contains('\n') {
                    return format!("{}{} {} {}", prefix, open, joined, close);
                }
            }
        }

        let indentation = format!("\n{}", " ".repeat(self.indentation));
        format!(
            "{}{}{}  {}{}{}",
            prefix,
            open,
            indentation,
            output.join(&format!(",{}  ", indentation)),
            indentation,
            close
        )
    }

    fn is_below_break_length(output: &[String], start: usize) -> bool {
        let mut total = output.len() + start;
        if total + output.len() > BREAK_LENGTH {
            return false;
        }
        total += output.iter().map(|entry| text_len(entry)).sum::<usize>();
        total <= BREAK_LENGTH
    }

    /// Lay short array entries out in aligned columns. Numbers are
    /// right-aligned, everything else left-aligned. A trailing
    /// `... N more items` entry keeps a line of its own.
    fn group_array_elements(&self, output: Vec<String>, numeric: bool) -> Vec<String> {
        const SEPARATOR_SPACE: usize = 2;

        let has_more = output.len() > MAX_ARRAY_LENGTH;
        let output_len = if has_more { output.len() - 1 } else { output.len() };

        let data_len: Vec<usize> = output[..output_len].iter().map(|e| text_len(e)).collect();
        let total_length: usize = data_len.iter().map(|len| len + SEPARATOR_SPACE).sum();
        let max_length = data_len.iter().copied().max().unwrap_or(0);
        let actual_max = max_length + SEPARATOR_SPACE;

        // At least three entries per line, and no single entry dwarfing the rest
        if actual_max * 3 + self.indentation >= BREAK_LENGTH
            || (total_length as f64 / actual_max as f64 <= 5.0 && max_length > 6)
        {
            return output;
        }

        let average_bias = (actual_max as f64 - total_length as f64 / output.len() as f64)
            .max(0.0)
            .sqrt();
        let biased_max = (actual_max as f64 - 3.0 - average_bias).max(1.0);
        let columns = [
            ((2.5 * biased_max * output_len as f64).sqrt() / biased_max).round() as usize,
            BREAK_LENGTH.saturating_sub(self.indentation) / actual_max,
            COMPACT_DEPTH * 4,
            MAX_COLUMNS,
        ]
        .into_iter()
        .min()
        .unwrap_or(1);
        if columns <= 1 {
            return output;
        }

        let max_line_length: Vec<usize> = (0..columns)
            .map(|column| {
                data_len
                    .iter()
                    .skip(column)
                    .step_by(columns)
                    .copied()
                    .max()
                    .unwrap_or(0)
                    + SEPARATOR_SPACE
            })
            .collect();

        let mut grouped = Vec::with_capacity(output_len / columns + 2);
        for start in (0..output_len).step_by(columns) {
            let end = (start + columns).min(output_len);
            let mut line = String::new();
            for j in start..end - 1 {
                let cell = format!("{}, ", output[j]);
                line.push_str(&pad(&cell, max_line_length[j - start], numeric));
            }
            let last = &output[end - 1];
            if numeric {
                let width = max_line_length[end - 1 - start] - SEPARATOR_SPACE;
                line.push_str(&pad(last, width, true));
            } else {
                line.push_str(last);
            }
            grouped.push(line);
        }
        if has_more {
            grouped.push(output[output_len].clone());
        }
        grouped
    }
}

impl fmt::Display for LogValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_value(self))
    }
}

impl fmt::Debug for LogValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&inspect(self))
    }
}

impl From<&str> for LogValue {
    fn from(s: &str) -> Self {
        LogValue::String(s.to_string())
    }
}

impl From<String> for LogValue {
    fn from(s: String) -> Self {
        LogValue::String(s)
    }
}

impl From<&String> for LogValue {
    fn from(s: &String) -> Self {
        LogValue::String(s.clone())
    }
}

impl From<bool> for LogValue {
    fn from(b: bool) -> Self {
        LogValue::Bool(b)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for LogValue {
                fn from(i: $t) -> Self {
                    LogValue::Int(i64::from(i))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for LogValue {
    fn from(i: u64) -> Self {
        i64::try_from(i).map_or(LogValue::Float(i as f64), LogValue::Int)
    }
}

impl From<usize> for LogValue {
    fn from(i: usize) -> Self {
        LogValue::from(i as u64)
    }
}

impl From<isize> for LogValue {
    fn from(i: isize) -> Self {
        LogValue::Int(i as i64)
    }
}

impl From<f32> for LogValue {
    fn from(f: f32) -> Self {
        LogValue::Float(f64::from(f))
    }
}

impl From<f64> for LogValue {
    fn from(f: f64) -> Self {
        LogValue::Float(f)
    }
}

impl<T: Into<LogValue>> From<Option<T>> for LogValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(LogValue::Undefined, Into::into)
    }
}

impl<T: Into<LogValue>> From<Vec<T>> for LogValue {
    fn from(items: Vec<T>) -> Self {
        LogValue::array(items)
    }
}

impl From<serde_json::Value> for LogValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => LogValue::Null,
            Value::Bool(b) => LogValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => LogValue::Int(i),
                None => LogValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => LogValue::String(s),
            Value::Array(items) => LogValue::array(items),
            Value::Object(map) => LogValue::object(map),
        }
    }
}
