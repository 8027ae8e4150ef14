//! Fixed width (column positioned) record codec.
//!
//! Every record kind is described by a [Layout]: a table of [Column]s, each one
//! spanning `start..end` characters of the line. One generic routine decodes
//! a line into a [Record], one generic routine re-encodes values into a line,
//! either from scratch or by splicing into an existing line.
use crate::error::FormatError;

mod formatting;

pub use formatting::{fmt_fixed, fmt_sci};

/// Semantic type of a [Column], driving both decoding and encoding.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ColumnKind {
    /// Left aligned text
    Text,
    /// Right aligned integer number
    Integer,
    /// Right aligned float number, with fixed number of decimals
    Fixed(usize),
    /// Right aligned float number in scientific notation (mantissa decimals)
    Scientific(usize),
}

/// Describes one field of a fixed width record.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Column {
    pub name: &'static str,
    pub start: usize,
    pub end: usize,
    pub kind: ColumnKind,
}

impl Column {
    pub const fn new(name: &'static str, start: usize, end: usize, kind: ColumnKind) -> Self {
        Self {
            name,
            start,
            end,
            kind,
        }
    }
    /// Width of this column, when encoding.
    pub const fn width(&self) -> usize {
        self.end - self.start
    }
    /// Returns the (possibly truncated) content of this column,
    /// or None if the line stops before this column.
    fn slice<'a>(&self, line: &'a str) -> Option<&'a str> {
        if self.start >= line.len() {
            return None;
        }
        let end = self.end.min(line.len());
        line.get(self.start..end)
    }
    fn format(&self, value: &Value) -> String {
        let width = self.width();
        match (self.kind, value) {
            (_, Value::Empty) => " ".repeat(width),
            (ColumnKind::Text, Value::Text(s)) => format!("{:<width$}", s, width = width),
            (ColumnKind::Integer, Value::Integer(i)) => format!("{:>width$}", i, width = width),
            (ColumnKind::Fixed(prec), Value::Float(f)) => fmt_fixed(*f, width, prec),
            (ColumnKind::Scientific(prec), Value::Float(f)) => fmt_sci(*f, width, prec),
            (_, Value::Text(s)) => format!("{:>width$}", s, width = width),
            (_, Value::Integer(i)) => format!("{:>width$}", i, width = width),
            (_, Value::Float(f)) => format!("{:>width$}", f, width = width),
        }
    }
}

/// A record kind, as an ordered table of non overlapping [Column]s.
pub type Layout = [Column];

/// Decoded value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Float(f64),
    /// Blank or absent field
    Empty,
}

/// A decoded line, values are indexed like the [Layout] that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<'a> {
    layout: &'a Layout,
    values: Vec<Value>,
    line: usize,
}

impl<'a> Record<'a> {
    /// Decodes `content` (without line termination) according to `layout`.
    /// `line` is only used to locate errors.
    pub fn decode(layout: &'a Layout, content: &str, line: usize) -> Result<Self, FormatError> {
        let mut values = Vec::with_capacity(layout.len());
        for column in layout {
            let field = column.slice(content).map(|s| s.trim()).unwrap_or("");
            if field.is_empty() {
                values.push(Value::Empty);
                continue;
            }
            let bad_field = || FormatError::BadField {
                line,
                field: column.name,
                content: field.to_string(),
            };
            let value = match column.kind {
                ColumnKind::Text => Value::Text(field.to_string()),
                ColumnKind::Integer => {
                    Value::Integer(field.parse::<i64>().map_err(|_| bad_field())?)
                },
                ColumnKind::Fixed(_) | ColumnKind::Scientific(_) => {
                    Value::Float(parse_float(field).ok_or_else(bad_field)?)
                },
            };
            values.push(value);
        }
        Ok(Self {
            layout,
            values,
            line,
        })
    }

    fn value(&self, name: &'static str) -> &Value {
        self.layout
            .iter()
            .position(|c| c.name == name)
            .and_then(|i| self.values.get(i))
            .unwrap_or(&Value::Empty)
    }

    fn missing(&self, field: &'static str) -> FormatError {
        FormatError::MissingField {
            line: self.line,
            field,
        }
    }

    /// Line number this record was decoded from
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn text(&self, name: &'static str) -> Result<&str, FormatError> {
        match self.value(name) {
            Value::Text(s) => Ok(s),
            _ => Err(self.missing(name)),
        }
    }

    pub fn integer(&self, name: &'static str) -> Result<i64, FormatError> {
        match self.value(name) {
            Value::Integer(i) => Ok(*i),
            _ => Err(self.missing(name)),
        }
    }

    pub fn float(&self, name: &'static str) -> Result<f64, FormatError> {
        self.opt_float(name).ok_or_else(|| self.missing(name))
    }

    pub fn opt_float(&self, name: &'static str) -> Option<f64> {
        match self.value(name) {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }
}

/// Parses a float number, tolerating the Fortran `D` exponent marker.
fn parse_float(field: &str) -> Option<f64> {
    field
        .parse::<f64>()
        .ok()
        .or_else(|| field.replace(&['D', 'd'][..], "E").parse::<f64>().ok())
}

/// Encodes `values` (indexed like `layout`) on top of `base`.
/// Characters of `base` that are not covered by a column are preserved,
/// `base` is padded with blanks when shorter than a column.
/// A formatted value wider than its column overflows, it is never truncated.
pub fn encode(base: &str, layout: &Layout, values: &[Value]) -> String {
    let mut out = String::with_capacity(base.len().max(
        layout.last().map(|c| c.end).unwrap_or(0),
    ));
    let mut cursor = 0;
    for (column, value) in layout.iter().zip(values.iter()) {
        if cursor < column.start {
            let kept = base.get(cursor..column.start.min(base.len())).unwrap_or("");
            out.push_str(kept);
            for _ in kept.len()..column.start - cursor {
                out.push(' ');
            }
        }
        out.push_str(&column.format(value));
        cursor = column.end;
    }
    if let Some(tail) = base.get(cursor..) {
        out.push_str(tail);
    }
    out
}
