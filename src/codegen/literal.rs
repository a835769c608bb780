//! Number formatting and array literals.

use std::fmt;
use std::sync::Arc;

use serde_json::value::RawValue;

use crate::error::{PorterError, Result};
use crate::template::TemplateSet;

/// Formats every floating-point number that ends up in generated code or
/// in an exported data file.
///
/// The converter is threaded explicitly through every emitting call; two
/// ports of the same model with the same converter are byte-identical.
#[derive(Clone)]
pub struct Converter(Arc<dyn Fn(f64) -> String + Send + Sync>);

impl Converter {
    pub fn new(f: impl Fn(f64) -> String + Send + Sync + 'static) -> Self {
        Converter(Arc::new(f))
    }

    /// Shortest text that reads back to the same `f64`.
    pub fn shortest() -> Self {
        Converter::new(|v| format!("{:?}", v))
    }

    /// Fixed number of digits after the decimal point.
    pub fn fixed(precision: usize) -> Self {
        Converter::new(move |v| format!("{:.*}", precision, v))
    }

    pub fn convert(&self, value: f64) -> String {
        (self.0)(value)
    }
}

impl Default for Converter {
    fn default() -> Self {
        Converter::shortest()
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Converter")
    }
}

/// Converter output as a raw JSON number, rejected unless it is exactly one
/// JSON number without surrounding whitespace.
pub(crate) fn json_number(converter: &Converter, value: f64) -> Result<Box<RawValue>> {
    let text = converter.convert(value);
    let invalid = || PorterError::InvalidNumber {
        value,
        text: text.clone(),
    };
    if text.trim() != text || serde_json::from_str::<serde_json::Number>(&text).is_err() {
        return Err(invalid());
    }
    RawValue::from_string(text.clone()).map_err(|_| invalid())
}

// ─── Literals ──────────────────────────────────────────────────────

/// Comma-separated items in the language's literal brackets.
pub(crate) fn list(set: &TemplateSet, items: impl IntoIterator<Item = String>) -> String {
    let items: Vec<String> = items.into_iter().collect();
    set.render("in_brackets", &[("value", &items.join(", "))])
}

pub(crate) fn ints<T: ToString>(set: &TemplateSet, values: &[T]) -> String {
    list(set, values.iter().map(ToString::to_string))
}

pub(crate) fn doubles(set: &TemplateSet, converter: &Converter, values: &[f64]) -> String {
    list(set, values.iter().map(|&v| converter.convert(v)))
}

/// Element type of a declared array.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Scalar {
    Int,
    Double,
}

impl Scalar {
    fn template(&self) -> &'static str {
        match self {
            Scalar::Int => "int",
            Scalar::Double => "double",
        }
    }
}

/// Declaration of a named array variable. `values` is an already bracketed
/// literal; `dims` are the fixed sizes for languages that spell them out.
pub(crate) fn declare(
    set: &TemplateSet,
    scalar: Scalar,
    name: &str,
    values: &str,
    dims: &[usize],
) -> String {
    let shape = match dims.len() {
        1 => "arr[]",
        2 => "arr[][]",
        _ => "arr[][][]",
    };
    let name = format!("{}{}", set.prefix, name);
    let n = dims.first().map(ToString::to_string).unwrap_or_default();
    let m = dims.get(1).map(ToString::to_string).unwrap_or_default();
    set.render(
        shape,
        &[
            ("type", set.text(scalar.template())),
            ("name", &name),
            ("values", values),
            ("n", &n),
            ("m", &m),
        ],
    )
}
