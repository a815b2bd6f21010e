//! The per-field constraint record consumed by classification and generation.
//!
//! A `Configuration` is built once per field per classification pass and is
//! never mutated afterwards. The `with_*` builders consume and return a new
//! record.

use serde::{Deserialize, Serialize};

use crate::value::{Value, ValueDomain};

/// Opaque handle to the "otherwise" steps a property supplies for its
/// invalid cases. Forwarded to the caller untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OtherwiseRef(pub String);

/// One declared property of a field together with its modifiers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Constraint<T> {
    pub value: T,
    /// The property was declared with a negated connector ("not in").
    #[serde(default)]
    pub negated: bool,
    /// Never explore this property with an invalid value.
    #[serde(default)]
    pub valid_only: bool,
    #[serde(default)]
    pub otherwise: Option<OtherwiseRef>,
}

impl<T> Constraint<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            negated: false,
            valid_only: false,
            otherwise: None,
        }
    }

    pub fn negated(mut self) -> Self {
        self.negated = true;
        self
    }

    pub fn valid_only(mut self) -> Self {
        self.valid_only = true;
        self
    }

    pub fn with_otherwise(mut self, otherwise: impl Into<String>) -> Self {
        self.otherwise = Some(OtherwiseRef(otherwise.into()));
        self
    }
}

/// Something a property can point at instead of stating a literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Reference {
    Constant(String),
    /// Another field of the same form.
    Field(String),
    /// An external table or database query; first column is used.
    Query(String),
}

/// A min/max bound: a literal or a reference the engine cannot resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bound<T> {
    Literal(T),
    Reference(Reference),
}

impl<T> Bound<T> {
    pub fn literal(&self) -> Option<&T> {
        match self {
            Bound::Literal(v) => Some(v),
            Bound::Reference(_) => None,
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Bound::Reference(_))
    }
}

/// Where the value (or value set) of a field comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSource {
    Literal(Value),
    List(Vec<Value>),
    /// Values produced by the reference-resolution layer, if it ran.
    Reference {
        reference: Reference,
        #[serde(default)]
        resolved: Option<Vec<Value>>,
    },
}

impl ValueSource {
    /// The ordered set the Set-group cases index into, when known.
    pub fn elements(&self) -> Option<Vec<Value>> {
        match self {
            ValueSource::Literal(v) => Some(vec![v.clone()]),
            ValueSource::List(values) => Some(values.clone()),
            ValueSource::Reference { resolved, .. } => resolved.clone(),
        }
    }

    pub fn is_query(&self) -> bool {
        matches!(
            self,
            ValueSource::Reference {
                reference: Reference::Query(_),
                ..
            }
        )
    }

    /// A fixed value, constant, list or query: something a set can be drawn from.
    pub fn is_set_like(&self) -> bool {
        !matches!(
            self,
            ValueSource::Reference {
                reference: Reference::Field(_),
                ..
            }
        )
    }
}

/// Names a constrainable property of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    Required,
    Value,
    Format,
    MinLength,
    MaxLength,
    MinValue,
    MaxValue,
}

/// Modifier flags of a single declared property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyFlags<'a> {
    pub negated: bool,
    pub valid_only: bool,
    pub otherwise: Option<&'a OtherwiseRef>,
}

impl<'a, T> From<&'a Constraint<T>> for PropertyFlags<'a> {
    fn from(c: &'a Constraint<T>) -> Self {
        Self {
            negated: c.negated,
            valid_only: c.valid_only,
            otherwise: c.otherwise.as_ref(),
        }
    }
}

/// Normalized per-field constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub domain: ValueDomain,
    #[serde(default)]
    pub required: Constraint<bool>,
    #[serde(default)]
    pub value: Option<Constraint<ValueSource>>,
    #[serde(default)]
    pub format: Option<Constraint<String>>,
    #[serde(default)]
    pub min_length: Option<Constraint<Bound<usize>>>,
    #[serde(default)]
    pub max_length: Option<Constraint<Bound<usize>>>,
    #[serde(default)]
    pub min_value: Option<Constraint<Bound<Value>>>,
    #[serde(default)]
    pub max_value: Option<Constraint<Bound<Value>>>,
    /// Swap Valid and Invalid on every classification of this field.
    #[serde(default)]
    pub inverted_logic: bool,
}

impl Configuration {
    pub fn new(domain: ValueDomain) -> Self {
        Self {
            domain,
            required: Constraint::default(),
            value: None,
            format: None,
            min_length: None,
            max_length: None,
            min_value: None,
            max_value: None,
            inverted_logic: false,
        }
    }

    // ── Builders ────────────────────────────────────────────────────

    pub fn with_required(mut self, required: Constraint<bool>) -> Self {
        self.required = required;
        self
    }

    pub fn required(self) -> Self {
        self.with_required(Constraint::new(true))
    }

    pub fn with_value(mut self, value: Constraint<ValueSource>) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_format(mut self, format: Constraint<String>) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_min_length(mut self, bound: Constraint<Bound<usize>>) -> Self {
        self.min_length = Some(bound);
        self
    }

    pub fn with_max_length(mut self, bound: Constraint<Bound<usize>>) -> Self {
        self.max_length = Some(bound);
        self
    }

    pub fn with_min_value(mut self, bound: Constraint<Bound<Value>>) -> Self {
        self.min_value = Some(bound);
        self
    }

    pub fn with_max_value(mut self, bound: Constraint<Bound<Value>>) -> Self {
        self.max_value = Some(bound);
        self
    }

    pub fn with_inverted_logic(mut self, inverted: bool) -> Self {
        self.inverted_logic = inverted;
        self
    }

    // ── Queries ─────────────────────────────────────────────────────

    pub fn is_required(&self) -> bool {
        self.required.value
    }

    pub fn has_value_constraint(&self) -> bool {
        self.value.is_some()
    }

    pub fn is_value_negated(&self) -> bool {
        self.value.as_ref().is_some_and(|v| v.negated)
    }

    pub fn has_format(&self) -> bool {
        self.format.is_some()
    }

    pub fn format_pattern(&self) -> Option<&str> {
        self.format.as_ref().map(|f| f.value.as_str())
    }

    pub fn has_length_constraint(&self) -> bool {
        self.min_length.is_some() || self.max_length.is_some()
    }

    pub fn has_magnitude_constraint(&self) -> bool {
        self.min_value.is_some() || self.max_value.is_some()
    }

    /// Flags of `kind`, or `None` when the property is not declared.
    pub fn property(&self, kind: PropertyKind) -> Option<PropertyFlags<'_>> {
        match kind {
            PropertyKind::Required => Some((&self.required).into()),
            PropertyKind::Value => self.value.as_ref().map(Into::into),
            PropertyKind::Format => self.format.as_ref().map(Into::into),
            PropertyKind::MinLength => self.min_length.as_ref().map(Into::into),
            PropertyKind::MaxLength => self.max_length.as_ref().map(Into::into),
            PropertyKind::MinValue => self.min_value.as_ref().map(Into::into),
            PropertyKind::MaxValue => self.max_value.as_ref().map(Into::into),
        }
    }

    pub fn is_valid_only(&self, kind: PropertyKind) -> bool {
        self.property(kind).is_some_and(|p| p.valid_only)
    }
}
