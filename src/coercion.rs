//! Turns the untyped value a script returned into the type the caller asked for.
//!
//! Coercion runs through an ordered list of handlers. Each handler either claims
//! the raw value (returning a result or a hard error) or passes it on:
//!
//! 1. null: `null` is "absent" for every target
//! 2. element collection: arrays of element references, single references
//! 3. integral: numbers requested as integers, truncated toward zero
//! 4. fallback: direct cast, or a [`DialectError::CoercionMismatch`]
//!
//! The order matters. Null comes first so that "not found" and "found but
//! falsy" stay distinguishable, and collections come before numbers so an empty
//! collection is never read as zero.

use crate::errors::{DialectError, Result};
use crate::types::ElementRef;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    String,
    Integer,
    Float,
    Boolean,
    Element,
    Elements,
    Map,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TargetKind::String => "string",
            TargetKind::Integer => "integer",
            TargetKind::Float => "float",
            TargetKind::Boolean => "boolean",
            TargetKind::Element => "element",
            TargetKind::Elements => "element sequence",
            TargetKind::Map => "map",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypedResult {
    Absent,
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Element(ElementRef),
    Elements(Vec<ElementRef>),
    Map(Map<String, Value>),
}

impl TypedResult {
    pub fn is_absent(&self) -> bool {
        matches!(self, TypedResult::Absent)
    }

    fn describe(&self) -> &'static str {
        match self {
            TypedResult::Absent => "absent",
            TypedResult::String(_) => "string",
            TypedResult::Integer(_) => "integer",
            TypedResult::Float(_) => "float",
            TypedResult::Boolean(_) => "boolean",
            TypedResult::Element(_) => "element",
            TypedResult::Elements(_) => "element sequence",
            TypedResult::Map(_) => "map",
        }
    }
}

/// One link of the chain. `None` delegates to the next handler.
pub type Handler = Arc<dyn Fn(&Value, TargetKind) -> Option<Result<TypedResult>> + Send + Sync>;

#[derive(Clone)]
pub struct CoercionChain {
    handlers: Vec<Handler>,
}

impl CoercionChain {
    pub fn new(handlers: Vec<Handler>) -> Self {
        Self { handlers }
    }

    pub fn standard() -> Self {
        Self::new(vec![
            Arc::new(null_handler) as Handler,
            Arc::new(element_collection_handler) as Handler,
            Arc::new(integral_handler) as Handler,
            Arc::new(fallback_handler) as Handler,
        ])
    }

    pub fn coerce(&self, raw: &Value, target: TargetKind) -> Result<TypedResult> {
        for handler in &self.handlers {
            if let Some(result) = handler(raw, target) {
                return result;
            }
        }
        Err(mismatch(target, describe_value(raw)))
    }

    pub fn parse<T: ScriptResult>(&self, raw: &Value) -> Result<Option<T>> {
        let typed = self.coerce(raw, T::KIND)?;
        T::from_typed(typed)
    }
}

impl Default for CoercionChain {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for CoercionChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoercionChain")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

fn mismatch(target: TargetKind, actual: impl Into<String>) -> DialectError {
    DialectError::CoercionMismatch {
        expected: target.to_string(),
        actual: actual.into(),
    }
}

fn describe_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {}", b),
        Value::Number(n) => format!("number {}", n),
        Value::String(_) => "string".to_string(),
        Value::Array(items) => format!("array of {}", items.len()),
        Value::Object(_) => "object".to_string(),
    }
}

pub fn null_handler(raw: &Value, _target: TargetKind) -> Option<Result<TypedResult>> {
    raw.is_null().then_some(Ok(TypedResult::Absent))
}

pub fn element_collection_handler(raw: &Value, target: TargetKind) -> Option<Result<TypedResult>> {
    let elements = match raw {
        Value::Array(items) => items
            .iter()
            .map(ElementRef::from_value)
            .collect::<Option<Vec<_>>>()?,
        other => vec![ElementRef::from_value(other)?],
    };

    Some(match target {
        TargetKind::Elements => Ok(TypedResult::Elements(elements)),
        TargetKind::Element => Ok(elements
            .into_iter()
            .next()
            .map_or(TypedResult::Absent, TypedResult::Element)),
        _ => Err(mismatch(
            target,
            format!("collection of {} elements", elements.len()),
        )),
    })
}

pub fn integral_handler(raw: &Value, target: TargetKind) -> Option<Result<TypedResult>> {
    if target != TargetKind::Integer {
        return None;
    }
    let number = match raw {
        Value::Number(n) => n,
        _ => return None,
    };
    // Drivers hand back whole numbers as floats; truncate, never round.
    let value = match number.as_i64() {
        Some(i) => i,
        None => number.as_f64().map_or(0, |f| f as i64),
    };
    Some(Ok(TypedResult::Integer(value)))
}

pub fn fallback_handler(raw: &Value, target: TargetKind) -> Option<Result<TypedResult>> {
    let result = match (target, raw) {
        (TargetKind::String, Value::String(s)) => Ok(TypedResult::String(s.clone())),
        (TargetKind::Boolean, Value::Bool(b)) => Ok(TypedResult::Boolean(*b)),
        (TargetKind::Float, Value::Number(n)) => n
            .as_f64()
            .map(TypedResult::Float)
            .ok_or_else(|| mismatch(target, describe_value(raw))),
        (TargetKind::Map, Value::Object(map)) => Ok(TypedResult::Map(map.clone())),
        _ => Err(mismatch(target, describe_value(raw))),
    };
    Some(result)
}

/// Types a script result can be coerced into.
pub trait ScriptResult: Sized {
    const KIND: TargetKind;

    /// `Ok(None)` means the script returned nothing for this type.
    fn from_typed(result: TypedResult) -> Result<Option<Self>>;
}

fn unexpected<T>(target: TargetKind, result: &TypedResult) -> Result<Option<T>> {
    Err(mismatch(target, result.describe()))
}

impl ScriptResult for String {
    const KIND: TargetKind = TargetKind::String;

    fn from_typed(result: TypedResult) -> Result<Option<Self>> {
        match result {
            TypedResult::Absent => Ok(None),
            TypedResult::String(s) => Ok(Some(s)),
            other => unexpected(Self::KIND, &other),
        }
    }
}

impl ScriptResult for bool {
    const KIND: TargetKind = TargetKind::Boolean;

    fn from_typed(result: TypedResult) -> Result<Option<Self>> {
        match result {
            TypedResult::Absent => Ok(None),
            TypedResult::Boolean(b) => Ok(Some(b)),
            other => unexpected(Self::KIND, &other),
        }
    }
}

impl ScriptResult for i64 {
    const KIND: TargetKind = TargetKind::Integer;

    fn from_typed(result: TypedResult) -> Result<Option<Self>> {
        match result {
            TypedResult::Absent => Ok(None),
            TypedResult::Integer(i) => Ok(Some(i)),
            other => unexpected(Self::KIND, &other),
        }
    }
}

macro_rules! narrowed_integer {
    ($($t:ty),*) => {
        $(impl ScriptResult for $t {
            const KIND: TargetKind = TargetKind::Integer;

            fn from_typed(result: TypedResult) -> Result<Option<Self>> {
                match i64::from_typed(result)? {
                    None => Ok(None),
                    Some(i) => <$t>::try_from(i)
                        .map(Some)
                        .map_err(|_| mismatch(Self::KIND, format!("{} out of range for {}", i, stringify!($t)))),
                }
            }
        })*
    };
}

narrowed_integer!(i32, u32, usize);

impl ScriptResult for f64 {
    const KIND: TargetKind = TargetKind::Float;

    fn from_typed(result: TypedResult) -> Result<Option<Self>> {
        match result {
            TypedResult::Absent => Ok(None),
            TypedResult::Float(f) => Ok(Some(f)),
            other => unexpected(Self::KIND, &other),
        }
    }
}

impl ScriptResult for ElementRef {
    const KIND: TargetKind = TargetKind::Element;

    fn from_typed(result: TypedResult) -> Result<Option<Self>> {
        match result {
            TypedResult::Absent => Ok(None),
            TypedResult::Element(e) => Ok(Some(e)),
            other => unexpected(Self::KIND, &other),
        }
    }
}

impl ScriptResult for Vec<ElementRef> {
    const KIND: TargetKind = TargetKind::Elements;

    fn from_typed(result: TypedResult) -> Result<Option<Self>> {
        match result {
            TypedResult::Absent => Ok(Some(Vec::new())),
            TypedResult::Elements(e) => Ok(Some(e)),
            other => unexpected(Self::KIND, &other),
        }
    }
}

impl ScriptResult for Map<String, Value> {
    const KIND: TargetKind = TargetKind::Map;

    fn from_typed(result: TypedResult) -> Result<Option<Self>> {
        match result {
            TypedResult::Absent => Ok(None),
            TypedResult::Map(m) => Ok(Some(m)),
            other => unexpected(Self::KIND, &other),
        }
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for bool {}
    impl Sealed for i64 {}
    impl Sealed for String {}
}

/// Element property and data values: booleans, integers and strings only.
pub trait PropertyValue: ScriptResult + sealed::Sealed {
    fn to_script_literal(&self) -> String;
}

impl PropertyValue for bool {
    fn to_script_literal(&self) -> String {
        self.to_string()
    }
}

impl PropertyValue for i64 {
    fn to_script_literal(&self) -> String {
        self.to_string()
    }
}

impl PropertyValue for String {
    fn to_script_literal(&self) -> String {
        crate::utils::quote(self)
    }
}

/// Runtime form of the [`PropertyValue`] restriction.
pub fn validate_property_kind(kind: TargetKind) -> Result<()> {
    match kind {
        TargetKind::Boolean | TargetKind::Integer | TargetKind::String => Ok(()),
        other => Err(DialectError::UnsupportedType(format!(
            "properties and data can only be read as boolean, integer or string, not {}",
            other
        ))),
    }
}
