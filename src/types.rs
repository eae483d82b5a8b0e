use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key the W3C WebDriver protocol uses to mark a serialized element.
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52f-4f903c3b9b6b";

/// Driver-native handle to a DOM element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementRef(pub String);

impl ElementRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }

    /// Reads a reference out of a raw script value, if it has the element shape.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        if object.len() != 1 {
            return None;
        }
        object
            .get(ELEMENT_KEY)
            .and_then(Value::as_str)
            .map(|id| Self(id.to_string()))
    }

    /// Script argument form, understood by every driver.
    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        object.insert(ELEMENT_KEY.to_string(), Value::String(self.0.clone()));
        Value::Object(object)
    }
}

/// Pixel coordinates as reported by jQuery `.position()` / `.offset()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub top: i64,
    pub left: i64,
}

impl Position {
    pub fn new(top: i64, left: i64) -> Self {
        Self { top, left }
    }

    /// Builds a position only when both `top` and `left` are numeric.
    pub fn from_map(map: &Map<String, Value>) -> Option<Self> {
        let top = map.get("top").and_then(Value::as_f64)?;
        let left = map.get("left").and_then(Value::as_f64)?;
        Some(Self {
            top: top as i64,
            left: left as i64,
        })
    }
}

/// One entry of jQuery `.serializeArray()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_element_ref_shape() {
        let element = ElementRef::new("abc");
        assert_eq!(element.to_value(), json!({ ELEMENT_KEY: "abc" }));
        assert_eq!(ElementRef::from_value(&element.to_value()), Some(element));
    }

    #[test]
    fn test_element_ref_rejects_other_objects() {
        assert_eq!(ElementRef::from_value(&json!({ "id": "abc" })), None);
        assert_eq!(
            ElementRef::from_value(&json!({ ELEMENT_KEY: "abc", "extra": 1 })),
            None
        );
        assert_eq!(ElementRef::from_value(&json!("abc")), None);
    }

    #[test]
    fn test_position_requires_both_keys() {
        let full = json!({ "top": 100, "left": 200 });
        assert_eq!(
            Position::from_map(full.as_object().unwrap()),
            Some(Position::new(100, 200))
        );

        let partial = json!({ "top": 100 });
        assert_eq!(Position::from_map(partial.as_object().unwrap()), None);
    }

    #[test]
    fn test_position_truncates_fractions() {
        let raw = json!({ "top": 10.9, "left": -3.7 });
        assert_eq!(
            Position::from_map(raw.as_object().unwrap()),
            Some(Position::new(10, -3))
        );
    }
}
