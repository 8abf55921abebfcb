//! Tagged decoding of list payloads.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Object keys under which a list may be wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapperKey {
    /// `{"data": [...]}`
    Data,
    /// `{"items": [...]}`
    Items,
}

impl WrapperKey {
    const ALL: [Self; 2] = [Self::Data, Self::Items];

    /// JSON key name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::Items => "items",
        }
    }
}

/// The recognised shapes of a list payload.
///
/// # Examples
/// ```
/// use envelope::{ListShape, WrapperKey};
/// use serde_json::json;
///
/// let shape = ListShape::classify(json!({"items": [1, 2]}));
/// assert!(matches!(shape, ListShape::Wrapped { key: WrapperKey::Items, .. }));
/// assert_eq!(shape.into_items().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ListShape {
    /// A bare JSON array.
    Bare(Vec<Value>),
    /// An object holding the array under one key.
    Wrapped {
        /// Key that held the array.
        key: WrapperKey,
        /// Array elements.
        items: Vec<Value>,
    },
    /// An object holding an object that holds the array, e.g.
    /// `{"data": {"items": [...]}}`.
    Nested {
        /// Outer key.
        outer: WrapperKey,
        /// Inner key that held the array.
        inner: WrapperKey,
        /// Array elements.
        items: Vec<Value>,
    },
    /// Anything else. Treated as an empty list.
    Unrecognised,
}

impl ListShape {
    /// Classify a payload. Keys are tried in [`WrapperKey`] declaration order.
    #[must_use]
    pub fn classify(value: Value) -> Self {
        let mut map = match value {
            Value::Array(items) => return Self::Bare(items),
            Value::Object(map) => map,
            _ => return Self::Unrecognised,
        };

        for outer in WrapperKey::ALL {
            match map.remove(outer.as_str()) {
                Some(Value::Array(items)) => return Self::Wrapped { key: outer, items },
                Some(Value::Object(mut nested)) => {
                    for inner in WrapperKey::ALL {
                        if let Some(Value::Array(items)) = nested.remove(inner.as_str()) {
                            return Self::Nested {
                                outer,
                                inner,
                                items,
                            };
                        }
                    }
                }
                _ => {}
            }
        }
        Self::Unrecognised
    }

    /// Whether the payload matched a known shape.
    #[must_use]
    pub const fn is_recognised(&self) -> bool {
        !matches!(self, Self::Unrecognised)
    }

    /// Consume the shape, returning its elements in order.
    #[must_use]
    pub fn into_items(self) -> Vec<Value> {
        match self {
            Self::Bare(items) | Self::Wrapped { items, .. } | Self::Nested { items, .. } => items,
            Self::Unrecognised => Vec::new(),
        }
    }
}

/// Result of decoding list elements one by one.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedList<T> {
    /// Elements that decoded, in payload order.
    pub items: Vec<T>,
    /// Decode errors for elements that were skipped.
    pub rejected: Vec<String>,
    /// Whether the outer shape was recognised.
    pub shape_recognised: bool,
}

/// Classify `value` and decode each element into `T`.
///
/// A malformed element is skipped and reported in
/// [`DecodedList::rejected`] rather than failing the whole list.
pub fn decode_items<T: DeserializeOwned>(value: Value) -> DecodedList<T> {
    let shape = ListShape::classify(value);
    let shape_recognised = shape.is_recognised();
    let mut items = Vec::new();
    let mut rejected = Vec::new();
    for element in shape.into_items() {
        match serde_json::from_value::<T>(element) {
            Ok(item) => items.push(item),
            Err(error) => rejected.push(error.to_string()),
        }
    }
    DecodedList {
        items,
        rejected,
        shape_recognised,
    }
}
