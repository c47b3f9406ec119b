//! "Is this field meaningfully filled" predicate shared by every prompt builder

use serde_json::Value;

/// A value that may or may not carry user content.
///
/// Strings count when they are non-blank, lists when at least one element
/// counts, and scalars follow their truthiness.
pub trait Filled {
    fn is_filled(&self) -> bool;
}

/// Free-function form of [`Filled::is_filled`]
pub fn is_filled<T: Filled + ?Sized>(value: &T) -> bool {
    value.is_filled()
}

impl Filled for str {
    fn is_filled(&self) -> bool {
        !self.trim().is_empty()
    }
}

impl Filled for String {
    fn is_filled(&self) -> bool {
        self.as_str().is_filled()
    }
}

impl<T: Filled> Filled for Option<T> {
    fn is_filled(&self) -> bool {
        self.as_ref().map_or(false, Filled::is_filled)
    }
}

impl<T: Filled> Filled for [T] {
    fn is_filled(&self) -> bool {
        self.iter().any(Filled::is_filled)
    }
}

impl<T: Filled> Filled for Vec<T> {
    fn is_filled(&self) -> bool {
        self.as_slice().is_filled()
    }
}

impl<T: Filled + ?Sized> Filled for &T {
    fn is_filled(&self) -> bool {
        (**self).is_filled()
    }
}

impl Filled for bool {
    fn is_filled(&self) -> bool {
        *self
    }
}

impl Filled for i64 {
    fn is_filled(&self) -> bool {
        *self != 0
    }
}

impl Filled for u32 {
    fn is_filled(&self) -> bool {
        *self != 0
    }
}

impl Filled for f64 {
    fn is_filled(&self) -> bool {
        *self != 0.0
    }
}

impl Filled for Value {
    fn is_filled(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
            Value::String(s) => s.is_filled(),
            Value::Array(items) => items.is_filled(),
            Value::Object(map) => !map.is_empty(),
        }
    }
}

/// Trimmed text of an optional field, or `None` when it is not filled
pub fn filled_text(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
}
