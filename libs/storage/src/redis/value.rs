use std::fmt;

/// A value written to the cache
///
/// Redis stores strings, so every variant is written in its display form:
/// `true`/`false` for booleans, shortest round-trip form for numbers.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheValue {
    Text(String),
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    Boolean(bool),
}

impl fmt::Display for CacheValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheValue::Text(text) => f.write_str(text),
            CacheValue::Integer(n) => write!(f, "{}", n),
            CacheValue::Unsigned(n) => write!(f, "{}", n),
            CacheValue::Float(n) => write!(f, "{}", n),
            CacheValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<String> for CacheValue {
    fn from(value: String) -> Self {
        CacheValue::Text(value)
    }
}

impl From<&str> for CacheValue {
    fn from(value: &str) -> Self {
        CacheValue::Text(value.to_string())
    }
}

impl From<&String> for CacheValue {
    fn from(value: &String) -> Self {
        CacheValue::Text(value.clone())
    }
}

macro_rules! integer_from {
    ($variant:ident: $target:ty => $($source:ty),+) => {
        $(
            impl From<$source> for CacheValue {
                fn from(value: $source) -> Self {
                    CacheValue::$variant(<$target>::from(value))
                }
            }
        )+
    };
}

integer_from!(Integer: i64 => i8, i16, i32, i64);
integer_from!(Unsigned: u64 => u8, u16, u32, u64);

impl From<isize> for CacheValue {
    fn from(value: isize) -> Self {
        CacheValue::Integer(value as i64)
    }
}

impl From<usize> for CacheValue {
    fn from(value: usize) -> Self {
        CacheValue::Unsigned(value as u64)
    }
}

impl From<f64> for CacheValue {
    fn from(value: f64) -> Self {
        CacheValue::Float(value)
    }
}

impl From<f32> for CacheValue {
    fn from(value: f32) -> Self {
        // Widening directly would write 0.1f32 as 0.10000000149011612
        let widened = value.to_string().parse().unwrap_or(f64::from(value));
        CacheValue::Float(widened)
    }
}

impl From<bool> for CacheValue {
    fn from(value: bool) -> Self {
        CacheValue::Boolean(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_forms() {
        assert_eq!(CacheValue::from("token").to_string(), "token");
        assert_eq!(CacheValue::from(42).to_string(), "42");
        assert_eq!(CacheValue::from(-7i64).to_string(), "-7");
        assert_eq!(CacheValue::from(1.5).to_string(), "1.5");
        assert_eq!(CacheValue::from(3.0).to_string(), "3");
        assert_eq!(CacheValue::from(true).to_string(), "true");
        assert_eq!(CacheValue::from(false).to_string(), "false");
    }

    #[test]
    fn test_every_numeric_type_converts() {
        assert_eq!(CacheValue::from(5u64).to_string(), "5");
        assert_eq!(CacheValue::from(u64::MAX).to_string(), "18446744073709551615");
        assert_eq!(CacheValue::from(7usize).to_string(), "7");
        assert_eq!(CacheValue::from(-3isize).to_string(), "-3");
        assert_eq!(CacheValue::from(200u8).to_string(), "200");
        assert_eq!(CacheValue::from(-12i16).to_string(), "-12");
        assert_eq!(CacheValue::from(0.1f32).to_string(), "0.1");
        assert_eq!(CacheValue::from(2.5f32).to_string(), "2.5");
    }

    #[test]
    fn test_from_owned_and_borrowed_strings() {
        let owned = String::from("user-id");
        assert_eq!(CacheValue::from(&owned), CacheValue::Text("user-id".to_string()));
        assert_eq!(CacheValue::from(owned), CacheValue::Text("user-id".to_string()));
    }
}
