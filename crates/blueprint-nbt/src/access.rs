//! Field accessors.

use blueprint_core::{Error, Result};
use quartz_nbt::{NbtCompound, NbtTag};

/// A value that can be extracted from a single tag.
///
/// Implementations return `None` on a type mismatch; callers never see a
/// partially converted value.
pub trait FromTag<'a>: Sized {
    fn from_tag(tag: &'a NbtTag) -> Option<Self>;
}

impl FromTag<'_> for i32 {
    fn from_tag(tag: &NbtTag) -> Option<Self> {
        match tag {
            NbtTag::Int(value) => Some(*value),
            _ => None,
        }
    }
}

impl FromTag<'_> for i16 {
    fn from_tag(tag: &NbtTag) -> Option<Self> {
        match tag {
            NbtTag::Short(value) => Some(*value),
            _ => None,
        }
    }
}

impl FromTag<'_> for i8 {
    fn from_tag(tag: &NbtTag) -> Option<Self> {
        match tag {
            NbtTag::Byte(value) => Some(*value),
            _ => None,
        }
    }
}

/// Booleans are stored as bytes; any non-zero value is `true`.
impl FromTag<'_> for bool {
    fn from_tag(tag: &NbtTag) -> Option<Self> {
        i8::from_tag(tag).map(|value| value != 0)
    }
}

impl<'a> FromTag<'a> for &'a str {
    fn from_tag(tag: &'a NbtTag) -> Option<Self> {
        match tag {
            NbtTag::String(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

impl FromTag<'_> for String {
    fn from_tag(tag: &NbtTag) -> Option<Self> {
        <&str>::from_tag(tag).map(str::to_owned)
    }
}

impl<'a> FromTag<'a> for &'a NbtCompound {
    fn from_tag(tag: &'a NbtTag) -> Option<Self> {
        match tag {
            NbtTag::Compound(value) => Some(value),
            _ => None,
        }
    }
}

/// Byte arrays come back as an owned, unsigned copy.
impl FromTag<'_> for Vec<u8> {
    fn from_tag(tag: &NbtTag) -> Option<Self> {
        match tag {
            NbtTag::ByteArray(bytes) => Some(bytemuck::cast_slice::<i8, u8>(bytes).to_vec()),
            _ => None,
        }
    }
}

/// Whether `key` is present, regardless of its type.
pub fn contains(document: &NbtCompound, key: &str) -> bool {
    document.contains_key(key)
}

/// Read a required field.
pub fn get<'a, T: FromTag<'a>>(document: &'a NbtCompound, key: &str) -> Result<T> {
    get_optional(document, key)?.ok_or_else(|| Error::missing_field(key))
}

/// Read a field that may be absent. A present field of the wrong type is
/// still an error.
pub fn get_optional<'a, T: FromTag<'a>>(document: &'a NbtCompound, key: &str) -> Result<Option<T>> {
    match document.get::<_, &NbtTag>(key) {
        Ok(tag) => T::from_tag(tag).map(Some).ok_or_else(|| Error::missing_field(key)),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NbtCompound {
        let mut doc = NbtCompound::new();
        doc.insert("Width", NbtTag::Short(12));
        doc.insert("WEOffsetX", NbtTag::Int(-3));
        doc.insert("Flag", NbtTag::Byte(1));
        doc.insert("Materials", NbtTag::String("Alpha".to_string()));
        doc.insert("Blocks", NbtTag::ByteArray(vec![1, -1, 0]));
        let mut nested = NbtCompound::new();
        nested.insert("Inner", NbtTag::Int(7));
        doc.insert("Nested", NbtTag::Compound(nested));
        doc
    }

    #[test]
    fn reads_scalars() {
        let doc = sample();
        assert_eq!(get::<i16>(&doc, "Width").unwrap(), 12);
        assert_eq!(get::<i32>(&doc, "WEOffsetX").unwrap(), -3);
        assert_eq!(get::<i8>(&doc, "Flag").unwrap(), 1);
        assert!(get::<bool>(&doc, "Flag").unwrap());
        assert_eq!(get::<&str>(&doc, "Materials").unwrap(), "Alpha");
        assert_eq!(get::<String>(&doc, "Materials").unwrap(), "Alpha");
    }

    #[test]
    fn reads_nested_document() {
        let doc = sample();
        let nested = get::<&NbtCompound>(&doc, "Nested").unwrap();
        assert_eq!(get::<i32>(nested, "Inner").unwrap(), 7);
    }

    #[test]
    fn byte_array_is_unsigned_copy() {
        let doc = sample();
        let mut bytes = get::<Vec<u8>>(&doc, "Blocks").unwrap();
        assert_eq!(bytes, vec![1, 255, 0]);
        bytes[0] = 99;
        assert_eq!(get::<Vec<u8>>(&doc, "Blocks").unwrap()[0], 1);
    }

    #[test]
    fn missing_field_is_format_error() {
        let doc = sample();
        let err = get::<i16>(&doc, "Height").unwrap_err();
        assert!(matches!(err, Error::Format(msg) if msg.contains("Height")));
    }

    #[test]
    fn wrong_type_is_format_error() {
        let doc = sample();
        // Width is a short, not an int.
        assert!(matches!(get::<i32>(&doc, "Width"), Err(Error::Format(_))));
        assert!(matches!(get::<Vec<u8>>(&doc, "Materials"), Err(Error::Format(_))));
    }

    #[test]
    fn optional_field() {
        let doc = sample();
        assert_eq!(get_optional::<Vec<u8>>(&doc, "AddBlocks").unwrap(), None);
        assert_eq!(get_optional::<i16>(&doc, "Width").unwrap(), Some(12));
        assert!(get_optional::<i16>(&doc, "Materials").is_err());
        assert!(contains(&doc, "Blocks"));
        assert!(!contains(&doc, "AddBlocks"));
    }
}
