// SPDX-License-Identifier: MIT OR Apache-2.0

//! Field storage handles and the built-in kind setters.
//!
//! Every bindable field type implements [`Value`]. The trait tells the walker
//! which structural [`Kind`] the type has and knows how to coerce a raw string
//! into the field in place. Types that need custom coercion either get a
//! setter registered in the [`Registry`](crate::service::Registry) or opt into
//! a capability with [`impl_text_value!`](crate::impl_text_value) /
//! [`impl_json_value!`](crate::impl_json_value).

use crate::domain::errors::{BoxError, ValueError};
use crate::domain::record::{parse_record, trim_brackets};
use crate::domain::tag::{Encoding, Tag};
use crate::ports::Configurable;
use base64::Engine as _;
use std::any::{type_name, Any, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::num::ParseIntError;
use std::path::PathBuf;
use std::time::Duration;

/// Signature of a setter stored in the registry.
pub type SetterFn = dyn Fn(&mut dyn Any, &str) -> Result<(), BoxError> + Send + Sync;

/// Structural kind of a field type, used to pick a built-in setter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    /// `bool`
    Bool,
    /// Signed integers
    Int,
    /// Unsigned integers
    Uint,
    /// `f32` / `f64`
    Float,
    /// `String`
    String,
    /// `Vec<u8>`
    Bytes,
    /// String-to-string maps
    Map,
    /// `Vec<T>` of a scalar element type
    Slice,
    /// A nested [`Configurable`] struct, flattened by the walker
    Struct,
    /// A type decoded through its `FromStr` implementation
    Text,
    /// A type decoded from JSON
    Json,
    /// No built-in setter; skipped unless a setter is registered
    Unsupported,
}

/// Upcast to [`Any`], implemented for every `'static` type.
pub trait AsAny: Any {
    /// Returns `self` as a mutable `Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A bindable field type.
///
/// The associated functions with a `Self: Sized` bound are used by the walker,
/// which always knows the concrete field type. The methods are called later
/// through a `&mut dyn Value` handle when the binder applies a value.
pub trait Value: AsAny {
    /// The structural kind of this type.
    fn kind() -> Kind
    where
        Self: Sized;

    /// The type whose registered setter applies to this field.
    ///
    /// Wrappers such as `Option<T>` report the wrapped type.
    fn target_type() -> TypeId
    where
        Self: Sized,
    {
        TypeId::of::<Self>()
    }

    /// Name of [`Value::target_type`], for errors and documentation.
    fn target_type_name() -> &'static str
    where
        Self: Sized,
    {
        type_name::<Self>()
    }

    /// Applies the built-in setter for this type's kind.
    fn set(&mut self, raw: &str, tag: &Tag) -> Result<(), BoxError>;

    /// Applies a registered setter.
    fn set_with(&mut self, setter: &SetterFn, raw: &str) -> Result<(), BoxError> {
        setter(self.as_any_mut(), raw)
    }

    /// Returns the nested struct to flatten, for [`Kind::Struct`] types.
    fn configurable(&mut self) -> Option<&mut dyn Configurable> {
        None
    }

    /// Returns the unset struct pointer to stage, for `Option<T>` fields
    /// whose struct has not been allocated yet.
    fn staging(&mut self) -> Option<&mut dyn Staging> {
        None
    }
}

/// An unset pointer to a nested struct.
///
/// The struct is built from its default, handed to `bind`, and only stored
/// when `bind` reports that it applied at least one value.
pub trait Staging {
    /// Binds into a fresh struct and commits it if `bind` returns `true`.
    fn stage(
        &mut self,
        bind: &mut dyn FnMut(&mut dyn Configurable) -> crate::domain::Result<bool>,
    ) -> crate::domain::Result<bool>;
}

impl<T: Value + Default> Staging for Option<T> {
    fn stage(
        &mut self,
        bind: &mut dyn FnMut(&mut dyn Configurable) -> crate::domain::Result<bool>,
    ) -> crate::domain::Result<bool> {
        let mut value = T::default();
        let bound = match value.configurable() {
            Some(nested) => bind(nested)?,
            None => false,
        };
        if bound {
            *self = Some(value);
        }
        Ok(bound)
    }
}

/// Splits an optional sign and a base prefix off an integer literal.
///
/// Returns `(negative, radix, digits)`.
fn split_integer(raw: &str) -> Result<(bool, u32, String), ValueError> {
    let invalid = |reason: &str| ValueError::InvalidInteger {
        raw: raw.to_string(),
        reason: reason.to_string(),
    };

    let (negative, unsigned) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };

    let lower = unsigned.to_ascii_lowercase();
    let (radix, digits) = if let Some(rest) = lower.strip_prefix("0x") {
        (16, rest)
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (8, rest)
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (2, rest)
    } else if lower.len() > 1 && lower.starts_with('0') {
        (8, &lower[1..])
    } else {
        (10, lower.as_str())
    };

    // A separator may directly follow a base prefix (`0x_ff`), never a plain digit.
    let digits = match radix {
        10 => digits,
        _ => digits.strip_prefix('_').unwrap_or(digits),
    };
    if digits.is_empty() {
        return Err(invalid("no digits"));
    }
    if digits.starts_with('_') || digits.ends_with('_') || digits.contains("__") {
        return Err(invalid("misplaced digit separator"));
    }
    if digits.starts_with(['+', '-']) {
        return Err(invalid("unexpected sign"));
    }

    Ok((negative, radix, digits.replace('_', "")))
}

fn parse_integer<T: Default>(
    raw: &str,
    from_str_radix: fn(&str, u32) -> Result<T, ParseIntError>,
) -> Result<T, BoxError> {
    if raw.is_empty() {
        return Ok(T::default());
    }
    let (negative, radix, digits) = split_integer(raw)?;
    let literal = if negative { format!("-{digits}") } else { digits };
    from_str_radix(&literal, radix).map_err(|e| {
        Box::new(ValueError::InvalidInteger {
            raw: raw.to_string(),
            reason: e.to_string(),
        }) as BoxError
    })
}

macro_rules! integer_value {
    ($kind:expr => $($t:ty),*) => {$(
        impl Element for $t {
            const KIND: Kind = $kind;

            fn parse_element(raw: &str) -> Result<Self, BoxError> {
                parse_integer(raw, <$t>::from_str_radix)
            }
        }
    )*};
}

integer_value!(Kind::Int => i8, i16, i32, i64, i128, isize);
integer_value!(Kind::Uint => u16, u32, u64, u128, usize);

/// A scalar type usable as an element of a list or map value.
pub trait Element: Sized + Any {
    /// Kind of a standalone field of this type.
    const KIND: Kind;

    /// Kind of a `Vec` of this type.
    const VEC_KIND: Kind = Kind::Slice;

    /// Parses one element.
    fn parse_element(raw: &str) -> Result<Self, BoxError>;

    /// Decodes a whole `Vec` of this type.
    ///
    /// Returns `None` to leave the field untouched.
    fn decode_vec(raw: &str, _tag: &Tag) -> Result<Option<Vec<Self>>, BoxError> {
        parse_record(trim_brackets(raw))?
            .iter()
            .map(|item| Self::parse_element(item))
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }
}

fn decode_hex(raw: &str) -> Result<Vec<u8>, ValueError> {
    if raw.len() % 2 != 0 {
        return Err(ValueError::InvalidHex(format!("odd length {}", raw.len())));
    }
    let nibble = |b: u8| char::from(b).to_digit(16);
    raw.as_bytes()
        .chunks(2)
        .enumerate()
        .map(|(i, pair)| match (nibble(pair[0]), nibble(pair[1])) {
            (Some(hi), Some(lo)) => Ok(((hi << 4) | lo) as u8),
            _ => Err(ValueError::InvalidHex(format!(
                "invalid digit pair at offset {}",
                i * 2
            ))),
        })
        .collect()
}

impl Element for u8 {
    const KIND: Kind = Kind::Uint;
    const VEC_KIND: Kind = Kind::Bytes;

    fn parse_element(raw: &str) -> Result<Self, BoxError> {
        parse_integer(raw, u8::from_str_radix)
    }

    fn decode_vec(raw: &str, tag: &Tag) -> Result<Option<Vec<Self>>, BoxError> {
        if raw.is_empty() {
            return Ok(None);
        }
        let bytes = match tag.byte_encoding() {
            Encoding::Hex => decode_hex(raw)?,
            Encoding::Base64 => base64::engine::general_purpose::STANDARD
                .decode(raw)
                .map_err(ValueError::from)?,
        };
        Ok(Some(bytes))
    }
}

impl Element for bool {
    const KIND: Kind = Kind::Bool;

    fn parse_element(raw: &str) -> Result<Self, BoxError> {
        Ok(raw.eq_ignore_ascii_case("true"))
    }
}

macro_rules! float_value {
    ($($t:ty),*) => {$(
        impl Element for $t {
            const KIND: Kind = Kind::Float;

            fn parse_element(raw: &str) -> Result<Self, BoxError> {
                if raw.is_empty() {
                    return Ok(0.0);
                }
                raw.parse::<$t>().map_err(|source| {
                    Box::new(ValueError::InvalidFloat {
                        raw: raw.to_string(),
                        source,
                    }) as BoxError
                })
            }
        }
    )*};
}

float_value!(f32, f64);

impl Element for String {
    const KIND: Kind = Kind::String;

    fn parse_element(raw: &str) -> Result<Self, BoxError> {
        Ok(raw.to_string())
    }
}

macro_rules! scalar_value {
    ($($t:ty),*) => {$(
        impl Value for $t {
            fn kind() -> Kind {
                <$t as Element>::KIND
            }

            fn set(&mut self, raw: &str, _tag: &Tag) -> Result<(), BoxError> {
                *self = <$t as Element>::parse_element(raw)?;
                Ok(())
            }
        }
    )*};
}

scalar_value!(
    bool, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, String
);

impl<T: Element> Value for Vec<T> {
    fn kind() -> Kind {
        T::VEC_KIND
    }

    fn set(&mut self, raw: &str, tag: &Tag) -> Result<(), BoxError> {
        if let Some(items) = T::decode_vec(raw, tag)? {
            *self = items;
        }
        Ok(())
    }
}

fn parse_entries<V: Element>(raw: &str) -> Result<Vec<(String, V)>, BoxError> {
    parse_record(trim_brackets(raw))?
        .into_iter()
        .map(|entry| match entry.split_once('=') {
            Some((key, value)) => Ok((key.to_string(), V::parse_element(value)?)),
            None => Err(Box::new(ValueError::InvalidMapEntry(entry)) as BoxError),
        })
        .collect()
}

fn map_kind<V: Element>() -> Kind {
    if V::KIND == Kind::String {
        Kind::Map
    } else {
        Kind::Unsupported
    }
}

impl<V: Element, S: BuildHasher + Default + 'static> Value for HashMap<String, V, S> {
    fn kind() -> Kind {
        map_kind::<V>()
    }

    fn set(&mut self, raw: &str, _tag: &Tag) -> Result<(), BoxError> {
        *self = parse_entries::<V>(raw)?.into_iter().collect();
        Ok(())
    }
}

impl<V: Element> Value for BTreeMap<String, V> {
    fn kind() -> Kind {
        map_kind::<V>()
    }

    fn set(&mut self, raw: &str, _tag: &Tag) -> Result<(), BoxError> {
        *self = parse_entries::<V>(raw)?.into_iter().collect();
        Ok(())
    }
}

impl<T: Value + Default> Value for Option<T> {
    fn kind() -> Kind {
        T::kind()
    }

    fn target_type() -> TypeId {
        T::target_type()
    }

    fn target_type_name() -> &'static str {
        T::target_type_name()
    }

    fn set(&mut self, raw: &str, tag: &Tag) -> Result<(), BoxError> {
        let mut value = T::default();
        value.set(raw, tag)?;
        *self = Some(value);
        Ok(())
    }

    fn set_with(&mut self, setter: &SetterFn, raw: &str) -> Result<(), BoxError> {
        let mut value = T::default();
        value.set_with(setter, raw)?;
        *self = Some(value);
        Ok(())
    }

    fn configurable(&mut self) -> Option<&mut dyn Configurable> {
        self.as_mut().and_then(|value| value.configurable())
    }

    fn staging(&mut self) -> Option<&mut dyn Staging> {
        if self.is_none() && T::kind() == Kind::Struct {
            Some(self)
        } else {
            None
        }
    }
}

impl Value for Duration {
    fn kind() -> Kind {
        Kind::Unsupported
    }

    fn set(&mut self, _raw: &str, _tag: &Tag) -> Result<(), BoxError> {
        Err(Box::new(ValueError::Unsupported {
            type_name: type_name::<Self>(),
        }))
    }
}

crate::impl_text_value!(IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, PathBuf);
