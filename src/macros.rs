// SPDX-License-Identifier: MIT OR Apache-2.0

//! Code generation for bindable types.

/// Implements [`Configurable`](crate::ports::Configurable) and the struct-kind
/// [`Value`](crate::domain::Value) for a struct.
///
/// Fields are listed in declaration order, each optionally followed by
/// `=> "tag"`. The field identifier is used as the name when the tag does not
/// override it, except for nested structs, which are flattened unless they are
/// given an explicit name.
///
/// # Examples
///
/// ```
/// use envbind::configurable;
///
/// #[derive(Debug, Default)]
/// struct Database {
///     url: String,
///     pool_size: u32,
/// }
///
/// configurable!(Database {
///     url => "url,required",
///     pool_size => "pool_size,default=8",
/// });
///
/// #[derive(Debug, Default)]
/// struct Config {
///     database: Database,
///     verbose: bool,
/// }
///
/// configurable!(Config {
///     database => "db",
///     verbose,
/// });
/// ```
#[macro_export]
macro_rules! configurable {
    ($ty:ty { $($field:ident $(=> $tag:literal)?),* $(,)? }) => {
        impl $crate::ports::Configurable for $ty {
            fn describe<'a>(&'a mut self, fields: &mut $crate::service::Fields<'a>) {
                $(
                    fields.field(
                        stringify!($field),
                        $crate::configurable!(@tag $($tag)?),
                        &mut self.$field,
                    );
                )*
            }
        }

        impl $crate::domain::Value for $ty {
            fn kind() -> $crate::domain::Kind {
                $crate::domain::Kind::Struct
            }

            fn set(
                &mut self,
                _raw: &str,
                _tag: &$crate::domain::Tag,
            ) -> ::std::result::Result<(), $crate::domain::BoxError> {
                ::std::result::Result::Err(::std::boxed::Box::new(
                    $crate::domain::ValueError::Unsupported {
                        type_name: ::std::any::type_name::<Self>(),
                    },
                ))
            }

            fn configurable(
                &mut self,
            ) -> ::std::option::Option<&mut dyn $crate::ports::Configurable> {
                ::std::option::Option::Some(self)
            }
        }
    };
    (@tag) => {
        ""
    };
    (@tag $tag:literal) => {
        $tag
    };
}

/// Opts `FromStr` types into text decoding.
///
/// The type's parse error must implement `std::error::Error + Send + Sync`.
///
/// # Examples
///
/// ```
/// use envbind::impl_text_value;
/// use std::str::FromStr;
///
/// #[derive(Debug, Default, PartialEq)]
/// enum Level {
///     #[default]
///     Info,
///     Debug,
/// }
///
/// impl FromStr for Level {
///     type Err = std::io::Error;
///
///     fn from_str(s: &str) -> Result<Self, Self::Err> {
///         match s {
///             "info" => Ok(Level::Info),
///             "debug" => Ok(Level::Debug),
///             _ => Err(std::io::Error::other(format!("unknown level {s}"))),
///         }
///     }
/// }
///
/// impl_text_value!(Level);
/// ```
#[macro_export]
macro_rules! impl_text_value {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::domain::Value for $ty {
            fn kind() -> $crate::domain::Kind {
                $crate::domain::Kind::Text
            }

            fn set(
                &mut self,
                raw: &str,
                _tag: &$crate::domain::Tag,
            ) -> ::std::result::Result<(), $crate::domain::BoxError> {
                *self = <$ty as ::std::str::FromStr>::from_str(raw).map_err(|e| {
                    $crate::domain::ValueError::InvalidText(::std::boxed::Box::new(e))
                })?;
                ::std::result::Result::Ok(())
            }
        }
    )+};
}

/// Opts `serde::de::DeserializeOwned` types into JSON decoding.
///
/// # Examples
///
/// ```
/// use envbind::impl_json_value;
/// use serde::Deserialize;
///
/// #[derive(Debug, Default, Deserialize)]
/// struct Limits {
///     burst: u32,
///     rate: f64,
/// }
///
/// impl_json_value!(Limits);
/// ```
#[cfg(feature = "json")]
#[macro_export]
macro_rules! impl_json_value {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::domain::Value for $ty {
            fn kind() -> $crate::domain::Kind {
                $crate::domain::Kind::Json
            }

            fn set(
                &mut self,
                raw: &str,
                _tag: &$crate::domain::Tag,
            ) -> ::std::result::Result<(), $crate::domain::BoxError> {
                *self = $crate::__private::serde_json::from_str(raw)
                    .map_err($crate::domain::ValueError::from)?;
                ::std::result::Result::Ok(())
            }
        }
    )+};
}
