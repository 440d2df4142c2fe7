// SPDX-License-Identifier: MIT OR Apache-2.0

//! The "describe yourself" interface implemented by bindable structs.

use crate::service::Fields;

/// A struct whose fields can be bound from external values.
///
/// Implementations hand every field to the walker in declaration order, with
/// the field identifier and its declaration tag. The
/// [`configurable!`](crate::configurable) macro generates this impl; writing
/// it by hand is equivalent.
///
/// # Examples
///
/// ```rust
/// use envbind::ports::Configurable;
/// use envbind::service::Fields;
///
/// #[derive(Default)]
/// struct Server {
///     host: String,
///     port: u16,
/// }
///
/// impl Configurable for Server {
///     fn describe<'a>(&'a mut self, fields: &mut Fields<'a>) {
///         fields.field("host", "host,default=localhost", &mut self.host);
///         fields.field("port", "port,required", &mut self.port);
///     }
/// }
/// ```
pub trait Configurable {
    /// Registers each field with the walker.
    ///
    /// Every field must be handed over at most once; the walker keeps the
    /// mutable borrow until binding completes.
    fn describe<'a>(&'a mut self, fields: &mut Fields<'a>);
}
