//! Registration-time configuration errors.
//!
//! Only invalid registrations fail, and they fail fast. Resolution never
//! raises: a missing binding, an unconstructible implementation and a broken
//! dependency cycle all surface as `None`.

use thiserror::Error;

/// An invalid binding, reported at registration time or when a
/// [`Resolver`](crate::Resolver) validates the registry it was built over.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
  /// The implementation names a type with no descriptor in the type registry.
  #[error("no type descriptor defined for `{type_name}`")]
  MissingTypeInfo { type_name: &'static str },

  /// An abstract contract was registered as an implementation.
  #[error("`{implementation}` is not a concrete type and cannot serve as an implementation")]
  NotConcrete { implementation: &'static str },

  /// The implementation does not satisfy the contract it was bound to.
  #[error("`{implementation}` cannot be bound to contract `{contract}`: the types are unrelated")]
  Unrelated {
    contract: &'static str,
    implementation: &'static str,
  },
}
