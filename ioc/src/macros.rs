//! Public macros for ergonomic key construction.

/// Builds the [`TypeKey`](crate::TypeKey) of a type or a trait contract.
///
/// Mostly useful in constructor parameter lists, where `key!(trait Database)`
/// reads better than `TypeKey::of::<dyn Database>()`.
///
/// # Examples
///
/// ```
/// use lattice_ioc::{key, TypeKey};
///
/// struct Postgres;
///
/// assert_eq!(key!(Postgres), TypeKey::of::<Postgres>());
/// ```
///
/// ```
/// use lattice_ioc::{key, TypeKey};
///
/// trait Database: Send + Sync {}
///
/// assert_eq!(key!(trait Database), TypeKey::of::<dyn Database>());
/// ```
#[macro_export]
macro_rules! key {
  // Arm for trait contracts: key!(trait Database)
  (trait $contract:ident) => {
    $crate::TypeKey::of::<dyn $contract>()
  };

  // Arm for plain types: key!(Postgres)
  ($type:ty) => {
    $crate::TypeKey::of::<$type>()
  };
}
