//! Type identities for contracts and implementations.

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// The identity of a declared type within the container.
///
/// Two keys are equal iff they denote the same declared type; equality is
/// identity over the underlying `TypeId`, never structural. A key also carries
/// the generic shape of the type it names: a plain non-generic type, an open
/// generic definition (stood in for by a marker type, since Rust has no
/// unparameterized `TypeId` for `G<T>`), or a closed instantiation together
/// with its definition and ordered argument keys.
#[derive(Clone)]
pub struct TypeKey {
  id: TypeId,
  name: &'static str,
  shape: Shape,
}

#[derive(Clone)]
enum Shape {
  Plain,
  Open,
  Closed {
    definition: TypeId,
    definition_name: &'static str,
    args: Vec<TypeKey>,
  },
}

impl TypeKey {
  /// The key of `T`, with no generic shape attached.
  ///
  /// Keys handed to the container are normalized against the type registry:
  /// if a descriptor exists for this `TypeId`, the descriptor's key (which
  /// knows about openness and arguments) is used in its place.
  pub fn of<T: ?Sized + Any>() -> Self {
    Self {
      id: TypeId::of::<T>(),
      name: type_name::<T>(),
      shape: Shape::Plain,
    }
  }

  pub(crate) fn open<Def: Any>() -> Self {
    Self {
      id: TypeId::of::<Def>(),
      name: type_name::<Def>(),
      shape: Shape::Open,
    }
  }

  pub(crate) fn closed<T: ?Sized + Any, Def: Any>(args: Vec<TypeKey>) -> Self {
    Self {
      id: TypeId::of::<T>(),
      name: type_name::<T>(),
      shape: Shape::Closed {
        definition: TypeId::of::<Def>(),
        definition_name: type_name::<Def>(),
        args,
      },
    }
  }

  /// The underlying `TypeId`.
  pub fn id(&self) -> TypeId {
    self.id
  }

  /// The declared name, as reported by `std::any::type_name`.
  pub fn name(&self) -> &'static str {
    self.name
  }

  /// Whether this key names an open generic definition.
  pub fn is_open(&self) -> bool {
    matches!(self.shape, Shape::Open)
  }

  /// The bound argument keys, if this key is a closed instantiation.
  pub fn type_args(&self) -> Option<&[TypeKey]> {
    match &self.shape {
      Shape::Closed { args, .. } => Some(args),
      _ => None,
    }
  }

  /// The open definition this key instantiates, if it is a closed generic.
  pub fn definition(&self) -> Option<TypeKey> {
    match &self.shape {
      Shape::Closed {
        definition,
        definition_name,
        ..
      } => Some(TypeKey {
        id: *definition,
        name: *definition_name,
        shape: Shape::Open,
      }),
      _ => None,
    }
  }
}

impl PartialEq for TypeKey {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
  }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.id.hash(state);
  }
}

impl fmt::Debug for TypeKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.shape {
      Shape::Plain => write!(f, "TypeKey({})", self.name),
      Shape::Open => write!(f, "TypeKey({}, open)", self.name),
      Shape::Closed { args, .. } => {
        write!(f, "TypeKey({}, {} type args)", self.name, args.len())
      }
    }
  }
}
