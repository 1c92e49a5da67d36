//! The type introspection capability backing the container.
//!
//! Rust exposes no runtime reflection, so the resolver introspects types
//! through an explicit registry of descriptors instead: each [`TypeInfo`]
//! records the facts the resolver needs about one type (concreteness, the
//! contracts it satisfies, its constructor variants) together with the
//! closures that stand in for reflective operations — upcasting a concrete
//! payload to a trait object, and invoking a constructor from a resolved
//! argument list. Open generic definitions are represented by marker types
//! with an explicit "close with arguments" operation that looks up the
//! registered instantiation.

use crate::key::TypeKey;
use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::marker::PhantomData;
use std::sync::Arc;

/// A type-erased value as the container moves it around: an `Arc<T>` (or an
/// `Arc<dyn Contract>`) boxed behind `Any`.
pub(crate) type Payload = Arc<dyn Any + Send + Sync>;

type CasterFn = Arc<dyn Fn(&Payload) -> Option<Payload> + Send + Sync>;
type BuildFn = Arc<dyn Fn(&ResolvedArgs<'_>) -> Option<Payload> + Send + Sync>;

/// A constructed value: the concrete key it was built as, plus its payload.
#[derive(Clone)]
pub(crate) struct Instance {
  concrete: TypeKey,
  payload: Payload,
}

impl Instance {
  pub(crate) fn new(concrete: TypeKey, payload: Payload) -> Self {
    Self { concrete, payload }
  }

  pub(crate) fn concrete(&self) -> &TypeKey {
    &self.concrete
  }

  pub(crate) fn payload(&self) -> &Payload {
    &self.payload
  }
}

/// The resolved constructor arguments handed to a build closure.
///
/// Slots line up with the variant's declared parameter keys. A slot is `None`
/// when the parameter's contract had no binding, when its construction
/// failed, or when a dependency cycle was broken; the closure decides whether
/// the variant tolerates the absence. Returning `None` from the closure fails
/// the variant and the resolver falls through to the next one.
pub struct ResolvedArgs<'a> {
  values: &'a [Option<Payload>],
}

impl<'a> ResolvedArgs<'a> {
  pub(crate) fn new(values: &'a [Option<Payload>]) -> Self {
    Self { values }
  }

  /// The value in slot `index`, viewed as contract `C`.
  ///
  /// `None` if the slot is absent or does not hold a `C` view.
  pub fn get<C: ?Sized + Any + Send + Sync>(&self, index: usize) -> Option<Arc<C>> {
    self.values.get(index)?.as_ref()?.downcast_ref::<Arc<C>>().cloned()
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }
}

/// One constructible variant of a concrete type: the declared parameter
/// contracts, in order, and the closure that attempts the construction.
pub(crate) struct Constructor {
  params: Vec<TypeKey>,
  build: BuildFn,
}

impl Constructor {
  pub(crate) fn params(&self) -> &[TypeKey] {
    &self.params
  }

  pub(crate) fn invoke(&self, args: &ResolvedArgs<'_>) -> Option<Payload> {
    (self.build)(args)
  }
}

/// Everything the resolver can learn about one type: its key (including
/// generic shape), whether it is concrete, which contracts it satisfies, how
/// its payload upcasts to each of them, and its constructor variants.
///
/// Built through [`TypeInfo::concrete`], [`TypeInfo::contract`] and
/// [`TypeInfo::open_generic`], then stored in a [`TypeRegistry`]. A
/// descriptor always satisfies its own type, so self-registration needs no
/// explicit edge.
pub struct TypeInfo {
  key: TypeKey,
  concrete: bool,
  satisfies: HashSet<TypeId>,
  casters: HashMap<TypeId, CasterFn>,
  constructors: Vec<Constructor>,
}

impl TypeInfo {
  /// Starts a descriptor for the concrete type `T`.
  pub fn concrete<T: Any + Send + Sync>() -> ConcreteInfo<T> {
    ConcreteInfo {
      info: TypeInfo {
        key: TypeKey::of::<T>(),
        concrete: true,
        satisfies: HashSet::new(),
        casters: HashMap::new(),
        constructors: Vec::new(),
      },
      _marker: PhantomData,
    }
  }

  /// Starts a descriptor for the abstract contract `C`.
  ///
  /// Only generic contracts need one: the descriptor is what gives a closed
  /// instantiation such as `dyn Repository<User>` its definition and argument
  /// keys, which the resolver uses for the open-generic fallback.
  pub fn contract<C: ?Sized + Any>() -> ContractInfo<C> {
    ContractInfo {
      info: TypeInfo {
        key: TypeKey::of::<C>(),
        concrete: false,
        satisfies: HashSet::new(),
        casters: HashMap::new(),
        constructors: Vec::new(),
      },
      _marker: PhantomData,
    }
  }

  /// Starts the descriptor for an open generic definition, stood in for by
  /// the marker type `Def`.
  pub fn open_generic<Def: Any>() -> OpenInfo {
    OpenInfo {
      info: TypeInfo {
        key: TypeKey::open::<Def>(),
        concrete: true,
        satisfies: HashSet::new(),
        casters: HashMap::new(),
        constructors: Vec::new(),
      },
    }
  }

  pub(crate) fn key(&self) -> &TypeKey {
    &self.key
  }

  pub(crate) fn is_concrete(&self) -> bool {
    self.concrete
  }

  /// The is-a test: a type satisfies itself and every declared contract.
  pub(crate) fn satisfies(&self, contract: TypeId) -> bool {
    self.key.id() == contract || self.satisfies.contains(&contract)
  }

  /// Upcasts a payload of this type to the given contract's view.
  pub(crate) fn cast(&self, contract: TypeId, payload: &Payload) -> Option<Payload> {
    self.casters.get(&contract)?(payload)
  }

  pub(crate) fn constructors(&self) -> &[Constructor] {
    &self.constructors
  }
}

/// Builder for a concrete type's descriptor.
pub struct ConcreteInfo<T> {
  info: TypeInfo,
  _marker: PhantomData<fn() -> T>,
}

impl<T: Any + Send + Sync> ConcreteInfo<T> {
  /// Declares that `T` satisfies contract `C`, with the upcast used to serve
  /// a `T` payload as an `Arc<C>`.
  pub fn implements<C: ?Sized + Any + Send + Sync>(mut self, upcast: fn(Arc<T>) -> Arc<C>) -> Self {
    let contract = TypeId::of::<C>();
    self.info.satisfies.insert(contract);
    self.info.casters.insert(
      contract,
      Arc::new(move |payload: &Payload| {
        let concrete = payload.downcast_ref::<Arc<T>>()?;
        Some(Arc::new(upcast(concrete.clone())) as Payload)
      }),
    );
    self
  }

  /// Appends a constructor variant.
  ///
  /// `params` are the declared parameter contracts, in order; each resolves
  /// through its contract's primary binding when the variant is tried. The
  /// build closure receives the resolved (possibly absent) arguments and
  /// returns `None` when the variant cannot be satisfied — typically because
  /// a required argument is absent. It must not panic for absent or
  /// mismatched arguments.
  pub fn constructor(
    mut self,
    params: Vec<TypeKey>,
    build: impl Fn(&ResolvedArgs<'_>) -> Option<T> + Send + Sync + 'static,
  ) -> Self {
    self.info.constructors.push(Constructor {
      params,
      build: Arc::new(move |args| {
        build(args).map(|value| Arc::new(Arc::new(value)) as Payload)
      }),
    });
    self
  }

  /// Marks `T` as the instantiation of the open definition `Def` with the
  /// given argument keys.
  pub fn instantiates<Def: Any>(mut self, args: Vec<TypeKey>) -> Self {
    self.info.key = TypeKey::closed::<T, Def>(args);
    self
  }
}

impl<T> From<ConcreteInfo<T>> for TypeInfo {
  fn from(builder: ConcreteInfo<T>) -> Self {
    builder.info
  }
}

/// Builder for an abstract contract's descriptor.
pub struct ContractInfo<C: ?Sized> {
  info: TypeInfo,
  _marker: PhantomData<*const C>,
}

impl<C: ?Sized + Any> ContractInfo<C> {
  /// Marks `C` as the instantiation of the open contract definition `Def`
  /// with the given argument keys.
  pub fn instantiates<Def: Any>(mut self, args: Vec<TypeKey>) -> Self {
    self.info.key = TypeKey::closed::<C, Def>(args);
    self
  }
}

impl<C: ?Sized> From<ContractInfo<C>> for TypeInfo {
  fn from(builder: ContractInfo<C>) -> Self {
    builder.info
  }
}

/// Builder for an open generic definition's descriptor.
pub struct OpenInfo {
  info: TypeInfo,
}

impl OpenInfo {
  /// Declares that instantiations of this definition satisfy instantiations
  /// of the open contract definition `CDef`.
  ///
  /// The upcasts themselves live on the closed descriptors; this edge only
  /// makes the open-to-open binding pass validation.
  pub fn satisfies<CDef: Any>(mut self) -> Self {
    self.info.satisfies.insert(TypeId::of::<CDef>());
    self
  }
}

impl From<OpenInfo> for TypeInfo {
  fn from(builder: OpenInfo) -> Self {
    builder.info
  }
}

/// The host capability the container introspects types through.
///
/// The registry and resolver treat this as an opaque collaborator;
/// [`TypeRegistry`] is the default implementation.
pub trait TypeIntrospector: Send + Sync {
  /// The descriptor registered for the given type identity.
  fn describe(&self, id: TypeId) -> Option<Arc<TypeInfo>>;

  /// Closes the open definition with the given arguments, yielding the
  /// descriptor of the registered instantiation, or `None` if that
  /// instantiation was never described.
  fn close(&self, definition: TypeId, args: &[TypeKey]) -> Option<Arc<TypeInfo>>;
}

/// The descriptor store.
///
/// Registration is `&self` and thread-safe; describing a type again replaces
/// the earlier descriptor. Closed instantiations are additionally indexed
/// under their `(definition, arguments)` pair so open definitions can be
/// closed later.
#[derive(Default)]
pub struct TypeRegistry {
  infos: DashMap<TypeId, Arc<TypeInfo>>,
  instantiations: DashMap<(TypeId, Vec<TypeKey>), TypeId>,
}

impl TypeRegistry {
  /// Creates a new, empty `TypeRegistry`.
  pub fn new() -> Self {
    Self::default()
  }

  /// Stores a descriptor built with the [`TypeInfo`] builders.
  pub fn define(&self, info: impl Into<TypeInfo>) {
    let info = info.into();
    if let (Some(definition), Some(args)) = (info.key().definition(), info.key().type_args()) {
      self
        .instantiations
        .insert((definition.id(), args.to_vec()), info.key().id());
    }
    self.infos.insert(info.key().id(), Arc::new(info));
  }
}

impl TypeIntrospector for TypeRegistry {
  fn describe(&self, id: TypeId) -> Option<Arc<TypeInfo>> {
    self.infos.get(&id).map(|entry| entry.value().clone())
  }

  fn close(&self, definition: TypeId, args: &[TypeKey]) -> Option<Arc<TypeInfo>> {
    let closed = *self.instantiations.get(&(definition, args.to_vec()))?;
    self.describe(closed)
  }
}

/// Keys built from bare `TypeId`s carry no generic shape; when the
/// introspector has a descriptor for the id, the descriptor's key wins.
pub(crate) fn normalize(types: &dyn TypeIntrospector, key: TypeKey) -> TypeKey {
  match types.describe(key.id()) {
    Some(info) => info.key().clone(),
    None => key,
  }
}
