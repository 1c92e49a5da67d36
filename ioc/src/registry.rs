//! The binding store: contracts mapped to ordered implementation bindings.

use crate::error::ConfigError;
use crate::introspect::{normalize, Instance, TypeIntrospector};
use crate::key::TypeKey;
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use std::any::{Any, TypeId};
use std::sync::Arc;

/// A registered pairing of contract, concrete implementation and lifetime.
///
/// The singleton cache cell is written at most once, only by the resolver,
/// only under its construction lock.
pub struct Binding {
  contract: TypeKey,
  implementation: TypeKey,
  singleton: bool,
  pub(crate) cached: OnceCell<Instance>,
}

impl Binding {
  /// The contract this binding was registered under.
  pub fn contract(&self) -> &TypeKey {
    &self.contract
  }

  /// The concrete implementation the contract is bound to.
  pub fn implementation(&self) -> &TypeKey {
    &self.implementation
  }

  /// Whether the first constructed instance is cached and reused.
  pub fn is_singleton(&self) -> bool {
    self.singleton
  }
}

/// The registry of bindings.
///
/// Registration appends: binding a contract that already has implementations
/// adds another rather than replacing, and the most recent registration is
/// the primary binding used for single-value resolution. The full sequence,
/// in registration order, serves collection resolution. All methods take
/// `&self`; the registry may be shared and extended from any thread.
pub struct Registry {
  types: Arc<dyn TypeIntrospector>,
  bindings: DashMap<TypeId, Vec<Arc<Binding>>>,
}

impl Registry {
  /// Creates an empty registry over the given type introspector.
  pub fn new(types: Arc<dyn TypeIntrospector>) -> Self {
    Self {
      types,
      bindings: DashMap::new(),
    }
  }

  /// Binds contract `C` to the concrete implementation `I` with transient
  /// lifetime: every resolution constructs a fresh instance. `C` and `I` may
  /// be the same type (self-registration).
  pub fn register<C: ?Sized + Any, I: ?Sized + Any>(&self) -> Result<(), ConfigError> {
    self.register_keys(TypeKey::of::<C>(), TypeKey::of::<I>(), false)
  }

  /// Binds contract `C` to `I` with singleton lifetime: the first successful
  /// construction is cached and served to every later resolution.
  pub fn register_singleton<C: ?Sized + Any, I: ?Sized + Any>(&self) -> Result<(), ConfigError> {
    self.register_keys(TypeKey::of::<C>(), TypeKey::of::<I>(), true)
  }

  /// Dynamic registration from bare keys.
  ///
  /// Keys are normalized through the introspector, so a described closed
  /// generic picks up its definition and arguments. Open generic definitions
  /// are bound through their marker types.
  pub fn register_keys(
    &self,
    contract: TypeKey,
    implementation: TypeKey,
    singleton: bool,
  ) -> Result<(), ConfigError> {
    let contract = normalize(self.types.as_ref(), contract);
    let implementation = normalize(self.types.as_ref(), implementation);
    validate(self.types.as_ref(), &contract, &implementation)?;

    let binding = Arc::new(Binding {
      contract: contract.clone(),
      implementation,
      singleton,
      cached: OnceCell::new(),
    });
    self.bindings.entry(contract.id()).or_default().push(binding);
    Ok(())
  }

  /// The most recently registered binding for the contract.
  pub fn primary_binding(&self, contract: &TypeKey) -> Option<Arc<Binding>> {
    self
      .bindings
      .get(&contract.id())
      .and_then(|entry| entry.value().last().cloned())
  }

  /// Every binding for the contract, in registration order.
  pub fn all_bindings(&self, contract: &TypeKey) -> Option<Vec<Arc<Binding>>> {
    self.bindings.get(&contract.id()).map(|entry| entry.value().clone())
  }

  pub(crate) fn snapshot(&self) -> Vec<Arc<Binding>> {
    self
      .bindings
      .iter()
      .flat_map(|entry| entry.value().clone())
      .collect()
  }

  pub(crate) fn types(&self) -> &Arc<dyn TypeIntrospector> {
    &self.types
  }
}

/// The invariants every binding must satisfy: the implementation is described,
/// concrete, and equals or satisfies the contract. Violations are
/// configuration errors — they fail the registration, never a resolution.
pub(crate) fn validate(
  types: &dyn TypeIntrospector,
  contract: &TypeKey,
  implementation: &TypeKey,
) -> Result<(), ConfigError> {
  let info = types
    .describe(implementation.id())
    .ok_or(ConfigError::MissingTypeInfo {
      type_name: implementation.name(),
    })?;
  if !info.is_concrete() {
    return Err(ConfigError::NotConcrete {
      implementation: implementation.name(),
    });
  }
  if !info.satisfies(contract.id()) {
    return Err(ConfigError::Unrelated {
      contract: contract.name(),
      implementation: implementation.name(),
    });
  }
  Ok(())
}
