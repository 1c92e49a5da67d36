//! The resolution engine: walks the registry and builds wired object graphs.

use crate::error::ConfigError;
use crate::introspect::{normalize, Constructor, Instance, Payload, ResolvedArgs, TypeIntrospector};
use crate::key::TypeKey;
use crate::registry::{validate, Binding, Registry};
use parking_lot::ReentrantMutex;
use std::any::{Any, TypeId};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, trace};

/// Per-call construction state, threaded through the recursive resolution.
///
/// The in-progress set holds the implementation identities currently mid-
/// construction in this call; re-entering one is a dependency cycle, and the
/// offending parameter is satisfied with an absent value instead of
/// recursing. The pending argument list is recorded once, from the
/// originally requested contract, and read whenever an open generic
/// implementation must be closed during this call.
///
/// Scoping this state to the call (rather than the resolver) means
/// concurrent top-level resolutions never observe each other's construction
/// state, while cycle breaking within one call is unaffected.
struct ResolutionContext {
  in_progress: HashSet<TypeId>,
  pending_args: Option<Vec<TypeKey>>,
}

impl ResolutionContext {
  fn new(pending_args: Option<Vec<TypeKey>>) -> Self {
    Self {
      in_progress: HashSet::new(),
      pending_args,
    }
  }
}

/// The resolver.
///
/// Built over a [`Registry`], it serves fully wired object graphs on demand:
/// resolving a contract picks its primary binding, constructs the
/// implementation through its richest satisfiable constructor and recursively
/// resolves every constructor parameter the same way.
pub struct Resolver {
  registry: Registry,
  types: Arc<dyn TypeIntrospector>,
  singleton_lock: ReentrantMutex<()>,
}

impl Resolver {
  /// Wraps the registry, re-checking every binding's concreteness and is-a
  /// invariants.
  ///
  /// `register` validates on the way in, but descriptors can be redefined
  /// after a binding was accepted; this check is the last gate before
  /// resolution trusts the registry.
  pub fn new(registry: Registry) -> Result<Self, ConfigError> {
    let types = registry.types().clone();
    for binding in registry.snapshot() {
      validate(types.as_ref(), binding.contract(), binding.implementation())?;
    }
    Ok(Self {
      registry,
      types,
      singleton_lock: ReentrantMutex::new(()),
    })
  }

  /// The registry this resolver serves.
  ///
  /// Bindings may still be appended; `register` validates them as usual.
  pub fn registry(&self) -> &Registry {
    &self.registry
  }

  /// Resolves the primary binding of contract `C` into an instance.
  ///
  /// A closed generic contract with no binding of its own falls back to its
  /// open definition's binding. Returns `None` when no binding exists, when
  /// every constructor variant of the implementation fails, and when a
  /// dependency cycle forces the value absent — callers cannot distinguish
  /// the three, by contract.
  pub fn resolve<C: ?Sized + Any + Send + Sync>(&self) -> Option<Arc<C>> {
    let contract = normalize(self.types.as_ref(), TypeKey::of::<C>());
    let binding = match self.registry.primary_binding(&contract) {
      Some(binding) => binding,
      None => self.registry.primary_binding(&contract.definition()?)?,
    };
    let mut ctx = ResolutionContext::new(contract.type_args().map(<[TypeKey]>::to_vec));
    let instance = self.get_or_create(&binding, &mut ctx)?;
    self.view::<C>(&instance)
  }

  /// Resolves every binding of contract `C`, in registration order.
  ///
  /// An unregistered contract yields an empty vector, and no open-generic
  /// fallback is applied. A binding whose construction fails contributes
  /// nothing.
  pub fn resolve_all<C: ?Sized + Any + Send + Sync>(&self) -> Vec<Arc<C>> {
    let contract = normalize(self.types.as_ref(), TypeKey::of::<C>());
    let Some(bindings) = self.registry.all_bindings(&contract) else {
      return Vec::new();
    };
    let mut ctx = ResolutionContext::new(None);
    bindings
      .iter()
      .filter_map(|binding| self.get_or_create(binding, &mut ctx))
      .filter_map(|instance| self.view::<C>(&instance))
      .collect()
  }

  /// Serves the binding's cached singleton, or constructs an instance.
  ///
  /// Singleton construction double-checks under one process-wide lock, so a
  /// binding's constructor runs at most once even under concurrent first-time
  /// resolution. The lock is reentrant because a singleton's dependencies may
  /// themselves be singletons. A failed construction leaves the cell empty;
  /// a later call retries.
  fn get_or_create(&self, binding: &Arc<Binding>, ctx: &mut ResolutionContext) -> Option<Instance> {
    if !binding.is_singleton() {
      return self.construct(binding.implementation(), ctx);
    }
    if let Some(cached) = binding.cached.get() {
      return Some(cached.clone());
    }
    let _guard = self.singleton_lock.lock();
    if let Some(cached) = binding.cached.get() {
      return Some(cached.clone());
    }
    let built = self.construct(binding.implementation(), ctx)?;
    let _ = binding.cached.set(built.clone());
    Some(built)
  }

  /// Constructs an implementation, richest constructor variant first.
  fn construct(&self, implementation: &TypeKey, ctx: &mut ResolutionContext) -> Option<Instance> {
    if !ctx.in_progress.insert(implementation.id()) {
      debug!(
        implementation = implementation.name(),
        "dependency cycle broken with an absent value"
      );
      return None;
    }
    let built = self.try_variants(implementation, ctx);
    // The identity leaves the in-progress set exactly once, on every path.
    ctx.in_progress.remove(&implementation.id());
    built
  }

  fn try_variants(&self, implementation: &TypeKey, ctx: &mut ResolutionContext) -> Option<Instance> {
    let info = if implementation.is_open() {
      let args = ctx.pending_args.clone()?;
      self.types.close(implementation.id(), &args)?
    } else {
      self.types.describe(implementation.id())?
    };
    trace!(implementation = info.key().name(), "constructing");

    let mut variants: Vec<&Constructor> = info.constructors().iter().collect();
    // Richest dependency set first; stable sort keeps declaration order
    // within equal arity.
    variants.sort_by(|a, b| b.params().len().cmp(&a.params().len()));

    for variant in variants {
      let mut values = Vec::with_capacity(variant.params().len());
      for param in variant.params() {
        values.push(self.resolve_param(param, ctx));
      }
      if let Some(payload) = variant.invoke(&ResolvedArgs::new(&values)) {
        return Some(Instance::new(info.key().clone(), payload));
      }
      trace!(
        implementation = info.key().name(),
        arity = variant.params().len(),
        "constructor variant failed, falling through"
      );
    }
    debug!(
      implementation = info.key().name(),
      "no constructor variant could be satisfied"
    );
    None
  }

  /// A constructor parameter resolves through its declared contract's primary
  /// binding, and the result is viewed as that contract. Absence at any step
  /// yields an absent argument, never a failure.
  fn resolve_param(&self, param: &TypeKey, ctx: &mut ResolutionContext) -> Option<Payload> {
    let binding = self.registry.primary_binding(param)?;
    let instance = self.get_or_create(&binding, ctx)?;
    self.view_payload(&instance, param)
  }

  fn view_payload(&self, instance: &Instance, contract: &TypeKey) -> Option<Payload> {
    if instance.concrete().id() == contract.id() {
      return Some(instance.payload().clone());
    }
    let info = self.types.describe(instance.concrete().id())?;
    info.cast(contract.id(), instance.payload())
  }

  fn view<C: ?Sized + Any + Send + Sync>(&self, instance: &Instance) -> Option<Arc<C>> {
    let payload = self.view_payload(instance, &TypeKey::of::<C>())?;
    payload.downcast_ref::<Arc<C>>().cloned()
  }
}
