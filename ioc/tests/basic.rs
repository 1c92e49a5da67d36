use lattice_ioc::{key, ConfigError, Registry, Resolver, TypeInfo, TypeRegistry};
use pretty_assertions::assert_eq;
use std::sync::Arc;

// --- Test Fixtures ---

// The contract must be Send + Sync for the container to serve it.
trait Transport: Send + Sync {
  fn label(&self) -> &'static str;
}

struct TcpTransport;
impl Transport for TcpTransport {
  fn label(&self) -> &'static str {
    "tcp"
  }
}

struct UdpTransport;
impl Transport for UdpTransport {
  fn label(&self) -> &'static str {
    "udp"
  }
}

// A service built through constructor injection.
struct Courier {
  transport: Arc<dyn Transport>,
}

fn transport_types() -> TypeRegistry {
  let types = TypeRegistry::new();
  types.define(
    TypeInfo::concrete::<TcpTransport>()
      .implements(|it| it as Arc<dyn Transport>)
      .constructor(vec![], |_| Some(TcpTransport)),
  );
  types.define(
    TypeInfo::concrete::<UdpTransport>()
      .implements(|it| it as Arc<dyn Transport>)
      .constructor(vec![], |_| Some(UdpTransport)),
  );
  types.define(
    TypeInfo::concrete::<Courier>().constructor(vec![key!(trait Transport)], |args| {
      Some(Courier {
        transport: args.get(0)?,
      })
    }),
  );
  types
}

fn transport_registry() -> Registry {
  Registry::new(Arc::new(transport_types()))
}

// --- Basic Tests ---

#[test]
fn transient_binding_yields_distinct_instances() {
  // Arrange
  let registry = transport_registry();
  registry.register::<TcpTransport, TcpTransport>().unwrap();
  let resolver = Resolver::new(registry).unwrap();

  // Act
  let first = resolver.resolve::<TcpTransport>().unwrap();
  let second = resolver.resolve::<TcpTransport>().unwrap();

  // Assert
  assert!(!Arc::ptr_eq(&first, &second));
}

#[test]
fn singleton_binding_yields_the_same_instance() {
  // Arrange
  let registry = transport_registry();
  registry
    .register_singleton::<TcpTransport, TcpTransport>()
    .unwrap();
  let resolver = Resolver::new(registry).unwrap();

  // Act
  let first = resolver.resolve::<TcpTransport>().unwrap();
  let second = resolver.resolve::<TcpTransport>().unwrap();

  // Assert
  assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn last_registration_wins_for_single_resolution() {
  // Arrange
  let registry = transport_registry();
  registry.register::<dyn Transport, TcpTransport>().unwrap();
  registry.register::<dyn Transport, UdpTransport>().unwrap();
  let resolver = Resolver::new(registry).unwrap();

  // Act
  let transport = resolver.resolve::<dyn Transport>().unwrap();

  // Assert
  assert_eq!(transport.label(), "udp");
}

#[test]
fn resolve_all_returns_every_binding_in_registration_order() {
  // Arrange
  let registry = transport_registry();
  registry.register::<dyn Transport, TcpTransport>().unwrap();
  registry.register::<dyn Transport, UdpTransport>().unwrap();
  let resolver = Resolver::new(registry).unwrap();

  // Act
  let transports = resolver.resolve_all::<dyn Transport>();

  // Assert
  let labels: Vec<_> = transports.iter().map(|t| t.label()).collect();
  assert_eq!(labels, vec!["tcp", "udp"]);
}

#[test]
fn resolve_all_on_an_unregistered_contract_is_empty() {
  let resolver = Resolver::new(transport_registry()).unwrap();

  assert!(resolver.resolve_all::<dyn Transport>().is_empty());
}

#[test]
fn resolving_an_unregistered_contract_returns_none() {
  // A missing binding is an absent result, never a panic or an error.
  let resolver = Resolver::new(transport_registry()).unwrap();

  assert!(resolver.resolve::<dyn Transport>().is_none());
}

#[test]
fn constructor_injection_wires_dependencies() {
  // Arrange
  let registry = transport_registry();
  registry.register::<dyn Transport, TcpTransport>().unwrap();
  registry.register::<Courier, Courier>().unwrap();
  let resolver = Resolver::new(registry).unwrap();

  // Act
  let courier = resolver.resolve::<Courier>().unwrap();

  // Assert
  assert_eq!(courier.transport.label(), "tcp");
}

#[test]
fn self_registration_resolves_the_concrete_type() {
  // Arrange
  let registry = transport_registry();
  registry.register::<UdpTransport, UdpTransport>().unwrap();
  let resolver = Resolver::new(registry).unwrap();

  // Act
  let udp = resolver.resolve::<UdpTransport>().unwrap();

  // Assert: the typed resolution itself proves the concrete type.
  assert_eq!(udp.label(), "udp");
}

#[test]
fn resolve_and_resolve_all_share_a_singleton_binding_cache() {
  // Arrange
  let registry = transport_registry();
  registry
    .register_singleton::<dyn Transport, TcpTransport>()
    .unwrap();
  let resolver = Resolver::new(registry).unwrap();

  // Act
  let single = resolver.resolve::<dyn Transport>().unwrap();
  let all = resolver.resolve_all::<dyn Transport>();

  // Assert
  assert_eq!(all.len(), 1);
  assert!(Arc::ptr_eq(&single, &all[0]));
}

// --- Configuration Errors ---

#[test]
fn registering_an_abstract_implementation_is_a_config_error() {
  // Arrange: describe the contract so the failure is about concreteness,
  // not a missing descriptor.
  let types = transport_types();
  types.define(TypeInfo::contract::<dyn Transport>());
  let registry = Registry::new(Arc::new(types));

  // Act
  let result = registry.register::<dyn Transport, dyn Transport>();

  // Assert
  assert!(matches!(result, Err(ConfigError::NotConcrete { .. })));
}

#[test]
fn an_unrelated_implementation_is_a_config_error() {
  // Courier does not declare the Transport contract.
  let registry = transport_registry();

  let result = registry.register::<dyn Transport, Courier>();

  assert!(matches!(result, Err(ConfigError::Unrelated { .. })));
}

#[test]
fn an_undescribed_implementation_is_a_config_error() {
  struct Undescribed;

  let registry = transport_registry();

  let result = registry.register::<Undescribed, Undescribed>();

  assert!(matches!(result, Err(ConfigError::MissingTypeInfo { .. })));
}

#[test]
fn resolver_construction_revalidates_the_registry() {
  // Arrange: a valid registration, then the implementation's descriptor is
  // redefined as abstract after the fact.
  let types = Arc::new(transport_types());
  let registry = Registry::new(types.clone());
  registry.register::<dyn Transport, TcpTransport>().unwrap();
  types.define(TypeInfo::contract::<TcpTransport>());

  // Act
  let result = Resolver::new(registry);

  // Assert
  assert!(matches!(result, Err(ConfigError::NotConcrete { .. })));
}
