//! # Lattice IoC
//!
//! A dynamic, thread-safe Inversion of Control (IoC) container for Rust, with
//! recursive constructor wiring.
//!
//! Callers describe their types once — which contracts a concrete type
//! satisfies and how it can be constructed — then bind contracts to
//! implementations in a [`Registry`]. A [`Resolver`] serves fully wired
//! object graphs on demand: resolving a contract picks the most recently
//! registered implementation, chooses its richest satisfiable constructor,
//! and recursively resolves every constructor parameter the same way.
//!
//! ## Core Concepts
//!
//! - **Type registry**: the descriptor store standing in for runtime
//!   reflection. A [`TypeInfo`] records a type's contracts, upcasts and
//!   constructor variants; open generic definitions are described through
//!   marker types and closed on demand.
//! - **Registry**: contract-to-implementation bindings. Registration appends,
//!   so a contract can hold many implementations: the latest is primary for
//!   single-value resolution, the full list serves collection resolution.
//! - **Resolver**: the construction engine. Singletons are cached and built
//!   at most once; transients are built per request; dependency cycles are
//!   broken with absent values instead of failing the whole graph; a missing
//!   binding is an absent result, never an error.
//!
//! ## Quick Start
//!
//! ```
//! use lattice_ioc::{key, Registry, Resolver, TypeInfo, TypeRegistry};
//! use std::sync::Arc;
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! struct EnglishGreeter;
//!
//! impl Greeter for EnglishGreeter {
//!     fn greet(&self) -> String {
//!         "Hello!".to_string()
//!     }
//! }
//!
//! // A service that depends on the abstraction, not the implementation.
//! struct Door {
//!     greeter: Arc<dyn Greeter>,
//! }
//!
//! // Describe the types: contracts, upcasts and constructors.
//! let types = TypeRegistry::new();
//! types.define(
//!     TypeInfo::concrete::<EnglishGreeter>()
//!         .implements(|it| it as Arc<dyn Greeter>)
//!         .constructor(vec![], |_| Some(EnglishGreeter)),
//! );
//! types.define(
//!     TypeInfo::concrete::<Door>()
//!         .constructor(vec![key!(trait Greeter)], |args| {
//!             Some(Door { greeter: args.get(0)? })
//!         }),
//! );
//!
//! // Bind the contracts and build the resolver.
//! let registry = Registry::new(Arc::new(types));
//! registry.register::<dyn Greeter, EnglishGreeter>().unwrap();
//! registry.register::<Door, Door>().unwrap();
//! let resolver = Resolver::new(registry).unwrap();
//!
//! // The door comes back with its greeter already wired in.
//! let door = resolver.resolve::<Door>().unwrap();
//! assert_eq!(door.greeter.greet(), "Hello!");
//! ```

mod error;
mod introspect;
mod key;
mod macros;
mod registry;
mod resolver;

pub use error::ConfigError;
pub use introspect::{
  ConcreteInfo, ContractInfo, OpenInfo, ResolvedArgs, TypeInfo, TypeIntrospector, TypeRegistry,
};
pub use key::TypeKey;
pub use registry::{Binding, Registry};
pub use resolver::Resolver;
