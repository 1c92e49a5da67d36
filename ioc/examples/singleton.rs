use lattice_ioc::{Registry, Resolver, TypeInfo, TypeRegistry};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

static POOLS_OPENED: AtomicUsize = AtomicUsize::new(0);

struct ConnectionPool {
  id: usize,
}

fn main() {
  let types = TypeRegistry::new();
  types.define(TypeInfo::concrete::<ConnectionPool>().constructor(vec![], |_| {
    Some(ConnectionPool {
      id: POOLS_OPENED.fetch_add(1, Ordering::SeqCst),
    })
  }));

  let registry = Registry::new(Arc::new(types));
  registry
    .register_singleton::<ConnectionPool, ConnectionPool>()
    .unwrap();
  let resolver = Resolver::new(registry).unwrap();

  // The constructor runs on the first resolution; every later resolution
  // is served from the binding's cache.
  let first = resolver.resolve::<ConnectionPool>().unwrap();
  let second = resolver.resolve::<ConnectionPool>().unwrap();

  println!("first resolution:  pool #{}", first.id);
  println!("second resolution: pool #{}", second.id);
  println!("same instance: {}", Arc::ptr_eq(&first, &second));
  println!("pools opened: {}", POOLS_OPENED.load(Ordering::SeqCst));
}
