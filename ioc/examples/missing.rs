use lattice_ioc::{Registry, Resolver, TypeRegistry};
use std::sync::Arc;

trait Mailer: Send + Sync {
  fn send(&self, to: &str);
}

fn main() {
  // Nothing is described or registered; resolution degrades gracefully.
  // A missing binding is an absent result, not an error.
  let registry = Registry::new(Arc::new(TypeRegistry::new()));
  let resolver = Resolver::new(registry).unwrap();

  match resolver.resolve::<dyn Mailer>() {
    Some(mailer) => mailer.send("ops@example.com"),
    None => println!("no mailer bound; running without outbound mail"),
  }
}
