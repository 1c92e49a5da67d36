use lattice_ioc::{key, Registry, Resolver, TypeInfo, TypeRegistry};
use std::sync::Arc;

struct Config {
  name: &'static str,
}

// Rust has no runtime handle for an unparameterized `Queue<T>`, so the open
// definition is described through a marker type. Each instantiation the
// application wants resolvable is described against that marker.
struct Queue<T> {
  seed: Arc<T>,
}

struct QueueDef;

fn main() {
  let types = TypeRegistry::new();
  types.define(
    TypeInfo::concrete::<Config>().constructor(vec![], |_| Some(Config { name: "default" })),
  );
  types.define(TypeInfo::open_generic::<QueueDef>());
  types.define(
    TypeInfo::concrete::<Queue<Config>>()
      .instantiates::<QueueDef>(vec![key!(Config)])
      .constructor(vec![key!(Config)], |args| {
        Some(Queue {
          seed: args.get(0)?,
        })
      }),
  );

  let registry = Registry::new(Arc::new(types));
  registry.register::<Config, Config>().unwrap();
  // One open binding covers every described instantiation.
  registry.register::<QueueDef, QueueDef>().unwrap();
  let resolver = Resolver::new(registry).unwrap();

  // The request names the closed type; the registry only knows the open
  // definition. The resolver closes it with the request's arguments.
  let queue = resolver.resolve::<Queue<Config>>().unwrap();
  println!("resolved Queue<Config> seeded from \"{}\"", queue.seed.name);
}
