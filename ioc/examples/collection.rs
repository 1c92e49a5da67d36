use lattice_ioc::{Registry, Resolver, TypeInfo, TypeRegistry};
use std::sync::Arc;

trait Formatter: Send + Sync {
  fn format(&self, value: f64) -> String;
}

struct PlainFormatter;
impl Formatter for PlainFormatter {
  fn format(&self, value: f64) -> String {
    format!("{value}")
  }
}

struct PercentFormatter;
impl Formatter for PercentFormatter {
  fn format(&self, value: f64) -> String {
    format!("{:.1}%", value * 100.0)
  }
}

fn main() {
  let types = TypeRegistry::new();
  types.define(
    TypeInfo::concrete::<PlainFormatter>()
      .implements(|it| it as Arc<dyn Formatter>)
      .constructor(vec![], |_| Some(PlainFormatter)),
  );
  types.define(
    TypeInfo::concrete::<PercentFormatter>()
      .implements(|it| it as Arc<dyn Formatter>)
      .constructor(vec![], |_| Some(PercentFormatter)),
  );

  // Registering twice under one contract appends rather than replaces.
  let registry = Registry::new(Arc::new(types));
  registry
    .register::<dyn Formatter, PlainFormatter>()
    .unwrap();
  registry
    .register::<dyn Formatter, PercentFormatter>()
    .unwrap();
  let resolver = Resolver::new(registry).unwrap();

  // Single-value resolution picks the latest registration...
  let primary = resolver.resolve::<dyn Formatter>().unwrap();
  println!("primary: {}", primary.format(0.42));

  // ...while collection resolution yields every one, in registration order.
  for formatter in resolver.resolve_all::<dyn Formatter>() {
    println!("- {}", formatter.format(0.42));
  }
}
