use lattice_ioc::{key, Registry, Resolver, TypeInfo, TypeRegistry};
use std::sync::Arc;

// 1. Define the abstraction (the trait)
trait Logger: Send + Sync {
  fn log(&self, message: &str);
}

// 2. Define a concrete implementation
struct ConsoleLogger;
impl Logger for ConsoleLogger {
  fn log(&self, message: &str) {
    println!("[CONSOLE LOG]: {}", message);
  }
}

// 3. Define a service that depends on the abstraction
struct ReportService {
  logger: Arc<dyn Logger>,
}

impl ReportService {
  fn generate_report(&self) {
    self.logger.log("Starting report generation.");
    // ... logic to generate report ...
    self.logger.log("Finished report generation.");
  }
}

fn main() {
  // --- Description ---
  // Each type is described once: the contracts it satisfies and how it is
  // constructed. ReportService never creates its logger; the container
  // resolves the Logger contract when the constructor runs.
  let types = TypeRegistry::new();
  types.define(
    TypeInfo::concrete::<ConsoleLogger>()
      .implements(|it| it as Arc<dyn Logger>)
      .constructor(vec![], |_| Some(ConsoleLogger)),
  );
  types.define(
    TypeInfo::concrete::<ReportService>().constructor(vec![key!(trait Logger)], |args| {
      Some(ReportService {
        logger: args.get(0)?,
      })
    }),
  );

  // --- Registration ---
  let registry = Registry::new(Arc::new(types));
  registry
    .register_singleton::<dyn Logger, ConsoleLogger>()
    .unwrap();
  registry.register::<ReportService, ReportService>().unwrap();

  // --- Resolution and Usage ---
  let resolver = Resolver::new(registry).unwrap();
  println!("Resolving the high-level service...");
  let report_service = resolver.resolve::<ReportService>().unwrap();

  println!("Using the service...");
  report_service.generate_report();
}
