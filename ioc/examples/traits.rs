use fibre_autowire::{create, Container};

// 1. Define the abstraction (the trait)
trait Logger {
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
  logger: Box<dyn Logger>,
  title: String,
}

impl ReportService {
  fn generate_report(&self) {
    self.logger.log(&format!("Starting report '{}'.", self.title));
    self.logger.log("Finished report generation.");
  }
}

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter("fibre_autowire=debug")
    .init();

  // --- Registration ---
  let mut container = Container::new();

  // ConsoleLogger is the only type implementing `dyn Logger`, so it never
  // needs an explicit binding.
  container
    .register::<ConsoleLogger>()
    .implements::<dyn Logger>(|l| l)
    .constructor(|_| Ok(ConsoleLogger));

  // ReportService declares its dependency instead of resolving it itself.
  container
    .register::<ReportService>()
    .typed::<dyn Logger>()
    .untyped()
    .constructor(|args| {
      Ok(ReportService {
        logger: args.dependency()?,
        title: args.value()?,
      })
    });

  // --- Resolution and Usage ---
  println!("Resolving the high-level service...");
  let report_service = create!(container, ReportService, ["Quarterly"]);

  println!("Using the service...");
  report_service.generate_report();
}
