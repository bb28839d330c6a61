use fibre_autowire::{create, params, Container, Error};
use std::panic;

struct UnregisteredService;

trait Storage {}
struct Disk;
impl Storage for Disk {}
struct Memory;
impl Storage for Memory {}

fn main() {
  let mut container = Container::new();

  // --- Using the panicking `create!` macro ---
  println!("Attempting to create a service that was never registered...");

  let result = panic::catch_unwind(panic::AssertUnwindSafe(|| {
    // This line will panic!
    let _service = create!(container, UnregisteredService);
  }));

  assert!(result.is_err(), "create! should have panicked.");
  println!("Successfully caught the expected panic from create!.");

  // --- Using the fallible `create()` method ---
  println!("\nNow, attempting to create it using the fallible `create()` method...");

  match container.create::<UnregisteredService>(params![]) {
    Ok(_) => panic!("Should not have found the service!"),
    Err(err) => println!("Correctly received an error: {}", err),
  }

  // --- Ambiguous capabilities ---
  container
    .register::<Disk>()
    .implements::<dyn Storage>(|s| s)
    .constructor(|_| Ok(Disk));
  container
    .register::<Memory>()
    .implements::<dyn Storage>(|s| s)
    .constructor(|_| Ok(Memory));

  match container.create::<dyn Storage>(params![]) {
    Err(err @ Error::MultipleImplementationsPossible { .. }) => println!("{}", err),
    _ => panic!("Two implementations must never be guessed between!"),
  }

  container.bind::<Memory>().expect("Memory is registered");
  assert!(container.create::<dyn Storage>(params![]).is_ok());
  println!("Binding `Memory` explicitly resolved the ambiguity.");
}
