//! # Fibre Autowire
//!
//! A small auto-wiring dependency injection container for Rust.
//!
//! Ask the container for a capability (a trait object type such as
//! `dyn Greeter`, or a concrete type) and it finds the implementation,
//! resolves that implementation's own constructor dependencies recursively,
//! and merges them with the values you supply.
//!
//! ## Core Concepts
//!
//! - **Type Universe**: every type that takes part in wiring is registered
//!   explicitly with [`Container::register`], declaring the capabilities it
//!   implements and the shape of its constructor.
//! - **Reflection Cache**: indexes the universe incrementally and answers
//!   "who implements this capability?".
//! - **Bindings**: a capability maps to one [`Locator`]. Bindings are added
//!   explicitly with [`Container::bind`] or automatically when exactly one
//!   implementation exists. Two or more candidates are never guessed between.
//! - **Parameters**: untyped constructor slots are filled positionally from
//!   overrides attached with [`Container::with_parameters`] and then from the
//!   values passed to [`Container::create`].
//!
//! Every call to `create` builds fresh instances; there is no scoping.
//!
//! ## Quick Start
//!
//! ```
//! use fibre_autowire::{params, Container};
//!
//! trait Store {
//!   fn describe(&self) -> String;
//! }
//!
//! struct MemoryStore;
//! impl Store for MemoryStore {
//!   fn describe(&self) -> String {
//!     "memory".to_string()
//!   }
//! }
//!
//! struct UserService {
//!   store: Box<dyn Store>,
//!   owner: String,
//! }
//!
//! let mut container = Container::new();
//! container
//!   .register::<MemoryStore>()
//!   .implements::<dyn Store>(|s| s)
//!   .constructor(|_| Ok(MemoryStore));
//! container
//!   .register::<UserService>()
//!   .typed::<dyn Store>()
//!   .untyped()
//!   .constructor(|args| {
//!     Ok(UserService {
//!       store: args.dependency::<dyn Store>()?,
//!       owner: args.value()?,
//!     })
//!   });
//!
//! // `dyn Store` has a single implementation, so it is wired automatically.
//! let service = container.create::<UserService>(params!["bob"]).unwrap();
//! assert_eq!(service.store.describe(), "memory");
//! assert_eq!(service.owner, "bob");
//! ```

mod arguments;
mod config;
mod container;
mod core;
mod error;
mod locator;
mod macros;
mod reflection;
mod registry;
mod universe;

pub use arguments::Arguments;
pub use config::{ContainerBuilder, ContainerConfig, DEFAULT_MAX_DEPTH};
pub use container::{Container, ParameterBinding};
pub use crate::core::{Instance, Param, ParamSpec, TypeIdentifier, TypeKey};
pub use error::{ArgumentError, BoxError, Error};
pub use locator::{merge_parameters, Locator, TypeLocator};
pub use reflection::ReflectionCache;
pub use registry::Registry;
pub use universe::{TypeBuilder, TypeRecord, TypeUniverse};
