//! The main `Container` struct and its associated methods.

use std::any::Any;
use std::cell::{Ref, RefCell};
use std::rc::Rc;

use crate::arguments::{Argument, Arguments};
use crate::config::{ContainerBuilder, ContainerConfig};
use crate::core::{Instance, Param, ParamSpec, ResolutionGuard, TypeKey};
use crate::error::Error;
use crate::locator::{Locator, TypeLocator};
use crate::reflection::ReflectionCache;
use crate::registry::Registry;
use crate::universe::{TypeBuilder, TypeUniverse};

/// The auto-wiring dependency injection container.
///
/// Types are registered during setup, which takes `&mut self`. Resolution
/// through [`create`](Container::create) only needs `&self`; it lazily indexes
/// new types and auto-registers bindings as it goes. The container is not
/// `Sync`: callers sharing it across threads must lock it themselves.
#[derive(Default)]
pub struct Container {
  config: ContainerConfig,
  universe: TypeUniverse,
  cache: RefCell<ReflectionCache>,
  registry: RefCell<Registry>,
  resolving: RefCell<Vec<TypeKey>>,
}

impl Container {
  /// Creates a new, empty `Container` with the default configuration.
  pub fn new() -> Self {
    Self::default()
  }

  pub fn builder() -> ContainerBuilder {
    ContainerBuilder::new()
  }

  /// Creates a container with `config`. A `max_depth` of zero is raised to one.
  pub fn with_config(mut config: ContainerConfig) -> Self {
    config.max_depth = config.max_depth.max(1);
    Self {
      config,
      ..Self::default()
    }
  }

  pub fn config(&self) -> &ContainerConfig {
    &self.config
  }

  // --- PRIVATE HELPERS ---

  fn ensure_indexed(&self) {
    if self.cache.borrow().is_stale(&self.universe) {
      self.cache.borrow_mut().refresh(&self.universe);
    }
  }

  fn locator(&self, capability: TypeKey) -> Result<Rc<dyn Locator>, Error> {
    self.ensure_indexed();
    let cache = self.cache.borrow();
    self
      .registry
      .borrow_mut()
      .resolve_locator(capability, &cache)?
      .ok_or(Error::CannotFindImplementation { capability })
  }

  /// The locator's parameter specs, capped at the target's own constructor length.
  fn capped_specs(&self, locator: &dyn Locator) -> Vec<ParamSpec> {
    let own_len = self
      .cache
      .borrow()
      .constructor_parameters(&locator.target())
      .len();
    let mut specs = locator.parameter_specs();
    specs.truncate(own_len);
    specs
  }

  fn assemble(
    &self,
    locator: &dyn Locator,
    supplied: Vec<Param>,
  ) -> Result<Arguments, Error> {
    let specs = self.capped_specs(locator);
    let mut values = locator.merged_parameters(supplied).into_iter();
    let mut arguments = Arguments::new();
    for spec in specs {
      match spec {
        ParamSpec::Typed(dependency) => {
          let (instance, _) = self.resolve(dependency, Vec::new())?;
          arguments.push(Argument::Dependency {
            key: dependency,
            instance,
          });
        }
        ParamSpec::Untyped => {
          if let Some(value) = values.next() {
            arguments.push(Argument::Value(value));
          }
        }
      }
    }
    Ok(arguments)
  }

  // --- PUBLIC API ---

  // --- Type Registration ---

  /// Starts describing concrete type `T`. See [`TypeBuilder`].
  pub fn register<T: Any>(&mut self) -> TypeBuilder<'_, T> {
    TypeBuilder::new(&mut self.universe)
  }

  /// Declares capability `K` so that it is known even without implementers.
  pub fn declare<K: ?Sized + Any>(&mut self) -> &mut Self {
    self.universe.declare(TypeKey::of::<K>());
    self
  }

  /// Indexes all types registered since the last refresh.
  pub fn refresh(&self) {
    self.ensure_indexed();
  }

  // --- Binding ---

  /// Binds registered type `T` under every capability it implements,
  /// replacing previous bindings for those capabilities.
  pub fn bind<T: Any>(&mut self) -> Result<&mut Self, Error> {
    let locator = self.locator_for::<T>()?;
    Ok(self.bind_locator(Rc::new(locator)))
  }

  /// Binds a pre-built locator under every capability it satisfies.
  pub fn bind_locator(&mut self, locator: Rc<dyn Locator>) -> &mut Self {
    self.registry.get_mut().bind(locator);
    self
  }

  /// Builds the default locator for registered type `T` without binding it.
  pub fn locator_for<T: Any>(&self) -> Result<TypeLocator, Error> {
    self.ensure_indexed();
    TypeLocator::new(&self.cache.borrow(), TypeKey::of::<T>())
  }

  /// Starts attaching positional parameter overrides to a binding.
  ///
  /// ```
  /// use fibre_autowire::{params, Container};
  ///
  /// struct Greeting(String);
  ///
  /// let mut container = Container::new();
  /// container
  ///   .register::<Greeting>()
  ///   .untyped()
  ///   .constructor(|args| Ok(Greeting(args.value()?)));
  /// container.with_parameters(params!["hi"]).bind_to::<Greeting>().unwrap();
  ///
  /// let greeting = container.create::<Greeting>(params!["ignored"]).unwrap();
  /// assert_eq!(greeting.0, "hi");
  /// ```
  pub fn with_parameters(&mut self, parameters: Vec<Param>) -> ParameterBinding<'_> {
    ParameterBinding {
      container: self,
      parameters,
    }
  }

  pub fn is_bound<K: ?Sized + Any>(&self) -> bool {
    self.registry.borrow().contains(&TypeKey::of::<K>())
  }

  /// Read access to the reflection cache.
  pub fn reflection(&self) -> Ref<'_, ReflectionCache> {
    self.ensure_indexed();
    self.cache.borrow()
  }

  /// A snapshot of the current `(capability, target)` bindings, in no
  /// particular order.
  pub fn bindings(&self) -> Vec<(TypeKey, TypeKey)> {
    self.registry.borrow().bindings().collect()
  }

  // --- Resolution ---

  /// Resolves `K` and constructs a fresh instance.
  ///
  /// `supplied` fills the untyped constructor slots left to right, after any
  /// overrides attached with [`with_parameters`](Container::with_parameters).
  /// Typed slots are resolved recursively with no supplied values.
  pub fn create<K: ?Sized + Any>(&self, supplied: Vec<Param>) -> Result<Box<K>, Error> {
    let capability = TypeKey::of::<K>();
    let (instance, target) = self.resolve(capability, supplied)?;
    instance
      .downcast::<Box<K>>()
      .map(|boxed| *boxed)
      .map_err(|_| Error::IncompatibleBinding { capability, target })
  }

  /// Type-erased [`create`](Container::create). The returned instance holds
  /// a `Box<K>` for the capability `K` that `capability` identifies.
  pub fn create_by_key(&self, capability: TypeKey, supplied: Vec<Param>) -> Result<Instance, Error> {
    self.resolve(capability, supplied).map(|(instance, _)| instance)
  }

  /// Resolves `capability`, returning the instance and the type that built it.
  fn resolve(&self, capability: TypeKey, supplied: Vec<Param>) -> Result<(Instance, TypeKey), Error> {
    let _guard = ResolutionGuard::enter(
      &self.resolving,
      capability,
      self.config.detect_cycles,
      self.config.max_depth,
    )?;
    let locator = self.locator(capability)?;
    tracing::trace!(%capability, target = %locator.target(), "resolving");

    let arguments = self.assemble(locator.as_ref(), supplied)?;
    let instance = locator.construct(arguments)?;
    let target = locator.target();
    locator.cast(instance, capability).map(|instance| (instance, target))
  }
}

/// Positional overrides waiting to be attached to a binding.
/// Created by [`Container::with_parameters`].
#[must_use = "overrides are only attached once `bind_to` is called"]
pub struct ParameterBinding<'c> {
  container: &'c mut Container,
  parameters: Vec<Param>,
}

impl<'c> ParameterBinding<'c> {
  /// Attaches the overrides to the locator bound to `K`, auto-registering one
  /// if necessary. They apply to every later construction through that
  /// locator, including via its other capabilities.
  pub fn bind_to<K: ?Sized + Any>(self) -> Result<&'c mut Container, Error> {
    let capability = TypeKey::of::<K>();
    let locator = self.container.locator(capability)?;
    let slots = self
      .container
      .capped_specs(locator.as_ref())
      .iter()
      .filter(|spec| matches!(spec, ParamSpec::Untyped))
      .count();
    if self.parameters.len() > slots {
      return Err(Error::TooManyParameters {
        capability,
        given: self.parameters.len(),
        slots,
      });
    }
    tracing::debug!(
      %capability,
      target = %locator.target(),
      count = self.parameters.len(),
      "attaching parameter overrides"
    );
    locator.set_parameters(self.parameters);
    Ok(self.container)
  }
}
