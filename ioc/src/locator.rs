//! Locators know how to build one concrete type.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::arguments::Arguments;
use crate::core::{Instance, Param, ParamSpec, TypeKey};
use crate::error::Error;
use crate::reflection::ReflectionCache;
use crate::universe::TypeRecord;

/// A strategy for constructing instances of one target type.
///
/// The registry indexes a locator under every capability it reports. Locators
/// are shared between those entries, so parameter overrides use interior
/// mutability.
pub trait Locator {
  /// The concrete type this locator builds.
  fn target(&self) -> TypeKey;

  /// Every capability identifier this locator satisfies.
  fn capabilities(&self) -> Vec<TypeKey>;

  /// The constructor parameter shape used when resolving arguments.
  fn parameter_specs(&self) -> Vec<ParamSpec>;

  /// The explicit positional overrides attached to this locator.
  fn parameters(&self) -> Vec<Param>;

  /// Replaces the explicit positional overrides.
  fn set_parameters(&self, parameters: Vec<Param>);

  /// Combines the overrides with caller-supplied values, overrides winning.
  fn merged_parameters(&self, supplied: Vec<Param>) -> Vec<Param> {
    merge_parameters(&self.parameters(), supplied)
  }

  /// Invokes the target's constructor with fully resolved arguments.
  fn construct(&self, arguments: Arguments) -> Result<Instance, Error>;

  /// Views a freshly constructed instance as `capability`.
  fn cast(&self, instance: Instance, capability: TypeKey) -> Result<Instance, Error>;
}

/// Positionally merges `overrides` over `supplied`.
///
/// Slot `i` takes `overrides[i]` when present and `supplied[i]` otherwise, so
/// supplied values only fill the positions past the last override.
pub fn merge_parameters(overrides: &[Param], supplied: Vec<Param>) -> Vec<Param> {
  let len = overrides.len().max(supplied.len());
  let mut supplied = supplied.into_iter();
  let mut merged = Vec::with_capacity(len);
  for i in 0..len {
    let from_caller = supplied.next();
    match overrides.get(i) {
      Some(value) => merged.push(value.clone()),
      None => merged.extend(from_caller),
    }
  }
  merged
}

/// The default locator, built from a registered type's record.
pub struct TypeLocator {
  record: Rc<TypeRecord>,
  capabilities: Vec<TypeKey>,
  parameters: RefCell<Vec<Param>>,
}

impl TypeLocator {
  /// Creates a locator for `target`, which must be an indexed concrete type.
  pub fn new(cache: &ReflectionCache, target: TypeKey) -> Result<Self, Error> {
    let record = cache
      .record(&target)
      .filter(|record| record.constructor().is_some())
      .ok_or(Error::CannotFindImplementation { capability: target })?;
    let mut capabilities = vec![target];
    capabilities.extend(cache.interfaces_of(&target));
    Ok(Self {
      record,
      capabilities,
      parameters: RefCell::new(Vec::new()),
    })
  }

  /// Sets the initial parameter overrides.
  pub fn with_parameters(self, parameters: Vec<Param>) -> Self {
    self.set_parameters(parameters);
    self
  }
}

impl Locator for TypeLocator {
  fn target(&self) -> TypeKey {
    self.record.key()
  }

  fn capabilities(&self) -> Vec<TypeKey> {
    self.capabilities.clone()
  }

  fn parameter_specs(&self) -> Vec<ParamSpec> {
    self.record.parameters().to_vec()
  }

  fn parameters(&self) -> Vec<Param> {
    self.parameters.borrow().clone()
  }

  fn set_parameters(&self, parameters: Vec<Param>) {
    *self.parameters.borrow_mut() = parameters;
  }

  fn construct(&self, mut arguments: Arguments) -> Result<Instance, Error> {
    let target = self.target();
    let constructor = self
      .record
      .constructor()
      .ok_or(Error::CannotFindImplementation { capability: target })?;
    (constructor.factory)(&mut arguments).map_err(|source| Error::Construction {
      type_name: target.name(),
      source,
    })
  }

  fn cast(&self, instance: Instance, capability: TypeKey) -> Result<Instance, Error> {
    let target = self.target();
    if capability == target {
      return Ok(instance);
    }
    self
      .record
      .constructor()
      .and_then(|constructor| constructor.casts.get(&capability))
      .and_then(|cast| cast(instance))
      .ok_or(Error::IncompatibleBinding { capability, target })
  }
}

impl fmt::Debug for TypeLocator {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TypeLocator")
      .field("target", &self.target())
      .field("capabilities", &self.capabilities)
      .field("parameters", &self.parameters.borrow())
      .finish()
  }
}
