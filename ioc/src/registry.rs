//! Capability bindings and lazy auto-registration.

use std::collections::HashMap;
use std::rc::Rc;

use crate::core::TypeKey;
use crate::error::Error;
use crate::locator::{Locator, TypeLocator};
use crate::reflection::ReflectionCache;

/// Maps each capability identifier to the locator that produces it.
///
/// Binding a locator indexes it under every capability it satisfies; a later
/// binding for the same identifier replaces the earlier one. Entries are never
/// removed.
#[derive(Default)]
pub struct Registry {
  bindings: HashMap<TypeKey, Rc<dyn Locator>>,
}

impl Registry {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn bind(&mut self, locator: Rc<dyn Locator>) {
    let target = locator.target();
    for capability in locator.capabilities() {
      tracing::debug!(%capability, %target, "binding capability");
      self.bindings.insert(capability, Rc::clone(&locator));
    }
  }

  pub fn get(&self, capability: &TypeKey) -> Option<Rc<dyn Locator>> {
    self.bindings.get(capability).cloned()
  }

  pub fn contains(&self, capability: &TypeKey) -> bool {
    self.bindings.contains_key(capability)
  }

  /// `(capability, target)` pairs for every binding, in no particular order.
  pub fn bindings(&self) -> impl Iterator<Item = (TypeKey, TypeKey)> + '_ {
    self
      .bindings
      .iter()
      .map(|(capability, locator)| (*capability, locator.target()))
  }

  pub fn len(&self) -> usize {
    self.bindings.len()
  }

  pub fn is_empty(&self) -> bool {
    self.bindings.is_empty()
  }

  /// Returns the locator bound to `capability`, auto-registering one if the
  /// capability can be wired without guessing.
  ///
  /// A concrete type gets a default locator for itself. A capability with
  /// exactly one implementation gets a default locator for that
  /// implementation; none is an error, and several are reported as ambiguous.
  /// For an identifier the cache knows nothing about this returns `Ok(None)`
  /// and leaves the failure to the caller.
  pub fn resolve_locator(
    &mut self,
    capability: TypeKey,
    cache: &ReflectionCache,
  ) -> Result<Option<Rc<dyn Locator>>, Error> {
    if let Some(locator) = self.get(&capability) {
      return Ok(Some(locator));
    }
    if cache.is_concrete(&capability) {
      return self.auto_register(capability, cache).map(Some);
    }
    if !cache.is_capability(&capability) {
      tracing::trace!(%capability, "no type or capability known, skipping auto-registration");
      return Ok(None);
    }
    let mut candidates = cache.implementations_of(&capability);
    match candidates.len() {
      0 => Err(Error::CannotFindImplementation { capability }),
      1 => {
        let implementation = candidates.remove(0);
        self.auto_register(implementation, cache).map(Some)
      }
      _ => {
        tracing::debug!(%capability, candidates = candidates.len(), "ambiguous auto-wiring");
        Err(Error::MultipleImplementationsPossible {
          capability,
          candidates,
        })
      }
    }
  }

  /// Implicit registrations reuse the target's existing locator and only
  /// fill vacant entries; explicit bindings are never overwritten.
  fn auto_register(
    &mut self,
    target: TypeKey,
    cache: &ReflectionCache,
  ) -> Result<Rc<dyn Locator>, Error> {
    let locator = match self.get(&target) {
      Some(existing) => existing,
      None => {
        tracing::debug!(%target, "auto-registering default locator");
        Rc::new(TypeLocator::new(cache, target)?) as Rc<dyn Locator>
      }
    };
    for capability in locator.capabilities() {
      self
        .bindings
        .entry(capability)
        .or_insert_with(|| Rc::clone(&locator));
    }
    Ok(locator)
  }
}
