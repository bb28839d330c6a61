//! The explicit set of types the container knows about.
//!
//! Every type that may take part in auto-wiring is registered here during
//! setup. The universe only grows; the reflection cache indexes it
//! incrementally.

use std::any::Any;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::arguments::Arguments;
use crate::core::{erase, Instance, ParamSpec, TypeIdentifier, TypeKey};
use crate::error::BoxError;

pub(crate) type Factory = Rc<dyn Fn(&mut Arguments) -> Result<Instance, BoxError>>;
pub(crate) type Cast = Rc<dyn Fn(Instance) -> Option<Instance>>;

/// How to build a concrete type and view it as each capability it implements.
pub(crate) struct Constructor {
  pub(crate) factory: Factory,
  pub(crate) casts: HashMap<TypeKey, Cast>,
}

/// Everything the container knows about one type.
pub struct TypeRecord {
  identifier: TypeIdentifier,
  interfaces: Vec<TypeKey>,
  parameters: Vec<ParamSpec>,
  constructor: Option<Constructor>,
}

impl TypeRecord {
  pub(crate) fn capability(key: TypeKey) -> Self {
    Self {
      identifier: TypeIdentifier::Capability(key),
      interfaces: Vec::new(),
      parameters: Vec::new(),
      constructor: None,
    }
  }

  pub fn identifier(&self) -> TypeIdentifier {
    self.identifier
  }

  pub fn key(&self) -> TypeKey {
    self.identifier.key()
  }

  /// Capabilities this type declares it implements.
  pub fn interfaces(&self) -> &[TypeKey] {
    &self.interfaces
  }

  /// The constructor's ordered parameter shape.
  pub fn parameters(&self) -> &[ParamSpec] {
    &self.parameters
  }

  pub(crate) fn constructor(&self) -> Option<&Constructor> {
    self.constructor.as_ref()
  }
}

/// The owned, append-only registry of known types.
#[derive(Default)]
pub struct TypeUniverse {
  records: Vec<Rc<TypeRecord>>,
  latest: HashMap<TypeKey, usize>,
}

impl TypeUniverse {
  pub fn new() -> Self {
    Self::default()
  }

  pub(crate) fn insert(&mut self, record: TypeRecord) {
    let key = record.key();
    tracing::trace!(type_name = %key, concrete = record.identifier.is_concrete(), "registering type");
    self.latest.insert(key, self.records.len());
    self.records.push(Rc::new(record));
  }

  /// Declares an abstract capability. Declaring it twice is a no-op.
  pub(crate) fn declare(&mut self, key: TypeKey) {
    if !self.latest.contains_key(&key) {
      self.insert(TypeRecord::capability(key));
    }
  }

  /// The most recent record registered for `key`.
  pub fn get(&self, key: &TypeKey) -> Option<&Rc<TypeRecord>> {
    self.latest.get(key).map(|&pos| &self.records[pos])
  }

  /// Records registered at or after position `from`, in registration order.
  pub(crate) fn since(&self, from: usize) -> &[Rc<TypeRecord>] {
    &self.records[from.min(self.records.len())..]
  }

  /// Total number of registrations, including replaced ones.
  pub fn len(&self) -> usize {
    self.records.len()
  }

  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }
}

/// Describes a concrete type `T`: the capabilities it implements and its
/// constructor. Created by [`Container::register`](crate::Container::register).
///
/// ```
/// use fibre_autowire::Container;
///
/// trait Store {}
/// struct MemoryStore { name: String }
/// impl Store for MemoryStore {}
///
/// let mut container = Container::new();
/// container
///   .register::<MemoryStore>()
///   .implements::<dyn Store>(|s| s)
///   .untyped()
///   .constructor(|args| Ok(MemoryStore { name: args.value()? }));
/// ```
#[must_use = "a type is only registered once `constructor` is called"]
pub struct TypeBuilder<'u, T: Any> {
  universe: &'u mut TypeUniverse,
  interfaces: Vec<TypeKey>,
  casts: HashMap<TypeKey, Cast>,
  parameters: Vec<ParamSpec>,
  _marker: PhantomData<T>,
}

impl<'u, T: Any> TypeBuilder<'u, T> {
  pub(crate) fn new(universe: &'u mut TypeUniverse) -> Self {
    Self {
      universe,
      interfaces: Vec::new(),
      casts: HashMap::new(),
      parameters: Vec::new(),
      _marker: PhantomData,
    }
  }

  /// Declares that `T` implements capability `I`.
  ///
  /// `cast` turns a boxed `T` into the trait object; `|t| t` is enough in
  /// most cases since the box coerces.
  pub fn implements<I: ?Sized + Any>(mut self, cast: impl Fn(Box<T>) -> Box<I> + 'static) -> Self {
    let key = TypeKey::of::<I>();
    if !self.interfaces.contains(&key) {
      self.interfaces.push(key);
    }
    let erased: Cast = Rc::new(move |instance: Instance| {
      let concrete = instance.downcast::<Box<T>>().ok()?;
      Some(erase::<I>(cast(*concrete)))
    });
    self.casts.insert(key, erased);
    self
  }

  /// Appends a typed constructor parameter, resolved as capability `K`.
  pub fn typed<K: ?Sized + Any>(mut self) -> Self {
    self.parameters.push(ParamSpec::Typed(TypeKey::of::<K>()));
    self
  }

  /// Appends an untyped constructor parameter, filled from supplied values.
  pub fn untyped(mut self) -> Self {
    self.parameters.push(ParamSpec::Untyped);
    self
  }

  /// Sets the constructor and adds the type to the universe.
  ///
  /// The constructor reads its arguments in the order the parameters were
  /// declared. Any error it returns reaches the caller of `create`.
  pub fn constructor<F>(self, constructor: F) -> TypeKey
  where
    F: Fn(&mut Arguments) -> Result<T, BoxError> + 'static,
  {
    let key = TypeKey::of::<T>();
    let factory: Factory =
      Rc::new(move |args: &mut Arguments| constructor(args).map(|value| erase::<T>(Box::new(value))));
    self.universe.insert(TypeRecord {
      identifier: TypeIdentifier::Concrete(key),
      interfaces: self.interfaces,
      parameters: self.parameters,
      constructor: Some(Constructor {
        factory,
        casts: self.casts,
      }),
    });
    key
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  trait Shape {
    fn sides(&self) -> u32;
  }
  struct Square;
  impl Shape for Square {
    fn sides(&self) -> u32 {
      4
    }
  }

  #[test]
  fn builder_records_shape_and_casts() {
    let mut universe = TypeUniverse::new();
    let key = TypeBuilder::<Square>::new(&mut universe)
      .implements::<dyn Shape>(|s| s)
      .typed::<dyn Shape>()
      .untyped()
      .constructor(|_| Ok(Square));

    let record = universe.get(&key).unwrap();
    assert!(record.identifier().is_concrete());
    assert_eq!(record.interfaces(), &[TypeKey::of::<dyn Shape>()]);
    assert_eq!(
      record.parameters(),
      &[ParamSpec::Typed(TypeKey::of::<dyn Shape>()), ParamSpec::Untyped]
    );

    let ctor = record.constructor().unwrap();
    let instance = (ctor.factory)(&mut Arguments::new()).unwrap();
    let cast = &ctor.casts[&TypeKey::of::<dyn Shape>()];
    let shape = cast(instance).unwrap().downcast::<Box<dyn Shape>>().unwrap();
    assert_eq!(shape.sides(), 4);
  }

  #[test]
  fn declaring_twice_keeps_one_record() {
    let mut universe = TypeUniverse::new();
    universe.declare(TypeKey::of::<dyn Shape>());
    universe.declare(TypeKey::of::<dyn Shape>());
    assert_eq!(universe.len(), 1);
    assert!(!universe.get(&TypeKey::of::<dyn Shape>()).unwrap().identifier().is_concrete());
  }
}
