//! Core data structures shared by the cache, the registry and the resolver.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::Error;

/// Identifies a type known to the container.
///
/// Equality and hashing only consider the `TypeId`; the name is carried along
/// for diagnostics.
#[derive(Clone, Copy)]
pub struct TypeKey {
  id: TypeId,
  name: &'static str,
}

impl TypeKey {
  /// Returns the key for `T`. `T` may be unsized, e.g. `dyn Greeter`.
  pub fn of<T: ?Sized + Any>() -> Self {
    Self {
      id: TypeId::of::<T>(),
      name: std::any::type_name::<T>(),
    }
  }

  pub fn type_id(&self) -> TypeId {
    self.id
  }

  pub fn name(&self) -> &'static str {
    self.name
  }
}

impl PartialEq for TypeKey {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
  }
}

impl Eq for TypeKey {}

impl std::hash::Hash for TypeKey {
  fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
    self.id.hash(state);
  }
}

impl fmt::Debug for TypeKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "TypeKey({})", self.name)
  }
}

impl fmt::Display for TypeKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name)
  }
}

/// A type as the container sees it, tagged when it is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeIdentifier {
  /// A constructible type with a registered constructor.
  Concrete(TypeKey),
  /// An abstract capability (a trait object type) with zero or more implementers.
  Capability(TypeKey),
}

impl TypeIdentifier {
  pub fn key(&self) -> TypeKey {
    match self {
      TypeIdentifier::Concrete(key) | TypeIdentifier::Capability(key) => *key,
    }
  }

  pub fn is_concrete(&self) -> bool {
    matches!(self, TypeIdentifier::Concrete(_))
  }
}

/// The shape of one constructor parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSpec {
  /// Names a capability that the container resolves recursively.
  Typed(TypeKey),
  /// Consumes the next positional value supplied by an override or the caller.
  Untyped,
}

impl ParamSpec {
  pub fn capability(&self) -> Option<TypeKey> {
    match self {
      ParamSpec::Typed(key) => Some(*key),
      ParamSpec::Untyped => None,
    }
  }
}

/// A positional value for an untyped constructor slot.
///
/// Values are reference counted so that parameter overrides attached to a
/// binding can be handed to every construction through that binding.
#[derive(Clone)]
pub struct Param {
  value: Rc<dyn Any>,
  type_name: &'static str,
}

impl Param {
  pub fn new<T: Any>(value: T) -> Self {
    Self {
      value: Rc::new(value),
      type_name: std::any::type_name::<T>(),
    }
  }

  pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
    self.value.downcast_ref::<T>()
  }

  pub fn is<T: Any>(&self) -> bool {
    self.value.is::<T>()
  }

  pub fn type_name(&self) -> &'static str {
    self.type_name
  }
}

impl fmt::Debug for Param {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if let Some(s) = self.downcast_ref::<String>() {
      write!(f, "Param({:?})", s)
    } else {
      write!(f, "Param(<{}>)", self.type_name)
    }
  }
}

impl From<&str> for Param {
  fn from(value: &str) -> Self {
    Param::new(value.to_owned())
  }
}

macro_rules! param_from {
  ($($ty:ty),* $(,)?) => {
    $(
      impl From<$ty> for Param {
        fn from(value: $ty) -> Self {
          Param::new(value)
        }
      }
    )*
  };
}

param_from!(String, bool, i32, i64, u32, u64, usize, f64);

/// A type-erased instance produced by the container.
///
/// An instance resolved for key `K` always holds a `Box<K>`, so callers can
/// recover it with `downcast::<Box<K>>()` whether `K` is sized or a trait object.
pub type Instance = Box<dyn Any>;

/// Boxes `value` the way the container stores instances of `K`.
pub(crate) fn erase<K: ?Sized + Any>(value: Box<K>) -> Instance {
  Box::new(value)
}

/// An RAII guard tracking the capabilities currently being resolved.
///
/// The stack belongs to one container. Entering a key that is already on the
/// stack is a dependency cycle. The key is popped when the guard drops, so the
/// stack unwinds correctly on both success and error paths.
pub(crate) struct ResolutionGuard<'a> {
  stack: &'a RefCell<Vec<TypeKey>>,
}

impl<'a> ResolutionGuard<'a> {
  pub(crate) fn enter(
    stack: &'a RefCell<Vec<TypeKey>>,
    key: TypeKey,
    detect_cycles: bool,
    max_depth: usize,
  ) -> Result<Self, Error> {
    let mut in_flight = stack.borrow_mut();
    if detect_cycles {
      if let Some(pos) = in_flight.iter().position(|k| *k == key) {
        let mut chain: Vec<TypeKey> = in_flight[pos..].to_vec();
        chain.push(key);
        return Err(Error::CyclicDependency { chain });
      }
    }
    if in_flight.len() >= max_depth {
      return Err(Error::ResolutionTooDeep {
        capability: key,
        depth: in_flight.len(),
      });
    }
    in_flight.push(key);
    drop(in_flight);
    Ok(Self { stack })
  }
}

impl Drop for ResolutionGuard<'_> {
  fn drop(&mut self) {
    self.stack.borrow_mut().pop();
  }
}
