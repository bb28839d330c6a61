//! The ordered argument list handed to a type's constructor.

use std::any::Any;
use std::collections::VecDeque;
use std::fmt;

use crate::core::{Instance, Param, TypeKey};
use crate::error::ArgumentError;

pub(crate) enum Argument {
  /// A recursively resolved instance of a typed parameter.
  Dependency { key: TypeKey, instance: Instance },
  /// A positional value taken from overrides or the caller.
  Value(Param),
}

/// Arguments assembled by the resolver, consumed left to right by a constructor.
///
/// Untyped slots for which no value was supplied contribute nothing, so a
/// constructor with optional trailing values should read them with
/// [`Arguments::optional_value`].
pub struct Arguments {
  slots: VecDeque<Argument>,
  position: usize,
}

impl Arguments {
  pub(crate) fn new() -> Self {
    Self {
      slots: VecDeque::new(),
      position: 0,
    }
  }

  pub(crate) fn push(&mut self, argument: Argument) {
    self.slots.push_back(argument);
  }

  /// Takes the next argument as a resolved dependency of capability `K`.
  pub fn dependency<K: ?Sized + Any>(&mut self) -> Result<Box<K>, ArgumentError> {
    let position = self.position;
    let expected = std::any::type_name::<K>();
    match self.slots.pop_front() {
      Some(Argument::Dependency { key, instance }) => {
        self.position += 1;
        instance
          .downcast::<Box<K>>()
          .map(|boxed| *boxed)
          .map_err(|_| ArgumentError::TypeMismatch {
            position,
            expected,
            found: key.name(),
          })
      }
      Some(Argument::Value(param)) => {
        self.position += 1;
        Err(ArgumentError::TypeMismatch {
          position,
          expected,
          found: param.type_name(),
        })
      }
      None => Err(ArgumentError::Missing { position, expected }),
    }
  }

  /// Takes the next argument as an untyped value of type `T`.
  pub fn value<T: Any + Clone>(&mut self) -> Result<T, ArgumentError> {
    let position = self.position;
    let expected = std::any::type_name::<T>();
    self
      .optional_value::<T>()?
      .ok_or(ArgumentError::Missing { position, expected })
  }

  /// Takes the next argument if it is an untyped value.
  ///
  /// Returns `Ok(None)` without consuming anything when the list is exhausted
  /// or the next argument is a dependency.
  pub fn optional_value<T: Any + Clone>(&mut self) -> Result<Option<T>, ArgumentError> {
    let param = match self.slots.front() {
      Some(Argument::Value(param)) => param.clone(),
      _ => return Ok(None),
    };
    let position = self.position;
    self.slots.pop_front();
    self.position += 1;
    match param.downcast_ref::<T>() {
      Some(value) => Ok(Some(value.clone())),
      None => Err(ArgumentError::TypeMismatch {
        position,
        expected: std::any::type_name::<T>(),
        found: param.type_name(),
      }),
    }
  }

  /// Number of arguments not yet consumed.
  pub fn remaining(&self) -> usize {
    self.slots.len()
  }
}

impl fmt::Debug for Arguments {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut list = f.debug_list();
    for slot in &self.slots {
      match slot {
        Argument::Dependency { key, .. } => list.entry(key),
        Argument::Value(param) => list.entry(param),
      };
    }
    list.finish()
  }
}
