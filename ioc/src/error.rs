use crate::core::TypeKey;

/// A boxed error returned by a type's constructor.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned while binding or resolving a capability.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// No bound, auto-registrable or uniquely discoverable implementation exists.
  #[error("No type registered for capability {capability}")]
  CannotFindImplementation { capability: TypeKey },

  /// Auto-discovery found more than one concrete implementation. Bind one of
  /// the candidates explicitly to disambiguate.
  #[error(
    "Found [{}] candidates [{}] for requested [{capability}]. You must bind one of the candidates explicitly.",
    .candidates.len(),
    join(.candidates)
  )]
  MultipleImplementationsPossible {
    capability: TypeKey,
    candidates: Vec<TypeKey>,
  },

  /// A capability was requested again while it was still being resolved.
  #[error("Circular dependency detected: {}", join_with(.chain, " -> "))]
  CyclicDependency { chain: Vec<TypeKey> },

  /// The resolution stack grew past the configured maximum depth.
  #[error("Resolution of {capability} exceeded the maximum depth of {depth}")]
  ResolutionTooDeep { capability: TypeKey, depth: usize },

  /// The Locator bound to a capability builds a type that does not provide it.
  #[error("Binding for {capability} targets {target}, which does not implement it")]
  IncompatibleBinding { capability: TypeKey, target: TypeKey },

  /// More parameter overrides were given than the target has untyped slots.
  #[error("{given} parameters given for {capability}, but its constructor has only {slots} untyped slots")]
  TooManyParameters {
    capability: TypeKey,
    given: usize,
    slots: usize,
  },

  /// The target type's constructor failed.
  #[error("Failed to construct {type_name}: {source}")]
  Construction {
    type_name: &'static str,
    #[source]
    source: BoxError,
  },
}

/// Errors raised by a constructor while pulling its arguments.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentError {
  /// The argument list was exhausted.
  #[error("missing argument at position {position}, expected {expected}")]
  Missing {
    position: usize,
    expected: &'static str,
  },

  /// The argument at this position holds a different type.
  #[error("argument at position {position} is {found}, expected {expected}")]
  TypeMismatch {
    position: usize,
    expected: &'static str,
    found: &'static str,
  },
}

fn join(keys: &[TypeKey]) -> String {
  join_with(keys, ", ")
}

fn join_with(keys: &[TypeKey], separator: &str) -> String {
  keys
    .iter()
    .map(|k| k.name())
    .collect::<Vec<_>>()
    .join(separator)
}
