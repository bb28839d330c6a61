//! Public macros for building parameter lists and resolving services.

/// Builds a `Vec<Param>` from values convertible with `Param::from`.
///
/// ```
/// use fibre_autowire::params;
///
/// let params = params!["bob", 42_i64, true];
/// assert_eq!(params.len(), 3);
/// assert_eq!(params[0].downcast_ref::<String>().unwrap(), "bob");
/// ```
#[macro_export]
macro_rules! params {
  () => {
    ::std::vec::Vec::<$crate::Param>::new()
  };
  ($($value:expr),+ $(,)?) => {
    ::std::vec![$($crate::Param::from($value)),+]
  };
}

/// Resolves a service from a container, panicking if it cannot be created.
///
/// For a non-panicking version, call `container.create(...)` directly.
///
/// # Panics
///
/// Panics with the resolution error if the service cannot be created.
///
/// # Examples
///
/// ```
/// use fibre_autowire::{create, Container};
///
/// trait Greeter { fn greet(&self) -> String; }
/// struct English;
/// impl Greeter for English { fn greet(&self) -> String { "Hello!".to_string() } }
///
/// let mut container = Container::new();
/// container
///   .register::<English>()
///   .implements::<dyn Greeter>(|e| e)
///   .constructor(|_| Ok(English));
///
/// let greeter = create!(container, trait Greeter);
/// assert_eq!(greeter.greet(), "Hello!");
/// ```
#[macro_export]
macro_rules! create {
  // Arm for resolving a trait object: create!(container, trait MyTrait)
  ($container:expr, trait $trait_ident:ident) => {
    $crate::create!($container, trait $trait_ident, [])
  };

  // Arm for a trait object with supplied values: create!(container, trait MyTrait, ["bob"])
  ($container:expr, trait $trait_ident:ident, [$($value:expr),* $(,)?]) => {
    $container
      .create::<dyn $trait_ident>($crate::params![$($value),*])
      .unwrap_or_else(|err| {
        panic!(
          "Failed to create required trait service {}: {}",
          std::any::type_name::<dyn $trait_ident>(),
          err
        )
      })
  };

  // Arm for resolving any type: create!(container, MyService)
  ($container:expr, $type:ty) => {
    $crate::create!($container, $type, [])
  };

  // Arm for any type with supplied values: create!(container, MyService, ["bob", 3])
  ($container:expr, $type:ty, [$($value:expr),* $(,)?]) => {
    $container
      .create::<$type>($crate::params![$($value),*])
      .unwrap_or_else(|err| {
        panic!(
          "Failed to create required service {}: {}",
          std::any::type_name::<$type>(),
          err
        )
      })
  };
}
