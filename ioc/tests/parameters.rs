use fibre_autowire::{params, Container, Error, Param};
use pretty_assertions::assert_eq;

// --- Test Fixtures ---

trait Database {
  fn url(&self) -> String;
}

struct Postgres;
impl Database for Postgres {
  fn url(&self) -> String {
    "postgres://localhost".to_string()
  }
}

struct UserService {
  db: Box<dyn Database>,
  owner: String,
}

fn container() -> Container {
  let mut container = Container::new();
  container
    .register::<Postgres>()
    .implements::<dyn Database>(|p| p)
    .constructor(|_| Ok(Postgres));
  container
    .register::<UserService>()
    .typed::<dyn Database>()
    .untyped()
    .constructor(|args| {
      Ok(UserService {
        db: args.dependency::<dyn Database>()?,
        owner: args.value()?,
      })
    });
  container
}

// --- Parameter Tests ---

#[test]
fn test_typed_dependency_and_supplied_value() {
  // Arrange
  let container = container();

  // Act
  let service = container.create::<UserService>(params!["bob"]).unwrap();

  // Assert
  assert_eq!(service.db.url(), "postgres://localhost");
  assert_eq!(service.owner, "bob");
}

#[test]
fn test_overrides_win_over_supplied_values() {
  // Arrange
  let mut container = container();
  container
    .with_parameters(params!["custom"])
    .bind_to::<UserService>()
    .unwrap();

  // Act
  let first = container.create::<UserService>(params!["bob"]).unwrap();
  let second = container.create::<UserService>(params![]).unwrap();

  // Assert
  assert_eq!(first.owner, "custom");
  assert_eq!(second.owner, "custom");
}

#[test]
fn test_overrides_follow_the_locator_across_capabilities() {
  // Arrange
  trait Owned {
    fn owner(&self) -> String;
  }
  struct Account(String);
  impl Owned for Account {
    fn owner(&self) -> String {
      self.0.clone()
    }
  }
  let mut container = Container::new();
  container
    .register::<Account>()
    .implements::<dyn Owned>(|a| a)
    .untyped()
    .constructor(|args| Ok(Account(args.value()?)));

  // Act
  container
    .with_parameters(params!["alice"])
    .bind_to::<Account>()
    .unwrap();
  let owned = container.create::<dyn Owned>(params!["mallory"]).unwrap();

  // Assert
  assert_eq!(owned.owner(), "alice");
}

#[test]
fn test_supplied_values_fill_slots_after_overrides() {
  // Arrange
  struct Pair {
    left: String,
    right: i64,
  }
  let mut container = Container::new();
  container
    .register::<Pair>()
    .untyped()
    .untyped()
    .constructor(|args| {
      Ok(Pair {
        left: args.value()?,
        right: args.value()?,
      })
    });
  container
    .with_parameters(params!["fixed"])
    .bind_to::<Pair>()
    .unwrap();

  // Act
  let pair = container
    .create::<Pair>(vec![Param::from("ignored"), Param::from(9_i64)])
    .unwrap();

  // Assert
  assert_eq!(pair.left, "fixed");
  assert_eq!(pair.right, 9);
}

#[test]
fn test_too_many_overrides_are_rejected_at_bind_time() {
  let mut container = container();

  let err = container
    .with_parameters(params!["a", "b"])
    .bind_to::<UserService>()
    .err()
    .unwrap();

  match err {
    Error::TooManyParameters { given, slots, .. } => {
      assert_eq!((given, slots), (2, 1));
    }
    other => panic!("unexpected error: {}", other),
  }
}

#[test]
fn test_binding_overrides_to_unknown_capability_fails() {
  trait Nothing {}
  let mut container = Container::new();

  let err = container
    .with_parameters(params!["x"])
    .bind_to::<dyn Nothing>()
    .err()
    .unwrap();

  assert!(matches!(err, Error::CannotFindImplementation { .. }));
}

#[test]
fn test_exhausted_values_contribute_nothing() {
  // Arrange
  struct Optional {
    label: Option<String>,
    db: Box<dyn Database>,
  }
  let mut container = container();
  container
    .register::<Optional>()
    .untyped()
    .typed::<dyn Database>()
    .constructor(|args| {
      Ok(Optional {
        label: args.optional_value()?,
        db: args.dependency::<dyn Database>()?,
      })
    });

  // Act
  let without = container.create::<Optional>(params![]).unwrap();
  let with = container.create::<Optional>(params!["tag"]).unwrap();

  // Assert
  assert_eq!(without.label, None);
  assert_eq!(without.db.url(), "postgres://localhost");
  assert_eq!(with.label.as_deref(), Some("tag"));
}

#[test]
fn test_missing_required_value_is_a_construction_error() {
  let container = container();

  let err = container.create::<UserService>(params![]).err().unwrap();

  match err {
    Error::Construction { type_name, source } => {
      assert!(type_name.ends_with("UserService"));
      assert!(source.to_string().contains("missing argument"));
    }
    other => panic!("unexpected error: {}", other),
  }
}

#[test]
fn test_overrides_on_a_type_apply_when_auto_wired_by_capability() {
  // Arrange
  trait Named {
    fn name(&self) -> String;
  }
  struct Person(String);
  impl Named for Person {
    fn name(&self) -> String {
      self.0.clone()
    }
  }
  let mut container = Container::new();
  container
    .register::<Person>()
    .implements::<dyn Named>(|p| p)
    .untyped()
    .constructor(|args| Ok(Person(args.value()?)));
  container
    .with_parameters(params!["ada"])
    .bind_to::<Person>()
    .unwrap();

  // Act: `dyn Named` was not bound explicitly, so it is discovered.
  let named = container.create::<dyn Named>(params![]).unwrap();

  // Assert
  assert_eq!(named.name(), "ada");
}
