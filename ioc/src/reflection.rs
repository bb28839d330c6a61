//! Memoized type metadata backing auto-discovery.

use std::collections::HashMap;
use std::rc::Rc;

use once_cell::unsync::OnceCell;

use crate::core::{ParamSpec, TypeKey};
use crate::universe::{TypeRecord, TypeUniverse};

/// Caches, per known type, the capabilities it implements, the concrete types
/// reachable from it, and its constructor shape.
///
/// The cache is filled by [`refresh`](ReflectionCache::refresh), which only
/// indexes types registered since the previous refresh. Index entries are
/// never removed.
#[derive(Default)]
pub struct ReflectionCache {
  indexed: usize,
  records: HashMap<TypeKey, Rc<TypeRecord>>,
  interfaces_of: HashMap<TypeKey, Vec<TypeKey>>,
  implementations_of: HashMap<TypeKey, Vec<TypeKey>>,
  subgraphs: HashMap<TypeKey, OnceCell<Vec<TypeKey>>>,
}

impl ReflectionCache {
  pub fn new() -> Self {
    Self::default()
  }

  /// Indexes every type added to `universe` since the last refresh.
  ///
  /// Memoized subgraphs are recomputed on demand afterwards, since newly
  /// indexed types may extend them.
  pub fn refresh(&mut self, universe: &TypeUniverse) {
    let fresh = universe.since(self.indexed);
    if fresh.is_empty() {
      return;
    }
    tracing::debug!(
      indexed = self.indexed,
      new_types = fresh.len(),
      "refreshing reflection cache"
    );
    for record in fresh {
      self.index(record);
    }
    self.indexed = universe.len();
    for cell in self.subgraphs.values_mut() {
      cell.take();
    }
  }

  /// Whether `universe` holds types this cache has not indexed yet.
  pub fn is_stale(&self, universe: &TypeUniverse) -> bool {
    self.indexed < universe.len()
  }

  fn index(&mut self, record: &Rc<TypeRecord>) {
    let key = record.key();
    self.records.insert(key, Rc::clone(record));
    self.subgraphs.entry(key).or_default();

    let interfaces = record.interfaces().to_vec();
    // A re-registered type no longer implements what it stopped declaring.
    if let Some(previous) = self.interfaces_of.get(&key) {
      for dropped in previous.iter().filter(|i| !interfaces.contains(*i)) {
        if let Some(implementations) = self.implementations_of.get_mut(dropped) {
          implementations.retain(|class| *class != key);
        }
      }
    }
    for interface in &interfaces {
      self.cross_reference(*interface, key);
    }
    self.interfaces_of.insert(key, interfaces);
  }

  fn cross_reference(&mut self, interface: TypeKey, class: TypeKey) {
    let implementations = self.implementations_of.entry(interface).or_default();
    if !implementations.contains(&class) {
      implementations.push(class);
    }
    self.subgraphs.entry(interface).or_default();
  }

  /// All indexed concrete types implementing `capability`, in registration order.
  pub fn implementations_of(&self, capability: &TypeKey) -> Vec<TypeKey> {
    self
      .implementations_of
      .get(capability)
      .cloned()
      .unwrap_or_default()
  }

  /// Capabilities declared by `ty`. Unknown types declare none.
  pub fn interfaces_of(&self, ty: &TypeKey) -> Vec<TypeKey> {
    self.interfaces_of.get(ty).cloned().unwrap_or_default()
  }

  /// All concrete types equal to or implementing `ty`.
  ///
  /// Computed once per type and memoized until the next refresh that indexes
  /// new types. Unknown types yield an empty set.
  pub fn concrete_subgraph_of(&self, ty: &TypeKey) -> Vec<TypeKey> {
    match self.subgraphs.get(ty) {
      Some(cell) => cell.get_or_init(|| self.compute_subgraph(ty)).clone(),
      None => Vec::new(),
    }
  }

  fn compute_subgraph(&self, ty: &TypeKey) -> Vec<TypeKey> {
    let mut subgraph = Vec::new();
    if self.is_concrete(ty) {
      subgraph.push(*ty);
    }
    for candidate in self.implementations_of.get(ty).into_iter().flatten() {
      if self.is_concrete(candidate) && !subgraph.contains(candidate) {
        subgraph.push(*candidate);
      }
    }
    subgraph
  }

  /// The ordered constructor parameter shape of `ty`.
  pub fn constructor_parameters(&self, ty: &TypeKey) -> Vec<ParamSpec> {
    self
      .records
      .get(ty)
      .map(|record| record.parameters().to_vec())
      .unwrap_or_default()
  }

  /// Whether `ty` is a registered constructible type.
  pub fn is_concrete(&self, ty: &TypeKey) -> bool {
    self
      .records
      .get(ty)
      .is_some_and(|record| record.identifier().is_concrete())
  }

  /// Whether `ty` is an abstract capability, either declared explicitly or
  /// named by some type's `implements`.
  pub fn is_capability(&self, ty: &TypeKey) -> bool {
    match self.records.get(ty) {
      Some(record) => !record.identifier().is_concrete(),
      None => self.implementations_of.contains_key(ty),
    }
  }

  pub fn is_indexed(&self, ty: &TypeKey) -> bool {
    self.records.contains_key(ty)
  }

  pub(crate) fn record(&self, ty: &TypeKey) -> Option<Rc<TypeRecord>> {
    self.records.get(ty).cloned()
  }

  /// Number of registrations indexed so far.
  pub fn indexed(&self) -> usize {
    self.indexed
  }
}
