//! Container configuration.

use crate::container::Container;

/// Default bound on nested resolutions.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Tunables for a [`Container`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct ContainerConfig {
  /// Fail with `CyclicDependency` when a capability is requested while it is
  /// still being resolved.
  pub detect_cycles: bool,
  /// Maximum number of nested resolutions before `ResolutionTooDeep`.
  pub max_depth: usize,
}

impl Default for ContainerConfig {
  fn default() -> Self {
    Self {
      detect_cycles: true,
      max_depth: DEFAULT_MAX_DEPTH,
    }
  }
}

/// A builder for [`Container`] instances.
#[derive(Debug, Clone, Default)]
pub struct ContainerBuilder {
  config: ContainerConfig,
}

impl ContainerBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  /// Enables or disables dependency cycle detection.
  pub fn detect_cycles(mut self, enabled: bool) -> Self {
    self.config.detect_cycles = enabled;
    self
  }

  /// Sets the maximum resolution depth. A depth of zero is raised to one.
  pub fn max_depth(mut self, depth: usize) -> Self {
    self.config.max_depth = depth.max(1);
    self
  }

  /// Replaces the whole configuration, e.g. one loaded from a file.
  pub fn config(mut self, config: ContainerConfig) -> Self {
    self.config = config;
    self
  }

  pub fn build(self) -> Container {
    Container::with_config(self.config)
  }
}
