// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::{Arc, LazyLock,
                atomic::{AtomicBool, Ordering}};

use crate::ColorRegistry;

/// A per-logger override of a shared default.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TriState {
    /// Follow the shared [`LogConfig`].
    #[default]
    Unset,
    On,
    Off,
}

impl TriState {
    #[must_use]
    pub fn resolve(self, default: bool) -> bool {
        match self {
            TriState::Unset => default,
            TriState::On => true,
            TriState::Off => false,
        }
    }
}

mod converters {
    use super::TriState;

    impl From<bool> for TriState {
        fn from(value: bool) -> Self { if value { TriState::On } else { TriState::Off } }
    }
}

static GLOBAL_CONFIG: LazyLock<Arc<LogConfig>> = LazyLock::new(LogConfig::shared);

/// Settings shared by many loggers: the defaults that per-logger [`TriState`] overrides
/// fall back on, and the [`ColorRegistry`] used for template expansion.
///
/// Loggers read these on every call, so a change is seen by the next call of every
/// logger holding this config.
#[derive(Debug)]
pub struct LogConfig {
    color_template: AtomicBool,
    color: AtomicBool,
    auto_newlines: AtomicBool,
    pub registry: ColorRegistry,
}

impl Default for LogConfig {
    fn default() -> Self { Self::new() }
}

impl LogConfig {
    /// A fresh config, independent of [`LogConfig::global`]: templates off, color on,
    /// auto newlines off, standard style names.
    #[must_use]
    pub fn new() -> Self {
        Self {
            color_template: AtomicBool::new(false),
            color: AtomicBool::new(true),
            auto_newlines: AtomicBool::new(false),
            registry: ColorRegistry::new(),
        }
    }

    /// [`Self::new`], ready to be handed to [`crate::Logger::new_with_config`].
    #[must_use]
    pub fn shared() -> Arc<Self> { Arc::new(Self::new()) }

    /// The process-wide config used by [`crate::Logger::new`] and [`crate::facade`].
    #[must_use]
    pub fn global() -> Arc<Self> { GLOBAL_CONFIG.clone() }

    #[must_use]
    pub fn color_template(&self) -> bool { self.color_template.load(Ordering::SeqCst) }

    pub fn set_color_template(&self, enabled: bool) {
        self.color_template.store(enabled, Ordering::SeqCst);
    }

    #[must_use]
    pub fn color(&self) -> bool { self.color.load(Ordering::SeqCst) }

    pub fn set_color(&self, enabled: bool) { self.color.store(enabled, Ordering::SeqCst); }

    #[must_use]
    pub fn auto_newlines(&self) -> bool { self.auto_newlines.load(Ordering::SeqCst) }

    pub fn set_auto_newlines(&self, enabled: bool) {
        self.auto_newlines.store(enabled, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let config = LogConfig::new();
        assert!(!config.color_template());
        assert!(config.color());
        assert!(!config.auto_newlines());
        assert!(config.registry.get("red").is_some());
    }

    #[test]
    fn default_and_new_agree_without_an_arc() {
        let config: LogConfig = LogConfig::default();
        assert_eq!(config.color(), LogConfig::new().color());
        assert!(!config.color_template());
        assert_eq!(Arc::strong_count(&LogConfig::shared()), 1);
    }

    #[test]
    fn overrides_win_in_both_directions() {
        assert!(TriState::Unset.resolve(true));
        assert!(!TriState::Unset.resolve(false));
        assert!(TriState::On.resolve(false));
        assert!(!TriState::Off.resolve(true));
        assert_eq!(TriState::from(true), TriState::On);
    }

    #[test]
    fn new_configs_are_isolated() {
        let first = LogConfig::shared();
        let second = LogConfig::shared();
        first.set_color(false);
        assert!(second.color());
        assert!(!Arc::ptr_eq(&first, &second));
    }
}
