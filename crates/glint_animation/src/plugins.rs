//! Process-wide ease registry
//!
//! Named eases are registered once per process and shared by every timeline.
//! [`register_plugins`] installs the built-in names; widgets add their own
//! custom curves with [`register_ease`].

use std::sync::{Once, OnceLock, PoisonError, RwLock};

use rustc_hash::FxHashMap;

use crate::easing::Easing;

static REGISTRY: OnceLock<RwLock<FxHashMap<String, Easing>>> = OnceLock::new();
static BUILTINS: Once = Once::new();

fn registry() -> &'static RwLock<FxHashMap<String, Easing>> {
    REGISTRY.get_or_init(|| RwLock::new(FxHashMap::default()))
}

/// Register the built-in named eases
///
/// Safe to call any number of times; registration happens once.
pub fn register_plugins() {
    BUILTINS.call_once(|| {
        let builtins = [
            ("linear", Easing::Linear),
            ("quad.in", Easing::QuadIn),
            ("quad.out", Easing::QuadOut),
            ("quad.inOut", Easing::QuadInOut),
            ("cubic.in", Easing::CubicIn),
            ("cubic.out", Easing::CubicOut),
            ("cubic.inOut", Easing::CubicInOut),
            ("back.out", Easing::back_out()),
            ("slow", Easing::slow_mo(0.7, 0.7)),
        ];

        let mut map = registry().write().unwrap_or_else(PoisonError::into_inner);
        for (name, easing) in builtins {
            map.entry(name.to_string()).or_insert(easing);
        }
        tracing::debug!("registered {} built-in eases", map.len());
    });
}

/// Register (or replace) a named ease, returning the previous one
pub fn register_ease(name: impl Into<String>, easing: Easing) -> Option<Easing> {
    registry()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(name.into(), easing)
}

/// Look up a named ease
pub fn lookup(name: &str) -> Option<Easing> {
    registry()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(name)
        .copied()
}

pub fn is_registered(name: &str) -> bool {
    lookup(name).is_some()
}
