//! Process-wide registry of loaded language libraries.
//!
//! A provisioned library is never unloaded: handles into it may be invoked
//! for the rest of the process's life, so every `Library` ever registered is
//! kept alive here. The registry grows without bound; that is the documented
//! cost of handing out non-owning entry points.

use std::collections::HashMap;
use std::sync::{LazyLock, Mutex};

use libloading::Library;

/// A loaded language module: the logical name it was provisioned under and
/// the resolved entry-point address.
///
/// The handle is a borrowed, non-owning view; the backing library lives in
/// the registry for the remaining process lifetime. The address is opaque —
/// invoking it with the right type is the consuming runtime's
/// responsibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleHandle {
    name: String,
    address: usize,
}

impl ModuleHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The entry-point symbol's address.
    pub fn as_ptr(&self) -> *const () {
        self.address as *const ()
    }
}

struct Registry {
    handles: HashMap<String, ModuleHandle>,
    // Keepalive only. Re-provisioning a name keeps the superseded library
    // too, since old handles into it must stay valid.
    libraries: Vec<Library>,
}

static REGISTRY: LazyLock<Mutex<Registry>> = LazyLock::new(|| {
    Mutex::new(Registry {
        handles: HashMap::new(),
        libraries: Vec::new(),
    })
});

/// Record a freshly loaded library and hand back its module handle.
///
/// Concurrent registrations for the same name are last-writer-wins; callers
/// that care must serialize provisioning per logical name.
pub(crate) fn register(name: &str, library: Library, address: usize) -> ModuleHandle {
    let handle = ModuleHandle {
        name: name.to_string(),
        address,
    };
    let mut registry = REGISTRY.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    registry.libraries.push(library);
    registry.handles.insert(name.to_string(), handle.clone());
    handle
}

/// The handle most recently provisioned under `name`, if any.
pub fn loaded(name: &str) -> Option<ModuleHandle> {
    let registry = REGISTRY.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    registry.handles.get(name).cloned()
}
