use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// An editor plugin. The profile core never executes plugins; it only
/// records which ones a profile configures and whether the host could
/// resolve them.
pub trait DiagramPlugin: Send + Sync {
    fn name(&self) -> &str;
}

/// Host-supplied lookup from plugin name to handle. The descriptor loader
/// takes this as an argument and only ever reads it.
pub trait PluginRegistry {
    fn lookup(&self, name: &str) -> Option<Arc<dyn DiagramPlugin>>;
}

// ── MemoryPluginRegistry ──

/// In-memory `PluginRegistry` for hosts and tests.
#[derive(Default)]
pub struct MemoryPluginRegistry {
    plugins: HashMap<String, Arc<dyn DiagramPlugin>>,
}

impl MemoryPluginRegistry {
    pub fn new() -> Self {
        Self {
            plugins: HashMap::new(),
        }
    }

    pub fn register(&mut self, plugin: Arc<dyn DiagramPlugin>) {
        self.plugins.insert(plugin.name().to_string(), plugin);
    }
}

impl PluginRegistry for MemoryPluginRegistry {
    fn lookup(&self, name: &str) -> Option<Arc<dyn DiagramPlugin>> {
        self.plugins.get(name).cloned()
    }
}

// ── PluginBinding ──

/// One entry of a profile's ordered plugin list. `plugin` is `None` when the
/// descriptor names a plugin the registry does not know; the name is kept
/// at its configured position rather than failing the load.
#[derive(Clone)]
pub struct PluginBinding {
    pub name: String,
    pub plugin: Option<Arc<dyn DiagramPlugin>>,
}

impl PluginBinding {
    pub fn is_resolved(&self) -> bool {
        self.plugin.is_some()
    }
}

impl fmt::Debug for PluginBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginBinding")
            .field("name", &self.name)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}
