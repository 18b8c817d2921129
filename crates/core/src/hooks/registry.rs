use super::HookInterface;
use crate::error::Result;
use std::collections::HashMap;
use std::sync::Arc;

/// A natively registered hook callable
pub type HookFn = Arc<dyn Fn(&HookInterface<'_>) -> Result<()> + Send + Sync>;

/// Registry mapping `<module>:<callable>` names to native callables
#[derive(Clone, Default)]
pub struct HookRegistry {
    hooks: HashMap<String, HookFn>,
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRegistry")
            .field("hooks", &self.names())
            .finish()
    }
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook under its qualified name
    pub fn register<F>(&mut self, name: impl Into<String>, hook: F)
    where
        F: Fn(&HookInterface<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.hooks.insert(name.into(), Arc::new(hook));
    }

    pub fn with_hook<F>(mut self, name: impl Into<String>, hook: F) -> Self
    where
        F: Fn(&HookInterface<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.register(name, hook);
        self
    }

    pub fn get(&self, name: &str) -> Option<HookFn> {
        self.hooks.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.hooks.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.hooks.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
