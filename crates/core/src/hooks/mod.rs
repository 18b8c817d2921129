//! Pre- and post-build lifecycle hooks
//!
//! A hook is declared as `<module>:<callable>` under `pre-build` or
//! `post-build` in the plugin section. Callables registered in a
//! [`HookRegistry`] win; anything else is looked up as a Python module in the
//! project tree and run inside the build environment.

mod interface;
mod plugin_hook;
mod registry;

pub use interface::HookInterface;
pub use plugin_hook::PluginHook;
pub use registry::{HookFn, HookRegistry};

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    Pre,
    Post,
}

impl HookKind {
    pub fn as_str(self) -> &'static str {
        match self {
            HookKind::Pre => "pre",
            HookKind::Post => "post",
        }
    }

    /// Plugin-section key declaring this hook
    pub fn config_key(self) -> &'static str {
        match self {
            HookKind::Pre => "pre-build",
            HookKind::Post => "post-build",
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
