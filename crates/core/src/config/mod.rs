//! Configuration management for pyinstaller-runner

mod layered;
pub mod platform;
mod project;
mod version;

// Re-export main types
pub use layered::{
    LayeredConfig, expect_bool, expect_string, expect_string_list, expect_string_or_list,
    expect_table, type_name,
};
pub use project::{HOST_INCLUDE, MANIFEST_FILE, PLUGIN_SECTION, Project};
pub use version::{PackageVersion, resolve_package_version};
