//! Wheel platform tags
//!
//! The authoritative tag comes from the build environment's interpreter
//! (`packaging.tags.sys_tags()`); `host()` is the fallback derived from the
//! platform this binary was compiled for.

/// Platform segment of an interpreter tag such as
/// `cp312-cp312-manylinux_2_39_x86_64`.
pub fn from_sys_tag(tag: &str) -> Option<&str> {
    let platform = tag.trim().rsplit('-').next()?;
    if platform.is_empty() {
        None
    } else {
        Some(platform)
    }
}

/// Best-effort platform tag for the current host
pub fn host() -> String {
    let arch = std::env::consts::ARCH;
    match std::env::consts::OS {
        "windows" => match arch {
            "x86_64" => "win_amd64".to_string(),
            "x86" => "win32".to_string(),
            "aarch64" => "win_arm64".to_string(),
            other => format!("win_{other}"),
        },
        "macos" => match arch {
            "aarch64" => "macosx_11_0_arm64".to_string(),
            other => format!("macosx_10_9_{other}"),
        },
        os => format!("{os}_{arch}"),
    }
}

/// Windows tags use `;` to separate `--add-data` source and destination
pub fn is_windows(platform: &str) -> bool {
    platform.contains("win")
}

pub fn data_separator(platform: &str) -> char {
    if is_windows(platform) { ';' } else { ':' }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_sys_tag() {
        assert_eq!(
            from_sys_tag("cp312-cp312-manylinux_2_39_x86_64\n"),
            Some("manylinux_2_39_x86_64")
        );
        assert_eq!(from_sys_tag("win_amd64"), Some("win_amd64"));
        assert_eq!(from_sys_tag(""), None);
    }

    #[test]
    fn test_data_separator() {
        assert_eq!(data_separator("win_amd64"), ';');
        assert_eq!(data_separator("win32"), ';');
        assert_eq!(data_separator("manylinux_2_39_x86_64"), ':');
        assert_eq!(data_separator("macosx_11_0_arm64"), ':');
    }

    #[test]
    fn test_host_is_not_empty() {
        assert!(!host().is_empty());
    }
}
