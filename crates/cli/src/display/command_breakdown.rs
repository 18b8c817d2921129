use pyinstaller_runner_core::PyInstallerCommand;

/// Flags whose next argument is their value
const VALUED_FLAGS: &[&str] = &[
    "--name",
    "--workpath",
    "--distpath",
    "--specpath",
    "--contents-directory",
    "--icon",
    "--target-arch",
    "--runtime-hook",
    "--copy-metadata",
    "--recursive-copy-metadata",
    "--collect-submodules",
    "--collect-data",
    "--collect-binaries",
    "--collect-all",
    "--add-data",
    "--hidden-import",
];

/// Split a command into labelled parts: the entry script, switches, and
/// `flag value` pairs
pub fn breakdown(command: &PyInstallerCommand) -> Vec<(String, String)> {
    let mut parts = vec![("command".to_string(), command.program.clone())];
    let mut switches = Vec::new();

    let mut args = command.args.iter();
    while let Some(arg) = args.next() {
        if VALUED_FLAGS.contains(&arg.as_str()) {
            let value = args.next().cloned().unwrap_or_default();
            parts.push((arg.trim_start_matches('-').to_string(), value));
        } else if arg.starts_with('-') {
            switches.push(arg.clone());
        } else {
            parts.push(("source".to_string(), arg.clone()));
        }
    }

    if !switches.is_empty() {
        parts.push(("switches".to_string(), switches.join(" ")));
    }
    parts
}

pub fn print_command_breakdown(command: &PyInstallerCommand) {
    println!("   🔧 Command breakdown:");
    for (label, value) in breakdown(command) {
        println!("      • {label}: {value}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakdown_pairs_flags() {
        let args = [
            "/proj/main.py",
            "--onefile",
            "--name",
            "cli",
            "--noconsole",
            "--add-data",
            "/proj/README.md:.",
            "--log-level=WARN",
        ];
        let command =
            PyInstallerCommand::new("pyinstaller", args.iter().map(|a| a.to_string()).collect());

        let parts = breakdown(&command);
        assert_eq!(parts[0], ("command".to_string(), "pyinstaller".to_string()));
        assert_eq!(parts[1], ("source".to_string(), "/proj/main.py".to_string()));
        assert_eq!(parts[2], ("name".to_string(), "cli".to_string()));
        assert_eq!(parts[3], ("add-data".to_string(), "/proj/README.md:.".to_string()));
        assert_eq!(
            parts[4],
            (
                "switches".to_string(),
                "--onefile --noconsole --log-level=WARN".to_string()
            )
        );
    }
}
