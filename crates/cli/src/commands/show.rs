use anyhow::Result;

pub fn show_command() -> Result<()> {
    println!("pyinstaller-runner {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
