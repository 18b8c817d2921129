use super::Target;
use crate::console::Console;
use crate::error::Result;
use crate::wheel;
use std::path::Path;

impl Target {
    /// Append this target's frozen output to `<output_root>/<wheel>` under
    /// the wheel's data scripts. Returns the archive entries written.
    pub fn bundle_to_wheel(
        &self,
        output_root: &Path,
        wheel: &str,
        console: &Console,
    ) -> Result<Vec<String>> {
        console.log(&format!("  - Adding {} to data scripts", self.prog));
        console.debug(&format!("bundle into '{wheel}'"));
        wheel::append_to_data_scripts(&output_root.join(wheel), &self.artifact_path(output_root))
    }
}
