//! Workflow installation command.

use std::path::Path;

use crate::cli::output;
use crate::core::workflows;
use crate::error::Result;

/// Write the bundled workflows into `dir`.
pub fn execute(dir: &Path, secret: &str, force: bool) -> Result<()> {
    let written = workflows::install(dir, secret, force)?;

    for path in &written {
        output::success(&format!("wrote {}", path.display()));
    }
    println!();
    output::hint(&format!(
        "commit and push them, then store the secret once with {}",
        output::cmd(&format!("gh secret set {}", secret))
    ));
    Ok(())
}
