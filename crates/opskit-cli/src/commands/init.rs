use std::path::Path;

use anyhow::bail;
use opskit_core::OpskitConfig;
use opskit_core::config::CONFIG_FILE;

pub fn init(path: &Path) -> anyhow::Result<()> {
    let output = path.join(CONFIG_FILE);
    if output.exists() {
        bail!("{} already exists", output.display());
    }
    std::fs::write(&output, OpskitConfig::scaffold().to_toml_string()?)?;
    println!("✓ Generated {}", output.display());
    Ok(())
}
