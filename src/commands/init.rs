use crate::io;
use anyhow::Result;
use std::path::PathBuf;

pub fn init_config(force: bool) -> Result<()> {
    let config_path = PathBuf::from(".sigcone.toml");

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    let default_config = r#"# Sigcone Configuration

[classify]
# Extra sequential type markers on top of the built-in
# FF / DLATCH / DLE / SR / mem set.
extra_markers = []

[analysis]
# Analyze modules on the rayon pool by default.
parallel = false

[output]
default_format = "terminal"
"#;

    io::write_file(&config_path, default_config)?;
    println!("Created .sigcone.toml configuration file");

    Ok(())
}
