use std::env;
use std::path::{PathBuf, Path};

use anyhow::{Context, Result};

use keymap_config::KeymapConfig;

/// Generate build metadata file that is then included in code
fn build_metadata() -> Result<()> {
    built::write_built_file()?;
    Ok(())
}

fn json_config(out: &Path) -> Result<()>  {
    // Generate keymap schema, the copy in crate root is meant for editors
    KeymapConfig::schema_to_file(&out.join("schema.json"))
        .context("While generating JSON schema")?;
    KeymapConfig::schema_to_file(Path::new("./schema.json"))
        .context("While generating JSON schema")?;

    println!("cargo:rerun-if-env-changed=CARGO_FEATURE_JSON_CONFIG");
    println!("cargo:rerun-if-env-changed=KEYMAP_JSON_CONFIG");
    if env::var_os("CARGO_FEATURE_JSON_CONFIG").is_some() {
        // Get path from env variable or use default
        let path = env::var_os("KEYMAP_JSON_CONFIG")
            .map(|s| s.into_string())
            .transpose()
            .map_err(|_| anyhow::anyhow!("KEYMAP_JSON_CONFIG is not utf-8"))?
            .unwrap_or_else(|| String::from("keymap.json"));

        println!("cargo:rerun-if-changed={}", path);

        let config = KeymapConfig::from_file(Path::new(&path))
            .context(format!("While reading {}", path))?;

        config.to_file(&out.join("config.rs"))
            .context("While generating config.rs")?;
    } else if env::var_os("KEYMAP_JSON_CONFIG").is_some() {
        println!("cargo:warning=KEYMAP_JSON_CONFIG defined but ignored because feature \"json-config\" is not enabled");
    }

    Ok(())
}

fn main() -> Result<()>  {
    build_metadata()?;
    let out = &PathBuf::from(env::var_os("OUT_DIR").context("Could not get OUT_DIR")?);
    json_config(out)?;
    Ok(())
}
