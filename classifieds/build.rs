use common::yaml_include::load_yaml_with_includes;
use std::{error::Error, fs, io::Write, path::PathBuf};

/// Resolves `config/<GUARD_ENV>.yaml` with its includes into
/// `target/<profile>/config/total_config.yaml`, the binaries' default config path.
fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo:rerun-if-changed=config");
    println!("cargo:rerun-if-env-changed=GUARD_ENV");

    let env = std::env::var("GUARD_ENV").unwrap_or_else(|_| "dev".to_string());
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "debug".to_string());
    let manifest_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR")?);
    let out_dir = PathBuf::from(std::env::var("OUT_DIR")?);

    // Navigate up to the target directory
    let Some(target_dir) = out_dir.ancestors().find(|p| p.ends_with("target")) else {
        println!("cargo:warning=No target directory above {:?}, skipping config merge", out_dir);
        return Ok(());
    };

    let total_config_dir = target_dir.join(&profile).join("config");
    let total_config_file_name = total_config_dir.join("total_config.yaml");
    let source = manifest_dir.join("config").join(format!("{}.yaml", env));

    println!("cargo:warning=Loading config env {:?} profile {:?}", env, profile);
    let config_yaml = load_yaml_with_includes(&source)?;

    let mut out_str = String::new();
    {
        let mut emitter = yaml_rust2::YamlEmitter::new(&mut out_str);
        emitter.dump(&config_yaml)?;
    }

    fs::create_dir_all(&total_config_dir)?;
    fs::File::create(&total_config_file_name)?.write_all(out_str.as_bytes())?;

    Ok(())
}
