use std::fs;
use std::path::Path;
use yaml_rust2::{Yaml, YamlLoader, yaml::Hash};

use crate::config::ConfigError;

/// Loads a YAML file, expanding `!include <relative path>` lines.
///
/// Included documents are merged first, in order; the including file's own
/// keys override them. Maps merge recursively, everything else is replaced.
pub fn load_yaml_with_includes(path: &Path) -> Result<Yaml, ConfigError> {
    let resolved = resolve(path)?;
    tracing::trace!(?path, "Resolved yaml includes");
    Ok(resolved)
}

fn resolve(path: &Path) -> Result<Yaml, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let dir = path.parent().unwrap_or(Path::new(""));

    let mut own_lines = Vec::new();
    let mut included: Option<Yaml> = None;
    for line in contents.lines() {
        let Some(target) = line.trim().strip_prefix("!include") else {
            own_lines.push(line);
            continue;
        };
        let document = resolve(&dir.join(target.trim()))?;
        included = Some(match included {
            Some(earlier) => merge_yaml(&earlier, &document),
            None => document,
        });
    }

    let own = YamlLoader::load_from_str(&own_lines.join("\n"))?
        .into_iter()
        .reduce(|earlier, later| merge_yaml(&earlier, &later))
        .unwrap_or_else(|| Yaml::Hash(Hash::new()));

    Ok(match included {
        Some(base) => merge_yaml(&base, &own),
        None => own,
    })
}

/// `overlay` wins, except where it is null; maps merge key by key.
fn merge_yaml(base: &Yaml, overlay: &Yaml) -> Yaml {
    match (base, overlay) {
        (Yaml::Hash(lower), Yaml::Hash(upper)) => {
            let mut merged = lower.clone();
            for (key, value) in upper {
                let combined = lower
                    .get(key)
                    .map_or_else(|| value.clone(), |existing| merge_yaml(existing, value));
                merged.insert(key.clone(), combined);
            }
            Yaml::Hash(merged)
        }
        (kept, Yaml::Null | Yaml::BadValue) => kept.clone(),
        (_, replacement) => replacement.clone(),
    }
}
