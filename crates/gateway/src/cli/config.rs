use std::path::Path;

use qo_domain::config::Config;

/// Parse and validate the config, printing any issues found.
/// Returns `true` when the config is valid.
pub fn validate(config: &Config, path: &Path) -> bool {
    let issues = crate::config_loader::validate(config, path);
    if issues.is_empty() {
        println!("config OK ({})", path.display());
        return true;
    }
    for issue in &issues {
        println!("  - {issue}");
    }
    false
}

pub fn show(config: &Config) {
    match serde_yaml::to_string(config) {
        Ok(yaml) => print!("{yaml}"),
        Err(e) => eprintln!("failed to render config as YAML: {e}"),
    }
}
