use crate::cli::ConfigCommands;
use crate::config::{Config, CONFIG_FILE};
use crate::error::Result;
use crate::project::Project;
use std::path::{Path, PathBuf};

pub fn execute(project: &Project, config: &Config, command: &ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => show(project, config),
        ConfigCommands::Validate { file } => validate(project, file.as_deref()),
    }
}

fn global_config_path() -> PathBuf {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(CONFIG_FILE))
        .unwrap_or_else(|| PathBuf::from("~").join(CONFIG_FILE))
}

/// Validate config files without needing a loadable configuration first.
pub fn validate(project: &Project, file: Option<&Path>) -> Result<()> {
    if let Some(file) = file {
        println!("Validating {}...", file.display());
        Config::from_file(file)?.validate()?;
        println!("✓ Configuration is valid!");
        return Ok(());
    }

    let global_config = global_config_path();
    let project_config = project.root().join(CONFIG_FILE);

    println!("Validating configuration files...\n");
    for (label, path) in [("Global", &global_config), ("Project", &project_config)] {
        if path.exists() {
            println!("  {} config: {}", label, path.display());
        } else {
            println!("  {} config: {} - not found (optional)", label, path.display());
        }
    }

    println!("\nLoading and validating configuration...");
    match Config::load(project.root()) {
        Ok(_) => {
            println!("✓ Configuration is valid!");
            Ok(())
        }
        Err(e) => {
            println!("✗ Configuration is invalid!");
            println!("  Error: {}", e);
            Err(e)
        }
    }
}

fn show(project: &Project, config: &Config) -> Result<()> {
    print!("{}", render(project, config));
    Ok(())
}

pub fn render(project: &Project, config: &Config) -> String {
    let resolved = |r: Result<PathBuf>| match r {
        Ok(path) => path.display().to_string(),
        Err(e) => format!("<{}>", e),
    };

    let mut out = String::new();
    out.push_str("Effective Configuration:\n");
    out.push_str("(CLI > Environment > Project config > Global config > Defaults)\n\n");

    out.push_str("Assets:\n");
    out.push_str(&format!("  global_dir: {}\n", resolved(config.global_dir())));
    out.push_str(&format!(
        "  local_dir: {}\n",
        resolved(config.local_dir(project.root()))
    ));

    out.push_str("\nRegistry:\n");
    out.push_str(&format!(
        "  root: {}\n",
        resolved(config.registry_root(project.root()))
    ));
    match config.index_path(project.root()) {
        Ok(Some(index)) => out.push_str(&format!("  index: {}\n", index.display())),
        Ok(None) => out.push_str("  index: <root>/index.cue\n"),
        Err(e) => out.push_str(&format!("  index: <{}>\n", e)),
    }

    out.push_str("\nSearch:\n");
    match config.search.limit {
        Some(limit) => out.push_str(&format!("  limit: {}\n", limit)),
        None => out.push_str("  limit: unlimited\n"),
    }

    out.push_str("\nLogging:\n");
    out.push_str(&format!("  level: {}\n", config.logging.level));
    out.push_str(&format!("  format: {:?}\n", config.logging.format).to_lowercase());
    for (module, level) in &config.logging.modules {
        out.push_str(&format!("  {}: {}\n", module, level));
    }

    out
}
