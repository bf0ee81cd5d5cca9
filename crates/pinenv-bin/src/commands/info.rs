use console::style;
use itertools::Itertools;
use pinenv::{Conda, PackageManager};
use pinenv_config::ProvisionConfig;

#[derive(Debug, clap::Parser)]
pub struct Opt {}

pub fn info(config: &ProvisionConfig, _opt: Opt) -> miette::Result<()> {
    let files = if config.loaded_from.is_empty() {
        style("none".to_string()).dim().to_string()
    } else {
        config.loaded_from.iter().map(|p| p.display()).join(", ")
    };

    println!("{:>16}: {files}", style("Config files").bold());
    println!(
        "{:>16}: {}",
        style("Check versions").bold(),
        config.check_versions()
    );
    println!(
        "{:>16}: {}",
        style("Channels").bold(),
        config.default_channels().join(", ")
    );
    println!(
        "{:>16}: {:?}",
        style("Local installs").bold(),
        config.pip.local_install_policy()
    );

    match Conda::locate(config) {
        Ok(conda) => {
            println!(
                "{:>16}: {}",
                style("Package manager").bold(),
                conda.executable().display()
            );
            println!(
                "{:>16}: {}",
                style("Base prefix").bold(),
                conda.base_prefix().display()
            );
            match conda.base_python_version() {
                Ok(version) => println!("{:>16}: {version}", style("Base python").bold()),
                Err(err) => tracing::warn!("{err}"),
            }
        }
        Err(err) => {
            println!(
                "{:>16}: {}",
                style("Package manager").bold(),
                style("not found").red()
            );
            tracing::debug!("{err}");
        }
    }

    Ok(())
}
