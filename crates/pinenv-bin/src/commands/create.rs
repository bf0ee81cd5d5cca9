use std::path::PathBuf;

use pinenv::{provision, Conda, ProvisionRequest};
use pinenv_config::{LocalInstallPolicy, ProvisionConfig};

#[derive(Debug, clap::Parser)]
pub struct Opt {
    /// Where to create the environment. Anything that exists there is deleted
    prefix: PathBuf,

    /// Conda package specifiers, e.g. `pandas=1.4.3`
    specs: Vec<String>,

    /// Channels to install from instead of the configured defaults
    #[arg(short = 'c', long = "channel")]
    channels: Vec<String>,

    /// Packages to install with pip afterwards, e.g. `requests==2.31.0`
    #[arg(long = "pip", value_name = "SPEC")]
    pip: Vec<String>,

    /// Local package directories to install with pip last
    #[arg(long = "path", value_name = "DIR")]
    paths: Vec<PathBuf>,

    /// Accept specifiers without an exact version
    #[arg(long)]
    no_check_versions: bool,

    /// Keep the environment when a local package directory fails to install
    #[arg(long)]
    lenient_local_installs: bool,
}

impl Opt {
    fn request(&self) -> ProvisionRequest {
        let request = ProvisionRequest::new(&self.prefix, self.specs.iter().map(String::as_str))
            .with_pip(self.pip.iter().map(String::as_str))
            .with_paths(&self.paths);
        if self.channels.is_empty() {
            request
        } else {
            request.with_channels(self.channels.iter().cloned())
        }
    }

    fn apply(&self, mut config: ProvisionConfig) -> ProvisionConfig {
        if self.no_check_versions {
            config.check_versions = Some(false);
        }
        if self.lenient_local_installs {
            config.pip.local_install_failure = Some(LocalInstallPolicy::Warn);
        }
        config
    }
}

pub fn create(config: ProvisionConfig, opt: Opt) -> miette::Result<()> {
    let config = opt.apply(config);
    let conda = Conda::locate(&config)?;
    tracing::debug!("using {}", conda.executable().display());

    provision(&config, &conda, &opt.request())?;

    eprintln!(
        "{} Created environment at {}",
        console::style(console::Emoji("✔", "")).green(),
        console::style(opt.prefix.display()).bold()
    );
    Ok(())
}
