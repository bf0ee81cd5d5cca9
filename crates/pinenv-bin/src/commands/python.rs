use std::path::PathBuf;

use pinenv::{EnvironmentPrefix, PrefixLayout};

#[derive(Debug, clap::Parser)]
pub struct Opt {
    /// The environment to inspect
    prefix: PathBuf,
}

pub fn python(opt: Opt) -> miette::Result<()> {
    let environment = EnvironmentPrefix::new(opt.prefix, PrefixLayout::current());
    if !environment.has_python() {
        miette::bail!(
            help = "create the environment first with `pinenv create`",
            "{} does not contain a python interpreter",
            environment.path().display()
        );
    }

    println!("{}", environment.python_executable().display());
    Ok(())
}
