use std::path::PathBuf;

use itertools::Itertools;
use miette::IntoDiagnostic;
use pinenv::{list_packages, Conda, InstalledPackage};
use pinenv_config::ProvisionConfig;

#[derive(Debug, clap::Parser)]
pub struct Opt {
    /// The environment to inspect
    prefix: PathBuf,

    /// Print the packages as JSON
    #[arg(long)]
    json: bool,
}

pub fn list(config: &ProvisionConfig, opt: Opt) -> miette::Result<()> {
    let conda = Conda::locate(config)?;
    let packages = list_packages(&conda, &opt.prefix)?;

    if opt.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&packages).into_diagnostic()?
        );
    } else {
        print!("{}", format_table(&packages));
    }
    Ok(())
}

/// Renders packages as aligned columns with a header line.
fn format_table(packages: &[InstalledPackage]) -> String {
    const HEADER: [&str; 4] = ["Name", "Version", "Build", "Channel"];

    let rows = packages
        .iter()
        .map(|p| {
            [
                p.name.as_str(),
                p.version.as_str(),
                p.build_string.as_str(),
                p.channel.as_str(),
            ]
        })
        .collect::<Vec<_>>();

    let mut widths = HEADER.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(console::measure_text_width(cell));
        }
    }

    let format_row = |row: [&str; 4]| {
        row.iter()
            .zip(widths)
            .map(|(cell, width)| console::pad_str(cell, width, console::Alignment::Left, None))
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut table = format!("{}\n", console::style(format_row(HEADER)).bold());
    for row in rows {
        table.push_str(&format_row(row));
        table.push('\n');
    }
    table
}
