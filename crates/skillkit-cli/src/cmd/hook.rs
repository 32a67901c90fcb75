use anyhow::Context;
use clap::Subcommand;
use skillkit_core::{hook, io};
use std::path::Path;

#[derive(Subcommand)]
pub enum HookSubcommand {
    /// Install a pre-commit hook that runs `skillkit validate`
    Install {
        /// Overwrite an existing hook not written by skillkit
        #[arg(long)]
        force: bool,
    },

    /// Print the hook script without installing it
    Print,
}

pub fn run(root: &Path, subcmd: HookSubcommand) -> anyhow::Result<()> {
    match subcmd {
        HookSubcommand::Install { force } => {
            let path = hook::install_pre_commit(root, force).context("failed to install pre-commit hook")?;
            println!("Installed {}", io::relative_display(root, &path));
            Ok(())
        }
        HookSubcommand::Print => {
            print!("{}", hook::pre_commit_script());
            Ok(())
        }
    }
}
