use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for standee")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: fmt, clippy, tests, doc
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates
    Clippy,
    /// Run all tests
    Test,
    /// Build rustdoc for the workspace
    Doc,
    /// Build the entire workspace
    Build,
    /// Run the CLI's built-in placement demo
    Demo,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            for task in [Task::Fmt, Task::Clippy, Task::Test, Task::Doc] {
                task.run()?;
            }
        }
        Commands::Fmt => Task::Fmt.run()?,
        Commands::Clippy => Task::Clippy.run()?,
        Commands::Test => Task::Test.run()?,
        Commands::Doc => Task::Doc.run()?,
        Commands::Build => Task::Build.run()?,
        Commands::Demo => Task::Demo.run()?,
    }

    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum Task {
    Fmt,
    Clippy,
    Test,
    Doc,
    Build,
    Demo,
}

impl Task {
    fn args(self) -> &'static [&'static str] {
        match self {
            Task::Fmt => &["fmt", "--all", "--", "--check"],
            Task::Clippy => &[
                "clippy",
                "--workspace",
                "--all-targets",
                "--",
                "-D",
                "warnings",
            ],
            Task::Test => &["test", "--workspace"],
            Task::Doc => &["doc", "--workspace", "--no-deps"],
            Task::Build => &["build", "--workspace"],
            Task::Demo => &["run", "-p", "standee-cli", "--", "demo", "--render"],
        }
    }

    fn run(self) -> Result<()> {
        let args = self.args();
        println!("==> Running cargo {}", args.join(" "));
        let status = Command::new("cargo").args(args).status()?;
        if !status.success() {
            anyhow::bail!("cargo {} failed", args[0]);
        }
        Ok(())
    }
}
