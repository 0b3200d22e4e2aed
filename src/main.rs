use clap::{Parser, Subcommand};

mod cmd;

use cmd::compute::ComputeCommand;
use cmd::scenarios::ScenariosCommand;
use cmd::schema::SchemaCommand;
use cmd::validate::ValidateCommand;

#[derive(Parser, Debug)]
#[command(name = "fedtax", version, about = "Compute and review US federal income tax returns")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute a return and run the full review pipeline
    Compute(ComputeCommand),
    /// Run compliance and risk checks only
    Validate(ValidateCommand),
    /// Compare baseline, conservative and aggressive depreciation postures
    Scenarios(ScenariosCommand),
    /// Print the expected input format
    Schema(SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Compute(cmd) => cmd.exec(),
        Command::Validate(cmd) => cmd.exec(),
        Command::Scenarios(cmd) => cmd.exec(),
        Command::Schema(cmd) => cmd.exec(),
    }
}
