use clap::{Parser, Subcommand};

pub mod commands;

#[derive(Parser)]
#[command(name = "loader-controller")]
#[command(about = "Press-side loader controller: verifies work order and raw material before energizing the loader")]
#[command(long_about = "Prompts the operator to scan a work order and a raw material serial number, \
                       checks both against the manufacturing API and energizes the loader relay only when \
                       they match this press. Run without a subcommand to start the controller.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the controller (same as no subcommand)
    Run,
    /// Print the outlet IR beam state every 100 ms until interrupted
    SensorTest,
    /// Show the reboot notice, release GPIO and reboot the host
    Reboot,
    /// Print the effective configuration as TOML
    PrintConfig,
    /// Query the manufacturing API once and print the decoded answer
    Lookup {
        #[command(subcommand)]
        target: LookupTarget,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum LookupTarget {
    /// Press and raw material for a work order
    WorkOrder { id: String },
    /// Item number for a raw material serial (without the `S` qualifier)
    Serial { id: String },
    /// Work order currently loaded on the press, per the monitor endpoint
    Monitor { id: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_runs_controller() {
        let cli = Cli::try_parse_from(["loader-controller"]).unwrap();
        assert_eq!(cli.command, None);
    }

    #[test]
    fn test_lookup_parses_target_and_id() {
        let cli = Cli::try_parse_from(["loader-controller", "lookup", "work-order", "9934386"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Lookup {
                target: LookupTarget::WorkOrder {
                    id: "9934386".to_string()
                }
            })
        );
    }

    #[test]
    fn test_run_takes_no_flags() {
        assert!(Cli::try_parse_from(["loader-controller", "run", "--press", "140"]).is_err());
    }
}
