//! Clap derive structures for the `ipm` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// ipm -- drive the IPM provider's resources from JSON documents
#[derive(Debug, Parser)]
#[command(
    name = "ipm",
    version,
    about = "Run IPM provider operations from the command line",
    long_about = "Signs in to the IPM server named by the provider block and runs one\n\
        resource or data source operation. Plans, prior states and queries are\n\
        JSON documents in the schema shape; results are printed as JSON.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Provider block file (TOML)
    #[arg(long, env = "IPM_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Accept any server certificate (overrides the provider block)
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the provider, resource and data source schemas
    Schema,

    /// Inspect the provider block or store the password
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Run one operation on a resource type
    Resource(ResourceArgs),

    /// Read a data source
    Data(DataArgs),
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective provider block (without the password)
    Show,

    /// Read a password from stdin and store it in the system keyring
    SetPassword,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Operation {
    Validate,
    Create,
    Read,
    Update,
    Delete,
    Import,
}

#[derive(Debug, Args)]
pub struct ResourceArgs {
    /// Resource type, e.g. ipm_network_connection
    pub type_name: String,

    pub operation: Operation,

    /// Planned configuration (JSON file, `-` for stdin)
    #[arg(long)]
    pub plan: Option<PathBuf>,

    /// Prior state (JSON file, `-` for stdin)
    #[arg(long)]
    pub prior: Option<PathBuf>,

    /// Import id
    #[arg(long)]
    pub id: Option<String>,
}

#[derive(Debug, Args)]
pub struct DataArgs {
    /// Data source type, e.g. ipm_found_networks
    pub type_name: String,

    /// Query arguments (JSON file, `-` for stdin); empty object when omitted
    #[arg(long)]
    pub query: Option<PathBuf>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_resource_update() {
        let cli = Cli::try_parse_from([
            "ipm",
            "-vv",
            "resource",
            "ipm_network_connection",
            "update",
            "--plan",
            "plan.json",
            "--prior",
            "state.json",
        ])
        .unwrap();
        assert_eq!(cli.global.verbose, 2);
        let Command::Resource(args) = cli.command else {
            panic!("expected resource command");
        };
        assert_eq!(args.type_name, "ipm_network_connection");
        assert_eq!(args.operation, Operation::Update);
        assert_eq!(args.plan, Some(PathBuf::from("plan.json")));
    }

    #[test]
    fn parses_import_id() {
        let cli = Cli::try_parse_from([
            "ipm",
            "resource",
            "ipm_leaf_module",
            "import",
            "--id",
            "nw-1/lm-7",
        ])
        .unwrap();
        let Command::Resource(args) = cli.command else {
            panic!("expected resource command");
        };
        assert_eq!(args.id.as_deref(), Some("nw-1/lm-7"));
    }

    #[test]
    fn rejects_unknown_operation() {
        assert!(Cli::try_parse_from(["ipm", "resource", "ipm_nc_ac", "patch"]).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
