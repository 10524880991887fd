use clap::{Parser, Subcommand};

mod db;

#[derive(Debug, Parser)]
#[command(name = "shipments-app", about = "Shipments CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Db(command) => db::run(command).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_migrate_subcommand() {
        let cli = Cli::try_parse_from([
            "shipments-app",
            "db",
            "migrate",
            "--database-url",
            "postgres://localhost/shipments",
        ]);

        assert!(cli.is_ok(), "expected db migrate to parse, got {cli:?}");
    }
}
