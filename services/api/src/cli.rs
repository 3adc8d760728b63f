use crate::score::{run_score, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use gap_score::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Gap Score",
    about = "Serve or run the public-sector bid readiness score from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a saved request body and print the report
    Score(ScoreArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gap_score::scoring::{ComplianceModel, CompositeWeights};

    #[test]
    fn defaults_to_serve() {
        let cli = Cli::try_parse_from(["gap-score-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_score_arguments() {
        let cli = Cli::try_parse_from([
            "gap-score-api",
            "score",
            "--request",
            "request.json",
            "--html",
            "page.html",
            "--current-year",
            "2025",
            "--model",
            "ratio",
            "--json",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Score(args)) => {
                assert_eq!(args.request.to_str(), Some("request.json"));
                assert_eq!(args.current_year, Some(2025));
                assert_eq!(args.model, ComplianceModel::Ratio);
                assert_eq!(args.weights, CompositeWeights::three_factor());
                assert!(args.json);
            }
            other => panic!("expected score command, got {other:?}"),
        }
    }
}
