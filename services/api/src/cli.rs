use crate::commands::{
    run_journal_classify, run_screening_score, JournalClassifyArgs, ScreeningScoreArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use postpartum_care::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Postpartum Care",
    about = "Run the postpartum screening and journaling service, or use its scoring offline",
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
    /// Work with the EPDS questionnaire
    Screening {
        #[command(subcommand)]
        command: ScreeningCommand,
    },
    /// Work with journal sentiment analysis
    Journal {
        #[command(subcommand)]
        command: JournalCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ScreeningCommand {
    /// Score ten answers and print the triage outcome
    Score(ScreeningScoreArgs),
}

#[derive(Subcommand, Debug)]
enum JournalCommand {
    /// Classify a piece of text without storing it
    Classify(JournalClassifyArgs),
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
        Command::Screening {
            command: ScreeningCommand::Score(args),
        } => run_screening_score(args),
        Command::Journal {
            command: JournalCommand::Classify(args),
        } => run_journal_classify(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use postpartum_care::journal::ClassifierStrategy;

    #[test]
    fn defaults_to_serve() {
        let cli = Cli::try_parse_from(["postpartum-care-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_offline_subcommands() {
        let cli = Cli::try_parse_from([
            "postpartum-care-api",
            "screening",
            "score",
            "--answers",
            "0,1,2,3,0,1,2,3,0,0",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Screening {
                command: ScreeningCommand::Score(args),
            }) => assert_eq!(args.answers, vec![0, 1, 2, 3, 0, 1, 2, 3, 0, 0]),
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::try_parse_from([
            "postpartum-care-api",
            "journal",
            "classify",
            "--text",
            "I feel happy and great",
            "--strategy",
            "Keyword",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Journal {
                command: JournalCommand::Classify(args),
            }) => assert_eq!(args.strategy, Some(ClassifierStrategy::Keyword)),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_non_numeric_answers() {
        let result = Cli::try_parse_from([
            "postpartum-care-api",
            "screening",
            "score",
            "--answers",
            "0,1,two",
        ]);
        assert!(result.is_err());
    }
}
