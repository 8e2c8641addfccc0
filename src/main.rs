//! `namegate`: generate names from Behind the Name without exceeding the key's
//! rate limits.

use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tracing_subscriber::EnvFilter;

use namegate::{
    BehindTheNameClient, CallerIdentity, Gender, NameCount, NameRequest, NamegateError,
    NamegateOptions, Outcome, RequestOrchestrator, SqliteEventStore, cli, config, report,
    usage_name,
};

type Orchestrator = RequestOrchestrator<SqliteEventStore, BehindTheNameClient>;

#[derive(Parser, Debug)]
#[command(
    name = "namegate",
    about = "Behind the Name random name generator with local rate limiting",
    after_help = "\
Examples:
  namegate                                  Interactive mode (default)
  namegate --once                           Generate once with defaults (u ita, number=2, no surname)
  namegate --once f jap                     Feminine Japanese
  namegate --once u ita surname             Unisex Italian with surname
  namegate --once --number 3 m eng surname  Masculine English, 3 names, with surname
  namegate --key YOUR_API_KEY --once        Provide the API key on the command line

If --key is not given, API_KEY is read from the environment or a .env file."
)]
struct Args {
    /// Run once with the given options and exit.
    #[arg(long)]
    once: bool,

    /// API key (overrides API_KEY from the environment / .env).
    #[arg(long)]
    key: Option<String>,

    /// Number of given names (1-6).
    #[arg(long, default_value_t = 2)]
    number: i64,

    /// SQLite file holding the call ledger (overrides NAMEGATE_DB).
    #[arg(long)]
    db: Option<PathBuf>,

    /// For --once: [gender] [usage] [surname].
    args: Vec<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<ExitCode, NamegateError> {
    let api_key = config::resolve_api_key(args.key.clone())?;

    let mut options = NamegateOptions::from_env();
    if let Some(db) = args.db.clone() {
        options.database_path = db;
    }

    // Validate before touching the database.
    let once_request = if args.once {
        Some(cli::parse_once_args(args.number, &args.args)?)
    } else {
        None
    };

    let store = SqliteEventStore::open(&options.database_path).await?;
    let client = BehindTheNameClient::new(&api_key, &options.endpoint, options.dispatch_timeout)?;
    let orchestrator = RequestOrchestrator::new(store, client, options.orchestrator_options());

    let caller = CallerIdentity::from_secret(&api_key);

    let result = match once_request {
        Some(request) => run_once(&orchestrator, &caller, &request).await,
        None => run_interactive(&orchestrator, &caller).await,
    };

    // Release the database on every path.
    let closed = orchestrator.close().await;
    let code = result?;
    closed?;

    Ok(code)
}

async fn run_once(
    orchestrator: &Orchestrator,
    caller: &CallerIdentity,
    request: &NameRequest,
) -> Result<ExitCode, NamegateError> {
    if generate(orchestrator, caller, request).await? {
        println!("Generated successfully! Goodbye!");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("Generation failed. Goodbye!");
        Ok(ExitCode::FAILURE)
    }
}

/// Returns whether names were produced.
async fn generate(
    orchestrator: &Orchestrator,
    caller: &CallerIdentity,
    request: &NameRequest,
) -> Result<bool, NamegateError> {
    match orchestrator.attempt(caller, request).await {
        Ok(Outcome::Success(record)) => {
            println!("\n{}", report::render_report(&record));
            Ok(true)
        }
        Ok(Outcome::Denied(decision)) => {
            println!(
                "\nRate limit reached. Please wait ≈ {}",
                report::format_wait(decision.retry_after())
            );
            Ok(false)
        }
        Ok(Outcome::ExternalFailure(e)) => {
            println!("API request failed: {e}");
            Ok(false)
        }
        Err(NamegateError::UnrecordedCall { source, record }) => {
            // The names are real; show them before failing.
            println!("\n{}", report::render_report(&record));
            Err(NamegateError::UnrecordedCall { source, record })
        }
        Err(e) => Err(e),
    }
}

async fn run_interactive(
    orchestrator: &Orchestrator,
    caller: &CallerIdentity,
) -> Result<ExitCode, NamegateError> {
    println!("BehindTheName Random Name Generator");
    println!("API key hash: {}...", caller.short());
    println!("Press Enter to generate • type 'exit', 'q' or press Ctrl+C to quit\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let Some(action) = prompt(&mut lines, "Generate name(s)? [Enter = yes]: ").await else {
            break;
        };

        if cli::is_exit_command(&action) {
            println!("\nGoodbye!");
            break;
        }
        if !cli::is_generate_command(&action) {
            continue;
        }

        let Some(request) = prompt_request(&mut lines).await else {
            break;
        };

        generate(orchestrator, caller, &request).await?;
    }

    Ok(ExitCode::SUCCESS)
}

async fn prompt_request(lines: &mut Lines<BufReader<Stdin>>) -> Option<NameRequest> {
    let number = loop {
        let answer = prompt(lines, "Number of given names (1–6) [default 2]: ").await?;
        if answer.is_empty() {
            break NameCount::default();
        }

        match answer.parse::<i64>() {
            Ok(n) => match NameCount::try_from(n) {
                Ok(number) => break number,
                Err(_) => println!("Please enter a number between 1 and 6."),
            },
            Err(_) => println!("Invalid input."),
        }
    };

    println!("\nGender options:");
    for gender in Gender::ALL {
        println!("  {:2} → {}", gender.code(), gender.description());
    }
    let answer = prompt(lines, "Gender (f/m/u) [default u]: ").await?;
    let gender: Gender = answer.parse().unwrap_or_default();

    println!("\nEnter usage code (or leave empty for any)");
    let answer = prompt(lines, "Usage code [default 'ita']: ").await?;
    let usage = if answer.is_empty() {
        namegate::DEFAULT_USAGE.to_string()
    } else {
        answer
    };

    match usage_name(&usage) {
        Some(name) => println!("→ {} = {}", usage.to_uppercase(), name),
        None => println!("→ Using custom/unknown code: {usage}"),
    }

    let answer = prompt(lines, "\nInclude random surname? (y/n) [default n]: ").await?;
    let random_surname = matches!(answer.as_str(), "y" | "yes");

    Some(NameRequest {
        gender,
        usage: Some(usage),
        number,
        random_surname,
    })
}

/// Print `message` and read one trimmed, lower-cased line.
///
/// `None` on end of input or Ctrl+C.
async fn prompt(lines: &mut Lines<BufReader<Stdin>>, message: &str) -> Option<String> {
    let mut stdout = tokio::io::stdout();
    let _ = stdout.write_all(message.as_bytes()).await;
    let _ = stdout.flush().await;

    tokio::select! {
        line = lines.next_line() => match line {
            Ok(Some(line)) => Some(line.trim().to_lowercase()),
            _ => None,
        },
        _ = tokio::signal::ctrl_c() => {
            println!("\n\nInterrupted by user (Ctrl+C). Goodbye!");
            None
        }
    }
}
