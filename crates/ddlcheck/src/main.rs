//! ddlcheck CLI
//!
//! Reads SQL from stdin, executes it on the selected backend, and prints
//! schema reports on stdout for diffing against a run on the other backend.

use clap::{Parser, ValueEnum};
use tokio::io::BufReader;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use ddlcheck::executor::engine::EngineExecutor;
use ddlcheck::executor::mysql::MysqlExecutor;
use ddlcheck::run;

/// Differential-testing harness for DDL statements.
#[derive(Parser)]
#[command(name = "ddlcheck")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Execution backend.
    #[arg(long, value_enum, default_value = "engine")]
    backend: Backend,

    /// MySQL host.
    #[arg(long, default_value = "localhost")]
    host: String,

    /// MySQL port.
    #[arg(short = 'P', long, default_value_t = 3306)]
    port: u16,

    /// MySQL user.
    #[arg(short = 'u', long, default_value = "root")]
    user: String,

    /// MySQL password.
    #[arg(short = 'p', long, default_value = "")]
    password: String,

    /// Server character set for the engine backend. Set it to the MySQL
    /// server's charset when comparing runs.
    #[arg(long, default_value = "")]
    charset: String,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Backend {
    /// In-memory schema engine.
    Engine,
    /// Live MySQL server.
    Mysql,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout is the diffable report stream.
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let reader = BufReader::with_capacity(16 * 1024, tokio::io::stdin());
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.backend {
        Backend::Engine => {
            let mut backend = EngineExecutor::new(cli.charset);
            run(reader, &mut backend, &mut out).await?;
        }
        Backend::Mysql => {
            let mut backend =
                MysqlExecutor::connect(&cli.host, cli.port, &cli.user, &cli.password).await?;
            run(reader, &mut backend, &mut out).await?;
        }
    }

    Ok(())
}
