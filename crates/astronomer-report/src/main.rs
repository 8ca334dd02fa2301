use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::{Level, info};

use astronomer_report::{
    Context, DEFAULT_ENDPOINT, ReportSigner, ReportTransmitter, cache_entry_path,
};

#[derive(Parser)]
struct Args {
    #[clap(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: Level,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the cache file path used for a request URL.
    CacheKey {
        #[clap(flatten)]
        repository: RepositoryArgs,
        url: String,
    },
    /// Sign a JSON trust report and send it to the astronomer server.
    Submit {
        #[clap(flatten)]
        repository: RepositoryArgs,
        report: PathBuf,
        #[clap(long, env = "ASTRONOMER_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
        endpoint: String,
    },
    /// Print the public half of the embedded signing key.
    PublicKey,
}

#[derive(ClapArgs)]
struct RepositoryArgs {
    /// Repository as owner/name.
    repository: String,
    #[clap(long, env = "GITHUB_TOKEN", hide_env_values = true, default_value = "")]
    github_token: String,
    #[clap(long, env = "ASTRONOMER_CACHE_DIR", default_value = "./data")]
    cache_dir: String,
}

impl RepositoryArgs {
    fn into_context(self) -> Result<Context> {
        Context::from_repository(&self.repository, self.github_token, self.cache_dir)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting logging subscriber")?;

    match args.command {
        Command::CacheKey { repository, url } => {
            let ctx = repository.into_context()?;
            println!("{}", cache_entry_path(&ctx, &url));
        }
        Command::Submit { repository, report, endpoint } => {
            let ctx = repository.into_context()?;
            let data = tokio::fs::read(&report)
                .await
                .with_context(|| format!("reading report {}", report.display()))?;
            let report: serde_json::Value =
                serde_json::from_slice(&data).context("parsing report JSON")?;

            info!(owner = %ctx.repo_owner, name = %ctx.repo_name, %endpoint, "submitting trust report");
            ReportTransmitter::with_endpoint(ReportSigner::default(), endpoint)?
                .submit(&ctx, &report)
                .await?;
            println!("Report for {}/{} accepted", ctx.repo_owner, ctx.repo_name);
        }
        Command::PublicKey => {
            let pem = ReportSigner::default()
                .public_key_pem()
                .context("loading embedded signing key")?;
            print!("{pem}");
        }
    }

    Ok(())
}
