use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "agent-cli")]
#[command(about = "Management CLI for a running PC Agent", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:9876")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the agent is reachable
    Ping,
    /// Ask the agent to shut its host down
    Shutdown,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Ping => client.get(format!("{base}/ping")).send().await?,
        Commands::Shutdown => client.post(format!("{base}/shutdown")).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        eprintln!("Error: agent returned status {}", status);
        eprintln!("Response: {}", text);
        std::process::exit(1);
    }

    println!("{}", text);
    Ok(())
}
