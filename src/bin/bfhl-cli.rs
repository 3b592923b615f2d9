use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "bfhl-cli")]
#[command(about = "Command line client for the BFHL operations API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// First N fibonacci terms
    Fibonacci { n: u64 },
    /// Keep only the primes
    Prime { numbers: Vec<u64> },
    /// Least common multiple
    Lcm { numbers: Vec<u64> },
    /// Highest common factor
    Hcf { numbers: Vec<u64> },
    /// Ask the AI delegate for a one-word answer
    Ai { question: Vec<String> },
    /// Check service health
    Health,
}

impl Commands {
    fn body(&self) -> Option<Value> {
        match self {
            Commands::Fibonacci { n } => Some(json!({ "fibonacci": n })),
            Commands::Prime { numbers } => Some(json!({ "prime": numbers })),
            Commands::Lcm { numbers } => Some(json!({ "lcm": numbers })),
            Commands::Hcf { numbers } => Some(json!({ "hcf": numbers })),
            Commands::Ai { question } => Some(json!({ "AI": question.join(" ") })),
            Commands::Health => None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command.body() {
        Some(body) => client.post(format!("{}/api/bfhl", base)).json(&body).send().await?,
        None => client.get(format!("{}/api/health", base)).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: API returned status {}", status);
    }

    // wide integers print verbatim when the body is not valid JSON for Value
    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
