use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

use trusted_issuers_registry::registry::dto::IssuersResponse;

#[derive(Parser)]
#[command(name = "registry-cli")]
#[command(about = "Management CLI for the trusted issuers registry", long_about = None)]
struct Cli {
    /// Registry root URL, including the configured base path
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check registry status
    Status,
    /// List all registered DIDs, following every page
    List {
        #[arg(long, default_value_t = 100)]
        page_size: u32,
    },
    /// Show one issuer
    Get {
        did: String,
        /// Show the TIR view (hashed attributes) instead of the TIL record
        #[arg(long)]
        registry: bool,
    },
    /// Register the issuer described in a JSON file
    Create { file: PathBuf },
    /// Remove an issuer
    Delete { did: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Status => {
            let res = client.get(format!("{base}/health")).send().await?;
            print_response(res).await?;
        }
        Commands::List { page_size } => {
            let mut last_issuer: Option<String> = None;
            loop {
                let mut request = client
                    .get(format!("{base}/v4/issuers"))
                    .query(&[("pageSize", page_size.to_string())]);
                if let Some(anchor) = &last_issuer {
                    request = request.query(&[("lastIssuer", anchor)]);
                }

                let res = request.send().await?;
                if !res.status().is_success() {
                    return print_response(res).await;
                }
                let page: IssuersResponse = res.json().await?;
                for item in &page.items {
                    println!("{}", item.did);
                }

                match (page.links.next, page.items.last()) {
                    (Some(_), Some(last)) => last_issuer = Some(last.did.clone()),
                    _ => {
                        eprintln!("{} issuers", page.total);
                        break;
                    }
                }
            }
        }
        Commands::Get { did, registry } => {
            let path = if registry { "v4/issuers" } else { "issuer" };
            let res = client.get(format!("{base}/{path}/{did}")).send().await?;
            print_response(res).await?;
        }
        Commands::Create { file } => {
            let payload: Value = serde_json::from_str(&std::fs::read_to_string(&file)?)?;
            let res = client.post(format!("{base}/issuer")).json(&payload).send().await?;
            let location = res
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(String::from);
            match location {
                Some(location) if res.status().is_success() => println!("Created {location}"),
                _ => print_response(res).await?,
            }
        }
        Commands::Delete { did } => {
            let res = client.delete(format!("{base}/issuer/{did}")).send().await?;
            if res.status().is_success() {
                println!("Deleted {did}");
            } else {
                print_response(res).await?;
            }
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: registry returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
