use clap::{Parser, Subcommand};
use futures_util::StreamExt;
use gateway_sdk::{GatewayClient, SdkError};
use serde::Serialize;
use tokio_tungstenite::{connect_async, tungstenite::Message};

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Command line client for the XRP Ledger wallet gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create and fund a test network wallet
    CreateTestWallet,
    /// Generate an unfunded main network wallet
    CreateRealWallet,
    /// Send XRP from a seed-held test wallet
    Send {
        #[arg(long)]
        secret: String,
        #[arg(long)]
        to: String,
        /// Amount in XRP
        #[arg(long)]
        amount: String,
    },
    /// List recent transactions for an account
    Transactions { account: String },
    /// Call the fund-wallet endpoint
    Fund { address: String },
    /// Show the hardware wallet balance
    DeviceBalance,
    /// Send XRP from the hardware wallet
    DeviceSend {
        #[arg(long)]
        to: String,
        /// Amount in XRP
        #[arg(long)]
        amount: String,
    },
    /// Print gateway events as they arrive
    Watch,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = GatewayClient::new(&cli.url);

    match cli.command {
        Commands::CreateTestWallet => print_result(client.create_test_wallet().await)?,
        Commands::CreateRealWallet => print_result(client.create_real_wallet().await)?,
        Commands::Send { secret, to, amount } => {
            print_result(client.send_xrp(&secret, &to, &amount).await)?
        }
        Commands::Transactions { account } => {
            print_result(client.fetch_transactions(&account).await)?
        }
        Commands::Fund { address } => print_result(client.fund_wallet(&address).await)?,
        Commands::DeviceBalance => print_result(client.device_balance().await)?,
        Commands::DeviceSend { to, amount } => {
            print_result(client.send_xrp_from_device(&to, &amount).await)?
        }
        Commands::Watch => watch(&client.events_url()).await?,
    }

    Ok(())
}

fn print_result<T: Serialize>(result: Result<T, SdkError>) -> Result<(), Box<dyn std::error::Error>> {
    match result {
        Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        Err(SdkError::Status { status, message }) => {
            eprintln!("Error: gateway returned status {}", status);
            eprintln!("Response: {}", message);
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

async fn watch(url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let (mut stream, _) = connect_async(url).await?;
    eprintln!("Connected to {}", url);

    while let Some(message) = stream.next().await {
        match message? {
            Message::Text(text) => match serde_json::from_str::<serde_json::Value>(text.as_str()) {
                Ok(event) => println!("{}", serde_json::to_string_pretty(&event)?),
                Err(_) => println!("{}", text.as_str()),
            },
            Message::Close(_) => break,
            _ => {}
        }
    }

    eprintln!("Connection closed");
    Ok(())
}
