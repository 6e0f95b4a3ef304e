use std::env;

use dotenvy::dotenv;
use ethers::types::Address;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tournament_gateway::{ContractGateway, GatewayConfig, NewTournament, NodeWallet};

/// Anvil accounts #2 and #3.
const WINNERS: [&str; 2] = [
    "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC",
    "0x90F79bf6EB2c4f870365E785982E1f101E93b906",
];

/// Runs the tournament lifecycle against a live node.
///
/// Usage: `scenario_runner [all|read|lifecycle] [donation]`
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().collect();
    let scenario = args.get(1).map(|s| s.as_str()).unwrap_or("all");
    let donation = args.get(2).map(|s| s.as_str()).unwrap_or("12");

    let config = GatewayConfig::from_env()?;
    info!(
        network = %config.network.name,
        chain_id = config.network.chain_id,
        contract = ?config.contract_address,
        "scenario runner starting"
    );

    let gateway = ContractGateway::from_config(&config)?;
    let account = gateway.connect_wallet().await?;
    gateway.bind_contract().await?;

    match scenario {
        "read" => read_state(&gateway, account).await?,
        "lifecycle" => lifecycle(&gateway, account, donation).await?,
        "all" => {
            read_state(&gateway, account).await?;
            lifecycle(&gateway, account, donation).await?;
        }
        other => {
            error!(scenario = %other, "unknown scenario, expected one of: all, read, lifecycle");
            std::process::exit(2);
        }
    }

    info!("scenario runner finished");
    Ok(())
}

async fn read_state(
    gateway: &ContractGateway<NodeWallet>,
    account: Address,
) -> Result<(), Box<dyn std::error::Error>> {
    let user = gateway.get_user(account).await?;
    info!(
        registered = !user.is_unregistered(),
        user_id = %user.id,
        email = %user.email,
        "caller record"
    );
    info!(
        tournaments = %gateway.tournament_count().await?,
        users = %gateway.user_count().await?,
        balance = %gateway.contract_balance().await?,
        symbol = %gateway.currency().symbol,
        "contract state"
    );
    Ok(())
}

async fn lifecycle(
    gateway: &ContractGateway<NodeWallet>,
    account: Address,
    donation: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let winners = WINNERS
        .iter()
        .map(|raw| raw.parse::<Address>())
        .collect::<Result<Vec<_>, _>>()?;

    gateway.assign_organizer_role(account).await?;

    let tournament = gateway.create_tournament(NewTournament::named("Cup")).await?;
    info!(tournament_id = %tournament.id, status = %tournament.status, "tournament created");

    for winner in &winners {
        gateway.join_tournament(tournament.id, *winner).await?;
    }
    gateway.start_tournament(tournament.id).await?;

    gateway.donate_to_tournament(tournament.id, donation).await?;
    info!(
        balance = %gateway.get_tournament_balance(tournament.id).await?,
        "balance after donation"
    );

    gateway.complete_tournament(tournament.id, &winners).await?;
    let paid = gateway.send_payments_to_winners(tournament.id).await?;
    info!(
        tx = ?paid.transaction_hash,
        events = paid.events.len(),
        balance = %gateway.get_tournament_balance(tournament.id).await?,
        "payments sent"
    );
    Ok(())
}
