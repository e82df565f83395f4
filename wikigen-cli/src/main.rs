use wikigen_cli::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    // stdout carries command output, logs go to stderr
    let subscriber = get_subscriber("wikigen", "warn", std::io::stderr);
    init_subscriber(subscriber)?;

    wikigen_cli::run().await
}
