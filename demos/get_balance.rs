use smsc::{BalanceOutcome, SmscClientBuilder};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = SmscClientBuilder::from_env()?.build_blocking()?;

    match client.get_balance()? {
        BalanceOutcome::Balance(amount) => println!("balance: {amount}"),
        BalanceOutcome::Rejected(err) => println!("rejected: {}", err.code),
    }

    Ok(())
}
