use std::io;

use smsc::{CheckCost, CheckCostOptions, MessageText, RawPhoneNumber, SmscClientBuilder};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let phone_raw = std::env::var("SMSC_PHONE").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SMSC_PHONE environment variable is required",
        )
    })?;
    let message = std::env::var("SMSC_MESSAGE")
        .unwrap_or_else(|_| "Hello from the smsc example.".to_owned());

    let client = SmscClientBuilder::from_env()?.build()?;
    let request = CheckCost::new(
        vec![RawPhoneNumber::new(phone_raw)?],
        MessageText::new(message)?,
        CheckCostOptions::default(),
    )?;

    let outcome = client.check_cost(request).await?;
    println!("{outcome:?}");

    Ok(())
}
