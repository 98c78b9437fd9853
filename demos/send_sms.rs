use std::io;

use smsc::domain::Command;
use smsc::{
    MessageText, PhoneNumber, SendOptions, SendOutcome, SendSms, SenderId, SmscClientBuilder,
    country,
};

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

    let client = SmscClientBuilder::from_env()?
        .trace_sink(|message: &str| eprintln!("trace: {message}"))
        .build()?;

    let options = SendOptions {
        sender: std::env::var("SMSC_SENDER").ok().map(SenderId::new).transpose()?,
        ..Default::default()
    };
    // Numbers without a country prefix are taken as Russian.
    let phone = PhoneNumber::parse(Some(country::Id::RU), phone_raw)?;
    println!("sending to {phone}");
    let request = SendSms::to_many(
        vec![phone.into()],
        MessageText::new(message)?,
        options,
    )?;

    match client.send_sms(request).await? {
        SendOutcome::Sent(receipt) => println!(
            "id: {}, sms: {}, cost: {:?}, balance: {:?}",
            receipt.id, receipt.sms_count, receipt.cost, receipt.balance
        ),
        SendOutcome::Rejected(err) => println!(
            "rejected: {} ({:?})",
            err.code,
            err.code.known(Command::Send)
        ),
    }

    Ok(())
}
