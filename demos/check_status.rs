use std::io;

use smsc::{CheckStatus, MessageId, RawPhoneNumber, SmscClientBuilder, StatusDetail};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let ids_raw = std::env::var("SMSC_MESSAGE_IDS").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SMSC_MESSAGE_IDS environment variable is required (comma-separated ids)",
        )
    })?;
    let phones_raw = std::env::var("SMSC_PHONES").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SMSC_PHONES environment variable is required (one phone per id)",
        )
    })?;

    let ids = ids_raw
        .split(',')
        .map(MessageId::new)
        .collect::<Result<Vec<_>, _>>()?;
    let phones = phones_raw
        .split(',')
        .map(RawPhoneNumber::new)
        .collect::<Result<Vec<_>, _>>()?;
    let request = CheckStatus::new(ids, phones)?.with_detail(StatusDetail::Extended);

    let client = SmscClientBuilder::from_env()?.build_blocking()?;
    let outcome = client.check_status(request)?;
    println!("{outcome:?}");

    Ok(())
}
