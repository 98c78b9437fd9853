//! Typed Rust client for the SMSC.RU plaintext HTTP API.
//!
//! The crate has three layers: a domain layer of strong types, a transport layer for the
//! gateway's wire-format quirks, and a small client layer orchestrating requests, mirror
//! failover and the trace side channel.
//!
//! Gateway rejections are values, not errors: every operation returns a tagged outcome such as
//! [`SendOutcome`] whose `Rejected` variant carries the gateway's [`ErrorCode`].
//!
//! ```rust,no_run
//! use smsc::{Credentials, MessageText, RawPhoneNumber, SendOptions, SendOutcome, SendSms, SmscClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), smsc::SmscError> {
//!     let client = SmscClient::builder(Credentials::new("login", "password")?)
//!         .trace_sink(|message: &str| eprintln!("{message}"))
//!         .build()?;
//!     let phone = RawPhoneNumber::new("79999999999")?;
//!     let msg = MessageText::new("hello")?;
//!     let request = SendSms::to_many(vec![phone], msg, SendOptions::default())?;
//!     if let SendOutcome::Sent(receipt) = client.send_sms(request).await? {
//!         println!("sent {} ({} sms)", receipt.id, receipt.sms_count);
//!     }
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{
    BlockingSmscClient, BoxFuture, Credentials, MailRelay, RELAY_MAILBOX, RelayMail, Scheme,
    SmscClient, SmscClientBuilder, SmscError, TraceSink,
};
pub use domain::{
    BalanceOutcome, BatchStatus, CheckCost, CheckCostOptions, CheckStatus, CostOutcome, CostQuote,
    DeliveryStatus, DeliveryTime, ErrorCode, GatewayError, KnownDeliveryStatus, KnownErrorCode,
    MessageFormat, MessageId, MessageText, Money, PhoneNumber, RawPhoneNumber, SendId,
    SendOptions, SendOutcome, SendReceipt, SendSms, SenderId, StatusDetail, StatusOutcome,
    StatusReport, Translit, ValidationError, country,
};
pub use transport::compose_mail_body;
