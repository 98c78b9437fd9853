use std::error::Error as StdError;
use std::sync::Arc;

use super::http::BoxFuture;

/// Mailbox that turns relayed mail into SMS.
pub const RELAY_MAILBOX: &str = "send@send.smsc.ru";

/// A plain-text mail addressed to the gateway relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayMail {
    pub to: String,
    pub from: String,
    /// Charset of `body`, for the `Content-Type` header.
    pub charset: String,
    /// `login:password:id:time:translit,format,sender:phones:message`
    pub body: String,
}

/// Delivers relay mail, typically over SMTP.
///
/// The client only composes the mail; transport and SMTP credentials belong to the implementor.
pub trait MailRelay: Send + Sync {
    fn deliver<'a>(
        &'a self,
        mail: RelayMail,
    ) -> BoxFuture<'a, Result<(), Box<dyn StdError + Send + Sync>>>;
}

#[derive(Clone)]
pub(crate) struct MailSettings {
    pub(crate) from: String,
    pub(crate) relay: Arc<dyn MailRelay>,
}

impl std::fmt::Debug for MailSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailSettings")
            .field("from", &self.from)
            .finish_non_exhaustive()
    }
}
