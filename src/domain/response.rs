use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::value::{DeliveryStatus, ErrorCode, Money};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// An error reported by the gateway in place of a result.
pub struct GatewayError {
    /// Message id the error refers to, when the reply or request carries one.
    pub id: Option<String>,
    pub code: ErrorCode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendReceipt {
    pub id: String,
    pub sms_count: u32,
    pub cost: Option<Money>,
    pub balance: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "data", rename_all = "snake_case")]
pub enum SendOutcome {
    Sent(SendReceipt),
    Rejected(GatewayError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CostQuote {
    pub cost: Option<Money>,
    pub sms_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "data", rename_all = "snake_case")]
pub enum CostOutcome {
    Quoted(CostQuote),
    Rejected(GatewayError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Status of a single message.
///
/// Fields past `delivery_error` are only filled for
/// [`StatusDetail::Extended`](crate::StatusDetail::Extended) and above.
pub struct StatusReport {
    pub id: String,
    pub status: DeliveryStatus,
    /// Time of the last status change (the delivery time for delivered messages).
    pub changed_at: Option<DateTime<Utc>>,
    pub delivery_error: Option<i32>,
    pub sent_at: Option<DateTime<Utc>>,
    pub phone: Option<String>,
    pub cost: Option<Money>,
    pub sender: Option<String>,
    pub status_name: Option<String>,
    pub text: Option<String>,
    /// Trailing fields of [`StatusDetail::Full`](crate::StatusDetail::Full) replies, verbatim.
    pub extra: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "fields", rename_all = "snake_case")]
pub enum BatchStatus {
    /// The gateway answered the batch; per-message lines are kept as received.
    Accepted { lines: Vec<String> },
    /// The gateway answered with a single summary line instead.
    Summary(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "data", rename_all = "snake_case")]
pub enum StatusOutcome {
    Report(StatusReport),
    Batch(BatchStatus),
    Rejected(GatewayError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "data", rename_all = "snake_case")]
pub enum BalanceOutcome {
    Balance(Money),
    Rejected(GatewayError),
}

macro_rules! impl_rejected_accessor {
    ($($outcome:ident),+) => {
        $(
            impl $outcome {
                /// The gateway error, if the request was rejected.
                pub fn rejection(&self) -> Option<&GatewayError> {
                    match self {
                        Self::Rejected(err) => Some(err),
                        _ => None,
                    }
                }

                pub fn is_rejected(&self) -> bool {
                    self.rejection().is_some()
                }
            }
        )+
    };
}

impl_rejected_accessor!(SendOutcome, CostOutcome, StatusOutcome, BalanceOutcome);
