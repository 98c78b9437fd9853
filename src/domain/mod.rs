//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::{
    CheckCost, CheckCostOptions, CheckStatus, MessageFormat, PerRecipient, SendOptions, SendSms,
    StatusDetail, ToMany, Translit,
};
pub use response::{
    BalanceOutcome, BatchStatus, CostOutcome, CostQuote, GatewayError, SendOutcome, SendReceipt,
    StatusOutcome, StatusReport,
};
pub use phonenumber::country;
pub use validation::ValidationError;
pub use value::{
    Command, DeliveryStatus, DeliveryTime, ErrorCode, KnownDeliveryStatus, KnownErrorCode, Login,
    MessageId, MessageText, Money, Password, PhoneNumber, RawPhoneNumber, SendId, SenderId,
};
