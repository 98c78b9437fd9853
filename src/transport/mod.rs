//! Transport layer: wire-format details (parameter encoding, response splitting and decoding).

mod balance;
mod check_cost;
mod check_status;
pub(crate) mod encoder;
pub(crate) mod parser;
mod send_sms;

pub use balance::{decode_balance_response, encode_balance_params};
pub use check_cost::{decode_check_cost_response, encode_check_cost_params};
pub use check_status::{decode_check_status_response, encode_check_status_params};
pub use encoder::{EncodeError, EncodedBody, query_string};
pub use parser::{PLACEHOLDER_RESPONSE, ResponseFields};
pub use send_sms::{compose_mail_body, decode_send_sms_response, encode_send_sms_params};
