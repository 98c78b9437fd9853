use crate::domain::{BalanceOutcome, ErrorCode, GatewayError, Money};

use super::parser::ResponseFields;

/// `balance.php` needs nothing beyond the common parameters.
pub fn encode_balance_params() -> Vec<(String, String)> {
    Vec::new()
}

/// `(balance)` on success, `(0, -error)` otherwise.
pub fn decode_balance_response(fields: &ResponseFields) -> BalanceOutcome {
    if fields.len() == 1 {
        if let Some(amount) = Money::parse(fields.get(0)) {
            return BalanceOutcome::Balance(amount);
        }
    }

    BalanceOutcome::Rejected(GatewayError {
        id: None,
        code: fields.int(1).map_or(ErrorCode::UNKNOWN, ErrorCode::new),
    })
}

#[cfg(test)]
mod tests {
    use crate::domain::Command;

    use super::*;

    fn fields(raw: &str) -> ResponseFields {
        ResponseFields::parse(Command::Balance, "", raw)
    }

    #[test]
    fn balance_encoder_adds_nothing() {
        assert!(encode_balance_params().is_empty());
    }

    #[test]
    fn decode_single_field_is_balance() {
        assert_eq!(
            decode_balance_response(&fields("100.00")),
            BalanceOutcome::Balance(Money::parse("100.00").unwrap())
        );
    }

    #[test]
    fn decode_error_pair() {
        assert_eq!(
            decode_balance_response(&fields("0,-1")),
            BalanceOutcome::Rejected(GatewayError {
                id: None,
                code: ErrorCode::new(-1),
            })
        );
    }

    #[test]
    fn decode_non_numeric_single_field_is_unknown_rejection() {
        assert_eq!(
            decode_balance_response(&fields("maintenance")),
            BalanceOutcome::Rejected(GatewayError {
                id: None,
                code: ErrorCode::UNKNOWN,
            })
        );
    }

    #[test]
    fn decode_float_spellings_are_unknown_rejection() {
        for raw in ["NaN", "inf", "1e3"] {
            assert_eq!(
                decode_balance_response(&fields(raw)),
                BalanceOutcome::Rejected(GatewayError {
                    id: None,
                    code: ErrorCode::UNKNOWN,
                }),
                "{raw}"
            );
        }
    }
}
