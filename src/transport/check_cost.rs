use crate::domain::{
    CheckCost, CheckCostOptions, CostOutcome, CostQuote, ErrorCode, GatewayError, MessageText,
    Money, RawPhoneNumber, SenderId, Translit,
};

use super::parser::ResponseFields;
use super::send_sms::join_phones;

pub fn encode_check_cost_params(request: &CheckCost) -> Vec<(String, String)> {
    // cost=1 quotes the message without sending it
    let mut params = vec![
        ("cost".to_owned(), "1".to_owned()),
        (
            RawPhoneNumber::FIELD.to_owned(),
            join_phones(request.recipients()),
        ),
        (
            MessageText::FIELD.to_owned(),
            request.msg().as_str().to_owned(),
        ),
    ];
    push_options(&mut params, request.options());
    params
}

fn push_options(params: &mut Vec<(String, String)>, options: &CheckCostOptions) {
    params.push((
        Translit::FIELD.to_owned(),
        options.translit.code().to_string(),
    ));
    if let Some((key, value)) = options.format.param() {
        params.push((key.to_owned(), value.to_owned()));
    }
    if let Some(sender) = options.sender.as_ref() {
        params.push((SenderId::FIELD.to_owned(), sender.as_str().to_owned()));
    }
    params.extend(options.extra.iter().cloned());
}

/// `(cost, count)` on success, `(0, -error)` otherwise.
pub fn decode_check_cost_response(fields: &ResponseFields) -> CostOutcome {
    match fields.int(1) {
        Some(count) if count > 0 => CostOutcome::Quoted(CostQuote {
            cost: Money::parse(fields.get(0)),
            sms_count: count.unsigned_abs(),
        }),
        code => CostOutcome::Rejected(GatewayError {
            id: None,
            code: code.map_or(ErrorCode::UNKNOWN, ErrorCode::new),
        }),
    }
}
