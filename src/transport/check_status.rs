use chrono::{DateTime, Utc};

use crate::domain::{
    BatchStatus, CheckStatus, DeliveryStatus, ErrorCode, GatewayError, MessageId, Money,
    StatusDetail, StatusOutcome, StatusReport,
};

use super::parser::{PLACEHOLDER_RESPONSE, ResponseFields};
use super::send_sms::join_phones;

const PHONE_FIELD: &str = "phone";

/// Position of the text in `Extended` and `Full` replies.
const TEXT_IDX: usize = 8;
/// `Full` replies append country, operator and region after the text.
const FULL_TRAILING_FIELDS: usize = 3;

pub fn encode_check_status_params(request: &CheckStatus) -> Vec<(String, String)> {
    vec![
        (PHONE_FIELD.to_owned(), join_phones(request.phones())),
        (MessageId::FIELD.to_owned(), request.joined_ids()),
        (
            StatusDetail::FIELD.to_owned(),
            request.detail().code().to_string(),
        ),
    ]
}

pub fn decode_check_status_response(request: &CheckStatus, fields: ResponseFields) -> StatusOutcome {
    if request.is_batch() {
        decode_batch(request, fields)
    } else {
        decode_single(request, &fields)
    }
}

/// `(status, changed, error[, sent, phone, cost, sender, status name, text[, ...]])`
/// on success, `(0, -error)` or a negative status otherwise.
fn decode_single(request: &CheckStatus, fields: &ResponseFields) -> StatusOutcome {
    let id = request.joined_ids();
    let status = fields.int(0);
    let second = fields.int(1);

    let status = match status {
        Some(status) if status >= 0 && !second.is_some_and(|value| value < 0) => status,
        _ => {
            let code = second
                .filter(|value| *value < 0)
                .or(status.filter(|value| *value < 0))
                .map_or(ErrorCode::UNKNOWN, ErrorCode::new);
            return StatusOutcome::Rejected(GatewayError { id: Some(id), code });
        }
    };

    let mut report = StatusReport {
        id,
        status: DeliveryStatus::new(status),
        changed_at: epoch(fields.get(1)),
        delivery_error: fields.int(2),
        sent_at: None,
        phone: None,
        cost: None,
        sender: None,
        status_name: None,
        text: None,
        extra: Vec::new(),
    };

    if request.detail() != StatusDetail::Basic && fields.len() > 3 {
        report.sent_at = epoch(fields.get(3));
        report.phone = fields.non_empty(4);
        report.cost = Money::parse(fields.get(5));
        report.sender = fields.non_empty(6);
        report.status_name = fields.non_empty(7);

        let tail = fields.as_slice().get(TEXT_IDX..).unwrap_or_default();
        let text_len = match request.detail() {
            // The text may itself contain commas.
            StatusDetail::Extended => tail.len(),
            _ if tail.len() > FULL_TRAILING_FIELDS => tail.len() - FULL_TRAILING_FIELDS,
            _ => tail.len().min(1),
        };
        let (text, extra) = tail.split_at(text_len);
        if !text.is_empty() {
            report.text = Some(text.join(","));
        }
        report.extra = extra.to_vec();
    }

    StatusOutcome::Report(report)
}

fn decode_batch(request: &CheckStatus, fields: ResponseFields) -> StatusOutcome {
    let rejected = |code| {
        StatusOutcome::Rejected(GatewayError {
            id: Some(request.joined_ids()),
            code,
        })
    };

    if fields.len() == 1 {
        let line = fields.get(0);
        if line == PLACEHOLDER_RESPONSE {
            return rejected(ErrorCode::UNKNOWN);
        }
        if is_summary_line(line) {
            let summary = line.split(',').map(str::to_owned).collect::<Vec<_>>();
            if let [_, code] = summary.as_slice() {
                if let Some(code) = code.trim().parse::<i32>().ok().filter(|code| *code < 0) {
                    return rejected(ErrorCode::new(code));
                }
            }
            return StatusOutcome::Batch(BatchStatus::Summary(summary));
        }
    }

    StatusOutcome::Batch(BatchStatus::Accepted {
        lines: fields.into_vec(),
    })
}

/// Legacy-compatibility heuristic: the gateway answers a batch with a single `N,-M` line when it
/// refuses the whole request. Only that exact shape is recognized.
fn is_summary_line(line: &str) -> bool {
    line.find('-') == Some(2) && line.matches('-').count() == 1
}

fn epoch(raw: &str) -> Option<DateTime<Utc>> {
    let seconds = raw.trim().parse::<i64>().ok().filter(|seconds| *seconds > 0)?;
    DateTime::from_timestamp(seconds, 0)
}

#[cfg(test)]
mod tests {
    use crate::domain::{Command, KnownDeliveryStatus, RawPhoneNumber};
    use crate::transport::encoder::query_string;

    use super::*;

    fn single(detail: StatusDetail) -> CheckStatus {
        CheckStatus::one(
            MessageId::new("1").unwrap(),
            RawPhoneNumber::new("79999999999").unwrap(),
        )
        .with_detail(detail)
    }

    fn batch() -> CheckStatus {
        let phone = RawPhoneNumber::new("79999999999").unwrap();
        CheckStatus::new(
            vec![MessageId::new("1").unwrap(), MessageId::new("2").unwrap()],
            vec![phone.clone(), phone],
        )
        .unwrap()
    }

    fn decode(request: &CheckStatus, raw: &str) -> StatusOutcome {
        let query = query_string(&encode_check_status_params(request));
        decode_check_status_response(request, ResponseFields::parse(Command::Status, &query, raw))
    }

    #[test]
    fn encode_check_status_params_joins_ids_and_phones() {
        let params = encode_check_status_params(&batch().with_detail(StatusDetail::Full));
        assert_eq!(
            params,
            vec![
                ("phone".to_owned(), "79999999999,79999999999".to_owned()),
                ("id".to_owned(), "1,2".to_owned()),
                ("all".to_owned(), "2".to_owned()),
            ]
        );
        assert!(query_string(&params).contains("id=1%2C2"));
    }

    #[test]
    fn decode_basic_report() {
        let StatusOutcome::Report(report) = decode(&single(StatusDetail::Basic), "1,1700000000,0")
        else {
            panic!("expected report");
        };
        assert_eq!(report.id, "1");
        assert_eq!(report.status, DeliveryStatus::new(1));
        assert_eq!(report.changed_at, DateTime::from_timestamp(1_700_000_000, 0));
        assert_eq!(report.delivery_error, Some(0));
        assert_eq!(report.phone, None);
        assert_eq!(report.text, None);
    }

    #[test]
    fn decode_extended_report() {
        let raw = "1,1700000000,0,1699999000,79999999999,,Filuet,Доставлено,Test";
        let StatusOutcome::Report(report) = decode(&single(StatusDetail::Extended), raw) else {
            panic!("expected report");
        };
        assert_eq!(report.status.as_i32(), 1);
        assert_eq!(report.sent_at, DateTime::from_timestamp(1_699_999_000, 0));
        assert_eq!(report.phone.as_deref(), Some("79999999999"));
        assert_eq!(report.cost, None);
        assert_eq!(report.sender.as_deref(), Some("Filuet"));
        assert_eq!(report.status_name.as_deref(), Some("Доставлено"));
        assert_eq!(report.text.as_deref(), Some("Test"));
        assert!(report.extra.is_empty());
    }

    #[test]
    fn decode_extended_report_keeps_commas_in_text() {
        let raw = "1,1700000000,0,1699999000,79999999999,1.50,Filuet,Доставлено,Hello, world";
        let StatusOutcome::Report(report) = decode(&single(StatusDetail::Extended), raw) else {
            panic!("expected report");
        };
        assert_eq!(report.cost, Money::parse("1.50"));
        assert_eq!(report.text.as_deref(), Some("Hello, world"));
    }

    #[test]
    fn decode_full_report_keeps_trailing_fields_opaque() {
        let raw = "1,1700000000,0,1699999000,79999999999,1.50,Filuet,Доставлено,Hi, you,Россия,МТС,Москва";
        let StatusOutcome::Report(report) = decode(&single(StatusDetail::Full), raw) else {
            panic!("expected report");
        };
        assert_eq!(report.text.as_deref(), Some("Hi, you"));
        assert_eq!(report.extra, ["Россия", "МТС", "Москва"]);
    }

    #[test]
    fn decode_full_report_with_short_tail_takes_one_text_field() {
        let raw = "1,1700000000,0,1699999000,79999999999,1.50,Filuet,Доставлено,Hi,Россия";
        let StatusOutcome::Report(report) = decode(&single(StatusDetail::Full), raw) else {
            panic!("expected report");
        };
        assert_eq!(report.text.as_deref(), Some("Hi"));
        assert_eq!(report.extra, ["Россия"]);

        let raw = "1,1700000000,0,1699999000,79999999999,1.50,Filuet,Доставлено";
        let StatusOutcome::Report(report) = decode(&single(StatusDetail::Full), raw) else {
            panic!("expected report");
        };
        assert_eq!(report.text, None);
        assert!(report.extra.is_empty());
    }

    #[test]
    fn decode_single_error_tuple() {
        let outcome = decode(&single(StatusDetail::Extended), "0,-3");
        assert_eq!(
            outcome,
            StatusOutcome::Rejected(GatewayError {
                id: Some("1".to_owned()),
                code: ErrorCode::new(-3),
            })
        );
    }

    #[test]
    fn decode_single_negative_status_is_rejection() {
        let outcome = decode(&single(StatusDetail::Basic), "-3,0,0");
        assert_eq!(
            outcome.rejection().map(|err| err.code),
            Some(ErrorCode::new(-3))
        );
    }

    #[test]
    fn negative_status_code_maps_back_to_known_status() {
        let outcome = decode(&single(StatusDetail::Basic), "-1,0,0");
        let code = outcome.rejection().map(|err| err.code.as_i32()).unwrap();
        let status = DeliveryStatus::new(code);
        assert_eq!(status.known(), Some(KnownDeliveryStatus::AwaitingSend));
        assert!(!status.is_final());
    }

    #[test]
    fn decode_single_placeholder_is_unknown_rejection() {
        let outcome = decode(&single(StatusDetail::Basic), PLACEHOLDER_RESPONSE);
        assert_eq!(
            outcome.rejection().map(|err| err.code),
            Some(ErrorCode::UNKNOWN)
        );
    }

    #[test]
    fn decode_batch_lines_are_accepted() {
        let outcome = decode(&batch(), "1,1700000000,0,1\n0,1700000001,0,2");
        assert_eq!(
            outcome,
            StatusOutcome::Batch(BatchStatus::Accepted {
                lines: vec!["1,1700000000,0,1".to_owned(), "0,1700000001,0,2".to_owned()],
            })
        );
    }

    #[test]
    fn decode_batch_error_line() {
        let outcome = decode(&batch(), "0,-2");
        assert_eq!(
            outcome,
            StatusOutcome::Rejected(GatewayError {
                id: Some("1,2".to_owned()),
                code: ErrorCode::new(-2),
            })
        );
    }

    #[test]
    fn decode_batch_summary_marker() {
        let outcome = decode(&batch(), "12-5");
        assert_eq!(
            outcome,
            StatusOutcome::Batch(BatchStatus::Summary(vec!["12-5".to_owned()]))
        );
    }

    #[test]
    fn decode_batch_placeholder_is_rejection() {
        let outcome = decode(&batch(), PLACEHOLDER_RESPONSE);
        assert_eq!(
            outcome.rejection().map(|err| err.code),
            Some(ErrorCode::UNKNOWN)
        );
    }

    #[test]
    fn summary_heuristic_is_narrow() {
        assert!(is_summary_line("0,-3"));
        assert!(is_summary_line("12-5"));
        assert!(!is_summary_line("1,1700000000,0,1"));
        assert!(!is_summary_line("0,-3,-4"));
        assert!(!is_summary_line("-3,0"));
    }
}
