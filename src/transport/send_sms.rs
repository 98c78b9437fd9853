use crate::domain::{
    DeliveryTime, ErrorCode, GatewayError, Login, MessageText, Money, Password, RawPhoneNumber,
    SendId, SendOptions, SendOutcome, SendReceipt, SendSms, SenderId, Translit, ValidationError,
};

use super::parser::ResponseFields;

/// Multi-text sends use `list`: one `phone:message` line per recipient.
const LIST_FIELD: &str = "list";

pub fn encode_send_sms_params(request: &SendSms) -> Vec<(String, String)> {
    // cost=3 asks the gateway to report cost and balance with the message id
    let mut params = vec![("cost".to_owned(), "3".to_owned())];

    match request {
        SendSms::ToMany(to_many) => {
            params.push((
                RawPhoneNumber::FIELD.to_owned(),
                join_phones(to_many.recipients()),
            ));
            params.push((
                MessageText::FIELD.to_owned(),
                to_many.msg().as_str().to_owned(),
            ));
        }
        SendSms::PerRecipient(per_recipient) => {
            let list = per_recipient
                .messages()
                .iter()
                .map(|(phone, text)| format!("{}:{}", phone.raw(), text.as_str()))
                .collect::<Vec<_>>()
                .join("\n");
            params.push((LIST_FIELD.to_owned(), list));
        }
    }

    push_options(&mut params, request.options());
    params
}

pub(crate) fn join_phones(phones: &[RawPhoneNumber]) -> String {
    phones
        .iter()
        .map(RawPhoneNumber::raw)
        .collect::<Vec<_>>()
        .join(",")
}

fn push_options(params: &mut Vec<(String, String)>, options: &SendOptions) {
    params.push((
        SendId::FIELD.to_owned(),
        options.id.map_or(0, SendId::value).to_string(),
    ));
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
    if let Some(time) = options.time.as_ref() {
        params.push((DeliveryTime::FIELD.to_owned(), time.as_str().to_owned()));
    }
    params.extend(options.extra.iter().cloned());
}

/// `(id, count, cost, balance)` on success, `(id, -error)` otherwise.
pub fn decode_send_sms_response(fields: &ResponseFields) -> SendOutcome {
    let id = fields.get(0).to_owned();
    match fields.int(1) {
        Some(count) if count > 0 => SendOutcome::Sent(SendReceipt {
            id,
            sms_count: count.unsigned_abs(),
            cost: Money::parse(fields.get(2)),
            balance: Money::parse(fields.get(3)),
        }),
        code => SendOutcome::Rejected(GatewayError {
            id: (!id.is_empty()).then_some(id),
            code: code.map_or(ErrorCode::UNKNOWN, ErrorCode::new),
        }),
    }
}

/// Mail relay body: `login:password:id:time:translit,format,sender:phones:message`.
pub fn compose_mail_body(
    login: &Login,
    password: &Password,
    request: &SendSms,
) -> Result<String, ValidationError> {
    let SendSms::ToMany(to_many) = request else {
        return Err(ValidationError::NotSupportedByMailRelay {
            what: "per-recipient texts",
        });
    };
    let options = to_many.options();
    if !options.files.is_empty() {
        return Err(ValidationError::NotSupportedByMailRelay {
            what: "attachments",
        });
    }
    if !options.extra.is_empty() {
        return Err(ValidationError::NotSupportedByMailRelay {
            what: "extra parameters",
        });
    }

    Ok(format!(
        "{}:{}:{}:{}:{},{},{}:{}:{}",
        login.as_str(),
        password.as_str(),
        options.id.map_or(0, SendId::value),
        options.time.as_ref().map_or("", DeliveryTime::as_str),
        options.translit.code(),
        options.format.code(),
        options.sender.as_ref().map_or("", SenderId::as_str),
        join_phones(to_many.recipients()),
        to_many.msg().as_str(),
    ))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::domain::{Command, MessageFormat};

    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    fn fields(raw: &str) -> ResponseFields {
        ResponseFields::parse(Command::Send, "", raw)
    }

    #[test]
    fn encode_to_many_params() {
        let p1 = RawPhoneNumber::new("79999999999").unwrap();
        let p2 = RawPhoneNumber::new("78888888888").unwrap();
        let options = SendOptions {
            translit: Translit::Latin,
            time: Some(DeliveryTime::new("0101121000").unwrap()),
            id: Some(SendId::new(42).unwrap()),
            format: MessageFormat::Flash,
            sender: Some(SenderId::new("Filuet").unwrap()),
            extra: pairs(&[("maxsms", "3")]),
            ..Default::default()
        };
        let request =
            SendSms::to_many(vec![p1, p2], MessageText::new("hello").unwrap(), options).unwrap();

        assert_eq!(
            encode_send_sms_params(&request),
            pairs(&[
                ("cost", "3"),
                ("phones", "79999999999,78888888888"),
                ("mes", "hello"),
                ("id", "42"),
                ("translit", "1"),
                ("flash", "1"),
                ("sender", "Filuet"),
                ("time", "0101121000"),
                ("maxsms", "3"),
            ])
        );
    }

    #[test]
    fn encode_defaults_send_zero_id_and_no_translit() {
        let request = SendSms::to_many(
            vec![RawPhoneNumber::new("111").unwrap()],
            MessageText::new("Test").unwrap(),
            SendOptions::default(),
        )
        .unwrap();

        assert_eq!(
            encode_send_sms_params(&request),
            pairs(&[
                ("cost", "3"),
                ("phones", "111"),
                ("mes", "Test"),
                ("id", "0"),
                ("translit", "0"),
            ])
        );
    }

    #[test]
    fn encode_per_recipient_uses_list() {
        let mut messages = BTreeMap::new();
        messages.insert(
            RawPhoneNumber::new("79999999999").unwrap(),
            MessageText::new("code 123").unwrap(),
        );
        messages.insert(
            RawPhoneNumber::new("78888888888").unwrap(),
            MessageText::new("code 456").unwrap(),
        );
        let request = SendSms::per_recipient(messages, SendOptions::default()).unwrap();

        let params = encode_send_sms_params(&request);
        assert_eq!(
            params[1],
            (
                "list".to_owned(),
                "78888888888:code 456\n79999999999:code 123".to_owned()
            )
        );
        assert!(!params.iter().any(|(k, _)| k == "phones" || k == "mes"));
    }

    #[test]
    fn decode_success_tuple() {
        let outcome = decode_send_sms_response(&fields("123,1,3.50,100.00"));
        assert_eq!(
            outcome,
            SendOutcome::Sent(SendReceipt {
                id: "123".to_owned(),
                sms_count: 1,
                cost: Money::parse("3.50"),
                balance: Money::parse("100.00"),
            })
        );
    }

    #[test]
    fn decode_error_tuple_keeps_sign() {
        let outcome = decode_send_sms_response(&fields("0,-7"));
        let SendOutcome::Rejected(err) = outcome else {
            panic!("expected rejection");
        };
        assert_eq!(err.id.as_deref(), Some("0"));
        assert_eq!(err.code, ErrorCode::new(-7));
        assert_eq!(err.code.trace_digit(), Some('7'));
    }

    #[test]
    fn decode_zero_count_and_garbage_are_rejections() {
        let outcome = decode_send_sms_response(&fields("5,0"));
        assert_eq!(
            outcome.rejection().map(|err| err.code),
            Some(ErrorCode::new(0))
        );

        let outcome = decode_send_sms_response(&fields(","));
        assert_eq!(
            outcome,
            SendOutcome::Rejected(GatewayError {
                id: None,
                code: ErrorCode::UNKNOWN,
            })
        );

        let outcome = decode_send_sms_response(&fields("<html>"));
        assert!(outcome.is_rejected());
    }

    #[test]
    fn mail_body_layout() {
        let login = Login::new("user").unwrap();
        let password = Password::new("secret").unwrap();
        let options = SendOptions {
            time: Some(DeliveryTime::new("0101121000").unwrap()),
            format: MessageFormat::Flash,
            sender: Some(SenderId::new("Shop").unwrap()),
            ..Default::default()
        };
        let request = SendSms::to_many(
            vec![RawPhoneNumber::new("79999999999").unwrap()],
            MessageText::new("Your code: 123").unwrap(),
            options,
        )
        .unwrap();

        assert_eq!(
            compose_mail_body(&login, &password, &request).unwrap(),
            "user:secret:0:0101121000:0,1,Shop:79999999999:Your code: 123"
        );
    }

    #[test]
    fn mail_body_rejects_what_it_cannot_carry() {
        let login = Login::new("user").unwrap();
        let password = Password::new("secret").unwrap();
        let mut messages = BTreeMap::new();
        messages.insert(
            RawPhoneNumber::new("79999999999").unwrap(),
            MessageText::new("hi").unwrap(),
        );
        let request = SendSms::per_recipient(messages, SendOptions::default()).unwrap();
        assert!(matches!(
            compose_mail_body(&login, &password, &request),
            Err(ValidationError::NotSupportedByMailRelay { .. })
        ));

        let request = SendSms::to_many(
            vec![RawPhoneNumber::new("79999999999").unwrap()],
            MessageText::new("hi").unwrap(),
            SendOptions {
                files: vec!["a.jpg".into()],
                ..Default::default()
            },
        )
        .unwrap();
        assert!(compose_mail_body(&login, &password, &request).is_err());
    }
}
