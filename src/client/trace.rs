use std::fmt;
use std::sync::Arc;

use crate::domain::{
    BalanceOutcome, BatchStatus, CostOutcome, ErrorCode, SendOutcome, StatusOutcome,
};

/// Receiver of human-readable trace notifications.
///
/// Called synchronously after every operation and when all mirrors failed. Implemented for any
/// `Fn(&str)` closure.
pub trait TraceSink: Send + Sync {
    fn on_trace(&self, message: &str);
}

impl<F> TraceSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn on_trace(&self, message: &str) {
        self(message)
    }
}

#[derive(Clone, Default)]
pub(crate) struct Tracer(Option<Arc<dyn TraceSink>>);

impl Tracer {
    pub(crate) fn new(sink: Arc<dyn TraceSink>) -> Self {
        Self(Some(sink))
    }

    pub(crate) fn emit(&self, message: &str) {
        tracing::debug!(target: "smsc::trace", "{message}");
        if let Some(sink) = &self.0 {
            sink.on_trace(message);
        }
    }
}

impl fmt::Debug for Tracer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Tracer")
            .field(&self.0.as_ref().map(|_| "TraceSink"))
            .finish()
    }
}

fn error_label(code: ErrorCode) -> String {
    match code.trace_digit() {
        Some(digit) => format!("Error #{digit}"),
        None => format!("Error ({code})"),
    }
}

pub(crate) fn describe_send(outcome: &SendOutcome) -> String {
    match outcome {
        SendOutcome::Sent(receipt) => format!(
            "Message sent. ID: {}, total SMS: {}, cost: {}, balance: {}",
            receipt.id,
            receipt.sms_count,
            display_or_dash(receipt.cost.as_ref()),
            display_or_dash(receipt.balance.as_ref()),
        ),
        SendOutcome::Rejected(err) => match err.id.as_deref() {
            Some(id) if id != "0" => format!("{}, ID: {id}", error_label(err.code)),
            _ => error_label(err.code),
        },
    }
}

pub(crate) fn describe_cost(outcome: &CostOutcome) -> String {
    match outcome {
        CostOutcome::Quoted(quote) => format!(
            "Cost: {}. Total SMS: {}",
            display_or_dash(quote.cost.as_ref()),
            quote.sms_count
        ),
        CostOutcome::Rejected(err) => error_label(err.code),
    }
}

pub(crate) fn describe_status(outcome: &StatusOutcome) -> String {
    match outcome {
        StatusOutcome::Report(report) => match report.changed_at {
            Some(changed_at) => format!(
                "SMS status = {}, status changed at {}",
                report.status.as_i32(),
                changed_at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            None => format!("SMS status = {}", report.status.as_i32()),
        },
        StatusOutcome::Batch(BatchStatus::Accepted { lines }) => {
            format!("Batch status received: {} line(s)", lines.len())
        }
        StatusOutcome::Batch(BatchStatus::Summary(fields)) => {
            format!("Batch status summary: {}", fields.join(","))
        }
        StatusOutcome::Rejected(err) => error_label(err.code),
    }
}

pub(crate) fn describe_balance(outcome: &BalanceOutcome) -> String {
    match outcome {
        BalanceOutcome::Balance(amount) => format!("Balance: {amount}"),
        BalanceOutcome::Rejected(err) => error_label(err.code),
    }
}

fn display_or_dash<T: fmt::Display>(value: Option<&T>) -> String {
    value.map_or_else(|| "-".to_owned(), ToString::to_string)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use crate::domain::{GatewayError, Money, SendReceipt};

    use super::*;

    #[test]
    fn closures_are_trace_sinks() {
        let seen = Arc::new(Mutex::new(Vec::<String>::new()));
        let sink = {
            let seen = Arc::clone(&seen);
            move |message: &str| seen.lock().unwrap().push(message.to_owned())
        };
        let tracer = Tracer::new(Arc::new(sink));
        tracer.emit("hello");
        Tracer::default().emit("nobody listens");
        assert_eq!(*seen.lock().unwrap(), ["hello"]);
    }

    #[test]
    fn send_messages() {
        let sent = SendOutcome::Sent(SendReceipt {
            id: "123".to_owned(),
            sms_count: 1,
            cost: Money::parse("3.50"),
            balance: Money::parse("100.00"),
        });
        assert_eq!(
            describe_send(&sent),
            "Message sent. ID: 123, total SMS: 1, cost: 3.50, balance: 100.00"
        );

        let rejected = SendOutcome::Rejected(GatewayError {
            id: Some("0".to_owned()),
            code: ErrorCode::new(-7),
        });
        assert_eq!(describe_send(&rejected), "Error #7");

        let rejected = SendOutcome::Rejected(GatewayError {
            id: Some("55".to_owned()),
            code: ErrorCode::new(-3),
        });
        assert_eq!(describe_send(&rejected), "Error #3, ID: 55");
    }

    #[test]
    fn unknown_codes_are_labelled_plainly() {
        let outcome = BalanceOutcome::Rejected(GatewayError {
            id: None,
            code: ErrorCode::UNKNOWN,
        });
        assert_eq!(describe_balance(&outcome), "Error (0)");
    }
}
