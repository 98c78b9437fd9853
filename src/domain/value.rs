use std::fmt;

use phonenumber::country;
use serde::Serialize;

use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Gateway script addressed by a request (`/sys/<command>.php`).
pub enum Command {
    /// `send.php`: sending messages and cost queries.
    Send,
    /// `status.php`: delivery status of sent messages.
    Status,
    /// `balance.php`: account balance.
    Balance,
}

impl Command {
    /// Script name as used in the request path.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Send => "send",
            Self::Status => "status",
            Self::Balance => "balance",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// SMSC.RU account login.
///
/// Invariant: non-empty after trimming.
pub struct Login(String);

impl Login {
    /// Parameter name used by SMSC.RU (`login`).
    pub const FIELD: &'static str = "login";

    /// Create a validated [`Login`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated login.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// SMSC.RU password, or the lowercase MD5 hash of it.
///
/// Invariant: must not be empty (whitespace is preserved and allowed).
pub struct Password(String);

impl Password {
    /// Parameter name used by SMSC.RU (`psw`).
    pub const FIELD: &'static str = "psw";

    /// Create a validated [`Password`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the password as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Sender ID shown to the recipient (`sender`).
///
/// Invariant: non-empty after trimming. A single `.` disables the account's default sender.
pub struct SenderId(String);

impl SenderId {
    /// Parameter name used by SMSC.RU (`sender`).
    pub const FIELD: &'static str = "sender";

    /// Create a validated [`SenderId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated sender id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Message text (`mes`).
///
/// Invariant: non-empty after trimming, unless created with [`MessageText::blank`].
/// The value is kept as given, whitespace included.
pub struct MessageText(String);

impl MessageText {
    /// Parameter name used by SMSC.RU (`mes`).
    pub const FIELD: &'static str = "mes";

    /// Create validated message text.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Empty text for formats that carry none (HLR lookups, ping-sms, calls).
    pub fn blank() -> Self {
        Self(String::new())
    }

    /// Borrow the message text as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Gateway message id, as returned by `send` and queried by `status` (`id`).
///
/// Invariant: non-empty after trimming and free of commas (commas separate ids in batch queries).
pub struct MessageId(String);

impl MessageId {
    /// Parameter name used by SMSC.RU (`id`).
    pub const FIELD: &'static str = "id";

    /// Create a validated [`MessageId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        if trimmed.contains(',') {
            return Err(ValidationError::ForbiddenCharacter {
                field: Self::FIELD,
                ch: ',',
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Caller-assigned id for a new message (`id` on `send`).
///
/// Invariant: `1..=2147483647`. Requests without one send `id=0` and let the gateway assign.
pub struct SendId(u32);

impl SendId {
    /// Parameter name used by SMSC.RU (`id`).
    pub const FIELD: &'static str = "id";

    /// Minimum allowed id.
    pub const MIN: u32 = 1;
    /// Maximum allowed id.
    pub const MAX: u32 = 2_147_483_647;

    /// Create a validated id.
    pub fn new(value: u32) -> Result<Self, ValidationError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ValidationError::MessageIdOutOfRange {
                min: Self::MIN,
                max: Self::MAX,
                actual: value,
            });
        }
        Ok(Self(value))
    }

    /// Get the underlying id.
    pub fn value(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Unvalidated recipient as sent to SMSC.RU (`phones`).
///
/// Invariant: non-empty after trimming. Besides phone numbers this may also be an
/// e-mail address for [`MessageFormat::Mail`](crate::MessageFormat::Mail) messages.
pub struct RawPhoneNumber(String);

impl RawPhoneNumber {
    /// Parameter name used by SMSC.RU (`phones`).
    pub const FIELD: &'static str = "phones";

    /// Create a validated (non-empty) raw phone number.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Raw (trimmed) value as sent to SMSC.RU.
    pub fn raw(&self) -> &str {
        &self.0
    }
}

impl From<PhoneNumber> for RawPhoneNumber {
    /// SMSC.RU expects international numbers as bare digits, so the `+` is dropped.
    fn from(value: PhoneNumber) -> Self {
        Self(value.digits().to_owned())
    }
}

#[derive(Debug, Clone)]
/// Recipient checked against the numbering plan and normalized for SMSC.RU.
///
/// Accepts any notation `phonenumber` understands (`+7 925 123-45-67`, `8 (925) 123 45 67`
/// with a Russian default region, ...). Only numbers valid for their region pass.
/// Equality and hashing use the normalized digits.
pub struct PhoneNumber {
    e164: String,
    parsed: phonenumber::PhoneNumber,
}

impl PhoneNumber {
    /// Parse and normalize a phone number.
    ///
    /// `default_region` resolves numbers written without a country prefix.
    pub fn parse(
        default_region: Option<country::Id>,
        input: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let input = input.into();
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty {
                field: RawPhoneNumber::FIELD,
            });
        }

        let invalid = || ValidationError::InvalidPhoneNumber {
            input: trimmed.to_owned(),
        };
        let parsed = phonenumber::parse(default_region, trimmed).map_err(|_| invalid())?;
        if !phonenumber::is_valid(&parsed) {
            return Err(invalid());
        }

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();
        Ok(Self { e164, parsed })
    }

    /// Country code and national number without the leading `+`, as SMSC.RU takes them.
    pub fn digits(&self) -> &str {
        self.e164.trim_start_matches('+')
    }

    /// E.164 form with the leading `+`.
    pub fn e164(&self) -> &str {
        &self.e164
    }

    /// Region the number belongs to, if the numbering plan names one.
    pub fn region(&self) -> Option<country::Id> {
        self.parsed.country().id()
    }

    pub fn parsed(&self) -> &phonenumber::PhoneNumber {
        &self.parsed
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.e164)
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.e164 == other.e164
    }
}

impl Eq for PhoneNumber {}

impl std::hash::Hash for PhoneNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.e164.hash(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Scheduled delivery time (`time`) in one of the gateway's formats:
/// `DDMMYYhhmm`, `h1-h2`, `0ts` or `+m`.
///
/// Invariant: non-empty after trimming. The format itself is checked by the gateway.
pub struct DeliveryTime(String);

impl DeliveryTime {
    /// Parameter name used by SMSC.RU (`time`).
    pub const FIELD: &'static str = "time";

    /// Create a validated [`DeliveryTime`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the schedule string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
/// Money amount as printed by the gateway.
///
/// The textual token is preserved (`10.00` stays `"10.00"`), but it is guaranteed to be numeric.
pub struct Money(String);

impl Money {
    /// Accept `raw` if it is a plain decimal after trimming: optional sign, digits, at most one
    /// `.`. Exponents, `NaN` and `inf` are rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let unsigned = trimmed.strip_prefix(['-', '+']).unwrap_or(trimmed);
        let (int, frac) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if int.len() + frac.len() == 0 || !all_digits(int) || !all_digits(frac) {
            return None;
        }
        Some(Self(trimmed.to_owned()))
    }

    /// Borrow the amount as printed by the gateway.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value of the amount.
    pub fn to_f64(&self) -> f64 {
        self.0.parse().unwrap_or_default()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
/// Error code reported by the gateway.
///
/// The gateway reports errors as negative numbers (`-7`); the value is preserved as-is even
/// when the code is unknown to this crate.
pub struct ErrorCode(i32);

impl ErrorCode {
    /// Used when the reply carried no parsable code, including the exhausted-retries placeholder.
    pub const UNKNOWN: Self = Self(0);

    /// Construct an error code from its integer representation.
    pub fn new(code: i32) -> Self {
        Self(code)
    }

    /// Get the integer code as provided by SMSC.RU.
    pub fn as_i32(self) -> i32 {
        self.0
    }

    /// The digit used in trace messages: the second character of the code as printed (`-7` → `7`).
    pub fn trace_digit(self) -> Option<char> {
        self.0.to_string().chars().nth(1)
    }

    /// Map this code to a known variant. The meaning of `-3` depends on the command.
    pub fn known(self, command: Command) -> Option<KnownErrorCode> {
        KnownErrorCode::from_code(self.0, command)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
/// Known SMSC.RU error codes.
pub enum KnownErrorCode {
    InvalidParameters,
    InvalidCredentials,
    InsufficientFunds,
    MessageNotFound,
    IpBlocked,
    InvalidDateFormat,
    MessageForbidden,
    InvalidPhoneFormat,
    Undeliverable,
    TooManyRequests,
}

impl KnownErrorCode {
    /// Convert a raw (negative) error code into a known variant.
    pub fn from_code(code: i32, command: Command) -> Option<Self> {
        Some(match (code.checked_abs()?, command) {
            (1, _) => Self::InvalidParameters,
            (2, _) => Self::InvalidCredentials,
            (3, Command::Status) => Self::MessageNotFound,
            (3, _) => Self::InsufficientFunds,
            (4, _) => Self::IpBlocked,
            (5, _) => Self::InvalidDateFormat,
            (6, _) => Self::MessageForbidden,
            (7, _) => Self::InvalidPhoneFormat,
            (8, _) => Self::Undeliverable,
            (9, _) => Self::TooManyRequests,
            _ => return None,
        })
    }

    /// Whether the request may succeed if repeated later.
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::TooManyRequests)
    }

    /// Whether the credentials or the caller's address were rejected.
    pub fn is_auth_error(self) -> bool {
        matches!(self, Self::InvalidCredentials | Self::IpBlocked)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
/// Delivery status of a message as reported by `status`.
pub struct DeliveryStatus(i32);

impl DeliveryStatus {
    /// Construct a status from its integer representation.
    pub fn new(code: i32) -> Self {
        Self(code)
    }

    /// Get the integer status as provided by SMSC.RU.
    pub fn as_i32(self) -> i32 {
        self.0
    }

    /// Map this status to a known variant, if one exists.
    pub fn known(self) -> Option<KnownDeliveryStatus> {
        KnownDeliveryStatus::from_code(self.0)
    }

    /// Whether the status will not change anymore.
    pub fn is_final(self) -> bool {
        matches!(self.known(), Some(kind) if kind.is_final())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
/// Known delivery statuses.
///
/// A single-id `status` reply with a negative status comes back as
/// `StatusOutcome::Rejected`, so the negative variants are only reached from raw codes:
/// a rejection's [`ErrorCode`] or a batch line.
pub enum KnownDeliveryStatus {
    /// `-3`: no message with this id and phone.
    NotFound,
    /// `-2`: sending was stopped.
    Stopped,
    /// `-1`: queued, not yet handed to the operator.
    AwaitingSend,
    PassedToOperator,
    Delivered,
    Read,
    Expired,
    LinkClicked,
    Undeliverable,
    InvalidNumber,
    Prohibited,
    InsufficientFunds,
    UnavailableNumber,
}

impl KnownDeliveryStatus {
    /// Convert a raw integer status into a known variant.
    pub fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            -3 => Self::NotFound,
            -2 => Self::Stopped,
            -1 => Self::AwaitingSend,
            0 => Self::PassedToOperator,
            1 => Self::Delivered,
            2 => Self::Read,
            3 => Self::Expired,
            4 => Self::LinkClicked,
            20 => Self::Undeliverable,
            22 => Self::InvalidNumber,
            23 => Self::Prohibited,
            24 => Self::InsufficientFunds,
            25 => Self::UnavailableNumber,
            _ => return None,
        })
    }

    pub fn is_final(self) -> bool {
        !matches!(
            self,
            Self::Stopped | Self::AwaitingSend | Self::PassedToOperator
        )
    }
}
