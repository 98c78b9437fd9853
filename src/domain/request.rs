use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::domain::validation::ValidationError;
use crate::domain::value::{
    DeliveryTime, MessageId, MessageText, RawPhoneNumber, SendId, SenderId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Transliteration applied by the gateway (`translit`).
pub enum Translit {
    #[default]
    Off,
    /// Cyrillic to Latin.
    Latin,
    /// Cyrillic rendered with look-alike Latin characters.
    Mixed,
}

impl Translit {
    pub const FIELD: &'static str = "translit";

    pub fn code(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::Latin => 1,
            Self::Mixed => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Kind of message to send.
pub enum MessageFormat {
    #[default]
    Sms,
    Flash,
    Push,
    Hlr,
    Bin,
    BinHex,
    Ping,
    Mms,
    Mail,
    Call,
}

impl MessageFormat {
    /// Numeric code used in the mail relay body.
    pub fn code(self) -> u8 {
        match self {
            Self::Sms => 0,
            Self::Flash => 1,
            Self::Push => 2,
            Self::Hlr => 3,
            Self::Bin => 4,
            Self::BinHex => 5,
            Self::Ping => 6,
            Self::Mms => 7,
            Self::Mail => 8,
            Self::Call => 9,
        }
    }

    /// Request parameter selecting this format; plain SMS needs none.
    pub fn param(self) -> Option<(&'static str, &'static str)> {
        Some(match self {
            Self::Sms => return None,
            Self::Flash => ("flash", "1"),
            Self::Push => ("push", "1"),
            Self::Hlr => ("hlr", "1"),
            Self::Bin => ("bin", "1"),
            Self::BinHex => ("bin", "2"),
            Self::Ping => ("ping", "1"),
            Self::Mms => ("mms", "1"),
            Self::Mail => ("mail", "1"),
            Self::Call => ("call", "1"),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    pub translit: Translit,
    pub time: Option<DeliveryTime>,
    pub id: Option<SendId>,
    pub format: MessageFormat,
    pub sender: Option<SenderId>,
    /// Additional gateway parameters (`valid`, `maxsms`, `subj`, ...), appended in order.
    pub extra: Vec<(String, String)>,
    /// Files attached to the request. Attaching any switches the client to POST for good.
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone)]
pub enum SendSms {
    /// One text to every recipient (`phones` + `mes`).
    ToMany(ToMany),
    /// A distinct text per recipient (`list`).
    PerRecipient(PerRecipient),
}

#[derive(Debug, Clone)]
pub struct ToMany {
    recipients: Vec<RawPhoneNumber>,
    msg: MessageText,
    options: SendOptions,
}

#[derive(Debug, Clone)]
pub struct PerRecipient {
    messages: BTreeMap<RawPhoneNumber, MessageText>,
    options: SendOptions,
}

impl SendSms {
    pub fn to_many(
        recipients: Vec<RawPhoneNumber>,
        msg: MessageText,
        options: SendOptions,
    ) -> Result<Self, ValidationError> {
        if recipients.is_empty() {
            return Err(ValidationError::Empty {
                field: RawPhoneNumber::FIELD,
            });
        }
        Ok(Self::ToMany(ToMany {
            recipients,
            msg,
            options,
        }))
    }

    pub fn per_recipient(
        messages: BTreeMap<RawPhoneNumber, MessageText>,
        options: SendOptions,
    ) -> Result<Self, ValidationError> {
        if messages.is_empty() {
            return Err(ValidationError::Empty {
                field: RawPhoneNumber::FIELD,
            });
        }
        Ok(Self::PerRecipient(PerRecipient { messages, options }))
    }

    pub fn options(&self) -> &SendOptions {
        match self {
            Self::ToMany(to_many) => &to_many.options,
            Self::PerRecipient(per_recipient) => &per_recipient.options,
        }
    }
}

impl ToMany {
    pub fn recipients(&self) -> &[RawPhoneNumber] {
        &self.recipients
    }

    pub fn msg(&self) -> &MessageText {
        &self.msg
    }

    pub fn options(&self) -> &SendOptions {
        &self.options
    }
}

impl PerRecipient {
    pub fn messages(&self) -> &BTreeMap<RawPhoneNumber, MessageText> {
        &self.messages
    }

    pub fn options(&self) -> &SendOptions {
        &self.options
    }
}

#[derive(Debug, Clone, Default)]
pub struct CheckCostOptions {
    pub translit: Translit,
    pub format: MessageFormat,
    pub sender: Option<SenderId>,
    pub extra: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
/// Cost query for a message that is not sent.
pub struct CheckCost {
    recipients: Vec<RawPhoneNumber>,
    msg: MessageText,
    options: CheckCostOptions,
}

impl CheckCost {
    pub fn new(
        recipients: Vec<RawPhoneNumber>,
        msg: MessageText,
        options: CheckCostOptions,
    ) -> Result<Self, ValidationError> {
        if recipients.is_empty() {
            return Err(ValidationError::Empty {
                field: RawPhoneNumber::FIELD,
            });
        }
        Ok(Self {
            recipients,
            msg,
            options,
        })
    }

    pub fn recipients(&self) -> &[RawPhoneNumber] {
        &self.recipients
    }

    pub fn msg(&self) -> &MessageText {
        &self.msg
    }

    pub fn options(&self) -> &CheckCostOptions {
        &self.options
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// How much the gateway returns per message (`all`).
pub enum StatusDetail {
    /// Status, change time, delivery error.
    #[default]
    Basic,
    /// Adds send time, phone, cost, sender, status name and text.
    Extended,
    /// Adds country, operator and region on top of [`StatusDetail::Extended`].
    Full,
}

impl StatusDetail {
    pub const FIELD: &'static str = "all";

    pub fn code(self) -> u8 {
        match self {
            Self::Basic => 0,
            Self::Extended => 1,
            Self::Full => 2,
        }
    }
}

#[derive(Debug, Clone)]
/// Status query for one message, or for several at once.
///
/// Invariant: at least one id, and exactly one phone per id.
pub struct CheckStatus {
    ids: Vec<MessageId>,
    phones: Vec<RawPhoneNumber>,
    detail: StatusDetail,
}

impl CheckStatus {
    pub fn new(
        ids: Vec<MessageId>,
        phones: Vec<RawPhoneNumber>,
    ) -> Result<Self, ValidationError> {
        if ids.is_empty() {
            return Err(ValidationError::Empty {
                field: MessageId::FIELD,
            });
        }
        if ids.len() != phones.len() {
            return Err(ValidationError::IdPhoneCountMismatch {
                ids: ids.len(),
                phones: phones.len(),
            });
        }
        Ok(Self {
            ids,
            phones,
            detail: StatusDetail::default(),
        })
    }

    pub fn one(id: MessageId, phone: RawPhoneNumber) -> Self {
        Self {
            ids: vec![id],
            phones: vec![phone],
            detail: StatusDetail::default(),
        }
    }

    pub fn with_detail(mut self, detail: StatusDetail) -> Self {
        self.detail = detail;
        self
    }

    pub fn ids(&self) -> &[MessageId] {
        &self.ids
    }

    pub fn phones(&self) -> &[RawPhoneNumber] {
        &self.phones
    }

    pub fn detail(&self) -> StatusDetail {
        self.detail
    }

    /// Whether more than one message is queried.
    pub fn is_batch(&self) -> bool {
        self.ids.len() > 1
    }

    /// Ids joined the way they are sent (`1,2,3`).
    pub fn joined_ids(&self) -> String {
        self.ids
            .iter()
            .map(MessageId::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}
