//! Client layer: orchestrates transport calls and maps transport ↔ domain.

use std::error::Error as StdError;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::domain::{
    BalanceOutcome, CheckCost, CheckStatus, Command, CostOutcome, Login, MessageId, MessageText,
    Password, RawPhoneNumber, SendOptions, SendOutcome, SendSms, StatusDetail, StatusOutcome,
    ValidationError,
};
use crate::transport::{EncodeError, EncodedBody, ResponseFields};

mod blocking;
mod http;
mod mail;
mod trace;

pub use blocking::BlockingSmscClient;
pub use http::BoxFuture;
pub use mail::{MailRelay, RELAY_MAILBOX, RelayMail};
pub use trace::TraceSink;

use http::{Exchange, HttpTransport, ReqwestTransport};
use mail::MailSettings;
use trace::Tracer;

const DEFAULT_HOST: &str = "smsc.ru";
const DEFAULT_CHARSET: &str = "utf-8";
/// `fmt=1`: comma-separated plaintext replies.
const PLAIN_FORMAT: &str = "1";

const ENV_LOGIN: &str = "SMSC_LOGIN";
const ENV_PASSWORD: &str = "SMSC_PASSWORD";
const ENV_HTTPS: &str = "SMSC_HTTPS";
const ENV_CHARSET: &str = "SMSC_CHARSET";
const ENV_POST: &str = "SMSC_POST";
const ENV_HOST: &str = "SMSC_HOST";

/// Account credentials sent with every request as `login` and `psw`.
///
/// The password may also be its lowercase MD5 hash; the gateway accepts both.
#[derive(Debug, Clone)]
pub struct Credentials {
    login: Login,
    password: Password,
}

impl Credentials {
    /// Validate that both parts are non-empty.
    pub fn new(
        login: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            login: Login::new(login)?,
            password: Password::new(password)?,
        })
    }

    pub fn login(&self) -> &Login {
        &self.login
    }

    fn push_params(&self, params: &mut Vec<(String, String)>, charset: &str) {
        params.push((Login::FIELD.to_owned(), self.login.as_str().to_owned()));
        params.push((Password::FIELD.to_owned(), self.password.as_str().to_owned()));
        params.push(("fmt".to_owned(), PLAIN_FORMAT.to_owned()));
        params.push(("charset".to_owned(), charset.to_owned()));
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Scheme {
    Http,
    #[default]
    Https,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`SmscClient`].
///
/// Gateway rejections and unreachable mirrors are not errors: they surface as the `Rejected`
/// variant of each operation's outcome. This type covers misuse and local failures.
pub enum SmscError {
    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// An attached file could not be read.
    #[error("cannot read attachment {}: {source}", .path.display())]
    Attachment {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// [`SmscClient::send_sms_mail`] was called without a configured relay.
    #[error("mail relay is not configured")]
    MailRelayNotConfigured,

    /// The mail relay failed to deliver.
    #[error("mail relay error: {0}")]
    MailRelay(#[source] Box<dyn StdError + Send + Sync>),

    /// The HTTP client could not be built.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// The runtime behind [`BlockingSmscClient`] could not start.
    #[error("runtime error: {0}")]
    Runtime(#[source] std::io::Error),

    /// An environment variable read by [`SmscClientBuilder::from_env`] is missing or malformed.
    #[error("environment variable {name}: {reason}")]
    Env { name: &'static str, reason: String },
}

impl From<EncodeError> for SmscError {
    fn from(err: EncodeError) -> Self {
        match err {
            EncodeError::Attachment { path, source } => Self::Attachment { path, source },
        }
    }
}

#[derive(Debug, Clone)]
/// Builder for [`SmscClient`].
///
/// Defaults: HTTPS, `utf-8`, host `smsc.ru`, GET requests, no timeout or user-agent override.
pub struct SmscClientBuilder {
    credentials: Credentials,
    scheme: Scheme,
    charset: String,
    host: String,
    post: bool,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    tracer: Tracer,
    mail: Option<MailSettings>,
}

impl SmscClientBuilder {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            scheme: Scheme::default(),
            charset: DEFAULT_CHARSET.to_owned(),
            host: DEFAULT_HOST.to_owned(),
            post: false,
            timeout: None,
            user_agent: None,
            tracer: Tracer::default(),
            mail: None,
        }
    }

    /// Read settings from the environment.
    ///
    /// Requires `SMSC_LOGIN` and `SMSC_PASSWORD`. Optional: `SMSC_HTTPS` and `SMSC_POST`
    /// (`1`/`0`, `true`/`false`, `yes`/`no`), `SMSC_CHARSET`, `SMSC_HOST`.
    pub fn from_env() -> Result<Self, SmscError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SmscError> {
        let required = |name: &'static str| {
            lookup(name).ok_or_else(|| SmscError::Env {
                name,
                reason: "not set".to_owned(),
            })
        };
        let credentials = Credentials::new(required(ENV_LOGIN)?, required(ENV_PASSWORD)?)?;

        let mut builder = Self::new(credentials);
        if let Some(https) = lookup(ENV_HTTPS) {
            builder.scheme = if parse_flag(ENV_HTTPS, &https)? {
                Scheme::Https
            } else {
                Scheme::Http
            };
        }
        if let Some(post) = lookup(ENV_POST) {
            builder.post = parse_flag(ENV_POST, &post)?;
        }
        if let Some(charset) = lookup(ENV_CHARSET).filter(|value| !value.trim().is_empty()) {
            builder.charset = charset.trim().to_owned();
        }
        if let Some(host) = lookup(ENV_HOST).filter(|value| !value.trim().is_empty()) {
            builder.host = host.trim().to_owned();
        }
        Ok(builder)
    }

    pub fn scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Charset tag sent as `charset` (`utf-8`, `koi8-r`, `windows-1251`).
    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = charset.into();
        self
    }

    /// Base host. Mirrors are derived as `www2.<host>` through `www5.<host>`.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Start in POST mode. Attaching files switches to POST regardless.
    pub fn post(mut self, post: bool) -> Self {
        self.post = post;
        self
    }

    /// Set an HTTP client timeout applied to each attempt.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Receive a human-readable line after every operation and on mirror exhaustion.
    pub fn trace_sink(mut self, sink: impl TraceSink + 'static) -> Self {
        self.tracer = Tracer::new(Arc::new(sink));
        self
    }

    /// Enable [`SmscClient::send_sms_mail`], sending as `from` through `relay`.
    pub fn mail_relay(mut self, from: impl Into<String>, relay: impl MailRelay + 'static) -> Self {
        self.mail = Some(MailSettings {
            from: from.into(),
            relay: Arc::new(relay),
        });
        self
    }

    pub fn build(self) -> Result<SmscClient, SmscError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent.as_deref() {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| SmscError::Transport(Box::new(err)))?;

        Ok(self.assemble(Arc::new(ReqwestTransport { client })))
    }

    /// Build a [`BlockingSmscClient`] driving its own single-threaded runtime.
    pub fn build_blocking(self) -> Result<BlockingSmscClient, SmscError> {
        BlockingSmscClient::new(self.build()?)
    }

    fn assemble(self, http: Arc<dyn HttpTransport>) -> SmscClient {
        SmscClient {
            credentials: self.credentials,
            scheme: self.scheme,
            charset: self.charset,
            host: self.host,
            post: Arc::new(AtomicBool::new(self.post)),
            http,
            tracer: self.tracer,
            mail: self.mail,
        }
    }
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, SmscError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(SmscError::Env {
            name,
            reason: format!("expected a boolean flag, got {other:?}"),
        }),
    }
}

#[derive(Clone)]
/// High-level SMSC.RU client.
///
/// Every operation encodes its parameters, calls `/sys/<command>.php` on the primary host and up
/// to four mirrors, and maps the plaintext reply to a typed outcome. Gateway rejections come back
/// as `Rejected` outcomes, not as `Err`.
///
/// Clones share the POST flag, so one clone attaching files switches all of them to POST.
pub struct SmscClient {
    credentials: Credentials,
    scheme: Scheme,
    charset: String,
    host: String,
    /// Upgraded to `true` when files are attached; never reset.
    post: Arc<AtomicBool>,
    http: Arc<dyn HttpTransport>,
    tracer: Tracer,
    mail: Option<MailSettings>,
}

impl SmscClient {
    /// Create a client with default settings.
    ///
    /// For more customization, use [`SmscClient::builder`].
    pub fn new(credentials: Credentials) -> Result<Self, SmscError> {
        SmscClientBuilder::new(credentials).build()
    }

    pub fn builder(credentials: Credentials) -> SmscClientBuilder {
        SmscClientBuilder::new(credentials)
    }

    /// Whether requests currently go out as POST.
    pub fn uses_post(&self) -> bool {
        self.post.load(Ordering::Relaxed)
    }

    /// Switch to POST for the rest of this client's lifetime.
    pub fn upgrade_to_post(&self) {
        self.post.store(true, Ordering::Relaxed);
    }

    /// Send one text to many recipients, or distinct texts per recipient.
    ///
    /// Attachments in [`SendOptions::files`] are sent as `multipart/form-data` and upgrade the
    /// client to POST. Returns `Err` only when an attachment cannot be read.
    pub async fn send_sms(&self, request: SendSms) -> Result<SendOutcome, SmscError> {
        let params = crate::transport::encode_send_sms_params(&request);
        let fields = self
            .call(Command::Send, params, &request.options().files)
            .await?;

        let outcome = crate::transport::decode_send_sms_response(&fields);
        self.tracer.emit(&trace::describe_send(&outcome));
        Ok(outcome)
    }

    /// Send `message` to a comma-separated list of `phones` with default options.
    pub async fn send_text(
        &self,
        phones: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<SendOutcome, SmscError> {
        let request = SendSms::to_many(
            vec![RawPhoneNumber::new(phones)?],
            MessageText::new(message)?,
            SendOptions::default(),
        )?;
        self.send_sms(request).await
    }

    /// Quote a message without sending it.
    pub async fn check_cost(&self, request: CheckCost) -> Result<CostOutcome, SmscError> {
        let params = crate::transport::encode_check_cost_params(&request);
        let fields = self.call(Command::Send, params, &[]).await?;

        let outcome = crate::transport::decode_check_cost_response(&fields);
        self.tracer.emit(&trace::describe_cost(&outcome));
        Ok(outcome)
    }

    /// Query delivery status for one message, or several at once.
    ///
    /// Several ids switch the gateway to line-per-message replies, returned as
    /// [`StatusOutcome::Batch`].
    pub async fn check_status(&self, request: CheckStatus) -> Result<StatusOutcome, SmscError> {
        let params = crate::transport::encode_check_status_params(&request);
        let fields = self.call(Command::Status, params, &[]).await?;

        let outcome = crate::transport::decode_check_status_response(&request, fields);
        self.tracer.emit(&trace::describe_status(&outcome));
        Ok(outcome)
    }

    /// Extended status (`all=1`) of a single message.
    pub async fn status_of(
        &self,
        id: impl Into<String>,
        phone: impl Into<String>,
    ) -> Result<StatusOutcome, SmscError> {
        let request = CheckStatus::one(MessageId::new(id)?, RawPhoneNumber::new(phone)?)
            .with_detail(StatusDetail::Extended);
        self.check_status(request).await
    }

    pub async fn get_balance(&self) -> Result<BalanceOutcome, SmscError> {
        let params = crate::transport::encode_balance_params();
        let fields = self.call(Command::Balance, params, &[]).await?;

        let outcome = crate::transport::decode_balance_response(&fields);
        self.tracer.emit(&trace::describe_balance(&outcome));
        Ok(outcome)
    }

    /// Send through the e-mail relay instead of HTTP.
    ///
    /// Per-recipient texts, attachments and extra parameters cannot be expressed in a relay mail
    /// and are rejected with [`SmscError::Validation`].
    pub async fn send_sms_mail(&self, request: &SendSms) -> Result<(), SmscError> {
        let mail = self.mail.as_ref().ok_or(SmscError::MailRelayNotConfigured)?;
        let body = crate::transport::compose_mail_body(
            &self.credentials.login,
            &self.credentials.password,
            request,
        )?;

        tracing::debug!(from = %mail.from, "smsc relay mail");
        mail.relay
            .deliver(RelayMail {
                to: RELAY_MAILBOX.to_owned(),
                from: mail.from.clone(),
                charset: self.charset.clone(),
                body,
            })
            .await
            .map_err(SmscError::MailRelay)
    }

    async fn call(
        &self,
        command: Command,
        params: Vec<(String, String)>,
        files: &[PathBuf],
    ) -> Result<ResponseFields, SmscError> {
        if !files.is_empty() {
            self.upgrade_to_post();
        }

        let mut all = Vec::with_capacity(params.len() + 4);
        self.credentials.push_params(&mut all, &self.charset);
        all.extend(params);

        let query = crate::transport::query_string(&all);
        let body = self.body(&all, files)?;
        let exchange = Exchange {
            scheme: self.scheme,
            host: &self.host,
            command,
            query: &query,
            body,
        };

        let raw = http::fetch(self.http.as_ref(), &self.tracer, &exchange).await;
        Ok(ResponseFields::parse(command, &query, &raw))
    }

    fn body(
        &self,
        params: &[(String, String)],
        files: &[PathBuf],
    ) -> Result<Option<EncodedBody>, SmscError> {
        if !files.is_empty() {
            return Ok(Some(EncodedBody::multipart(params, files, &self.charset)?));
        }
        if self.uses_post() {
            return Ok(Some(EncodedBody::url_encoded(params)));
        }
        Ok(None)
    }
}
