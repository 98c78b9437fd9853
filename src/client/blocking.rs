use tokio::runtime::{Builder, Runtime};

use crate::domain::{
    BalanceOutcome, CheckCost, CheckStatus, CostOutcome, SendOutcome, SendSms, StatusOutcome,
};

use super::{SmscClient, SmscError};

/// Synchronous facade over [`SmscClient`].
///
/// Owns a single-threaded Tokio runtime and blocks the calling thread until the operation,
/// mirror failover included, has finished. Must not be used from inside an async context.
pub struct BlockingSmscClient {
    inner: SmscClient,
    runtime: Runtime,
}

impl BlockingSmscClient {
    pub(crate) fn new(inner: SmscClient) -> Result<Self, SmscError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(SmscError::Runtime)?;
        Ok(Self { inner, runtime })
    }

    /// The async client this facade drives.
    pub fn inner(&self) -> &SmscClient {
        &self.inner
    }

    pub fn send_sms(&self, request: SendSms) -> Result<SendOutcome, SmscError> {
        self.runtime.block_on(self.inner.send_sms(request))
    }

    pub fn send_text(
        &self,
        phones: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<SendOutcome, SmscError> {
        self.runtime.block_on(self.inner.send_text(phones, message))
    }

    pub fn check_cost(&self, request: CheckCost) -> Result<CostOutcome, SmscError> {
        self.runtime.block_on(self.inner.check_cost(request))
    }

    pub fn check_status(&self, request: CheckStatus) -> Result<StatusOutcome, SmscError> {
        self.runtime.block_on(self.inner.check_status(request))
    }

    pub fn status_of(
        &self,
        id: impl Into<String>,
        phone: impl Into<String>,
    ) -> Result<StatusOutcome, SmscError> {
        self.runtime.block_on(self.inner.status_of(id, phone))
    }

    pub fn get_balance(&self) -> Result<BalanceOutcome, SmscError> {
        self.runtime.block_on(self.inner.get_balance())
    }

    pub fn send_sms_mail(&self, request: &SendSms) -> Result<(), SmscError> {
        self.runtime.block_on(self.inner.send_sms_mail(request))
    }
}
