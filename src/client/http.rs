use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;

use crate::domain::Command;
use crate::transport::{EncodedBody, PLACEHOLDER_RESPONSE};

use super::Scheme;
use super::trace::Tracer;

/// Boxed `Send` future used at the trait seams of the client.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The primary host plus four mirrors.
pub(crate) const MAX_ATTEMPTS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone)]
pub(crate) struct HttpRequest {
    pub(crate) method: Method,
    pub(crate) url: String,
    pub(crate) body: Option<EncodedBody>,
}

#[derive(Debug, Clone)]
pub(crate) struct HttpResponse {
    pub(crate) status: u16,
    pub(crate) body: String,
}

pub(crate) trait HttpTransport: Send + Sync {
    fn execute<'a>(
        &'a self,
        request: &'a HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
pub(crate) struct ReqwestTransport {
    pub(crate) client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn execute<'a>(
        &'a self,
        request: &'a HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let mut builder = match request.method {
                Method::Get => self.client.get(&request.url),
                Method::Post => self.client.post(&request.url),
            };
            if let Some(body) = &request.body {
                builder = builder
                    .header(reqwest::header::CONTENT_TYPE, body.content_type.as_str())
                    .body(body.bytes.clone());
            }

            let response = builder.send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

/// Everything needed to hit `/sys/<command>.php` on the primary host or a mirror.
#[derive(Debug)]
pub(crate) struct Exchange<'a> {
    pub(crate) scheme: Scheme,
    pub(crate) host: &'a str,
    pub(crate) command: Command,
    pub(crate) query: &'a str,
    /// `None` sends a GET with `query` in the URL.
    pub(crate) body: Option<EncodedBody>,
}

impl Exchange<'_> {
    fn endpoint(&self, attempt: u32) -> String {
        format!(
            "{}://{}/sys/{}.php",
            self.scheme.as_str(),
            mirror_host(self.host, attempt),
            self.command.as_str()
        )
    }

    fn request(&self, endpoint: &str) -> HttpRequest {
        match &self.body {
            Some(body) => HttpRequest {
                method: Method::Post,
                url: endpoint.to_owned(),
                body: Some(body.clone()),
            },
            None => HttpRequest {
                method: Method::Get,
                url: format!("{endpoint}?{}", self.query),
                body: None,
            },
        }
    }
}

/// Attempt 1 targets `base`; attempt `k >= 2` targets `www<k>.<base>`.
pub(crate) fn mirror_host(base: &str, attempt: u32) -> String {
    if attempt < 2 {
        base.to_owned()
    } else {
        format!("www{attempt}.{base}")
    }
}

/// Runs the exchange against the primary host and its mirrors until a non-empty body arrives.
///
/// Never fails: network errors and non-2xx statuses count as empty replies. After
/// [`MAX_ATTEMPTS`] empty replies the placeholder `","` is returned and one trace naming the
/// last endpoint is emitted.
pub(crate) async fn fetch(
    http: &dyn HttpTransport,
    tracer: &Tracer,
    exchange: &Exchange<'_>,
) -> String {
    let mut endpoint = String::new();

    for attempt in 1..=MAX_ATTEMPTS {
        endpoint = exchange.endpoint(attempt);
        let request = exchange.request(&endpoint);
        tracing::debug!(
            command = %exchange.command,
            attempt,
            host = %mirror_host(exchange.host, attempt),
            post = request.method == Method::Post,
            "smsc request"
        );

        match http.execute(&request).await {
            Ok(response) if !(200..=299).contains(&response.status) => {
                tracing::warn!(
                    command = %exchange.command,
                    attempt,
                    status = response.status,
                    "smsc gateway answered with non-success status"
                );
            }
            Ok(response) if response.body.trim().is_empty() => {
                tracing::warn!(command = %exchange.command, attempt, "smsc gateway sent an empty body");
            }
            Ok(response) => return response.body,
            Err(err) => {
                tracing::warn!(command = %exchange.command, attempt, error = %err, "smsc request failed");
            }
        }
    }

    tracing::warn!(
        command = %exchange.command,
        attempts = MAX_ATTEMPTS,
        "smsc gateway unreachable on every mirror"
    );
    tracer.emit(&format!("Failed to read URL: {endpoint}"));
    PLACEHOLDER_RESPONSE.to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirror_hosts_follow_attempt_number() {
        let hosts = (1..=MAX_ATTEMPTS)
            .map(|attempt| mirror_host("smsc.ru", attempt))
            .collect::<Vec<_>>();
        assert_eq!(
            hosts,
            [
                "smsc.ru",
                "www2.smsc.ru",
                "www3.smsc.ru",
                "www4.smsc.ru",
                "www5.smsc.ru"
            ]
        );
    }

    #[test]
    fn get_puts_query_in_url_and_post_keeps_it_out() {
        let get = Exchange {
            scheme: Scheme::Https,
            host: "smsc.ru",
            command: Command::Balance,
            query: "login=a&psw=b",
            body: None,
        };
        let request = get.request(&get.endpoint(1));
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.url, "https://smsc.ru/sys/balance.php?login=a&psw=b");

        let post = Exchange {
            body: Some(EncodedBody::url_encoded(&[("login".to_owned(), "a".to_owned())])),
            ..get
        };
        let request = post.request(&post.endpoint(3));
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.url, "https://www3.smsc.ru/sys/balance.php");
        assert_eq!(request.body.map(|body| body.bytes), Some(b"login=a".to_vec()));
    }
}
