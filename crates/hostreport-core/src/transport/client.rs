//! libcurl-backed report POST.

use curl::easy::{Easy, List};

use super::classify::{classify_curl_error, classify_http_status};
use super::{report_url, Outcome, Transport, TransportOptions};

/// Posts report bodies to `{host}/report` with an `X-API-KEY` header.
///
/// Holds one curl easy handle for its whole lifetime so consecutive attempts
/// can reuse a keep-alive connection. The connection is closed when the
/// transport is dropped; create one transport per publish call.
pub struct CurlTransport {
    easy: Easy,
    url: String,
    api_key: String,
    options: TransportOptions,
}

impl CurlTransport {
    pub fn new(host: &str, api_key: &str, options: TransportOptions) -> Self {
        Self {
            easy: Easy::new(),
            url: report_url(host),
            api_key: api_key.to_string(),
            options,
        }
    }

    /// Endpoint this transport posts to.
    pub fn url(&self) -> &str {
        &self.url
    }

    fn prepare(&mut self, body: &[u8]) -> Result<(), curl::Error> {
        self.easy.url(&self.url)?;
        self.easy.post(true)?;
        self.easy.post_fields_copy(body)?;
        self.easy.follow_location(true)?;
        self.easy.connect_timeout(self.options.connect_timeout)?;
        self.easy.timeout(self.options.timeout)?;

        let mut list = List::new();
        list.append("Content-Type: application/json")?;
        list.append(&format!("X-API-KEY: {}", self.api_key))?;
        // No `Expect: 100-continue` round trip.
        list.append("Expect:")?;
        self.easy.http_headers(list)?;
        Ok(())
    }

    fn attempt(&mut self, body: &[u8]) -> Result<u32, curl::Error> {
        self.prepare(body)?;
        {
            let mut transfer = self.easy.transfer();
            // Response body is not parsed; drain it so libcurl does not print it.
            transfer.write_function(|data| Ok(data.len()))?;
            transfer.perform()?;
        }
        self.easy.response_code()
    }
}

impl Transport for CurlTransport {
    fn send(&mut self, body: &[u8]) -> Outcome {
        match self.attempt(body) {
            Ok(code) => classify_http_status(code),
            Err(e) => Outcome::TransportFailure {
                kind: classify_curl_error(&e),
                detail: e.to_string(),
            },
        }
    }
}
