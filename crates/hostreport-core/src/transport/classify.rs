//! Classify HTTP status and curl errors into delivery outcomes.

use super::{FailureKind, Outcome};

/// Classify a response status. 2xx delivers, 429 is the only retryable rejection.
pub fn classify_http_status(code: u32) -> Outcome {
    match code {
        200..=299 => Outcome::Delivered,
        429 => Outcome::Rejected {
            status: 429,
            retryable: true,
        },
        _ => Outcome::Rejected {
            status: u16::try_from(code).unwrap_or(u16::MAX),
            retryable: false,
        },
    }
}

/// Classify a curl error (no response received).
pub fn classify_curl_error(e: &curl::Error) -> FailureKind {
    if e.is_operation_timedout() {
        return FailureKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
    {
        return FailureKind::Connect;
    }
    FailureKind::Other
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_2xx_delivered() {
        assert_eq!(classify_http_status(200), Outcome::Delivered);
        assert_eq!(classify_http_status(201), Outcome::Delivered);
        assert_eq!(classify_http_status(204), Outcome::Delivered);
    }

    #[test]
    fn http_429_retryable() {
        assert_eq!(
            classify_http_status(429),
            Outcome::Rejected {
                status: 429,
                retryable: true
            }
        );
    }

    #[test]
    fn other_statuses_terminal() {
        for code in [400, 401, 403, 404, 500, 502, 503] {
            assert_eq!(
                classify_http_status(code),
                Outcome::Rejected {
                    status: code as u16,
                    retryable: false
                },
                "status {code}"
            );
        }
    }

    #[test]
    fn curl_timeout_and_connect() {
        // CURLE_OPERATION_TIMEDOUT = 28, CURLE_COULDNT_CONNECT = 7, CURLE_SSL_CONNECT_ERROR = 35
        assert_eq!(classify_curl_error(&curl::Error::new(28)), FailureKind::Timeout);
        assert_eq!(classify_curl_error(&curl::Error::new(7)), FailureKind::Connect);
        assert_eq!(classify_curl_error(&curl::Error::new(35)), FailureKind::Other);
    }
}
