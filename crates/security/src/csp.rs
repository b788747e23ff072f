use std::fmt::Write;

use url::Url;

/// Builds a `Content-Security-Policy` header value for a deployment backed
/// by `provider_url`, allowing API and websocket connections to it.
///
/// An unparseable provider URL yields a policy without the backend origins
/// rather than a broken directive.
#[must_use]
pub fn generate_csp(provider_url: &str) -> String {
    let mut connect_src = String::from("connect-src 'self'");

    if let Ok(url) = Url::parse(provider_url) {
        if let Some(host) = url.host_str() {
            match url.port() {
                Some(port) => {
                    let _ = write!(connect_src, " https://{host}:{port} wss://{host}:{port}");
                }
                None => {
                    let _ = write!(connect_src, " https://{host} wss://{host}");
                }
            }
        }
    }

    [
        "default-src 'self'",
        "script-src 'self' 'unsafe-inline' 'unsafe-eval'",
        "style-src 'self' 'unsafe-inline'",
        "img-src 'self' data: https: blob:",
        "font-src 'self' data:",
        connect_src.as_str(),
        "frame-ancestors 'none'",
        "base-uri 'self'",
        "form-action 'self'",
    ]
    .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_origins() {
        let csp = generate_csp("https://abc.example.co");

        assert!(csp.contains("connect-src 'self' https://abc.example.co wss://abc.example.co"));
        assert!(csp.starts_with("default-src 'self'; "));
        assert!(csp.ends_with("form-action 'self'"));
    }

    #[test]
    fn test_explicit_port_kept() {
        let csp = generate_csp("http://localhost:54321");

        assert!(csp.contains("https://localhost:54321 wss://localhost:54321"));
    }

    #[test]
    fn test_invalid_provider_url() {
        let csp = generate_csp("not a url");

        assert!(csp.contains("connect-src 'self';"));
        assert!(csp.contains("frame-ancestors 'none'"));
    }
}
