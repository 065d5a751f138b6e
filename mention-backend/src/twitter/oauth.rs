//! OAuth 1.0a request signing for Twitter API v2.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

type HmacSha1 = Hmac<Sha1>;

#[derive(Clone)]
pub struct TwitterCredentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl TwitterCredentials {
    pub fn new(
        consumer_key: String,
        consumer_secret: String,
        access_token: String,
        access_token_secret: String,
    ) -> Self {
        Self {
            consumer_key,
            consumer_secret,
            access_token,
            access_token_secret,
        }
    }
}

// Secrets stay out of logs.
impl fmt::Debug for TwitterCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwitterCredentials")
            .field("consumer_key", &self.consumer_key)
            .finish_non_exhaustive()
    }
}

/// Build the `Authorization` header for a request.
///
/// `query` holds the request's query parameters unencoded; OAuth requires
/// them to be part of the signature base string.
pub fn generate_oauth_header(
    method: &str,
    url: &str,
    credentials: &TwitterCredentials,
    query: &[(&str, String)],
) -> String {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
        .to_string();

    let nonce: String = (0..32)
        .map(|_| format!("{:x}", rand::random::<u8>()))
        .collect();

    sign(method, url, credentials, query, &timestamp, &nonce)
}

fn sign(
    method: &str,
    url: &str,
    credentials: &TwitterCredentials,
    query: &[(&str, String)],
    timestamp: &str,
    nonce: &str,
) -> String {
    let oauth_params = [
        ("oauth_consumer_key", credentials.consumer_key.as_str()),
        ("oauth_nonce", nonce),
        ("oauth_signature_method", "HMAC-SHA1"),
        ("oauth_timestamp", timestamp),
        ("oauth_token", credentials.access_token.as_str()),
        ("oauth_version", "1.0"),
    ];

    let mut all_params: Vec<(String, String)> = oauth_params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .chain(query.iter().map(|(k, v)| (percent_encode(k), percent_encode(v))))
        .collect();
    all_params.sort();

    let param_string = all_params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let base_string = format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(url),
        percent_encode(&param_string)
    );

    let signing_key = format!(
        "{}&{}",
        percent_encode(&credentials.consumer_secret),
        percent_encode(&credentials.access_token_secret)
    );

    let mut mac = HmacSha1::new_from_slice(signing_key.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(base_string.as_bytes());
    let signature = BASE64.encode(mac.finalize().into_bytes());

    let auth_string = oauth_params
        .iter()
        .map(|(k, v)| (*k, *v))
        .chain(std::iter::once(("oauth_signature", signature.as_str())))
        .map(|(k, v)| format!("{}=\"{}\"", k, percent_encode(v)))
        .collect::<Vec<_>>()
        .join(", ");

    format!("OAuth {}", auth_string)
}

/// Percent-encode a string for OAuth (RFC 3986 unreserved set)
pub fn percent_encode(s: &str) -> String {
    let mut result = String::new();
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                result.push(byte as char);
            }
            _ => {
                result.push_str(&format!("%{:02X}", byte));
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> TwitterCredentials {
        TwitterCredentials::new(
            "xvz1evFS4wEEPTGEFPHBog".to_string(),
            "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw".to_string(),
            "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb".to_string(),
            "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE".to_string(),
        )
    }

    #[test]
    fn test_percent_encode() {
        assert_eq!(percent_encode("hello"), "hello");
        assert_eq!(percent_encode("hello world"), "hello%20world");
        assert_eq!(percent_encode("a=b&c=d"), "a%3Db%26c%3Dd");
        assert_eq!(percent_encode("author_id,text"), "author_id%2Ctext");
    }

    #[test]
    fn test_signature_is_deterministic_and_covers_query() {
        let url = "https://api.twitter.com/2/users/1/mentions";
        let query = vec![("max_results", "100".to_string())];
        let a = sign("GET", url, &credentials(), &query, "1318622958", "abc");
        let b = sign("GET", url, &credentials(), &query, "1318622958", "abc");
        assert_eq!(a, b);

        let other = vec![("max_results", "10".to_string())];
        let c = sign("GET", url, &credentials(), &other, "1318622958", "abc");
        assert_ne!(a, c);
    }

    #[test]
    fn test_header_shape() {
        let header =
            generate_oauth_header("GET", "https://api.twitter.com/2/tweets", &credentials(), &[]);
        assert!(header.starts_with("OAuth "));
        assert!(header.contains("oauth_consumer_key=\"xvz1evFS4wEEPTGEFPHBog\""));
        assert!(header.contains("oauth_signature=\""));
        assert!(header.contains("oauth_signature_method=\"HMAC-SHA1\""));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let dbg = format!("{:?}", credentials());
        assert!(!dbg.contains("kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw"));
    }
}
