//! ECPay `CheckMacValue` signing.
//!
//! The gateway signs with SHA-256 over the sorted parameter string wrapped in
//! `HashKey`/`HashIV`, URL-encoded the way .NET's `HttpUtility.UrlEncode`
//! does it and then lowercased.

use sha2::{Digest, Sha256};

/// Name of the signature parameter.
pub const CHECK_MAC_FIELD: &str = "CheckMacValue";

/// Compute the `CheckMacValue` for a parameter set.
///
/// Any `CheckMacValue` already present in `params` is ignored.
#[must_use]
pub fn compute<'a, I>(params: I, hash_key: &str, hash_iv: &str) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut pairs: Vec<(&str, &str)> = params
        .into_iter()
        .filter(|(key, _)| *key != CHECK_MAC_FIELD)
        .collect();
    pairs.sort_by(|(a, _), (b, _)| a.to_lowercase().cmp(&b.to_lowercase()));

    let mut raw = format!("HashKey={hash_key}");
    for (key, value) in pairs {
        raw.push('&');
        raw.push_str(key);
        raw.push('=');
        raw.push_str(value);
    }
    raw.push_str("&HashIV=");
    raw.push_str(hash_iv);

    let encoded = dotnet_url_encode(&raw).to_lowercase();
    hex::encode_upper(Sha256::digest(encoded.as_bytes()))
}

/// Check a received `CheckMacValue` against the parameters it came with.
#[must_use]
pub fn verify<'a, I>(params: I, hash_key: &str, hash_iv: &str, received: &str) -> bool
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let expected = compute(params, hash_key, hash_iv);
    constant_time_compare(&expected, &received.to_ascii_uppercase())
}

/// Percent-encode, then undo the escapes .NET leaves alone.
fn dotnet_url_encode(raw: &str) -> String {
    urlencoding::encode(raw)
        .into_owned()
        .replace("%20", "+")
        .replace("%21", "!")
        .replace("%2A", "*")
        .replace("%28", "(")
        .replace("%29", ")")
        .replace('~', "%7E")
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }

    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH_KEY: &str = "pwFHCqoQZGmho4w6";
    const HASH_IV: &str = "EkRm7iFT261dpevs";

    // Reference request from ECPay's AIO integration guide.
    fn reference_params() -> Vec<(&'static str, &'static str)> {
        vec![
            ("TradeDesc", "促銷方案"),
            ("PaymentType", "aio"),
            ("MerchantTradeDate", "2023/03/12 15:30:23"),
            ("MerchantTradeNo", "ecpay20230312153023"),
            ("MerchantID", "3002607"),
            ("ReturnURL", "https://www.ecpay.com.tw/receive.php"),
            ("ItemName", "Apple iphone 15"),
            ("TotalAmount", "30000"),
            ("ChoosePayment", "ALL"),
            ("EncryptType", "1"),
        ]
    }

    const REFERENCE_MAC: &str = "6C51C9E6888DE861FD62FB1DD17029FC742634498FD813DC43D4243B5685B840";

    #[test]
    fn test_reference_vector() {
        assert_eq!(compute(reference_params(), HASH_KEY, HASH_IV), REFERENCE_MAC);
    }

    #[test]
    fn test_existing_check_mac_is_ignored() {
        let mut params = reference_params();
        params.push((CHECK_MAC_FIELD, "stale"));

        assert_eq!(compute(params, HASH_KEY, HASH_IV), REFERENCE_MAC);
    }

    #[test]
    fn test_verify_accepts_lowercase_hex() {
        assert!(verify(
            reference_params(),
            HASH_KEY,
            HASH_IV,
            &REFERENCE_MAC.to_lowercase()
        ));
    }

    #[test]
    fn test_verify_rejects_tampered_amount() {
        let mut params = reference_params();
        params.retain(|(key, _)| *key != "TotalAmount");
        params.push(("TotalAmount", "1"));

        assert!(!verify(params, HASH_KEY, HASH_IV, REFERENCE_MAC));
    }

    #[test]
    fn test_dotnet_url_encode() {
        assert_eq!(dotnet_url_encode("a b"), "a+b");
        assert_eq!(dotnet_url_encode("(x)!*"), "(x)!*");
        assert_eq!(dotnet_url_encode("-_."), "-_.");
        assert_eq!(dotnet_url_encode("~"), "%7E");
        assert_eq!(dotnet_url_encode("a=b&c"), "a%3Db%26c");
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("ABC", "ABC"));
        assert!(!constant_time_compare("ABC", "ABD"));
        assert!(!constant_time_compare("ABC", "AB"));
    }
}
