//! Payment result callbacks (`ReturnURL`).

use std::collections::BTreeMap;

use ecshop_core::OrderId;

use super::EcpayError;
use super::check_mac::{self, CHECK_MAC_FIELD};

/// Fields of a callback body, keyed by parameter name.
#[derive(Debug, Clone, Default)]
pub struct CallbackPayload {
    fields: BTreeMap<String, String>,
}

/// State of a callback's `CheckMacValue`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signature {
    Valid,
    Invalid,
    Missing,
}

/// What a callback asks the shop to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// `RtnCode == 1`: mark the order paid.
    MarkPaid(OrderId),
    /// Any other code: drop the unpaid order.
    DeleteOrder { order_id: OrderId, reason: String },
}

impl CallbackPayload {
    /// Parse a JSON object or a form-urlencoded body.
    ///
    /// Non-string JSON scalars are kept in their JSON text form.
    ///
    /// # Errors
    ///
    /// Returns `EcpayError::MalformedCallback` if a JSON body is not an object.
    pub fn parse(body: &[u8]) -> Result<Self, EcpayError> {
        let trimmed = body.trim_ascii_start();
        let fields = if matches!(trimmed.first(), Some(b'{' | b'[')) {
            let object: serde_json::Map<String, serde_json::Value> =
                serde_json::from_slice(trimmed)
                    .map_err(|e| EcpayError::MalformedCallback(e.to_string()))?;
            object
                .into_iter()
                .map(|(key, value)| (key, json_scalar(value)))
                .collect()
        } else {
            url::form_urlencoded::parse(body).into_owned().collect()
        };

        Ok(Self { fields })
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn merchant_trade_no(&self) -> Option<&str> {
        self.get("MerchantTradeNo")
    }

    #[must_use]
    pub fn rtn_msg(&self) -> &str {
        self.get("RtnMsg").unwrap_or_default()
    }

    /// Check the `CheckMacValue` against the other fields.
    #[must_use]
    pub fn signature(&self, hash_key: &str, hash_iv: &str) -> Signature {
        let Some(received) = self.get(CHECK_MAC_FIELD) else {
            return Signature::Missing;
        };
        let params = self
            .fields
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()));

        if check_mac::verify(params, hash_key, hash_iv, received) {
            Signature::Valid
        } else {
            Signature::Invalid
        }
    }

    /// Decide what to do with the order named by the trade number.
    ///
    /// # Errors
    ///
    /// Returns `EcpayError::MalformedCallback` if the trade number or return
    /// code is missing or not numeric.
    pub fn outcome(&self) -> Result<CallbackOutcome, EcpayError> {
        let trade_no = self
            .merchant_trade_no()
            .ok_or_else(|| EcpayError::MalformedCallback("missing MerchantTradeNo".into()))?;
        let order_id = parse_trade_no(trade_no).ok_or_else(|| {
            EcpayError::MalformedCallback(format!("no order ID in trade number '{trade_no}'"))
        })?;
        let rtn_code = self
            .get("RtnCode")
            .and_then(|code| code.trim().parse::<i64>().ok())
            .ok_or_else(|| EcpayError::MalformedCallback("missing or non-numeric RtnCode".into()))?;

        if rtn_code == 1 {
            Ok(CallbackOutcome::MarkPaid(order_id))
        } else {
            Ok(CallbackOutcome::DeleteOrder {
                order_id,
                reason: self.rtn_msg().to_string(),
            })
        }
    }
}

/// Recover the order ID from a trade number.
///
/// Reads the digits after the last `ID`, or the whole value when there is
/// none.
#[must_use]
pub fn parse_trade_no(trade_no: &str) -> Option<OrderId> {
    let digits = trade_no
        .rfind("ID")
        .map_or(trade_no, |index| &trade_no[index + 2..]);
    digits.parse().ok()
}

fn json_scalar(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const HASH_KEY: &str = "pwFHCqoQZGmho4w6";
    const HASH_IV: &str = "EkRm7iFT261dpevs";

    #[test]
    fn test_parse_trade_no() {
        assert_eq!(parse_trade_no("EC0312153023ID42"), Some(OrderId::new(42)));
        assert_eq!(parse_trade_no("IDX0312153023ID9"), Some(OrderId::new(9)));
        assert_eq!(parse_trade_no("17"), Some(OrderId::new(17)));
        assert_eq!(parse_trade_no("EC0312153023IDabc"), None);
        assert_eq!(parse_trade_no("ecpay20230312153023"), None);
    }

    #[test]
    fn test_parse_json_body() {
        let body = br#"{"MerchantTradeNo":"EC0312153023ID5","RtnCode":1,"RtnMsg":"Succeeded"}"#;
        let payload = CallbackPayload::parse(body).unwrap();

        assert_eq!(payload.get("RtnCode"), Some("1"));
        assert_eq!(payload.outcome().unwrap(), CallbackOutcome::MarkPaid(OrderId::new(5)));
    }

    #[test]
    fn test_parse_form_body() {
        let body = b"MerchantTradeNo=EC0312153023ID5&RtnCode=10100058&RtnMsg=Payment+failed";
        let payload = CallbackPayload::parse(body).unwrap();

        assert_eq!(
            payload.outcome().unwrap(),
            CallbackOutcome::DeleteOrder {
                order_id: OrderId::new(5),
                reason: "Payment failed".to_string(),
            }
        );
    }

    #[test]
    fn test_string_rtn_code_in_json() {
        let body = br#"{"MerchantTradeNo":"ID3","RtnCode":"1"}"#;
        let payload = CallbackPayload::parse(body).unwrap();

        assert_eq!(payload.outcome().unwrap(), CallbackOutcome::MarkPaid(OrderId::new(3)));
    }

    #[test]
    fn test_non_numeric_order_id_is_malformed() {
        let payload = CallbackPayload::parse(b"MerchantTradeNo=ECxIDabc&RtnCode=1").unwrap();

        assert!(matches!(
            payload.outcome(),
            Err(EcpayError::MalformedCallback(_))
        ));
    }

    #[test]
    fn test_missing_rtn_code_is_malformed() {
        let payload = CallbackPayload::parse(b"MerchantTradeNo=ID3").unwrap();

        assert!(matches!(
            payload.outcome(),
            Err(EcpayError::MalformedCallback(_))
        ));
    }

    #[test]
    fn test_json_array_is_rejected() {
        assert!(matches!(
            CallbackPayload::parse(b"[1,2]"),
            Err(EcpayError::MalformedCallback(_))
        ));
        assert!(matches!(
            CallbackPayload::parse(b"  {not json"),
            Err(EcpayError::MalformedCallback(_))
        ));
    }

    #[test]
    fn test_signature_states() {
        let unsigned = CallbackPayload::parse(b"MerchantTradeNo=ID3&RtnCode=1").unwrap();
        assert_eq!(unsigned.signature(HASH_KEY, HASH_IV), Signature::Missing);

        let mac = check_mac::compute(
            [("MerchantTradeNo", "ID3"), ("RtnCode", "1")],
            HASH_KEY,
            HASH_IV,
        );
        let signed = CallbackPayload::parse(
            format!("MerchantTradeNo=ID3&RtnCode=1&CheckMacValue={mac}").as_bytes(),
        )
        .unwrap();
        assert_eq!(signed.signature(HASH_KEY, HASH_IV), Signature::Valid);

        let tampered = CallbackPayload::parse(
            format!("MerchantTradeNo=ID4&RtnCode=1&CheckMacValue={mac}").as_bytes(),
        )
        .unwrap();
        assert_eq!(tampered.signature(HASH_KEY, HASH_IV), Signature::Invalid);
    }
}
