//! AIO checkout form generation.

use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use serde::Deserialize;

use ecshop_core::{OrderId, whole_amount};

use super::EcpayError;
use super::check_mac::{self, CHECK_MAC_FIELD};
use crate::config::EcpayConfig;
use crate::models::OrderDetailSummary;

/// ECPay timestamps are Taiwan local time (UTC+8).
const TAIPEI_OFFSET_SECS: i32 = 8 * 3600;
const MAX_TRADE_NO_LENGTH: usize = 20;
const MAX_ITEM_NAME_CHARS: usize = 400;
const MAX_TRADE_DESC_CHARS: usize = 200;
const DEFAULT_TRADE_DESC: &str = "EC Shop order";

/// Body for `POST /pages/ecpay/send`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub orders_id: OrderId,
    /// Amount the client expects to pay; must match the stored order.
    #[serde(default)]
    pub total_amount: Option<Decimal>,
    /// Defaults to the order's line items.
    #[serde(default)]
    pub item_name: Option<String>,
    #[serde(default)]
    pub trade_desc: Option<String>,
}

/// A signed AIO checkout request, ready to post to the gateway.
#[derive(Debug, Clone)]
pub struct CheckoutForm {
    pub action: String,
    pub fields: Vec<(&'static str, String)>,
}

impl CheckoutForm {
    /// Look up a field value.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Build a signed checkout form for an order.
///
/// # Errors
///
/// Returns `EcpayError::InvalidAmount` if the amount does not round to a
/// positive whole number, or `EcpayError::TradeNoTooLong` if the order ID
/// does not fit in a trade number.
pub fn build_checkout_form(
    config: &EcpayConfig,
    order_id: OrderId,
    amount: Decimal,
    item_name: &str,
    trade_desc: &str,
    now: DateTime<Utc>,
) -> Result<CheckoutForm, EcpayError> {
    let total = whole_amount(amount)
        .filter(|total| *total > 0)
        .ok_or(EcpayError::InvalidAmount)?;

    let local = to_taipei(now);
    let trade_no = merchant_trade_no(&config.trade_no_prefix, local, order_id)?;

    let mut fields: Vec<(&'static str, String)> = vec![
        ("MerchantID", config.merchant_id.clone()),
        ("MerchantTradeNo", trade_no),
        (
            "MerchantTradeDate",
            local.format("%Y/%m/%d %H:%M:%S").to_string(),
        ),
        ("PaymentType", "aio".to_string()),
        ("TotalAmount", total.to_string()),
        ("TradeDesc", truncate_chars(trade_desc, MAX_TRADE_DESC_CHARS)),
        ("ItemName", truncate_chars(item_name, MAX_ITEM_NAME_CHARS)),
        ("ReturnURL", config.return_url.clone()),
        ("ChoosePayment", "ALL".to_string()),
        ("EncryptType", "1".to_string()),
    ];
    if let Some(url) = &config.client_back_url {
        fields.push(("ClientBackURL", url.clone()));
    }

    let mac = check_mac::compute(
        fields.iter().map(|(key, value)| (*key, value.as_str())),
        config.hash_key.expose_secret(),
        config.hash_iv.expose_secret(),
    );
    fields.push((CHECK_MAC_FIELD, mac));

    Ok(CheckoutForm {
        action: config.gateway_url.clone(),
        fields,
    })
}

/// `<prefix><MMddHHmmss>ID<orderId>`.
///
/// # Errors
///
/// Returns `EcpayError::TradeNoTooLong` past the gateway's 20 characters.
pub fn merchant_trade_no(
    prefix: &str,
    at: DateTime<FixedOffset>,
    order_id: OrderId,
) -> Result<String, EcpayError> {
    let trade_no = format!("{prefix}{}ID{order_id}", at.format("%m%d%H%M%S"));
    if trade_no.len() > MAX_TRADE_NO_LENGTH {
        return Err(EcpayError::TradeNoTooLong(trade_no));
    }
    Ok(trade_no)
}

/// Describe an order's lines as `name x qty`, `#`-separated.
#[must_use]
pub fn item_name_from_lines(lines: &[OrderDetailSummary]) -> Option<String> {
    if lines.is_empty() {
        return None;
    }
    Some(
        lines
            .iter()
            .map(|line| format!("{} x {}", line.product_name, line.quantity))
            .collect::<Vec<_>>()
            .join("#"),
    )
}

/// Trade description, falling back to a generic one.
#[must_use]
pub fn trade_desc_or_default(trade_desc: Option<&str>) -> &str {
    trade_desc
        .map(str::trim)
        .filter(|desc| !desc.is_empty())
        .unwrap_or(DEFAULT_TRADE_DESC)
}

fn to_taipei(now: DateTime<Utc>) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(TAIPEI_OFFSET_SECS)
        .map_or_else(|| now.fixed_offset(), |tz| now.with_timezone(&tz))
}

fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use ecshop_core::OrderDetailId;
    use secrecy::SecretString;

    use super::*;

    fn config() -> EcpayConfig {
        EcpayConfig {
            merchant_id: "3002607".to_string(),
            hash_key: SecretString::from("pwFHCqoQZGmho4w6"),
            hash_iv: SecretString::from("EkRm7iFT261dpevs"),
            gateway_url: "https://payment-stage.ecpay.com.tw/Cashier/AioCheckOut/V5".to_string(),
            return_url: "https://shop.test/pages/ecpay/return".to_string(),
            client_back_url: None,
            trade_no_prefix: "EC".to_string(),
            require_check_mac: false,
        }
    }

    fn noon_utc() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 12, 4, 30, 23).unwrap()
    }

    #[test]
    fn test_merchant_trade_no_format() {
        let at = to_taipei(noon_utc());
        let trade_no = merchant_trade_no("EC", at, OrderId::new(42)).unwrap();

        assert_eq!(trade_no, "EC0312123023ID42");
    }

    #[test]
    fn test_merchant_trade_no_too_long() {
        let at = to_taipei(noon_utc());
        let result = merchant_trade_no("SHOP", at, OrderId::new(1_234_567));

        assert!(matches!(result, Err(EcpayError::TradeNoTooLong(_))));
    }

    #[test]
    fn test_checkout_form_fields() {
        let form = build_checkout_form(
            &config(),
            OrderId::new(7),
            Decimal::new(10050, 2),
            "Mug x 2",
            "EC Shop order",
            noon_utc(),
        )
        .unwrap();

        assert_eq!(form.field("MerchantTradeNo"), Some("EC0312123023ID7"));
        assert_eq!(form.field("MerchantTradeDate"), Some("2025/03/12 12:30:23"));
        assert_eq!(form.field("TotalAmount"), Some("101"));
        assert_eq!(form.field("PaymentType"), Some("aio"));
        assert_eq!(form.field("ChoosePayment"), Some("ALL"));
        assert_eq!(form.field("EncryptType"), Some("1"));
        assert_eq!(form.field("ClientBackURL"), None);
        assert_eq!(form.fields.last().map(|(key, _)| *key), Some(CHECK_MAC_FIELD));
    }

    #[test]
    fn test_checkout_form_signature_verifies() {
        let config = config();
        let form = build_checkout_form(
            &config,
            OrderId::new(7),
            Decimal::new(300, 0),
            "Mug x 2",
            "EC Shop order",
            noon_utc(),
        )
        .unwrap();

        let mac = form.field(CHECK_MAC_FIELD).unwrap();
        assert!(check_mac::verify(
            form.fields.iter().map(|(k, v)| (*k, v.as_str())),
            "pwFHCqoQZGmho4w6",
            "EkRm7iFT261dpevs",
            mac
        ));
    }

    #[test]
    fn test_checkout_form_rejects_zero_amount() {
        let result = build_checkout_form(
            &config(),
            OrderId::new(7),
            Decimal::new(49, 2),
            "Mug",
            "desc",
            noon_utc(),
        );

        assert!(matches!(result, Err(EcpayError::InvalidAmount)));
    }

    #[test]
    fn test_client_back_url_included_when_configured() {
        let mut config = config();
        config.client_back_url = Some("https://shop.test/thanks".to_string());

        let form = build_checkout_form(
            &config,
            OrderId::new(7),
            Decimal::new(300, 0),
            "Mug",
            "desc",
            noon_utc(),
        )
        .unwrap();

        assert_eq!(form.field("ClientBackURL"), Some("https://shop.test/thanks"));
    }

    #[test]
    fn test_item_name_from_lines() {
        let lines = vec![
            OrderDetailSummary {
                order_detail_id: OrderDetailId::new(1),
                product_name: "Mug".to_string(),
                quantity: 2,
                unit_price: Decimal::new(150, 0),
            },
            OrderDetailSummary {
                order_detail_id: OrderDetailId::new(2),
                product_name: "Tea".to_string(),
                quantity: 1,
                unit_price: Decimal::new(90, 0),
            },
        ];

        assert_eq!(item_name_from_lines(&lines).as_deref(), Some("Mug x 2#Tea x 1"));
        assert_eq!(item_name_from_lines(&[]), None);
    }

    #[test]
    fn test_trade_desc_default() {
        assert_eq!(trade_desc_or_default(None), DEFAULT_TRADE_DESC);
        assert_eq!(trade_desc_or_default(Some("  ")), DEFAULT_TRADE_DESC);
        assert_eq!(trade_desc_or_default(Some("Gift")), "Gift");
    }

    #[test]
    fn test_truncate_chars_counts_characters() {
        assert_eq!(truncate_chars("促銷方案", 2), "促銷");
    }
}
