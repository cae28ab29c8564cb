//! ECPay AIO checkout integration.
//!
//! Two flows:
//!
//! - **Send**: build a signed, self-submitting form that sends the shopper
//!   to the ECPay cashier for an existing order.
//! - **Return**: handle ECPay's server-to-server result callback. A success
//!   code marks the order paid; anything else deletes the unpaid order.
//!
//! The return flow never fails towards the gateway. Problems are logged and
//! the handler still answers `OK`.

mod callback;
pub mod check_mac;
mod checkout;

pub use callback::{CallbackOutcome, CallbackPayload, Signature, parse_trade_no};
pub use checkout::{
    CheckoutForm, CheckoutRequest, build_checkout_form, item_name_from_lines, merchant_trade_no,
    trade_desc_or_default,
};

use chrono::Utc;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use thiserror::Error;
use tracing::instrument;

use ecshop_core::{PaymentStatus, whole_amount};

use crate::config::EcpayConfig;
use crate::db::{OrderDetailRepository, OrderRepository, RepositoryError};

/// Errors from the ECPay flows.
#[derive(Debug, Error)]
pub enum EcpayError {
    #[error("Order not found")]
    OrderNotFound,

    #[error("Order is already paid")]
    AlreadyPaid,

    #[error("Order is cancelled")]
    OrderCancelled,

    #[error("Total amount does not match the order")]
    AmountMismatch,

    #[error("Total amount must round to a positive whole number")]
    InvalidAmount,

    #[error("Merchant trade number too long: {0}")]
    TradeNoTooLong(String),

    #[error("Malformed callback: {0}")]
    MalformedCallback(String),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// ECPay checkout and callback service.
pub struct EcpayService<'a> {
    orders: OrderRepository<'a>,
    details: OrderDetailRepository<'a>,
    config: &'a EcpayConfig,
}

impl<'a> EcpayService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool, config: &'a EcpayConfig) -> Self {
        Self {
            orders: OrderRepository::new(pool),
            details: OrderDetailRepository::new(pool),
            config,
        }
    }

    /// Build the checkout form for an order.
    ///
    /// The amount charged is always the stored order total.
    ///
    /// # Errors
    ///
    /// Returns `EcpayError::OrderNotFound` if the order does not exist,
    /// `EcpayError::AlreadyPaid` / `EcpayError::OrderCancelled` if it can no
    /// longer be paid, and `EcpayError::AmountMismatch` if the client sent a
    /// different total.
    #[instrument(skip(self, request), fields(order_id = %request.orders_id))]
    pub async fn checkout(&self, request: &CheckoutRequest) -> Result<CheckoutForm, EcpayError> {
        let order = self
            .orders
            .find_by_id(request.orders_id)
            .await?
            .ok_or(EcpayError::OrderNotFound)?;

        if order.payment_status == PaymentStatus::PAID {
            return Err(EcpayError::AlreadyPaid);
        }
        if order.is_cancelled {
            return Err(EcpayError::OrderCancelled);
        }
        if request
            .total_amount
            .is_some_and(|expected| whole_amount(expected) != whole_amount(order.total_amount))
        {
            return Err(EcpayError::AmountMismatch);
        }

        let item_name = match request
            .item_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
        {
            Some(name) => name.to_string(),
            None => {
                let lines = self.details.find_by_order_id(order.orders_id).await?;
                item_name_from_lines(&lines)
                    .unwrap_or_else(|| format!("Order {}", order.orders_id))
            }
        };

        let form = build_checkout_form(
            self.config,
            order.orders_id,
            order.total_amount,
            &item_name,
            trade_desc_or_default(request.trade_desc.as_deref()),
            Utc::now(),
        )?;

        tracing::info!(
            trade_no = form.field("MerchantTradeNo").unwrap_or_default(),
            total = form.field("TotalAmount").unwrap_or_default(),
            "ECPay checkout form built"
        );

        Ok(form)
    }

    /// Apply a payment result callback.
    ///
    /// Returns the outcome that was applied, or `None` if the callback was
    /// ignored. Never fails; every problem is logged.
    #[instrument(skip(self, body), fields(body_len = body.len()))]
    pub async fn handle_callback(&self, body: &[u8]) -> Option<CallbackOutcome> {
        match self.process_callback(body).await {
            Ok(outcome) => outcome,
            Err(e @ EcpayError::Repository(_)) => {
                tracing::error!(error = %e, "Failed to apply ECPay callback");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring ECPay callback");
                None
            }
        }
    }

    async fn process_callback(&self, body: &[u8]) -> Result<Option<CallbackOutcome>, EcpayError> {
        let payload = CallbackPayload::parse(body)?;

        match payload.signature(
            self.config.hash_key.expose_secret(),
            self.config.hash_iv.expose_secret(),
        ) {
            Signature::Valid => {}
            Signature::Invalid => {
                tracing::warn!(
                    trade_no = payload.merchant_trade_no().unwrap_or_default(),
                    "ECPay callback CheckMacValue mismatch"
                );
                return Ok(None);
            }
            Signature::Missing if self.config.require_check_mac => {
                tracing::warn!(
                    trade_no = payload.merchant_trade_no().unwrap_or_default(),
                    "Unsigned ECPay callback rejected"
                );
                return Ok(None);
            }
            Signature::Missing => {
                tracing::debug!("ECPay callback carries no CheckMacValue");
            }
        }

        let outcome = payload.outcome()?;
        match &outcome {
            CallbackOutcome::MarkPaid(order_id) => {
                if self
                    .orders
                    .set_payment_status(*order_id, PaymentStatus::PAID)
                    .await?
                {
                    tracing::info!(order_id = %order_id, "Order paid");
                } else {
                    tracing::warn!(order_id = %order_id, "Paid callback for unknown order");
                }
            }
            CallbackOutcome::DeleteOrder { order_id, reason } => {
                if self.orders.delete_with_children(*order_id).await? {
                    tracing::info!(order_id = %order_id, reason = %reason, "Payment failed, order deleted");
                } else {
                    tracing::warn!(order_id = %order_id, reason = %reason, "Failed-payment callback for unknown order");
                }
            }
        }

        Ok(Some(outcome))
    }
}
