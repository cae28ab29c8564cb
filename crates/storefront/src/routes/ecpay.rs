//! ECPay payment pages (`/pages/ecpay`).
//!
//! `/send` returns an HTML page that immediately posts the signed checkout
//! form to the gateway. `/return` receives the server-to-server payment
//! result and always answers `OK` so ECPay stops retrying.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Json, Router, body::Bytes, extract::State, routing::post};
use tracing::instrument;

use crate::error::Result;
use crate::services::EcpayService;
use crate::services::ecpay::{CheckoutForm, CheckoutRequest};
use crate::state::AppState;

/// Body ECPay expects back once a callback has been received.
pub const CALLBACK_ACK: &str = "OK";

/// Self-submitting checkout page.
#[derive(Template, WebTemplate)]
#[template(path = "ecpay/checkout.html")]
pub struct CheckoutTemplate {
    pub action: String,
    pub fields: Vec<(&'static str, String)>,
}

impl From<CheckoutForm> for CheckoutTemplate {
    fn from(form: CheckoutForm) -> Self {
        Self {
            action: form.action,
            fields: form.fields,
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/send", post(send))
        .route("/return", post(payment_return))
}

#[instrument(skip(state, request))]
async fn send(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<CheckoutTemplate> {
    let form = EcpayService::new(state.pool(), &state.config().ecpay)
        .checkout(&request)
        .await?;
    Ok(form.into())
}

async fn payment_return(State(state): State<AppState>, body: Bytes) -> &'static str {
    EcpayService::new(state.pool(), &state.config().ecpay)
        .handle_callback(&body)
        .await;
    CALLBACK_ACK
}
