//! Payment record service.

use sqlx::PgPool;
use tracing::instrument;

use ecshop_core::{OrderId, PaymentId};

use crate::db::{PaymentRepository, RepositoryError};
use crate::models::{Payment, PaymentInput};

/// Payment record operations.
pub struct PaymentService<'a> {
    payments: PaymentRepository<'a>,
}

impl<'a> PaymentService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            payments: PaymentRepository::new(pool),
        }
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_all(&self) -> Result<Vec<Payment>, RepositoryError> {
        self.payments.find_all().await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, RepositoryError> {
        self.payments.find_by_id(id).await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_order_id(
        &self,
        order_id: OrderId,
    ) -> Result<Option<Payment>, RepositoryError> {
        self.payments.find_by_order_id(order_id).await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if `id` does not exist, or
    /// `RepositoryError::Conflict` if the order already has a payment.
    #[instrument(skip(self, input), fields(order_id = %input.orders_id))]
    pub async fn save(
        &self,
        id: Option<PaymentId>,
        input: &PaymentInput,
    ) -> Result<Payment, RepositoryError> {
        let payment = self.payments.save(id, input).await?;
        tracing::info!(
            payment_id = %payment.payments_id,
            status = %payment.transaction_status,
            "Payment saved"
        );
        Ok(payment)
    }

    /// Delete a payment. Returns `false` if there was no such payment.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: PaymentId) -> Result<bool, RepositoryError> {
        self.payments.delete_by_id(id).await
    }

    /// Delete an order's payment, returning the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    #[instrument(skip(self))]
    pub async fn delete_by_order_id(&self, order_id: OrderId) -> Result<u64, RepositoryError> {
        self.payments.delete_by_order_id(order_id).await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_all(&self) -> Result<u64, RepositoryError> {
        self.payments.delete_all().await
    }
}
