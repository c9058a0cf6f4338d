//! Payment records store.

use bazaar_core::{NewPayment, Payment, PaymentId};
use tracing::{info, warn};

use crate::api::PaymentsApi;

const CREATE_FAILED: &str = "Failed to create payment";
const FETCH_ALL_FAILED: &str = "Failed to fetch payments";
const FETCH_ONE_FAILED: &str = "Failed to fetch payment";

/// Observable state of the payment store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentState {
    /// Newest first.
    pub payments: Vec<Payment>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Request/response wrapper around the payment endpoints.
///
/// Every action sets `loading`, clears the previous error, and converts
/// failures into `error` instead of returning them.
#[derive(Debug)]
pub struct PaymentStore<A> {
    api: A,
    state: PaymentState,
}

impl<A: PaymentsApi> PaymentStore<A> {
    /// Create an empty store.
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: PaymentState::default(),
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &PaymentState {
        &self.state
    }

    /// Create a payment and prepend it to the list.
    ///
    /// Returns the created record on success.
    pub async fn create_payment(&mut self, payment: NewPayment) -> Option<Payment> {
        self.begin();
        let result = self.api.create_payment(&payment).await;
        self.state.loading = false;

        match result {
            Ok(created) => {
                info!(id = ?created.id, "Payment created");
                self.state.payments.insert(0, created.clone());
                Some(created)
            }
            Err(e) => {
                warn!(error = %e, "Create payment failed");
                self.state.error = Some(e.message_or(CREATE_FAILED));
                None
            }
        }
    }

    /// Replace the list with the current user's payments.
    pub async fn fetch_my_payments(&mut self) {
        self.begin();
        let result = self.api.my_payments().await;
        self.state.loading = false;

        match result {
            Ok(payments) => self.state.payments = payments,
            Err(e) => {
                warn!(error = %e, "Fetch payments failed");
                self.state.error = Some(e.message_or(FETCH_ALL_FAILED));
            }
        }
    }

    /// Fetch one payment and merge it into the list by id.
    ///
    /// Returns the fetched record on success.
    pub async fn fetch_payment_by_id(&mut self, id: &PaymentId) -> Option<Payment> {
        self.begin();
        let result = self.api.payment_by_id(id).await;
        self.state.loading = false;

        match result {
            Ok(payment) => {
                upsert_payment(&mut self.state.payments, payment.clone());
                Some(payment)
            }
            Err(e) => {
                warn!(error = %e, %id, "Fetch payment failed");
                self.state.error = Some(e.message_or(FETCH_ONE_FAILED));
                None
            }
        }
    }

    /// Dismiss the current error.
    pub fn clear_error(&mut self) {
        self.state.error = None;
    }

    /// Drop all cached records, e.g. on logout.
    pub fn reset(&mut self) {
        self.state = PaymentState::default();
    }

    fn begin(&mut self) {
        self.state.loading = true;
        self.state.error = None;
    }
}

/// Replace the entry with the same id in place, or prepend when it is new.
pub fn upsert_payment(payments: &mut Vec<Payment>, payment: Payment) {
    if let Some(existing) = payments.iter_mut().find(|p| p.same_id(&payment)) {
        *existing = payment;
    } else {
        payments.insert(0, payment);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Mutex;

    use bazaar_core::PaymentStatus;
    use rust_decimal::Decimal;

    use super::*;
    use crate::api::ApiError;

    fn payment(id: &str, tx: &str) -> Payment {
        Payment {
            id: Some(PaymentId::new(id)),
            user: None,
            business_profile: None,
            amount: Decimal::from(10),
            currency: None,
            payment_method: "card".to_string(),
            payment_status: PaymentStatus::Completed,
            transaction_id: tx.to_string(),
            subscription_type: None,
            subscription_start_date: None,
            subscription_end_date: None,
            created_at: None,
        }
    }

    #[derive(Default)]
    struct FakeApi {
        list: Mutex<Option<Result<Vec<Payment>, (u16, Option<String>)>>>,
        by_id: Mutex<Option<Payment>>,
        fail_create: bool,
    }

    impl PaymentsApi for FakeApi {
        async fn create_payment(&self, payment: &NewPayment) -> Result<Payment, ApiError> {
            if self.fail_create {
                return Err(ApiError::Status {
                    status: 400,
                    message: Some("Transaction already recorded".to_string()),
                });
            }
            let mut created = payment_from(payment);
            created.id = Some(PaymentId::new(format!("id-{}", payment.transaction_id)));
            Ok(created)
        }

        async fn my_payments(&self) -> Result<Vec<Payment>, ApiError> {
            match self.list.lock().unwrap().take() {
                Some(Ok(list)) => Ok(list),
                Some(Err((status, message))) => Err(ApiError::Status { status, message }),
                None => Ok(Vec::new()),
            }
        }

        async fn payment_by_id(&self, id: &PaymentId) -> Result<Payment, ApiError> {
            self.by_id
                .lock()
                .unwrap()
                .clone()
                .filter(|p| p.id.as_ref() == Some(id))
                .ok_or(ApiError::Status {
                    status: 404,
                    message: None,
                })
        }
    }

    fn payment_from(new: &NewPayment) -> Payment {
        Payment {
            id: None,
            user: None,
            business_profile: None,
            amount: new.amount,
            currency: new.currency,
            payment_method: new.payment_method.clone(),
            payment_status: PaymentStatus::Pending,
            transaction_id: new.transaction_id.clone(),
            subscription_type: new.subscription_type,
            subscription_start_date: None,
            subscription_end_date: None,
            created_at: None,
        }
    }

    fn store_with(api: FakeApi, payments: Vec<Payment>) -> PaymentStore<FakeApi> {
        let mut store = PaymentStore::new(api);
        store.state.payments = payments;
        store
    }

    #[tokio::test]
    async fn test_create_payment_prepends() {
        let mut store = store_with(FakeApi::default(), vec![payment("p0", "tx0")]);

        let created = store
            .create_payment(NewPayment::new(Decimal::from(100), "card", "tx1"))
            .await
            .unwrap();

        let state = store.state();
        assert_eq!(created.transaction_id, "tx1");
        assert_eq!(state.payments.len(), 2);
        assert_eq!(state.payments[0].transaction_id, "tx1");
        assert_eq!(state.payments[0].amount, Decimal::from(100));
        assert_eq!(state.payments[1].transaction_id, "tx0");
        assert!(!state.loading);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_create_payment_failure_uses_backend_message() {
        let api = FakeApi {
            fail_create: true,
            ..FakeApi::default()
        };
        let mut store = store_with(api, vec![payment("p0", "tx0")]);

        let created = store
            .create_payment(NewPayment::new(Decimal::from(100), "card", "tx0"))
            .await;

        assert!(created.is_none());
        assert_eq!(
            store.state().error.as_deref(),
            Some("Transaction already recorded")
        );
        assert_eq!(store.state().payments.len(), 1);
        assert!(!store.state().loading);
    }

    #[tokio::test]
    async fn test_fetch_my_payments_failure_keeps_list() {
        let api = FakeApi::default();
        *api.list.lock().unwrap() = Some(Err((500, Some("server error".to_string()))));
        let previous = vec![payment("p1", "tx1"), payment("p2", "tx2")];
        let mut store = store_with(api, previous.clone());

        store.fetch_my_payments().await;

        let state = store.state();
        assert_eq!(state.error.as_deref(), Some("server error"));
        assert!(!state.loading);
        assert_eq!(state.payments, previous);
    }

    #[tokio::test]
    async fn test_fetch_my_payments_failure_without_message_uses_fallback() {
        let api = FakeApi::default();
        *api.list.lock().unwrap() = Some(Err((502, None)));
        let mut store = store_with(api, Vec::new());

        store.fetch_my_payments().await;

        assert_eq!(store.state().error.as_deref(), Some(FETCH_ALL_FAILED));
    }

    #[tokio::test]
    async fn test_fetch_my_payments_replaces_list_and_clears_error() {
        let api = FakeApi::default();
        *api.list.lock().unwrap() = Some(Ok(vec![payment("p9", "tx9")]));
        let mut store = store_with(api, vec![payment("p1", "tx1")]);
        store.state.error = Some("stale".to_string());

        store.fetch_my_payments().await;

        assert_eq!(store.state().payments, vec![payment("p9", "tx9")]);
        assert!(store.state().error.is_none());
    }

    #[tokio::test]
    async fn test_fetch_by_id_replaces_existing_in_place() {
        let mut updated = payment("p2", "tx2");
        updated.payment_status = PaymentStatus::Refunded;
        let api = FakeApi::default();
        *api.by_id.lock().unwrap() = Some(updated.clone());
        let mut store = store_with(
            api,
            vec![payment("p1", "tx1"), payment("p2", "tx2"), payment("p3", "tx3")],
        );

        store.fetch_payment_by_id(&PaymentId::new("p2")).await.unwrap();

        let payments = &store.state().payments;
        assert_eq!(payments.len(), 3);
        assert_eq!(payments[1], updated);
        assert_eq!(payments[0].transaction_id, "tx1");
        assert_eq!(payments[2].transaction_id, "tx3");
    }

    #[tokio::test]
    async fn test_fetch_by_id_prepends_new() {
        let api = FakeApi::default();
        *api.by_id.lock().unwrap() = Some(payment("p4", "tx4"));
        let mut store = store_with(api, vec![payment("p1", "tx1")]);

        store.fetch_payment_by_id(&PaymentId::new("p4")).await.unwrap();

        let payments = &store.state().payments;
        assert_eq!(payments.len(), 2);
        assert_eq!(payments[0].transaction_id, "tx4");
    }

    #[tokio::test]
    async fn test_fetch_by_id_not_found_sets_fallback_error() {
        let mut store = store_with(FakeApi::default(), vec![payment("p1", "tx1")]);

        let fetched = store.fetch_payment_by_id(&PaymentId::new("missing")).await;

        assert!(fetched.is_none());
        assert_eq!(store.state().error.as_deref(), Some(FETCH_ONE_FAILED));
        assert_eq!(store.state().payments.len(), 1);
    }

    #[test]
    fn test_reset_and_clear_error() {
        let mut store = store_with(FakeApi::default(), vec![payment("p1", "tx1")]);
        store.state.error = Some("boom".to_string());

        store.clear_error();
        assert!(store.state().error.is_none());

        store.reset();
        assert_eq!(store.state(), &PaymentState::default());
    }
}
