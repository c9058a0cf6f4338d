//! Application context shared by the client surfaces.
//!
//! Each store sits behind its own `tokio::sync::Mutex`. Actions on one store
//! run one at a time in the order they were requested; different stores may
//! interleave.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::api::{ApiClient, ApiError};
use crate::config::StorefrontConfig;
use crate::profile::ProfilePage;
use crate::stores::{AuthStore, CheckoutWidget, PaymentStore, RazorpayStore, UnavailableWidget};
use crate::token::{TokenError, TokenStore};

/// Error building the application context.
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("token store: {0}")]
    Token(#[from] TokenError),
    #[error("api client: {0}")]
    Api(#[from] ApiError),
}

/// Shared client state: configuration, API client and the stores.
///
/// Cheaply cloneable via `Arc`.
pub struct AppContext<W = UnavailableWidget> {
    inner: Arc<AppContextInner<W>>,
}

struct AppContextInner<W> {
    config: StorefrontConfig,
    api: ApiClient,
    auth: Arc<Mutex<AuthStore<ApiClient>>>,
    payments: Mutex<PaymentStore<ApiClient>>,
    razorpay: Mutex<RazorpayStore<ApiClient, W>>,
}

impl<W> Clone for AppContext<W> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl AppContext<UnavailableWidget> {
    /// Build a context with the token persisted at the configured path.
    ///
    /// # Errors
    ///
    /// Returns an error if the token file cannot be read or the API base URL
    /// is unusable.
    pub fn from_config(config: StorefrontConfig) -> Result<Self, ContextError> {
        let tokens = TokenStore::open(config.token_path.clone())?;
        Self::with_widget(config, tokens, UnavailableWidget)
    }
}

impl<W: CheckoutWidget> AppContext<W> {
    /// Build a context around an explicit token store and checkout widget.
    ///
    /// # Errors
    ///
    /// Returns an error if the API base URL is unusable.
    pub fn with_widget(
        config: StorefrontConfig,
        tokens: TokenStore,
        widget: W,
    ) -> Result<Self, ContextError> {
        let api = ApiClient::from_config(&config, tokens.clone())?;
        let auth = AuthStore::new(api.clone(), tokens);
        let payments = PaymentStore::new(api.clone());
        let razorpay = RazorpayStore::new(api.clone(), widget, config.razorpay.clone());

        Ok(Self {
            inner: Arc::new(AppContextInner {
                config,
                api,
                auth: Arc::new(Mutex::new(auth)),
                payments: Mutex::new(payments),
                razorpay: Mutex::new(razorpay),
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenStore {
        self.inner.api.tokens()
    }

    #[must_use]
    pub fn auth(&self) -> &Arc<Mutex<AuthStore<ApiClient>>> {
        &self.inner.auth
    }

    #[must_use]
    pub fn payments(&self) -> &Mutex<PaymentStore<ApiClient>> {
        &self.inner.payments
    }

    #[must_use]
    pub fn razorpay(&self) -> &Mutex<RazorpayStore<ApiClient, W>> {
        &self.inner.razorpay
    }

    /// A profile page bound to the shared auth store.
    #[must_use]
    pub fn profile_page(&self) -> ProfilePage<ApiClient> {
        ProfilePage::new(Arc::clone(&self.inner.auth))
    }

    /// Forget the token and every cached record.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted token cannot be removed.
    pub async fn logout(&self) -> Result<(), TokenError> {
        self.inner.auth.lock().await.logout()?;
        self.inner.payments.lock().await.reset();
        self.inner.razorpay.lock().await.reset();
        Ok(())
    }
}
