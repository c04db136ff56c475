//! Developer token cache and `Authorization` header synthesis.
//!
//! Every catalog request carries `Authorization: Bearer <developer token>`.
//! Tokens come from a [`TokenIssuer`] supplied by the embedding application
//! (see [`DeveloperTokenIssuer`](crate::developer_token::DeveloperTokenIssuer)
//! for the signing issuer shipped with this crate) and are cached in memory
//! for the lifetime the issuer reports.
//!
//! # Single flight
//!
//! The first caller that misses the cache registers an in-flight issuance
//! and runs the issuer; callers arriving while it runs subscribe to it and
//! receive the same outcome, token or error. The registration is cleared
//! once the outcome is published, so a failure reaches every waiter of that
//! issuance and is never seen by later calls.

use crate::error::{AppleMusicError, BoxError, Result};
use crate::expiring::Expiring;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use std::error::Error;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, warn};

/// A freshly issued token and how long the issuer guarantees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenIssuance {
    /// Bearer token value.
    pub token: String,
    /// Seconds the token stays valid from the moment of issuance.
    /// Zero or negative means "use once".
    pub lifetime_secs: i64,
}

impl TokenIssuance {
    pub fn new(token: impl Into<String>, lifetime_secs: i64) -> Self {
        Self {
            token: token.into(),
            lifetime_secs,
        }
    }

    fn ttl(&self) -> Duration {
        Duration::from_secs(u64::try_from(self.lifetime_secs).unwrap_or(0))
    }
}

/// Produces developer tokens on demand.
///
/// Implemented for any `Fn() -> impl Future<Output = Result<TokenIssuance, E>>`
/// closure, so simple issuers need no dedicated type.
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    async fn issue(&self) -> std::result::Result<TokenIssuance, BoxError>;
}

#[async_trait]
impl<F, Fut, E> TokenIssuer for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = std::result::Result<TokenIssuance, E>> + Send + 'static,
    E: Into<BoxError> + 'static,
{
    async fn issue(&self) -> std::result::Result<TokenIssuance, BoxError> {
        self().await.map_err(Into::into)
    }
}

/// Issuer for a token minted elsewhere (e.g. passed in via environment).
#[derive(Debug, Clone)]
pub struct StaticToken {
    token: String,
    lifetime_secs: i64,
}

impl StaticToken {
    pub fn new(token: impl Into<String>, lifetime_secs: i64) -> Self {
        Self {
            token: token.into(),
            lifetime_secs,
        }
    }
}

#[async_trait]
impl TokenIssuer for StaticToken {
    async fn issue(&self) -> std::result::Result<TokenIssuance, BoxError> {
        Ok(TokenIssuance::new(self.token.clone(), self.lifetime_secs))
    }
}

/// Build the `{"Authorization": "Bearer <token>"}` header map.
pub fn bearer_header(token: &str) -> Result<HeaderMap> {
    let mut value = HeaderValue::from_str(&format!("Bearer {token}"))?;
    value.set_sensitive(true);
    let mut headers = HeaderMap::with_capacity(1);
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}

/// Issuer error shared by every caller waiting on the same issuance.
#[derive(Debug, Clone)]
struct SharedError(Arc<dyn Error + Send + Sync>);

impl fmt::Display for SharedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

impl Error for SharedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.0.source()
    }
}

impl From<SharedError> for AppleMusicError {
    fn from(e: SharedError) -> Self {
        Self::Issuance(Box::new(e))
    }
}

type Outcome = std::result::Result<String, SharedError>;

#[derive(Default)]
struct Slot {
    token: Expiring<String>,
    /// Present while an issuance runs; `None` in the channel until it ends.
    in_flight: Option<watch::Receiver<Option<Outcome>>>,
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

enum Role {
    Lead(watch::Sender<Option<Outcome>>),
    Follow(watch::Receiver<Option<Outcome>>),
}

/// The running issuance. Dropping it unfinished (the leader was cancelled)
/// deregisters it, and waiters start over.
struct Flight<'a> {
    slot: &'a Mutex<Slot>,
    tx: Option<watch::Sender<Option<Outcome>>>,
}

impl Flight<'_> {
    fn finish(mut self, outcome: std::result::Result<TokenIssuance, SharedError>) -> Outcome {
        let tx = self.tx.take();
        let mut slot = lock(self.slot);
        slot.in_flight = None;
        let outcome = outcome.map(|issued| {
            let ttl = issued.ttl();
            debug!(lifetime_secs = issued.lifetime_secs, "caching developer token");
            slot.token.set(issued.token.clone(), ttl);
            issued.token
        });
        if let Some(tx) = tx {
            tx.send_replace(Some(outcome.clone()));
        }
        outcome
    }
}

impl Drop for Flight<'_> {
    fn drop(&mut self) {
        if self.tx.is_some() {
            lock(self.slot).in_flight = None;
        }
    }
}

/// Hands out `Authorization` headers, issuing a new token only when the
/// cached one has expired.
///
/// One instance per client: tokens are never shared between clients.
pub struct Authenticator {
    issuer: Box<dyn TokenIssuer>,
    slot: Mutex<Slot>,
}

impl Authenticator {
    pub fn new(issuer: impl TokenIssuer + 'static) -> Self {
        Self {
            issuer: Box::new(issuer),
            slot: Mutex::new(Slot::default()),
        }
    }

    /// Return the header for the cached token, or issue a new one.
    ///
    /// An issuer failure is returned as [`AppleMusicError::Issuance`] and
    /// leaves the cache untouched, so the next call asks the issuer again.
    /// The token just issued is always used for the call that fetched it,
    /// even when its lifetime is zero.
    pub async fn authorization_header(&self) -> Result<HeaderMap> {
        let token = self.token().await?;
        bearer_header(&token)
    }

    /// Return the cached token, or wait for the single in-flight issuance.
    pub async fn token(&self) -> Result<String> {
        loop {
            let role = {
                let mut slot = lock(&self.slot);
                if let Some(token) = slot.token.get() {
                    debug!("using cached developer token");
                    return Ok(token);
                }
                if let Some(rx) = &slot.in_flight {
                    Role::Follow(rx.clone())
                } else {
                    let (tx, rx) = watch::channel(None);
                    slot.in_flight = Some(rx);
                    Role::Lead(tx)
                }
            };

            match role {
                Role::Lead(tx) => return self.lead(tx).await.map_err(Into::into),
                Role::Follow(mut rx) => {
                    debug!("waiting for in-flight token issuance");
                    let outcome = rx.wait_for(Option::is_some).await.map(|v| v.clone());
                    if let Ok(Some(outcome)) = outcome {
                        return outcome.map_err(Into::into);
                    }
                    // The leader was cancelled; start over.
                }
            }
        }
    }

    async fn lead(&self, tx: watch::Sender<Option<Outcome>>) -> Outcome {
        let flight = Flight {
            slot: &self.slot,
            tx: Some(tx),
        };
        debug!("developer token missing or expired, issuing");
        let issued = self
            .issuer
            .issue()
            .await
            .and_then(|issued| {
                bearer_header(&issued.token)?;
                Ok(issued)
            })
            .map_err(|e| {
                warn!(error = %e, "token issuance failed");
                SharedError(Arc::from(e))
            });
        flight.finish(issued)
    }

    /// Drop the cached token so the next call re-issues.
    pub fn invalidate(&self) {
        lock(&self.slot).token.clear();
    }

    /// Drop the cached token only if it is still `rejected`.
    ///
    /// A request that fails with a token which has since been replaced
    /// leaves the replacement alone. Returns whether the cache was cleared.
    pub fn invalidate_token(&self, rejected: &str) -> bool {
        let mut slot = lock(&self.slot);
        if slot.token.get().as_deref() == Some(rejected) {
            slot.token.clear();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Issuer that hands out `T1`, `T2`, ... and counts its calls.
    fn counting_issuer(
        calls: Arc<AtomicUsize>,
        lifetime_secs: i64,
    ) -> impl TokenIssuer + 'static {
        move || {
            let calls = Arc::clone(&calls);
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok::<_, BoxError>(TokenIssuance::new(format!("T{n}"), lifetime_secs))
            }
        }
    }

    fn cached(auth: &Authenticator) -> Option<String> {
        lock(&auth.slot).token.get()
    }

    fn bearer(headers: &HeaderMap) -> &str {
        headers[AUTHORIZATION].to_str().unwrap()
    }

    #[test]
    fn header_format() {
        let headers = bearer_header("abc123").unwrap();
        assert_eq!(headers.len(), 1);
        assert_eq!(bearer(&headers), "Bearer abc123");
        assert!(headers[AUTHORIZATION].is_sensitive());
    }

    #[test]
    fn header_rejects_control_bytes() {
        let err = bearer_header("bad\ntoken").unwrap_err();
        assert!(matches!(err, AppleMusicError::InvalidHeader(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn reuses_then_reissues_after_expiry() {
        let calls = Arc::new(AtomicUsize::new(0));
        let auth = Authenticator::new(counting_issuer(Arc::clone(&calls), 3600));

        let first = auth.authorization_header().await.unwrap();
        assert_eq!(bearer(&first), "Bearer T1");
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let second = auth.authorization_header().await.unwrap();
        assert_eq!(bearer(&second), "Bearer T1");
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(3601)).await;
        let third = auth.authorization_header().await.unwrap();
        assert_eq!(bearer(&third), "Bearer T2");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn live_token_never_calls_issuer() {
        let calls = Arc::new(AtomicUsize::new(0));
        let auth = Authenticator::new(counting_issuer(Arc::clone(&calls), 60));
        auth.authorization_header().await.unwrap();
        calls.store(0, Ordering::SeqCst);

        for _ in 0..10 {
            tokio::time::advance(Duration::from_secs(5)).await;
            auth.authorization_header().await.unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_misses_share_one_issuance() {
        let calls = Arc::new(AtomicUsize::new(0));
        let auth = Arc::new(Authenticator::new(counting_issuer(
            Arc::clone(&calls),
            3600,
        )));

        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..16 {
            let auth = Arc::clone(&auth);
            tasks.spawn(async move { auth.authorization_header().await });
        }

        let mut headers = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            headers.push(joined.unwrap().unwrap());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(headers.len(), 16);
        assert!(headers.iter().all(|h| bearer(h) == "Bearer T1"));
    }

    #[tokio::test(start_paused = true)]
    async fn failure_is_propagated_and_not_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let auth = Authenticator::new(move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err("network down")
                } else {
                    Ok(TokenIssuance::new("T1", 3600))
                }
            }
        });

        let err = auth.authorization_header().await.unwrap_err();
        match err {
            AppleMusicError::Issuance(source) => assert_eq!(source.to_string(), "network down"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(cached(&auth).is_none());

        let headers = auth.authorization_header().await.unwrap();
        assert_eq!(bearer(&headers), "Bearer T1");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_lifetime_serves_current_call_only() {
        let calls = Arc::new(AtomicUsize::new(0));
        let auth = Authenticator::new(counting_issuer(Arc::clone(&calls), 0));

        assert_eq!(bearer(&auth.authorization_header().await.unwrap()), "Bearer T1");
        assert_eq!(bearer(&auth.authorization_header().await.unwrap()), "Bearer T2");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn negative_lifetime_is_treated_as_expired() {
        let auth = Authenticator::new(StaticToken::new("S", -30));
        assert_eq!(bearer(&auth.authorization_header().await.unwrap()), "Bearer S");
        assert!(cached(&auth).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_issuance_stores_nothing() {
        let calls = Arc::new(AtomicUsize::new(0));
        let auth = Authenticator::new(counting_issuer(Arc::clone(&calls), 3600));

        let timed_out = tokio::time::timeout(
            Duration::from_millis(10),
            auth.authorization_header(),
        )
        .await;
        assert!(timed_out.is_err());
        assert!(cached(&auth).is_none());

        assert_eq!(bearer(&auth.authorization_header().await.unwrap()), "Bearer T2");
    }

    #[tokio::test(start_paused = true)]
    async fn invalidate_forces_reissue() {
        let calls = Arc::new(AtomicUsize::new(0));
        let auth = Authenticator::new(counting_issuer(Arc::clone(&calls), 3600));
        auth.authorization_header().await.unwrap();
        auth.invalidate();
        assert_eq!(bearer(&auth.authorization_header().await.unwrap()), "Bearer T2");
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_misses_share_one_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let auth = Arc::new(Authenticator::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Err::<TokenIssuance, _>("network down")
            }
        }));

        let start = tokio::time::Instant::now();
        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..8 {
            let auth = Arc::clone(&auth);
            tasks.spawn(async move { auth.authorization_header().await });
        }

        let mut failures = 0;
        while let Some(joined) = tasks.join_next().await {
            match joined.unwrap() {
                Err(AppleMusicError::Issuance(source)) => {
                    assert_eq!(source.to_string(), "network down");
                    failures += 1;
                }
                other => panic!("unexpected result: {other:?}"),
            }
        }

        assert_eq!(failures, 8);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(start.elapsed() < Duration::from_secs(31));
        assert!(cached(&auth).is_none());

        // The failure belonged to that issuance only.
        let _ = auth.authorization_header().await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn waiters_take_over_after_cancelled_leader() {
        let calls = Arc::new(AtomicUsize::new(0));
        let auth = Arc::new(Authenticator::new(counting_issuer(
            Arc::clone(&calls),
            3600,
        )));

        let leader = {
            let auth = Arc::clone(&auth);
            tokio::spawn(async move { auth.authorization_header().await })
        };
        tokio::task::yield_now().await;
        let waiter = {
            let auth = Arc::clone(&auth);
            tokio::spawn(async move { auth.authorization_header().await })
        };
        tokio::task::yield_now().await;
        leader.abort();

        let headers = waiter.await.unwrap().unwrap();
        assert_eq!(bearer(&headers), "Bearer T2");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_rejection_keeps_replacement_token() {
        let calls = Arc::new(AtomicUsize::new(0));
        let auth = Authenticator::new(counting_issuer(Arc::clone(&calls), 3600));

        // Requests A and B both went out with T1 and both came back 401.
        assert_eq!(auth.token().await.unwrap(), "T1");

        assert!(auth.invalidate_token("T1"));
        assert_eq!(auth.token().await.unwrap(), "T2");

        // B's rejection arrives after A already reissued.
        assert!(!auth.invalidate_token("T1"));
        assert_eq!(auth.token().await.unwrap(), "T2");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
