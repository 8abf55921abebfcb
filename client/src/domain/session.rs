//! Session state resolver.
//!
//! The resolver owns the one piece of shared state in the client: who is
//! signed in. Every operation publishes a fresh immutable [`SessionSnapshot`]
//! on a `watch` channel; consumers either take a snapshot or subscribe. When
//! two operations race, whichever resolves last publishes last and wins.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use super::forms::{LoginCredentials, Registration};
use super::identity::{Identity, Role};
use super::ports::{ApiError, AuthGateway};

/// Immutable view of the session at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    identity: Option<Arc<Identity>>,
    revision: u64,
}

impl SessionSnapshot {
    /// Signed-in identity, if any.
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_deref()
    }

    /// Role of the signed-in identity.
    pub fn role(&self) -> Option<Role> {
        self.identity().map(Identity::role)
    }

    /// Whether someone is signed in.
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// Whether the resolver has completed at least one operation.
    pub fn is_resolved(&self) -> bool {
        self.revision > 0
    }

    /// Number of snapshots published before and including this one.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// Resolves and publishes the current identity.
pub struct SessionResolver<A> {
    gateway: Arc<A>,
    state: watch::Sender<SessionSnapshot>,
}

impl<A> SessionResolver<A> {
    /// Create a resolver with an unresolved, signed-out snapshot.
    pub fn new(gateway: Arc<A>) -> Self {
        let (state, _) = watch::channel(SessionSnapshot::default());
        Self { gateway, state }
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    /// Receiver notified on every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    fn publish(&self, identity: Option<Identity>) -> SessionSnapshot {
        let identity = identity.map(Arc::new);
        let mut snapshot = SessionSnapshot::default();
        self.state.send_modify(|current| {
            current.identity = identity;
            current.revision += 1;
            snapshot = current.clone();
        });
        debug!(
            revision = snapshot.revision,
            authenticated = snapshot.is_authenticated(),
            "session snapshot published"
        );
        snapshot
    }
}

impl<A> SessionResolver<A>
where
    A: AuthGateway,
{
    /// Resolve the session for the first time.
    pub async fn initialize(&self) -> SessionSnapshot {
        self.refresh().await
    }

    /// Re-query the profile and publish whatever it reports.
    ///
    /// Any failure resolves to "signed out"; nothing is returned as an error.
    pub async fn refresh(&self) -> SessionSnapshot {
        let identity = match self.gateway.profile().await {
            Ok(identity) => identity,
            Err(error) => {
                warn!(%error, "profile lookup failed; treating session as signed out");
                None
            }
        };
        self.publish(identity)
    }

    /// Exchange credentials, then resolve the identity.
    ///
    /// A rejected exchange is returned to the caller. When the exchange
    /// succeeds but the profile cannot be fetched the result is `Ok(None)`.
    pub async fn login(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Option<Arc<Identity>>, ApiError> {
        self.gateway.login(credentials).await?;
        let snapshot = self.refresh().await;
        if snapshot.identity.is_none() {
            warn!("credential exchange succeeded but no identity was resolved");
        }
        Ok(snapshot.identity)
    }

    /// End the session. The local identity is cleared whatever the server says.
    pub async fn logout(&self) -> SessionSnapshot {
        if let Err(error) = self.gateway.logout().await {
            warn!(%error, "logout request failed; clearing session locally");
        }
        self.publish(None)
    }

    /// Create an applicant account without signing in.
    pub async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        self.gateway.register(registration).await
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ids::IdentityId;
    use crate::domain::ports::MockAuthGateway;
    use rstest::rstest;

    fn ada() -> Identity {
        Identity::new(
            IdentityId::new("u-1").expect("identity id"),
            "ada@example.com",
            Role::Applicant,
        )
        .with_display_name("Ada")
    }

    fn credentials() -> LoginCredentials {
        LoginCredentials::try_from_parts("ada@example.com", "pw").expect("credentials")
    }

    fn resolver(gateway: MockAuthGateway) -> SessionResolver<MockAuthGateway> {
        SessionResolver::new(Arc::new(gateway))
    }

    #[test]
    fn starts_unresolved_and_signed_out() {
        let snapshot = resolver(MockAuthGateway::new()).snapshot();
        assert!(!snapshot.is_resolved());
        assert!(!snapshot.is_authenticated());
    }

    #[rstest]
    #[case::absent(Ok(None))]
    #[case::transport(Err(ApiError::transport("connection refused")))]
    #[case::decode(Err(ApiError::decode("unexpected role")))]
    #[tokio::test]
    async fn initialize_swallows_missing_sessions(
        #[case] outcome: Result<Option<Identity>, ApiError>,
    ) {
        let mut gateway = MockAuthGateway::new();
        gateway
            .expect_profile()
            .times(1)
            .return_once(move || outcome);
        let snapshot = resolver(gateway).initialize().await;
        assert!(snapshot.is_resolved());
        assert!(!snapshot.is_authenticated());
        assert!(snapshot.identity().is_none());
    }

    #[tokio::test]
    async fn login_returns_the_resolved_identity() {
        let mut gateway = MockAuthGateway::new();
        gateway.expect_login().times(1).returning(|_| Ok(()));
        gateway
            .expect_profile()
            .times(1)
            .returning(|| Ok(Some(ada())));
        let resolver = resolver(gateway);

        let identity = resolver.login(&credentials()).await.expect("login");
        assert_eq!(identity.as_deref().map(Identity::role), Some(Role::Applicant));
        assert!(resolver.snapshot().is_authenticated());
    }

    #[tokio::test]
    async fn login_reports_none_when_the_profile_is_unavailable() {
        let mut gateway = MockAuthGateway::new();
        gateway.expect_login().times(1).returning(|_| Ok(()));
        gateway
            .expect_profile()
            .times(1)
            .returning(|| Err(ApiError::timeout("5s")));
        let identity = resolver(gateway).login(&credentials()).await.expect("login");
        assert!(identity.is_none());
    }

    #[tokio::test]
    async fn rejected_login_leaves_the_snapshot_untouched() {
        let mut gateway = MockAuthGateway::new();
        gateway
            .expect_login()
            .times(1)
            .returning(|_| Err(ApiError::rejected(401_u16, "Invalid credentials")));
        gateway.expect_profile().never();
        let resolver = resolver(gateway);

        let error = resolver.login(&credentials()).await.expect_err("rejected");
        assert_eq!(error.user_message("fallback"), "Invalid credentials");
        assert_eq!(resolver.snapshot().revision(), 0);
    }

    #[tokio::test]
    async fn logout_clears_even_when_the_server_fails() {
        let mut gateway = MockAuthGateway::new();
        gateway
            .expect_profile()
            .times(1)
            .returning(|| Ok(Some(ada())));
        gateway
            .expect_logout()
            .times(1)
            .returning(|| Err(ApiError::transport("offline")));
        let resolver = resolver(gateway);

        assert!(resolver.initialize().await.is_authenticated());
        let snapshot = resolver.logout().await;
        assert!(!snapshot.is_authenticated());
        assert_eq!(snapshot.revision(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn racing_operations_return_their_own_snapshot() {
        let mut gateway = MockAuthGateway::new();
        gateway.expect_login().returning(|_| Ok(()));
        gateway.expect_profile().returning(|| Ok(Some(ada())));
        gateway.expect_logout().returning(|| Ok(()));
        let resolver = Arc::new(resolver(gateway));

        for _ in 0..100 {
            let other = Arc::clone(&resolver);
            let logout = tokio::spawn(async move { other.logout().await });
            let identity = resolver.login(&credentials()).await.expect("login");
            assert!(identity.is_some());
            let signed_out = logout.await.expect("logout task");
            assert!(!signed_out.is_authenticated());
        }
    }

    #[tokio::test]
    async fn subscribers_observe_each_snapshot() {
        let mut gateway = MockAuthGateway::new();
        gateway
            .expect_profile()
            .times(1)
            .returning(|| Ok(Some(ada())));
        let resolver = resolver(gateway);
        let mut receiver = resolver.subscribe();

        resolver.refresh().await;
        receiver.changed().await.expect("snapshot published");
        assert!(receiver.borrow_and_update().is_authenticated());
    }

    #[tokio::test]
    async fn register_delegates_to_the_gateway() {
        let mut gateway = MockAuthGateway::new();
        gateway
            .expect_register()
            .withf(|r: &Registration| {
                r.name() == "Ada" && r.credentials().email() == "ada@example.com"
            })
            .times(1)
            .returning(|_| Ok(()));
        let registration =
            Registration::try_from_parts("ada@example.com", "pw", "Ada").expect("registration");
        resolver(gateway)
            .register(&registration)
            .await
            .expect("registration succeeds");
    }
}
