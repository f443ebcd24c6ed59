//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The cookie session carries two values: the internal user id once an
//! account exists, and the verified external identity from the last sign in.
//! Onboarding reads the identity before any user row has been created.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, ExternalIdentity, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const IDENTITY_KEY: &str = "identity";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated user's id in the session cookie.
    pub fn persist_user(&self, user_id: &UserId) -> Result<(), Error> {
        self.0
            .insert(USER_ID_KEY, user_id.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Persist the verified external identity for onboarding.
    pub fn persist_identity(&self, identity: &ExternalIdentity) -> Result<(), Error> {
        self.0
            .insert(IDENTITY_KEY, identity)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current user id from the session, if present.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let id = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(id.and_then(|raw| {
            UserId::new(raw)
                .inspect_err(|error| warn!("invalid user id in session cookie: {error}"))
                .ok()
        }))
    }

    /// Require an authenticated user id or return `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Fetch the pending external identity, if present.
    pub fn identity(&self) -> Result<Option<ExternalIdentity>, Error> {
        match self.0.get::<ExternalIdentity>(IDENTITY_KEY) {
            Ok(identity) => Ok(identity),
            Err(error) => {
                warn!("unreadable identity in session cookie: {error}");
                Ok(None)
            }
        }
    }

    /// Require a verified external identity or return `401 Unauthorized`.
    pub fn require_identity(&self) -> Result<ExternalIdentity, Error> {
        self.identity()?
            .ok_or_else(|| Error::unauthorized("sign in required"))
    }

    /// Drop stored values and rotate the session key before a new sign in.
    pub fn reset(&self) {
        self.0.clear();
        self.0.renew();
    }

    /// Drop every value and expire the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
