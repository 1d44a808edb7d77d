use std::sync::Arc;

use chrono::TimeDelta;

use crate::domain::{
    error::{AuthError, AuthResult},
    models::token::Token,
    models::user::User,
    services::{payload::PayloadFactory, timer::Timer},
};
use crate::services::issuer::{Issuer, IssuerFactory};

/// Decides whether a token still represents a signed in user.
#[derive(Clone)]
pub struct Authenticator {
    timer: Arc<dyn Timer>,
    token_valid_duration: TimeDelta,
    issuer: Issuer,
}

impl Authenticator {
    pub fn generate_token(&self, user: &User) -> AuthResult<String> {
        self.issuer.issued_token(user)
    }

    pub fn is_signed_in(&self, token: &str) -> bool {
        match self.issuer.parse_token(token) {
            Ok(token) => self.is_token_valid(&token),
            Err(error) => {
                tracing::debug!(%error, "rejecting token");
                false
            }
        }
    }

    pub fn get_user(&self, token: &str) -> AuthResult<User> {
        let token = self.issuer.parse_token(token)?;

        if !self.is_token_valid(&token) {
            return Err(AuthError::TokenExpired);
        }
        Ok(token.user)
    }

    pub fn token_valid_duration(&self) -> TimeDelta {
        self.token_valid_duration
    }

    // Inclusive: a token expiring at exactly `now` is still valid.
    fn is_token_valid(&self, token: &Token) -> bool {
        let Some(expire_at) = token.issued_at.checked_add_signed(self.token_valid_duration) else {
            return false;
        };

        let now = self.timer.now();
        if now > expire_at {
            tracing::debug!(user_id = %token.user.id, %expire_at, "token expired");
            return false;
        }
        true
    }
}

/// Fixes the timer and expiry policy once, for any payload shape.
#[derive(Clone)]
pub struct AuthenticatorFactory {
    issuer_factory: IssuerFactory,
    timer: Arc<dyn Timer>,
    token_valid_duration: TimeDelta,
}

impl AuthenticatorFactory {
    pub fn new(
        timer: Arc<dyn Timer>,
        token_valid_duration: TimeDelta,
        issuer_factory: IssuerFactory,
    ) -> Self {
        AuthenticatorFactory {
            issuer_factory,
            timer,
            token_valid_duration,
        }
    }

    pub fn make_authenticator(&self, payload_factory: Arc<dyn PayloadFactory>) -> Authenticator {
        Authenticator {
            timer: self.timer.clone(),
            token_valid_duration: self.token_valid_duration,
            issuer: self.issuer_factory.make_issuer(payload_factory),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::token::TokenPayload;
    use crate::domain::services::tokenizer::Tokenizer;
    use crate::services::jsonwebtoken::mock::TokenizerFake;
    use crate::services::payload::UserPayloadFactory;
    use crate::services::payload::mock::{PayloadFactoryStub, PayloadStub};
    use crate::services::timer::mock::TimerFake;

    use chrono::{DateTime, Utc};
    use rstest::*;

    fn issued_at() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2006-01-02T15:04:05Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn alpha() -> User {
        User {
            id: "alpha".to_string(),
            name: "Alpha".to_string(),
            email: "alpha@example.com".to_string(),
        }
    }

    struct Setup {
        timer: Arc<TimerFake>,
        authenticator: Authenticator,
    }

    fn setup(
        current_time: DateTime<Utc>,
        token_valid_duration: TimeDelta,
        payload_factory: impl PayloadFactory,
    ) -> Setup {
        let timer = Arc::new(TimerFake::new(current_time));
        let issuer_factory = IssuerFactory::new(Arc::new(TokenizerFake), timer.clone());
        let authenticator = AuthenticatorFactory::new(
            timer.clone(),
            token_valid_duration,
            issuer_factory,
        )
        .make_authenticator(Arc::new(payload_factory));

        Setup {
            timer,
            authenticator,
        }
    }

    fn stub(token_payload: TokenPayload, user: User, token_err: Option<AuthError>) -> PayloadFactoryStub {
        PayloadFactoryStub {
            payload: PayloadStub {
                user,
                token_payload,
            },
            token_err,
            user_err: None,
        }
    }

    fn with_issued_at(mut payload: TokenPayload) -> TokenPayload {
        payload.insert("issued_at", "2006-01-02T15:04:05Z");
        payload
    }

    fn email_only() -> TokenPayload {
        [("email", "alpha@example.com")].into_iter().collect()
    }

    enum Expect {
        SignedIn,
        Rejected(fn(&AuthError) -> bool),
    }

    #[rstest]
    #[case::empty_token_payload(
        TimeDelta::minutes(30),
        TokenPayload::new(),
        None,
        Expect::Rejected(|err| matches!(err, AuthError::MissingClaim(_))),
    )]
    #[case::token_expired(
        TimeDelta::hours(2),
        with_issued_at(TokenPayload::new()),
        None,
        Expect::Rejected(|err| *err == AuthError::TokenExpired),
    )]
    #[case::token_valid(
        TimeDelta::minutes(30),
        with_issued_at(TokenPayload::new()),
        None,
        Expect::SignedIn,
    )]
    #[case::incorrect_user_info(
        TimeDelta::minutes(30),
        with_issued_at(email_only()),
        Some(AuthError::PayloadConversion("user ID not found in token payload".into())),
        Expect::Rejected(|err| matches!(err, AuthError::PayloadConversion(_))),
    )]
    #[case::no_issued_at(
        TimeDelta::minutes(30),
        email_only(),
        None,
        Expect::Rejected(|err| matches!(err, AuthError::MissingClaim(_))),
    )]
    fn test_presented_token(
        #[case] elapsed: TimeDelta,
        #[case] token_payload: TokenPayload,
        #[case] token_err: Option<AuthError>,
        #[case] expect: Expect,
    ) {
        let Setup { authenticator, .. } = setup(
            issued_at() + elapsed,
            TimeDelta::hours(1),
            stub(token_payload.clone(), alpha(), token_err),
        );
        let token = TokenizerFake.encode(&token_payload).unwrap();

        match expect {
            Expect::SignedIn => {
                assert!(authenticator.is_signed_in(&token));
                assert_eq!(authenticator.get_user(&token), Ok(alpha()));
            }
            Expect::Rejected(is_expected) => {
                assert!(!authenticator.is_signed_in(&token));
                let err = authenticator.get_user(&token).unwrap_err();
                assert!(is_expected(&err), "unexpected error: {err:?}");
            }
        }
    }

    #[rstest]
    #[case::just_issued(TimeDelta::zero(), true)]
    #[case::exactly_at_expiry(TimeDelta::hours(1), true)]
    #[case::one_second_late(TimeDelta::hours(1) + TimeDelta::seconds(1), false)]
    #[case::one_tick_late(TimeDelta::hours(1) + TimeDelta::nanoseconds(1), false)]
    fn test_expiry_boundary(#[case] elapsed: TimeDelta, #[case] signed_in: bool) {
        let Setup {
            timer,
            authenticator,
        } = setup(issued_at(), TimeDelta::hours(1), UserPayloadFactory);
        let token = authenticator.generate_token(&alpha()).unwrap();

        timer.advance(elapsed);

        assert_eq!(authenticator.is_signed_in(&token), signed_in);
    }

    #[test]
    fn test_sign_in_then_expire() {
        let Setup {
            timer,
            authenticator,
        } = setup(issued_at(), TimeDelta::hours(1), UserPayloadFactory);
        let user = User {
            id: "alpha".to_string(),
            name: String::new(),
            email: "alpha@example.com".to_string(),
        };

        let token = authenticator.generate_token(&user).unwrap();
        assert!(authenticator.is_signed_in(&token));
        assert_eq!(authenticator.get_user(&token), Ok(user));

        timer.set(issued_at() + TimeDelta::hours(2));

        assert!(!authenticator.is_signed_in(&token));
        assert_eq!(authenticator.get_user(&token), Err(AuthError::TokenExpired));
    }

    #[test]
    fn test_expiry_overflow_is_expired() {
        let Setup { authenticator, .. } =
            setup(issued_at(), TimeDelta::MAX, UserPayloadFactory);
        let token = authenticator.generate_token(&alpha()).unwrap();

        assert!(!authenticator.is_signed_in(&token));
    }

    #[rstest]
    #[case::garbage("some random unrelated string")]
    #[case::empty("")]
    #[case::json_null("null")]
    #[case::bare_claims("{\"id\": null, \"issued_at\": 5}")]
    fn test_unrelated_string_is_not_signed_in(#[case] token: &str) {
        let Setup { authenticator, .. } =
            setup(issued_at(), TimeDelta::hours(1), UserPayloadFactory);

        assert!(!authenticator.is_signed_in(token));
        assert!(matches!(
            authenticator.get_user(token),
            Err(AuthError::TokenDecode(_))
        ));
    }

    #[test]
    fn test_shared_across_threads() {
        let Setup { authenticator, .. } =
            setup(issued_at(), TimeDelta::hours(1), UserPayloadFactory);

        std::thread::scope(|scope| {
            for index in 0..8 {
                let authenticator = &authenticator;
                scope.spawn(move || {
                    let user = User {
                        id: format!("user-{index}"),
                        name: String::new(),
                        email: format!("user-{index}@example.com"),
                    };
                    let token = authenticator.generate_token(&user).unwrap();
                    assert_eq!(authenticator.get_user(&token), Ok(user));
                });
            }
        });
    }

    #[test]
    fn test_payload_factories_share_policy() {
        let timer = Arc::new(TimerFake::new(issued_at()));
        let factory = AuthenticatorFactory::new(
            timer.clone(),
            TimeDelta::hours(1),
            IssuerFactory::new(Arc::new(TokenizerFake), timer.clone()),
        );
        let users = factory.make_authenticator(Arc::new(UserPayloadFactory));
        let stubbed = factory.make_authenticator(Arc::new(stub(
            TokenPayload::new(),
            alpha(),
            None,
        )));

        let token = users.generate_token(&alpha()).unwrap();
        assert!(stubbed.is_signed_in(&token));

        timer.advance(TimeDelta::hours(3));
        assert!(!users.is_signed_in(&token));
        assert!(!stubbed.is_signed_in(&token));
    }
}
