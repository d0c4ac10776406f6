use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    get_current_timestamp,
};
use uuid::Uuid;

use super::{AuthError, Claims, Role};

#[derive(Clone)]
pub struct JwtKeys {
    pub enc: EncodingKey,
    pub dec: DecodingKey,
}

impl JwtKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            enc: EncodingKey::from_secret(secret),
            dec: DecodingKey::from_secret(secret),
        }
    }
}

/// Signs and verifies HS256 access tokens with one process-wide secret.
#[derive(Clone)]
pub struct TokenIssuer {
    keys: JwtKeys,
    access_ttl_secs: u64,
}

impl TokenIssuer {
    pub fn new(secret: &[u8], access_ttl_secs: u64) -> Self {
        Self {
            keys: JwtKeys::from_secret(secret),
            access_ttl_secs,
        }
    }

    pub fn make_access_claims(&self, user_id: &Uuid, role: Role) -> Claims {
        let iat = get_current_timestamp();
        Claims {
            sub: user_id.to_string(),
            role,
            iat,
            exp: iat + self.access_ttl_secs,
        }
    }

    pub fn issue_access_token(&self, user_id: &Uuid, role: Role) -> Result<String, AuthError> {
        self.encode_claims(&self.make_access_claims(user_id, role))
    }

    pub fn verify_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        decode::<Claims>(token, &self.keys.dec, &validation)
            .map(|data| data.claims)
            .map_err(|err| {
                tracing::debug!("access token rejected: {err}");
                AuthError::InvalidToken
            })
    }

    fn encode_claims(&self, claims: &Claims) -> Result<String, AuthError> {
        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".into());

        encode(&header, claims, &self.keys.enc)
            .map_err(|err| AuthError::internal(format!("token encoding failed: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::get_current_timestamp;
    use uuid::Uuid;

    use crate::auth::{AuthError, Claims, Role};

    use super::TokenIssuer;

    #[test]
    fn makes_claims_with_expected_subject_role_and_ttl() {
        let issuer = TokenIssuer::new(b"unit-test-secret", 60);
        let user_id = Uuid::new_v4();
        let claims = issuer.make_access_claims(&user_id, Role::User);

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.role, Role::User);
        assert_eq!(claims.exp - claims.iat, 60);
    }

    #[test]
    fn issued_token_verifies_back_to_subject_and_role() {
        let issuer = TokenIssuer::new(b"unit-test-secret", 900);
        let user_id = Uuid::new_v4();

        for role in [Role::User, Role::Admin] {
            let token = issuer
                .issue_access_token(&user_id, role)
                .expect("token should encode");
            let claims = issuer
                .verify_access_token(&token)
                .expect("token should verify");

            assert_eq!(claims.sub, user_id.to_string());
            assert_eq!(claims.role, role);
        }
    }

    #[test]
    fn rejects_token_signed_with_different_secret() {
        let issuer_a = TokenIssuer::new(b"secret-a", 900);
        let issuer_b = TokenIssuer::new(b"secret-b", 900);
        let token = issuer_a
            .issue_access_token(&Uuid::new_v4(), Role::User)
            .expect("token should encode");

        let err = issuer_b
            .verify_access_token(&token)
            .expect_err("foreign signature should fail");
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[test]
    fn rejects_expired_token() {
        let issuer = TokenIssuer::new(b"unit-test-secret", 900);
        let now = get_current_timestamp();
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            role: Role::User,
            iat: now - 1_000,
            exp: now - 100,
        };
        let token = issuer.encode_claims(&claims).expect("token should encode");

        let err = issuer
            .verify_access_token(&token)
            .expect_err("expired token should fail");
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[test]
    fn rejects_garbage() {
        let issuer = TokenIssuer::new(b"unit-test-secret", 900);

        let err = issuer
            .verify_access_token("not-a-token")
            .expect_err("garbage should fail");
        assert!(matches!(err, AuthError::InvalidToken));
    }
}
