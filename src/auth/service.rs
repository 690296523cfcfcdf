// Authentication service - business logic layer

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::auth::{
    error::AuthError,
    models::{AccessTokenResponse, NewUser, RegisterRequest, TokenPairResponse, User},
    password::PasswordService,
    repository::UserStore,
    token::TokenService,
};

const BEARER_SCHEME: &str = "Bearer";

/// Authentication service coordinating all auth operations
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: TokenService,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenService) -> Self {
        Self { users, tokens }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Register a new user
    pub async fn register(&self, request: RegisterRequest) -> Result<User, AuthError> {
        if self.users.email_exists(&request.email).await? {
            warn!("Registration attempted with an already registered email");
            return Err(AuthError::EmailAlreadyExists);
        }

        let password_hash = PasswordService::hash_password_async(request.password).await?;

        // A concurrent registration can still win the race; the store's
        // unique index turns that into EmailAlreadyExists as well.
        let user = self
            .users
            .create_user(NewUser {
                name: request.name,
                email: request.email,
                password_hash,
                admin: request.admin,
            })
            .await?;

        info!("Registered user {} (admin: {})", user.id, user.admin);
        Ok(user)
    }

    /// Check an email/password pair against the credential store
    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let matches =
            PasswordService::verify_password_async(password.to_string(), user.password_hash.clone())
                .await?;
        if !matches {
            warn!("Failed login for user {}", user.id);
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Login a user, returning an access and a refresh token
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPairResponse, AuthError> {
        let user = self.verify_credentials(email, password).await?;
        let (access_token, refresh_token) = self.tokens.issue_token_pair(user.id)?;

        info!("User {} logged in", user.id);
        Ok(TokenPairResponse::bearer(access_token, refresh_token))
    }

    /// OAuth2 password-grant login; only an access token is returned
    pub async fn login_form(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AccessTokenResponse, AuthError> {
        let user = self.verify_credentials(username, password).await?;
        let access_token = self.tokens.issue_access_token(user.id)?;

        info!("User {} logged in through the password grant", user.id);
        Ok(AccessTokenResponse::bearer(access_token))
    }

    /// Issue a fresh access token for an already authenticated user
    pub fn refresh(&self, user: &User) -> Result<AccessTokenResponse, AuthError> {
        let access_token = self.tokens.issue_access_token(user.id)?;
        debug!("Issued refreshed access token for user {}", user.id);
        Ok(AccessTokenResponse::bearer(access_token))
    }

    /// Resolve an `Authorization` header value to a stored user
    ///
    /// NoToken → MissingToken, bad token → InvalidToken/ExpiredToken,
    /// valid token for a vanished user → UnknownSubject.
    pub async fn authenticate(&self, authorization: Option<&str>) -> Result<User, AuthError> {
        let header = authorization.ok_or(AuthError::MissingToken)?;

        // Scheme is case-insensitive: clients echo `token_type: "bearer"`
        let token = header
            .trim_start()
            .split_once(char::is_whitespace)
            .filter(|(scheme, _)| scheme.eq_ignore_ascii_case(BEARER_SCHEME))
            .map(|(_, token)| token.trim())
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;

        let user_id = self.tokens.validate(token)?;

        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UnknownSubject)
    }
}
