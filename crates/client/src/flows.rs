//! Sign-in, sign-out and profile changes: API calls that also move the
//! session store.

use pineapple_auth::User;
use tracing::{info, warn};

use crate::client::PineappleClient;
use crate::error::{ClientError, ClientResult};
use crate::types::{LoginRequest, RegisterRequest, UpdateProfileRequest};

impl PineappleClient {
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<User> {
        let tokens = self
            .auth()
            .login(&LoginRequest {
                email: email.to_owned(),
                password: password.to_owned(),
            })
            .await?;

        self.session()
            .login(tokens.user.clone(), tokens.access_token, tokens.refresh_token);
        info!(user_id = %tokens.user.id, "signed in");
        Ok(tokens.user)
    }

    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<User> {
        let tokens = self.auth().register(request).await?;

        self.session()
            .login(tokens.user.clone(), tokens.access_token, tokens.refresh_token);
        info!(user_id = %tokens.user.id, "account created");
        Ok(tokens.user)
    }

    /// Finish an external identity provider sign-in that handed back a
    /// token pair but no profile.
    ///
    /// On failure the session is left anonymous.
    pub async fn complete_oauth_callback(
        &self,
        access_token: Option<&str>,
        refresh_token: Option<&str>,
    ) -> ClientResult<User> {
        let (Some(access_token), Some(refresh_token)) = (
            access_token.filter(|token| !token.is_empty()),
            refresh_token.filter(|token| !token.is_empty()),
        ) else {
            return Err(ClientError::MissingCallbackTokens);
        };

        // The profile request needs the tokens in place first.
        self.session().set_tokens(access_token, refresh_token);

        match self.users().me().await {
            Ok(user) => {
                // A refresh during the profile call may have rotated the pair.
                let session = self.session().snapshot();
                let access = session.access_token().unwrap_or(access_token).to_owned();
                let refresh = session.refresh_token().unwrap_or(refresh_token).to_owned();
                self.session().login(user.clone(), access, refresh);
                info!(user_id = %user.id, "signed in via identity provider");
                Ok(user)
            }
            Err(error) => {
                warn!(%error, "identity provider sign-in could not load the profile");
                self.session().logout();
                Err(ClientError::CallbackFailed(Box::new(error)))
            }
        }
    }

    /// Tell the server to drop the refresh token, then clear the session.
    ///
    /// The server call is best effort; the local session is cleared either way.
    pub async fn logout(&self) {
        let refresh_token = self.session().refresh_token();

        if let Err(error) = self.auth().logout(refresh_token).await {
            warn!(%error, "logout notification failed, clearing session anyway");
        }

        self.session().logout();
        info!("signed out");
    }

    pub async fn update_profile(&self, update: &UpdateProfileRequest) -> ClientResult<User> {
        let user = self.users().update_me(update).await?;
        self.session().set_user(user.clone());
        Ok(user)
    }

    /// Delete the account server-side, then clear the local session. The
    /// server has already dropped every token, so no logout call is made.
    pub async fn delete_account(&self) -> ClientResult<()> {
        self.users().delete_me().await?;
        self.session().logout();
        info!("account deleted");
        Ok(())
    }
}
