use session::SignOut;

use crate::state::AppState;
use crate::Error;

/// Changes the account password, then signs out so the next sign-in uses
/// the new credentials.
pub async fn change_password(state: &AppState, password: &str, confirm: &str) -> Result<SignOut, Error> {
    if password != confirm {
        return Err(Error::PasswordMismatch);
    }

    match state.session.update_password(password).await {
        Ok(()) => Ok(state.session.sign_out().await),
        Err(session::Error::NoSession) => Err(Error::NoSession),
        Err(e) => Err(e.into()),
    }
}
