//! Account commands.

use booklend_client::Result;
use booklend_client::forms::{LoginForm, RegisterForm};
use booklend_client::notice::Notice;
use booklend_client::session;
use booklend_client::state::AppState;
use secrecy::SecretString;

use crate::output;

pub async fn login(state: &AppState, email: String, password: String) -> Result<()> {
    let form = LoginForm {
        email,
        password: SecretString::from(password),
    };
    let mut session = state.session();

    let auth = session::login(state.api(), state.store(), &mut session, &form).await?;

    output::notice(&Notice::success(format!("Welcome, {}", auth.user.name)));
    Ok(())
}

pub fn logout(state: &AppState) -> Result<()> {
    let mut session = state.session();
    session::logout(state.store(), &mut session)?;

    output::notice(&Notice::success("Logged out"));
    Ok(())
}

pub async fn register(
    state: &AppState,
    name: String,
    email: String,
    phone: String,
    password: String,
    confirm_password: String,
) -> Result<()> {
    let form = RegisterForm {
        name,
        email,
        phone,
        password: SecretString::from(password),
        confirm_password: SecretString::from(confirm_password),
    };

    let notice = session::register(state.api(), &form).await?;
    output::notice(&notice);
    Ok(())
}

pub async fn whoami(state: &AppState) -> Result<()> {
    let auth = super::require_auth(state)?;
    let profile = state.api().me(&auth.token).await?;

    output::profile(&profile);
    Ok(())
}
