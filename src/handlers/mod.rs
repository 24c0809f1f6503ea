pub mod inspector;
pub mod webhooks;

use crate::{error::ApiError, providers::Provider, state::AppState};

fn find_provider<'a>(state: &'a AppState, name: &str) -> Result<&'a Provider, ApiError> {
    state
        .providers
        .get(name)
        .ok_or_else(|| ApiError::not_found(format!("unknown provider: {name}")))
}
