use std::time::Duration;

use server_api::ApiContext;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) api: ApiContext,
    /// Fixed pause added before every contact response, whatever the outcome.
    pub(crate) response_delay: Duration,
}
