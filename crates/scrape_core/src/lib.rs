//! Scrape core: pure state machine and view-model helpers.
//!
//! Nothing in this crate performs IO. The engine feeds [`Msg`]s in through
//! [`update`] and executes the [`Effect`]s that come back out.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{
    AppState, RequestId, ScrapeState, EMPTY_URL_MESSAGE, MANIFEST_FAILED_MESSAGE,
    SCRAPE_FAILED_MESSAGE,
};
pub use update::update;
pub use view_model::{AppViewModel, Status};
