mod health;
mod redirect;
mod stats;
mod urls;

pub use health::health_handler;
pub use redirect::redirect_handler;
pub use stats::stats_handler;
pub use urls::{create_urls_handler, get_url_handler};
