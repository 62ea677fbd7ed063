pub mod droid;
pub mod export;
pub mod openai_client;
pub mod pipeline;
pub mod rank_scraper;
pub mod run_store;
pub mod search_scraper;
pub mod trends_client;

pub use droid::*;
pub use export::*;
pub use openai_client::*;
pub use pipeline::*;
pub use rank_scraper::*;
pub use run_store::*;
pub use search_scraper::*;
pub use trends_client::*;
