pub mod default_route;
pub mod niche_route;
pub mod title_route;
pub mod trends_route;
