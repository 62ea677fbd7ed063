pub mod niche;
pub mod numeric;
