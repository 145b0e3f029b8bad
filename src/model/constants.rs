// Rating engine constants
pub const K_FACTOR: f64 = 32.0;
pub const RATING_SCALE: f64 = 400.0;
pub const DEFAULT_RATING: i32 = 1200;
pub const DEFAULT_PEAK_RATING: i32 = DEFAULT_RATING;
