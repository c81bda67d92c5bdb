/// Mouse input helpers
pub mod coordinates;
