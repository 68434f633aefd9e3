pub mod annotations;
pub mod drag;
pub mod export;
pub mod geometry;
pub mod mapper;
pub mod points;
