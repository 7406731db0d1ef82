pub mod diff;
pub mod export;
pub mod info;
pub mod pixel;
pub mod preset;
