pub mod animation;
pub mod entity;
pub mod properties;
pub mod sprite;
