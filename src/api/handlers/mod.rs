pub mod health;
pub mod markers;
