// src/handlers/mod.rs

pub mod comment;
pub mod health;
