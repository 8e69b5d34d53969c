// src/handlers/mod.rs

pub mod notify;
