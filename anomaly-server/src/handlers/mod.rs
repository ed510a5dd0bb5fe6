//! HTTP handlers

pub mod health;
pub mod predict;

#[cfg(test)]
mod tests;
