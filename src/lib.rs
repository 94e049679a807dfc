pub mod app_state;
pub mod clients;
pub mod config;
pub mod errors;
pub mod models;
pub mod services;

#[cfg(test)]
pub mod test_utils;
