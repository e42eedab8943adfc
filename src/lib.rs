pub mod api;
pub mod auth;
pub mod components;
pub mod config;
pub mod error;
pub mod expense;
pub mod expense_view;
pub mod filter;
pub mod format;
pub mod navigation;
pub mod session;
pub mod sort;
mod storage;
pub mod transport;
pub mod upload;

#[cfg(test)]
mod test_utils;
