pub mod api;
pub mod cart;
pub mod commands;
pub mod config;
pub mod env;
pub mod http;
pub mod runtime;
pub mod session;
pub mod storage;
