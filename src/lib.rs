pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod middlewares;
pub mod models;
pub mod pages;
pub mod routes;
pub mod services;
pub mod state;
pub mod structs;
pub mod utils;
