mod auth;
mod common;
mod officer;
mod profile;
