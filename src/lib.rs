//! A small byte-oriented terminal text editor built on a gap buffer

pub mod app;
pub mod config;
pub mod input;
pub mod model;
pub mod services;
pub mod view;
