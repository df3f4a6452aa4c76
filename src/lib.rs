pub mod bedrock;
pub mod config;
pub mod error;
pub mod handler;
pub mod params;
pub mod persistence;
pub mod request;
pub mod storage;
pub mod web;
