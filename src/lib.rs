//! Paybridge - Payment provider webhook normalization
//!
//! This crate verifies and normalizes Wise and Flutterwave webhooks into one
//! canonical transaction record, and serves cached exchange-rate lookups.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
