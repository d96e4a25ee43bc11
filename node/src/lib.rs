// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod api;
pub mod app;
pub mod beacon;
pub mod chain;
pub mod config;
pub mod errors;
pub mod server;
pub mod telemetry;
