//! EV Dashboard - EV Demand vs Charging Supply
//!
//! Loads EV sales, charging-station usage and regional adoption tables,
//! aggregates them per view and renders the results as interactive charts.

pub mod charts;
pub mod config;
pub mod data;
pub mod gui;
pub mod report;
pub mod stats;
pub mod views;
