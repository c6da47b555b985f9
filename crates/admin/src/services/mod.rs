//! Business services for the back office.

pub mod auth;
pub mod best_sellers;
pub mod goals;
pub mod uploads;
pub mod whatsapp;
