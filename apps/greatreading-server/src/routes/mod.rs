//! Route modules for the GreatReading server

pub mod books;
pub mod definitions;
pub mod dictionary;
pub mod health;
pub mod settings;
