//! Terminal front end: a menu to configure the table and a table view to
//! play one seat against bots.

pub mod app;
pub mod controller;
pub mod ui;
