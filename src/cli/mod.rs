pub mod coins;
pub mod price;
pub mod setup;
pub mod ui;
pub mod watch;
