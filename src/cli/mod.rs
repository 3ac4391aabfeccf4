pub mod convert;
pub mod display;
pub mod history;
pub mod input;
pub mod interactive;
pub mod setup;
pub mod ui;
