pub mod format;
pub mod io_input;
pub mod spinner;
pub(crate) mod user_messages;
