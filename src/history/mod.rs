pub mod history_buffer;

pub use history_buffer::{HistoryBuffer, MAX_HISTORY};
