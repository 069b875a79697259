pub mod icons;
pub mod output;
pub mod progress;
pub mod progress_message;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{dim, section, success, timing, warn};
pub use progress::Spinner;
pub use progress_message::ProgressEvent;
pub use table::{stats_table, TableBuilder};
pub use theme::{theme, Theme};
