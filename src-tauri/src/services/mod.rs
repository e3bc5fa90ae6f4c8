pub mod csv_codec;
pub mod export;
pub mod feedback;
pub mod ids;
pub mod prompt;
pub mod session;
pub mod storage;
pub mod student;

pub use export::{ExportError, ExportService};
pub use feedback::{FeedbackOption, FeedbackService};
pub use session::SessionService;
pub use storage::{KeyValueStore, MemoryStore, PluginStore};
pub use student::{ImportMode, Student, StudentService};
