// public modules
pub mod error;
pub mod logger;
pub mod pool;
pub mod strftime;
pub mod timeformat;
pub mod timezone;
pub mod tristate;
pub mod writer;

// public uses
pub use error::{Error, Result};
pub use logger::{done, init, rotate};
pub use strftime::{expand_path, strftime};
pub use timeformat::expand_time_format;
pub use timezone::ZoneName;
pub use tristate::TriState;
pub use writer::RotatingLogWriter;
