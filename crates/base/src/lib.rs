pub mod logging;
pub use logging::{FileLogger, StdoutLogger, init_file_logger, init_stdout_logger, max_level_from_env};

mod rect;
pub use rect::*;

mod tensor;
pub use tensor::*;

mod vec2;
pub use vec2::*;

pub use log;
