mod progress;

pub use progress::ProgressStream;
