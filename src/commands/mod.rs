mod cancel;
mod help;
mod start;
mod youtube;

pub use cancel::cancel;
pub use help::help;
pub use start::start;
pub use youtube::youtube;
