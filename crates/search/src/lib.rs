mod registry;
mod selected;
mod session;

pub use registry::*;
pub use selected::*;
pub use session::*;
