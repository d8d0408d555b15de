mod batch;
mod coalescer;
mod random;
mod recommend;
mod store;
mod subscription;

pub use batch::*;
pub use coalescer::*;
pub use random::*;
pub use recommend::*;
pub use store::*;
pub use subscription::*;
