mod envelope;
mod responses;

pub use envelope::{Envelope, Status};
pub use responses::*;
