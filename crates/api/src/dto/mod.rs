pub mod lookup;
pub mod task;

pub use lookup::{LookupRequest, LookupResponse, ServerInput};
pub use task::TaskResponse;
