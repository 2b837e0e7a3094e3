pub mod errors;
pub mod filters;
pub mod models;
pub mod policy;
pub mod repo;
pub mod scheduler;
pub mod stats;

pub use errors::*;
pub use filters::*;
pub use models::*;
pub use policy::*;
pub use repo::*;
pub use scheduler::*;
pub use stats::*;
