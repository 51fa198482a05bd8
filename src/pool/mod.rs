pub mod shared;
pub(crate) mod worker_pool;
