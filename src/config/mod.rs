//! Storage-client configuration: construction, provenance tracking, and the
//! thread-safety retrofit applied before a conf is shared across workers.
//! Keep the public surface thin and split implementation across sub-modules.

mod builder;
mod conf;
mod props;
mod sync;

pub use builder::{new_storage_conf, BUFFER_SIZE_PROP, DEFAULT_BUFFER_SIZE, HADOOP_OVERRIDE_PREFIX};
pub use conf::{StorageConf, ValueOrigin};
pub use props::RuntimeProps;
pub use sync::harden;

pub(crate) use props::truthy;
