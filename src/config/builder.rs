//! Construction of storage-client configurations from defaults, environment
//! credentials, and `gridflow.hadoop.*` pass-through overrides.

use std::env;

use tracing::debug;

use super::conf::{StorageConf, ValueOrigin};
use super::props::RuntimeProps;
use super::sync::harden;

/// Props keys carrying this prefix are copied into the conf with the prefix
/// stripped, so callers can tune any storage-client key without this crate
/// knowing its name.
pub const HADOOP_OVERRIDE_PREFIX: &str = "gridflow.hadoop.";

/// Props key for the I/O buffer size applied to `io.file.buffer.size`.
pub const BUFFER_SIZE_PROP: &str = "gridflow.buffer.size";
pub const DEFAULT_BUFFER_SIZE: &str = "65536";

const BUFFER_SIZE_CONF: &str = "io.file.buffer.size";

const ACCESS_KEY_ENV: &str = "AWS_ACCESS_KEY_ID";
const SECRET_KEY_ENV: &str = "AWS_SECRET_ACCESS_KEY";

// Both historical object-store scheme variants get each credential.
const ACCESS_KEY_CONF: [&str; 2] = ["fs.s3.awsAccessKeyId", "fs.s3n.awsAccessKeyId"];
const SECRET_KEY_CONF: [&str; 2] = ["fs.s3.awsSecretAccessKey", "fs.s3n.awsSecretAccessKey"];

/// Build a storage-client configuration.
///
/// With no `props`, the result is a bare default conf for callers that only
/// need a minimal object. With `props`, the conf picks up object-store
/// credentials from the environment (both halves or neither), the I/O
/// buffer size (default 65536), and every `gridflow.hadoop.*` override with
/// its prefix stripped. Absent env vars and absent overrides are normal and
/// skipped silently.
///
/// The returned conf has already been hardened for sharing.
pub fn new_storage_conf(props: Option<&RuntimeProps>) -> StorageConf {
    let Some(props) = props else {
        return harden(&StorageConf::new());
    };

    let mut conf = StorageConf::new();

    if let (Ok(access_id), Ok(secret)) = (env::var(ACCESS_KEY_ENV), env::var(SECRET_KEY_ENV)) {
        for key in ACCESS_KEY_CONF {
            conf.set_from(key, &access_id, ValueOrigin::Environment);
        }
        for key in SECRET_KEY_CONF {
            conf.set_from(key, &secret, ValueOrigin::Environment);
        }
    }

    // Buffer size first: an explicit gridflow.hadoop.io.file.buffer.size
    // override must win over the configured/default size.
    let buffer = props.get_or(BUFFER_SIZE_PROP, DEFAULT_BUFFER_SIZE);
    conf.set_from(BUFFER_SIZE_CONF, &buffer, ValueOrigin::ProcessConfig);

    let mut copied = 0usize;
    for (key, value) in props.all() {
        if let Some(suffix) = key.strip_prefix(HADOOP_OVERRIDE_PREFIX) {
            conf.set_from(suffix, value, ValueOrigin::ProcessConfig);
            copied += 1;
        }
    }

    debug!(
        target: "gridflow::config",
        "built storage conf: {} entries ({} pass-through overrides)",
        conf.len(), copied
    );
    harden(&conf)
}
