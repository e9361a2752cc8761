//! First-use resolution of the process-wide security context. The cache is
//! per process, so this file keeps its own test binary.

use std::thread;

use gridflow_security::config::RuntimeProps;
use gridflow_security::identity::SecurityContext;
use gridflow_security::runtime::security_context;

fn ctx_addr(ctx: &'static dyn SecurityContext) -> usize {
    ctx as *const dyn SecurityContext as *const () as usize
}

#[test]
fn concurrent_first_access_resolves_a_single_instance() {
    let mut handles = Vec::new();
    for _ in 0..8 {
        handles.push(thread::spawn(|| {
            let ctx = security_context(&RuntimeProps::new()).unwrap();
            assert_eq!(ctx.context_name(), "default");
            ctx_addr(ctx)
        }));
    }
    let addrs: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(addrs.windows(2).all(|pair| pair[0] == pair[1]));

    // Resolution happened at most once: later callers get the cached
    // instance no matter what their props say.
    let yarn_props = RuntimeProps::from_pairs([("gridflow.yarn.mode", "true")]);
    let again = security_context(&yarn_props).unwrap();
    assert_eq!(again.context_name(), "default");
    assert_eq!(ctx_addr(again), addrs[0]);
}
