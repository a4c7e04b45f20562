mod common;

use common::{action_registry, executor, HostLifecycle, UserDirectory};
use std::sync::Arc;
use viewroute::host::{BufferedContext, RequestContext};
use viewroute::lifecycle::{
    ActionLifecycle, Lifecycle, LifecycleFactory, ACTION_LIFECYCLE_ID, DEFAULT_LIFECYCLE_ID,
};

fn compose() -> (LifecycleFactory, Arc<HostLifecycle>) {
    let host = Arc::new(HostLifecycle::default());
    let mut factory = LifecycleFactory::with_default(Arc::clone(&host) as Arc<dyn Lifecycle>);
    let action = ActionLifecycle::from_factory(
        Arc::new(action_registry()),
        executor(UserDirectory::default()),
        &factory,
    )
    .unwrap();
    factory
        .add_lifecycle(ACTION_LIFECYCLE_ID, Arc::new(action))
        .unwrap();
    (factory, host)
}

#[test]
fn test_literal_mapping_preferred() {
    let (factory, host) = compose();
    let action = factory.get_lifecycle(ACTION_LIFECYCLE_ID).unwrap();

    let mut ctx = BufferedContext::get("/a/fixed");
    action.execute(&mut ctx).unwrap();
    action.render(&mut ctx).unwrap();
    assert_eq!(ctx.view_id(), Some("/fixed.xhtml"));
    assert_eq!(ctx.response_text(), Some("<html>/fixed.xhtml</html>"));

    let mut ctx = BufferedContext::get("/a/other");
    action.execute(&mut ctx).unwrap();
    action.render(&mut ctx).unwrap();
    assert_eq!(ctx.view_id(), Some("/variable-other.xhtml"));
    assert_eq!(host.render_count(), 2);
}

#[test]
fn test_action_mappings_accept_any_verb() {
    let (factory, _) = compose();
    let action = factory.get_lifecycle(ACTION_LIFECYCLE_ID).unwrap();
    let mut ctx = BufferedContext::post("/a/fixed");
    action.execute(&mut ctx).unwrap();
    assert_eq!(ctx.view_id(), Some("/fixed.xhtml"));
}

#[test]
fn test_unmatched_action_is_404_without_host_render() {
    let (factory, host) = compose();
    let action = factory.get_lifecycle(ACTION_LIFECYCLE_ID).unwrap();
    let mut ctx = BufferedContext::get("/b");
    action.execute(&mut ctx).unwrap();
    action.render(&mut ctx).unwrap();
    assert_eq!(ctx.status(), 404);
    assert!(ctx.response_complete());
    assert_eq!(host.render_count(), 0);
}

#[test]
fn test_factory_lists_registered_ids() {
    let (factory, _) = compose();
    assert_eq!(
        factory.lifecycle_ids(),
        vec![DEFAULT_LIFECYCLE_ID.to_string(), ACTION_LIFECYCLE_ID.to_string()]
    );
}
