//! Audit-trail queries.

use stockbook_auth::Actor;
use stockbook_core::{DomainResult, Page, PageArgs};
use stockbook_infra::UnitOfWork;

use crate::views::{self, ActivityView};
use crate::Services;

impl<S: UnitOfWork> Services<S> {
    /// `activityLogs` query: platform sees the whole feed, everyone else
    /// their own entries.
    pub fn activity_logs(&self, actor: &Actor, page: PageArgs) -> DomainResult<Page<ActivityView>> {
        let scope = if actor.is_platform() {
            None
        } else {
            Some(actor.user_id)
        };
        self.store.read(|docs| {
            Page::slice(docs.activity_scoped(scope), page)?
                .try_map(|entry| views::activity_view(docs, &entry))
        })
    }
}
