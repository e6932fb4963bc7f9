//! Paginated list controller
//!
//! Fetches run in two phases so they can be driven from a background task:
//! `begin_*` hands out a [`FetchTicket`] and `apply` commits its result. Only the
//! ticket issued last is ever applied; anything older is a stale response.
//!
//! In-flight policy:
//! - `load` with a different filter supersedes a pending fetch,
//! - `load` with the same filter and page size coalesces into the pending one,
//! - `load_more` while a fetch is pending is rejected with [`ListError::Busy`].

use super::node::{Node, Page, PageInfo};
use super::ordering::{insert_position, partition_favorites};
use super::query::{ListFilter, ListQuery, QueryComposer};
use crate::api::ListSource;
use crate::error::{FetchError, ListError};

/// Which operation a fetch belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Load,
    LoadMore,
}

/// Handle for one accepted fetch
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    generation: u64,
    kind: FetchKind,
    query: ListQuery,
}

impl FetchTicket {
    pub fn kind(&self) -> FetchKind {
        self.kind
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Result of committing a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The page was merged into the visible nodes
    Applied,
    /// The fetch failed; previous nodes remain and the error flag is set
    Failed,
    /// Stale or unmounted; nothing changed
    Discarded,
}

/// Holds the loaded nodes of one list view
#[derive(Debug)]
pub struct ListController {
    composer: QueryComposer,
    filter: Option<ListFilter>,
    /// Filter that produced the visible nodes
    loaded_filter: Option<ListFilter>,
    page_size: u32,
    nodes: Vec<Node>,
    page_info: PageInfo,
    pages_loaded: usize,
    generation: u64,
    pending: Option<FetchTicket>,
    error: Option<FetchError>,
    failed: Option<FetchKind>,
    mounted: bool,
}

impl ListController {
    pub fn new(composer: QueryComposer) -> Self {
        Self {
            composer,
            filter: None,
            loaded_filter: None,
            page_size: 0,
            nodes: Vec::new(),
            page_info: PageInfo::default(),
            pages_loaded: 0,
            generation: 0,
            pending: None,
            error: None,
            failed: None,
            mounted: true,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn filter(&self) -> Option<&ListFilter> {
        self.filter.as_ref()
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn page_info(&self) -> &PageInfo {
        &self.page_info
    }

    pub fn pages_loaded(&self) -> usize {
        self.pages_loaded
    }

    pub fn has_next_page(&self) -> bool {
        self.page_info.has_next_page
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Ordering of the visible nodes, which follow the filter that produced them
    fn favorites_first(&self) -> bool {
        self.loaded_filter.as_ref().is_some_and(|f| f.favorites_first)
    }

    /// Start loading the first page for `filter`.
    ///
    /// Returns `Ok(None)` when the call was coalesced into an identical pending load.
    pub fn begin_load(
        &mut self,
        filter: ListFilter,
        page_size: u32,
    ) -> Result<Option<FetchTicket>, ListError> {
        if !self.mounted {
            return Err(ListError::Unmounted);
        }
        let query = self
            .composer
            .compose(&filter, None, page_size)
            .ok_or(ListError::InvalidPageSize)?;

        if let Some(pending) = &self.pending {
            if pending.kind == FetchKind::Load && pending.query == query {
                tracing::debug!("coalescing load into pending fetch");
                return Ok(None);
            }
        }

        self.filter = Some(filter);
        self.page_size = page_size;
        Ok(Some(self.issue(FetchKind::Load, query)))
    }

    /// The last page advertised a successor and its cursor still belongs to the current filter
    fn next_page_reachable(&self) -> bool {
        self.page_info.has_next_page
            && self.page_info.end_cursor.is_some()
            && self.loaded_filter == self.filter
    }

    /// Whether `begin_load_more` would issue a fetch right now
    pub fn can_load_more(&self) -> bool {
        self.mounted && self.pending.is_none() && self.next_page_reachable()
    }

    /// Start loading the page after the last loaded one.
    ///
    /// Returns `Ok(None)` without issuing anything when there is no next page.
    pub fn begin_load_more(&mut self) -> Result<Option<FetchTicket>, ListError> {
        if !self.mounted {
            return Err(ListError::Unmounted);
        }
        if self.pending.is_some() {
            return Err(ListError::Busy);
        }
        if !self.next_page_reachable() {
            return Ok(None);
        }
        let (Some(filter), Some(cursor)) = (&self.filter, &self.page_info.end_cursor) else {
            tracing::warn!("next page advertised without a cursor");
            return Ok(None);
        };
        let query = self
            .composer
            .compose(filter, Some(cursor.as_str()), self.page_size)
            .ok_or(ListError::InvalidPageSize)?;
        Ok(Some(self.issue(FetchKind::LoadMore, query)))
    }

    /// Reload the first page with the current filter
    pub fn begin_refresh(&mut self) -> Result<Option<FetchTicket>, ListError> {
        match self.filter.clone() {
            Some(filter) => self.begin_load(filter, self.page_size),
            None => Ok(None),
        }
    }

    /// Re-issue the last failed fetch
    pub fn begin_retry(&mut self) -> Result<Option<FetchTicket>, ListError> {
        match self.failed {
            Some(FetchKind::Load) => self.begin_refresh(),
            Some(FetchKind::LoadMore) => self.begin_load_more(),
            None => Ok(None),
        }
    }

    fn issue(&mut self, kind: FetchKind, query: ListQuery) -> FetchTicket {
        self.generation += 1;
        let ticket = FetchTicket {
            generation: self.generation,
            kind,
            query,
        };
        self.pending = Some(ticket.clone());
        ticket
    }

    fn is_current(&self, ticket: &FetchTicket) -> bool {
        self.pending.as_ref().is_some_and(|p| p.generation == ticket.generation)
            && self.filter.as_ref() == Some(ticket.query.filter())
    }

    /// Commit the result of a fetch started by `begin_*`
    pub fn apply(&mut self, ticket: FetchTicket, result: Result<Page, FetchError>) -> ApplyOutcome {
        if !self.mounted || !self.is_current(&ticket) {
            tracing::debug!(
                generation = ticket.generation,
                current = self.generation,
                "discarding stale list response"
            );
            return ApplyOutcome::Discarded;
        }
        self.pending = None;

        match result {
            Ok(page) => {
                match ticket.kind {
                    FetchKind::Load => {
                        self.nodes = page.nodes;
                        self.loaded_filter = Some(ticket.query.filter().clone());
                        self.pages_loaded = 1;
                    }
                    FetchKind::LoadMore => {
                        self.merge(page.nodes);
                        self.pages_loaded += 1;
                    }
                }
                if self.favorites_first() {
                    self.nodes = partition_favorites(std::mem::take(&mut self.nodes));
                }
                self.page_info = page.page_info;
                self.error = None;
                self.failed = None;
                ApplyOutcome::Applied
            }
            Err(err) => {
                tracing::warn!("list fetch failed: {err}");
                self.error = Some(err);
                self.failed = Some(ticket.kind);
                ApplyOutcome::Failed
            }
        }
    }

    /// Append a page, refreshing nodes that are already loaded instead of duplicating them
    fn merge(&mut self, incoming: Vec<Node>) {
        for node in incoming {
            match self.nodes.iter_mut().find(|n| n.id == node.id) {
                Some(existing) => *existing = node,
                None => self.nodes.push(node),
            }
        }
    }

    /// Splice a node created out-of-band into the loaded nodes.
    ///
    /// Returns the index it was placed at.
    pub fn insert_created(&mut self, node: Node) -> usize {
        self.nodes.retain(|n| n.id != node.id);
        let index = insert_position(&self.nodes, &node, self.favorites_first());
        self.nodes.insert(index, node);
        index
    }

    /// Stop applying results; the view is gone
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.pending = None;
    }

    /// Load the first page through `source`
    pub async fn load<S: ListSource + ?Sized>(
        &mut self,
        source: &S,
        filter: ListFilter,
        page_size: u32,
    ) -> Result<(), ListError> {
        match self.begin_load(filter, page_size)? {
            Some(ticket) => self.run(source, ticket).await,
            None => Ok(()),
        }
    }

    /// Load the next page through `source`; a no-op without a next page
    pub async fn load_more<S: ListSource + ?Sized>(&mut self, source: &S) -> Result<(), ListError> {
        match self.begin_load_more()? {
            Some(ticket) => self.run(source, ticket).await,
            None => Ok(()),
        }
    }

    pub async fn refresh<S: ListSource + ?Sized>(&mut self, source: &S) -> Result<(), ListError> {
        match self.begin_refresh()? {
            Some(ticket) => self.run(source, ticket).await,
            None => Ok(()),
        }
    }

    pub async fn retry<S: ListSource + ?Sized>(&mut self, source: &S) -> Result<(), ListError> {
        match self.begin_retry()? {
            Some(ticket) => self.run(source, ticket).await,
            None => Ok(()),
        }
    }

    async fn run<S: ListSource + ?Sized>(
        &mut self,
        source: &S,
        ticket: FetchTicket,
    ) -> Result<(), ListError> {
        match source.fetch_page(ticket.query()).await {
            Ok(page) => {
                self.apply(ticket, Ok(page));
                Ok(())
            }
            Err(err) => match self.apply(ticket, Err(err.clone())) {
                ApplyOutcome::Failed => Err(err.into()),
                _ => Ok(()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockListSource;
    use crate::state::list::query::ROTATIONS_QUERY;
    use pretty_assertions::assert_eq;

    fn controller() -> ListController {
        ListController::new(QueryComposer::new(ROTATIONS_QUERY))
    }

    fn page(nodes: Vec<Node>, next: Option<&str>) -> Page {
        Page {
            nodes,
            page_info: PageInfo {
                has_next_page: next.is_some(),
                end_cursor: next.map(str::to_string),
            },
        }
    }

    fn ids(controller: &ListController) -> Vec<&str> {
        controller.nodes().iter().map(|n| n.id.as_str()).collect()
    }

    mod load {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_load_replaces_nodes_in_favorites_order() {
            let mut list = controller();
            let ticket = list
                .begin_load(ListFilter::favorites_first(), 10)
                .unwrap()
                .unwrap();
            let outcome = list.apply(
                ticket,
                Ok(page(
                    vec![
                        Node::new("a", false),
                        Node::new("b", true),
                        Node::new("c", false),
                        Node::new("d", true),
                    ],
                    None,
                )),
            );

            assert_eq!(outcome, ApplyOutcome::Applied);
            assert_eq!(ids(&list), vec!["b", "d", "a", "c"]);
            assert!(!list.is_loading());
            assert_eq!(list.pages_loaded(), 1);
        }

        #[test]
        fn test_load_without_favorites_first_keeps_server_order() {
            let mut list = controller();
            let ticket = list.begin_load(ListFilter::default(), 10).unwrap().unwrap();
            list.apply(
                ticket,
                Ok(page(vec![Node::new("a", false), Node::new("b", true)], None)),
            );
            assert_eq!(ids(&list), vec!["a", "b"]);
        }

        #[test]
        fn test_zero_page_size_is_rejected() {
            let mut list = controller();
            assert_eq!(
                list.begin_load(ListFilter::default(), 0),
                Err(ListError::InvalidPageSize)
            );
            assert!(!list.is_loading());
        }

        #[test]
        fn test_failed_refresh_keeps_previous_nodes() {
            let mut list = controller();
            let ticket = list.begin_load(ListFilter::default(), 10).unwrap().unwrap();
            list.apply(ticket, Ok(page(vec![Node::new("a", false)], None)));

            let ticket = list.begin_refresh().unwrap().unwrap();
            let outcome = list.apply(ticket, Err(FetchError::Status(500)));

            assert_eq!(outcome, ApplyOutcome::Failed);
            assert_eq!(ids(&list), vec!["a"]);
            assert_eq!(list.error(), Some(&FetchError::Status(500)));
        }

        #[test]
        fn test_identical_pending_load_is_coalesced() {
            let mut list = controller();
            let first = list.begin_load(ListFilter::favorites_first(), 10).unwrap();
            let second = list.begin_load(ListFilter::favorites_first(), 10).unwrap();

            assert!(first.is_some());
            assert!(second.is_none());
        }

        #[test]
        fn test_overlapping_loads_only_current_filter_applies() {
            let mut list = controller();
            let old = list
                .begin_load(ListFilter::default().with_search("old"), 10)
                .unwrap()
                .unwrap();
            let new = list
                .begin_load(ListFilter::default().with_search("new"), 10)
                .unwrap()
                .unwrap();

            assert_eq!(
                list.apply(new, Ok(page(vec![Node::new("new-1", false)], None))),
                ApplyOutcome::Applied
            );
            assert_eq!(
                list.apply(old, Ok(page(vec![Node::new("old-1", false)], None))),
                ApplyOutcome::Discarded
            );
            assert_eq!(ids(&list), vec!["new-1"]);
        }

        #[test]
        fn test_superseded_response_arriving_first_is_discarded() {
            let mut list = controller();
            let old = list
                .begin_load(ListFilter::default().with_search("old"), 10)
                .unwrap()
                .unwrap();
            let new = list
                .begin_load(ListFilter::default().with_search("new"), 10)
                .unwrap()
                .unwrap();

            assert_eq!(
                list.apply(old, Err(FetchError::Transport("reset".into()))),
                ApplyOutcome::Discarded
            );
            assert!(list.error().is_none());
            assert!(list.is_loading());

            list.apply(new, Ok(page(vec![Node::new("n", false)], None)));
            assert_eq!(ids(&list), vec!["n"]);
        }

        #[test]
        fn test_ticket_applied_twice_is_discarded() {
            let mut list = controller();
            let ticket = list.begin_load(ListFilter::default(), 10).unwrap().unwrap();
            list.apply(ticket.clone(), Ok(page(vec![Node::new("a", false)], None)));
            assert_eq!(
                list.apply(ticket, Ok(page(vec![], None))),
                ApplyOutcome::Discarded
            );
            assert_eq!(ids(&list), vec!["a"]);
        }
    }

    mod load_more {
        use super::*;
        use pretty_assertions::assert_eq;

        fn loaded(next: Option<&str>) -> ListController {
            let mut list = controller();
            let ticket = list
                .begin_load(ListFilter::favorites_first(), 2)
                .unwrap()
                .unwrap();
            list.apply(
                ticket,
                Ok(page(vec![Node::new("a", true), Node::new("b", false)], next)),
            );
            list
        }

        #[test]
        fn test_uses_end_cursor_and_same_filter() {
            let mut list = loaded(Some("c1"));
            let ticket = list.begin_load_more().unwrap().unwrap();

            assert_eq!(ticket.kind(), FetchKind::LoadMore);
            assert_eq!(ticket.query().cursor(), Some("c1"));
            assert_eq!(ticket.query().filter(), &ListFilter::favorites_first());
            assert_eq!(ticket.query().page_size(), 2);
        }

        #[test]
        fn test_appends_after_existing_nodes() {
            let mut list = loaded(Some("c1"));
            let ticket = list.begin_load_more().unwrap().unwrap();
            list.apply(
                ticket,
                Ok(page(vec![Node::new("c", false), Node::new("d", false)], None)),
            );

            assert_eq!(ids(&list), vec!["a", "b", "c", "d"]);
            assert!(!list.has_next_page());
            assert_eq!(list.pages_loaded(), 2);
        }

        #[test]
        fn test_refreshes_duplicate_ids_in_place() {
            let mut list = loaded(Some("c1"));
            let ticket = list.begin_load_more().unwrap().unwrap();
            list.apply(
                ticket,
                Ok(page(
                    vec![Node::new("b", false).with_field("name", "renamed")],
                    None,
                )),
            );

            assert_eq!(ids(&list), vec!["a", "b"]);
            assert_eq!(list.node("b").unwrap().text("name"), "renamed");
        }

        #[test]
        fn test_without_next_page_is_noop() {
            let mut list = loaded(None);
            assert_eq!(list.begin_load_more(), Ok(None));
            assert!(!list.is_loading());
        }

        #[test]
        fn test_before_any_load_is_noop() {
            let mut list = controller();
            assert_eq!(list.begin_load_more(), Ok(None));
        }

        #[test]
        fn test_rejected_while_fetch_pending() {
            let mut list = loaded(Some("c1"));
            let _pending = list.begin_refresh().unwrap().unwrap();
            assert_eq!(list.begin_load_more(), Err(ListError::Busy));
        }

        #[test]
        fn test_noop_after_failed_filter_change() {
            let mut list = loaded(Some("c1"));
            let ticket = list
                .begin_load(ListFilter::default().with_search("other"), 2)
                .unwrap()
                .unwrap();
            list.apply(ticket, Err(FetchError::Status(503)));

            assert_eq!(ids(&list), vec!["a", "b"]);
            assert_eq!(list.begin_load_more(), Ok(None));
        }

        #[test]
        fn test_can_load_more_tracks_begin_load_more() {
            let mut list = loaded(Some("c1"));
            assert!(list.can_load_more());

            let ticket = list
                .begin_load(ListFilter::default().with_search("other"), 2)
                .unwrap()
                .unwrap();
            assert!(!list.can_load_more());
            list.apply(ticket, Err(FetchError::Status(503)));

            assert!(!list.can_load_more());
            assert_eq!(list.begin_load_more(), Ok(None));
            assert!(!loaded(None).can_load_more());
        }

        #[test]
        fn test_failure_keeps_nodes_and_allows_retry() {
            let mut list = loaded(Some("c1"));
            let ticket = list.begin_load_more().unwrap().unwrap();
            list.apply(ticket, Err(FetchError::Transport("offline".into())));

            assert_eq!(ids(&list), vec!["a", "b"]);
            assert!(list.error().is_some());

            let retry = list.begin_retry().unwrap().unwrap();
            assert_eq!(retry.kind(), FetchKind::LoadMore);
            assert_eq!(retry.query().cursor(), Some("c1"));
        }
    }

    mod insert_created {
        use super::*;
        use pretty_assertions::assert_eq;

        fn loaded() -> ListController {
            let mut list = controller();
            let ticket = list
                .begin_load(ListFilter::favorites_first(), 10)
                .unwrap()
                .unwrap();
            list.apply(
                ticket,
                Ok(page(
                    vec![
                        Node::new("f1", true),
                        Node::new("f2", true),
                        Node::new("n1", false),
                    ],
                    None,
                )),
            );
            list
        }

        #[test]
        fn test_favorite_lands_before_first_non_favorite() {
            let mut list = loaded();
            assert_eq!(list.insert_created(Node::new("new", true)), 2);
            assert_eq!(ids(&list), vec!["f1", "f2", "new", "n1"]);
        }

        #[test]
        fn test_non_favorite_lands_last() {
            let mut list = loaded();
            assert_eq!(list.insert_created(Node::new("new", false)), 3);
            assert_eq!(ids(&list), vec!["f1", "f2", "n1", "new"]);
        }

        #[test]
        fn test_existing_id_is_replaced() {
            let mut list = loaded();
            list.insert_created(Node::new("n1", true));
            assert_eq!(ids(&list), vec!["f1", "f2", "n1"]);
            assert!(list.node("n1").unwrap().is_favorite);
        }

        #[test]
        fn test_failed_switch_to_favorites_first_keeps_loaded_order() {
            let mut list = controller();
            let ticket = list.begin_load(ListFilter::default(), 10).unwrap().unwrap();
            list.apply(
                ticket,
                Ok(page(
                    vec![
                        Node::new("a", false),
                        Node::new("b", true),
                        Node::new("c", false),
                    ],
                    None,
                )),
            );
            let ticket = list
                .begin_load(ListFilter::favorites_first(), 10)
                .unwrap()
                .unwrap();
            list.apply(ticket, Err(FetchError::Transport("offline".into())));

            assert_eq!(list.insert_created(Node::new("new", true)), 3);
            assert_eq!(ids(&list), vec!["a", "b", "c", "new"]);
        }

        #[test]
        fn test_into_empty_list() {
            let mut list = controller();
            assert_eq!(list.insert_created(Node::new("x", true)), 0);
            assert_eq!(ids(&list), vec!["x"]);
        }
    }

    mod unmount {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_in_flight_result_is_dropped() {
            let mut list = controller();
            let ticket = list.begin_load(ListFilter::default(), 10).unwrap().unwrap();
            list.unmount();

            assert_eq!(
                list.apply(ticket, Ok(page(vec![Node::new("a", false)], None))),
                ApplyOutcome::Discarded
            );
            assert!(list.nodes().is_empty());
        }

        #[test]
        fn test_new_fetches_are_refused() {
            let mut list = controller();
            list.unmount();
            assert_eq!(
                list.begin_load(ListFilter::default(), 10),
                Err(ListError::Unmounted)
            );
            assert_eq!(list.begin_load_more(), Err(ListError::Unmounted));
        }
    }

    mod with_source {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_load_and_load_more_through_source() {
            let mut source = MockListSource::new();
            source
                .expect_fetch_page()
                .withf(|q| q.cursor().is_none())
                .times(1)
                .returning(|_| Ok(page(vec![Node::new("a", false)], Some("c1"))));
            source
                .expect_fetch_page()
                .withf(|q| q.cursor() == Some("c1"))
                .times(1)
                .returning(|_| Ok(page(vec![Node::new("b", false)], None)));

            let mut list = controller();
            list.load(&source, ListFilter::default(), 1).await.unwrap();
            list.load_more(&source).await.unwrap();

            assert_eq!(ids(&list), vec!["a", "b"]);
        }

        #[tokio::test]
        async fn test_load_more_without_next_page_issues_no_request() {
            let mut source = MockListSource::new();
            source
                .expect_fetch_page()
                .times(1)
                .returning(|_| Ok(page(vec![Node::new("a", false)], None)));

            let mut list = controller();
            list.load(&source, ListFilter::default(), 5).await.unwrap();
            list.load_more(&source).await.unwrap();
            list.load_more(&source).await.unwrap();

            assert_eq!(ids(&list), vec!["a"]);
        }

        #[tokio::test]
        async fn test_failed_load_returns_fetch_error_and_keeps_nodes() {
            let mut source = MockListSource::new();
            source
                .expect_fetch_page()
                .withf(|q| q.filter().search.is_none())
                .times(1)
                .returning(|_| Ok(page(vec![Node::new("a", false)], None)));
            source
                .expect_fetch_page()
                .withf(|q| q.filter().search.as_deref() == Some("x"))
                .times(1)
                .returning(|_| Err(FetchError::Server("boom".into())));

            let mut list = controller();
            list.load(&source, ListFilter::default(), 5).await.unwrap();
            let err = list
                .load(&source, ListFilter::default().with_search("x"), 5)
                .await
                .unwrap_err();

            assert_eq!(err, ListError::Fetch(FetchError::Server("boom".into())));
            assert_eq!(ids(&list), vec!["a"]);
        }

        #[tokio::test]
        async fn test_retry_after_failed_load() {
            let mut source = MockListSource::new();
            let mut seq = mockall::Sequence::new();
            source
                .expect_fetch_page()
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Err(FetchError::Transport("down".into())));
            source
                .expect_fetch_page()
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Ok(page(vec![Node::new("a", false)], None)));

            let mut list = controller();
            assert!(list.load(&source, ListFilter::default(), 5).await.is_err());
            list.retry(&source).await.unwrap();

            assert_eq!(ids(&list), vec!["a"]);
            assert!(list.error().is_none());
        }
    }
}
