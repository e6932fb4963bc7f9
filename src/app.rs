//! Main application logic

use crate::api::{ApiClient, ListSource, RecordSink, SessionSource};
use crate::auth::{self, AuthState, LogoutMode};
use crate::config::ClientConfig;
use crate::error::{FetchError, FormError, ListError, MutationError};
use crate::router::Route;
use crate::state::{
    heartbeat_item, heartbeat_monitor_form, heartbeat_monitor_input, rotation_form,
    rotation_input, rotation_item, AppContext, AppState, ApplyOutcome, CreateAffordance,
    CreatedRecord, DialogResult, FetchTicket, Form, FormDialog, FormValue, ItemMapper, ListController,
    ListFilter, ListKind, ListPresenter, Page, QueryComposer, CREATE_HEARTBEAT_MONITOR_MUTATION,
    CREATE_ROTATION_MUTATION, HEARTBEAT_MONITORS_QUERY, ROTATIONS_QUERY,
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Results reported back to the UI thread by background tasks
#[derive(Debug)]
pub enum AppEvent {
    Session(Result<AppContext, FetchError>),
    Page {
        list: ListKind,
        ticket: FetchTicket,
        result: Result<Page, FetchError>,
    },
    Created {
        list: ListKind,
        result: Result<CreatedRecord, MutationError>,
    },
}

/// A list screen: controller plus the dialog that creates its records
pub struct ListScreen {
    pub controller: ListController,
    pub dialog: FormDialog,
    mapper: ItemMapper,
}

impl ListScreen {
    fn new(query: &'static str, dialog: FormDialog, mapper: ItemMapper) -> Self {
        Self {
            controller: ListController::new(QueryComposer::new(query)),
            dialog,
            mapper,
        }
    }

    pub fn presenter<'a>(&'a self, ctx: &'a AppContext) -> ListPresenter<'a> {
        ListPresenter::new(&self.controller, &ctx.session, self.mapper)
            .with_create(Some(&self.dialog as &dyn CreateAffordance))
    }
}

/// Main application
pub struct App {
    pub state: AppState,
    pub context: AppContext,
    pub auth: AuthState,
    pub config: ClientConfig,
    pub rotations: ListScreen,
    pub monitors: ListScreen,
    pub status_message: Option<String>,
    /// Where to continue after logging out
    pub redirect: Option<String>,
    api: Arc<ApiClient>,
    tx: UnboundedSender<AppEvent>,
    rx: UnboundedReceiver<AppEvent>,
    session_pending: bool,
    should_quit: bool,
}

impl App {
    /// Create a new app instance
    pub fn new(config: ClientConfig, route: Route) -> Result<Self> {
        let api = Arc::new(ApiClient::new(&config)?);
        let (tx, rx) = mpsc::unbounded_channel();

        let service_id = config.heartbeat_service_id.clone();
        let monitor_dialog = FormDialog::new(
            "Heartbeat Monitor",
            CREATE_HEARTBEAT_MONITOR_MUTATION,
            heartbeat_monitor_form,
            Box::new(move |value: &FormValue| heartbeat_monitor_input(value, service_id.as_deref())),
        );
        let rotation_dialog = FormDialog::new(
            "Rotation",
            CREATE_ROTATION_MUTATION,
            rotation_form,
            Box::new(rotation_input),
        );

        Ok(Self {
            state: AppState::new(route),
            context: AppContext::default(),
            auth: AuthState::default(),
            config,
            rotations: ListScreen::new(ROTATIONS_QUERY, rotation_dialog, rotation_item),
            monitors: ListScreen::new(HEARTBEAT_MONITORS_QUERY, monitor_dialog, heartbeat_item),
            status_message: None,
            redirect: None,
            api,
            tx,
            rx,
            session_pending: false,
            should_quit: false,
        })
    }

    /// Kick off the session fetch; lists wait for it
    pub fn start(&mut self) {
        self.fetch_session();
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn screen(&self, list: ListKind) -> &ListScreen {
        match list {
            ListKind::Rotations => &self.rotations,
            ListKind::HeartbeatMonitors => &self.monitors,
        }
    }

    fn screen_mut(&mut self, list: ListKind) -> &mut ListScreen {
        match list {
            ListKind::Rotations => &mut self.rotations,
            ListKind::HeartbeatMonitors => &mut self.monitors,
        }
    }

    /// The dialog currently covering the screen, if any
    pub fn open_dialog(&self) -> Option<(ListKind, &FormDialog)> {
        let list = self.state.current_list()?;
        let dialog = &self.screen(list).dialog;
        dialog.is_open().then_some((list, dialog))
    }

    fn fetch_session(&mut self) {
        if self.session_pending {
            return;
        }
        self.session_pending = true;
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.fetch_context().await;
            let _ = tx.send(AppEvent::Session(result));
        });
    }

    fn spawn_fetch(&self, list: ListKind, ticket: FetchTicket) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.fetch_page(ticket.query()).await;
            let _ = tx.send(AppEvent::Page {
                list,
                ticket,
                result,
            });
        });
    }

    fn default_filter(&self) -> ListFilter {
        if self.config.favorites_first() {
            ListFilter::favorites_first()
        } else {
            ListFilter::default()
        }
    }

    /// Run a `begin_*` result: spawn the fetch or report why nothing was sent
    fn dispatch(&mut self, list: ListKind, begun: Result<Option<FetchTicket>, ListError>) {
        match begun {
            Ok(Some(ticket)) => self.spawn_fetch(list, ticket),
            Ok(None) => {}
            Err(ListError::Busy) => {
                self.status_message = Some("Still loading...".to_string());
            }
            Err(err) => {
                self.status_message = Some(err.to_string());
            }
        }
    }

    /// Mount the current list on first visit, once the session is known
    fn ensure_loaded(&mut self) {
        if !self.context.session.is_ready() {
            return;
        }
        let Some(list) = self.state.current_list() else {
            return;
        };
        let filter = self.default_filter();
        let page_size = self.config.page_size();
        let controller = &mut self.screen_mut(list).controller;
        if controller.filter().is_some() {
            return;
        }
        let begun = controller.begin_load(filter, page_size);
        self.dispatch(list, begun);
    }

    /// Drain results from background tasks
    pub fn poll_events(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            self.handle_event(event);
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Session(result) => {
                self.session_pending = false;
                match result {
                    Ok(context) => {
                        self.context = context;
                        self.ensure_loaded();
                    }
                    Err(err) => {
                        tracing::warn!("session fetch failed: {err}");
                        self.status_message = Some(format!("Session unavailable: {err}"));
                    }
                }
            }
            AppEvent::Page {
                list,
                ticket,
                result,
            } => {
                let controller = &mut self.screen_mut(list).controller;
                if controller.apply(ticket, result) == ApplyOutcome::Failed {
                    self.status_message = Some("Load failed, press r to retry".to_string());
                }
                let len = self.screen(list).controller.nodes().len();
                if self.state.current_list() == Some(list) {
                    self.state.clamp_selection(len);
                }
            }
            AppEvent::Created { list, result } => {
                self.screen_mut(list).dialog.finish_submit(result);
                self.collect_dialog_result(list);
            }
        }
    }

    /// Splice a record from a closed dialog into its list
    fn collect_dialog_result(&mut self, list: ListKind) {
        let screen = self.screen_mut(list);
        let Some(result) = screen.dialog.take_result() else {
            return;
        };
        if let DialogResult::Created(record) = result {
            let index = screen.controller.insert_created(record.into());
            if self.state.current_list() == Some(list) {
                self.state.selected_index = index;
            }
            self.status_message = Some("Created".to_string());
        }
    }

    /// Handle keyboard input
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if let Some((list, _)) = self.open_dialog() {
            self.handle_dialog_key(list, key);
            return Ok(());
        }

        self.status_message = None;

        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return Ok(());
            }
            KeyCode::Char('L') => {
                self.logout().await;
                return Ok(());
            }
            KeyCode::Char('1') => self.navigate(Route::Rotations),
            KeyCode::Char('2') => self.navigate(Route::HeartbeatMonitors),
            KeyCode::Esc | KeyCode::Backspace => {
                if self.state.go_back() {
                    self.ensure_loaded();
                }
            }
            _ => {}
        }

        if !self.context.session.is_ready() {
            if key.code == KeyCode::Char('r') {
                self.fetch_session();
            }
            return Ok(());
        }

        if let Some(list) = self.state.current_list() {
            self.handle_list_key(list, key);
        }
        Ok(())
    }

    pub fn navigate(&mut self, route: Route) {
        self.state.navigate(route);
        self.ensure_loaded();
    }

    fn handle_list_key(&mut self, list: ListKind, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                let len = self.screen(list).controller.nodes().len();
                self.state.move_selection_down(len);
            }
            KeyCode::Char('k') | KeyCode::Up => self.state.move_selection_up(),
            KeyCode::Enter => {
                let presenter = self.screen(list).presenter(&self.context);
                if let Some(item) = presenter.items().get(self.state.selected_index) {
                    let route = Route::resolve(&item.url);
                    if !matches!(route, Route::NotFound(_)) {
                        self.navigate(route);
                    }
                }
            }
            KeyCode::Char('m') => {
                let begun = self.screen_mut(list).controller.begin_load_more();
                self.dispatch(list, begun);
            }
            KeyCode::Char('r') => {
                let controller = &mut self.screen_mut(list).controller;
                let begun = if controller.error().is_some() {
                    controller.begin_retry()
                } else {
                    controller.begin_refresh()
                };
                self.dispatch(list, begun);
            }
            KeyCode::Char('f') => {
                let controller = &mut self.screen_mut(list).controller;
                let mut filter = controller.filter().cloned().unwrap_or_default();
                filter.favorites_first = !filter.favorites_first;
                let page_size = controller.page_size();
                let begun = controller.begin_load(filter, page_size);
                self.state.reset_selection();
                self.dispatch(list, begun);
            }
            KeyCode::Char('n') => {
                if self.screen(list).presenter(&self.context).show_create() {
                    self.screen_mut(list).dialog.open();
                }
            }
            _ => {}
        }
    }

    fn handle_dialog_key(&mut self, list: ListKind, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let dialog = &mut self.screen_mut(list).dialog;
        if dialog.is_submitting() {
            return;
        }

        match key.code {
            KeyCode::Esc => {
                dialog.cancel();
                self.collect_dialog_result(list);
                return;
            }
            KeyCode::Char('s') if ctrl => {
                self.submit(list);
                return;
            }
            _ => {}
        }

        let Some(form) = dialog.form_mut() else {
            return;
        };
        let edited = match key.code {
            KeyCode::Tab | KeyCode::Down => {
                form.next_field();
                Ok(())
            }
            KeyCode::BackTab | KeyCode::Up => {
                form.prev_field();
                Ok(())
            }
            KeyCode::Enter if form.is_active_field_multiline() => form.push_char('\n'),
            KeyCode::Enter => {
                self.submit(list);
                return;
            }
            KeyCode::Backspace => form.pop_char(),
            KeyCode::Char(c) if !ctrl => form.push_char(c),
            _ => Ok(()),
        };
        if let Err(err) = edited {
            tracing::warn!("form edit rejected: {err}");
        }
    }

    fn submit(&mut self, list: ListKind) {
        match self.screen_mut(list).dialog.begin_submit() {
            Ok(Some(pending)) => {
                let api = Arc::clone(&self.api);
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = api.create(pending.mutation, pending.input).await;
                    let _ = tx.send(AppEvent::Created { list, result });
                });
            }
            Ok(None) => {}
            Err(FormError::ValidationBlocked { fields }) => {
                self.status_message = Some(format!("Fix errors in: {}", fields.join(", ")));
            }
            Err(err) => {
                self.status_message = Some(err.to_string());
            }
        }
    }

    async fn logout(&mut self) {
        self.rotations.controller.unmount();
        self.monitors.controller.unmount();

        let redirect = self.config.logout_url();
        let outcome = auth::logout(
            self.api.as_ref(),
            LogoutMode::WithRequest,
            &mut self.auth,
            &redirect,
        )
        .await;

        self.redirect = Some(outcome.redirect);
        self.should_quit = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Identity, Node, PageInfo};

    fn app(route: Route) -> App {
        App::new(ClientConfig::default(), route).unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn admin() -> AppContext {
        AppContext::ready(
            Identity {
                user_id: "u1".to_string(),
                is_admin: true,
            },
            Default::default(),
        )
    }

    fn page(ids: &[&str]) -> Page {
        Page {
            nodes: ids.iter().map(|id| Node::new(*id, false)).collect(),
            page_info: PageInfo::default(),
        }
    }

    #[tokio::test]
    async fn test_lists_wait_for_session() {
        let mut app = app(Route::Rotations);
        app.ensure_loaded();
        assert!(app.rotations.controller.filter().is_none());

        app.handle_event(AppEvent::Session(Ok(admin())));
        assert!(app.rotations.controller.is_loading());
        assert!(app.monitors.controller.filter().is_none());
    }

    #[tokio::test]
    async fn test_page_event_applies_to_its_list() {
        let mut app = app(Route::HeartbeatMonitors);
        app.context = admin();
        let ticket = app
            .monitors
            .controller
            .begin_load(ListFilter::favorites_first(), 15)
            .unwrap()
            .unwrap();

        app.handle_event(AppEvent::Page {
            list: ListKind::HeartbeatMonitors,
            ticket,
            result: Ok(page(&["a", "b"])),
        });

        assert_eq!(app.monitors.controller.nodes().len(), 2);
        assert!(app.rotations.controller.nodes().is_empty());
    }

    #[tokio::test]
    async fn test_create_hidden_for_non_admin() {
        let mut app = app(Route::Rotations);
        app.context = AppContext::ready(
            Identity {
                user_id: "u2".to_string(),
                is_admin: false,
            },
            Default::default(),
        );
        app.handle_key(key(KeyCode::Char('n'))).await.unwrap();
        assert!(app.open_dialog().is_none());
    }

    #[tokio::test]
    async fn test_typing_goes_to_open_dialog() {
        let mut app = app(Route::Rotations);
        app.context = admin();
        app.handle_key(key(KeyCode::Char('n'))).await.unwrap();
        assert!(app.open_dialog().is_some());

        app.handle_key(key(KeyCode::Char('q'))).await.unwrap();
        assert!(!app.should_quit());
        let form = app.rotations.dialog.form().unwrap();
        assert_eq!(form.value("name").unwrap().as_text(), "q");

        app.handle_key(key(KeyCode::Esc)).await.unwrap();
        assert!(app.open_dialog().is_none());
    }

    #[tokio::test]
    async fn test_created_record_is_selected() {
        let mut app = app(Route::Rotations);
        app.context = admin();
        app.handle_key(key(KeyCode::Char('n'))).await.unwrap();
        {
            let form = app.rotations.dialog.form_mut().unwrap();
            form.set_value("name", "Weekend").unwrap();
        }
        let pending = app.rotations.dialog.begin_submit().unwrap();
        assert!(pending.is_some());

        app.handle_event(AppEvent::Created {
            list: ListKind::Rotations,
            result: Ok(CreatedRecord {
                id: "r-new".to_string(),
                is_favorite: false,
                fields: Default::default(),
            }),
        });

        assert!(app.open_dialog().is_none());
        assert!(app.rotations.controller.node("r-new").is_some());
        assert_eq!(app.state.selected_index, 0);
    }

    #[tokio::test]
    async fn test_not_found_ignores_list_keys() {
        let mut app = app(Route::resolve("/nowhere"));
        app.context = admin();
        app.handle_key(key(KeyCode::Char('m'))).await.unwrap();
        assert!(matches!(app.state.current_route, Route::NotFound(_)));
        app.handle_key(key(KeyCode::Char('1'))).await.unwrap();
        assert_eq!(app.state.current_route, Route::Rotations);
    }
}
