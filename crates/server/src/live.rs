//! WebSocket sessions that keep a debounced view alive for one client.
//!
//! Each socket owns its own controller. Every published state is pushed as a
//! JSON event; closing the socket drops the controller, which closes its view
//! scope and discards any request still in flight.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::Response;
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use showfinder_core::route::Route;
use showfinder_core::sort::SortKey;
use showfinder_views::search::{SearchController, SearchView};
use showfinder_views::typeahead::{Typeahead, TypeaheadView};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::state::AppState;

/// Events pushed to the client.
#[derive(Debug, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum LiveEvent {
    Search(SearchView),
    Typeahead(TypeaheadView),
    Navigate { url: String },
    Error { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiveAction {
    Clear,
    Dismiss,
    Focus,
    Submit,
    Select,
}

/// A client message. A bare `query` (and for search, `sort`) updates the
/// input; `action` triggers one of the discrete interactions.
#[derive(Debug, Default, Deserialize)]
pub struct LiveCommand {
    #[serde(default)]
    pub action: Option<LiveAction>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct LiveSearchParams {
    #[serde(default)]
    q: String,
    #[serde(default)]
    sort: String,
}

type Outbox = SplitSink<WebSocket, Message>;

async fn send(outbox: &mut Outbox, event: &LiveEvent) -> bool {
    let text = match serde_json::to_string(event) {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "failed to encode live event");
            return true;
        }
    };
    outbox.send(Message::Text(text.into())).await.is_ok()
}

/// Read the next command. `None` ends the session.
fn parse_command(msg: Message) -> Option<Result<LiveCommand, String>> {
    match msg {
        Message::Text(text) => Some(
            serde_json::from_str::<LiveCommand>(text.as_str()).map_err(|e| e.to_string()),
        ),
        Message::Binary(bin) => {
            Some(serde_json::from_slice::<LiveCommand>(bin.as_ref()).map_err(|e| e.to_string()))
        }
        Message::Close(_) => None,
        _ => Some(Ok(LiveCommand::default())),
    }
}

// ---------------------------------------------------------------------------
// Search page
// ---------------------------------------------------------------------------

pub async fn live_search(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(params): Query<LiveSearchParams>,
) -> Response {
    ws.on_upgrade(move |socket| search_session(socket, state, params))
}

async fn search_session(socket: WebSocket, state: AppState, params: LiveSearchParams) {
    let route = Route::search(params.q);
    let mut controller =
        SearchController::from_route(&route, state.catalog.clone(), state.config.search_debounce);
    controller.set_sort(SortKey::parse_or_default(&params.sort));

    let session = Uuid::new_v4();
    debug!(%session, "live search opened");
    let (mut outbox, mut inbox) = socket.split();
    let mut updates = controller.subscribe();
    if !send(&mut outbox, &LiveEvent::Search(controller.view())).await {
        return;
    }

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                updates.borrow_and_update();
            }
            msg = inbox.next() => {
                let Some(Ok(msg)) = msg else { break };
                match parse_command(msg) {
                    None => break,
                    Some(Ok(cmd)) => apply_search(&mut controller, cmd),
                    Some(Err(message)) => {
                        if !send(&mut outbox, &LiveEvent::Error { message }).await {
                            break;
                        }
                        continue;
                    }
                }
            }
        }
        if !send(&mut outbox, &LiveEvent::Search(controller.view())).await {
            break;
        }
    }
    debug!(%session, "live search closed");
}

fn apply_search(controller: &mut SearchController, cmd: LiveCommand) {
    if let Some(sort) = cmd.sort {
        controller.set_sort(SortKey::parse_or_default(&sort));
    }
    match cmd.action {
        Some(LiveAction::Clear) => controller.clear(),
        _ => {
            if let Some(query) = cmd.query {
                controller.set_query(query);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Navbar typeahead
// ---------------------------------------------------------------------------

pub async fn live_typeahead(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| typeahead_session(socket, state))
}

async fn typeahead_session(socket: WebSocket, state: AppState) {
    let mut typeahead = Typeahead::new(
        state.catalog.clone(),
        state.config.typeahead_debounce,
        state.config.typeahead_limit,
    );

    let session = Uuid::new_v4();
    debug!(%session, "live typeahead opened");
    let (mut outbox, mut inbox) = socket.split();
    let mut updates = typeahead.subscribe();
    if !send(&mut outbox, &LiveEvent::Typeahead(typeahead.view())).await {
        return;
    }

    loop {
        let mut navigate = None;
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                updates.borrow_and_update();
            }
            msg = inbox.next() => {
                let Some(Ok(msg)) = msg else { break };
                match parse_command(msg) {
                    None => break,
                    Some(Ok(cmd)) => match apply_typeahead(&mut typeahead, cmd) {
                        Ok(route) => navigate = route,
                        Err(message) => {
                            if !send(&mut outbox, &LiveEvent::Error { message }).await {
                                break;
                            }
                            continue;
                        }
                    },
                    Some(Err(message)) => {
                        if !send(&mut outbox, &LiveEvent::Error { message }).await {
                            break;
                        }
                        continue;
                    }
                }
            }
        }
        if let Some(route) = navigate {
            let event = LiveEvent::Navigate {
                url: route.to_string(),
            };
            if !send(&mut outbox, &event).await {
                break;
            }
        }
        if !send(&mut outbox, &LiveEvent::Typeahead(typeahead.view())).await {
            break;
        }
    }
    debug!(%session, "live typeahead closed");
}

/// Apply one command. `Ok(Some(route))` asks the client to navigate.
fn apply_typeahead(typeahead: &mut Typeahead, cmd: LiveCommand) -> Result<Option<Route>, String> {
    match cmd.action {
        Some(LiveAction::Dismiss) => typeahead.dismiss(),
        Some(LiveAction::Focus) => typeahead.focus(),
        Some(LiveAction::Clear) => typeahead.set_query(""),
        Some(LiveAction::Submit) => return Ok(typeahead.submit()),
        Some(LiveAction::Select) => {
            let id = cmd.id.ok_or("select needs an id")?;
            let show = typeahead
                .results()
                .into_iter()
                .find(|s| s.id == id)
                .ok_or_else(|| format!("show {id} is not among the results"))?;
            return Ok(Some(typeahead.select(&show)));
        }
        None => {
            if let Some(query) = cmd.query {
                typeahead.set_query(query);
            }
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use showfinder_core::types::Show;
    use showfinder_metadata::memory::MemoryCatalog;
    use std::sync::Arc;
    use std::time::Duration;

    fn command(json: &str) -> LiveCommand {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn commands_parse_with_or_without_action() {
        let cmd = command(r#"{"query":"office","sort":"rating"}"#);
        assert_eq!(cmd.action, None);
        assert_eq!(cmd.query.as_deref(), Some("office"));
        assert_eq!(cmd.sort.as_deref(), Some("rating"));

        let cmd = command(r#"{"action":"dismiss"}"#);
        assert_eq!(cmd.action, Some(LiveAction::Dismiss));
        assert!(serde_json::from_str::<LiveCommand>(r#"{"action":"explode"}"#).is_err());
    }

    #[test]
    fn events_are_tagged() {
        let json = serde_json::to_value(LiveEvent::Navigate { url: "/show/1-a".into() }).unwrap();
        assert_eq!(json["type"], "navigate");
        assert_eq!(json["data"]["url"], "/show/1-a");
    }

    #[tokio::test(start_paused = true)]
    async fn typeahead_select_navigates_to_detail() {
        let catalog = MemoryCatalog::new();
        catalog.insert_show(Show {
            id: 1396,
            name: "Breaking Bad".into(),
            ..Default::default()
        });
        let mut typeahead = Typeahead::new(Arc::new(catalog), Duration::from_millis(300), 6);
        let mut updates = typeahead.subscribe();

        apply_typeahead(&mut typeahead, command(r#"{"query":"break"}"#)).unwrap();
        updates
            .wait_for(|s| matches!(s, showfinder_views::query::QueryState::Ready { .. }))
            .await
            .unwrap();

        let missing = apply_typeahead(&mut typeahead, command(r#"{"action":"select","id":5}"#));
        assert!(missing.is_err());

        let route = apply_typeahead(&mut typeahead, command(r#"{"action":"select","id":1396}"#))
            .unwrap()
            .unwrap();
        assert_eq!(route.to_string(), "/show/1396-breaking-bad");
        assert!(!typeahead.is_open());
    }

    #[tokio::test(start_paused = true)]
    async fn typeahead_submit_goes_to_search_page() {
        let mut typeahead = Typeahead::new(Arc::new(MemoryCatalog::new()), Duration::from_millis(300), 6);
        assert_eq!(apply_typeahead(&mut typeahead, command(r#"{"action":"submit"}"#)), Ok(None));

        apply_typeahead(&mut typeahead, command(r#"{"query":"mad men"}"#)).unwrap();
        let route = apply_typeahead(&mut typeahead, command(r#"{"action":"submit"}"#))
            .unwrap()
            .unwrap();
        assert_eq!(route.to_string(), "/search?q=mad%20men");
    }
}
