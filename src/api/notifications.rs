//! Notification stream endpoint.

use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, Sse},
};
use futures_util::{Stream, StreamExt};

use crate::AppState;

/// GET /api/notifications/subscribe - Open a server-sent event stream.
///
/// The stream ends when the client goes away, which unregisters it.
pub async fn subscribe_notifications(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let subscription = state.notifier.subscribe();
    tracing::debug!(subscriber = subscription.id(), "Opening notification stream");
    let events =
        subscription.map(|payload| Ok::<_, Infallible>(Event::default().data(&*payload)));
    Sse::new(events)
}
