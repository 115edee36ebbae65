//! Server-push listener for the `/events` channel.
//!
//! One channel is opened per page lifetime and never explicitly closed.
//! Every inbound line is decoded with [`PushEvent::decode`] and forwarded to
//! the single consumer in arrival order; a transport failure is forwarded as
//! [`PushEvent::StreamError`] instead of being swallowed. No replay or
//! buffering beyond what the transport itself provides.
//!
//! Web builds ride the browser's `EventSource` (which also owns
//! reconnection); desktop builds stream the response body over reqwest and
//! split it on SSE `data:` lines.

use futures_channel::mpsc::{unbounded, UnboundedReceiver};

use campusfeed_shared::PushEvent;

/// Request timeout applied to connect/subscribe/unsubscribe calls so a hung
/// request releases its in-flight marker instead of wedging the button.
pub const REQUEST_TIMEOUT_MS: u32 = 10_000;

#[cfg(target_arch = "wasm32")]
pub fn open_event_stream(url: &str) -> UnboundedReceiver<PushEvent> {
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use web_sys::{Event, EventSource, MessageEvent};

    let (tx, rx) = unbounded();

    let source = match EventSource::new(url) {
        Ok(source) => source,
        Err(err) => {
            crate::log_error!("failed to open event stream at {url}: {err:?}");
            let _ = tx.unbounded_send(PushEvent::StreamError);
            return rx;
        }
    };

    let tx_msg = tx.clone();
    let onmessage = Closure::wrap(Box::new(move |e: MessageEvent| {
        if let Some(text) = e.data().as_string() {
            let _ = tx_msg.unbounded_send(PushEvent::decode(&text));
        }
    }) as Box<dyn FnMut(MessageEvent)>);
    source.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
    onmessage.forget();

    let onerror = Closure::wrap(Box::new(move |_: Event| {
        let _ = tx.unbounded_send(PushEvent::StreamError);
    }) as Box<dyn FnMut(Event)>);
    source.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    onerror.forget();

    // The EventSource must outlive this call; its lifetime is the page's.
    std::mem::forget(source);

    rx
}

#[cfg(not(target_arch = "wasm32"))]
pub fn open_event_stream(url: &str) -> UnboundedReceiver<PushEvent> {
    use futures_util::StreamExt;

    let (tx, rx) = unbounded();
    let url = url.to_string();

    tokio::spawn(async move {
        let resp = match reqwest::get(&url).await {
            Ok(resp) => resp,
            Err(err) => {
                crate::log_error!("event stream request to {url} failed: {err}");
                let _ = tx.unbounded_send(PushEvent::StreamError);
                return;
            }
        };

        let mut stream = resp.bytes_stream();
        let mut buf = String::new();
        while let Some(chunk) = stream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(err) => {
                    crate::log_error!("event stream broke: {err}");
                    let _ = tx.unbounded_send(PushEvent::StreamError);
                    return;
                }
            };
            buf.push_str(&String::from_utf8_lossy(&chunk));
            while let Some(pos) = buf.find('\n') {
                let line: String = buf.drain(..=pos).collect();
                if let Some(data) = line.trim_end().strip_prefix("data:") {
                    if tx.unbounded_send(PushEvent::decode(data.trim_start())).is_err() {
                        // Consumer gone; the page is being torn down.
                        return;
                    }
                }
            }
        }

        // Server closed the stream.
        let _ = tx.unbounded_send(PushEvent::StreamError);
    });

    rx
}

/// Bound a request future, yielding `None` when the deadline passes.
#[cfg(target_arch = "wasm32")]
pub async fn with_deadline<T>(fut: impl std::future::Future<Output = T>, ms: u32) -> Option<T> {
    use futures_util::future::{select, Either};

    let timeout = gloo_timers::future::TimeoutFuture::new(ms);
    futures_util::pin_mut!(fut);
    futures_util::pin_mut!(timeout);
    match select(fut, timeout).await {
        Either::Left((value, _)) => Some(value),
        Either::Right(_) => None,
    }
}

/// Bound a request future, yielding `None` when the deadline passes.
#[cfg(not(target_arch = "wasm32"))]
pub async fn with_deadline<T>(fut: impl std::future::Future<Output = T>, ms: u32) -> Option<T> {
    tokio::time::timeout(std::time::Duration::from_millis(u64::from(ms)), fut)
        .await
        .ok()
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn deadline_passes_fast_results_through() {
        assert_eq!(with_deadline(async { 7 }, 1_000).await, Some(7));
    }

    #[tokio::test]
    async fn deadline_cuts_off_hung_futures() {
        let hung = futures_util::future::pending::<()>();
        assert_eq!(with_deadline(hung, 10).await, None);
    }
}
