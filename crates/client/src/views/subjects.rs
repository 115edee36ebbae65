use std::collections::HashSet;

use dioxus::prelude::*;
use futures_util::StreamExt;

use campusfeed_shared::{
    error_message, escape_html, plan_toggle, Feed, Subject, SubjectList, ToggleAction, TogglePlan,
};

use crate::api_client::ApiClient;
use crate::auth_session::AuthContext;
use crate::controller::FeedContext;
use crate::push::{self, with_deadline, REQUEST_TIMEOUT_MS};
use crate::Route;

/// The subjects page: subject list with subscription toggles plus the live
/// notification feed.
///
/// Page entry runs in order: session gate, subject fetch, render, bridge
/// connect, push listener. Each step waits for the one before it; a failed
/// fetch renders an inline error and halts (the user reloads to retry).
#[component]
pub fn Subjects() -> Element {
    let mut auth = use_context::<AuthContext>();
    let nav = use_navigator();

    let ready = use_signal(|| false);
    let feed = use_signal(Feed::default);
    let pending = use_signal(HashSet::<String>::new);
    let feed_ctx = use_context_provider(|| FeedContext::new(ready, feed, pending));

    let mut subjects = use_signal(Vec::<Subject>::new);
    let mut load_error = use_signal(|| None::<String>);
    let mut loaded = use_signal(|| false);

    // Session gate: leave before any authenticated call is issued.
    use_effect(move || {
        if !auth.is_authenticated() {
            nav.replace(Route::Login {});
        }
    });

    use_future(move || {
        let mut feed_ctx = feed_ctx;
        async move {
            if !auth.is_authenticated() {
                return;
            }
            let api = auth.client();

            let res = api.materias().await;
            if !res.ok {
                let msg = error_message(&res.data())
                    .unwrap_or_else(|| "Error cargando materias".to_string());
                load_error.set(Some(msg));
                return;
            }
            match res.parse::<SubjectList>() {
                Some(list) => subjects.set(list.materias),
                None => {
                    load_error.set(Some("Error cargando materias".to_string()));
                    return;
                }
            }
            loaded.set(true);

            // Connect on entry so retained messages for already-subscribed
            // topics are redelivered.
            let connect = api.broker_connect().await;
            feed_ctx.set_ready(connect.ok);
            if let Some(err) = connect.failure() {
                crate::log_warn!("bridge connect failed: {err}");
            }

            // From here on, push events are the only thing that moves
            // readiness or the feed.
            let mut events = push::open_event_stream(&api.events_url());
            while let Some(event) = events.next().await {
                feed_ctx.apply(&event);
            }
        }
    });

    let entries = feed_ctx.feed.read().entries().to_vec();
    let claims = auth.claims();

    rsx! {
        div { class: "page",
            div { class: "topbar",
                h2 { "Mis materias" }
                div { class: "who",
                    if let Some(claims) = claims {
                        span { class: "meta", "{claims.usuario} | carrera {claims.id_carrera}" }
                    }
                    button {
                        class: "btn",
                        onclick: move |_| {
                            auth.logout();
                            nav.replace(Route::Login {});
                        },
                        "Salir"
                    }
                }
            }

            if let Some(err) = load_error() {
                div { class: "error", "{err}" }
            } else if !loaded() {
                p { class: "meta", "Cargando materias…" }
            }

            div { class: "columns",
                div { id: "materias", class: "list",
                    for subject in subjects() {
                        SubjectRow { key: "{subject.id_materia}", subject, subjects }
                    }
                }

                div { id: "feed", class: "feed",
                    h3 { "Notificaciones" }
                    if entries.is_empty() {
                        p { class: "meta", "Sin mensajes todavía." }
                    }
                    for entry in entries {
                        div { key: "{entry.seq}", class: "msg",
                            div { class: "topic",
                                "{entry.topic}"
                                span { class: "time", {entry.received_time()} }
                            }
                            pre { dangerous_inner_html: escape_html(&entry.payload_pretty()) }
                        }
                    }
                }
            }
        }
    }
}

/// One subject with its subscribe/unsubscribe toggle.
#[component]
fn SubjectRow(subject: Subject, subjects: Signal<Vec<Subject>>) -> Element {
    let auth = use_context::<AuthContext>();
    let feed_ctx = use_context::<FeedContext>();
    let id = subject.id_materia.clone();

    let schedule = match &subject.horarios {
        Some(h) => format!("Horario teórico: {} {}", h.dia, h.hora),
        None => "Horario teórico: (no definido)".to_string(),
    };

    rsx! {
        div { class: "item",
            div { class: "row",
                div {
                    b { "{subject.nombre_materia}" }
                    span { class: "tag", " #{subject.id_materia}" }
                }
                button {
                    class: if subject.anotado { "btn danger" } else { "btn" },
                    onclick: move |_| {
                        let api = auth.client();
                        let id = id.clone();
                        async move {
                            toggle_subscription(api, feed_ctx, subjects, id).await;
                        }
                    },
                    if subject.anotado { "Desanotarme" } else { "Anotarme" }
                }
            }
            div { class: "meta", "{schedule}" }
        }
    }
}

/// Run one toggle click end to end.
///
/// Failures are silent by design: the button simply stays in its last
/// confirmed state. The in-flight marker serializes toggles per subject, and
/// the deadline releases it if a request hangs.
async fn toggle_subscription(
    api: ApiClient,
    mut ctx: FeedContext,
    mut subjects: Signal<Vec<Subject>>,
    id: String,
) {
    let subscribed = subjects
        .read()
        .iter()
        .find(|s| s.id_materia == id)
        .map(|s| s.anotado)
        .unwrap_or(false);

    let action = match plan_toggle(ctx.is_ready(), subscribed, ctx.is_pending(&id)) {
        TogglePlan::Busy => return,
        TogglePlan::Run(action) => {
            ctx.begin(&id);
            action
        }
        TogglePlan::ConnectThen(action) => {
            ctx.begin(&id);
            let connected = with_deadline(api.broker_connect(), REQUEST_TIMEOUT_MS)
                .await
                .map(|res| res.ok)
                .unwrap_or(false);
            ctx.set_ready(connected);
            if !connected {
                ctx.finish(&id);
                return;
            }
            action
        }
    };

    let res = match action {
        ToggleAction::Subscribe => with_deadline(api.subscribe(&id), REQUEST_TIMEOUT_MS).await,
        ToggleAction::Unsubscribe => with_deadline(api.unsubscribe(&id), REQUEST_TIMEOUT_MS).await,
    };

    match res {
        Some(res) if res.ok => {
            if let Some(subject) = subjects.write().iter_mut().find(|s| s.id_materia == id) {
                subject.anotado = matches!(action, ToggleAction::Subscribe);
            }
        }
        Some(res) => {
            if let Some(err) = res.failure() {
                crate::log_debug!("toggle for {id} rejected: {err}");
            }
        }
        None => {
            crate::log_warn!("toggle for {id} timed out; keeping last confirmed state");
        }
    }

    ctx.finish(&id);
}
