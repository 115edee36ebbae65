use dioxus::prelude::*;

use campusfeed_shared::{error_message, LoginRequest, LoginResponse};

use crate::api_client::ApiClient;
use crate::auth_session::AuthContext;
use crate::Route;

/// Login page. A failed login renders the backend's `error` text inline;
/// a success persists the session and moves on to the subjects page.
#[component]
pub fn Login() -> Element {
    let mut auth = use_context::<AuthContext>();
    let mut usuario = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut is_submitting = use_signal(|| false);
    let nav = use_navigator();

    // Already signed in: straight to the subjects page.
    use_effect(move || {
        if auth.is_authenticated() {
            nav.replace(Route::Subjects {});
        }
    });

    rsx! {
        div { class: "auth-page",
            div { class: "card",
                h2 { "Ingreso de alumnos" }
                p { class: "meta", "Notificaciones de cursada" }

                if let Some(e) = error.cloned() {
                    div { class: "error", "{e}" }
                }

                form {
                    onsubmit: move |e| async move {
                        e.prevent_default();
                        if is_submitting() {
                            return;
                        }
                        is_submitting.set(true);
                        error.set(None);

                        let req = LoginRequest {
                            usuario: usuario.read().trim().to_string(),
                            password: password.read().trim().to_string(),
                        };
                        let res = ApiClient::new().login(&req).await;

                        if !res.ok {
                            let msg = error_message(&res.data())
                                .unwrap_or_else(|| "Error de login".to_string());
                            error.set(Some(msg));
                            is_submitting.set(false);
                            return;
                        }

                        match res.parse::<LoginResponse>() {
                            Some(login) => {
                                auth.login(login.token, login.payload);
                                nav.push(Route::Subjects {});
                            }
                            None => {
                                crate::log_warn!("login succeeded but the response body was unusable");
                                error.set(Some("Respuesta de login inválida".to_string()));
                            }
                        }
                        is_submitting.set(false);
                    },
                    div { class: "field",
                        label { "Usuario" }
                        input {
                            value: "{usuario}",
                            placeholder: "ana.alumno",
                            oninput: move |e: FormEvent| usuario.set(e.value()),
                        }
                    }
                    div { class: "field",
                        label { "Contraseña" }
                        input {
                            r#type: "password",
                            value: "{password}",
                            oninput: move |e: FormEvent| password.set(e.value()),
                        }
                    }
                    button {
                        r#type: "submit",
                        class: "btn",
                        disabled: is_submitting(),
                        if is_submitting() { "Ingresando…" } else { "Ingresar" }
                    }
                }
            }
        }
    }
}
