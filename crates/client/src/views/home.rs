use dioxus::prelude::*;

use crate::auth_session::AuthContext;
use crate::Route;

/// Landing route: forwards to the subjects page when a session exists,
/// otherwise to login.
#[component]
pub fn Home() -> Element {
    let auth = use_context::<AuthContext>();
    let nav = use_navigator();

    use_effect(move || {
        if auth.is_authenticated() {
            nav.replace(Route::Subjects {});
        } else {
            nav.replace(Route::Login {});
        }
    });

    rsx! {}
}
