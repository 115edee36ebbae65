//! Application routing configuration.

use dioxus::prelude::*;

use crate::views::{Home, Login, Subjects};

// Router configuration
#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    // Landing page forwards to login or the subjects page by auth state
    #[route("/")]
    Home {},

    #[route("/login")]
    Login {},

    #[route("/materias")]
    Subjects {},
}
