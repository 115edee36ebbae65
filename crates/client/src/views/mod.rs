//! View components for the application.

pub mod home;
pub mod login;
pub mod subjects;

pub use home::Home;
pub use login::Login;
pub use subjects::Subjects;
