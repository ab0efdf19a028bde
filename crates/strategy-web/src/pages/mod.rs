//! Page Components

mod builder;
mod home;

pub use builder::BuilderPage;
pub use home::HomePage;
