mod auth;
mod body;
mod health;
mod lists;
mod shares;

pub use auth::*;
pub use health::*;
pub use lists::*;
pub use shares::*;
