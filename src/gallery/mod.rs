//! Gallery persistence - ads, users and the document store behind them

pub mod ads;
pub mod model;
pub mod store;
pub mod users;

pub use ads::{AdPage, AdRepository, DocumentAdRepository, ImageRemoval};
pub use model::{Ad, AdUpdate, GeneratedImage, ImageSource, NewAd, User, WorkspaceStats};
pub use store::{Collection, DocumentStore};
pub use users::{DocumentUserRepository, UserRepository};
