//! Collaborator traits defined in `warden-core` and implemented by other crates.

pub mod counter;
pub mod credential;
pub mod notifier;

pub use counter::CounterStore;
pub use credential::UserStore;
pub use notifier::NotificationSender;
