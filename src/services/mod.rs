// Service exports
pub mod mailer;
pub mod notifier;
pub mod seed;
pub mod store;

pub use mailer::{MailClient, MailError, OutgoingMail};
pub use notifier::{EmailOutcome, NotificationReport, Notifier};
pub use seed::seed_if_empty;
pub use store::{RegistryStore, StoreError};
