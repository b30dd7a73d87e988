mod contacts;

pub use contacts::{ContactRepo, ContactStore, ContactSubmission, NewContact};
