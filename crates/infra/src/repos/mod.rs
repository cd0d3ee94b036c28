pub mod documents;
pub mod events;
pub mod profiles;
pub mod registrations;

pub use documents::{DocumentRepo, NewDocument};
pub use events::EventRepo;
pub use profiles::{NewProfile, ProfileFilter, ProfileRepo, ProfileUpdate};
pub use registrations::RegistrationRepo;
