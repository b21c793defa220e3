// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    CustomerProfile, Hotel, Priority, RewardEvent, RewardValues, Scenario, StaffRole, Task,
    TaskDraft,
};
pub use requests::{GuestRequest, PreferenceUpdateRequest};
pub use responses::{ErrorResponse, HealthResponse, HotelsResponse, PreferencesResponse};
