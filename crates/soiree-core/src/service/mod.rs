//! Domain services.
//!
//! [`CrudService`] is the backend-agnostic facade every entity service is
//! built on; entity services add domain queries and mutations purely by
//! composing its operations. No service in this module names an adapter
//! type.

mod clients;
mod crud;
mod events;
mod plans;
mod templates;

pub use clients::ClientService;
pub use crud::CrudService;
pub use events::EventService;
pub use plans::PlanService;
pub use templates::TemplateService;
