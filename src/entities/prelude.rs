pub use super::api_keys::Entity as ApiKeys;
pub use super::users::Entity as Users;
pub use super::workflows::Entity as Workflows;
