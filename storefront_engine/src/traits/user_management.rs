use crate::{db_types::User, traits::StoreApiError};

/// Read access to shopper records, plus a single provisioning call. The engine never authenticates
/// users itself; it only needs to know whether a user id refers to a real account.
#[allow(async_fn_in_trait)]
pub trait UserManagement {
    /// Fetches the user with the given id. If no user exists, `None` is returned.
    async fn fetch_user(&self, user_id: i64) -> Result<Option<User>, StoreApiError>;

    /// Creates a new user record. Registration flows live outside the engine; this exists for
    /// provisioning and test fixtures.
    async fn insert_user(&self, username: &str, is_staff: bool) -> Result<User, StoreApiError>;
}
