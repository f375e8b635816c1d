use domain_users::{PgUserRepository, UserService};

pub fn service(state: &crate::state::AppState) -> UserService<PgUserRepository> {
    UserService::new(PgUserRepository::new(state.db.clone()))
}
