pub mod user_follows;
pub mod users;
