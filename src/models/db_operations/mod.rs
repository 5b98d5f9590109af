pub mod content_db_operations;
pub mod inbox_db_operations;
pub mod users_db_operations;
