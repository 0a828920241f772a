pub mod admins;
pub mod call_data;
pub mod calls;
pub mod credits;
pub mod seed;
pub mod users;
