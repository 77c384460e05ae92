pub mod login;
pub mod password;
pub mod profile;
pub mod register;
pub mod user;
pub mod utils;

pub use login::login;
pub use password::reset_password;
pub use profile::update_profile;
pub use register::register;
pub use user::get_user;
